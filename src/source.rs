//! Source links: map a declaration's location to a permanent URL.
//!
//! Links point at the exact commit being documented, so a file with
//! uncommitted changes cannot be linked and aborts the run.

use crate::error::{DocError, Result};
use crate::semantic::SourceLocation;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Resolves a declaration location to an external link.
pub trait SourceResolver {
    fn resolve(&self, location: &SourceLocation) -> Result<Option<String>>;
}

/// Resolver that never produces links.
pub struct NoSourceLinks;

impl SourceResolver for NoSourceLinks {
    fn resolve(&self, _location: &SourceLocation) -> Result<Option<String>> {
        Ok(None)
    }
}

/// Resolver for files tracked in a git working tree.
pub struct GitSourceResolver {
    repo_root: PathBuf,
    repo_url: String,
    commit: String,
    check_links: bool,
    /// Files already checked for local modifications.
    clean: RefCell<HashMap<String, bool>>,
}

impl GitSourceResolver {
    /// Read the current commit of `repo_root`.
    pub fn new(repo_root: impl Into<PathBuf>, repo_url: &str, check_links: bool) -> Result<Self> {
        let repo_root = repo_root.into();
        let commit = git(&repo_root, &["rev-parse", "HEAD"])?.trim().to_string();
        tracing::debug!(commit = %commit, root = %repo_root.display(), "resolved source commit");
        Ok(Self::with_commit(repo_root, repo_url, commit, check_links))
    }

    fn with_commit(repo_root: PathBuf, repo_url: &str, commit: String, check_links: bool) -> Self {
        GitSourceResolver {
            repo_root,
            repo_url: repo_url.trim_end_matches('/').to_string(),
            commit,
            check_links,
            clean: RefCell::new(HashMap::new()),
        }
    }

    fn ensure_committed(&self, file: &str) -> Result<()> {
        let cached = self.clean.borrow().get(file).copied();
        let clean = match cached {
            Some(clean) => clean,
            None => {
                let status = git(&self.repo_root, &["status", "--porcelain", "--", file])?;
                let clean = status.trim().is_empty();
                self.clean.borrow_mut().insert(file.to_string(), clean);
                clean
            }
        };
        if clean {
            Ok(())
        } else {
            Err(DocError::UncommittedChanges {
                file: file.to_string(),
            })
        }
    }

    fn link(&self, location: &SourceLocation) -> String {
        format!(
            "{}/blob/{}/{}#L{}",
            self.repo_url,
            self.commit,
            location.file.trim_start_matches("./"),
            location.line
        )
    }
}

impl SourceResolver for GitSourceResolver {
    fn resolve(&self, location: &SourceLocation) -> Result<Option<String>> {
        self.ensure_committed(&location.file)?;
        let url = self.link(location);
        if self.check_links {
            probe(&location.file, &url)?;
        }
        Ok(Some(url))
    }
}

/// Run a git subcommand in `root` and return its stdout.
fn git(root: &Path, args: &[&str]) -> Result<String> {
    let command = args.join(" ");
    let output = Command::new("git")
        .arg("-C")
        .arg(root)
        .args(args)
        .output()
        .map_err(|e| DocError::Git {
            command: command.clone(),
            message: e.to_string(),
        })?;
    if !output.status.success() {
        return Err(DocError::Git {
            command,
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// HEAD request; any transport error or non-2xx status fails.
fn probe(file: &str, url: &str) -> Result<()> {
    tracing::debug!(url, "probing source link");
    match ureq::head(url).call() {
        Ok(_) => Ok(()),
        Err(ureq::Error::Status(code, _)) => Err(DocError::UnreachableLink {
            file: file.to_string(),
            url: url.to_string(),
            reason: format!("HTTP {}", code),
        }),
        Err(e) => Err(DocError::UnreachableLink {
            file: file.to_string(),
            url: url.to_string(),
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> GitSourceResolver {
        GitSourceResolver::with_commit(
            PathBuf::from("."),
            "https://github.com/acme/tensors/",
            "0123abcd".to_string(),
            false,
        )
    }

    #[test]
    fn link_format() {
        let location = SourceLocation {
            file: "./src/api.ts".to_string(),
            line: 42,
        };
        assert_eq!(
            resolver().link(&location),
            "https://github.com/acme/tensors/blob/0123abcd/src/api.ts#L42"
        );
    }

    #[test]
    fn cached_dirty_file_is_rejected() {
        let r = resolver();
        r.clean.borrow_mut().insert("src/api.ts".to_string(), false);
        let err = r
            .resolve(&SourceLocation {
                file: "src/api.ts".to_string(),
                line: 1,
            })
            .unwrap_err();
        assert!(matches!(err, DocError::UncommittedChanges { ref file } if file == "src/api.ts"));
    }

    #[test]
    fn cached_clean_file_is_linked() {
        let r = resolver();
        r.clean.borrow_mut().insert("src/api.ts".to_string(), true);
        let url = r
            .resolve(&SourceLocation {
                file: "src/api.ts".to_string(),
                line: 7,
            })
            .unwrap();
        assert_eq!(
            url.as_deref(),
            Some("https://github.com/acme/tensors/blob/0123abcd/src/api.ts#L7")
        );
    }

    #[test]
    fn no_links() {
        let location = SourceLocation {
            file: "a.ts".to_string(),
            line: 1,
        };
        assert_eq!(NoSourceLinks.resolve(&location).unwrap(), None);
    }

    fn committed_repo() -> tempfile::TempDir {
        let dir = tempfile::TempDir::new().unwrap();
        let root = dir.path();
        git(root, &["init", "-q"]).unwrap();
        std::fs::write(root.join("api.ts"), "export const a = 1;\n").unwrap();
        git(root, &["add", "api.ts"]).unwrap();
        git(
            root,
            &[
                "-c",
                "user.name=apidoc",
                "-c",
                "user.email=apidoc@example.com",
                "-c",
                "commit.gpgsign=false",
                "commit",
                "-q",
                "-m",
                "initial",
            ],
        )
        .unwrap();
        dir
    }

    #[test]
    fn committed_file_is_linked_at_head() {
        let repo = committed_repo();
        let head = git(repo.path(), &["rev-parse", "HEAD"]).unwrap();
        let r = GitSourceResolver::new(repo.path(), "https://github.com/acme/tensors", false).unwrap();
        let url = r
            .resolve(&SourceLocation {
                file: "api.ts".to_string(),
                line: 1,
            })
            .unwrap();
        assert_eq!(
            url,
            Some(format!(
                "https://github.com/acme/tensors/blob/{}/api.ts#L1",
                head.trim()
            ))
        );
    }

    #[test]
    fn modified_file_is_rejected() {
        let repo = committed_repo();
        std::fs::write(repo.path().join("api.ts"), "export const a = 2;\n").unwrap();
        let r = GitSourceResolver::new(repo.path(), "https://github.com/acme/tensors", false).unwrap();
        let err = r
            .resolve(&SourceLocation {
                file: "api.ts".to_string(),
                line: 1,
            })
            .unwrap_err();
        assert!(matches!(err, DocError::UncommittedChanges { ref file } if file == "api.ts"));
    }
}
