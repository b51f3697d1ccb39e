//! Data model for extracted documentation: format-agnostic.

use serde::Serialize;
use std::fmt;

/// Classification of a documented declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocKind {
    Class,
    /// Free functions, instance methods and constructors.
    Method,
    /// Non-callable properties and get accessors.
    Property,
}

impl DocKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DocKind::Class => "class",
            DocKind::Method => "method",
            DocKind::Property => "property",
        }
    }
}

impl fmt::Display for DocKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One documented declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocEntry {
    pub kind: DocKind,
    /// Display name; class members are qualified as `Class.member`.
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typestr: Option<String>,
    /// Documentation comment, already converted to HTML by the markup pass.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docstr: Option<String>,
    /// Parameters in declaration order (methods only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<ArgEntry>>,
    /// Return type display string (methods only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ret_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

impl DocEntry {
    pub fn class(name: impl Into<String>) -> Self {
        Self::new(DocKind::Class, name)
    }

    pub fn property(name: impl Into<String>, typestr: impl Into<String>) -> Self {
        let mut entry = Self::new(DocKind::Property, name);
        entry.typestr = Some(typestr.into());
        entry
    }

    pub fn method(
        name: impl Into<String>,
        typestr: impl Into<String>,
        args: Vec<ArgEntry>,
        ret_type: impl Into<String>,
    ) -> Self {
        let mut entry = Self::new(DocKind::Method, name);
        entry.typestr = Some(typestr.into());
        entry.args = Some(args);
        entry.ret_type = Some(ret_type.into());
        entry
    }

    fn new(kind: DocKind, name: impl Into<String>) -> Self {
        DocEntry {
            kind,
            name: name.into(),
            typestr: None,
            docstr: None,
            args: None,
            ret_type: None,
            source_url: None,
        }
    }
}

/// A single parameter of a method entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArgEntry {
    pub name: String,
    pub typestr: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docstr: Option<String>,
}

/// Qualify a member name with its owning class, if any.
pub fn qualify(class_name: Option<&str>, member: &str) -> String {
    match class_name {
        Some(class) => format!("{}.{}", class, member),
        None => member.to_string(),
    }
}
