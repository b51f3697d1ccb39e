//! Entry extraction: classify one declaration into documentation entries.
//!
//! The extractor never touches the walker's queue. Every type it meets
//! while reading a call signature is returned in [`Visit::discovered`] and
//! the walker decides whether it still needs a visit.

use crate::error::{DocError, Result};
use crate::markup;
use crate::model::{qualify, ArgEntry, DocEntry};
use crate::semantic::{DeclId, DeclKind, SemanticModel, SymbolId, TypeId};
use crate::source::SourceResolver;

/// Result of visiting one declaration.
#[derive(Debug, Default)]
pub struct Visit {
    pub entries: Vec<DocEntry>,
    /// Parameter and return types met along the way
    pub discovered: Vec<TypeId>,
}

pub struct Extractor<'a, M: SemanticModel + ?Sized> {
    model: &'a M,
    sources: &'a dyn SourceResolver,
}

impl<'a, M: SemanticModel + ?Sized> Extractor<'a, M> {
    pub fn new(model: &'a M, sources: &'a dyn SourceResolver) -> Self {
        Extractor { model, sources }
    }

    /// Classify `decl` and build its entries.
    pub fn visit(&self, decl: DeclId) -> Result<Visit> {
        let mut visit = Visit::default();
        let kind = self.model.declaration_kind(decl);
        let name = self.name_of(decl);

        match kind {
            DeclKind::Class => self.visit_class(decl, &mut visit)?,
            DeclKind::Function => self.visit_method(decl, None, &name, &mut visit)?,
            DeclKind::Variable if self.model.is_callable_initializer(decl) => {
                self.visit_method(decl, None, &name, &mut visit)?
            }
            DeclKind::Variable
            | DeclKind::TypeAlias
            | DeclKind::Interface
            | DeclKind::StringLiteral
            | DeclKind::ObjectLiteral
            | DeclKind::FunctionType => {
                tracing::info!(kind = %kind, name = %name, "not documented");
            }
            DeclKind::Constructor
            | DeclKind::Method
            | DeclKind::Property
            | DeclKind::GetAccessor
            | DeclKind::SetAccessor
            | DeclKind::IndexSignature
            | DeclKind::Other(_) => {
                return Err(DocError::UnsupportedDeclaration {
                    kind: kind.tag().to_string(),
                    name,
                });
            }
        }

        Ok(visit)
    }

    fn visit_class(&self, decl: DeclId, visit: &mut Visit) -> Result<()> {
        let class_name = self.name_of(decl);
        let mut entry = DocEntry::class(class_name.as_str());
        entry.docstr = self.docstr(self.model.declaration_symbol(decl));
        entry.source_url = self.source_url(decl)?;
        visit.entries.push(entry);

        for &member in self.model.members(decl) {
            if self.model.is_private(member) {
                tracing::debug!(class = %class_name, member = %self.name_of(member), "skipping private member");
                continue;
            }
            let kind = self.model.declaration_kind(member);
            match &kind {
                DeclKind::Constructor => {
                    self.visit_method(member, Some(&class_name), "constructor", visit)?
                }
                DeclKind::Method => {
                    self.visit_method(member, Some(&class_name), &self.name_of(member), visit)?
                }
                DeclKind::Property if self.model.is_callable_initializer(member) => {
                    self.visit_method(member, Some(&class_name), &self.name_of(member), visit)?
                }
                DeclKind::Property | DeclKind::GetAccessor => {
                    self.visit_property(member, &class_name, visit)?
                }
                DeclKind::Other(tag) => {
                    return Err(DocError::UnsupportedDeclaration {
                        kind: tag.clone(),
                        name: qualify(Some(&class_name), &self.name_of(member)),
                    });
                }
                _ => {
                    tracing::info!(
                        class = %class_name,
                        kind = %kind,
                        member = %self.name_of(member),
                        "member not documented"
                    );
                }
            }
        }
        Ok(())
    }

    fn visit_method(
        &self,
        decl: DeclId,
        class_name: Option<&str>,
        member: &str,
        visit: &mut Visit,
    ) -> Result<()> {
        let name = qualify(class_name, member);
        let signature = self
            .model
            .call_signature(decl)
            .ok_or_else(|| DocError::MissingSignature(name.clone()))?;

        let mut args = Vec::with_capacity(signature.params.len());
        for param in &signature.params {
            visit.discovered.push(param.ty);
            args.push(ArgEntry {
                name: self.model.symbol_name(param.symbol).to_string(),
                typestr: self.model.type_to_display_string(param.ty),
                docstr: self.docstr(param.symbol),
            });
        }
        visit.discovered.push(signature.return_type);

        let mut entry = DocEntry::method(
            name,
            self.model.signature_to_display_string(&signature),
            args,
            self.model.type_to_display_string(signature.return_type),
        );
        entry.docstr = self.docstr(self.model.declaration_symbol(decl));
        entry.source_url = self.source_url(decl)?;
        visit.entries.push(entry);
        Ok(())
    }

    fn visit_property(&self, decl: DeclId, class_name: &str, visit: &mut Visit) -> Result<()> {
        let symbol = self.model.declaration_symbol(decl);
        let ty = self.model.type_at(symbol, decl);
        let mut entry = DocEntry::property(
            qualify(Some(class_name), self.model.symbol_name(symbol)),
            self.model.type_to_display_string(ty),
        );
        entry.docstr = self.docstr(symbol);
        entry.source_url = self.source_url(decl)?;
        visit.entries.push(entry);
        Ok(())
    }

    fn name_of(&self, decl: DeclId) -> String {
        let symbol = self.model.declaration_symbol(decl);
        self.model.symbol_name(symbol).to_string()
    }

    /// Concatenated comment parts, run through the markup transformer.
    fn docstr(&self, symbol: SymbolId) -> Option<String> {
        let text = self.model.documentation_comment(symbol).concat();
        if text.is_empty() {
            None
        } else {
            Some(markup::to_html(&text))
        }
    }

    fn source_url(&self, decl: DeclId) -> Result<Option<String>> {
        match self.model.location(decl) {
            Some(location) => self.sources.resolve(&location),
            None => Ok(None),
        }
    }
}
