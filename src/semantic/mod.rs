//! Semantic model: the query interface the walker and extractor consume.
//!
//! The trait mirrors what a static analyzer exposes about a program:
//! symbols, their declarations, types, call signatures and doc comments.
//! [`graph::GraphModel`] implements it over JSON fragments dumped by an
//! external analyzer.

pub mod graph;
pub mod merge;

use std::fmt;

/// Handle of a named program entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub u32);

/// Handle of one syntactic definition site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(pub u32);

/// Handle of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

/// Syntactic kind of a declaration, decided once by the adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclKind {
    Class,
    Function,
    Variable,
    Interface,
    TypeAlias,
    StringLiteral,
    ObjectLiteral,
    FunctionType,
    // Class members
    Constructor,
    Method,
    Property,
    GetAccessor,
    SetAccessor,
    IndexSignature,
    /// Anything the adapter could not map. Fails classification.
    Other(String),
}

impl DeclKind {
    /// Parse the kind tag used in semantic graph files.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "class" => DeclKind::Class,
            "function" => DeclKind::Function,
            "variable" => DeclKind::Variable,
            "interface" => DeclKind::Interface,
            "typeAlias" => DeclKind::TypeAlias,
            "stringLiteral" => DeclKind::StringLiteral,
            "objectLiteral" => DeclKind::ObjectLiteral,
            "functionType" => DeclKind::FunctionType,
            "constructor" => DeclKind::Constructor,
            "method" => DeclKind::Method,
            "property" => DeclKind::Property,
            "getAccessor" => DeclKind::GetAccessor,
            "setAccessor" => DeclKind::SetAccessor,
            "indexSignature" => DeclKind::IndexSignature,
            other => DeclKind::Other(other.to_string()),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            DeclKind::Class => "class",
            DeclKind::Function => "function",
            DeclKind::Variable => "variable",
            DeclKind::Interface => "interface",
            DeclKind::TypeAlias => "typeAlias",
            DeclKind::StringLiteral => "stringLiteral",
            DeclKind::ObjectLiteral => "objectLiteral",
            DeclKind::FunctionType => "functionType",
            DeclKind::Constructor => "constructor",
            DeclKind::Method => "method",
            DeclKind::Property => "property",
            DeclKind::GetAccessor => "getAccessor",
            DeclKind::SetAccessor => "setAccessor",
            DeclKind::IndexSignature => "indexSignature",
            DeclKind::Other(tag) => tag,
        }
    }

    /// Whether this kind is implicitly callable (has a call signature
    /// without needing a callable initializer).
    pub fn is_callable(&self) -> bool {
        matches!(
            self,
            DeclKind::Function | DeclKind::Method | DeclKind::Constructor
        )
    }
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One parameter of a call signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parameter {
    pub symbol: SymbolId,
    pub ty: TypeId,
}

/// The call signature associated with a callable declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub params: Vec<Parameter>,
    pub return_type: TypeId,
    /// Display form recorded by the analyzer, if any.
    pub display: Option<String>,
}

/// Where a declaration lives, relative to the analyzed tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: String,
    /// 1-based line number
    pub line: u32,
}

/// Query interface over an external static-analysis facility.
pub trait SemanticModel {
    /// Exported symbols of a module, or `None` if the module is unknown.
    fn exports_of_module(&self, module: &str) -> Option<Vec<SymbolId>>;

    /// Declarations of a symbol, in source order.
    fn declarations(&self, symbol: SymbolId) -> &[DeclId];

    fn is_alias(&self, symbol: SymbolId) -> bool;

    /// Follow an alias to the symbol it ultimately stands for.
    fn resolve_alias(&self, symbol: SymbolId) -> SymbolId;

    fn symbol_name(&self, symbol: SymbolId) -> &str;

    /// Documentation comment as text parts; empty when undocumented.
    fn documentation_comment(&self, symbol: SymbolId) -> Vec<String>;

    fn declaration_kind(&self, decl: DeclId) -> DeclKind;

    /// The symbol a declaration defines.
    fn declaration_symbol(&self, decl: DeclId) -> SymbolId;

    /// Members of a class declaration, in declaration order.
    fn members(&self, decl: DeclId) -> &[DeclId];

    fn call_signature(&self, decl: DeclId) -> Option<Signature>;

    fn signature_to_display_string(&self, signature: &Signature) -> String;

    /// Type of `symbol` as seen at `decl`.
    fn type_at(&self, symbol: SymbolId, decl: DeclId) -> TypeId;

    fn type_to_display_string(&self, ty: TypeId) -> String;

    fn originating_symbol(&self, ty: TypeId) -> Option<SymbolId>;

    fn alias_symbol(&self, ty: TypeId) -> Option<SymbolId>;

    fn is_private(&self, member: DeclId) -> bool;

    /// Whether a variable or property is initialized with a function.
    fn is_callable_initializer(&self, decl: DeclId) -> bool;

    fn location(&self, decl: DeclId) -> Option<SourceLocation>;
}
