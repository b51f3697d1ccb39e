//! JSON-backed semantic model.
//!
//! An external analyzer dumps the symbols, declarations and types of the
//! analyzed program as one or more JSON fragments. Keys are strings in the
//! files; loading interns them into dense handles and validates every
//! cross reference up front so queries never fail afterwards.

use super::{
    DeclId, DeclKind, Parameter, SemanticModel, Signature, SourceLocation, SymbolId, TypeId,
};
use crate::error::{DocError, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

// -- File schema --------------------------------------------------------------

/// One semantic graph file.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Fragment {
    #[serde(default)]
    pub modules: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub symbols: BTreeMap<String, SymbolSpec>,
    #[serde(default)]
    pub declarations: BTreeMap<String, DeclSpec>,
    #[serde(default)]
    pub types: BTreeMap<String, TypeSpec>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SymbolSpec {
    /// Display name; defaults to the key.
    pub name: Option<String>,
    #[serde(default)]
    pub declarations: Vec<String>,
    /// Re-exported symbol this one stands for.
    pub alias_of: Option<String>,
    pub doc: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DeclSpec {
    pub kind: String,
    pub symbol: Option<String>,
    /// Name and doc of the synthesized symbol when `symbol` is absent.
    pub name: Option<String>,
    pub doc: Option<String>,
    pub file: Option<String>,
    pub line: Option<u32>,
    #[serde(rename = "type")]
    pub ty: Option<String>,
    pub signature: Option<SignatureSpec>,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub callable_initializer: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SignatureSpec {
    #[serde(default)]
    pub params: Vec<ParamSpec>,
    pub returns: Option<String>,
    pub display: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ParamSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    pub doc: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TypeSpec {
    pub display: String,
    /// Originating symbol (class or interface instance types).
    pub symbol: Option<String>,
    /// Alias symbol (type aliases).
    pub alias: Option<String>,
}

/// Read and parse one fragment file.
pub fn read_fragment(path: &Path) -> Result<Fragment> {
    let content = fs::read_to_string(path).map_err(|source| DocError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| DocError::Json {
        path: path.to_path_buf(),
        source,
    })
}

// -- Interned model -----------------------------------------------------------

#[derive(Debug)]
struct SymbolData {
    name: String,
    declarations: Vec<DeclId>,
    alias_of: Option<SymbolId>,
    doc: Option<String>,
}

#[derive(Debug)]
struct DeclData {
    kind: DeclKind,
    symbol: SymbolId,
    location: Option<SourceLocation>,
    ty: Option<TypeId>,
    signature: Option<Signature>,
    members: Vec<DeclId>,
    private: bool,
    callable_initializer: bool,
}

#[derive(Debug)]
struct TypeData {
    display: String,
    symbol: Option<SymbolId>,
    alias: Option<SymbolId>,
}

/// In-memory semantic graph implementing [`SemanticModel`].
#[derive(Debug)]
pub struct GraphModel {
    modules: HashMap<String, Vec<SymbolId>>,
    symbols: Vec<SymbolData>,
    decls: Vec<DeclData>,
    types: Vec<TypeData>,
    /// Type of declarations that carry no `type`.
    unknown_type: TypeId,
}

impl GraphModel {
    /// Load and merge fragment files into one model.
    pub fn load(paths: &[PathBuf]) -> Result<Self> {
        let mut fragments = Vec::with_capacity(paths.len());
        for path in paths {
            tracing::debug!(path = %path.display(), "reading semantic graph");
            fragments.push((path.clone(), read_fragment(path)?));
        }
        Self::from_fragment(super::merge::merge(fragments)?)
    }

    /// Parse a single in-memory fragment.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let fragment = serde_json::from_str(json).map_err(|source| DocError::Json {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        Self::from_fragment(fragment)
    }

    pub fn from_fragment(fragment: Fragment) -> Result<Self> {
        Builder::new(&fragment).build(fragment)
    }

    fn symbol(&self, id: SymbolId) -> &SymbolData {
        &self.symbols[id.0 as usize]
    }

    fn decl(&self, id: DeclId) -> &DeclData {
        &self.decls[id.0 as usize]
    }

    fn ty(&self, id: TypeId) -> &TypeData {
        &self.types[id.0 as usize]
    }
}

impl SemanticModel for GraphModel {
    fn exports_of_module(&self, module: &str) -> Option<Vec<SymbolId>> {
        self.modules.get(module).cloned()
    }

    fn declarations(&self, symbol: SymbolId) -> &[DeclId] {
        &self.symbol(symbol).declarations
    }

    fn is_alias(&self, symbol: SymbolId) -> bool {
        self.symbol(symbol).alias_of.is_some()
    }

    fn resolve_alias(&self, symbol: SymbolId) -> SymbolId {
        // Chains are acyclic, checked at load.
        let mut current = symbol;
        while let Some(target) = self.symbol(current).alias_of {
            current = target;
        }
        current
    }

    fn symbol_name(&self, symbol: SymbolId) -> &str {
        &self.symbol(symbol).name
    }

    fn documentation_comment(&self, symbol: SymbolId) -> Vec<String> {
        self.symbol(symbol).doc.iter().cloned().collect()
    }

    fn declaration_kind(&self, decl: DeclId) -> DeclKind {
        self.decl(decl).kind.clone()
    }

    fn declaration_symbol(&self, decl: DeclId) -> SymbolId {
        self.decl(decl).symbol
    }

    fn members(&self, decl: DeclId) -> &[DeclId] {
        &self.decl(decl).members
    }

    fn call_signature(&self, decl: DeclId) -> Option<Signature> {
        self.decl(decl).signature.clone()
    }

    fn signature_to_display_string(&self, signature: &Signature) -> String {
        if let Some(display) = &signature.display {
            return display.clone();
        }
        let params: Vec<String> = signature
            .params
            .iter()
            .map(|p| {
                format!(
                    "{}: {}",
                    self.symbol_name(p.symbol),
                    self.type_to_display_string(p.ty)
                )
            })
            .collect();
        format!(
            "({}) => {}",
            params.join(", "),
            self.type_to_display_string(signature.return_type)
        )
    }

    fn type_at(&self, _symbol: SymbolId, decl: DeclId) -> TypeId {
        self.decl(decl).ty.unwrap_or(self.unknown_type)
    }

    fn type_to_display_string(&self, ty: TypeId) -> String {
        self.ty(ty).display.clone()
    }

    fn originating_symbol(&self, ty: TypeId) -> Option<SymbolId> {
        self.ty(ty).symbol
    }

    fn alias_symbol(&self, ty: TypeId) -> Option<SymbolId> {
        self.ty(ty).alias
    }

    fn is_private(&self, member: DeclId) -> bool {
        self.decl(member).private
    }

    fn is_callable_initializer(&self, decl: DeclId) -> bool {
        self.decl(decl).callable_initializer
    }

    fn location(&self, decl: DeclId) -> Option<SourceLocation> {
        self.decl(decl).location.clone()
    }
}

// -- Loading ------------------------------------------------------------------

struct Builder {
    symbol_ids: HashMap<String, SymbolId>,
    decl_ids: HashMap<String, DeclId>,
    type_ids: HashMap<String, TypeId>,
    symbols: Vec<SymbolData>,
    types: Vec<TypeData>,
}

impl Builder {
    fn new(fragment: &Fragment) -> Self {
        let symbol_ids = fragment
            .symbols
            .keys()
            .enumerate()
            .map(|(i, key)| (key.clone(), SymbolId(i as u32)))
            .collect();
        let decl_ids = fragment
            .declarations
            .keys()
            .enumerate()
            .map(|(i, key)| (key.clone(), DeclId(i as u32)))
            .collect();
        Builder {
            symbol_ids,
            decl_ids,
            type_ids: HashMap::new(),
            symbols: Vec::new(),
            types: Vec::new(),
        }
    }

    fn build(mut self, fragment: Fragment) -> Result<GraphModel> {
        // Keyed types first so their ids are stable; symbols are resolved
        // once every symbol key has an id.
        let mut pending_types = Vec::new();
        for (key, spec) in &fragment.types {
            let id = self.push_type(key, spec.display.clone());
            pending_types.push((id, key, spec));
        }
        for (id, key, spec) in pending_types {
            let symbol = self.opt_symbol(spec.symbol.as_deref(), key)?;
            let alias = self.opt_symbol(spec.alias.as_deref(), key)?;
            let data = &mut self.types[id.0 as usize];
            data.symbol = symbol;
            data.alias = alias;
        }
        let unknown_type = self.intern_type("any");

        let mut owners: HashMap<DeclId, SymbolId> = HashMap::new();
        for (key, spec) in &fragment.symbols {
            let mut declarations = Vec::with_capacity(spec.declarations.len());
            for decl_key in &spec.declarations {
                let decl = self.decl_ref(decl_key, key)?;
                owners.entry(decl).or_insert(self.symbol_ids[key]);
                declarations.push(decl);
            }
            let alias_of = self.opt_symbol(spec.alias_of.as_deref(), key)?;
            self.symbols.push(SymbolData {
                name: spec.name.clone().unwrap_or_else(|| key.clone()),
                declarations,
                alias_of,
                doc: spec.doc.clone(),
            });
        }

        let mut decls = Vec::with_capacity(fragment.declarations.len());
        for (index, (key, spec)) in fragment.declarations.iter().enumerate() {
            let id = DeclId(index as u32);
            decls.push(self.build_decl(id, key, spec, owners.get(&id).copied())?);
        }

        self.check_alias_cycles()?;

        let mut modules = HashMap::new();
        for (module, exports) in &fragment.modules {
            let ids = exports
                .iter()
                .map(|key| self.symbol_ref(key, module))
                .collect::<Result<Vec<_>>>()?;
            modules.insert(module.clone(), ids);
        }

        Ok(GraphModel {
            modules,
            symbols: self.symbols,
            decls,
            types: self.types,
            unknown_type,
        })
    }

    fn build_decl(
        &mut self,
        id: DeclId,
        key: &str,
        spec: &DeclSpec,
        owner: Option<SymbolId>,
    ) -> Result<DeclData> {
        let kind = DeclKind::from_tag(&spec.kind);
        let symbol = match (&spec.symbol, owner) {
            (Some(symbol_key), _) => self.symbol_ref(symbol_key, key)?,
            (None, Some(owner)) => owner,
            (None, None) => self.synthesize_symbol(
                spec.name.clone().unwrap_or_else(|| key.to_string()),
                spec.doc.clone(),
                vec![id],
            ),
        };
        let members = spec
            .members
            .iter()
            .map(|member| self.decl_ref(member, key))
            .collect::<Result<Vec<_>>>()?;
        let signature = match &spec.signature {
            Some(sig) => Some(self.build_signature(sig)),
            None if kind.is_callable() || spec.callable_initializer => Some(Signature {
                params: Vec::new(),
                return_type: self.intern_type("void"),
                display: None,
            }),
            None => None,
        };
        let location = spec.file.as_ref().map(|file| SourceLocation {
            file: file.clone(),
            line: spec.line.unwrap_or(1),
        });
        let ty = spec.ty.as_deref().map(|t| self.intern_type(t));

        Ok(DeclData {
            kind,
            symbol,
            location,
            ty,
            signature,
            members,
            private: spec.private,
            callable_initializer: spec.callable_initializer,
        })
    }

    fn build_signature(&mut self, spec: &SignatureSpec) -> Signature {
        let params = spec
            .params
            .iter()
            .map(|param| {
                let ty = self.intern_type(&param.ty);
                let symbol = self.synthesize_symbol(param.name.clone(), param.doc.clone(), vec![]);
                Parameter { symbol, ty }
            })
            .collect();
        let return_type = self.intern_type(spec.returns.as_deref().unwrap_or("void"));
        Signature {
            params,
            return_type,
            display: spec.display.clone(),
        }
    }

    fn synthesize_symbol(
        &mut self,
        name: String,
        doc: Option<String>,
        declarations: Vec<DeclId>,
    ) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(SymbolData {
            name,
            declarations,
            alias_of: None,
            doc,
        });
        id
    }

    fn push_type(&mut self, key: &str, display: String) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(TypeData {
            display,
            symbol: None,
            alias: None,
        });
        self.type_ids.insert(key.to_string(), id);
        id
    }

    /// Undeclared type keys are primitives displayed as the key itself.
    fn intern_type(&mut self, key: &str) -> TypeId {
        match self.type_ids.get(key) {
            Some(id) => *id,
            None => self.push_type(key, key.to_string()),
        }
    }

    fn symbol_ref(&self, key: &str, from: &str) -> Result<SymbolId> {
        self.symbol_ids
            .get(key)
            .copied()
            .ok_or_else(|| DocError::UnknownReference {
                kind: "symbol",
                key: key.to_string(),
                from: from.to_string(),
            })
    }

    fn opt_symbol(&self, key: Option<&str>, from: &str) -> Result<Option<SymbolId>> {
        key.map(|k| self.symbol_ref(k, from)).transpose()
    }

    fn decl_ref(&self, key: &str, from: &str) -> Result<DeclId> {
        self.decl_ids
            .get(key)
            .copied()
            .ok_or_else(|| DocError::UnknownReference {
                kind: "declaration",
                key: key.to_string(),
                from: from.to_string(),
            })
    }

    fn check_alias_cycles(&self) -> Result<()> {
        for start in &self.symbols {
            let mut current = start;
            let mut steps = 0;
            while let Some(next) = current.alias_of {
                steps += 1;
                if steps > self.symbols.len() {
                    return Err(DocError::AliasCycle(start.name.clone()));
                }
                current = &self.symbols[next.0 as usize];
            }
        }
        Ok(())
    }
}
