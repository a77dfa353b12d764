//! The type checker.
//!
//! A `TypeChecker` is one analysis session over a bound program. It
//! resolves type names, creates script, struct and array types on first
//! use, enumerates the members of a type, walks `extends` chains and
//! answers assignability questions. Scope lookup, expression evaluation
//! and validation extend it in `scope.rs`, `evaluator.rs` and
//! `validator.rs`.
//!
//! Types are created lazily and memoized for the lifetime of the session:
//! - script and struct types by lower-cased qualified name
//! - array types by lower-cased element type name, and by the synthetic
//!   symbol that backs them
//!
//! Symbols created by the session itself (intrinsics, arrays and their
//! members) live in an overlay table whose ids continue after the bound
//! table's, so one `SymbolId` space covers both.

use crate::array::create_array_symbol;
use crate::lookup::LookupFlags;
use crate::resolver::ScriptResolver;
use crate::types::{TypeKind, TypeTable};
use indexmap::IndexMap;
use papyrus_ast::types::{MemberTypes, NodeId, SymbolId, TypeId};
use papyrus_ast::{NodeKind, SyntaxTree};
use papyrus_binder::{Symbol, SymbolKind, SymbolTable, TypeReference};
use papyrus_core::names::qualify;
use papyrus_core::NameParts;
use rustc_hash::{FxHashMap, FxHashSet};

/// One type-checking session.
pub struct TypeChecker<'a> {
    pub(crate) tree: &'a SyntaxTree,
    pub(crate) symbols: &'a SymbolTable,
    pub(crate) resolver: &'a dyn ScriptResolver,
    types: TypeTable,
    /// Intrinsic and array symbols.
    synthetic: SymbolTable,
    /// Script and struct types keyed by lower-cased qualified name.
    symbol_types: FxHashMap<String, TypeId>,
    /// Array types keyed by lower-cased element type name.
    array_types: FxHashMap<String, TypeId>,
    array_types_by_symbol: FxHashMap<SymbolId, TypeId>,
    /// Nodes whose type is currently being evaluated.
    pub(crate) evaluating: FxHashSet<NodeId>,
}

impl<'a> TypeChecker<'a> {
    pub fn new(
        tree: &'a SyntaxTree,
        symbols: &'a SymbolTable,
        resolver: &'a dyn ScriptResolver,
    ) -> Self {
        let mut synthetic = SymbolTable::with_base(symbols.next_id().0);
        let types = TypeTable::new(&mut synthetic);
        Self {
            tree,
            symbols,
            resolver,
            types,
            synthetic,
            symbol_types: FxHashMap::default(),
            array_types: FxHashMap::default(),
            array_types_by_symbol: FxHashMap::default(),
            evaluating: FxHashSet::default(),
        }
    }

    pub fn tree(&self) -> &'a SyntaxTree {
        self.tree
    }

    pub fn types(&self) -> &TypeTable {
        &self.types
    }

    /// Look up a bound or synthetic symbol.
    pub fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        if self.symbols.owns(id) {
            self.symbols.get(id)
        } else {
            self.synthetic.get(id)
        }
    }

    /// The symbol declared by a tree node.
    pub fn symbol_of(&self, node: NodeId) -> Option<SymbolId> {
        self.symbols.symbol_of(node)
    }

    pub fn type_name(&self, id: TypeId) -> &str {
        &self.types.get(id).name
    }

    // ========================================================================
    // Type resolution
    // ========================================================================

    /// Resolve a type name, trying `namespace:name` for each namespace in
    /// order before the bare name.
    pub fn resolve_type(&mut self, name: &str, namespaces: &[String]) -> Option<TypeId> {
        for namespace in namespaces {
            if let Some(ty) = self.resolve_full_name(&qualify(namespace, name)) {
                return Some(ty);
            }
        }
        let resolved = self.resolve_full_name(name);
        if resolved.is_none() {
            tracing::debug!(name, "unresolved type name");
        }
        resolved
    }

    /// Intrinsic first, then a script of that name, then a struct declared
    /// by the script named by the namespace part.
    fn resolve_full_name(&mut self, full_name: &str) -> Option<TypeId> {
        if let Some(intrinsic) = self.types.intrinsic(full_name) {
            return Some(intrinsic);
        }
        if let Some(script) = self.resolver.script_symbol(full_name) {
            return self.script_type(script);
        }

        let parts = NameParts::parse(full_name);
        if parts.namespace.is_empty() {
            return None;
        }
        let script = self.resolver.script_symbol(parts.namespace)?;
        let script_type = self.script_type(script)?;
        match &self.types.get(script_type).kind {
            TypeKind::Script { struct_types } => {
                struct_types.get(&parts.name.to_lowercase()).copied()
            }
            _ => None,
        }
    }

    /// The type of a script or struct symbol, an intrinsic's type, or the
    /// array type a generated array symbol backs.
    pub fn type_of_symbol(&mut self, symbol: SymbolId) -> Option<TypeId> {
        let s = self.symbol(symbol)?;
        match s.kind {
            SymbolKind::Script => self.script_type(symbol),
            SymbolKind::Struct => self.struct_type(symbol),
            SymbolKind::Intrinsic => self.types.intrinsic(&s.name),
            _ => None,
        }
    }

    fn script_type(&mut self, script: SymbolId) -> Option<TypeId> {
        let symbol = self.symbol(script)?;
        if symbol.kind != SymbolKind::Script {
            return None;
        }
        if symbol.is_generated_array() {
            return self.array_types_by_symbol.get(&script).copied();
        }

        let key = symbol.fully_qualified_name.to_lowercase();
        if let Some(&id) = self.symbol_types.get(&key) {
            return Some(id);
        }

        let name = symbol.name.clone();
        let fully_qualified_name = symbol.fully_qualified_name.clone();
        let structs: Vec<(SymbolId, String, String)> = symbol
            .members
            .iter()
            .filter_map(|m| self.symbol(*m))
            .filter(|m| m.kind == SymbolKind::Struct)
            .map(|m| (m.id, m.name.clone(), m.fully_qualified_name.clone()))
            .collect();

        tracing::debug!(script = %fully_qualified_name, structs = structs.len(), "creating script type");
        let id = self.types.add_type(
            &name,
            &fully_qualified_name,
            script,
            TypeKind::Script {
                struct_types: IndexMap::new(),
            },
        );
        self.symbol_types.insert(key, id);

        let mut struct_types = IndexMap::with_capacity(structs.len());
        for (struct_symbol, struct_name, struct_fqn) in structs {
            let struct_type = self.types.add_type(
                &struct_name,
                &struct_fqn,
                struct_symbol,
                TypeKind::Struct { parent_script: id },
            );
            self.symbol_types.insert(struct_fqn.to_lowercase(), struct_type);
            struct_types.insert(struct_name.to_lowercase(), struct_type);
        }
        self.types.set_struct_types(id, struct_types);

        Some(id)
    }

    /// Struct types are created together with their script's type.
    fn struct_type(&mut self, struct_symbol: SymbolId) -> Option<TypeId> {
        let symbol = self.symbol(struct_symbol)?;
        let key = symbol.fully_qualified_name.to_lowercase();
        let parent = symbol.parent?;
        if let Some(&id) = self.symbol_types.get(&key) {
            return Some(id);
        }
        self.script_type(parent)?;
        self.symbol_types.get(&key).copied()
    }

    /// The array type of `element_type_name`, or `None` when the element
    /// type does not resolve.
    pub fn array_type_for(&mut self, element_type_name: &str) -> Option<TypeId> {
        self.resolve_type(element_type_name, &[])?;

        let key = element_type_name.to_lowercase();
        if let Some(&id) = self.array_types.get(&key) {
            return Some(id);
        }

        tracing::debug!(element = element_type_name, "synthesizing array type");
        let symbol = create_array_symbol(&mut self.synthetic, element_type_name);
        let name = format!("{}[]", element_type_name);
        let id = self.types.add_type(
            &name,
            &name,
            symbol,
            TypeKind::Array {
                element_type_name: element_type_name.to_string(),
            },
        );
        self.array_types.insert(key, id);
        self.array_types_by_symbol.insert(symbol, id);
        Some(id)
    }

    pub fn element_type_of(&mut self, array: TypeId) -> Option<TypeId> {
        let element = match &self.types.get(array).kind {
            TypeKind::Array { element_type_name } => element_type_name.clone(),
            _ => return None,
        };
        self.resolve_type(&element, &[])
    }

    /// Resolve a type written in the tree.
    ///
    /// The name is looked up with the namespaces of the enclosing script's
    /// `extends` chain, then with its imports, and finally with the
    /// script's own namespace when the name looks like it refers to the
    /// script or something nested in it.
    pub fn type_of_type_identifier(&mut self, type_identifier: NodeId) -> Option<TypeId> {
        let tree = self.tree;
        let NodeKind::TypeIdentifier { is_array, .. } = tree.kind(type_identifier) else {
            return None;
        };
        let name = tree.identifier_name(type_identifier)?;
        let resolved = self.resolve_referenced_type(type_identifier, name)?;

        if *is_array {
            let element = self.types.get(resolved).fully_qualified_name.clone();
            self.array_type_for(&element)
        } else {
            Some(resolved)
        }
    }

    fn resolve_referenced_type(&mut self, node: NodeId, name: &str) -> Option<TypeId> {
        let script = self
            .tree
            .script_of(node)
            .and_then(|root| self.symbols.symbol_of(root));

        if let Some(script_type) = script.and_then(|s| self.script_type(s)) {
            let namespaces: Vec<String> = self
                .script_hierarchy(script_type)
                .into_iter()
                .map(|t| self.types.get(t).fully_qualified_name.clone())
                .collect();
            if let Some(ty) = self.resolve_type(name, &namespaces) {
                return Some(ty);
            }
        }

        let script_symbol = script.and_then(|s| self.symbol(s));
        let imports: Vec<String> = script_symbol
            .map(|s| {
                s.imports
                    .iter()
                    .filter_map(|i| self.symbol(*i))
                    .filter_map(|i| i.imported_script.clone())
                    .collect()
            })
            .unwrap_or_default();
        let current_name = script_symbol.map(|s| s.name.to_lowercase());

        if let Some(ty) = self.resolve_type(name, &imports) {
            return Some(ty);
        }

        let current_name = current_name?;
        let current = NameParts::parse(&current_name);
        let referenced_name = name.to_lowercase();
        let referenced = NameParts::parse(&referenced_name);
        if referenced.name == current.name
            || referenced
                .full_name
                .starts_with(&format!("{}:", current.name))
        {
            return self.resolve_type(name, &[current.namespace.to_string()]);
        }
        None
    }

    // ========================================================================
    // Members
    // ========================================================================

    /// The script itself followed by the scripts it extends, most derived
    /// first. Stops at a name that does not resolve to a script, and at the
    /// first script already in the chain.
    pub fn script_hierarchy(&mut self, script_type: TypeId) -> Vec<TypeId> {
        let mut chain = Vec::new();
        let mut seen = FxHashSet::default();
        let mut current = Some(script_type);

        while let Some(ty) = current {
            if !seen.insert(ty) {
                tracing::debug!(script = %self.types.get(ty).name, "cyclic extends chain");
                break;
            }
            chain.push(ty);
            let extended = self
                .symbol(self.types.get(ty).symbol)
                .and_then(|s| s.extended_script.clone());
            current = match extended {
                Some(name) => self
                    .resolve_type(&name, &[])
                    .filter(|t| self.types.is_script(*t)),
                None => None,
            };
        }

        chain
    }

    /// Members of `ty` whose category is in `member_types` and that pass
    /// `flags`. Functions come first, then structs and custom events; the
    /// instance-only categories (events, groups, properties, states,
    /// variables) follow when `flags` includes `INSTANCE`.
    pub fn members_of(
        &mut self,
        ty: TypeId,
        member_types: MemberTypes,
        flags: LookupFlags,
    ) -> Vec<SymbolId> {
        let (is_script, is_array, is_struct) = match self.types.get(ty).kind {
            TypeKind::Script { .. } => (true, false, false),
            TypeKind::Array { .. } => (false, true, false),
            TypeKind::Struct { .. } => (false, false, true),
            TypeKind::Intrinsic(_) => return Vec::new(),
        };

        let mut members = Vec::new();

        if member_types.contains(MemberTypes::FUNCTION) && (is_script || is_array) {
            members.extend(self.hierarchy_members(ty, flags, |s| {
                s.kind == SymbolKind::Function && flags.admits_function(s)
            }));
        }

        if member_types.contains(MemberTypes::STRUCT) && is_script {
            members.extend(self.own_members(ty, |s| s.kind == SymbolKind::Struct));
        }

        if flags.contains(LookupFlags::GLOBAL)
            && member_types.contains(MemberTypes::CUSTOM_EVENT)
            && is_script
        {
            members.extend(self.hierarchy_members(ty, flags, |s| {
                s.kind == SymbolKind::CustomEvent
            }));
        }

        if !flags.contains(LookupFlags::INSTANCE) {
            return members;
        }

        if member_types.contains(MemberTypes::EVENT) && is_script {
            members.extend(self.hierarchy_members(ty, flags, |s| s.kind == SymbolKind::Event));
        }

        if member_types.contains(MemberTypes::GROUP) && is_script {
            members.extend(self.hierarchy_members(ty, flags, |s| s.kind == SymbolKind::Group));
        }

        if member_types.contains(MemberTypes::PROPERTY) && (is_script || is_array) {
            members.extend(self.hierarchy_members(ty, flags, |s| {
                s.kind == SymbolKind::Property && flags.admits_property(s)
            }));
        }

        if member_types.contains(MemberTypes::STATE) && is_script {
            members.extend(self.hierarchy_members(ty, flags, |s| {
                s.kind == SymbolKind::State && flags.admits_state(s)
            }));
        }

        if member_types.contains(MemberTypes::VARIABLE) && (is_script || is_struct) {
            members.extend(self.own_members(ty, |s| s.kind == SymbolKind::Variable));
        }

        members
    }

    fn own_members(&self, ty: TypeId, predicate: impl Fn(&Symbol) -> bool) -> Vec<SymbolId> {
        let Some(symbol) = self.symbol(self.types.get(ty).symbol) else {
            return Vec::new();
        };
        symbol
            .members
            .iter()
            .filter_map(|m| self.symbol(*m))
            .filter(|m| predicate(*m))
            .map(|m| m.id)
            .collect()
    }

    fn hierarchy_members(
        &mut self,
        ty: TypeId,
        flags: LookupFlags,
        predicate: impl Fn(&Symbol) -> bool,
    ) -> Vec<SymbolId> {
        if !self.types.is_script(ty) || flags.contains(LookupFlags::DECLARED_ONLY) {
            return self.own_members(ty, predicate);
        }

        let flatten = flags.contains(LookupFlags::FLATTEN_HIERARCHY);
        let mut seen_names = FxHashSet::default();
        let mut members = Vec::new();

        for script in self.script_hierarchy(ty) {
            for member in self.own_members(script, &predicate) {
                if flatten {
                    let Some(name) = self.symbol(member).map(|s| s.name.to_lowercase()) else {
                        continue;
                    };
                    if !seen_names.insert(name) {
                        continue;
                    }
                }
                members.push(member);
            }
        }

        members
    }

    // ========================================================================
    // Assignability
    // ========================================================================

    /// Whether a value of type `from` may be stored in a location of type
    /// `to`. Unknown types are never assignable.
    pub fn is_assignable(&mut self, to: Option<TypeId>, from: Option<TypeId>) -> bool {
        let (Some(to), Some(from)) = (to, from) else {
            return false;
        };
        let t = &self.types;

        if t.is_array(to) && t.is_array(from) {
            return true;
        }
        if to == from {
            return true;
        }
        if to == t.var_type || to == t.string_type || to == t.bool_type || to == t.int_type {
            return true;
        }
        if to == t.any_type || from == t.any_type {
            return true;
        }

        let primitive =
            |id: TypeId| id == t.float_type || id == t.int_type || id == t.string_type || id == t.bool_type;
        if primitive(to) && primitive(from) {
            return true;
        }

        if t.is_script(to) && t.is_script(from) {
            let target = t.get(to).fully_qualified_name.clone();
            return self
                .script_hierarchy(from)
                .into_iter()
                .any(|s| self.types.get(s).fully_qualified_name.eq_ignore_ascii_case(&target));
        }

        false
    }

    // ========================================================================
    // Symbol and expression helpers
    // ========================================================================

    /// Whether `symbol` was declared by a statement inside a body, and so is
    /// only visible after its declaration.
    pub fn variable_is_block_scoped(&self, symbol: SymbolId) -> bool {
        self.symbol(symbol)
            .and_then(|s| s.declaration)
            .is_some_and(|d| matches!(self.tree.kind(d), NodeKind::DeclareStatement { .. }))
    }

    /// The identifier an assignable expression names: `x` in `x` and in
    /// `a.x`.
    pub fn identifier_for_expression(&self, expression: NodeId) -> Option<NodeId> {
        match self.tree.kind(expression) {
            NodeKind::MemberAccessExpression { access, .. } => match self.tree.kind(*access) {
                NodeKind::IdentifierExpression { identifier } => Some(*identifier),
                _ => None,
            },
            NodeKind::IdentifierExpression { identifier } => Some(*identifier),
            _ => None,
        }
    }

    /// Whether an expression has a shape that can appear left of `=`.
    pub fn expression_is_assignable(&self, expression: NodeId) -> bool {
        match self.tree.kind(expression) {
            NodeKind::IdentifierExpression { .. } | NodeKind::ArrayIndexExpression { .. } => true,
            NodeKind::MemberAccessExpression { access, .. } => matches!(
                self.tree.kind(*access),
                NodeKind::IdentifierExpression { .. }
            ),
            _ => false,
        }
    }

    /// Whether the symbol an identifier resolves to may be written.
    pub fn identifier_is_writable(&mut self, identifier: NodeId) -> bool {
        let search = self.symbols_for_identifier(identifier);
        let Some(symbol) = search.symbols.first().and_then(|s| self.symbol(*s)) else {
            return false;
        };
        match symbol.kind {
            SymbolKind::Property => !(symbol.is_auto_read_only() || symbol.is_const()),
            SymbolKind::Variable => !symbol.is_const(),
            SymbolKind::Parameter => true,
            _ => false,
        }
    }

    /// The type a symbol declared without a syntax node was given.
    pub(crate) fn type_of_reference(&mut self, reference: &TypeReference) -> Option<TypeId> {
        let resolved = self.resolve_type(&reference.name, &[])?;
        if reference.is_array {
            let element = self.types.get(resolved).fully_qualified_name.clone();
            self.array_type_for(&element)
        } else {
            Some(resolved)
        }
    }
}
