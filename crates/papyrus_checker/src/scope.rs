//! Name lookup.
//!
//! An identifier is resolved either relative to a base expression (the `a`
//! in `a.b`) or lexically, by walking the container nodes around it from
//! the innermost outwards. At the script container the script type's
//! members are visible, together with the global functions and structs of
//! every imported script. A name found nowhere falls back to a global
//! type name.

use crate::checker::TypeChecker;
use crate::lookup::{member_types_of_kind, LookupFlags};
use papyrus_ast::types::{MemberTypes, NodeId, SymbolId, TypeId};
use papyrus_ast::NodeKind;
use papyrus_binder::SymbolKind;
use rustc_hash::FxHashSet;

/// Symbols found for a name, and the base expression they were found
/// relative to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolSearch {
    pub base_expression: Option<NodeId>,
    pub symbols: Vec<SymbolId>,
}

impl<'a> TypeChecker<'a> {
    /// Resolve the name an identifier node carries.
    pub fn symbols_for_identifier(&mut self, identifier: NodeId) -> SymbolSearch {
        let tree = self.tree;
        let name = tree.identifier_name(identifier).unwrap_or_default();

        let Some(base) = self.base_expression_for(identifier) else {
            return SymbolSearch {
                base_expression: None,
                symbols: self.matching_symbols_in_scope(identifier, name, LookupFlags::DEFAULT),
            };
        };

        let symbols = self
            .type_of_expression(base)
            .map(|ty| self.members_named(ty, name))
            .unwrap_or_default();

        SymbolSearch {
            base_expression: Some(base),
            symbols,
        }
    }

    /// Members named `name` of a base expression's type. Script and struct
    /// members are searched from the type's declaration; array members come
    /// from the array's built-in member list.
    pub(crate) fn members_named(&mut self, ty: TypeId, name: &str) -> Vec<SymbolId> {
        let symbol = self.types().get(ty).symbol;
        let declaration = match self.symbol(symbol) {
            Some(s) if s.kind == SymbolKind::Intrinsic => return Vec::new(),
            Some(s) => s.declaration,
            None => return Vec::new(),
        };

        match declaration {
            Some(declaration) => {
                self.matching_symbols_in_scope(declaration, name, LookupFlags::DEFAULT)
            }
            None => self
                .members_of(ty, MemberTypes::default_scope(), LookupFlags::DEFAULT)
                .into_iter()
                .filter(|m| {
                    self.symbol(*m)
                        .is_some_and(|s| s.name.eq_ignore_ascii_case(name))
                })
                .collect(),
        }
    }

    /// Symbols named `name` visible from `from`.
    pub fn matching_symbols_in_scope(
        &mut self,
        from: NodeId,
        name: &str,
        flags: LookupFlags,
    ) -> Vec<SymbolId> {
        let tree = self.tree;
        let script = tree.script_of(from).and_then(|root| self.symbol_of(root));

        if name.eq_ignore_ascii_case("self") {
            return script.into_iter().collect();
        }

        if name.eq_ignore_ascii_case("parent") {
            let extended = script
                .and_then(|s| self.symbol(s))
                .and_then(|s| s.extended_script.clone());
            return extended
                .and_then(|e| self.resolver.script_symbol(&e))
                .into_iter()
                .collect();
        }

        let member_types = self.member_types_for_scope(from);
        let search = self.available_symbols_at(from, member_types, flags);
        let matching: Vec<SymbolId> = search
            .symbols
            .into_iter()
            .filter(|s| {
                self.symbol(*s)
                    .is_some_and(|s| s.name.eq_ignore_ascii_case(name))
            })
            .collect();

        if !matching.is_empty() || search.base_expression.is_some() {
            return matching;
        }

        match self.resolve_type(name, &[]) {
            Some(ty) if !self.types().is_array(ty) => vec![self.types().get(ty).symbol],
            _ => Vec::new(),
        }
    }

    /// Every symbol visible at `node`. With a base expression these are the
    /// members of the base's type; a base naming a script directly gives
    /// its global members, any other base its instance members.
    pub fn available_symbols_at(
        &mut self,
        node: NodeId,
        member_types: MemberTypes,
        flags: LookupFlags,
    ) -> SymbolSearch {
        let Some(base) = self.base_expression_for(node) else {
            return SymbolSearch {
                base_expression: None,
                symbols: self.local_symbols_in_scope(node, member_types, flags),
            };
        };

        let flags = if self.is_member_access_base_static(node) {
            flags - LookupFlags::INSTANCE
        } else {
            flags - LookupFlags::GLOBAL
        };

        let symbols = match self.type_of_expression(base) {
            Some(ty) if !self.types().is_intrinsic(ty) => {
                let member_types = self.member_types_for_scope(node);
                self.members_of(ty, member_types, flags)
            }
            _ => Vec::new(),
        };

        SymbolSearch {
            base_expression: Some(base),
            symbols,
        }
    }

    /// Whether `node` is accessed through a base naming a script type, as in
    /// `Debug.Trace()`.
    pub fn is_member_access_base_static(&mut self, node: NodeId) -> bool {
        let tree = self.tree;
        let Some(base) = self.base_expression_for(node) else {
            return false;
        };
        let NodeKind::IdentifierExpression { identifier } = tree.kind(base) else {
            return false;
        };
        let name = tree.identifier_name(*identifier).unwrap_or_default();

        let search = self.symbols_for_identifier(*identifier);
        search
            .symbols
            .first()
            .and_then(|s| self.symbol(*s))
            .is_some_and(|s| s.kind == SymbolKind::Script && s.name.eq_ignore_ascii_case(name))
    }

    /// Symbols declared in the containers around `from`, innermost first.
    pub fn local_symbols_in_scope(
        &mut self,
        from: NodeId,
        member_types: MemberTypes,
        flags: LookupFlags,
    ) -> Vec<SymbolId> {
        let tree = self.tree;
        let mut symbols = Vec::new();

        let containers: Vec<NodeId> = tree
            .ancestors_inclusive(from)
            .filter(|a| tree.kind(*a).is_container())
            .collect();

        for container in containers {
            let mut seen = FxHashSet::default();

            if matches!(tree.kind(container), NodeKind::Script { .. }) {
                if let Some(script) = self.symbol_of(container) {
                    self.script_scope_symbols(script, member_types, flags, &mut seen, &mut symbols);
                }
            }

            if !flags.contains(LookupFlags::INSTANCE) {
                continue;
            }
            let Some(locals) = self.locals_of(container) else {
                continue;
            };
            for local in locals {
                let Some(symbol) = self.symbol(local) else {
                    continue;
                };
                if seen.contains(&symbol.fully_qualified_name.to_lowercase()) {
                    continue;
                }
                if member_types.intersects(member_types_of_kind(symbol.kind)) {
                    symbols.push(local);
                }
            }
        }

        symbols
    }

    /// The script's own members, then the global functions and structs of
    /// its imports.
    fn script_scope_symbols(
        &mut self,
        script: SymbolId,
        member_types: MemberTypes,
        flags: LookupFlags,
        seen: &mut FxHashSet<String>,
        out: &mut Vec<SymbolId>,
    ) {
        if let Some(script_type) = self.type_of_symbol(script) {
            for member in self.members_of(script_type, member_types, flags) {
                self.push_tracked(member, seen, out);
            }
        }

        let imports: Vec<String> = self
            .symbol(script)
            .map(|s| {
                s.imports
                    .iter()
                    .filter_map(|i| self.symbol(*i))
                    .filter_map(|i| i.imported_script.clone())
                    .collect()
            })
            .unwrap_or_default();

        let import_member_types = (MemberTypes::FUNCTION & member_types) | MemberTypes::STRUCT;
        let import_flags = LookupFlags::GLOBAL | LookupFlags::NATIVE | LookupFlags::NON_NATIVE;
        for import in imports {
            let Some(imported) = self.resolve_type(&import, &[]) else {
                continue;
            };
            for member in self.members_of(imported, import_member_types, import_flags) {
                self.push_tracked(member, seen, out);
            }
        }
    }

    fn push_tracked(&self, member: SymbolId, seen: &mut FxHashSet<String>, out: &mut Vec<SymbolId>) {
        if let Some(symbol) = self.symbol(member) {
            seen.insert(symbol.fully_qualified_name.to_lowercase());
        }
        out.push(member);
    }

    fn locals_of(&self, container: NodeId) -> Option<Vec<SymbolId>> {
        self.symbols
            .locals(container)
            .map(|locals| locals.values().copied().collect())
    }

    /// The member categories visible at `node`: the nearest annotation on
    /// the node or its ancestors, or everything but groups and states.
    pub fn member_types_for_scope(&self, node: NodeId) -> MemberTypes {
        let tree = self.tree;
        tree.ancestors_inclusive(node)
            .find_map(|a| tree.node(a).scope_member_types)
            .unwrap_or_else(MemberTypes::default_scope)
    }

    /// The base of the member access `node` is the accessed part of, if
    /// any. Call arguments are never accessed through the call's base.
    pub fn base_expression_for(&self, node: NodeId) -> Option<NodeId> {
        let tree = self.tree;
        for ancestor in tree.ancestors_inclusive(node) {
            match tree.kind(ancestor) {
                NodeKind::FunctionCallExpressionParameter { .. } => return None,
                NodeKind::MemberAccessExpression { base, .. }
                    if !tree.is_descendant_or_self(node, *base) =>
                {
                    return Some(*base);
                }
                _ => {}
            }
        }
        None
    }
}
