//! The binder implementation.
//!
//! Creates symbols for every declaration in a script tree:
//! - script members in source order, followed by group properties and state
//!   functions/events so that member lookup sees them as script members
//! - function and event parameters, property accessors
//! - `DeclareStatement` locals found anywhere inside function, event and
//!   accessor bodies
//!
//! Each declaration is also registered, lower-cased, in the table of its
//! nearest container that has one. Scripts keep no local table of their own;
//! their members are reached through the script type.

use crate::symbol::{LocalTable, SymbolFlags, SymbolKind, SymbolTable, TypeReference};
use papyrus_ast::types::{LanguageFlags, NodeId, SymbolId};
use papyrus_ast::{visit_tree, LiteralValue, NodeKind, SyntaxTree, VisitControl};
use papyrus_diagnostics::{messages, DiagnosticCollection};

const UNKNOWN_NAME: &str = "<unknown>";

/// The binder creates symbols and links declarations.
pub struct Binder {
    symbols: SymbolTable,
    diagnostics: DiagnosticCollection,
}

impl Default for Binder {
    fn default() -> Self {
        Self::new()
    }
}

impl Binder {
    pub fn new() -> Self {
        Self {
            symbols: SymbolTable::new(),
            diagnostics: DiagnosticCollection::new(),
        }
    }

    /// Take diagnostics from the binder.
    pub fn take_diagnostics(&mut self) -> DiagnosticCollection {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn into_symbol_table(self) -> SymbolTable {
        self.symbols
    }

    /// Bind every script root of `tree`.
    pub fn bind_tree(&mut self, tree: &SyntaxTree) {
        for &root in tree.scripts() {
            self.bind_script(tree, root);
        }
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    /// Create the symbol for `node` and register it in the table selected
    /// by `table`. Returns the symbol and whether the declaration has a name;
    /// unnamed declarations are not registered and get no further binding.
    fn declare(
        &mut self,
        tree: &SyntaxTree,
        kind: SymbolKind,
        node: NodeId,
        identifier: NodeId,
        parent: Option<SymbolId>,
        table: LocalTable,
    ) -> (SymbolId, bool) {
        let name = tree.identifier_name(identifier).unwrap_or_default();
        let range = tree.range(node);

        if name.is_empty() {
            self.diagnostics
                .add_error(&messages::IDENTIFIER_EXPECTED, &[], range);
            let id = self.symbols.add(kind, UNKNOWN_NAME, parent);
            self.symbols.set_declaration(node, id);
            return (id, false);
        }

        let id = self.symbols.add(kind, name, parent);
        self.symbols.set_declaration(node, id);

        for ancestor in tree.ancestors(node) {
            let container_kind = tree.kind(ancestor);
            if !container_kind.is_container() {
                continue;
            }
            let has_table = match table {
                LocalTable::Locals => !matches!(container_kind, NodeKind::Script { .. }),
                LocalTable::States | LocalTable::CustomEvents => {
                    matches!(container_kind, NodeKind::Script { .. })
                }
                LocalTable::Unregistered => false,
            };
            if !has_table {
                continue;
            }
            if let Some(locals) = self.symbols.table_mut(table, ancestor) {
                let key = name.to_lowercase();
                if locals.contains_key(&key) {
                    self.diagnostics
                        .add_error(&messages::CANNOT_REDECLARE_0, &[name], range);
                } else {
                    locals.insert(key, id);
                }
            }
            break;
        }

        (id, true)
    }

    fn set_flags(&mut self, symbol: SymbolId, flags: SymbolFlags) {
        if let Some(s) = self.symbols.get_mut(symbol) {
            s.flags |= flags;
        }
    }

    fn type_reference(tree: &SyntaxTree, type_identifier: NodeId) -> Option<TypeReference> {
        match tree.kind(type_identifier) {
            NodeKind::TypeIdentifier { is_array, .. } => {
                let name = tree.identifier_name(type_identifier)?;
                Some(TypeReference::new(name, *is_array))
            }
            _ => None,
        }
    }

    // ========================================================================
    // Scripts
    // ========================================================================

    /// Bind one script root. Returns the script symbol.
    pub fn bind_script(&mut self, tree: &SyntaxTree, root: NodeId) -> Option<SymbolId> {
        let NodeKind::Script {
            header,
            imports,
            definitions,
        } = tree.kind(root)
        else {
            return None;
        };
        let NodeKind::ScriptHeader {
            identifier,
            extended,
            flags,
        } = tree.kind(*header)
        else {
            return None;
        };

        let (script, named) = self.declare(
            tree,
            SymbolKind::Script,
            root,
            *identifier,
            None,
            LocalTable::Locals,
        );
        if !named {
            return Some(script);
        }

        let name = tree.identifier_name(*identifier).unwrap_or_default();
        if !self.symbols.register_script(name, script) {
            tracing::debug!(script = name, "script name already bound, keeping first");
        }

        let mut members: Vec<SymbolId> = definitions
            .iter()
            .filter_map(|d| self.bind_definition(tree, *d, script))
            .collect();

        let nested: Vec<SymbolId> = members
            .iter()
            .filter_map(|m| self.symbols.get(*m))
            .filter(|m| m.kind == SymbolKind::Group)
            .flat_map(|g| g.members.clone())
            .chain(
                members
                    .iter()
                    .filter_map(|m| self.symbols.get(*m))
                    .filter(|m| m.kind == SymbolKind::State)
                    .flat_map(|s| s.members.clone()),
            )
            .collect();
        members.extend(nested);

        let import_symbols: Vec<SymbolId> = imports
            .iter()
            .filter_map(|i| self.bind_import(tree, *i, script))
            .collect();

        let extended_script = match extended.and_then(|e| tree.identifier_name(e)) {
            Some(extended) => Some(extended.to_string()),
            None if !name.eq_ignore_ascii_case("ScriptObject") => Some("ScriptObject".to_string()),
            None => None,
        };

        let mut script_flags = SymbolFlags::NONE;
        if flags.contains(LanguageFlags::NATIVE) {
            script_flags |= SymbolFlags::NATIVE;
        }
        if flags.contains(LanguageFlags::CONST) {
            script_flags |= SymbolFlags::CONST;
        }

        if let Some(symbol) = self.symbols.get_mut(script) {
            symbol.members = members;
            symbol.imports = import_symbols;
            symbol.extended_script = extended_script;
            symbol.flags |= script_flags;
        }

        tracing::debug!(script = name, symbols = self.symbols.len(), "bound script");
        Some(script)
    }

    fn bind_import(&mut self, tree: &SyntaxTree, node: NodeId, script: SymbolId) -> Option<SymbolId> {
        let NodeKind::Import { identifier } = tree.kind(node) else {
            return None;
        };
        let (symbol, named) = self.declare(
            tree,
            SymbolKind::Import,
            node,
            *identifier,
            Some(script),
            LocalTable::Locals,
        );
        if named {
            let imported = tree.identifier_name(*identifier).map(str::to_string);
            if let Some(s) = self.symbols.get_mut(symbol) {
                s.imported_script = imported;
            }
        }
        Some(symbol)
    }

    fn bind_definition(
        &mut self,
        tree: &SyntaxTree,
        node: NodeId,
        parent: SymbolId,
    ) -> Option<SymbolId> {
        match tree.kind(node) {
            NodeKind::VariableDefinition { .. } => self.bind_variable(tree, node, parent),
            NodeKind::PropertyDefinition { .. } => self.bind_property(tree, node, parent),
            NodeKind::FunctionDefinition { .. } => self.bind_function(tree, node, parent),
            NodeKind::EventDefinition { .. } => self.bind_event(tree, node, parent),
            NodeKind::CustomEventDefinition { identifier } => Some(
                self.declare(
                    tree,
                    SymbolKind::CustomEvent,
                    node,
                    *identifier,
                    Some(parent),
                    LocalTable::CustomEvents,
                )
                .0,
            ),
            NodeKind::GroupDefinition { .. } => self.bind_group(tree, node, parent),
            NodeKind::StateDefinition { .. } => self.bind_state(tree, node, parent),
            NodeKind::StructDefinition { .. } => self.bind_struct(tree, node, parent),
            _ => None,
        }
    }

    // ========================================================================
    // Members
    // ========================================================================

    fn bind_variable(&mut self, tree: &SyntaxTree, node: NodeId, parent: SymbolId) -> Option<SymbolId> {
        let NodeKind::VariableDefinition {
            type_identifier,
            identifier,
            flags,
            ..
        } = tree.kind(node)
        else {
            return None;
        };
        let (symbol, named) = self.declare(
            tree,
            SymbolKind::Variable,
            node,
            *identifier,
            Some(parent),
            LocalTable::Locals,
        );
        if named {
            let value_type = Self::type_reference(tree, *type_identifier);
            if let Some(s) = self.symbols.get_mut(symbol) {
                s.value_type = value_type;
            }
            if flags.contains(LanguageFlags::CONST) {
                self.set_flags(symbol, SymbolFlags::CONST);
            }
        }
        Some(symbol)
    }

    fn bind_property(&mut self, tree: &SyntaxTree, node: NodeId, parent: SymbolId) -> Option<SymbolId> {
        let NodeKind::PropertyDefinition {
            type_identifier,
            identifier,
            functions,
            flags,
            ..
        } = tree.kind(node)
        else {
            return None;
        };
        let (symbol, named) = self.declare(
            tree,
            SymbolKind::Property,
            node,
            *identifier,
            Some(parent),
            LocalTable::Locals,
        );
        if !named {
            return Some(symbol);
        }

        let accessor_named = |wanted: &str| {
            functions.iter().copied().find(|f| {
                Self::function_name(tree, *f).is_some_and(|n| n.eq_ignore_ascii_case(wanted))
            })
        };
        let getter_node = accessor_named("get");
        let setter_node = accessor_named("set");

        let getter = getter_node.and_then(|g| self.bind_function(tree, g, symbol));
        let setter = setter_node.and_then(|s| self.bind_function(tree, s, symbol));

        let read_only_accessors = getter.is_some() && setter.is_none();
        let mut property_flags = SymbolFlags::NONE;
        if read_only_accessors
            || flags.intersects(LanguageFlags::AUTO | LanguageFlags::AUTO_READ_ONLY)
        {
            property_flags |= SymbolFlags::AUTO;
        }
        if read_only_accessors || flags.contains(LanguageFlags::AUTO_READ_ONLY) {
            property_flags |= SymbolFlags::AUTO_READ_ONLY;
        }
        if read_only_accessors || flags.contains(LanguageFlags::CONST) {
            property_flags |= SymbolFlags::CONST;
        }

        let value_type = Self::type_reference(tree, *type_identifier);
        if let Some(s) = self.symbols.get_mut(symbol) {
            s.getter = getter;
            s.setter = setter;
            s.value_type = value_type;
            s.flags |= property_flags;
        }

        // Functions other than the accessors still get symbols.
        for function in functions {
            if Some(*function) != getter_node && Some(*function) != setter_node {
                self.bind_function(tree, *function, symbol);
            }
        }

        Some(symbol)
    }

    fn function_name(tree: &SyntaxTree, function: NodeId) -> Option<&str> {
        match tree.kind(function) {
            NodeKind::FunctionDefinition { header, .. } => match tree.kind(*header) {
                NodeKind::FunctionHeader { identifier, .. } => tree.identifier_name(*identifier),
                _ => None,
            },
            _ => None,
        }
    }

    fn bind_function(&mut self, tree: &SyntaxTree, node: NodeId, parent: SymbolId) -> Option<SymbolId> {
        let NodeKind::FunctionDefinition { header, statements } = tree.kind(node) else {
            return None;
        };
        let NodeKind::FunctionHeader {
            return_type,
            identifier,
            parameters,
            flags,
        } = tree.kind(*header)
        else {
            return None;
        };
        let (symbol, named) = self.declare(
            tree,
            SymbolKind::Function,
            node,
            *identifier,
            Some(parent),
            LocalTable::Locals,
        );
        if !named {
            return Some(symbol);
        }

        let mut function_flags = SymbolFlags::NONE;
        if flags.contains(LanguageFlags::GLOBAL) {
            function_flags |= SymbolFlags::GLOBAL;
        }
        if flags.contains(LanguageFlags::NATIVE) {
            function_flags |= SymbolFlags::NATIVE;
        }
        self.set_flags(symbol, function_flags);

        let params = self.bind_parameters(tree, *parameters, symbol);
        let value_type = return_type.and_then(|r| Self::type_reference(tree, r));
        if let Some(s) = self.symbols.get_mut(symbol) {
            s.parameters = params;
            s.value_type = value_type;
        }

        self.bind_block_locals(tree, statements, symbol);
        Some(symbol)
    }

    fn bind_event(&mut self, tree: &SyntaxTree, node: NodeId, parent: SymbolId) -> Option<SymbolId> {
        let NodeKind::EventDefinition { header, statements } = tree.kind(node) else {
            return None;
        };
        let NodeKind::EventHeader {
            identifier,
            parameters,
        } = tree.kind(*header)
        else {
            return None;
        };
        let (symbol, named) = self.declare(
            tree,
            SymbolKind::Event,
            node,
            *identifier,
            Some(parent),
            LocalTable::Unregistered,
        );
        if !named {
            return Some(symbol);
        }

        let params = self.bind_parameters(tree, *parameters, symbol);
        if let Some(s) = self.symbols.get_mut(symbol) {
            s.parameters = params;
        }
        self.bind_block_locals(tree, statements, symbol);
        Some(symbol)
    }

    fn bind_parameters(&mut self, tree: &SyntaxTree, list: NodeId, parent: SymbolId) -> Vec<SymbolId> {
        let NodeKind::FunctionParameters { parameters } = tree.kind(list) else {
            return Vec::new();
        };
        parameters
            .iter()
            .filter_map(|p| self.bind_parameter(tree, *p, parent))
            .collect()
    }

    fn bind_parameter(&mut self, tree: &SyntaxTree, node: NodeId, parent: SymbolId) -> Option<SymbolId> {
        let NodeKind::FunctionParameter {
            type_identifier,
            identifier,
            default_value,
            is_optional,
        } = tree.kind(node)
        else {
            return None;
        };
        let (symbol, named) = self.declare(
            tree,
            SymbolKind::Parameter,
            node,
            *identifier,
            Some(parent),
            LocalTable::Locals,
        );
        if named {
            let value_type = Self::type_reference(tree, *type_identifier);
            let default = default_value.and_then(|d| match tree.kind(d) {
                NodeKind::Literal(value) => Some(value.clone()),
                _ => None::<LiteralValue>,
            });
            if let Some(s) = self.symbols.get_mut(symbol) {
                s.value_type = value_type;
                s.default_value = default;
                if *is_optional {
                    s.flags |= SymbolFlags::OPTIONAL;
                }
            }
        }
        Some(symbol)
    }

    /// Declare a variable for every `DeclareStatement` at any depth below
    /// `statements`.
    fn bind_block_locals(&mut self, tree: &SyntaxTree, statements: &[NodeId], parent: SymbolId) {
        let mut declarations = Vec::new();
        for statement in statements {
            visit_tree(tree, *statement, |id| {
                if matches!(tree.kind(id), NodeKind::DeclareStatement { .. }) {
                    declarations.push(id);
                }
                VisitControl::Continue
            });
        }
        for node in declarations {
            self.bind_declare_statement(tree, node, parent);
        }
    }

    fn bind_declare_statement(&mut self, tree: &SyntaxTree, node: NodeId, parent: SymbolId) {
        let NodeKind::DeclareStatement {
            type_identifier,
            identifier,
            ..
        } = tree.kind(node)
        else {
            return;
        };
        let (symbol, named) = self.declare(
            tree,
            SymbolKind::Variable,
            node,
            *identifier,
            Some(parent),
            LocalTable::Locals,
        );
        if named {
            let value_type = Self::type_reference(tree, *type_identifier);
            if let Some(s) = self.symbols.get_mut(symbol) {
                s.value_type = value_type;
            }
        }
    }

    // ========================================================================
    // Groups, states, structs
    // ========================================================================

    fn bind_group(&mut self, tree: &SyntaxTree, node: NodeId, parent: SymbolId) -> Option<SymbolId> {
        let NodeKind::GroupDefinition {
            identifier,
            properties,
            ..
        } = tree.kind(node)
        else {
            return None;
        };
        let (symbol, named) = self.declare(
            tree,
            SymbolKind::Group,
            node,
            *identifier,
            Some(parent),
            LocalTable::Locals,
        );
        if named {
            let members: Vec<SymbolId> = properties
                .iter()
                .filter_map(|p| self.bind_property(tree, *p, symbol))
                .collect();
            if let Some(s) = self.symbols.get_mut(symbol) {
                s.members = members;
            }
        }
        Some(symbol)
    }

    fn bind_state(&mut self, tree: &SyntaxTree, node: NodeId, parent: SymbolId) -> Option<SymbolId> {
        let NodeKind::StateDefinition {
            identifier,
            is_auto,
            definitions,
        } = tree.kind(node)
        else {
            return None;
        };
        let (symbol, named) = self.declare(
            tree,
            SymbolKind::State,
            node,
            *identifier,
            Some(parent),
            LocalTable::States,
        );
        if named {
            let members: Vec<SymbolId> = definitions
                .iter()
                .filter_map(|d| self.bind_definition(tree, *d, symbol))
                .collect();
            if let Some(s) = self.symbols.get_mut(symbol) {
                s.members = members;
                if *is_auto {
                    s.flags |= SymbolFlags::AUTO;
                }
            }
        }
        Some(symbol)
    }

    fn bind_struct(&mut self, tree: &SyntaxTree, node: NodeId, parent: SymbolId) -> Option<SymbolId> {
        let NodeKind::StructDefinition {
            identifier,
            members,
        } = tree.kind(node)
        else {
            return None;
        };
        let (symbol, named) = self.declare(
            tree,
            SymbolKind::Struct,
            node,
            *identifier,
            Some(parent),
            LocalTable::Locals,
        );
        if named {
            let variables: Vec<SymbolId> = members
                .iter()
                .filter_map(|m| self.bind_variable(tree, *m, symbol))
                .collect();
            if let Some(s) = self.symbols.get_mut(symbol) {
                s.members = variables;
            }
        }
        Some(symbol)
    }
}
