//! Symbol and symbol table definitions.

use indexmap::IndexMap;
use papyrus_ast::types::{NodeId, SymbolId};
use papyrus_ast::LiteralValue;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Script,
    Struct,
    Function,
    Property,
    Event,
    CustomEvent,
    Group,
    State,
    Variable,
    Parameter,
    Import,
    Intrinsic,
}

bitflags::bitflags! {
    /// Declaration modifiers recorded on a symbol.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SymbolFlags: u32 {
        const NONE            = 0;
        const GLOBAL          = 1 << 0;
        const NATIVE          = 1 << 1;
        const AUTO            = 1 << 2;
        const AUTO_READ_ONLY  = 1 << 3;
        const CONST           = 1 << 4;
        const OPTIONAL        = 1 << 5;
        /// The symbol backs a synthesized array type.
        const GENERATED_ARRAY = 1 << 6;
    }
}

/// A type as written in a declaration, before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeReference {
    pub name: String,
    pub is_array: bool,
}

impl TypeReference {
    pub fn new(name: impl Into<String>, is_array: bool) -> Self {
        Self {
            name: name.into(),
            is_array,
        }
    }
}

/// A named, kinded entity declared by a script or synthesized by the checker.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub id: SymbolId,
    pub kind: SymbolKind,
    pub name: String,
    pub parent: Option<SymbolId>,
    /// Parent's qualified name and this name joined by `:`.
    pub fully_qualified_name: String,
    /// The node that introduced the symbol. Synthetic symbols have none.
    pub declaration: Option<NodeId>,
    /// Script, struct, group and state members, in declaration order.
    pub members: Vec<SymbolId>,
    /// Function and event parameters.
    pub parameters: Vec<SymbolId>,
    /// Script imports.
    pub imports: Vec<SymbolId>,
    pub imported_script: Option<String>,
    pub extended_script: Option<String>,
    /// Declared type of variables, parameters and properties; return type
    /// of functions.
    pub value_type: Option<TypeReference>,
    pub default_value: Option<LiteralValue>,
    pub getter: Option<SymbolId>,
    pub setter: Option<SymbolId>,
    pub flags: SymbolFlags,
}

impl Symbol {
    pub fn new(id: SymbolId, kind: SymbolKind, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id,
            kind,
            fully_qualified_name: name.clone(),
            name,
            parent: None,
            declaration: None,
            members: Vec::new(),
            parameters: Vec::new(),
            imports: Vec::new(),
            imported_script: None,
            extended_script: None,
            value_type: None,
            default_value: None,
            getter: None,
            setter: None,
            flags: SymbolFlags::NONE,
        }
    }

    #[inline]
    pub fn is_global(&self) -> bool {
        self.flags.contains(SymbolFlags::GLOBAL)
    }

    #[inline]
    pub fn is_native(&self) -> bool {
        self.flags.contains(SymbolFlags::NATIVE)
    }

    #[inline]
    pub fn is_auto(&self) -> bool {
        self.flags.contains(SymbolFlags::AUTO)
    }

    #[inline]
    pub fn is_auto_read_only(&self) -> bool {
        self.flags.contains(SymbolFlags::AUTO_READ_ONLY)
    }

    #[inline]
    pub fn is_const(&self) -> bool {
        self.flags.contains(SymbolFlags::CONST)
    }

    #[inline]
    pub fn is_optional(&self) -> bool {
        self.flags.contains(SymbolFlags::OPTIONAL)
    }

    #[inline]
    pub fn is_generated_array(&self) -> bool {
        self.flags.contains(SymbolFlags::GENERATED_ARRAY)
    }
}

/// Which per-container table a declaration is registered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalTable {
    Locals,
    States,
    CustomEvents,
    /// Not registered anywhere (events).
    Unregistered,
}

/// An arena of symbols plus the lookup tables built while binding.
///
/// Ids are allocated from `base` upwards so that a second table can extend
/// an existing one without id collisions.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    base: u32,
    symbols: Vec<Symbol>,
    node_symbols: FxHashMap<NodeId, SymbolId>,
    locals: FxHashMap<NodeId, IndexMap<String, SymbolId>>,
    states: FxHashMap<NodeId, IndexMap<String, SymbolId>>,
    custom_events: FxHashMap<NodeId, IndexMap<String, SymbolId>>,
    /// Script symbols keyed by lower-cased script name.
    scripts: IndexMap<String, SymbolId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// A table whose first symbol gets id `base`.
    pub fn with_base(base: u32) -> Self {
        Self {
            base,
            ..Self::default()
        }
    }

    /// The id the next added symbol will receive.
    pub fn next_id(&self) -> SymbolId {
        SymbolId(self.base + self.symbols.len() as u32)
    }

    /// Whether `id` was allocated by this table.
    pub fn owns(&self, id: SymbolId) -> bool {
        id.0 >= self.base && ((id.0 - self.base) as usize) < self.symbols.len()
    }

    /// Create a symbol under `parent` and return its id.
    pub fn add(&mut self, kind: SymbolKind, name: &str, parent: Option<SymbolId>) -> SymbolId {
        let id = self.next_id();
        let mut symbol = Symbol::new(id, kind, name);
        if let Some(parent_symbol) = parent.and_then(|p| self.get(p)) {
            symbol.fully_qualified_name =
                format!("{}:{}", parent_symbol.fully_qualified_name, name);
        }
        symbol.parent = parent;
        self.symbols.push(symbol);
        id
    }

    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        if id.0 < self.base {
            return None;
        }
        self.symbols.get((id.0 - self.base) as usize)
    }

    pub fn get_mut(&mut self, id: SymbolId) -> Option<&mut Symbol> {
        if id.0 < self.base {
            return None;
        }
        self.symbols.get_mut((id.0 - self.base) as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Record that `node` declares `symbol`.
    pub fn set_declaration(&mut self, node: NodeId, symbol: SymbolId) {
        self.node_symbols.insert(node, symbol);
        if let Some(s) = self.get_mut(symbol) {
            s.declaration = Some(node);
        }
    }

    /// The symbol declared by `node`, if any.
    pub fn symbol_of(&self, node: NodeId) -> Option<SymbolId> {
        self.node_symbols.get(&node).copied()
    }

    /// The local table of a container node.
    pub fn locals(&self, container: NodeId) -> Option<&IndexMap<String, SymbolId>> {
        self.locals.get(&container)
    }

    pub fn states(&self, script: NodeId) -> Option<&IndexMap<String, SymbolId>> {
        self.states.get(&script)
    }

    pub fn custom_events(&self, script: NodeId) -> Option<&IndexMap<String, SymbolId>> {
        self.custom_events.get(&script)
    }

    pub(crate) fn table_mut(
        &mut self,
        table: LocalTable,
        container: NodeId,
    ) -> Option<&mut IndexMap<String, SymbolId>> {
        let tables = match table {
            LocalTable::Locals => &mut self.locals,
            LocalTable::States => &mut self.states,
            LocalTable::CustomEvents => &mut self.custom_events,
            LocalTable::Unregistered => return None,
        };
        Some(tables.entry(container).or_default())
    }

    /// Register a script symbol under its name. The first script bound
    /// under a name keeps it.
    pub fn register_script(&mut self, name: &str, symbol: SymbolId) -> bool {
        let key = name.to_lowercase();
        if self.scripts.contains_key(&key) {
            return false;
        }
        self.scripts.insert(key, symbol);
        true
    }

    /// Find a script symbol by name, case-insensitively.
    pub fn script(&self, name: &str) -> Option<SymbolId> {
        self.scripts.get(&name.to_lowercase()).copied()
    }

    /// Names of every bound script, in binding order.
    pub fn script_names(&self) -> impl Iterator<Item = &str> {
        self.scripts
            .values()
            .filter_map(|id| self.get(*id))
            .map(|s| s.name.as_str())
    }
}
