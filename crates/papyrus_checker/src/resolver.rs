//! Script lookup across a program.

use papyrus_ast::types::SymbolId;
use papyrus_binder::SymbolTable;

/// Finds scripts by name. Every script name the checker resolves goes
/// through this trait.
pub trait ScriptResolver {
    /// The symbol of the script named `name`, compared case-insensitively.
    fn script_symbol(&self, name: &str) -> Option<SymbolId>;

    /// Every known script name.
    fn script_names(&self) -> Vec<&str>;
}

impl ScriptResolver for SymbolTable {
    fn script_symbol(&self, name: &str) -> Option<SymbolId> {
        self.script(name)
    }

    fn script_names(&self) -> Vec<&str> {
        SymbolTable::script_names(self).collect()
    }
}
