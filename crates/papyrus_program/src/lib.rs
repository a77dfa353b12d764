//! papyrus_program: Program orchestration.
//!
//! A [`Program`] owns a project's syntax tree and the symbols bound from it,
//! indexes its scripts by name and checks one or all of them. Every check
//! runs in its own [`TypeChecker`] session, so scripts are checked in
//! parallel.

use indexmap::IndexMap;
use papyrus_ast::{NodeId, SymbolId, SyntaxTree};
use papyrus_binder::{Binder, SymbolTable};
use papyrus_checker::{ScriptResolver, TypeChecker};
use papyrus_core::NameParts;
use papyrus_diagnostics::DiagnosticCollection;
use papyrus_options::ProjectConfig;
use rayon::prelude::*;

/// A script of the program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptEntry {
    pub name: String,
    pub root: NodeId,
    pub symbol: SymbolId,
    /// The file the script's diagnostics are reported against.
    pub file_name: String,
}

/// The file a script is read from: namespaces become folders.
pub fn script_file_name(name: &str) -> String {
    let parts = NameParts::parse(name);
    if parts.namespace.is_empty() {
        format!("{}.psc", parts.name)
    } else {
        format!("{}/{}.psc", parts.namespace.replace(':', "/"), parts.name)
    }
}

/// The program represents every script of a project.
pub struct Program {
    pub config: ProjectConfig,
    tree: SyntaxTree,
    symbols: SymbolTable,
    /// Scripts keyed by lower-cased name, in tree order.
    scripts: IndexMap<String, ScriptEntry>,
    bind_diagnostics: DiagnosticCollection,
}

impl Program {
    /// Bind every script of `tree`. A script whose name is already taken
    /// is bound but not indexed.
    pub fn new(config: ProjectConfig, tree: SyntaxTree) -> Self {
        let mut binder = Binder::new();
        let mut scripts = IndexMap::new();
        let mut bind_diagnostics = DiagnosticCollection::new();

        for &root in tree.scripts() {
            let symbol = binder.bind_script(&tree, root);
            let name = tree.script_name(root).unwrap_or_default().to_string();
            let file_name = script_file_name(&name);

            let mut diagnostics = binder.take_diagnostics();
            diagnostics.assign_file(&file_name);
            bind_diagnostics.extend(diagnostics);

            let Some(symbol) = symbol else {
                continue;
            };
            if name.is_empty() {
                continue;
            }
            let key = name.to_lowercase();
            if scripts.contains_key(&key) {
                tracing::debug!(script = %name, "duplicate script name, keeping first");
                continue;
            }
            scripts.insert(
                key,
                ScriptEntry {
                    name,
                    root,
                    symbol,
                    file_name,
                },
            );
        }

        tracing::debug!(scripts = scripts.len(), "program bound");
        Self {
            config,
            tree,
            symbols: binder.into_symbol_table(),
            scripts,
            bind_diagnostics,
        }
    }

    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Diagnostics reported while binding.
    pub fn bind_diagnostics(&self) -> &DiagnosticCollection {
        &self.bind_diagnostics
    }

    pub fn script(&self, name: &str) -> Option<&ScriptEntry> {
        self.scripts.get(&name.to_lowercase())
    }

    pub fn scripts(&self) -> impl Iterator<Item = &ScriptEntry> {
        self.scripts.values()
    }

    /// A fresh query session over the whole program.
    pub fn type_checker(&self) -> TypeChecker<'_> {
        TypeChecker::new(&self.tree, &self.symbols, self)
    }

    /// Validate one script. Returns `None` for an unknown script name.
    #[tracing::instrument(skip(self))]
    pub fn check_script(&self, name: &str) -> Option<DiagnosticCollection> {
        let entry = self.script(name)?;
        Some(self.check_entry(entry))
    }

    /// Validate every script, in parallel. The result includes the binding
    /// diagnostics and is sorted by file and position.
    #[tracing::instrument(skip(self), fields(scripts = self.scripts.len()))]
    pub fn check_all(&self) -> DiagnosticCollection {
        let entries: Vec<&ScriptEntry> = self.scripts.values().collect();
        let results: Vec<DiagnosticCollection> = entries
            .par_iter()
            .map(|entry| self.check_entry(entry))
            .collect();

        let mut all = self.bind_diagnostics.clone();
        for diagnostics in results {
            all.extend(diagnostics);
        }
        all.sort();
        all
    }

    fn check_entry(&self, entry: &ScriptEntry) -> DiagnosticCollection {
        let mut checker = self.type_checker();
        let mut diagnostics = DiagnosticCollection::new();
        checker.check_types_and_references(entry.root, &mut diagnostics);
        diagnostics.assign_file(&entry.file_name);
        tracing::debug!(
            script = %entry.name,
            diagnostics = diagnostics.len(),
            types = checker.types().len(),
            "checked script"
        );
        diagnostics
    }
}

impl ScriptResolver for Program {
    fn script_symbol(&self, name: &str) -> Option<SymbolId> {
        self.script(name).map(|entry| entry.symbol)
    }

    fn script_names(&self) -> Vec<&str> {
        self.scripts.values().map(|entry| entry.name.as_str()).collect()
    }
}
