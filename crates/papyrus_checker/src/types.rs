//! Type system representation.
//!
//! Types are stored in a TypeTable (type arena) and referenced by TypeId.
//! Identity is the id: two lookups that produce the same type produce the
//! same `TypeId`, so comparisons never look at structure.

use indexmap::IndexMap;
use papyrus_ast::types::{SymbolId, TypeId};
use papyrus_binder::{SymbolKind, SymbolTable};
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntrinsicKind {
    Float,
    Int,
    Bool,
    String,
    Var,
    Void,
    Any,
}

impl IntrinsicKind {
    pub const ALL: [IntrinsicKind; 7] = [
        IntrinsicKind::Float,
        IntrinsicKind::Int,
        IntrinsicKind::Bool,
        IntrinsicKind::String,
        IntrinsicKind::Var,
        IntrinsicKind::Void,
        IntrinsicKind::Any,
    ];

    pub fn name(self) -> &'static str {
        match self {
            IntrinsicKind::Float => "float",
            IntrinsicKind::Int => "int",
            IntrinsicKind::Bool => "bool",
            IntrinsicKind::String => "string",
            IntrinsicKind::Var => "var",
            IntrinsicKind::Void => "void",
            IntrinsicKind::Any => "any",
        }
    }
}

/// Names that resolve to the `string` type itself.
const STRING_ALIASES: [&str; 2] = ["customeventname", "scripteventname"];

/// A type.
#[derive(Debug, Clone)]
pub struct Type {
    pub id: TypeId,
    pub name: String,
    pub fully_qualified_name: String,
    /// The backing symbol. Every type has one.
    pub symbol: SymbolId,
    pub kind: TypeKind,
}

#[derive(Debug, Clone)]
pub enum TypeKind {
    Intrinsic(IntrinsicKind),
    /// A script object type. Maps lower-cased names of the structs the
    /// script declares directly to their types.
    Script {
        struct_types: IndexMap<String, TypeId>,
    },
    /// A struct, scoped to the script that declares it.
    Struct { parent_script: TypeId },
    /// An array type. The element type is kept by name and resolved on
    /// demand.
    Array { element_type_name: String },
}

/// The type arena of one checking session.
#[derive(Debug)]
pub struct TypeTable {
    types: Vec<Type>,
    intrinsics: FxHashMap<String, TypeId>,
    // Well-known types
    pub float_type: TypeId,
    pub int_type: TypeId,
    pub bool_type: TypeId,
    pub string_type: TypeId,
    pub var_type: TypeId,
    pub void_type: TypeId,
    pub any_type: TypeId,
}

impl TypeTable {
    /// Create the table with the intrinsic types. Their backing symbols are
    /// added to `symbols`.
    pub fn new(symbols: &mut SymbolTable) -> Self {
        let mut table = Self {
            types: Vec::with_capacity(64),
            intrinsics: FxHashMap::default(),
            float_type: TypeId(0),
            int_type: TypeId(1),
            bool_type: TypeId(2),
            string_type: TypeId(3),
            var_type: TypeId(4),
            void_type: TypeId(5),
            any_type: TypeId(6),
        };

        for kind in IntrinsicKind::ALL {
            let symbol = symbols.add(SymbolKind::Intrinsic, kind.name(), None);
            let id = table.add_type(kind.name(), kind.name(), symbol, TypeKind::Intrinsic(kind));
            table.intrinsics.insert(kind.name().to_string(), id);
        }
        for alias in STRING_ALIASES {
            table.intrinsics.insert(alias.to_string(), table.string_type);
        }

        table
    }

    /// Add a new type to the table and return its ID.
    pub fn add_type(
        &mut self,
        name: &str,
        fully_qualified_name: &str,
        symbol: SymbolId,
        kind: TypeKind,
    ) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(Type {
            id,
            name: name.to_string(),
            fully_qualified_name: fully_qualified_name.to_string(),
            symbol,
            kind,
        });
        id
    }

    /// Get a type by its ID.
    pub fn get(&self, id: TypeId) -> &Type {
        &self.types[id.index()]
    }

    pub(crate) fn set_struct_types(&mut self, script: TypeId, structs: IndexMap<String, TypeId>) {
        if let Some(Type {
            kind: TypeKind::Script { struct_types },
            ..
        }) = self.types.get_mut(script.index())
        {
            *struct_types = structs;
        }
    }

    /// Look up an intrinsic type (or alias) by name, case-insensitively.
    pub fn intrinsic(&self, name: &str) -> Option<TypeId> {
        self.intrinsics.get(&name.to_lowercase()).copied()
    }

    pub fn is_intrinsic(&self, id: TypeId) -> bool {
        matches!(self.get(id).kind, TypeKind::Intrinsic(_))
    }

    pub fn is_array(&self, id: TypeId) -> bool {
        matches!(self.get(id).kind, TypeKind::Array { .. })
    }

    pub fn is_script(&self, id: TypeId) -> bool {
        matches!(self.get(id).kind, TypeKind::Script { .. })
    }

    /// `float` or `int`.
    pub fn is_numeric(&self, id: TypeId) -> bool {
        id == self.float_type || id == self.int_type
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intrinsics_have_fixed_ids() {
        let mut symbols = SymbolTable::new();
        let table = TypeTable::new(&mut symbols);
        assert_eq!(table.len(), 7);
        assert_eq!(symbols.len(), 7);
        for kind in IntrinsicKind::ALL {
            let id = table.intrinsic(kind.name()).unwrap();
            assert_eq!(table.get(id).kind_name(), kind.name());
        }
        assert_eq!(table.intrinsic("INT"), Some(table.int_type));
    }

    #[test]
    fn test_string_aliases_are_the_string_type() {
        let mut symbols = SymbolTable::new();
        let table = TypeTable::new(&mut symbols);
        assert_eq!(table.intrinsic("CustomEventName"), Some(table.string_type));
        assert_eq!(table.intrinsic("ScriptEventName"), Some(table.string_type));
        assert_eq!(table.intrinsic("Actor"), None);
    }

    impl Type {
        fn kind_name(&self) -> &str {
            match &self.kind {
                TypeKind::Intrinsic(k) => k.name(),
                _ => "",
            }
        }
    }
}
