//! Identifier handles and flag sets shared by the syntax tree, the binder
//! and the checker.

bitflags::bitflags! {
    /// Modifier keywords that can appear on a declaration.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct LanguageFlags: u32 {
        const NONE           = 0;
        const AUTO           = 1 << 0;
        const AUTO_READ_ONLY = 1 << 1;
        const BETA_ONLY      = 1 << 2;
        const CONST          = 1 << 3;
        const DEBUG_ONLY     = 1 << 4;
        const GLOBAL         = 1 << 5;
        const NATIVE         = 1 << 6;
    }
}

bitflags::bitflags! {
    /// Kinds of members a lookup is interested in.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MemberTypes: u32 {
        const NONE         = 0;
        const CUSTOM_EVENT = 1 << 0;
        const EVENT        = 1 << 1;
        const FUNCTION     = 1 << 2;
        const GROUP        = 1 << 3;
        const PROPERTY     = 1 << 4;
        const STATE        = 1 << 5;
        const VARIABLE     = 1 << 6;
        const STRUCT       = 1 << 7;
        const ALL = Self::CUSTOM_EVENT.bits()
            | Self::EVENT.bits()
            | Self::FUNCTION.bits()
            | Self::GROUP.bits()
            | Self::PROPERTY.bits()
            | Self::STATE.bits()
            | Self::VARIABLE.bits()
            | Self::STRUCT.bits();
    }
}

impl MemberTypes {
    /// The mask used where no enclosing node narrows the scope.
    pub fn default_scope() -> Self {
        MemberTypes::ALL - MemberTypes::GROUP - MemberTypes::STATE
    }
}

/// Index of a node in a [`SyntaxTree`](crate::SyntaxTree).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const INVALID: NodeId = NodeId(u32::MAX);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Symbol ID for referencing symbols in a symbol table.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct SymbolId(pub u32);

impl SymbolId {
    pub const INVALID: SymbolId = SymbolId(u32::MAX);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Type ID for referencing types in a type table.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct TypeId(pub u32);

impl TypeId {
    pub const INVALID: TypeId = TypeId(u32::MAX);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
