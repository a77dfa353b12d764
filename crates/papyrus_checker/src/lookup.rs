//! Member lookup filters.
//!
//! A lookup combines a [`MemberTypes`] mask (which member categories to
//! consider) with [`LookupFlags`] (which members of those categories pass).
//! Flags come in pairs; a member passes a pair when the flag matching its
//! own attribute is set.

use papyrus_ast::MemberTypes;
use papyrus_binder::{Symbol, SymbolKind};

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LookupFlags: u32 {
        const NONE              = 0;
        const AUTO              = 1 << 0;
        /// Only the type's own members, never inherited ones.
        const DECLARED_ONLY     = 1 << 1;
        /// Drop inherited members shadowed by a same-named member of a
        /// more derived script.
        const FLATTEN_HIERARCHY = 1 << 2;
        const GLOBAL            = 1 << 3;
        const INSTANCE          = 1 << 4;
        const NATIVE            = 1 << 6;
        const NON_NATIVE        = 1 << 7;
        const READ_ONLY         = 1 << 14;
        const WRITABLE          = 1 << 15;
        const NON_AUTO          = 1 << 16;

        const AUTO_READ_ONLY = Self::AUTO.bits() | Self::READ_ONLY.bits();
        const DEFAULT = Self::NON_AUTO.bits()
            | Self::AUTO.bits()
            | Self::READ_ONLY.bits()
            | Self::WRITABLE.bits()
            | Self::INSTANCE.bits()
            | Self::GLOBAL.bits()
            | Self::NATIVE.bits()
            | Self::NON_NATIVE.bits();
    }
}

impl LookupFlags {
    #[inline]
    fn either(self, a: LookupFlags, has_a: bool, b: LookupFlags, has_b: bool) -> bool {
        (self.contains(a) && has_a) || (self.contains(b) && has_b)
    }

    /// `GLOBAL` admits global members, `INSTANCE` the rest.
    pub fn admits_scope(self, is_global: bool) -> bool {
        self.either(Self::GLOBAL, is_global, Self::INSTANCE, !is_global)
    }

    pub fn admits_nativity(self, is_native: bool) -> bool {
        self.either(Self::NATIVE, is_native, Self::NON_NATIVE, !is_native)
    }

    pub fn admits_auto(self, is_auto: bool) -> bool {
        self.either(Self::AUTO, is_auto, Self::NON_AUTO, !is_auto)
    }

    pub fn admits_access(self, is_read_only: bool) -> bool {
        self.either(Self::READ_ONLY, is_read_only, Self::WRITABLE, !is_read_only)
    }

    pub fn admits_function(self, function: &Symbol) -> bool {
        self.admits_scope(function.is_global()) && self.admits_nativity(function.is_native())
    }

    /// Const properties count as read-only.
    pub fn admits_property(self, property: &Symbol) -> bool {
        self.admits_auto(property.is_auto())
            && self.admits_access(property.is_auto_read_only() || property.is_const())
    }

    pub fn admits_state(self, state: &Symbol) -> bool {
        self.admits_auto(state.is_auto())
    }
}

/// The member category a symbol kind belongs to. Parameters are looked up
/// as variables.
pub fn member_types_of_kind(kind: SymbolKind) -> MemberTypes {
    match kind {
        SymbolKind::CustomEvent => MemberTypes::CUSTOM_EVENT,
        SymbolKind::Event => MemberTypes::EVENT,
        SymbolKind::Function => MemberTypes::FUNCTION,
        SymbolKind::Group => MemberTypes::GROUP,
        SymbolKind::Property => MemberTypes::PROPERTY,
        SymbolKind::State => MemberTypes::STATE,
        SymbolKind::Variable | SymbolKind::Parameter => MemberTypes::VARIABLE,
        SymbolKind::Struct => MemberTypes::STRUCT,
        SymbolKind::Script | SymbolKind::Import | SymbolKind::Intrinsic => MemberTypes::NONE,
    }
}
