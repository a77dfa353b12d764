//! Namespaced script names.
//!
//! Script names use `:` as the namespace separator (`Quests:Main:Stage`).
//! Struct types are addressed the same way, with the declaring script as
//! the namespace (`Quests:Main:StageInfo`).

/// A full name split at its last `:`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameParts<'a> {
    pub full_name: &'a str,
    /// Everything before the last separator; empty for a bare name.
    pub namespace: &'a str,
    pub name: &'a str,
}

impl<'a> NameParts<'a> {
    pub fn parse(full_name: &'a str) -> Self {
        match full_name.rfind(':') {
            Some(idx) => Self {
                full_name,
                namespace: &full_name[..idx],
                name: &full_name[idx + 1..],
            },
            None => Self {
                full_name,
                namespace: "",
                name: full_name,
            },
        }
    }
}

/// Join a namespace and a name with the separator.
pub fn qualify(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        return name.to_string();
    }
    format!("{}:{}", namespace, name)
}
