//! Built-in members of array types.
//!
//! Every array type is backed by a synthetic script symbol carrying the
//! same fixed member list, with the element type substituted for `T`.

use papyrus_ast::types::SymbolId;
use papyrus_ast::LiteralValue;
use papyrus_binder::{SymbolFlags, SymbolKind, SymbolTable, TypeReference};

/// Stands for the element type in member signatures.
const ELEMENT: &str = "T";

struct ParameterTemplate {
    type_name: &'static str,
    name: &'static str,
    default: Option<i64>,
}

struct FunctionTemplate {
    return_type: Option<&'static str>,
    name: &'static str,
    parameters: &'static [ParameterTemplate],
}

const fn required(type_name: &'static str, name: &'static str) -> ParameterTemplate {
    ParameterTemplate {
        type_name,
        name,
        default: None,
    }
}

const fn optional(type_name: &'static str, name: &'static str, default: i64) -> ParameterTemplate {
    ParameterTemplate {
        type_name,
        name,
        default: Some(default),
    }
}

const FUNCTIONS: &[FunctionTemplate] = &[
    FunctionTemplate {
        return_type: None,
        name: "Clear",
        parameters: &[],
    },
    FunctionTemplate {
        return_type: None,
        name: "Add",
        parameters: &[required(ELEMENT, "akElement"), optional("int", "aiCount", 1)],
    },
    FunctionTemplate {
        return_type: None,
        name: "Insert",
        parameters: &[required(ELEMENT, "akElement"), required("int", "aiLocation")],
    },
    FunctionTemplate {
        return_type: None,
        name: "Remove",
        parameters: &[required("int", "aiLocation"), optional("int", "aiCount", 1)],
    },
    FunctionTemplate {
        return_type: None,
        name: "RemoveLast",
        parameters: &[],
    },
    FunctionTemplate {
        return_type: Some("int"),
        name: "Find",
        parameters: &[
            required(ELEMENT, "akElement"),
            optional("int", "aiStartIndex", 0),
        ],
    },
    FunctionTemplate {
        return_type: Some("int"),
        name: "FindStruct",
        parameters: &[
            required("string", "asVarName"),
            required("var", "akElement"),
            optional("int", "aiStartIndex", 0),
        ],
    },
    FunctionTemplate {
        return_type: Some("int"),
        name: "RFind",
        parameters: &[
            required(ELEMENT, "akElement"),
            optional("int", "aiStartIndex", -1),
        ],
    },
    FunctionTemplate {
        return_type: Some("int"),
        name: "RFindStruct",
        parameters: &[
            required("string", "asVarName"),
            required("var", "akElement"),
            optional("int", "aiStartIndex", -1),
        ],
    },
];

fn substitute(type_name: &str, element_type_name: &str) -> TypeReference {
    if type_name == ELEMENT {
        TypeReference::new(element_type_name, false)
    } else {
        TypeReference::new(type_name, false)
    }
}

/// Create the backing symbol of `{element_type_name}[]` and its members.
pub(crate) fn create_array_symbol(symbols: &mut SymbolTable, element_type_name: &str) -> SymbolId {
    let array = symbols.add(
        SymbolKind::Script,
        &format!("{}[]", element_type_name),
        None,
    );

    let mut members = Vec::with_capacity(FUNCTIONS.len() + 1);
    for template in FUNCTIONS {
        let function = symbols.add(SymbolKind::Function, template.name, Some(array));
        let mut parameters = Vec::with_capacity(template.parameters.len());
        for p in template.parameters {
            let parameter = symbols.add(SymbolKind::Parameter, p.name, Some(function));
            if let Some(symbol) = symbols.get_mut(parameter) {
                symbol.value_type = Some(substitute(p.type_name, element_type_name));
                if let Some(default) = p.default {
                    symbol.flags |= SymbolFlags::OPTIONAL;
                    symbol.default_value = Some(LiteralValue::Int(default));
                }
            }
            parameters.push(parameter);
        }
        if let Some(symbol) = symbols.get_mut(function) {
            symbol.flags |= SymbolFlags::NATIVE;
            symbol.parameters = parameters;
            symbol.value_type = template
                .return_type
                .map(|t| substitute(t, element_type_name));
        }
        members.push(function);
    }

    let length = symbols.add(SymbolKind::Property, "Length", Some(array));
    if let Some(symbol) = symbols.get_mut(length) {
        symbol.flags |= SymbolFlags::AUTO | SymbolFlags::AUTO_READ_ONLY;
        symbol.value_type = Some(TypeReference::new("int", false));
    }
    members.push(length);

    if let Some(symbol) = symbols.get_mut(array) {
        symbol.flags |= SymbolFlags::GENERATED_ARRAY;
        symbol.members = members;
    }
    array
}
