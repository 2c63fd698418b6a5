//! Literal values and parameter roles used when wiring generated calls.

use crate::model::{ContractModel, ElementaryType, Parameter, TypeDescriptor};

/// A placeholder argument of the given type, used for constructor arguments
/// and attack calls. Struct-typed parameters have no generic literal and get
/// a zero-address cast that the user must replace.
pub fn default_value(ty: &TypeDescriptor) -> String {
    match ty {
        TypeDescriptor::Elementary(elementary) => match elementary {
            ElementaryType::Address { payable: true } => "payable(address(this))".to_string(),
            ElementaryType::Address { payable: false } => "address(this)".to_string(),
            ElementaryType::Bool => "false".to_string(),
            ElementaryType::String => "\"\"".to_string(),
            ElementaryType::Bytes => "\"\"".to_string(),
            ElementaryType::FixedBytes { size } => format!("bytes{}(0)", size),
            ElementaryType::Uint { .. } | ElementaryType::Int { .. } => "0".to_string(),
        },
        TypeDescriptor::Array { element, length } => {
            match length.as_deref().and_then(|l| l.parse::<usize>().ok()) {
                // Inline array literal; the first element fixes the element type.
                Some(n) if n > 0 => {
                    let first = format!("{}({})", element, default_value(element));
                    let rest = vec![default_value(element); n - 1];
                    let items: Vec<String> = std::iter::once(first).chain(rest).collect();
                    format!("[{}]", items.join(", "))
                }
                _ => format!("new {}[](0)", element),
            }
        }
        TypeDescriptor::UserDefined(name) => format!("{}(address(0))", name),
        TypeDescriptor::Mapping { .. } | TypeDescriptor::Function => "0".to_string(),
    }
}

/// Placeholder argument list for deploying `contract` with `new`.
pub fn constructor_arguments(contract: &ContractModel) -> String {
    contract
        .constructor()
        .map(|ctor| {
            ctor.parameters
                .iter()
                .map(|p| default_value(&p.ty))
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default()
}

/// Parameter types the handler can take straight from the fuzzer.
pub fn is_fuzzable(ty: &TypeDescriptor) -> bool {
    match ty {
        TypeDescriptor::Elementary(_) => true,
        TypeDescriptor::Array { element, .. } => {
            matches!(element.as_ref(), TypeDescriptor::Elementary(_))
        }
        _ => false,
    }
}

/// Declared type text for a handler parameter, with a data location for
/// reference types.
pub fn parameter_declaration(ty: &TypeDescriptor, name: &str) -> String {
    if ty.is_reference() {
        format!("{} memory {}", ty, name)
    } else {
        format!("{} {}", ty, name)
    }
}

const AMOUNT_NAMES: &[&str] = &["amount", "value", "wad", "shares", "assets", "qty", "quantity"];
const SENDER_NAMES: &[&str] = &["from", "sender", "src", "owner"];
const RECIPIENT_NAMES: &[&str] = &["to", "recipient", "dst", "receiver"];

fn normalized(name: &str) -> String {
    name.trim_start_matches('_').to_lowercase()
}

/// Index of the parameter that carries the moved amount: a uint256 with a
/// conventional name, else the first uint256.
pub fn amount_index(parameters: &[Parameter]) -> Option<usize> {
    parameters
        .iter()
        .position(|p| p.ty.is_uint256() && AMOUNT_NAMES.contains(&normalized(&p.name).as_str()))
        .or_else(|| parameters.iter().position(|p| p.ty.is_uint256()))
}

/// Index of an explicit source-account parameter (`transferFrom(from, ..)`).
pub fn sender_index(parameters: &[Parameter]) -> Option<usize> {
    parameters
        .iter()
        .position(|p| p.ty.is_address() && SENDER_NAMES.contains(&normalized(&p.name).as_str()))
}

/// Index of the receiving-account parameter: a conventional name, else the
/// first address that is not the sender.
pub fn recipient_index(parameters: &[Parameter]) -> Option<usize> {
    let sender = sender_index(parameters);
    parameters
        .iter()
        .position(|p| {
            p.ty.is_address() && RECIPIENT_NAMES.contains(&normalized(&p.name).as_str())
        })
        .or_else(|| {
            parameters
                .iter()
                .enumerate()
                .position(|(i, p)| p.ty.is_address() && Some(i) != sender)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(name: &str, ty: &str) -> Parameter {
        Parameter {
            name: name.to_string(),
            ty: TypeDescriptor::parse(ty),
            location: None,
        }
    }

    #[test]
    fn test_default_values() {
        assert_eq!(default_value(&TypeDescriptor::parse("uint8")), "0");
        assert_eq!(default_value(&TypeDescriptor::parse("address")), "address(this)");
        assert_eq!(default_value(&TypeDescriptor::parse("bytes32")), "bytes32(0)");
        assert_eq!(default_value(&TypeDescriptor::parse("uint256[]")), "new uint256[](0)");
        assert_eq!(default_value(&TypeDescriptor::parse("IERC20")), "IERC20(address(0))");
    }

    #[test]
    fn test_parameter_roles() {
        let transfer_from = vec![
            param("from", "address"),
            param("to", "address"),
            param("amount", "uint256"),
        ];
        assert_eq!(sender_index(&transfer_from), Some(0));
        assert_eq!(recipient_index(&transfer_from), Some(1));
        assert_eq!(amount_index(&transfer_from), Some(2));

        let odd = vec![param("id", "uint256"), param("who", "address")];
        assert_eq!(sender_index(&odd), None);
        assert_eq!(recipient_index(&odd), Some(1));
        assert_eq!(amount_index(&odd), Some(0));
    }

    #[test]
    fn test_fuzzable_and_declarations() {
        assert!(is_fuzzable(&TypeDescriptor::parse("string")));
        assert!(!is_fuzzable(&TypeDescriptor::parse("Order")));
        assert_eq!(
            parameter_declaration(&TypeDescriptor::parse("string"), "memo"),
            "string memory memo"
        );
    }
}
