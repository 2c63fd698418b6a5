//! Semantic type descriptors parsed from Solidity type text.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ElementaryType {
    Address { payable: bool },
    Bool,
    String,
    Bytes,
    FixedBytes { size: u16 },
    Uint { bits: u16 },
    Int { bits: u16 },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TypeDescriptor {
    Elementary(ElementaryType),
    Mapping {
        key: Box<TypeDescriptor>,
        value: Box<TypeDescriptor>,
    },
    Array {
        element: Box<TypeDescriptor>,
        length: Option<String>,
    },
    UserDefined(String),
    Function,
}

impl TypeDescriptor {
    /// Parses type text as it appears in source (`mapping(address => uint256)`,
    /// `uint[]`, `address payable`, `IERC20`). Shapes that are not recognized
    /// fall back to `UserDefined` so the caller never fails.
    pub fn parse(text: &str) -> Self {
        let compact = normalize(text);
        parse_type(&compact)
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, Self::Mapping { .. })
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array { .. })
    }

    /// `string` and `bytes` are dynamically sized like arrays.
    pub fn is_dynamic_bytes(&self) -> bool {
        matches!(
            self,
            Self::Elementary(ElementaryType::String) | Self::Elementary(ElementaryType::Bytes)
        )
    }

    /// Types that need an explicit data location when used as parameters.
    pub fn is_reference(&self) -> bool {
        self.is_array() || self.is_dynamic_bytes()
    }

    pub fn is_uint(&self) -> bool {
        matches!(self, Self::Elementary(ElementaryType::Uint { .. }))
    }

    pub fn is_uint256(&self) -> bool {
        matches!(self, Self::Elementary(ElementaryType::Uint { bits: 256 }))
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Elementary(ElementaryType::Uint { .. }) | Self::Elementary(ElementaryType::Int { .. })
        )
    }

    pub fn is_address(&self) -> bool {
        matches!(self, Self::Elementary(ElementaryType::Address { .. }))
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Elementary(ElementaryType::Bool))
    }

    /// Value types that fit in a single topic when indexed.
    pub fn is_indexable_primitive(&self) -> bool {
        matches!(
            self,
            Self::Elementary(ElementaryType::Address { .. })
                | Self::Elementary(ElementaryType::Bool)
                | Self::Elementary(ElementaryType::Uint { .. })
                | Self::Elementary(ElementaryType::Int { .. })
                | Self::Elementary(ElementaryType::FixedBytes { .. })
        )
    }

    pub fn mapping_types(&self) -> Option<(&TypeDescriptor, &TypeDescriptor)> {
        match self {
            Self::Mapping { key, value } => Some((key, value)),
            _ => None,
        }
    }
}

impl fmt::Display for ElementaryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address { payable: true } => write!(f, "address payable"),
            Self::Address { payable: false } => write!(f, "address"),
            Self::Bool => write!(f, "bool"),
            Self::String => write!(f, "string"),
            Self::Bytes => write!(f, "bytes"),
            Self::FixedBytes { size } => write!(f, "bytes{}", size),
            Self::Uint { bits } => write!(f, "uint{}", bits),
            Self::Int { bits } => write!(f, "int{}", bits),
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Elementary(e) => write!(f, "{}", e),
            Self::Mapping { key, value } => write!(f, "mapping({} => {})", key, value),
            Self::Array { element, length } => {
                write!(f, "{}[{}]", element, length.as_deref().unwrap_or(""))
            }
            Self::UserDefined(name) => write!(f, "{}", name),
            Self::Function => write!(f, "function"),
        }
    }
}

/// Collapses whitespace runs to single spaces and drops spaces that touch
/// punctuation, so `mapping (address=>uint)` and `mapping(address => uint)`
/// parse identically.
fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for ch in text.trim().chars() {
        if ch.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space {
            let prev_is_word = out
                .chars()
                .last()
                .map(|c| c.is_alphanumeric() || c == '_')
                .unwrap_or(false);
            if prev_is_word && (ch.is_alphanumeric() || ch == '_') {
                out.push(' ');
            }
            pending_space = false;
        }
        out.push(ch);
    }
    out
}

fn parse_type(text: &str) -> TypeDescriptor {
    if let Some(inner) = text
        .strip_prefix("mapping(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        if let Some(split) = find_top_level_arrow(inner) {
            let key = strip_mapping_name(&inner[..split]);
            let value = strip_mapping_name(&inner[split + 2..]);
            return TypeDescriptor::Mapping {
                key: Box::new(parse_type(key)),
                value: Box::new(parse_type(value)),
            };
        }
        return TypeDescriptor::UserDefined(text.to_string());
    }

    if text.ends_with(']') {
        if let Some(open) = matching_open_bracket(text) {
            let length = text[open + 1..text.len() - 1].trim();
            return TypeDescriptor::Array {
                element: Box::new(parse_type(&text[..open])),
                length: if length.is_empty() {
                    None
                } else {
                    Some(length.to_string())
                },
            };
        }
    }

    if text.starts_with("function") {
        return TypeDescriptor::Function;
    }

    match parse_elementary(text) {
        Some(elementary) => TypeDescriptor::Elementary(elementary),
        None => TypeDescriptor::UserDefined(text.to_string()),
    }
}

fn parse_elementary(text: &str) -> Option<ElementaryType> {
    match text {
        "address" => return Some(ElementaryType::Address { payable: false }),
        "address payable" => return Some(ElementaryType::Address { payable: true }),
        "bool" => return Some(ElementaryType::Bool),
        "string" => return Some(ElementaryType::String),
        "bytes" => return Some(ElementaryType::Bytes),
        "byte" => return Some(ElementaryType::FixedBytes { size: 1 }),
        "uint" => return Some(ElementaryType::Uint { bits: 256 }),
        "int" => return Some(ElementaryType::Int { bits: 256 }),
        _ => {}
    }

    if let Some(bits) = text.strip_prefix("uint").and_then(|b| b.parse::<u16>().ok()) {
        return Some(ElementaryType::Uint { bits });
    }
    if let Some(bits) = text.strip_prefix("int").and_then(|b| b.parse::<u16>().ok()) {
        return Some(ElementaryType::Int { bits });
    }
    if let Some(size) = text.strip_prefix("bytes").and_then(|b| b.parse::<u16>().ok()) {
        return Some(ElementaryType::FixedBytes { size });
    }
    None
}

fn find_top_level_arrow(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0i32;
    for i in 0..bytes.len() {
        match bytes[i] {
            b'(' | b'[' => depth += 1,
            b')' | b']' => depth -= 1,
            b'=' if depth == 0 && bytes.get(i + 1) == Some(&b'>') => return Some(i),
            _ => {}
        }
    }
    None
}

/// Solidity 0.8.18 allows named mapping parameters (`mapping(address owner => uint256 amount)`).
fn strip_mapping_name(text: &str) -> &str {
    let text = text.trim();
    if text.starts_with("mapping(") || text == "address payable" {
        return text;
    }
    match text.rsplit_once(' ') {
        Some((ty, _name)) => ty.trim(),
        None => text,
    }
}

fn matching_open_bracket(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0i32;
    for i in (0..bytes.len()).rev() {
        match bytes[i] {
            b']' => depth += 1,
            b'[' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_elementary_types() {
        assert_eq!(
            TypeDescriptor::parse("uint"),
            TypeDescriptor::Elementary(ElementaryType::Uint { bits: 256 })
        );
        assert_eq!(
            TypeDescriptor::parse("address payable"),
            TypeDescriptor::Elementary(ElementaryType::Address { payable: true })
        );
        assert_eq!(
            TypeDescriptor::parse("bytes32"),
            TypeDescriptor::Elementary(ElementaryType::FixedBytes { size: 32 })
        );
        assert_eq!(TypeDescriptor::parse("IERC20"), TypeDescriptor::UserDefined("IERC20".into()));
    }

    #[test]
    fn test_parse_nested_mapping() {
        let ty = TypeDescriptor::parse("mapping (address => mapping(address=>uint256))");
        let (key, value) = ty.mapping_types().unwrap();
        assert!(key.is_address());
        let (inner_key, inner_value) = value.mapping_types().unwrap();
        assert!(inner_key.is_address());
        assert!(inner_value.is_uint256());
        assert_eq!(ty.to_string(), "mapping(address => mapping(address => uint256))");
    }

    #[test]
    fn test_parse_named_mapping_parameters() {
        let ty = TypeDescriptor::parse("mapping(address owner => uint256 amount)");
        let (key, value) = ty.mapping_types().unwrap();
        assert!(key.is_address());
        assert!(value.is_uint256());
    }

    #[test]
    fn test_parse_arrays() {
        let ty = TypeDescriptor::parse("uint256[3][]");
        match &ty {
            TypeDescriptor::Array { element, length } => {
                assert!(length.is_none());
                assert!(element.is_array());
            }
            other => panic!("expected array, got {:?}", other),
        }
        assert!(TypeDescriptor::parse("string").is_reference());
        assert!(!TypeDescriptor::parse("bytes4").is_reference());
    }
}
