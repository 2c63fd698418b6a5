//! Closed set of syntax shapes the body walker understands.
//!
//! tree-sitter hands back nodes discriminated by a `kind()` string. Mapping that
//! string onto this enum first keeps the walker an exhaustive `match`; kinds
//! the walker has no rule for land in `Unhandled` and produce no fact.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeShape {
    /// Transparent wrappers (`statement`, `expression`) with a single payload child.
    Wrapper,
    Block,
    If,
    Loop,
    Unchecked,
    Try,
    ExpressionStatement,
    VariableDeclaration,
    Return,
    Emit,
    RevertStatement,
    Call,
    Member,
    CallOptions,
    Assignment,
    CompoundAssignment,
    Parenthesized,
    Nested,
    Assembly,
    Leaf,
    Unhandled,
}

impl NodeShape {
    pub fn of(kind: &str) -> Self {
        match kind {
            "statement" | "expression" | "_expression" => Self::Wrapper,
            "block_statement" | "function_body" | "catch_clause" => Self::Block,
            "if_statement" => Self::If,
            "for_statement" | "while_statement" | "do_while_statement" => Self::Loop,
            "unchecked_block" => Self::Unchecked,
            "try_statement" => Self::Try,
            "expression_statement" => Self::ExpressionStatement,
            "variable_declaration_statement" | "variable_declaration_tuple" => {
                Self::VariableDeclaration
            }
            "return_statement" => Self::Return,
            "emit_statement" => Self::Emit,
            "revert_statement" => Self::RevertStatement,
            "call_expression" => Self::Call,
            "member_expression" => Self::Member,
            "struct_expression" | "call_options" => Self::CallOptions,
            "assignment_expression" => Self::Assignment,
            "augmented_assignment_expression" => Self::CompoundAssignment,
            "parenthesized_expression" => Self::Parenthesized,
            "binary_expression"
            | "unary_expression"
            | "update_expression"
            | "ternary_expression"
            | "array_access"
            | "slice_access"
            | "tuple_expression"
            | "inline_array_expression"
            | "type_cast_expression"
            | "new_expression"
            | "call_argument"
            | "struct_field_assignment"
            | "meta_type_expression"
            | "payable_conversion_expression" => Self::Nested,
            "assembly_statement" => Self::Assembly,
            "identifier" | "number_literal" | "string_literal" | "boolean_literal"
            | "hex_literal" | "unicode_string_literal" | "primitive_type" | "comment"
            | "continue_statement" | "break_statement" => Self::Leaf,
            _ => Self::Unhandled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_kinds_are_unhandled() {
        assert_eq!(NodeShape::of("yul_block"), NodeShape::Unhandled);
        assert_eq!(NodeShape::of(""), NodeShape::Unhandled);
    }

    #[test]
    fn test_statement_kinds() {
        assert_eq!(NodeShape::of("if_statement"), NodeShape::If);
        assert_eq!(NodeShape::of("while_statement"), NodeShape::Loop);
        assert_eq!(NodeShape::of("augmented_assignment_expression"), NodeShape::CompoundAssignment);
    }
}
