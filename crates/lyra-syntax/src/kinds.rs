//! SyntaxKind enum for the Lyra CST.
//!
//! The grammar that produces Lyra trees tags nodes with strings. Every tag
//! the analyzer understands has one variant here, so dispatch sites match
//! exhaustively over a closed set instead of comparing strings. Some
//! constructs are spelled two ways by different grammar revisions
//! (`integer`/`integer_literal`, `boolean_expr`/`binary_expression`, ...);
//! both spellings map to the same variant.

/// Every CST node kind the Lyra analyzer recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // ── Statements ─────────────────────────────────────────────────────
    SOURCE_FILE,
    TYPE_DECLARATION,
    FUNCTION_DEFINITION,
    /// `let`/`var` declaration.
    DECLARATION,
    CONST_DECLARATION,
    EXPRESSION_STATEMENT,
    RETURN_STATEMENT,
    TRAIT_DECLARATION,
    TRAIT_IMPLEMENTATION,
    /// Grammar wrapper around any statement.
    STATEMENT,
    /// Grammar wrapper around any expression.
    EXPRESSION,

    // ── Type declarations ──────────────────────────────────────────────
    STRUCT_TYPE,
    DATA_TYPE,
    STRUCT_NAME,
    DATA_TYPE_NAME,
    STRUCT_TYPE_BODY,
    FIELD_NAME,
    FIELD_TYPE,
    DEFAULT_VALUE,
    DATA_TYPE_CONSTRUCTOR,
    DATA_TYPE_CONSTRUCTOR_NAME,
    VISIBILITY,
    GENERIC_PARAMETERS,

    // ── Type expressions ───────────────────────────────────────────────
    SIGNED_INTEGER_TYPE,
    UNSIGNED_INTEGER_TYPE,
    FLOAT_TYPE,
    STRING_TYPE,
    BOOLEAN_TYPE,
    CHAR_TYPE,
    UNIT_TYPE,
    ARRAY_TYPE,
    MAP_TYPE,
    KEY_TYPE,
    VALUE_TYPE,
    TUPLE_TYPE,
    FUNCTION_TYPE,
    PARAMETER_TYPES,
    PARAMETER_TYPE,
    MODIFIER,
    GENERIC_TYPE,
    USER_DEFINED_TYPE_NAME,
    TYPE_ANNOTATION,
    /// Wrapper holding a single type node.
    TYPE,

    // ── Functions ──────────────────────────────────────────────────────
    FUNCTION_SIGNATURE,
    FUNCTION_CLAUSE_LIST,
    FUNCTION_CLAUSE,
    PARAMETER_LIST,
    PARAMETER,
    LITERAL_PATTERN,
    GUARD,
    BODY,

    // ── Traits ─────────────────────────────────────────────────────────
    TRAIT_NAME,
    TRAIT_METHOD,
    METHOD_NAME,
    TRAIT_METHOD_IMPLEMENTATION,

    // ── Expressions ────────────────────────────────────────────────────
    IDENTIFIER,
    INTEGER,
    FLOAT,
    STRING,
    BOOLEAN,
    CHAR,
    /// Boolean, comparison and arithmetic operators: `left operator right`.
    BINARY_EXPRESSION,
    UNARY_EXPRESSION,
    IF_EXPRESSION,
    ARRAY_LITERAL,
    TUPLE_LITERAL,
    CALL_EXPRESSION,
    ARGUMENT_LIST,
    MEMBER_EXPRESSION,
    INDEX_EXPRESSION,
    LAMBDA,
    BLOCK,
    PARENTHESIZED_EXPRESSION,
    OPERATOR,

    // ── Parser extras ──────────────────────────────────────────────────
    /// A region the parser could not make sense of.
    ERROR,
    COMMENT,
}

use SyntaxKind::*;

impl SyntaxKind {
    pub const ALL: &'static [SyntaxKind] = &[
        SOURCE_FILE,
        TYPE_DECLARATION,
        FUNCTION_DEFINITION,
        DECLARATION,
        CONST_DECLARATION,
        EXPRESSION_STATEMENT,
        RETURN_STATEMENT,
        TRAIT_DECLARATION,
        TRAIT_IMPLEMENTATION,
        STATEMENT,
        EXPRESSION,
        STRUCT_TYPE,
        DATA_TYPE,
        STRUCT_NAME,
        DATA_TYPE_NAME,
        STRUCT_TYPE_BODY,
        FIELD_NAME,
        FIELD_TYPE,
        DEFAULT_VALUE,
        DATA_TYPE_CONSTRUCTOR,
        DATA_TYPE_CONSTRUCTOR_NAME,
        VISIBILITY,
        GENERIC_PARAMETERS,
        SIGNED_INTEGER_TYPE,
        UNSIGNED_INTEGER_TYPE,
        FLOAT_TYPE,
        STRING_TYPE,
        BOOLEAN_TYPE,
        CHAR_TYPE,
        UNIT_TYPE,
        ARRAY_TYPE,
        MAP_TYPE,
        KEY_TYPE,
        VALUE_TYPE,
        TUPLE_TYPE,
        FUNCTION_TYPE,
        PARAMETER_TYPES,
        PARAMETER_TYPE,
        MODIFIER,
        GENERIC_TYPE,
        USER_DEFINED_TYPE_NAME,
        TYPE_ANNOTATION,
        TYPE,
        FUNCTION_SIGNATURE,
        FUNCTION_CLAUSE_LIST,
        FUNCTION_CLAUSE,
        PARAMETER_LIST,
        PARAMETER,
        LITERAL_PATTERN,
        GUARD,
        BODY,
        TRAIT_NAME,
        TRAIT_METHOD,
        METHOD_NAME,
        TRAIT_METHOD_IMPLEMENTATION,
        IDENTIFIER,
        INTEGER,
        FLOAT,
        STRING,
        BOOLEAN,
        CHAR,
        BINARY_EXPRESSION,
        UNARY_EXPRESSION,
        IF_EXPRESSION,
        ARRAY_LITERAL,
        TUPLE_LITERAL,
        CALL_EXPRESSION,
        ARGUMENT_LIST,
        MEMBER_EXPRESSION,
        INDEX_EXPRESSION,
        LAMBDA,
        BLOCK,
        PARENTHESIZED_EXPRESSION,
        OPERATOR,
        ERROR,
        COMMENT,
    ];

    /// The grammar tag for this kind. For aliased kinds this is the
    /// `*_literal`/long spelling.
    pub fn name(self) -> &'static str {
        match self {
            SOURCE_FILE => "source_file",
            TYPE_DECLARATION => "type_declaration",
            FUNCTION_DEFINITION => "function_definition",
            DECLARATION => "declaration",
            CONST_DECLARATION => "const_declaration",
            EXPRESSION_STATEMENT => "expression_statement",
            RETURN_STATEMENT => "return_statement",
            TRAIT_DECLARATION => "trait_declaration",
            TRAIT_IMPLEMENTATION => "trait_implementation",
            STATEMENT => "statement",
            EXPRESSION => "expression",
            STRUCT_TYPE => "struct_type",
            DATA_TYPE => "data_type",
            STRUCT_NAME => "struct_name",
            DATA_TYPE_NAME => "data_type_name",
            STRUCT_TYPE_BODY => "struct_type_body",
            FIELD_NAME => "field_name",
            FIELD_TYPE => "field_type",
            DEFAULT_VALUE => "default_value",
            DATA_TYPE_CONSTRUCTOR => "data_type_constructor",
            DATA_TYPE_CONSTRUCTOR_NAME => "data_type_constructor_name",
            VISIBILITY => "visibility",
            GENERIC_PARAMETERS => "generic_parameters",
            SIGNED_INTEGER_TYPE => "signed_integer_type",
            UNSIGNED_INTEGER_TYPE => "unsigned_integer_type",
            FLOAT_TYPE => "float_type",
            STRING_TYPE => "string_type",
            BOOLEAN_TYPE => "boolean_type",
            CHAR_TYPE => "char_type",
            UNIT_TYPE => "unit_type",
            ARRAY_TYPE => "array_type",
            MAP_TYPE => "map_type",
            KEY_TYPE => "key_type",
            VALUE_TYPE => "value_type",
            TUPLE_TYPE => "tuple_type",
            FUNCTION_TYPE => "function_type",
            PARAMETER_TYPES => "parameter_types",
            PARAMETER_TYPE => "parameter_type",
            MODIFIER => "modifier",
            GENERIC_TYPE => "generic_type",
            USER_DEFINED_TYPE_NAME => "user_defined_type_name",
            TYPE_ANNOTATION => "type_annotation",
            TYPE => "type",
            FUNCTION_SIGNATURE => "function_signature",
            FUNCTION_CLAUSE_LIST => "function_clause_list",
            FUNCTION_CLAUSE => "function_clause",
            PARAMETER_LIST => "parameter_list",
            PARAMETER => "parameter",
            LITERAL_PATTERN => "literal_pattern",
            GUARD => "guard",
            BODY => "body",
            TRAIT_NAME => "trait_name",
            TRAIT_METHOD => "trait_method",
            METHOD_NAME => "method_name",
            TRAIT_METHOD_IMPLEMENTATION => "trait_method_implementation",
            IDENTIFIER => "identifier",
            INTEGER => "integer_literal",
            FLOAT => "float_literal",
            STRING => "string_literal",
            BOOLEAN => "boolean_literal",
            CHAR => "char_literal",
            BINARY_EXPRESSION => "binary_expression",
            UNARY_EXPRESSION => "unary_expression",
            IF_EXPRESSION => "if_then_else",
            ARRAY_LITERAL => "array_literal",
            TUPLE_LITERAL => "tuple_literal",
            CALL_EXPRESSION => "call_expression",
            ARGUMENT_LIST => "argument_list",
            MEMBER_EXPRESSION => "member_expression",
            INDEX_EXPRESSION => "index_expression",
            LAMBDA => "lambda",
            BLOCK => "block",
            PARENTHESIZED_EXPRESSION => "parenthesized_expression",
            OPERATOR => "operator",
            ERROR => "ERROR",
            COMMENT => "comment",
        }
    }

    /// Map a grammar tag to its kind. Unknown tags yield `None`.
    pub fn from_name(name: &str) -> Option<SyntaxKind> {
        let alias = match name {
            "integer" => Some(INTEGER),
            "float" => Some(FLOAT),
            "string" => Some(STRING),
            "boolean" => Some(BOOLEAN),
            "char" => Some(CHAR),
            "boolean_expr" => Some(BINARY_EXPRESSION),
            "if_expression" => Some(IF_EXPRESSION),
            _ => None,
        };
        alias.or_else(|| Self::ALL.iter().copied().find(|k| k.name() == name))
    }

    pub fn is_literal(self) -> bool {
        matches!(self, INTEGER | FLOAT | STRING | BOOLEAN | CHAR)
    }

    /// Kinds that spell a type expression directly (not wrappers).
    pub fn is_type(self) -> bool {
        matches!(
            self,
            SIGNED_INTEGER_TYPE
                | UNSIGNED_INTEGER_TYPE
                | FLOAT_TYPE
                | STRING_TYPE
                | BOOLEAN_TYPE
                | CHAR_TYPE
                | UNIT_TYPE
                | ARRAY_TYPE
                | MAP_TYPE
                | TUPLE_TYPE
                | FUNCTION_TYPE
                | GENERIC_TYPE
                | USER_DEFINED_TYPE_NAME
        )
    }
}

/// Field names the grammar attaches to children.
pub mod field {
    pub const KEYWORD: &str = "keyword";
    pub const NAME: &str = "name";
    pub const TYPE_ANNOTATION: &str = "type_annotation";
    pub const TYPE: &str = "type";
    pub const VALUE: &str = "value";
    pub const PARAMETERS: &str = "parameters";
    pub const GUARD: &str = "guard";
    pub const BODY: &str = "body";
    pub const PARAMETER_TYPES: &str = "parameter_types";
    pub const RETURN_TYPE: &str = "return_type";
    pub const MODIFIER: &str = "modifier";
    pub const PATTERN: &str = "pattern";
    pub const LEFT: &str = "left";
    pub const OPERATOR: &str = "operator";
    pub const RIGHT: &str = "right";
    pub const OPERAND: &str = "operand";
    pub const CONDITION: &str = "condition";
    pub const CONSEQUENCE: &str = "consequence";
    pub const ALTERNATIVE: &str = "alternative";
    pub const FUNCTION: &str = "function";
    pub const ARGUMENTS: &str = "arguments";
    pub const OBJECT: &str = "object";
    pub const PROPERTY: &str = "property";
    pub const INDEX: &str = "index";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for &kind in SyntaxKind::ALL {
            assert_eq!(SyntaxKind::from_name(kind.name()), Some(kind), "{:?}", kind);
        }
    }

    #[test]
    fn aliases_share_a_kind() {
        assert_eq!(SyntaxKind::from_name("integer"), Some(INTEGER));
        assert_eq!(SyntaxKind::from_name("integer_literal"), Some(INTEGER));
        assert_eq!(SyntaxKind::from_name("boolean_expr"), Some(BINARY_EXPRESSION));
        assert_eq!(SyntaxKind::from_name("if_expression"), Some(IF_EXPRESSION));
        assert_eq!(SyntaxKind::from_name("if_then_else"), Some(IF_EXPRESSION));
    }

    #[test]
    fn unknown_tags() {
        assert_eq!(SyntaxKind::from_name("match_expression"), None);
        assert_eq!(SyntaxKind::from_name(""), None);
    }

    #[test]
    fn parser_extras() {
        assert_eq!(SyntaxKind::from_name("ERROR"), Some(ERROR));
        assert_eq!(SyntaxKind::from_name("error"), None);
        assert_eq!(SyntaxKind::from_name("comment"), Some(COMMENT));
    }

    #[test]
    fn classification() {
        assert!(INTEGER.is_literal());
        assert!(!IDENTIFIER.is_literal());
        assert!(ARRAY_TYPE.is_type());
        assert!(!FIELD_TYPE.is_type());
    }
}
