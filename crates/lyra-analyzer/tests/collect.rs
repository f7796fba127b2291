//! Integration tests for CST → AST collection.
//!
//! These tests exercise:
//! - Global registration and duplicate detection
//! - Struct and data declarations, field defaults and member duplicates
//! - Recovery from missing and malformed nodes
//! - Container types and conditional/index expression lowering

use lyra_analyzer::{collect, AnalysisOptions, Collected, CollectionError, MemberKind};
use lyra_ast::symbols::Symbol;
use lyra_ast::{ExprKind, StmtKind, VarKeyword};
use lyra_syntax::sexp;
use lyra_types::{types_equal, CtorShape, Literal, StructField, StructTy, Ty};

// ── Helpers ────────────────────────────────────────────────────────────

fn collect_items(items: &[&str]) -> Collected {
    let text = format!("(source_file {})", items.join("\n"));
    let tree = sexp::parse(&text).unwrap();
    collect(tree.root(), tree.source(), &AnalysisOptions::with_file("test.lyra"))
}

fn let_int(name: &str, value: &str) -> String {
    format!(
        r#"(declaration keyword: "let" name: (identifier "{}") ":"
             type_annotation: (type_annotation type: (signed_integer_type "Int"))
             "=" value: (integer "{}"))"#,
        name, value
    )
}

// ── Declarations ───────────────────────────────────────────────────────

#[test]
fn duplicate_let_reports_the_first_location() {
    let first = let_int("x", "1");
    let second = let_int("x", "2");
    let collected = collect_items(&[&first, &second]);

    assert_eq!(collected.errors.len(), 1);
    let CollectionError::DuplicateDefinition(dup) = &collected.errors[0] else {
        panic!("expected a duplicate definition, got {:?}", collected.errors[0]);
    };
    assert_eq!(dup.name, "x");
    assert_eq!(dup.previous.start.line, 1);
    assert_eq!(dup.location.start.line, 2);
    assert_eq!(dup.previous.file.as_deref(), Some("test.lyra"));

    // Both statements are kept; the name stays bound to the first.
    assert_eq!(collected.program.statements.len(), 2);
    let entry = collected.table.lookup(collected.table.global(), "x").unwrap();
    assert_eq!(entry.location.start.line, 1);
}

#[test]
fn var_decl_fields() {
    let collected = collect_items(&[
        r#"(const_declaration name: (identifier "limit") "=" value: (integer "0x10"))"#,
        r#"(declaration keyword: "var" name: (identifier "s") "=" value: (string "\"a\\tb\""))"#,
    ]);
    assert!(collected.errors.is_empty(), "{:?}", collected.errors);

    let StmtKind::VarDecl(limit) = &collected.program.statements[0].kind else {
        panic!("expected a declaration");
    };
    assert_eq!(limit.keyword, VarKeyword::Const);
    assert_eq!(limit.ty, None);
    assert!(matches!(
        limit.value.as_ref().map(|v| &v.kind),
        Some(ExprKind::Literal(Literal::Int(16)))
    ));

    let StmtKind::VarDecl(s) = &collected.program.statements[1].kind else {
        panic!("expected a declaration");
    };
    assert_eq!(s.keyword, VarKeyword::Var);
    assert!(matches!(
        s.value.as_ref().map(|v| &v.kind),
        Some(ExprKind::Literal(Literal::String(text))) if text == "a\tb"
    ));
}

#[test]
fn declaration_without_value_is_a_missing_node() {
    let collected = collect_items(&[r#"(declaration keyword: "let" name: (identifier "x"))"#]);
    assert!(matches!(
        collected.errors.as_slice(),
        [CollectionError::MissingNode { expected: "value", .. }]
    ));
    assert_eq!(collected.program.statements.len(), 1);
}

// ── Types ──────────────────────────────────────────────────────────────

#[test]
fn struct_round_trip() {
    let collected = collect_items(&[r#"
      (type_declaration
        (struct_type "struct" (struct_name "Point")
          (struct_type_body "{"
            (field_name "x") ":" (field_type (signed_integer_type "Int")) ","
            (field_name "y") ":" (field_type (signed_integer_type "Int")) (default_value "=" (integer "0"))
            "}")))"#]);
    assert!(collected.errors.is_empty(), "{:?}", collected.errors);

    let entry = collected.table.lookup(collected.table.global(), "Point").unwrap();
    let Symbol::Type(id) = entry.symbol else {
        panic!("Point should be a type, got {:?}", entry.symbol);
    };
    let decl = collected.program.type_decl(id).unwrap();
    let Ty::Struct(point) = &decl.ty else {
        panic!("Point should be a struct, got {:?}", decl.ty);
    };
    assert_eq!(point.fields.len(), 2);
    assert_eq!(point.field("x").unwrap().ty, Ty::int());
    assert_eq!(point.field("x").unwrap().default, None);
    assert_eq!(point.field("y").unwrap().default, Some(Literal::Int(0)));

    // Nominal: defaults and even field lists do not take part.
    let manual = Ty::Struct(StructTy::new(
        "Point",
        vec![StructField::new("x", Ty::int()), StructField::new("y", Ty::int())],
    ));
    assert!(types_equal(&decl.ty, &manual));
    assert!(types_equal(&decl.ty, &Ty::Struct(StructTy::new("Point", vec![]))));
}

#[test]
fn data_constructors_keep_their_shape() {
    let collected = collect_items(&[r#"
      (type_declaration (visibility "pub")
        (data_type "data" (data_type_name "Tree") "="
          (data_type_constructor (data_type_constructor_name "Leaf") "(" (signed_integer_type "Int") ")")
          "|"
          (data_type_constructor (data_type_constructor_name "Node")
            (struct_type_body "{"
              (field_name "left") ":" (field_type (user_defined_type_name "Tree")) ","
              (field_name "right") ":" (field_type (user_defined_type_name "Tree"))
              "}"))))"#]);
    assert!(collected.errors.is_empty(), "{:?}", collected.errors);

    let id = collected.table.lookup_type("Tree").unwrap();
    let decl = collected.program.type_decl(id).unwrap();
    assert!(decl.is_public);
    let Ty::Data(tree) = &decl.ty else {
        panic!("Tree should be a data type");
    };
    assert_eq!(
        tree.constructor("Leaf").map(|c| &c.shape),
        Some(&CtorShape::Positional(vec![Ty::int()]))
    );
    let Some(CtorShape::Record(fields)) = tree.constructor("Node").map(|c| &c.shape) else {
        panic!("Node should be a record constructor");
    };
    assert_eq!(fields[0].ty, Ty::unresolved("Tree"));
}

#[test]
fn duplicate_fields_keep_the_first() {
    let collected = collect_items(&[r#"
      (type_declaration
        (struct_type "struct" (struct_name "P")
          (struct_type_body "{"
            (field_name "a") ":" (field_type (signed_integer_type "Int")) ","
            (field_name "a") ":" (field_type (string_type "String"))
            "}")))"#]);

    assert!(matches!(
        collected.errors.as_slice(),
        [CollectionError::DuplicateMember { kind: MemberKind::Field, member, .. }] if member == "a"
    ));
    let decl = collected.program.type_decl(collected.table.lookup_type("P").unwrap()).unwrap();
    let Ty::Struct(p) = &decl.ty else {
        panic!("P should be a struct");
    };
    assert_eq!(p.fields.len(), 1);
    assert_eq!(p.fields[0].ty, Ty::int());
}

#[test]
fn non_literal_default_is_rejected() {
    let collected = collect_items(&[r#"
      (type_declaration
        (struct_type "struct" (struct_name "P")
          (struct_type_body "{"
            (field_name "a") ":" (field_type (signed_integer_type "Int"))
            (default_value "=" (identifier "zero"))
            "}")))"#]);
    assert_eq!(collected.errors.len(), 1);
    assert_eq!(collected.errors[0].to_string(), "unknown default value node kind: identifier");
}

#[test]
fn unknown_type_node_is_malformed() {
    let collected = collect_items(&[r#"
      (declaration keyword: "let" name: (identifier "x") ":"
        type_annotation: (type_annotation type: (pointer_type "*Int"))
        "=" value: (integer "1"))"#]);
    assert_eq!(collected.errors.len(), 1);
    assert_eq!(collected.errors[0].to_string(), "unknown type node kind: pointer_type");

    // The declaration survives without its annotation.
    let StmtKind::VarDecl(decl) = &collected.program.statements[0].kind else {
        panic!("expected a declaration");
    };
    assert_eq!(decl.ty, None);
}

#[test]
fn map_and_array_types_in_a_signature() {
    let collected = collect_items(&[r#"
      (function_definition
        (function_signature "def" name: (identifier "keys") ":"
          (function_type
            parameter_types: (parameter_types "("
              (parameter_type type: (map_type "{"
                (key_type (string_type "String")) ":"
                (value_type (array_type "[" "]" (signed_integer_type "Int")))
                "}"))
              ")")
            "->"
            return_type: (array_type "[" "]" (string_type "String"))))
        "="
        (function_clause parameters: (parameter_list "(" (parameter pattern: (identifier "m")) ")") "=>" body: (identifier "m")))"#]);
    assert!(collected.errors.is_empty(), "{:?}", collected.errors);

    let def = collected
        .program
        .function(collected.table.lookup_function("keys").unwrap())
        .unwrap();
    let sig = def.signature.as_ref().unwrap();
    assert!(types_equal(&sig.params[0].ty, &Ty::map(Ty::string(), Ty::array(Ty::int()))));
    assert!(types_equal(&sig.ret, &Ty::array(Ty::string())));
    insta::assert_snapshot!(sig.to_string(), @"({String: []Int}) -> []String");
}

#[test]
fn map_type_without_value_is_missing() {
    let collected = collect_items(&[r#"
      (declaration keyword: "let" name: (identifier "m") ":"
        type_annotation: (type_annotation type: (map_type "{" (key_type (string_type "String")) "}"))
        "=" value: (integer "1"))"#]);
    assert_eq!(collected.errors.len(), 1);
    assert_eq!(collected.errors[0].to_string(), "missing key_type and value_type in map_type");
}

// ── Functions and expressions ──────────────────────────────────────────

#[test]
fn function_flags_and_generics() {
    let collected = collect_items(&[r#"
      (function_definition (visibility "pub")
        (function_signature "def" "pure" name: (identifier "id")
          (generic_parameters "<" (generic_type "a") ">") ":"
          (function_type
            parameter_types: (parameter_types "(" (parameter_type modifier: (modifier "ref") type: (generic_type "a")) ")")
            "->"
            return_type: (generic_type "a")))
        "="
        (function_clause parameters: (parameter_list "(" (parameter pattern: (identifier "x")) ")") "=>" body: (identifier "x")))"#]);
    assert!(collected.errors.is_empty(), "{:?}", collected.errors);

    let def = collected
        .program
        .function(collected.table.lookup_function("id").unwrap())
        .unwrap();
    assert!(def.is_public);
    assert!(def.is_pure);
    assert!(!def.is_async);
    assert_eq!(def.generic_params, vec!["a".to_owned()]);
    let sig = def.signature.as_ref().unwrap();
    assert_eq!(sig.to_string(), "(ref a) -> a");
}

#[test]
fn unknown_expression_wrappers_are_unwrapped() {
    let collected = collect_items(&[r#"
      (expression_statement
        (parenthesized_expression "("
          (unary_expression operator: "-" operand: (integer "3"))
          ")"))"#]);
    assert!(collected.errors.is_empty(), "{:?}", collected.errors);
    let StmtKind::Expr(expr) = &collected.program.statements[0].kind else {
        panic!("expected an expression statement");
    };
    assert!(matches!(&expr.kind, ExprKind::Unary { operand: Some(_), .. }));
}

#[test]
fn invalid_integer_literal() {
    let collected = collect_items(&[r#"(expression_statement (integer "99999999999999999999"))"#]);
    assert_eq!(collected.errors.len(), 1);
    assert_eq!(
        collected.errors[0].to_string(),
        "invalid integer literal: 99999999999999999999"
    );
    assert!(collected.program.statements.is_empty());
}

#[test]
fn duplicate_trait_methods() {
    let collected = collect_items(&[r#"
      (trait_declaration "trait" (trait_name "Eq") "{"
        (trait_method (method_name "eq") ":"
          (function_type parameter_types: (parameter_types "(" ")") "->" return_type: (boolean_type "Bool")))
        (trait_method (method_name "eq") ":"
          (function_type parameter_types: (parameter_types "(" ")") "->" return_type: (boolean_type "Bool")))
        "}")"#]);
    assert!(matches!(
        collected.errors.as_slice(),
        [CollectionError::DuplicateMember { kind: MemberKind::Method, .. }]
    ));
    let eq = collected.table.lookup_trait("Eq").unwrap();
    assert_eq!(eq.methods.len(), 1);
}

#[test]
fn if_expression_lowers_all_three_parts() {
    let collected = collect_items(&[r#"
      (expression_statement
        (if_expression "if" condition: (boolean "true")
          "then" consequence: (integer "1")
          "else" alternative: (integer "2")))"#]);
    assert!(collected.errors.is_empty(), "{:?}", collected.errors);
    let StmtKind::Expr(expr) = &collected.program.statements[0].kind else {
        panic!("expected an expression statement");
    };
    let ExprKind::If { condition, then_branch, else_branch } = &expr.kind else {
        panic!("expected an if expression, got {:?}", expr.kind);
    };
    assert!(matches!(condition.as_deref().map(|e| &e.kind), Some(ExprKind::Literal(Literal::Bool(true)))));
    assert!(matches!(then_branch.as_deref().map(|e| &e.kind), Some(ExprKind::Literal(Literal::Int(1)))));
    assert!(matches!(else_branch.as_deref().map(|e| &e.kind), Some(ExprKind::Literal(Literal::Int(2)))));
}

#[test]
fn if_expression_without_condition() {
    let collected = collect_items(&[r#"
      (expression_statement (if_expression "if" "then" consequence: (integer "1")))"#]);
    assert_eq!(collected.errors.len(), 1);
    assert_eq!(collected.errors[0].to_string(), "missing condition in if_expression");
    let StmtKind::Expr(expr) = &collected.program.statements[0].kind else {
        panic!("expected an expression statement");
    };
    assert!(matches!(&expr.kind, ExprKind::If { condition: None, then_branch: Some(_), else_branch: None }));
}

#[test]
fn index_expression_falls_back_to_positional_children() {
    let collected = collect_items(&[
        r#"(expression_statement (index_expression (identifier "xs") "[" (integer "0") "]"))"#,
        r#"(expression_statement (index_expression object: (identifier "m") "[" index: (string "\"k\"") "]"))"#,
    ]);
    assert!(collected.errors.is_empty(), "{:?}", collected.errors);

    let kinds: Vec<&ExprKind> = collected
        .program
        .statements
        .iter()
        .map(|stmt| match &stmt.kind {
            StmtKind::Expr(expr) => &expr.kind,
            other => panic!("expected an expression statement, got {:?}", other),
        })
        .collect();
    assert!(matches!(
        kinds[0],
        ExprKind::Index { object: Some(object), index: Some(index) }
            if matches!(&object.kind, ExprKind::Identifier(name) if name == "xs")
                && matches!(index.kind, ExprKind::Literal(Literal::Int(0)))
    ));
    assert!(matches!(
        kinds[1],
        ExprKind::Index { index: Some(index), .. }
            if matches!(&index.kind, ExprKind::Literal(Literal::String(text)) if text == "k")
    ));
}

// ── Parser extras ──────────────────────────────────────────────────────

#[test]
fn error_nodes_are_malformed_and_comments_are_skipped() {
    let value = let_int("x", "1");
    let collected = collect_items(&[
        r##"(comment "# setup")"##,
        r#"(ERROR (identifier "oops"))"#,
        &value,
    ]);
    assert_eq!(collected.errors.len(), 1);
    assert!(matches!(
        &collected.errors[0],
        CollectionError::MalformedNode { kind, .. } if kind == "ERROR"
    ));
    assert_eq!(collected.errors[0].to_string(), "unknown top-level node kind: ERROR");
    assert_eq!(collected.program.statements.len(), 1);
    assert!(collected.table.lookup(collected.table.global(), "x").is_some());
}
