//! End-to-end pipeline tests: source → tokens → AST → check → value.

use serde_json::{json, Value as Json};

use axiomc_drv::{check, compile, eval, execute};
use axiomc_eval::Value;
use axiomc_sem::Contract;
use axiomc_util::{Error, ErrorKind};

fn contract(json: Json) -> Contract {
    Contract::from_json(&json).unwrap()
}

fn eval_rule(source: &str, contract_json: Json, context: Json) -> Result<Value, Error> {
    eval(source, &contract(contract_json), &context)
}

#[test]
fn test_vip_discount() {
    let contract = json!({
        "name": "discount",
        "inputs": { "user_age": "int", "is_vip": "bool", "base_price": "int" }
    });
    let source = "let d: int = 0; if (is_vip) { d = 50; } base_price - d";

    assert_eq!(
        eval_rule(
            source,
            contract.clone(),
            json!({ "user_age": 25, "is_vip": true, "base_price": 100 })
        )
        .unwrap(),
        Value::Int(50)
    );
    assert_eq!(
        eval_rule(
            source,
            contract,
            json!({ "user_age": 25, "is_vip": false, "base_price": 100 })
        )
        .unwrap(),
        Value::Int(100)
    );
}

#[test]
fn test_nested_member_access() {
    let result = eval_rule(
        r#"user.address.city + "-" + user.company.address.zip"#,
        json!({
            "name": "zip",
            "inputs": {
                "user": {
                    "name": "string",
                    "address": { "city": "string" },
                    "company": { "address": { "zip": "string" } }
                }
            },
            "outputs": "string"
        }),
        json!({
            "user": {
                "name": "Alice",
                "address": { "city": "Wonderland" },
                "company": { "address": { "zip": "88081" } }
            }
        }),
    )
    .unwrap();
    assert_eq!(result, Value::String("Wonderland-88081".into()));
}

#[test]
fn test_membership() {
    let result = eval_rule(
        r#""admin" in ["user", "admin", "guest"]"#,
        json!({ "name": "roles", "inputs": {} }),
        json!({}),
    )
    .unwrap();
    assert_eq!(result, Value::Bool(true));
}

#[test]
fn test_macros() {
    let result = eval_rule(
        "[1, 2, 3].all(n, n > 0) && [1, 2, 3].exists(n, n > 2)",
        json!({ "name": "macros", "inputs": {} }),
        json!({}),
    )
    .unwrap();
    assert_eq!(result, Value::Bool(true));
}

#[test]
fn test_has_presence_probe() {
    let contract = json!({
        "name": "probe",
        "inputs": { "user": { "name": "string" } }
    });
    assert_eq!(
        eval_rule(
            "has(user.name)",
            contract.clone(),
            json!({ "user": { "name": "Alice" } })
        )
        .unwrap(),
        Value::Bool(true)
    );
    assert_eq!(
        eval_rule("has(user.name)", contract, json!({ "user": {} })).unwrap(),
        Value::Bool(false)
    );
}

#[test]
fn test_arithmetic_with_output_type() {
    let result = eval_rule(
        "1 + 2 * 3",
        json!({ "name": "arith", "inputs": {}, "outputs": "int" }),
        json!({}),
    )
    .unwrap();
    assert_eq!(result, Value::Int(7));
}

// Negative scenarios: each must fail with the specified error kind.

#[test]
fn test_declaration_mismatch_is_type_error() {
    let err = eval_rule(
        r#"let x: int = "s";"#,
        json!({ "name": "t", "inputs": {} }),
        json!({}),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Type);
    assert!(err.to_string().contains("mismatch"));
}

#[test]
fn test_undefined_variable_is_type_error() {
    let err = eval_rule(
        "let y: int = x + 1;",
        json!({ "name": "t", "inputs": {} }),
        json!({}),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Type);
    assert!(err.to_string().contains("undefined variable 'x'"));
}

#[test]
fn test_heterogeneous_list_is_type_error() {
    let err = eval_rule(
        r#"let x: int[] = [1, "2"];"#,
        json!({ "name": "t", "inputs": {} }),
        json!({}),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Type);
    assert!(err.to_string().contains("homogeneous"));
}

#[test]
fn test_return_type_mismatch() {
    let err = eval_rule(
        "1 + 1",
        json!({ "name": "t", "inputs": {}, "outputs": "string" }),
        json!({}),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Type);
    assert!(err.to_string().contains("return type mismatch"));
}

#[test]
fn test_unknown_property_is_type_error() {
    let err = eval_rule(
        "user.unknown_prop",
        json!({ "name": "t", "inputs": { "user": { "name": "string" } } }),
        json!({}),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Type);
    assert!(err.to_string().contains("unknown_prop"));
}

#[test]
fn test_empty_source_with_output_type() {
    let err = eval_rule(
        "",
        json!({ "name": "t", "inputs": {}, "outputs": "int" }),
        json!({}),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Type);
    assert!(err
        .to_string()
        .contains("script does not end with an expression"));
}

#[test]
fn test_syntax_error_kind() {
    let err = eval_rule(
        "let x: int = @;",
        json!({ "name": "t", "inputs": {} }),
        json!({}),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Syntax);
    assert!(err.line().is_some());
}

#[test]
fn test_runtime_error_kind() {
    let err = eval_rule(
        "1 / 0",
        json!({ "name": "t", "inputs": {} }),
        json!({}),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Runtime);
}

// Pipeline properties.

#[test]
fn test_eval_equals_staged_pipeline() {
    let contract = contract(json!({
        "name": "staged",
        "inputs": { "n": "int" },
        "outputs": "int"
    }));
    let source = "n * n + 1";
    let context = json!({ "n": 6 });

    let staged = {
        let ast = compile(source).unwrap();
        check(&ast, &contract).unwrap();
        execute(&ast, &contract, &context).unwrap()
    };
    let chained = eval(source, &contract, &context).unwrap();
    assert_eq!(staged, chained);
    assert_eq!(staged, Value::Int(37));
}

#[test]
fn test_checked_ast_survives_runtime_failure() {
    let contract = contract(json!({
        "name": "div",
        "inputs": { "d": "int" },
        "outputs": "int"
    }));
    let ast = compile("100 / d").unwrap();
    check(&ast, &contract).unwrap();

    let err = execute(&ast, &contract, &json!({ "d": 0 })).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Runtime);

    // The AST stays reusable after a failed execution.
    assert_eq!(
        execute(&ast, &contract, &json!({ "d": 4 })).unwrap(),
        Value::Int(25)
    );
}

#[test]
fn test_inferred_result_type_matches_dynamic_type() {
    let contract = contract(json!({
        "name": "soundness",
        "inputs": { "user": { "name": "string" }, "xs": "int[]" }
    }));
    let cases = [
        ("user.name", "string"),
        ("xs", "int[]"),
        (r#"xs.exists(n, n > 1) || has(user.name)"#, "bool"),
        (r#"length(user.name) + 1"#, "int"),
    ];
    let context = json!({ "user": { "name": "Alice" }, "xs": [1, 2] });

    for (source, expected) in cases {
        let ast = compile(source).unwrap();
        let inferred = check(&ast, &contract).unwrap().unwrap();
        assert_eq!(inferred.to_string(), expected, "inference for {source}");
        let value = execute(&ast, &contract, &context).unwrap();
        assert!(
            value.type_of().compatible(&inferred),
            "dynamic type of {source} diverged from inference"
        );
    }
}

#[test]
fn test_date_context_field_and_comparison() {
    let result = eval_rule(
        r#"created < timestamp("2025-01-01T00:00:00Z")"#,
        json!({
            "name": "dates",
            "inputs": { "created": "date" },
            "outputs": "bool"
        }),
        json!({ "created": "2024-06-15T12:00:00Z" }),
    )
    .unwrap();
    assert_eq!(result, Value::Bool(true));
}

#[test]
fn test_object_result_serializes_in_source_order() {
    let value = eval_rule(
        r#"({verdict: "allow", score: 40 + 2})"#,
        json!({
            "name": "structured",
            "inputs": {},
            "outputs": { "verdict": "string", "score": "int" }
        }),
        json!({}),
    )
    .unwrap();
    let json = value.to_json();
    let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["verdict", "score"]);
    assert_eq!(json["score"], 42);
}

#[test]
fn test_null_context_value_is_runtime_error() {
    let err = eval_rule(
        "n + 1",
        json!({ "name": "t", "inputs": { "n": "int" } }),
        json!({ "n": null }),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Runtime);
    assert!(err.to_string().contains("null"));
}
