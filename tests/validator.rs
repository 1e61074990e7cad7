//! Tests for structural, referential, uniqueness and enumeration validation.
mod common;
use attrschema::prelude::*;
use common::*;
use serde_json::{Value, json};

fn reject(candidate: &Value) -> ValidationError {
    Validator::default()
        .validate(candidate)
        .expect_err("candidate should be rejected")
}

fn find<'a>(err: &'a ValidationError, path: &str) -> &'a Violation {
    err.violations
        .iter()
        .find(|v| v.path.to_string() == path)
        .unwrap_or_else(|| panic!("no violation at '{}', got: {}", path, err))
}

#[test]
fn test_accepts_example_schema() {
    let schema = Validator::default()
        .validate(&cmsload_schema())
        .expect("example schema should be valid");

    assert_eq!(schema.id, "fs-attributes");
    assert_eq!(schema.solutions.len(), 1);
    let solution = &schema.solutions[0];
    assert_eq!(solution.scripts[0].is_async, Some(true));
    assert_eq!(solution.scripts[0].location, ScriptLocation::Head);
    assert_eq!(solution.attributes.len(), 3);

    let list_settings = solution.find_group("List settings").unwrap();
    assert_eq!(list_settings.attributes.len(), 5);
    assert_eq!(list_settings.node_types.as_deref(), Some(&[NodeType::DynamoList][..]));

    let duration = solution.find_attribute("duration").unwrap();
    assert!(duration.is_required());
    assert!(matches!(
        &duration.input,
        AttributeInput::IntegerInput { attribute_value: Some(n) } if n.as_i64() == Some(500)
    ));
    assert!(matches!(
        solution.find_attribute("resetix").unwrap().input,
        AttributeInput::Checkbox
    ));
}

#[test]
fn test_accepted_schema_round_trips_verbatim() {
    let candidate = cmsload_schema();
    let schema = attrschema::validate(&candidate).unwrap();

    let serialized = serde_json::to_value(&schema).unwrap();
    assert_eq!(serialized, candidate);

    let revalidated = attrschema::validate(&serialized).unwrap();
    assert_eq!(revalidated, schema);
}

#[test]
fn test_validate_schema_built_in_code() {
    let schema = Schema {
        id: "built".to_string(),
        name: "Built".to_string(),
        solutions: vec![Solution {
            id: "solution".to_string(),
            name: "Solution".to_string(),
            scripts: vec![],
            attributes: vec![
                AttributeNode::Attribute(Attribute {
                    id: "toggle".to_string(),
                    name: "Toggle".to_string(),
                    description: "A toggle".to_string(),
                    attribute_name: "fs-toggle".to_string(),
                    required: None,
                    node_types: None,
                    conditions: None,
                    input: AttributeInput::Checkbox,
                }),
                AttributeNode::Group(AttributeGroup {
                    name: "Extra".to_string(),
                    attributes: vec![Attribute {
                        id: "ratio".to_string(),
                        name: "Ratio".to_string(),
                        description: "A ratio".to_string(),
                        attribute_name: "fs-ratio".to_string(),
                        required: Some(false),
                        node_types: Some(vec![NodeType::Block]),
                        conditions: Some(vec![Condition::leaf("toggle", "on")]),
                        input: AttributeInput::FloatInput {
                            attribute_value: serde_json::Number::from_f64(0.5),
                        },
                    }],
                    node_types: None,
                    conditions: None,
                }),
            ],
        }],
    };

    let validated = Validator::default().validate_schema(&schema).unwrap();
    assert_eq!(validated, schema);
}

#[test]
fn test_options_on_text_input_is_structural() {
    let mut attribute = text_attribute("label", None);
    attribute["options"] = json!([{ "name": "A", "description": "A", "attributeValue": "a" }]);
    let err = reject(&schema_with_attributes(json!([attribute])));

    let violation = find(&err, "solutions[0].attributes[0].options");
    assert_eq!(violation.kind, ViolationKind::Structural);
    assert!(violation.reason.contains("text-input"));
}

#[test]
fn test_value_on_checkbox_is_structural() {
    let attribute = json!({
        "type": "attribute", "id": "flag", "name": "Flag", "description": "Flag",
        "attributeName": "fs-flag", "optionsType": "checkbox", "attributeValue": "true"
    });
    let err = reject(&schema_with_attributes(json!([attribute])));
    let violation = find(&err, "solutions[0].attributes[0].attributeValue");
    assert_eq!(violation.kind, ViolationKind::Structural);
}

#[test]
fn test_duplicate_solution_ids_are_rejected() {
    let mut candidate = cmsload_schema();
    let copy = candidate["solutions"][0].clone();
    candidate["solutions"].as_array_mut().unwrap().push(copy);

    let err = reject(&candidate);
    let violation = find(&err, "solutions[1].id");
    assert_eq!(violation.kind, ViolationKind::Uniqueness);
    assert!(violation.reason.contains("solutions[0].id"));
}

#[test]
fn test_duplicate_solution_ids_reported_alongside_other_errors() {
    let mut candidate = cmsload_schema();
    let mut copy = candidate["solutions"][0].clone();
    copy["name"] = json!(42);
    candidate["solutions"].as_array_mut().unwrap().push(copy);

    let err = reject(&candidate);
    assert!(err.has_kind(ViolationKind::Uniqueness));
    assert!(err.has_kind(ViolationKind::Structural));
}

#[test]
fn test_unresolved_attribute_id_is_referential() {
    let attributes = json!([
        text_attribute("label", None),
        text_attribute("caption", Some(json!([leaf("missing", json!("x"))]))),
    ]);
    let err = reject(&schema_with_attributes(attributes));

    assert_eq!(err.violations.len(), 1);
    let violation = find(&err, "solutions[0].attributes[1].conditions[0].attributeId");
    assert_eq!(violation.kind, ViolationKind::Referential);
    assert!(violation.reason.contains("missing"));
}

#[test]
fn test_references_resolve_into_groups() {
    let attributes = json!([
        {
            "type": "group",
            "name": "Inner",
            "attributes": [text_attribute("nested", None)]
        },
        text_attribute("outer", Some(json!([leaf("nested", json!("yes"))]))),
    ]);
    assert!(attrschema::validate(&schema_with_attributes(attributes)).is_ok());
}

#[test]
fn test_unknown_node_type_is_enumeration() {
    let mut attribute = text_attribute("label", None);
    attribute["nodeTypes"] = json!(["Block", "NotARealNode"]);
    let err = reject(&schema_with_attributes(json!([attribute])));

    let violation = find(&err, "solutions[0].attributes[0].nodeTypes[1]");
    assert_eq!(violation.kind, ViolationKind::Enumeration);
    assert!(violation.reason.contains("NotARealNode"));
}

#[test]
fn test_unknown_options_type_is_enumeration() {
    let mut attribute = text_attribute("label", None);
    attribute["optionsType"] = json!("color-picker");
    let err = reject(&schema_with_attributes(json!([attribute])));

    let violation = find(&err, "solutions[0].attributes[0].optionsType");
    assert_eq!(violation.kind, ViolationKind::Enumeration);
    assert!(violation.reason.contains("color-picker"));
}

#[test]
fn test_closed_literals_are_enumerations() {
    let mut candidate = cmsload_schema();
    candidate["solutions"][0]["scripts"][0]["location"] = json!("footer");
    candidate["solutions"][0]["attributes"][2]["conditions"][0]["operator"] = json!("xor");
    let err = reject(&candidate);

    let location = find(&err, "solutions[0].scripts[0].location");
    assert_eq!(location.kind, ViolationKind::Enumeration);
    let operator = find(&err, "solutions[0].attributes[2].conditions[0].operator");
    assert_eq!(operator.kind, ViolationKind::Enumeration);
}

#[test]
fn test_no_type_coercion() {
    let mut candidate = cmsload_schema();
    candidate["solutions"][0]["attributes"][1]["attributes"][2]["attributeValue"] = json!("500");
    candidate["solutions"][0]["attributes"][0]["required"] = Value::Null;
    let err = reject(&candidate);

    let duration = find(&err, "solutions[0].attributes[1].attributes[2].attributeValue");
    assert_eq!(duration.kind, ViolationKind::Structural);
    assert_eq!(duration.reason, "expected number, received string");

    let required = find(&err, "solutions[0].attributes[0].required");
    assert_eq!(required.reason, "expected boolean, received null");
}

#[test]
fn test_integer_input_requires_whole_number() {
    let mut candidate = cmsload_schema();
    candidate["solutions"][0]["attributes"][1]["attributes"][2]["attributeValue"] = json!(1.5);
    let err = reject(&candidate);
    let violation = find(&err, "solutions[0].attributes[1].attributes[2].attributeValue");
    assert_eq!(violation.kind, ViolationKind::Structural);

    candidate["solutions"][0]["attributes"][1]["attributes"][2]["attributeValue"] = json!(2.0);
    assert!(attrschema::validate(&candidate).is_ok());
}

#[test]
fn test_invalid_script_url() {
    let mut candidate = cmsload_schema();
    candidate["solutions"][0]["scripts"][0]["src"] = json!("cmsload.js");
    let err = reject(&candidate);
    let violation = find(&err, "solutions[0].scripts[0].src");
    assert_eq!(violation.kind, ViolationKind::Structural);
    assert!(violation.reason.contains("invalid URL"));
}

#[test]
fn test_missing_required_field() {
    let mut candidate = cmsload_schema();
    candidate["solutions"][0]["attributes"][0]
        .as_object_mut()
        .unwrap()
        .remove("description");
    let err = reject(&candidate);
    let violation = find(&err, "solutions[0].attributes[0].description");
    assert_eq!(violation.reason, "required field is missing");
}

#[test]
fn test_nested_groups_are_rejected() {
    let attributes = json!([{
        "type": "group",
        "name": "Outer",
        "attributes": [{
            "type": "group",
            "name": "Inner",
            "attributes": [text_attribute("label", None)]
        }]
    }]);
    let err = reject(&schema_with_attributes(attributes));
    let violation = find(&err, "solutions[0].attributes[0].attributes[0].type");
    assert_eq!(violation.kind, ViolationKind::Structural);
}

#[test]
fn test_non_empty_sequences() {
    let attributes = json!([
        { "type": "group", "name": "Empty", "attributes": [] },
        {
            "type": "attribute", "id": "choice", "name": "Choice", "description": "Choice",
            "attributeName": "fs-choice", "optionsType": "dropdown", "options": []
        },
        text_attribute("label", Some(json!([{ "type": "group", "operator": "or", "conditions": [] }]))),
    ]);
    let err = reject(&schema_with_attributes(attributes));

    assert_eq!(err.violations.len(), 3);
    assert!(err.violations.iter().all(|v| v.kind == ViolationKind::Structural));
    find(&err, "solutions[0].attributes[0].attributes");
    find(&err, "solutions[0].attributes[1].options");
    find(&err, "solutions[0].attributes[2].conditions[0].conditions");
}

#[test]
fn test_duplicate_ids_within_solution() {
    let mut candidate = cmsload_schema();
    candidate["solutions"][0]["attributes"][2]["attributes"][1]["id"] = json!("stagger");
    let script = candidate["solutions"][0]["scripts"][0].clone();
    candidate["solutions"][0]["scripts"]
        .as_array_mut()
        .unwrap()
        .push(script);
    let err = reject(&candidate);

    let attribute = find(&err, "solutions[0].attributes[2].attributes[1].id");
    assert_eq!(attribute.kind, ViolationKind::Uniqueness);
    assert!(attribute.reason.contains("stagger"));
    let script = find(&err, "solutions[0].scripts[1].id");
    assert_eq!(script.kind, ViolationKind::Uniqueness);
}

#[test]
fn test_duplicate_option_values() {
    let mut candidate = cmsload_schema();
    candidate["solutions"][0]["attributes"][0]["options"][1]["attributeValue"] = json!("list");
    let err = reject(&candidate);
    let violation = find(&err, "solutions[0].attributes[0].options[1].attributeValue");
    assert_eq!(violation.kind, ViolationKind::Uniqueness);
}

#[test]
fn test_self_reference_is_rejected() {
    let attributes = json!([text_attribute("label", Some(json!([leaf("label", json!("x"))])))]);
    let err = reject(&schema_with_attributes(attributes.clone()));
    let violation = find(&err, "solutions[0].attributes[0].conditions[0].attributeId");
    assert_eq!(violation.kind, ViolationKind::Referential);

    // Self reference is rejected even when cycle detection is off.
    let relaxed = Validator::builder().detect_cycles(false).build();
    assert!(relaxed.validate(&schema_with_attributes(attributes)).is_err());
}

#[test]
fn test_group_condition_on_own_member_is_rejected() {
    let attributes = json!([{
        "type": "group",
        "name": "Loop",
        "conditions": [leaf("member", json!("on"))],
        "attributes": [text_attribute("member", None)]
    }]);
    let err = reject(&schema_with_attributes(attributes));
    let violation = find(&err, "solutions[0].attributes[0].conditions[0].attributeId");
    assert_eq!(violation.kind, ViolationKind::Referential);
}

#[test]
fn test_dependency_cycles() {
    let attributes = json!([
        text_attribute("a", Some(json!([leaf("b", json!("x"))]))),
        text_attribute("b", Some(json!([leaf("a", json!("y"))]))),
    ]);
    let candidate = schema_with_attributes(attributes);

    let err = reject(&candidate);
    assert_eq!(err.violations.len(), 1);
    let violation = find(&err, "solutions[0].attributes[0].conditions");
    assert_eq!(violation.kind, ViolationKind::Referential);
    assert!(violation.reason.contains("a -> b -> a"));

    let relaxed = Validator::builder().detect_cycles(false).build();
    assert!(relaxed.validate(&candidate).is_ok());
}

#[test]
fn test_cycle_through_group_conditions() {
    let attributes = json!([
        text_attribute("trigger", Some(json!([leaf("inner", json!("on"))]))),
        {
            "type": "group",
            "name": "Gated",
            "conditions": [leaf("trigger", json!("on"))],
            "attributes": [text_attribute("inner", None)]
        }
    ]);
    let err = reject(&schema_with_attributes(attributes));
    let violation = find(&err, "solutions[0].attributes[0].conditions");
    assert!(violation.reason.contains("trigger -> inner -> trigger"));
}

#[test]
fn test_collects_all_violations_in_one_pass() {
    let mut candidate = cmsload_schema();
    let solution = first_solution(&mut candidate);
    solution["scripts"][0]["src"] = json!(12);
    solution["attributes"][0]["nodeTypes"] = json!(["NotARealNode"]);
    solution["attributes"][1]["conditions"][0]["attributeId"] = json!("ghost");
    solution["attributes"][2]["attributes"][0]["options"] = json!([]);

    let err = reject(&candidate);
    assert_eq!(err.violations.len(), 4);
    assert!(err.has_kind(ViolationKind::Structural));
    assert!(err.has_kind(ViolationKind::Enumeration));
    assert!(err.has_kind(ViolationKind::Referential));

    let message = err.to_string();
    assert!(message.contains("4 violation(s)"));
    assert!(message.contains("solutions[0].scripts[0].src"));
}

#[test]
fn test_strict_mode_rejects_unknown_fields() {
    let mut candidate = cmsload_schema();
    candidate["solutions"][0]["color"] = json!("red");

    let lenient = Validator::default().validate(&candidate).unwrap();
    let serialized = serde_json::to_value(&lenient).unwrap();
    assert!(serialized["solutions"][0].get("color").is_none());

    let strict = Validator::builder().strict(true).build();
    let err = strict.validate(&candidate).unwrap_err();
    let violation = find(&err, "solutions[0].color");
    assert_eq!(violation.kind, ViolationKind::Structural);
    assert_eq!(violation.reason, "unrecognized field");

    // The example itself only uses grammar fields.
    assert!(strict.validate(&cmsload_schema()).is_ok());
}

#[test]
fn test_root_must_be_an_object() {
    let err = reject(&json!(["not", "a", "schema"]));
    assert_eq!(err.violations.len(), 1);
    assert!(err.violations[0].path.is_root());
    assert_eq!(err.violations[0].path.to_string(), "<root>");
    assert_eq!(err.violations[0].reason, "expected object, received array");
}

#[test]
fn test_unknown_node_kind_is_structural() {
    let attributes = json!([{ "type": "section", "name": "Nope" }]);
    let err = reject(&schema_with_attributes(attributes));
    let violation = find(&err, "solutions[0].attributes[0].type");
    assert_eq!(violation.kind, ViolationKind::Structural);
}

#[test]
fn test_condition_nesting_is_capped() {
    let mut condition = leaf("label", json!("x"));
    for _ in 0..200 {
        condition = json!({ "type": "group", "operator": "and", "conditions": [condition] });
    }
    let attributes = json!([
        text_attribute("label", None),
        text_attribute("deep", Some(json!([condition]))),
    ]);
    let err = reject(&schema_with_attributes(attributes));

    assert_eq!(err.violations.len(), 1);
    let violation = &err.violations[0];
    assert_eq!(violation.kind, ViolationKind::Structural);
    assert!(violation.reason.contains("deeper than 128 levels"));
    // solutions[0].attributes[1].conditions[0] plus 128 nested `.conditions[i]` steps.
    assert_eq!(violation.path.segments().len(), 6 + 2 * 128);
}

#[test]
fn test_long_dependency_chains() {
    const LENGTH: usize = 10_000;
    let attributes: Vec<Value> = (0..LENGTH)
        .map(|i| {
            let next = format!("a{}", i + 1);
            let conditions = (i + 1 < LENGTH).then(|| json!([leaf(&next, json!("on"))]));
            text_attribute(&format!("a{}", i), conditions)
        })
        .collect();
    let mut candidate = schema_with_attributes(Value::Array(attributes));
    assert!(attrschema::validate(&candidate).is_ok());

    // Closing the chain turns it into a single cycle.
    first_solution(&mut candidate)["attributes"][LENGTH - 1]["conditions"] =
        json!([leaf("a0", json!("on"))]);
    let err = reject(&candidate);
    assert_eq!(err.violations.len(), 1);
    assert!(err.violations[0]
        .reason
        .starts_with("conditions form a dependency cycle: a0 -> a1 -> a2"));
}
