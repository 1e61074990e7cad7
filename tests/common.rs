//! Common test fixtures for schema candidates and assignments.
use serde_json::{Value, json};

/// The CMS Load example schema.
///
/// `element` is a dropdown defaulting to `list`, `mode` defaults to `load-under`.
/// "List settings" applies when `element == "list"`, "Pagination settings" when
/// `element == "list" AND mode == "pagination"`.
#[allow(dead_code)]
pub fn cmsload_schema() -> Value {
    json!({
        "id": "fs-attributes",
        "name": "Finsweet Attributes",
        "solutions": [{
            "id": "cmsload",
            "name": "CMS Load",
            "scripts": [{
                "id": "main",
                "src": "https://cdn.jsdelivr.net/npm/@finsweet/attributes-cmsload@1/cmsload.js",
                "async": true,
                "location": "head"
            }],
            "attributes": [
                {
                    "type": "attribute",
                    "id": "element",
                    "name": "Element",
                    "description": "Defines the type of element.",
                    "required": true,
                    "attributeName": "fs-cmsload-element",
                    "nodeTypes": ["DynamoList"],
                    "optionsType": "dropdown",
                    "attributeValue": "list",
                    "options": [
                        { "name": "List", "description": "Defines a list instance.", "attributeValue": "list" },
                        { "name": "Loader", "description": "Displays while the list is populated", "attributeValue": "loader" }
                    ]
                },
                {
                    "type": "group",
                    "name": "List settings",
                    "nodeTypes": ["DynamoList"],
                    "conditions": [
                        { "type": "condition", "attributeId": "element", "attributeValue": "list" }
                    ],
                    "attributes": [
                        {
                            "id": "mode",
                            "type": "attribute",
                            "name": "Mode",
                            "description": "Defines the loading mode",
                            "required": true,
                            "attributeName": "fs-cmsload-mode",
                            "attributeValue": "load-under",
                            "optionsType": "dropdown",
                            "options": [
                                { "name": "Load Under", "description": "Loads on Next click", "attributeValue": "load-under" },
                                { "name": "Render All", "description": "Loads all items at once", "attributeValue": "render-all" },
                                { "name": "Pagination", "description": "Creates pagination buttons", "attributeValue": "pagination" },
                                { "name": "Infinite", "description": "Loads on scroll", "attributeValue": "infinite" }
                            ]
                        },
                        {
                            "type": "attribute",
                            "id": "animation",
                            "name": "Animation",
                            "description": "Defines the animation that runs when rendering new items.",
                            "attributeName": "fs-cmsload-animation",
                            "required": true,
                            "attributeValue": "ease-out",
                            "optionsType": "dropdown",
                            "options": [
                                { "name": "Ease-out", "description": "Ease-out animation.", "attributeValue": "ease-out" },
                                { "name": "Ease-in", "description": "Ease-in animation.", "attributeValue": "ease-in" }
                            ]
                        },
                        {
                            "type": "attribute",
                            "id": "duration",
                            "name": "Duration",
                            "description": "Defines the list animation duration.",
                            "required": true,
                            "attributeName": "fs-cmsload-duration",
                            "attributeValue": 500,
                            "optionsType": "integer-input"
                        },
                        {
                            "type": "attribute",
                            "id": "stagger",
                            "name": "Stagger load",
                            "description": "Defines if the items animation should be staggered",
                            "attributeName": "fs-cmsload-stagger",
                            "required": false,
                            "attributeValue": 0,
                            "optionsType": "integer-input"
                        },
                        {
                            "type": "attribute",
                            "id": "resetix",
                            "name": "Stagger load",
                            "description": "Defines if the items animation should be staggered",
                            "attributeName": "fs-cmsload-resetix",
                            "required": false,
                            "optionsType": "checkbox"
                        }
                    ]
                },
                {
                    "type": "group",
                    "name": "Pagination settings",
                    "nodeTypes": ["DynamoList"],
                    "conditions": [{
                        "type": "group",
                        "operator": "and",
                        "conditions": [
                            { "type": "condition", "attributeId": "element", "attributeValue": "list" },
                            { "type": "condition", "attributeId": "mode", "attributeValue": "pagination" }
                        ]
                    }],
                    "attributes": [
                        {
                            "type": "attribute",
                            "id": "siblings",
                            "name": "Siblings",
                            "description": "Digits to display either side of the current page.",
                            "required": true,
                            "attributeName": "fs-cmsload-siblings",
                            "attributeValue": 2,
                            "optionsType": "integer-input"
                        },
                        {
                            "type": "attribute",
                            "id": "boundary",
                            "name": "Boundary",
                            "description": "Comma separated values per breakpoint.",
                            "attributeName": "fs-cmsload-boundary",
                            "attributeValue": "2,2,1,1",
                            "optionsType": "text-input"
                        }
                    ]
                }
            ]
        }]
    })
}

/// A minimal valid schema with a single solution holding `attributes`.
#[allow(dead_code)]
pub fn schema_with_attributes(attributes: Value) -> Value {
    json!({
        "id": "test-schema",
        "name": "Test Schema",
        "solutions": [{
            "id": "solution",
            "name": "Solution",
            "scripts": [],
            "attributes": attributes
        }]
    })
}

/// A text-input attribute with the given id and optional conditions.
#[allow(dead_code)]
pub fn text_attribute(id: &str, conditions: Option<Value>) -> Value {
    let mut attribute = json!({
        "type": "attribute",
        "id": id,
        "name": id,
        "description": format!("The {} attribute", id),
        "attributeName": format!("fs-test-{}", id),
        "optionsType": "text-input"
    });
    if let Some(conditions) = conditions {
        attribute["conditions"] = conditions;
    }
    attribute
}

/// A condition leaf comparing `attribute_id` against `value`.
#[allow(dead_code)]
pub fn leaf(attribute_id: &str, value: Value) -> Value {
    json!({ "type": "condition", "attributeId": attribute_id, "attributeValue": value })
}

/// Returns the mutable solution of a candidate built by this module.
#[allow(dead_code)]
pub fn first_solution(candidate: &mut Value) -> &mut Value {
    &mut candidate["solutions"][0]
}
