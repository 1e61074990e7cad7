use super::path::FieldPath;
use crate::error::{Violation, ViolationKind};
use crate::schema::{AttributeInput, MAX_CONDITION_DEPTH, NodeType, Operator, ScriptLocation};
use itertools::Itertools;
use serde_json::{Map, Value};
use url::Url;

const SCHEMA_FIELDS: &[&str] = &["id", "name", "solutions"];
const SOLUTION_FIELDS: &[&str] = &["id", "name", "scripts", "attributes"];
const SCRIPT_FIELDS: &[&str] = &["id", "src", "defer", "async", "location"];
const GROUP_FIELDS: &[&str] = &["type", "name", "attributes", "nodeTypes", "conditions"];
const ATTRIBUTE_FIELDS: &[&str] = &[
    "type",
    "id",
    "name",
    "description",
    "attributeName",
    "required",
    "nodeTypes",
    "conditions",
    "optionsType",
    "attributeValue",
    "options",
];
const OPTION_FIELDS: &[&str] = &["name", "description", "attributeValue"];
const LEAF_FIELDS: &[&str] = &["type", "attributeId", "attributeValue"];
const CONDITION_GROUP_FIELDS: &[&str] = &["type", "operator", "conditions"];

/// Who a condition tree belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Owner {
    /// Index into `SolutionIndex::attributes`.
    Attribute(usize),
    /// Index into `SolutionIndex::groups`.
    Group(usize),
}

/// A condition leaf's `attributeId`, as found in the document.
#[derive(Debug, Clone)]
pub(super) struct ConditionRef {
    pub attribute_id: String,
    pub path: FieldPath,
    pub owner: Owner,
}

#[derive(Debug, Clone)]
pub(super) struct AttributeEntry {
    pub id: String,
    pub path: FieldPath,
    pub group: Option<usize>,
}

#[derive(Debug, Clone)]
pub(super) struct GroupEntry {
    pub path: FieldPath,
}

/// Everything the cross-reference pass needs to know about one solution.
#[derive(Debug, Clone, Default)]
pub(super) struct SolutionIndex {
    pub path: FieldPath,
    pub id: Option<String>,
    pub scripts: Vec<(String, FieldPath)>,
    pub attributes: Vec<AttributeEntry>,
    pub groups: Vec<GroupEntry>,
    pub references: Vec<ConditionRef>,
}

/// The closed set of attribute input kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputKind {
    Checkbox,
    Dropdown,
    TextInput,
    IntegerInput,
    FloatInput,
}

impl InputKind {
    fn parse(tag: &str) -> Option<Self> {
        match tag {
            "checkbox" => Some(InputKind::Checkbox),
            "dropdown" => Some(InputKind::Dropdown),
            "text-input" => Some(InputKind::TextInput),
            "integer-input" => Some(InputKind::IntegerInput),
            "float-input" => Some(InputKind::FloatInput),
            _ => None,
        }
    }
}

/// Walks an untyped schema candidate, recording shape violations and building the
/// per-solution indexes used by the cross-reference pass.
pub(super) struct SchemaWalker {
    strict: bool,
    pub(super) violations: Vec<Violation>,
    pub(super) solution_ids: Vec<(String, FieldPath)>,
    pub(super) solutions: Vec<SolutionIndex>,
}

impl SchemaWalker {
    pub(super) fn new(strict: bool) -> Self {
        Self {
            strict,
            violations: Vec::new(),
            solution_ids: Vec::new(),
            solutions: Vec::new(),
        }
    }

    pub(super) fn walk_schema(&mut self, value: &Value) {
        let path = FieldPath::root();
        let Some(map) = self.expect_object(value, &path) else {
            return;
        };
        self.check_fields(map, SCHEMA_FIELDS, &path);
        self.require_string(map, "id", &path);
        self.require_string(map, "name", &path);

        if let Some(solutions) = self.require_array(map, "solutions", &path) {
            let solutions_path = path.field("solutions");
            for (i, solution) in solutions.iter().enumerate() {
                self.walk_solution(solution, solutions_path.index(i));
            }
        }
    }

    fn walk_solution(&mut self, value: &Value, path: FieldPath) {
        let Some(map) = self.expect_object(value, &path) else {
            return;
        };
        self.check_fields(map, SOLUTION_FIELDS, &path);

        let mut index = SolutionIndex {
            path: path.clone(),
            ..Default::default()
        };
        if let Some(id) = self.require_string(map, "id", &path) {
            self.solution_ids.push((id.to_string(), path.field("id")));
            index.id = Some(id.to_string());
        }
        self.require_string(map, "name", &path);

        if let Some(scripts) = self.require_array(map, "scripts", &path) {
            let scripts_path = path.field("scripts");
            for (i, script) in scripts.iter().enumerate() {
                self.walk_script(script, scripts_path.index(i), &mut index);
            }
        }

        if let Some(nodes) = self.require_array(map, "attributes", &path) {
            let nodes_path = path.field("attributes");
            for (i, node) in nodes.iter().enumerate() {
                self.walk_attribute_node(node, nodes_path.index(i), &mut index);
            }
        }

        self.solutions.push(index);
    }

    fn walk_script(&mut self, value: &Value, path: FieldPath, index: &mut SolutionIndex) {
        let Some(map) = self.expect_object(value, &path) else {
            return;
        };
        self.check_fields(map, SCRIPT_FIELDS, &path);

        if let Some(id) = self.require_string(map, "id", &path) {
            index.scripts.push((id.to_string(), path.field("id")));
        }
        if let Some(src) = self.require_string(map, "src", &path) {
            if let Err(e) = Url::parse(src) {
                self.push(
                    ViolationKind::Structural,
                    path.field("src"),
                    format!("invalid URL '{}': {}", src, e),
                );
            }
        }
        self.optional_bool(map, "defer", &path);
        self.optional_bool(map, "async", &path);

        if let Some(location) = self.require_string(map, "location", &path) {
            if !ScriptLocation::ALL.contains(&location) {
                self.push(
                    ViolationKind::Enumeration,
                    path.field("location"),
                    format!(
                        "unrecognized location '{}', expected one of {}",
                        location,
                        ScriptLocation::ALL.iter().join(", ")
                    ),
                );
            }
        }
    }

    fn walk_attribute_node(&mut self, value: &Value, path: FieldPath, index: &mut SolutionIndex) {
        let Some(map) = self.expect_object(value, &path) else {
            return;
        };
        match self.require_string(map, "type", &path) {
            Some("attribute") => self.walk_attribute(map, path, None, index),
            Some("group") => self.walk_group(map, path, index),
            Some(other) => self.push(
                ViolationKind::Structural,
                path.field("type"),
                format!("unrecognized type '{}', expected attribute or group", other),
            ),
            None => {}
        }
    }

    fn walk_group(&mut self, map: &Map<String, Value>, path: FieldPath, index: &mut SolutionIndex) {
        self.check_fields(map, GROUP_FIELDS, &path);
        self.require_string(map, "name", &path);
        self.optional_node_types(map, &path);

        let group = index.groups.len();
        index.groups.push(GroupEntry { path: path.clone() });

        if let Some(members) = self.require_array(map, "attributes", &path) {
            let members_path = path.field("attributes");
            if members.is_empty() {
                self.push(
                    ViolationKind::Structural,
                    members_path.clone(),
                    "a group must contain at least one attribute",
                );
            }
            for (i, member) in members.iter().enumerate() {
                let member_path = members_path.index(i);
                let Some(member_map) = self.expect_object(member, &member_path) else {
                    continue;
                };
                match self.require_string(member_map, "type", &member_path) {
                    Some("attribute") => {
                        self.walk_attribute(member_map, member_path, Some(group), index)
                    }
                    Some("group") => self.push(
                        ViolationKind::Structural,
                        member_path.field("type"),
                        "groups cannot be nested inside groups",
                    ),
                    Some(other) => self.push(
                        ViolationKind::Structural,
                        member_path.field("type"),
                        format!("unrecognized type '{}', expected attribute", other),
                    ),
                    None => {}
                }
            }
        }

        self.optional_conditions(map, &path, Owner::Group(group), index);
    }

    fn walk_attribute(
        &mut self,
        map: &Map<String, Value>,
        path: FieldPath,
        group: Option<usize>,
        index: &mut SolutionIndex,
    ) {
        self.check_fields(map, ATTRIBUTE_FIELDS, &path);
        let id = self.require_string(map, "id", &path);
        self.require_string(map, "name", &path);
        self.require_string(map, "description", &path);
        self.require_string(map, "attributeName", &path);
        self.optional_bool(map, "required", &path);
        self.optional_node_types(map, &path);

        // Attributes without a usable id still get their conditions checked,
        // they just cannot take part in reference resolution.
        let owner = match id {
            Some(id) => {
                index.attributes.push(AttributeEntry {
                    id: id.to_string(),
                    path: path.clone(),
                    group,
                });
                Some(Owner::Attribute(index.attributes.len() - 1))
            }
            None => None,
        };
        match owner {
            Some(owner) => self.optional_conditions(map, &path, owner, index),
            None => self.optional_conditions_detached(map, &path),
        }

        let Some(tag) = self.require_string(map, "optionsType", &path) else {
            return;
        };
        let Some(kind) = InputKind::parse(tag) else {
            self.push(
                ViolationKind::Enumeration,
                path.field("optionsType"),
                format!(
                    "unrecognized optionsType '{}', expected one of {}",
                    tag,
                    AttributeInput::OPTIONS_TYPES.iter().join(", ")
                ),
            );
            return;
        };

        match kind {
            InputKind::Checkbox => {
                self.forbid(map, "attributeValue", tag, &path);
                self.forbid(map, "options", tag, &path);
            }
            InputKind::Dropdown => {
                self.optional_string(map, "attributeValue", &path);
                self.walk_options(map, &path);
            }
            InputKind::TextInput => {
                self.optional_string(map, "attributeValue", &path);
                self.forbid(map, "options", tag, &path);
            }
            InputKind::IntegerInput => {
                if let Some(number) = self.optional_number(map, "attributeValue", &path) {
                    let whole = number.is_i64()
                        || number.is_u64()
                        || number.as_f64().is_some_and(|n| n.fract() == 0.0);
                    if !whole {
                        self.push(
                            ViolationKind::Structural,
                            path.field("attributeValue"),
                            format!("expected a whole number, received {}", number),
                        );
                    }
                }
                self.forbid(map, "options", tag, &path);
            }
            InputKind::FloatInput => {
                self.optional_number(map, "attributeValue", &path);
                self.forbid(map, "options", tag, &path);
            }
        }
    }

    fn walk_options(&mut self, map: &Map<String, Value>, path: &FieldPath) {
        let Some(options) = self.require_array(map, "options", path) else {
            return;
        };
        let options_path = path.field("options");
        if options.is_empty() {
            self.push(
                ViolationKind::Structural,
                options_path.clone(),
                "a dropdown must offer at least one option",
            );
        }

        let mut seen: Vec<(&str, FieldPath)> = Vec::new();
        for (i, option) in options.iter().enumerate() {
            let option_path = options_path.index(i);
            let Some(option_map) = self.expect_object(option, &option_path) else {
                continue;
            };
            self.check_fields(option_map, OPTION_FIELDS, &option_path);
            self.require_string(option_map, "name", &option_path);
            self.require_string(option_map, "description", &option_path);
            let Some(value) = self.require_string(option_map, "attributeValue", &option_path) else {
                continue;
            };
            let value_path = option_path.field("attributeValue");
            if let Some((_, first)) = seen.iter().find(|(v, _)| *v == value) {
                let reason = format!(
                    "duplicate option value '{}' (first declared at {})",
                    value, first
                );
                self.push(ViolationKind::Uniqueness, value_path, reason);
            } else {
                seen.push((value, value_path));
            }
        }
    }

    fn optional_conditions(
        &mut self,
        map: &Map<String, Value>,
        path: &FieldPath,
        owner: Owner,
        index: &mut SolutionIndex,
    ) {
        let Some(conditions) = self.optional_array(map, "conditions", path) else {
            return;
        };
        let conditions_path = path.field("conditions");
        for (i, condition) in conditions.iter().enumerate() {
            self.walk_condition(condition, conditions_path.index(i), 1, &mut |r| {
                index.references.push(ConditionRef {
                    attribute_id: r.0,
                    path: r.1,
                    owner,
                })
            });
        }
    }

    fn optional_conditions_detached(&mut self, map: &Map<String, Value>, path: &FieldPath) {
        let Some(conditions) = self.optional_array(map, "conditions", path) else {
            return;
        };
        let conditions_path = path.field("conditions");
        for (i, condition) in conditions.iter().enumerate() {
            self.walk_condition(condition, conditions_path.index(i), 1, &mut |_| {});
        }
    }

    fn walk_condition(
        &mut self,
        value: &Value,
        path: FieldPath,
        depth: usize,
        on_reference: &mut dyn FnMut((String, FieldPath)),
    ) {
        if depth > MAX_CONDITION_DEPTH {
            self.push(
                ViolationKind::Structural,
                path,
                format!("conditions are nested deeper than {} levels", MAX_CONDITION_DEPTH),
            );
            return;
        }
        let Some(map) = self.expect_object(value, &path) else {
            return;
        };
        match self.require_string(map, "type", &path) {
            Some("condition") => {
                self.check_fields(map, LEAF_FIELDS, &path);
                if let Some(id) = self.require_string(map, "attributeId", &path) {
                    on_reference((id.to_string(), path.field("attributeId")));
                }
                match map.get("attributeValue") {
                    Some(Value::String(_)) | Some(Value::Number(_)) => {}
                    Some(other) => self.push(
                        ViolationKind::Structural,
                        path.field("attributeValue"),
                        format!("expected string or number, received {}", type_name(other)),
                    ),
                    None => self.missing(&path, "attributeValue"),
                }
            }
            Some("group") => {
                self.check_fields(map, CONDITION_GROUP_FIELDS, &path);
                if let Some(operator) = self.require_string(map, "operator", &path) {
                    if !Operator::ALL.contains(&operator) {
                        self.push(
                            ViolationKind::Enumeration,
                            path.field("operator"),
                            format!(
                                "unrecognized operator '{}', expected one of {}",
                                operator,
                                Operator::ALL.iter().join(", ")
                            ),
                        );
                    }
                }
                if let Some(children) = self.require_array(map, "conditions", &path) {
                    let children_path = path.field("conditions");
                    if children.is_empty() {
                        self.push(
                            ViolationKind::Structural,
                            children_path.clone(),
                            "a condition group must contain at least one condition",
                        );
                    }
                    for (i, child) in children.iter().enumerate() {
                        let child_path = children_path.index(i);
                        self.walk_condition(child, child_path, depth + 1, on_reference);
                    }
                }
            }
            Some(other) => self.push(
                ViolationKind::Structural,
                path.field("type"),
                format!("unrecognized type '{}', expected condition or group", other),
            ),
            None => {}
        }
    }

    fn optional_node_types(&mut self, map: &Map<String, Value>, path: &FieldPath) {
        let Some(node_types) = self.optional_array(map, "nodeTypes", path) else {
            return;
        };
        let node_types_path = path.field("nodeTypes");
        for (i, node_type) in node_types.iter().enumerate() {
            let entry_path = node_types_path.index(i);
            match node_type {
                Value::String(name) if NodeType::lookup(name).is_some() => {}
                Value::String(name) => self.push(
                    ViolationKind::Enumeration,
                    entry_path,
                    format!("unknown nodeType '{}'", name),
                ),
                other => self.type_mismatch(entry_path, "string", other),
            }
        }
    }

    // --- Primitive checks ---

    fn push(&mut self, kind: ViolationKind, path: FieldPath, reason: impl Into<String>) {
        self.violations.push(Violation::new(kind, path, reason));
    }

    fn type_mismatch(&mut self, path: FieldPath, expected: &str, found: &Value) {
        self.push(
            ViolationKind::Structural,
            path,
            format!("expected {}, received {}", expected, type_name(found)),
        );
    }

    fn missing(&mut self, path: &FieldPath, key: &str) {
        self.push(
            ViolationKind::Structural,
            path.field(key),
            "required field is missing",
        );
    }

    fn expect_object<'v>(
        &mut self,
        value: &'v Value,
        path: &FieldPath,
    ) -> Option<&'v Map<String, Value>> {
        match value {
            Value::Object(map) => Some(map),
            other => {
                self.type_mismatch(path.clone(), "object", other);
                None
            }
        }
    }

    fn check_fields(&mut self, map: &Map<String, Value>, allowed: &[&str], path: &FieldPath) {
        if !self.strict {
            return;
        }
        for key in map.keys() {
            if !allowed.contains(&key.as_str()) {
                self.push(ViolationKind::Structural, path.field(key), "unrecognized field");
            }
        }
    }

    fn forbid(&mut self, map: &Map<String, Value>, key: &str, tag: &str, path: &FieldPath) {
        if map.contains_key(key) {
            self.push(
                ViolationKind::Structural,
                path.field(key),
                format!("{} is not allowed for optionsType '{}'", key, tag),
            );
        }
    }

    fn require_string<'v>(
        &mut self,
        map: &'v Map<String, Value>,
        key: &str,
        path: &FieldPath,
    ) -> Option<&'v str> {
        match map.get(key) {
            Some(Value::String(s)) => Some(s),
            Some(other) => {
                self.type_mismatch(path.field(key), "string", other);
                None
            }
            None => {
                self.missing(path, key);
                None
            }
        }
    }

    fn optional_string<'v>(
        &mut self,
        map: &'v Map<String, Value>,
        key: &str,
        path: &FieldPath,
    ) -> Option<&'v str> {
        match map.get(key) {
            Some(Value::String(s)) => Some(s),
            Some(other) => {
                self.type_mismatch(path.field(key), "string", other);
                None
            }
            None => None,
        }
    }

    fn optional_bool(&mut self, map: &Map<String, Value>, key: &str, path: &FieldPath) {
        match map.get(key) {
            Some(Value::Bool(_)) | None => {}
            Some(other) => self.type_mismatch(path.field(key), "boolean", other),
        }
    }

    fn optional_number<'v>(
        &mut self,
        map: &'v Map<String, Value>,
        key: &str,
        path: &FieldPath,
    ) -> Option<&'v serde_json::Number> {
        match map.get(key) {
            Some(Value::Number(n)) => Some(n),
            Some(other) => {
                self.type_mismatch(path.field(key), "number", other);
                None
            }
            None => None,
        }
    }

    fn require_array<'v>(
        &mut self,
        map: &'v Map<String, Value>,
        key: &str,
        path: &FieldPath,
    ) -> Option<&'v Vec<Value>> {
        match map.get(key) {
            Some(Value::Array(items)) => Some(items),
            Some(other) => {
                self.type_mismatch(path.field(key), "array", other);
                None
            }
            None => {
                self.missing(path, key);
                None
            }
        }
    }

    fn optional_array<'v>(
        &mut self,
        map: &'v Map<String, Value>,
        key: &str,
        path: &FieldPath,
    ) -> Option<&'v Vec<Value>> {
        match map.get(key) {
            Some(Value::Array(items)) => Some(items),
            Some(other) => {
                self.type_mismatch(path.field(key), "array", other);
                None
            }
            None => None,
        }
    }
}

/// JSON type name of a value, as used in violation reasons.
pub(super) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
