use super::{Condition, NodeType};
use serde::{Deserialize, Serialize};
use serde_json::Number;

/// The root of an attribute schema. This is the exact shape persisted to `schema.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub id: String,
    pub name: String,
    pub solutions: Vec<Solution>,
}

/// A named feature bundle: the scripts it loads and the attributes it exposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub id: String,
    pub name: String,
    pub scripts: Vec<ScriptRef>,
    pub attributes: Vec<AttributeNode>,
}

impl Solution {
    /// Iterates every attribute of the solution, including the ones nested in groups,
    /// in declaration order. Each item carries the group it belongs to, if any.
    pub fn attributes_flat(&self) -> impl Iterator<Item = (Option<&AttributeGroup>, &Attribute)> {
        self.attributes.iter().flat_map(|node| match node {
            AttributeNode::Attribute(attribute) => vec![(None, attribute)],
            AttributeNode::Group(group) => group
                .attributes
                .iter()
                .map(|attribute| (Some(group), attribute))
                .collect(),
        })
    }

    pub fn find_attribute(&self, id: &str) -> Option<&Attribute> {
        self.attributes_flat()
            .map(|(_, attribute)| attribute)
            .find(|attribute| attribute.id == id)
    }

    pub fn find_group(&self, name: &str) -> Option<&AttributeGroup> {
        self.attributes.iter().find_map(|node| match node {
            AttributeNode::Group(group) if group.name == name => Some(group),
            _ => None,
        })
    }
}

/// A script the platform loads when the solution is active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptRef {
    pub id: String,
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defer: Option<bool>,
    #[serde(rename = "async", default, skip_serializing_if = "Option::is_none")]
    pub is_async: Option<bool>,
    pub location: ScriptLocation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptLocation {
    Head,
    Body,
}

impl ScriptLocation {
    pub const ALL: [&'static str; 2] = ["head", "body"];
}

/// An entry of a solution's attribute list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AttributeNode {
    #[serde(rename = "attribute")]
    Attribute(Attribute),
    #[serde(rename = "group")]
    Group(AttributeGroup),
}

/// A named container of attributes, optionally restricted by node type and conditions.
/// Groups never contain other groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeGroup {
    pub name: String,
    #[serde(with = "members")]
    pub attributes: Vec<Attribute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_types: Option<Vec<NodeType>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<Condition>>,
}

/// A single configurable property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    pub id: String,
    pub name: String,
    pub description: String,
    pub attribute_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_types: Option<Vec<NodeType>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<Condition>>,
    #[serde(flatten)]
    pub input: AttributeInput,
}

impl Attribute {
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }
}

/// The input kind of an attribute. The `optionsType` tag decides which value fields exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "optionsType")]
pub enum AttributeInput {
    #[serde(rename = "checkbox")]
    Checkbox,
    #[serde(rename = "dropdown", rename_all = "camelCase")]
    Dropdown {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        attribute_value: Option<String>,
        options: Vec<DropdownOption>,
    },
    #[serde(rename = "text-input", rename_all = "camelCase")]
    TextInput {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        attribute_value: Option<String>,
    },
    #[serde(rename = "integer-input", rename_all = "camelCase")]
    IntegerInput {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        attribute_value: Option<Number>,
    },
    #[serde(rename = "float-input", rename_all = "camelCase")]
    FloatInput {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        attribute_value: Option<Number>,
    },
}

impl AttributeInput {
    pub const OPTIONS_TYPES: [&'static str; 5] = [
        "checkbox",
        "dropdown",
        "text-input",
        "integer-input",
        "float-input",
    ];

    pub fn options_type(&self) -> &'static str {
        match self {
            AttributeInput::Checkbox => "checkbox",
            AttributeInput::Dropdown { .. } => "dropdown",
            AttributeInput::TextInput { .. } => "text-input",
            AttributeInput::IntegerInput { .. } => "integer-input",
            AttributeInput::FloatInput { .. } => "float-input",
        }
    }
}

/// One choice of a dropdown attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropdownOption {
    pub name: String,
    pub description: String,
    pub attribute_value: String,
}

/// Group members keep their `"type": "attribute"` tag on the wire, like top-level attributes.
mod members {
    use super::Attribute;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize)]
    #[serde(tag = "type")]
    enum TaggedRef<'a> {
        #[serde(rename = "attribute")]
        Attribute(&'a Attribute),
    }

    #[derive(Deserialize)]
    #[serde(tag = "type")]
    enum Tagged {
        #[serde(rename = "attribute")]
        Attribute(Attribute),
    }

    pub(super) fn serialize<S: Serializer>(
        attributes: &[Attribute],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(attributes.iter().map(TaggedRef::Attribute))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Attribute>, D::Error> {
        let tagged = Vec::<Tagged>::deserialize(deserializer)?;
        Ok(tagged
            .into_iter()
            .map(|Tagged::Attribute(attribute)| attribute)
            .collect())
    }
}
