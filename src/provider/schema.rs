//! Attribute schemas declared to the host, plus plan validation against them.

use super::diagnostics::Diagnostics;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Value shape of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    String,
    Int64,
    Bool,
    StringList,
    Object,
    ObjectList,
}

impl AttributeType {
    fn accepts(&self, value: &Value) -> bool {
        match self {
            AttributeType::String => value.is_string(),
            AttributeType::Int64 => value.is_i64() || value.is_u64(),
            AttributeType::Bool => value.is_boolean(),
            AttributeType::StringList => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
            AttributeType::Object => value.is_object(),
            AttributeType::ObjectList => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_object)),
        }
    }
}

/// Who supplies an attribute's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeMode {
    Required,
    Optional,
    /// Set by the user or, when omitted, by its default.
    OptionalComputed,
    /// Set by the provider only.
    Computed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    #[serde(rename = "type")]
    pub attribute_type: AttributeType,
    pub mode: AttributeMode,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub description: &'static str,
    pub sensitive: bool,
    pub requires_replace: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Attributes of an `Object` or of each element of an `ObjectList`.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub nested: BTreeMap<&'static str, Attribute>,
}

impl Attribute {
    fn new(attribute_type: AttributeType, mode: AttributeMode) -> Self {
        Self {
            attribute_type,
            mode,
            description: "",
            sensitive: false,
            requires_replace: false,
            default: None,
            nested: BTreeMap::new(),
        }
    }

    pub fn required(attribute_type: AttributeType) -> Self {
        Self::new(attribute_type, AttributeMode::Required)
    }

    pub fn optional(attribute_type: AttributeType) -> Self {
        Self::new(attribute_type, AttributeMode::Optional)
    }

    pub fn computed(attribute_type: AttributeType) -> Self {
        Self::new(attribute_type, AttributeMode::Computed)
    }

    /// An optional attribute that takes `default` when omitted.
    pub fn with_default(attribute_type: AttributeType, default: Value) -> Self {
        let mut attribute = Self::new(attribute_type, AttributeMode::OptionalComputed);
        attribute.default = Some(default);
        attribute
    }

    #[must_use]
    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    #[must_use]
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    /// Changing the attribute destroys and recreates the resource.
    #[must_use]
    pub fn requires_replace(mut self) -> Self {
        self.requires_replace = true;
        self
    }

    #[must_use]
    pub fn nested(mut self, attributes: impl IntoIterator<Item = (&'static str, Attribute)>) -> Self {
        self.nested = attributes.into_iter().collect();
        self
    }

    fn is_user_settable(&self) -> bool {
        self.mode != AttributeMode::Computed
    }
}

/// The schema of a resource, data source or the provider block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schema {
    pub description: &'static str,
    pub attributes: BTreeMap<&'static str, Attribute>,
}

impl Schema {
    pub fn new(description: &'static str) -> Self {
        Self {
            description,
            attributes: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn attribute(mut self, name: &'static str, attribute: Attribute) -> Self {
        self.attributes.insert(name, attribute);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Validates a plan and fills in defaults.
    ///
    /// Computed-only attributes may be present as `null` (unknown) and are
    /// dropped; a concrete value for one is an error.
    pub fn prepare_plan(&self, plan: Value) -> Result<Value, Diagnostics> {
        let mut diags = Diagnostics::new();
        let prepared = match plan {
            Value::Object(map) => prepare_object(&self.attributes, map, "", &mut diags),
            Value::Null => prepare_object(&self.attributes, Map::new(), "", &mut diags),
            other => {
                diags.add_error(
                    "Invalid plan",
                    format!("expected an object, got {}", type_name_of(&other)),
                );
                Map::new()
            }
        };
        if diags.has_error() {
            Err(diags)
        } else {
            Ok(Value::Object(prepared))
        }
    }

    /// Paths of `requires_replace` attributes whose planned value differs
    /// from the prior state. Missing and `null` compare equal.
    pub fn replace_diff(&self, prior: &Value, planned: &Value) -> Vec<String> {
        let mut paths = Vec::new();
        collect_replace_diff(&self.attributes, prior, planned, "", &mut paths);
        paths
    }

    /// A copy of `state` with every sensitive attribute masked.
    pub fn redact(&self, state: &Value) -> Value {
        redact_object(&self.attributes, state)
    }
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

fn type_name_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

fn prepare_object(
    attributes: &BTreeMap<&'static str, Attribute>,
    mut input: Map<String, Value>,
    prefix: &str,
    diags: &mut Diagnostics,
) -> Map<String, Value> {
    let mut output = Map::new();

    for key in input.keys() {
        if !attributes.contains_key(key.as_str()) {
            diags.add_attribute_error(
                join(prefix, key),
                "Unsupported attribute",
                format!("{} is not declared by the schema", key),
            );
        }
    }

    for (name, attribute) in attributes {
        let path = join(prefix, name);
        let value = input.remove(*name).unwrap_or(Value::Null);

        if attribute.mode == AttributeMode::Computed {
            if !value.is_null() {
                diags.add_attribute_error(
                    path,
                    "Computed attribute set",
                    format!("{} is set by the provider and cannot be configured", name),
                );
            }
            continue;
        }

        let value = match (value, &attribute.default) {
            (Value::Null, Some(default)) => default.clone(),
            (Value::Null, None) if attribute.mode == AttributeMode::Required => {
                diags.add_attribute_error(
                    path,
                    "Missing required attribute",
                    format!("{} must be set", name),
                );
                continue;
            }
            (Value::Null, None) => continue,
            (value, _) => value,
        };

        if !attribute.attribute_type.accepts(&value) {
            diags.add_attribute_error(
                path,
                "Incorrect attribute type",
                format!(
                    "{} expects {:?}, got {}",
                    name,
                    attribute.attribute_type,
                    type_name_of(&value)
                ),
            );
            continue;
        }

        let value = match (attribute.attribute_type, value) {
            (AttributeType::Object, Value::Object(map)) if !attribute.nested.is_empty() => {
                Value::Object(prepare_object(&attribute.nested, map, &path, diags))
            }
            (AttributeType::ObjectList, Value::Array(items)) if !attribute.nested.is_empty() => {
                Value::Array(
                    items
                        .into_iter()
                        .enumerate()
                        .map(|(i, item)| match item {
                            Value::Object(map) => Value::Object(prepare_object(
                                &attribute.nested,
                                map,
                                &format!("{}[{}]", path, i),
                                diags,
                            )),
                            other => other,
                        })
                        .collect(),
                )
            }
            (_, value) => value,
        };

        output.insert((*name).to_string(), value);
    }

    output
}

fn collect_replace_diff(
    attributes: &BTreeMap<&'static str, Attribute>,
    prior: &Value,
    planned: &Value,
    prefix: &str,
    paths: &mut Vec<String>,
) {
    for (name, attribute) in attributes {
        if !attribute.is_user_settable() {
            continue;
        }
        let before = prior.get(*name).unwrap_or(&Value::Null);
        let after = planned.get(*name).unwrap_or(&Value::Null);
        let path = join(prefix, name);

        if attribute.requires_replace && before != after {
            paths.push(path);
        } else if attribute.attribute_type == AttributeType::Object && !attribute.nested.is_empty() {
            collect_replace_diff(&attribute.nested, before, after, &path, paths);
        }
    }
}

fn redact_object(attributes: &BTreeMap<&'static str, Attribute>, value: &Value) -> Value {
    let Value::Object(map) = value else {
        return value.clone();
    };
    let redacted = map
        .iter()
        .map(|(key, inner)| {
            let masked = match attributes.get(key.as_str()) {
                Some(attribute) if attribute.sensitive && !inner.is_null() => {
                    Value::String("***".to_string())
                }
                Some(attribute) if attribute.attribute_type == AttributeType::Object => {
                    redact_object(&attribute.nested, inner)
                }
                Some(attribute) if attribute.attribute_type == AttributeType::ObjectList => {
                    match inner {
                        Value::Array(items) => Value::Array(
                            items
                                .iter()
                                .map(|item| redact_object(&attribute.nested, item))
                                .collect(),
                        ),
                        other => other.clone(),
                    }
                }
                _ => inner.clone(),
            };
            (key.clone(), masked)
        })
        .collect();
    Value::Object(redacted)
}
