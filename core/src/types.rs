//! Core type definitions for LinkML schemas
//!
//! Only the metaslots that template generation reasons about are typed. Every
//! other metaslot found in a schema document is kept in the element's `extra`
//! map so that introspection and staging see the complete definition.

use crate::error::{LinkMLError, Result};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Open map of metaslots that have no typed field
pub type ExtraMetaslots = IndexMap<String, Value>;

/// Annotations keyed by tag
///
/// Values are either a bare scalar or a `{tag, value}` object, as written.
pub type Annotations = IndexMap<String, Value>;

/// Slot metaslots that a slot inherits from its `is_a` and mixin ancestors
/// when it has no truthy value of its own.
pub const INHERITED_SLOT_METASLOTS: &[&str] = &[
    "domain",
    "array",
    "inherited",
    "readonly",
    "ifabsent",
    "list_elements_unique",
    "list_elements_ordered",
    "shared",
    "key",
    "identifier",
    "designates_type",
    "role",
    "relational_role",
    "range",
    "range_expression",
    "enum_range",
    "bindings",
    "required",
    "recommended",
    "multivalued",
    "inlined",
    "inlined_as_list",
    "minimum_value",
    "maximum_value",
    "pattern",
    "structured_pattern",
    "unit",
    "implicit_prefix",
    "value_presence",
    "equals_string",
    "equals_string_in",
    "equals_number",
    "equals_expression",
    "exact_cardinality",
    "minimum_cardinality",
    "maximum_cardinality",
    "has_member",
    "all_members",
    "all_of",
    "any_of",
    "exactly_one_of",
    "none_of",
];

/// Schema definition - the root of a `LinkML` schema
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SchemaDefinition {
    /// Unique identifier for the schema
    #[serde(default)]
    pub id: String,

    /// Name of the schema
    #[serde(default)]
    pub name: String,

    /// Description of the schema
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Default range for slots
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_range: Option<String>,

    /// Prefix declarations
    #[serde(
        default,
        skip_serializing_if = "IndexMap::is_empty",
        deserialize_with = "nullable_map"
    )]
    pub prefixes: IndexMap<String, Value>,

    /// Import statements
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "string_or_list"
    )]
    pub imports: Vec<String>,

    /// Subset definitions
    #[serde(
        default,
        skip_serializing_if = "IndexMap::is_empty",
        deserialize_with = "element_map"
    )]
    pub subsets: IndexMap<String, SubsetDefinition>,

    /// Type definitions
    #[serde(
        default,
        skip_serializing_if = "IndexMap::is_empty",
        deserialize_with = "element_map"
    )]
    pub types: IndexMap<String, TypeDefinition>,

    /// Enum definitions
    #[serde(
        default,
        skip_serializing_if = "IndexMap::is_empty",
        deserialize_with = "element_map"
    )]
    pub enums: IndexMap<String, EnumDefinition>,

    /// Slot definitions
    #[serde(
        default,
        skip_serializing_if = "IndexMap::is_empty",
        deserialize_with = "element_map"
    )]
    pub slots: IndexMap<String, SlotDefinition>,

    /// Class definitions
    #[serde(
        default,
        skip_serializing_if = "IndexMap::is_empty",
        deserialize_with = "element_map"
    )]
    pub classes: IndexMap<String, ClassDefinition>,

    /// Remaining schema-level metaslots
    #[serde(flatten)]
    pub extra: ExtraMetaslots,
}

impl SchemaDefinition {
    /// Fill element `name` fields from their map keys
    ///
    /// `LinkML` documents use map keys as names, so most definitions arrive
    /// without an explicit `name`.
    pub fn populate_names(&mut self) {
        for (class_name, class_def) in &mut self.classes {
            if class_def.name.is_empty() {
                class_def.name.clone_from(class_name);
            }
            for (attr_name, attr_def) in &mut class_def.attributes {
                if attr_def.name.is_empty() {
                    attr_def.name.clone_from(attr_name);
                }
            }
            for (slot_name, slot_def) in &mut class_def.slot_usage {
                if slot_def.name.is_empty() {
                    slot_def.name.clone_from(slot_name);
                }
            }
        }

        for (slot_name, slot_def) in &mut self.slots {
            if slot_def.name.is_empty() {
                slot_def.name.clone_from(slot_name);
            }
        }

        for (enum_name, enum_def) in &mut self.enums {
            if enum_def.name.is_empty() {
                enum_def.name.clone_from(enum_name);
            }
        }

        for (type_name, type_def) in &mut self.types {
            if type_def.name.is_empty() {
                type_def.name.clone_from(type_name);
            }
        }

        for (subset_name, subset_def) in &mut self.subsets {
            if subset_def.name.is_empty() {
                subset_def.name.clone_from(subset_name);
            }
        }
    }
}

/// Class definition
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClassDefinition {
    /// Name of the class
    #[serde(default)]
    pub name: String,

    /// Description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Is this class abstract?
    #[serde(rename = "abstract", skip_serializing_if = "Option::is_none")]
    pub abstract_: Option<bool>,

    /// Is this a mixin?
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mixin: Option<bool>,

    /// Parent class (single inheritance)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_a: Option<String>,

    /// Mixin classes
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "string_or_list"
    )]
    pub mixins: Vec<String>,

    /// Slots used by this class
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "string_or_list"
    )]
    pub slots: Vec<String>,

    /// Slot usage overrides
    #[serde(
        default,
        skip_serializing_if = "IndexMap::is_empty",
        deserialize_with = "element_map"
    )]
    pub slot_usage: IndexMap<String, SlotDefinition>,

    /// Attributes (inline slots)
    #[serde(
        default,
        skip_serializing_if = "IndexMap::is_empty",
        deserialize_with = "element_map"
    )]
    pub attributes: IndexMap<String, SlotDefinition>,

    /// Annotations for the class
    #[serde(
        default,
        skip_serializing_if = "IndexMap::is_empty",
        deserialize_with = "nullable_map"
    )]
    pub annotations: Annotations,

    /// Remaining class metaslots
    #[serde(flatten)]
    pub extra: ExtraMetaslots,
}

/// Slot definition
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SlotDefinition {
    /// Name of the slot
    #[serde(default)]
    pub name: String,

    /// Description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Range (type, enum or class) of the slot
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,

    /// Is this slot required?
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    /// Is this slot multivalued?
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multivalued: Option<bool>,

    /// Is this slot an identifier?
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<bool>,

    /// Is this slot a key (unique within its container)?
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<bool>,

    /// Parent slot
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_a: Option<String>,

    /// Mixin slots
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "string_or_list"
    )]
    pub mixins: Vec<String>,

    /// Annotations for the slot
    #[serde(
        default,
        skip_serializing_if = "IndexMap::is_empty",
        deserialize_with = "nullable_map"
    )]
    pub annotations: Annotations,

    /// Remaining slot metaslots
    #[serde(flatten)]
    pub extra: ExtraMetaslots,
}

impl SlotDefinition {
    /// Create a slot with just a name
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Whether the slot is multivalued (unset counts as single-valued)
    #[must_use]
    pub fn is_multivalued(&self) -> bool {
        self.multivalued.unwrap_or(false)
    }

    /// Whether the slot is an identifier (unset counts as no)
    #[must_use]
    pub fn is_identifier(&self) -> bool {
        self.identifier.unwrap_or(false)
    }

    /// Take truthy metaslot values from `ancestor` where this slot has none
    ///
    /// Only metaslots listed in [`INHERITED_SLOT_METASLOTS`] are propagated.
    /// A falsy value (`multivalued: false`, an empty list) counts as none, so
    /// calling this nearest ancestor first keeps the nearest truthy value.
    ///
    /// # Errors
    ///
    /// Returns an error if either definition cannot be represented as JSON.
    pub fn inherit_from(&mut self, ancestor: &SlotDefinition) -> Result<()> {
        let mut target = self.metaslot_values()?;
        let source = ancestor.metaslot_values()?;
        for metaslot in INHERITED_SLOT_METASLOTS {
            if let Some(value) = source.get(*metaslot) {
                let own_is_falsy = !target.get(*metaslot).is_some_and(is_truthy);
                if own_is_falsy && is_truthy(value) {
                    target.insert((*metaslot).to_string(), value.clone());
                }
            }
        }
        *self = Self::from_metaslot_values(target)?;
        Ok(())
    }

    /// Overwrite metaslots with every value that `refinement` sets
    ///
    /// This is how `slot_usage` narrows a slot inside a class. Falsy values
    /// such as `0`, `""` or `false` still override; only null and empty
    /// lists or maps count as unset. The slot keeps its own name.
    ///
    /// # Errors
    ///
    /// Returns an error if either definition cannot be represented as JSON.
    pub fn refine_with(&mut self, refinement: &SlotDefinition) -> Result<()> {
        let mut target = self.metaslot_values()?;
        for (metaslot, value) in refinement.metaslot_values()? {
            if metaslot == "name" || is_unset(&value) {
                continue;
            }
            target.insert(metaslot, value);
        }
        *self = Self::from_metaslot_values(target)?;
        Ok(())
    }

    fn from_metaslot_values(values: Map<String, Value>) -> Result<Self> {
        serde_json::from_value(Value::Object(values)).map_err(|e| {
            LinkMLError::serialization(format!("cannot rebuild slot definition: {e}"))
        })
    }
}

/// Type definition
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TypeDefinition {
    /// Name of the type
    #[serde(default)]
    pub name: String,

    /// Base type
    #[serde(skip_serializing_if = "Option::is_none", rename = "typeof")]
    pub base_type: Option<String>,

    /// Remaining type metaslots
    #[serde(flatten)]
    pub extra: ExtraMetaslots,
}

/// Enum definition
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EnumDefinition {
    /// Name of the enum
    #[serde(default)]
    pub name: String,

    /// Description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Remaining enum metaslots (permissible values included)
    #[serde(flatten)]
    pub extra: ExtraMetaslots,
}

/// Subset definition
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SubsetDefinition {
    /// Name of the subset
    #[serde(default)]
    pub name: String,

    /// Remaining subset metaslots
    #[serde(flatten)]
    pub extra: ExtraMetaslots,
}

/// A named schema element whose metaslots can be introspected generically
pub trait Element: Serialize {
    /// Element name
    fn name(&self) -> &str;

    /// Annotation tags attached to the element
    fn annotation_tags(&self) -> Vec<&str> {
        Vec::new()
    }

    /// The element as a JSON object keyed by metaslot name
    ///
    /// # Errors
    ///
    /// Returns an error if the element does not serialize to a JSON object.
    fn metaslot_values(&self) -> Result<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(LinkMLError::serialization(format!(
                "element '{}' serialized to {other} instead of an object",
                self.name()
            ))),
        }
    }

    /// Names of metaslots that carry a truthy value
    ///
    /// # Errors
    ///
    /// Returns an error if the element cannot be serialized.
    fn used_metaslots(&self) -> Result<Vec<String>> {
        Ok(self
            .metaslot_values()?
            .into_iter()
            .filter(|(_, value)| is_truthy(value))
            .map(|(metaslot, _)| metaslot)
            .collect())
    }
}

impl Element for ClassDefinition {
    fn name(&self) -> &str {
        &self.name
    }

    fn annotation_tags(&self) -> Vec<&str> {
        self.annotations.keys().map(String::as_str).collect()
    }
}

impl Element for SlotDefinition {
    fn name(&self) -> &str {
        &self.name
    }

    fn annotation_tags(&self) -> Vec<&str> {
        self.annotations.keys().map(String::as_str).collect()
    }
}

/// Truthiness of a metaslot value
///
/// Null, `false`, zero, and empty strings, lists or maps are all unused.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

// Empty collections are what serde leaves in fields nobody wrote
fn is_unset(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

// A map of definitions where `name:` with no body means an empty definition
fn element_map<'de, D, T>(deserializer: D) -> std::result::Result<IndexMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let raw: Option<IndexMap<String, Option<T>>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(name, def)| (name, def.unwrap_or_default()))
        .collect())
}

fn nullable_map<'de, D>(deserializer: D) -> std::result::Result<IndexMap<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<IndexMap<String, Value>> = Option::deserialize(deserializer)?;
    Ok(raw.unwrap_or_default())
}

// Multivalued references may be written as a single scalar
fn string_or_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(s)) => vec![s],
        Some(OneOrMany::Many(v)) => v,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PERSON_SCHEMA: &str = r"
id: https://example.org/people
name: people
default_range: string
imports:
  - linkml:types
classes:
  Person:
    description: A person
    slots:
      - id
      - knows
    slot_usage:
      knows:
        multivalued: true
    attributes:
      nickname:
    annotations:
      owner: registry
    in_subset:
      - core
slots:
  id:
    identifier: true
  knows:
    range: Person
    examples:
      - value: alice
";

    fn load() -> SchemaDefinition {
        let mut schema: SchemaDefinition = serde_yaml::from_str(PERSON_SCHEMA).unwrap();
        schema.populate_names();
        schema
    }

    #[test]
    fn test_parse_with_null_bodies_and_extra_metaslots() {
        let schema = load();
        let person = &schema.classes["Person"];
        assert_eq!(person.name, "Person");
        assert_eq!(person.slots, vec!["id", "knows"]);
        assert_eq!(person.attributes["nickname"].name, "nickname");
        assert_eq!(person.slot_usage["knows"].name, "knows");
        assert!(person.extra.contains_key("in_subset"));
        assert!(schema.slots["knows"].extra.contains_key("examples"));
        assert_eq!(schema.imports, vec!["linkml:types"]);
    }

    #[test]
    fn test_used_metaslots_skip_falsy_values() {
        let schema = load();
        let mut used = schema.classes["Person"].used_metaslots().unwrap();
        used.sort();
        assert_eq!(
            used,
            vec![
                "annotations",
                "attributes",
                "description",
                "in_subset",
                "name",
                "slot_usage",
                "slots"
            ]
        );

        let mut slot = SlotDefinition::new("flag");
        slot.required = Some(false);
        slot.extra.insert("comments".into(), Value::Array(vec![]));
        assert_eq!(slot.used_metaslots().unwrap(), vec!["name"]);
    }

    #[test]
    fn test_annotation_tags() {
        let schema = load();
        assert_eq!(schema.classes["Person"].annotation_tags(), vec!["owner"]);
    }

    #[test]
    fn test_inherit_only_fills_unset_inheritable_metaslots() {
        let mut child = SlotDefinition::new("child");
        child.range = Some("integer".into());
        let mut parent = SlotDefinition::new("parent");
        parent.range = Some("string".into());
        parent.multivalued = Some(true);
        parent.description = Some("not inherited".into());
        parent
            .extra
            .insert("pattern".into(), Value::String("^x".into()));

        child.inherit_from(&parent).unwrap();
        assert_eq!(child.name, "child");
        assert_eq!(child.range.as_deref(), Some("integer"));
        assert_eq!(child.multivalued, Some(true));
        assert_eq!(child.description, None);
        assert_eq!(child.extra["pattern"], Value::String("^x".into()));
    }

    #[test]
    fn test_inherit_replaces_falsy_own_values() {
        let mut child = SlotDefinition::new("child");
        child.multivalued = Some(false);
        child.required = Some(false);
        let mut parent = SlotDefinition::new("parent");
        parent.multivalued = Some(true);
        parent.required = Some(true);
        let mut grandparent = SlotDefinition::new("grandparent");
        grandparent.range = Some("integer".into());
        grandparent.required = Some(false);

        child.inherit_from(&parent).unwrap();
        child.inherit_from(&grandparent).unwrap();
        assert_eq!(child.multivalued, Some(true));
        assert_eq!(child.required, Some(true));
        assert_eq!(child.range.as_deref(), Some("integer"));
    }

    #[test]
    fn test_refine_overrides_set_values() {
        let mut slot = SlotDefinition::new("knows");
        slot.range = Some("Person".into());
        slot.required = Some(true);
        let mut usage = SlotDefinition::new("knows");
        usage.range = Some("Agent".into());
        usage.required = Some(false);

        slot.refine_with(&usage).unwrap();
        assert_eq!(slot.range.as_deref(), Some("Agent"));
        assert_eq!(slot.required, Some(false));
        assert_eq!(slot.name, "knows");
    }

    #[test]
    fn test_refine_applies_zero_and_empty_string() {
        let mut slot = SlotDefinition::new("age");
        slot.description = Some("Age in years".into());
        slot.extra.insert("minimum_value".into(), serde_json::json!(5));
        let mut usage = SlotDefinition::new("age");
        usage.description = Some(String::new());
        usage.extra.insert("minimum_value".into(), serde_json::json!(0));
        usage.extra.insert("aliases".into(), serde_json::json!([]));
        slot.extra.insert("aliases".into(), serde_json::json!(["years"]));

        slot.refine_with(&usage).unwrap();
        assert_eq!(slot.extra["minimum_value"], serde_json::json!(0));
        assert_eq!(slot.description.as_deref(), Some(""));
        assert_eq!(slot.extra["aliases"], serde_json::json!(["years"]));
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&Value::Null));
        assert!(!is_truthy(&serde_json::json!(0)));
        assert!(!is_truthy(&serde_json::json!("")));
        assert!(!is_truthy(&serde_json::json!({})));
        assert!(is_truthy(&serde_json::json!(1.5)));
        assert!(is_truthy(&serde_json::json!(["a"])));
    }

    #[test]
    fn test_serialization_keeps_extra_metaslots_inline() {
        let schema = load();
        let yaml = serde_yaml::to_string(&schema.slots["knows"]).unwrap();
        assert!(yaml.contains("examples:"));
        assert!(!yaml.contains("extra"));
    }
}
