// MIT wire format
//
// Every managed object travels as a single-key JSON object keyed by its
// class name: `{"<class>": {"attributes": {...}, "children": [...]}}`.
// Query responses wrap a sequence of those under `imdata`, next to a
// stringly-typed `totalCount`.

use std::fmt;

use indexmap::IndexMap;
use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// Ordered attribute map. APIC attribute values are always strings.
pub type Attributes = IndexMap<String, String>;

/// One node of a delta tree, as sent to or received from the controller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WireNode {
    /// Object class, e.g. `fvTenant` or `geoSite`.
    pub class: String,
    pub attributes: Attributes,
    pub children: Vec<WireNode>,
}

impl WireNode {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            attributes: Attributes::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: WireNode) -> Self {
        self.children.push(child);
        self
    }

    /// Attribute value, treating an empty string as absent.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn dn(&self) -> Option<&str> {
        self.attribute("dn")
    }

    pub fn status(&self) -> Option<&str> {
        self.attribute("status")
    }

    /// Pre-order walk over this node and all of its descendants.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }
}

/// Iterator returned by [`WireNode::walk`].
#[derive(Debug)]
pub struct Walk<'a> {
    stack: Vec<&'a WireNode>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a WireNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

// ── Serialization ────────────────────────────────────────────────────

#[derive(Serialize)]
struct BodyRef<'a> {
    attributes: &'a Attributes,
    #[serde(skip_serializing_if = "no_children")]
    children: &'a [WireNode],
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn no_children(children: &&[WireNode]) -> bool {
    children.is_empty()
}

impl Serialize for WireNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(
            &self.class,
            &BodyRef {
                attributes: &self.attributes,
                children: &self.children,
            },
        )?;
        map.end()
    }
}

// ── Deserialization ──────────────────────────────────────────────────

#[derive(Deserialize)]
struct Body {
    #[serde(default, deserialize_with = "attributes_lenient")]
    attributes: Attributes,
    #[serde(default, deserialize_with = "children_lenient")]
    children: Vec<WireNode>,
}

/// Accepts a missing or `null` attribute object and coerces scalar values
/// to strings (some firmware emits numbers and booleans).
fn attributes_lenient<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Attributes, D::Error> {
    let raw: Option<IndexMap<String, serde_json::Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Null => String::new(),
                other => other.to_string(),
            };
            (key, value)
        })
        .collect())
}

fn children_lenient<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<WireNode>, D::Error> {
    let raw: Option<Vec<WireNode>> = Option::deserialize(deserializer)?;
    Ok(raw.unwrap_or_default())
}

struct WireNodeVisitor;

impl<'de> Visitor<'de> for WireNodeVisitor {
    type Value = WireNode;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object with exactly one class key")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let Some(class) = map.next_key::<String>()? else {
            return Err(de::Error::invalid_length(0, &self));
        };
        let body: Body = map.next_value()?;
        if map.next_key::<IgnoredAny>()?.is_some() {
            return Err(de::Error::custom(format!(
                "managed object '{class}' has more than one class key"
            )));
        }
        Ok(WireNode {
            class,
            attributes: body.attributes,
            children: body.children,
        })
    }
}

impl<'de> Deserialize<'de> for WireNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(WireNodeVisitor)
    }
}

// ── Response envelope ────────────────────────────────────────────────

/// Standard APIC response envelope.
///
/// ```json
/// { "totalCount": "1", "imdata": [ { "fvTenant": { "attributes": {...} } } ] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MitResponse {
    #[serde(
        rename = "totalCount",
        default,
        serialize_with = "count_as_string",
        deserialize_with = "count_lenient"
    )]
    pub total_count: u64,
    #[serde(default, deserialize_with = "children_lenient")]
    pub imdata: Vec<WireNode>,
}

impl MitResponse {
    /// Top-level objects of the given class.
    pub fn objects<'a>(&'a self, class: &'a str) -> impl Iterator<Item = &'a WireNode> + 'a {
        self.imdata.iter().filter(move |node| node.class == class)
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn count_as_string<S: Serializer>(count: &u64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(count)
}

fn count_lenient<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Text(String),
        Number(u64),
    }

    match Option::<Count>::deserialize(deserializer)? {
        None => Ok(0),
        Some(Count::Number(n)) => Ok(n),
        Some(Count::Text(s)) if s.is_empty() => Ok(0),
        Some(Count::Text(s)) => s
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid totalCount '{s}'"))),
    }
}
