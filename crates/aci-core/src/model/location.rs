// ── Geolocation hierarchy ──
//
// Site → Building → Floor → Room → Row → Rack, anchored at `uni/fabric`.
// One type covers every level; the level decides the class, the RN
// prefix and which level may appear underneath.

use std::fmt;

use aci_api::{Attributes, WireNode};
use serde::Serialize;
use strum::{Display, EnumIter, EnumString};

use super::action::Action;
use super::mo::ManagedObject;
use super::validate;
use crate::decode::{FromWire, name_or_rn, optional};
use crate::error::{DecodeError, ValidationError};

pub const GEO_ROOT_DN: &str = "uni/fabric";

/// One level of the location hierarchy, outermost first.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    Serialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum LocationLevel {
    Site,
    Building,
    Floor,
    Room,
    Row,
    Rack,
}

impl LocationLevel {
    pub fn class_name(self) -> &'static str {
        match self {
            Self::Site => "geoSite",
            Self::Building => "geoBuilding",
            Self::Floor => "geoFloor",
            Self::Room => "geoRoom",
            Self::Row => "geoRow",
            Self::Rack => "geoRack",
        }
    }

    pub fn rn_prefix(self) -> &'static str {
        match self {
            Self::Site => "site",
            Self::Building => "building",
            Self::Floor => "floor",
            Self::Room => "room",
            Self::Row => "row",
            Self::Rack => "rack",
        }
    }

    /// The only level allowed directly underneath. Racks are leaves.
    pub fn child(self) -> Option<Self> {
        match self {
            Self::Site => Some(Self::Building),
            Self::Building => Some(Self::Floor),
            Self::Floor => Some(Self::Room),
            Self::Room => Some(Self::Row),
            Self::Row => Some(Self::Rack),
            Self::Rack => None,
        }
    }

    pub fn from_class(class: &str) -> Option<Self> {
        <Self as strum::IntoEnumIterator>::iter().find(|level| level.class_name() == class)
    }
}

/// A node of the location tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub level: LocationLevel,
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Location>,
    #[serde(skip)]
    pub action: Action,
}

impl Location {
    pub fn new(level: LocationLevel, name: impl Into<String>) -> Self {
        Self {
            level,
            name: name.into(),
            description: String::new(),
            children: Vec::new(),
            action: Action::None,
        }
    }

    pub fn site(name: impl Into<String>) -> Self {
        Self::new(LocationLevel::Site, name)
    }

    pub fn building(name: impl Into<String>) -> Self {
        Self::new(LocationLevel::Building, name)
    }

    pub fn floor(name: impl Into<String>) -> Self {
        Self::new(LocationLevel::Floor, name)
    }

    pub fn room(name: impl Into<String>) -> Self {
        Self::new(LocationLevel::Room, name)
    }

    pub fn row(name: impl Into<String>) -> Self {
        Self::new(LocationLevel::Row, name)
    }

    pub fn rack(name: impl Into<String>) -> Self {
        Self::new(LocationLevel::Rack, name)
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_action(mut self, action: Action) -> Self {
        self.action = action;
        self
    }

    pub fn set_description(
        &mut self,
        description: impl Into<String>,
    ) -> Result<(), ValidationError> {
        let description = description.into();
        if !validate::description(&description) {
            return Err(ValidationError::Description {
                class: self.level.class_name(),
                value: description,
            });
        }
        self.description = description;
        Ok(())
    }

    /// Append a child of the next level. Names must be unique among siblings.
    pub fn add_child(&mut self, child: Location) -> Result<(), ValidationError> {
        if self.level.child() != Some(child.level) {
            return Err(ValidationError::Nesting {
                parent: self.level.class_name().into(),
                child: child.level.class_name().into(),
            });
        }
        if self.find_child(&child.name).is_some() {
            return Err(ValidationError::Duplicate {
                dn: format!("{}/{}", self.rn(), child.rn()),
            });
        }
        self.children.push(child);
        Ok(())
    }

    /// Builder form of [`add_child`](Self::add_child).
    pub fn with_child(mut self, child: Location) -> Result<Self, ValidationError> {
        self.add_child(child)?;
        Ok(self)
    }

    /// Detach and return the named child.
    pub fn remove_child(&mut self, name: &str) -> Option<Location> {
        let index = self.children.iter().position(|c| c.name == name)?;
        Some(self.children.remove(index))
    }

    pub fn find_child(&self, name: &str) -> Option<&Location> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn find_child_mut(&mut self, name: &str) -> Option<&mut Location> {
        self.children.iter_mut().find(|c| c.name == name)
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write!(f, "{:indent$}{} {}", "", self.level, self.name, indent = depth * 2)?;
        if !self.description.is_empty() {
            write!(f, " ({})", self.description)?;
        }
        writeln!(f)?;
        for child in &self.children {
            child.fmt_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

impl ManagedObject for Location {
    fn class_name(&self) -> &'static str {
        self.level.class_name()
    }

    fn rn_prefix(&self) -> &'static str {
        self.level.rn_prefix()
    }

    fn naming_value(&self) -> String {
        self.name.clone()
    }

    fn action(&self) -> Action {
        self.action
    }

    fn anchor(&self) -> Option<&'static str> {
        (self.level == LocationLevel::Site).then_some(GEO_ROOT_DN)
    }

    fn accepts_child(&self, class: &str) -> bool {
        self.level
            .child()
            .is_some_and(|level| level.class_name() == class)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if !validate::location_name(&self.name) {
            return Err(ValidationError::Name {
                class: self.level.class_name(),
                value: self.name.clone(),
            });
        }
        if !validate::description(&self.description) {
            return Err(ValidationError::Description {
                class: self.level.class_name(),
                value: self.description.clone(),
            });
        }
        Ok(())
    }

    fn attributes(&self) -> Attributes {
        let mut attrs = Attributes::new();
        attrs.insert("name".into(), self.name.clone());
        if !self.description.is_empty() {
            attrs.insert("descr".into(), self.description.clone());
        }
        attrs
    }

    fn children(&self) -> Vec<&dyn ManagedObject> {
        self.children
            .iter()
            .map(|c| c as &dyn ManagedObject)
            .collect()
    }
}

impl FromWire for Location {
    fn from_wire(node: &WireNode) -> Result<Self, DecodeError> {
        let level =
            LocationLevel::from_class(&node.class).ok_or_else(|| DecodeError::UnexpectedClass {
                expected: "a geolocation class".into(),
                found: node.class.clone(),
            })?;

        let mut location = Location::new(level, name_or_rn(node, level.rn_prefix())?);
        location.description = optional(node, "descr").unwrap_or_default();
        location.action = node.status().map(Action::from_status).unwrap_or_default();

        for child in &node.children {
            let expected = level.child().map(LocationLevel::class_name);
            if expected != Some(child.class.as_str()) {
                return Err(DecodeError::UnexpectedClass {
                    expected: expected.unwrap_or("no children").into(),
                    found: child.class.clone(),
                });
            }
            location.children.push(Location::from_wire(child)?);
        }
        Ok(location)
    }
}
