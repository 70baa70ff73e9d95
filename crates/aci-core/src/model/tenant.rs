// ── Tenants and VRFs ──

use aci_api::{Attributes, WireNode};
use serde::Serialize;

use super::action::Action;
use super::dn::Dn;
use super::mo::ManagedObject;
use super::validate;
use crate::decode::{FromWire, expect_class, name_or_rn, optional};
use crate::error::{DecodeError, ValidationError};

fn check_name(class: &'static str, name: &str) -> Result<(), ValidationError> {
    if validate::object_name(name) {
        Ok(())
    } else {
        Err(ValidationError::Name {
            class,
            value: name.to_owned(),
        })
    }
}

fn check_description(class: &'static str, description: &str) -> Result<(), ValidationError> {
    if validate::description(description) {
        Ok(())
    } else {
        Err(ValidationError::Description {
            class,
            value: description.to_owned(),
        })
    }
}

// ── Tenant ──────────────────────────────────────────────────────────

/// A tenant (`fvTenant`, `uni/tn-<name>`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tenant {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// VRFs submitted together with the tenant on a cascading create.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub vrfs: Vec<Vrf>,
    #[serde(skip)]
    pub action: Action,
}

impl Tenant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            vrfs: Vec::new(),
            action: Action::None,
        }
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

    /// Attach a VRF. Its tenant is rewritten to this one.
    pub fn add_vrf(&mut self, mut vrf: Vrf) -> Result<(), ValidationError> {
        if self.vrfs.iter().any(|v| v.name == vrf.name) {
            return Err(ValidationError::Duplicate {
                dn: format!("uni/tn-{}/ctx-{}", self.name, vrf.name),
            });
        }
        vrf.tenant.clone_from(&self.name);
        self.vrfs.push(vrf);
        Ok(())
    }

    pub fn dn(&self) -> Dn {
        Dn::new("uni").child(&self.rn())
    }
}

impl ManagedObject for Tenant {
    fn class_name(&self) -> &'static str {
        "fvTenant"
    }

    fn rn_prefix(&self) -> &'static str {
        "tn"
    }

    fn naming_value(&self) -> String {
        self.name.clone()
    }

    fn action(&self) -> Action {
        self.action
    }

    fn anchor(&self) -> Option<&'static str> {
        Some("uni")
    }

    fn accepts_child(&self, class: &str) -> bool {
        class == "fvCtx"
    }

    fn validate(&self) -> Result<(), ValidationError> {
        check_name("fvTenant", &self.name)?;
        check_description("fvTenant", &self.description)
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
        self.vrfs.iter().map(|v| v as &dyn ManagedObject).collect()
    }
}

impl FromWire for Tenant {
    fn from_wire(node: &WireNode) -> Result<Self, DecodeError> {
        expect_class(node, &["fvTenant"])?;
        let mut tenant = Tenant::new(name_or_rn(node, "tn")?);
        tenant.description = optional(node, "descr").unwrap_or_default();
        tenant.action = node.status().map(Action::from_status).unwrap_or_default();

        for child in &node.children {
            let mut vrf = Vrf::from_wire(child)?;
            vrf.tenant.clone_from(&tenant.name);
            tenant.vrfs.push(vrf);
        }
        Ok(tenant)
    }
}

// ── VRF ─────────────────────────────────────────────────────────────

/// A VRF (`fvCtx`, `uni/tn-<tenant>/ctx-<name>`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Vrf {
    pub name: String,
    pub tenant: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip)]
    pub action: Action,
}

impl Vrf {
    pub fn new(tenant: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tenant: tenant.into(),
            description: String::new(),
            action: Action::None,
        }
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

    /// The owning tenant, as a path-only ancestor.
    pub fn parent_tenant(&self) -> Tenant {
        Tenant::new(self.tenant.clone())
    }
}

impl ManagedObject for Vrf {
    fn class_name(&self) -> &'static str {
        "fvCtx"
    }

    fn rn_prefix(&self) -> &'static str {
        "ctx"
    }

    fn naming_value(&self) -> String {
        self.name.clone()
    }

    fn action(&self) -> Action {
        self.action
    }

    fn validate(&self) -> Result<(), ValidationError> {
        check_name("fvCtx", &self.name)?;
        check_description("fvCtx", &self.description)
    }

    fn attributes(&self) -> Attributes {
        let mut attrs = Attributes::new();
        attrs.insert("name".into(), self.name.clone());
        if !self.description.is_empty() {
            attrs.insert("descr".into(), self.description.clone());
        }
        attrs
    }
}

impl FromWire for Vrf {
    fn from_wire(node: &WireNode) -> Result<Self, DecodeError> {
        expect_class(node, &["fvCtx"])?;
        let name = name_or_rn(node, "ctx")?;
        // Subtree children carry only an RN; the enclosing tenant fills it in.
        let tenant = node
            .dn()
            .map(Dn::new)
            .and_then(|dn| dn.segment_value("tn").map(str::to_owned))
            .unwrap_or_default();

        let mut vrf = Vrf::new(tenant, name);
        vrf.description = optional(node, "descr").unwrap_or_default();
        vrf.action = node.status().map(Action::from_status).unwrap_or_default();
        Ok(vrf)
    }
}
