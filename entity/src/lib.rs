pub mod configuration_node;
pub mod cpe;
pub mod cpe_match;
pub mod cvss2;
pub mod cvss3;
pub mod node_cpe_ref;
pub mod vulnerability;

use serde::{Deserialize, Serialize};

/// Discriminator for the record types handled by the store contract.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Cpe,
    CpeMatch,
    ConfigurationNode,
    NodeCpeRef,
    Vulnerability,
}

/// Envelope passed across the store boundary.
///
/// Every variant carries its own structural key; the store never
/// assigns surrogate identifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Entity {
    Cpe(cpe::Model),
    CpeMatch(cpe_match::Model),
    ConfigurationNode(configuration_node::Model),
    NodeCpeRef(node_cpe_ref::Model),
    Vulnerability(vulnerability::Model),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Cpe(_) => EntityKind::Cpe,
            Entity::CpeMatch(_) => EntityKind::CpeMatch,
            Entity::ConfigurationNode(_) => EntityKind::ConfigurationNode,
            Entity::NodeCpeRef(_) => EntityKind::NodeCpeRef,
            Entity::Vulnerability(_) => EntityKind::Vulnerability,
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Entity::Cpe(model) => &model.uri,
            Entity::CpeMatch(model) => &model.key,
            Entity::ConfigurationNode(model) => &model.id,
            Entity::NodeCpeRef(model) => &model.key,
            Entity::Vulnerability(model) => &model.id,
        }
    }

    /// Coarse grouping key for the bulk dedup path. Only platform
    /// identities are partitioned (by vendor).
    pub fn partition_key(&self) -> Option<&str> {
        match self {
            Entity::Cpe(model) => Some(model.vendor.as_deref().unwrap_or("")),
            _ => None,
        }
    }
}

impl From<cpe::Model> for Entity {
    fn from(value: cpe::Model) -> Self {
        Self::Cpe(value)
    }
}

impl From<cpe_match::Model> for Entity {
    fn from(value: cpe_match::Model) -> Self {
        Self::CpeMatch(value)
    }
}

impl From<configuration_node::Model> for Entity {
    fn from(value: configuration_node::Model) -> Self {
        Self::ConfigurationNode(value)
    }
}

impl From<node_cpe_ref::Model> for Entity {
    fn from(value: node_cpe_ref::Model) -> Self {
        Self::NodeCpeRef(value)
    }
}

impl From<vulnerability::Model> for Entity {
    fn from(value: vulnerability::Model) -> Self {
        Self::Vulnerability(value)
    }
}
