//! Cluster descriptor model.
//!
//! The descriptor is the JSON array a token-aware Dynomite client fetches
//! from `cluster_describe` to learn which nodes own which tokens.

use nd_config::SeedNode;
use serde::{Deserialize, Serialize};

/// A single seed record.
///
/// Field order is the wire order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seed {
    /// Ring token (decimal string).
    pub token: String,
    /// Host name of the node.
    pub hostname: String,
    /// Datacenter tag.
    pub dc: String,
    /// IPv4 address literal.
    pub ip: String,
    /// Availability zone.
    pub zone: String,
    /// Location (rack).
    pub location: String,
}

impl From<&SeedNode> for Seed {
    fn from(node: &SeedNode) -> Self {
        Self {
            token: node.token.clone(),
            hostname: node.hostname.clone(),
            dc: node.dc.clone(),
            ip: node.ip.clone(),
            zone: node.zone.clone(),
            location: node.location.clone(),
        }
    }
}

/// Ordered list of seeds served by the stub.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ClusterDescriptor(Vec<Seed>);

impl ClusterDescriptor {
    /// Create a descriptor from seeds, keeping their order.
    #[must_use]
    pub fn new(seeds: Vec<Seed>) -> Self {
        Self(seeds)
    }

    /// Seeds in response order.
    #[must_use]
    pub fn seeds(&self) -> &[Seed] {
        &self.0
    }

    /// Render the compact JSON response body.
    pub fn render(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl Default for ClusterDescriptor {
    fn default() -> Self {
        Self(vec![Seed::from(&SeedNode::default())])
    }
}

impl From<&[SeedNode]> for ClusterDescriptor {
    fn from(nodes: &[SeedNode]) -> Self {
        Self(nodes.iter().map(Seed::from).collect())
    }
}
