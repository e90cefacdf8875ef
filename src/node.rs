//! Proxy node model consumed by group generation
//!
//! Nodes arrive from the upstream inventory and are treated as plain
//! records: a display name, a protocol capability, an inventory position,
//! and a selection weight, plus whatever protocol-specific outbound fields
//! the client format needs. Only proxy nodes are cluster-eligible;
//! informational entries exist purely to surface text in the client's
//! node list.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::cmp::Ordering;

/// Network protocol capability of a proxy endpoint, the secondary
/// clustering attribute: nodes sharing a name prefix but differing in
/// protocol land in different clusters.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum IpProtocol {
    V4,
    V6,
    Dual,
}

/// A concrete proxy endpoint from the upstream node inventory
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyNode {
    /// Display name, e.g. `US-Node3`; rewritten by clustering
    pub name: String,
    /// Protocol capability
    pub ip_protocol: IpProtocol,
    /// Inventory position; renumbered nodes adopt order values from their
    /// cluster's full order pool
    pub node_order: i64,
    /// Relative selection weight, non-negative
    pub node_weight: f64,
    /// Client outbound type, e.g. `ss`, `vmess`, `socks5`
    pub proxy_type: String,
    /// Endpoint host
    pub server: String,
    /// Endpoint port
    pub port: u16,
    /// Protocol-specific outbound fields passed through verbatim
    /// (cipher, password, uuid, ...)
    pub extra: Map<String, Value>,
}

impl ProxyNode {
    /// Inline client descriptor for this endpoint.
    ///
    /// Inventory metadata (`ip_protocol`, `node_order`, `node_weight`)
    /// stays out of the emitted descriptor.
    pub fn descriptor(&self) -> Value {
        let mut entry = Map::new();
        entry.insert("name".into(), Value::String(self.name.clone()));
        entry.insert("type".into(), Value::String(self.proxy_type.clone()));
        entry.insert("server".into(), Value::String(self.server.clone()));
        entry.insert("port".into(), Value::from(self.port));
        entry.extend(self.extra.clone());
        Value::Object(entry)
    }

    /// Deterministic total order used to pre-sort cluster buckets:
    /// by name, then inventory position.
    pub fn inventory_order(a: &ProxyNode, b: &ProxyNode) -> Ordering {
        a.name
            .cmp(&b.name)
            .then_with(|| a.node_order.cmp(&b.node_order))
    }
}

/// An informational entry: shows a line of text in the client's node list
/// by masquerading as a dead local socks5 endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoNode {
    /// The text to display, e.g. `expires 2026-12-31`
    pub name: String,
}

impl InfoNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Inline client descriptor; never a usable endpoint.
    pub fn descriptor(&self) -> Value {
        json!({
            "type": "socks5",
            "name": self.name,
            "server": "localhost",
            "port": 1,
        })
    }
}
