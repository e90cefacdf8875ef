//! Proxy group entity: rendering and name-based clustering
//!
//! A group plays two roles. Nested inside another group it is just a name
//! in that group's proxy list; emitted at top level it is a full group
//! descriptor, optionally backed by a provider bundle or a health-check
//! probe. Its member list is heterogeneous: concrete proxy endpoints,
//! informational entries, and nested groups.
//!
//! The core operation is [`Group::cluster_nodes`]: proxy members whose
//! names share a structural prefix and protocol are treated as
//! interchangeable replicas, and only a bounded, weight-biased,
//! renumbered subset of each cluster is exposed. Over repeated
//! generations this spreads client load across the full pool while the
//! exposed names stay small and contiguous.

use crate::lookup::LookupTables;
use crate::node::{InfoNode, IpProtocol, ProxyNode};
use crate::pattern::parse_cluster_name;
use crate::request::GenerationRequest;
use crate::sampler::{weighted_sample, SampleError};
use rand::Rng;
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt;
use thiserror::Error;
use tracing::{debug, trace};

/// Errors surfaced by a clustering pass
#[derive(Error, Debug)]
pub enum ClusterError {
    #[error("weighted selection failed for group '{group}': {source}")]
    Sample {
        group: String,
        #[source]
        source: SampleError,
    },
}

pub type Result<T> = std::result::Result<T, ClusterError>;

/// A member of a group: a concrete proxy endpoint, an informational
/// entry, or a nested logical group
#[derive(Debug, Clone, PartialEq)]
pub enum GroupMember {
    Proxy(ProxyNode),
    Info(InfoNode),
    Group(Group),
}

impl GroupMember {
    /// Display name as referenced from a group's proxy list.
    pub fn name(&self) -> &str {
        match self {
            GroupMember::Proxy(node) => &node.name,
            GroupMember::Info(node) => &node.name,
            GroupMember::Group(group) => group.as_reference(),
        }
    }

    /// Inline descriptor for provider payloads. Nested groups are always
    /// referenced by name instead and yield `None`.
    pub fn descriptor(&self) -> Option<Value> {
        match self {
            GroupMember::Proxy(node) => Some(node.descriptor()),
            GroupMember::Info(node) => Some(node.descriptor()),
            GroupMember::Group(_) => None,
        }
    }

    fn is_inline(&self) -> bool {
        matches!(self, GroupMember::Proxy(_) | GroupMember::Info(_))
    }
}

/// Group descriptor emitted into the client configuration
///
/// Exactly one of `providers` / `url` is ever set: a provider-backed
/// group delegates health checking to its bundle, any other keyed group
/// may carry its own probe URL.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GroupDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub select_type: String,
    pub proxies: Vec<String>,
    /// Provider bundles backing this group
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub providers: Option<Vec<String>>,
    /// Health-check probe URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Inline descriptors for every proxy and informational member of one
/// group, serialized as the body of a provider file
#[derive(Debug, Clone, Serialize)]
pub struct ProviderPayload {
    pub proxies: Vec<Value>,
}

/// A named, ordered collection of members, rebuilt from the upstream
/// inventory on every generation request
#[derive(Clone, PartialEq)]
pub struct Group {
    /// Unique name within the emitted configuration
    pub name: String,
    /// Insertion-ordered members; rewritten in place by clustering
    pub members: Vec<GroupMember>,
    /// Lookup key for provider / health-check tables
    pub key: Option<String>,
    /// Selection policy string in the output format
    pub select_type: String,
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Group {}, {} nodes>", self.name, self.members.len())
    }
}

impl Group {
    /// Create a group with the default `select` policy and no lookup key.
    pub fn new(name: impl Into<String>, members: Vec<GroupMember>) -> Self {
        Group {
            name: name.into(),
            members,
            key: None,
            select_type: "select".to_string(),
        }
    }

    /// Attach the lookup key consulted by descriptor rendering.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Override the selection policy string (e.g. `url-test`).
    pub fn with_select_type(mut self, select_type: impl Into<String>) -> Self {
        self.select_type = select_type.into();
        self
    }

    /// Name form used when this group appears inside another group's
    /// member list.
    pub fn as_reference(&self) -> &str {
        &self.name
    }

    /// Inline descriptors for the provider bundle backing this group.
    ///
    /// A deliberately empty group (e.g. a disabled region) still yields
    /// exactly one dead placeholder entry, so the emitted provider file is
    /// never structurally empty.
    pub fn provider_payload(&self) -> ProviderPayload {
        if self.members.is_empty() {
            return ProviderPayload {
                proxies: vec![json!({
                    "type": "socks5",
                    "name": "disabled",
                    "server": "localhost",
                    "port": 1,
                })],
            };
        }
        ProviderPayload {
            proxies: self
                .members
                .iter()
                .filter_map(GroupMember::descriptor)
                .collect(),
        }
    }

    /// Build the group descriptor for the client configuration.
    ///
    /// With `use_provider`, proxy and informational members are dropped
    /// from the inline proxy list (the provider bundle carries them) and a
    /// `use` reference is attached when the group's key is a known
    /// provider group. Otherwise a keyed group picks up its health-check
    /// probe URL, if one is configured.
    pub fn group_descriptor(&self, use_provider: bool, tables: &LookupTables) -> GroupDescriptor {
        let proxies = self
            .members
            .iter()
            .filter(|member| !use_provider || !member.is_inline())
            .map(|member| member.name().to_string())
            .collect();

        let mut descriptor = GroupDescriptor {
            name: self.name.clone(),
            select_type: self.select_type.clone(),
            proxies,
            providers: None,
            url: None,
        };

        match &self.key {
            Some(key) if use_provider && tables.is_provider_group(key) => {
                descriptor.providers = Some(vec![format!("provider-{key}")]);
            }
            Some(key) => {
                if let Some(check) = tables.health_check(key) {
                    descriptor.url = Some(check.url.clone());
                }
            }
            None => {}
        }

        descriptor
    }

    /// Cluster proxy members by structural name prefix and protocol, then
    /// expose a bounded, weight-biased, renumbered subset of each cluster.
    ///
    /// Members that are not proxy nodes, or whose names carry no cluster
    /// structure, pass through unmodified and keep their relative order at
    /// the front of the rewritten list. Within each cluster the selected
    /// nodes are renamed so their ordinal suffixes form the dense run
    /// `1..=selected`, and they adopt `node_order` values positionally
    /// from the ascending-sorted order pool of the whole cluster, so the
    /// exposed orders are stable across runs regardless of which physical
    /// nodes were drawn.
    ///
    /// The member list is replaced only after every cluster has been
    /// sampled; on error the group is left untouched.
    pub fn cluster_nodes<R: Rng>(
        &mut self,
        request: &mut GenerationRequest<R>,
    ) -> Result<&mut Self> {
        if !request.use_cluster {
            debug!(group = %self.name, "clustering disabled, members unchanged");
            return Ok(self);
        }

        // Single pass: passthrough keeps its order, buckets keep the
        // insertion order of first-seen (prefix, protocol) keys.
        let mut passthrough: Vec<GroupMember> = Vec::new();
        let mut buckets: Vec<((String, IpProtocol), Vec<ProxyNode>)> = Vec::new();

        for member in &self.members {
            let node = match member {
                GroupMember::Proxy(node) => node,
                _ => {
                    passthrough.push(member.clone());
                    continue;
                }
            };
            let Some(parsed) = parse_cluster_name(&node.name) else {
                passthrough.push(member.clone());
                continue;
            };
            let key = (parsed.prefix.to_string(), node.ip_protocol);
            match buckets.iter().position(|(k, _)| *k == key) {
                Some(i) => buckets[i].1.push(node.clone()),
                None => buckets.push((key, vec![node.clone()])),
            }
        }

        let mut members = passthrough;
        for ((prefix, protocol), mut bucket) in buckets {
            bucket.sort_by(ProxyNode::inventory_order);

            // Suppose k of n nodes are selected: the selected nodes adopt
            // the first k order values of the whole cluster. E.g. orders
            // 3, 4, 5, 10, 12 with k=2 expose orders 3 and 4, whatever
            // was drawn.
            let mut order_pool: Vec<i64> = bucket.iter().map(|n| n.node_order).collect();
            order_pool.sort_unstable();

            let weights: Vec<f64> = bucket.iter().map(|n| n.node_weight).collect();
            let selected = weighted_sample(
                &mut request.rng,
                &bucket,
                &weights,
                request.cluster_size,
            )
            .map_err(|source| ClusterError::Sample {
                group: self.name.clone(),
                source,
            })?;

            debug!(
                group = %self.name,
                prefix = %prefix,
                protocol = ?protocol,
                pool = bucket.len(),
                selected = selected.len(),
                "cluster selection"
            );

            for (i, mut node) in selected.into_iter().enumerate() {
                if let Some(parsed) = parse_cluster_name(&node.name) {
                    let old = format!("{}{}", parsed.prefix, parsed.suffix);
                    let new = format!("{}{}", parsed.prefix, i + 1);
                    node.name = node.name.replace(&old, &new);
                    trace!(from = %old, to = %new, order = order_pool[i], "renumbered node");
                }
                node.node_order = order_pool[i];
                members.push(GroupMember::Proxy(node));
            }
        }

        self.members = members;
        Ok(self)
    }
}
