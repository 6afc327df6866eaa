//! Decoded `/config_dump`.
//!
//! A config dump is a list of typed entries, one per configuration area
//! (bootstrap, clusters, listeners, routes, endpoints, ...). Each entry is
//! selected by its `@type` URL. Individual clusters, listeners and route
//! configurations stay opaque JSON; endpoint assignments are typed because
//! locality tests inspect them field by field.

use std::fmt;

use serde::de::{self, Deserializer};
use serde::ser::{self, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::type_url::DumpType;
use crate::Locality;

/// The full configuration snapshot of a proxy.
///
/// Every value of this type is the decode of exactly one admin response.
///
/// # Example
///
/// ```rust
/// use probe_core::ConfigDump;
///
/// let dump: ConfigDump = serde_json::from_str(r#"{
///     "configs": [{
///         "@type": "type.googleapis.com/envoy.admin.v3.ClustersConfigDump",
///         "version_info": "2024-01-01T00:00:00Z/7",
///         "dynamic_active_clusters": [{"cluster": {"name": "outbound|80||b.failover.svc.cluster.local"}}]
///     }]
/// }"#).unwrap();
///
/// assert!(dump.cluster("outbound|80||b.failover.svc.cluster.local").is_some());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigDump {
    /// Entries in the order the proxy reported them.
    pub configs: Vec<ConfigDumpEntry>,
    /// Fields not modelled above, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConfigDump {
    /// Iterate over entries of one kind.
    pub fn entries(&self, kind: DumpType) -> impl Iterator<Item = &ConfigDumpEntry> {
        self.configs.iter().filter(move |e| e.kind() == kind)
    }

    /// The bootstrap entry, if present.
    pub fn bootstrap(&self) -> Option<&BootstrapDump> {
        self.configs.iter().find_map(|e| match &e.body {
            ConfigDumpBody::Bootstrap(b) => Some(b),
            _ => None,
        })
    }

    /// The clusters entry, if present.
    pub fn clusters_dump(&self) -> Option<&ClustersDump> {
        self.configs.iter().find_map(|e| match &e.body {
            ConfigDumpBody::Clusters(c) => Some(c),
            _ => None,
        })
    }

    /// The listeners entry, if present.
    pub fn listeners_dump(&self) -> Option<&ListenersDump> {
        self.configs.iter().find_map(|e| match &e.body {
            ConfigDumpBody::Listeners(l) => Some(l),
            _ => None,
        })
    }

    /// The routes entry, if present.
    pub fn routes_dump(&self) -> Option<&RoutesDump> {
        self.configs.iter().find_map(|e| match &e.body {
            ConfigDumpBody::Routes(r) => Some(r),
            _ => None,
        })
    }

    /// The endpoints entry, if present.
    pub fn endpoints_dump(&self) -> Option<&EndpointsDump> {
        self.configs.iter().find_map(|e| match &e.body {
            ConfigDumpBody::Endpoints(e) => Some(e),
            _ => None,
        })
    }

    /// All clusters the proxy knows of: static, active and warming.
    pub fn clusters(&self) -> Vec<&Value> {
        self.clusters_dump()
            .map(|c| {
                c.static_clusters
                    .iter()
                    .map(|s| &s.cluster)
                    .chain(c.dynamic_active_clusters.iter().map(|d| &d.cluster))
                    .chain(c.dynamic_warming_clusters.iter().map(|d| &d.cluster))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Find a cluster by name.
    pub fn cluster(&self, name: &str) -> Option<&Value> {
        self.clusters()
            .into_iter()
            .find(|c| resource_name(c) == Some(name))
    }

    /// All listeners the proxy knows of, static and dynamic.
    pub fn listeners(&self) -> Vec<&Value> {
        self.listeners_dump()
            .map(|l| {
                l.static_listeners
                    .iter()
                    .map(|s| &s.listener)
                    .chain(l.dynamic_listeners.iter().filter_map(|d| {
                        d.active_state
                            .as_ref()
                            .or(d.warming_state.as_ref())
                            .map(|s| &s.listener)
                    }))
                    .chain(l.dynamic_active_listeners.iter().map(|s| &s.listener))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Find a listener by name.
    pub fn listener(&self, name: &str) -> Option<&Value> {
        self.listeners()
            .into_iter()
            .find(|l| resource_name(l) == Some(name))
    }

    /// All route configurations, static and dynamic.
    pub fn route_configs(&self) -> Vec<&Value> {
        self.routes_dump()
            .map(|r| {
                r.static_route_configs
                    .iter()
                    .map(|s| &s.route_config)
                    .chain(r.dynamic_route_configs.iter().map(|d| &d.route_config))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All endpoint assignments, static and dynamic.
    pub fn endpoint_assignments(&self) -> Vec<&ClusterLoadAssignment> {
        self.endpoints_dump()
            .map(|e| {
                e.static_endpoint_configs
                    .iter()
                    .map(|s| &s.endpoint_config)
                    .chain(e.dynamic_endpoint_configs.iter().map(|d| &d.endpoint_config))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Find the endpoint assignment of a cluster.
    pub fn endpoint_assignment(&self, cluster: &str) -> Option<&ClusterLoadAssignment> {
        self.endpoint_assignments()
            .into_iter()
            .find(|a| a.cluster_name == cluster)
    }

    /// Counts and versions for diagnostics.
    pub fn summary(&self) -> DumpSummary {
        DumpSummary {
            entries: self.configs.len(),
            clusters: self.clusters().len(),
            listeners: self.listeners().len(),
            route_configs: self.route_configs().len(),
            endpoint_assignments: self.endpoint_assignments().len(),
            clusters_version: self
                .clusters_dump()
                .and_then(|c| c.version_info.clone()),
            listeners_version: self
                .listeners_dump()
                .and_then(|l| l.version_info.clone()),
        }
    }
}

/// Read the `name` field of an opaque resource.
fn resource_name(resource: &Value) -> Option<&str> {
    resource.get("name").and_then(Value::as_str)
}

/// Resource counts and versions of a [`ConfigDump`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DumpSummary {
    /// Number of entries.
    pub entries: usize,
    /// Number of clusters.
    pub clusters: usize,
    /// Number of listeners.
    pub listeners: usize,
    /// Number of route configurations.
    pub route_configs: usize,
    /// Number of endpoint assignments.
    pub endpoint_assignments: usize,
    /// Version of the cluster configuration.
    pub clusters_version: Option<String>,
    /// Version of the listener configuration.
    pub listeners_version: Option<String>,
}

impl fmt::Display for DumpSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} entries, {} clusters (version {}), {} listeners (version {}), {} route configs, {} endpoint assignments",
            self.entries,
            self.clusters,
            self.clusters_version.as_deref().unwrap_or("-"),
            self.listeners,
            self.listeners_version.as_deref().unwrap_or("-"),
            self.route_configs,
            self.endpoint_assignments,
        )
    }
}

/// One entry of a config dump: its `@type` URL and decoded body.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfigDumpEntry {
    type_url: String,
    body: ConfigDumpBody,
}

impl ConfigDumpEntry {
    /// Create an entry, using the v3 type URL for well-known bodies.
    pub fn new(body: ConfigDumpBody) -> Self {
        let type_url = body
            .kind()
            .type_url()
            .map(str::to_string)
            .unwrap_or_default();
        Self { type_url, body }
    }

    /// Create an entry for a message this crate does not model.
    pub fn other(type_url: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            type_url: type_url.into(),
            body: ConfigDumpBody::Other(fields),
        }
    }

    /// The `@type` URL as reported.
    pub fn type_url(&self) -> &str {
        &self.type_url
    }

    /// The kind of entry.
    pub fn kind(&self) -> DumpType {
        self.body.kind()
    }

    /// The decoded body.
    pub fn body(&self) -> &ConfigDumpBody {
        &self.body
    }
}

impl<'de> Deserialize<'de> for ConfigDumpEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut fields = Map::deserialize(deserializer)?;
        let type_url = match fields.remove("@type") {
            Some(Value::String(url)) => url,
            Some(other) => {
                return Err(de::Error::custom(format!(
                    "config dump entry has non-string @type: {other}"
                )))
            }
            None => return Err(de::Error::missing_field("@type")),
        };

        let body = match DumpType::from_type_url(&type_url) {
            DumpType::Bootstrap => decode_body(fields, &type_url).map(ConfigDumpBody::Bootstrap),
            DumpType::Clusters => decode_body(fields, &type_url).map(ConfigDumpBody::Clusters),
            DumpType::Listeners => decode_body(fields, &type_url).map(ConfigDumpBody::Listeners),
            DumpType::Routes => decode_body(fields, &type_url).map(ConfigDumpBody::Routes),
            DumpType::ScopedRoutes => {
                decode_body(fields, &type_url).map(ConfigDumpBody::ScopedRoutes)
            }
            DumpType::Secrets => decode_body(fields, &type_url).map(ConfigDumpBody::Secrets),
            DumpType::Endpoints => decode_body(fields, &type_url).map(ConfigDumpBody::Endpoints),
            DumpType::Other => Ok(ConfigDumpBody::Other(fields)),
        }
        .map_err(<D::Error as de::Error>::custom)?;

        Ok(Self { type_url, body })
    }
}

fn decode_body<T>(fields: Map<String, Value>, type_url: &str) -> Result<T, String>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_value(Value::Object(fields))
        .map_err(|e| format!("invalid {type_url} entry: {e}"))
}

impl Serialize for ConfigDumpEntry {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let value = match &self.body {
            ConfigDumpBody::Bootstrap(b) => serde_json::to_value(b),
            ConfigDumpBody::Clusters(c) => serde_json::to_value(c),
            ConfigDumpBody::Listeners(l) => serde_json::to_value(l),
            ConfigDumpBody::Routes(r) => serde_json::to_value(r),
            ConfigDumpBody::ScopedRoutes(s) => serde_json::to_value(s),
            ConfigDumpBody::Secrets(s) => serde_json::to_value(s),
            ConfigDumpBody::Endpoints(e) => serde_json::to_value(e),
            ConfigDumpBody::Other(fields) => Ok(Value::Object(fields.clone())),
        }
        .map_err(ser::Error::custom)?;

        let mut fields = match value {
            Value::Object(fields) => fields,
            other => {
                return Err(ser::Error::custom(format!(
                    "config dump body is not an object: {other}"
                )))
            }
        };
        fields.insert("@type".to_string(), Value::String(self.type_url.clone()));
        fields.serialize(serializer)
    }
}

/// Body of a config dump entry.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigDumpBody {
    /// Bootstrap configuration.
    Bootstrap(BootstrapDump),
    /// Cluster configuration.
    Clusters(ClustersDump),
    /// Listener configuration.
    Listeners(ListenersDump),
    /// Route configuration.
    Routes(RoutesDump),
    /// Scoped route configuration.
    ScopedRoutes(ScopedRoutesDump),
    /// TLS secrets.
    Secrets(SecretsDump),
    /// Endpoint assignments.
    Endpoints(EndpointsDump),
    /// A message this crate does not model, without its `@type` key.
    Other(Map<String, Value>),
}

impl ConfigDumpBody {
    /// The kind of this body.
    pub fn kind(&self) -> DumpType {
        match self {
            Self::Bootstrap(_) => DumpType::Bootstrap,
            Self::Clusters(_) => DumpType::Clusters,
            Self::Listeners(_) => DumpType::Listeners,
            Self::Routes(_) => DumpType::Routes,
            Self::ScopedRoutes(_) => DumpType::ScopedRoutes,
            Self::Secrets(_) => DumpType::Secrets,
            Self::Endpoints(_) => DumpType::Endpoints,
            Self::Other(_) => DumpType::Other,
        }
    }
}

/// `BootstrapConfigDump`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BootstrapDump {
    /// The bootstrap configuration.
    pub bootstrap: Value,
    /// When the bootstrap was loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    /// Fields not modelled above, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `ClustersConfigDump`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClustersDump {
    /// Version of the last applied CDS update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_info: Option<String>,
    /// Clusters from the bootstrap.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub static_clusters: Vec<StaticCluster>,
    /// Clusters delivered by CDS and serving traffic.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dynamic_active_clusters: Vec<DynamicCluster>,
    /// Clusters delivered by CDS and still initializing.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dynamic_warming_clusters: Vec<DynamicCluster>,
    /// Fields not modelled above, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A statically configured cluster.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticCluster {
    /// The cluster configuration.
    pub cluster: Value,
    /// When the cluster was loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    /// Fields not modelled above, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A cluster delivered by CDS.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DynamicCluster {
    /// Version of the update that delivered the cluster.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_info: Option<String>,
    /// The cluster configuration.
    pub cluster: Value,
    /// When the cluster was last updated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    /// Fields not modelled above, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `ListenersConfigDump`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ListenersDump {
    /// Version of the last applied LDS update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_info: Option<String>,
    /// Listeners from the bootstrap.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub static_listeners: Vec<StaticListener>,
    /// Listeners delivered by LDS, with their per-state configuration.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dynamic_listeners: Vec<DynamicListener>,
    /// Active listeners as reported by the `v2alpha` admin API.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dynamic_active_listeners: Vec<ListenerState>,
    /// Fields not modelled above, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A statically configured listener.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticListener {
    /// The listener configuration.
    pub listener: Value,
    /// When the listener was loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    /// Fields not modelled above, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A listener delivered by LDS.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DynamicListener {
    /// Listener name.
    pub name: String,
    /// Configuration currently serving traffic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_state: Option<ListenerState>,
    /// Configuration waiting to become active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warming_state: Option<ListenerState>,
    /// Configuration being drained.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draining_state: Option<ListenerState>,
    /// Last rejected update, if any.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub error_state: Value,
    /// Fields not modelled above, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One state of a dynamic listener.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ListenerState {
    /// Version of the update that delivered this state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_info: Option<String>,
    /// The listener configuration.
    pub listener: Value,
    /// When this state was last updated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    /// Fields not modelled above, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `RoutesConfigDump`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutesDump {
    /// Route configurations from the bootstrap.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub static_route_configs: Vec<StaticRouteConfig>,
    /// Route configurations delivered by RDS.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dynamic_route_configs: Vec<DynamicRouteConfig>,
    /// Fields not modelled above, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A statically configured route configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticRouteConfig {
    /// The route configuration.
    pub route_config: Value,
    /// When it was loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    /// Fields not modelled above, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A route configuration delivered by RDS.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DynamicRouteConfig {
    /// Version of the update that delivered it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_info: Option<String>,
    /// The route configuration.
    pub route_config: Value,
    /// When it was last updated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    /// Fields not modelled above, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `ScopedRoutesConfigDump`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScopedRoutesDump {
    /// Scoped route configurations from the bootstrap.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inline_scoped_route_configs: Vec<Value>,
    /// Scoped route configurations delivered by SRDS.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dynamic_scoped_route_configs: Vec<Value>,
    /// Fields not modelled above, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `SecretsConfigDump`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SecretsDump {
    /// Secrets from the bootstrap.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub static_secrets: Vec<Value>,
    /// Secrets delivered by SDS and in use.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dynamic_active_secrets: Vec<Value>,
    /// Secrets delivered by SDS and still warming.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dynamic_warming_secrets: Vec<Value>,
    /// Fields not modelled above, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `EndpointsConfigDump`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EndpointsDump {
    /// Endpoint assignments from the bootstrap.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub static_endpoint_configs: Vec<StaticEndpointConfig>,
    /// Endpoint assignments delivered by EDS.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dynamic_endpoint_configs: Vec<DynamicEndpointConfig>,
    /// Fields not modelled above, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A statically configured endpoint assignment.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticEndpointConfig {
    /// The assignment.
    pub endpoint_config: ClusterLoadAssignment,
    /// When it was loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    /// Fields not modelled above, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An endpoint assignment delivered by EDS.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DynamicEndpointConfig {
    /// Version of the update that delivered it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_info: Option<String>,
    /// The assignment.
    pub endpoint_config: ClusterLoadAssignment,
    /// When it was last updated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    /// Fields not modelled above, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Endpoints of one cluster, grouped by locality.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterLoadAssignment {
    /// Type URL embedded in the dump.
    #[serde(rename = "@type", default, skip_serializing_if = "Option::is_none")]
    pub type_url: Option<String>,
    /// Cluster the endpoints belong to.
    pub cluster_name: String,
    /// Endpoint groups.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub endpoints: Vec<LocalityLbEndpoints>,
    /// Load balancing policy (overprovisioning factor, drop overloads).
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub policy: Value,
    /// Fields not modelled above, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ClusterLoadAssignment {
    /// Endpoint groups whose locality lies inside `scope`.
    pub fn in_locality<'a>(
        &'a self,
        scope: &'a Locality,
    ) -> impl Iterator<Item = &'a LocalityLbEndpoints> + 'a {
        self.endpoints
            .iter()
            .filter(move |group| group.locality().is_within(scope))
    }

    /// Total number of endpoints across all groups.
    pub fn endpoint_count(&self) -> usize {
        self.endpoints.iter().map(|g| g.lb_endpoints.len()).sum()
    }

    /// Find the group containing an endpoint with the given address.
    pub fn group_of(&self, address: &str) -> Option<&LocalityLbEndpoints> {
        self.endpoints
            .iter()
            .find(|g| g.lb_endpoints.iter().any(|e| e.address() == Some(address)))
    }
}

/// Endpoints sharing a locality and priority.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalityLbEndpoints {
    /// Locality of the group; absent means unspecified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locality: Option<Locality>,
    /// Endpoints in the group.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lb_endpoints: Vec<LbEndpoint>,
    /// Weight of the group for locality-weighted balancing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_balancing_weight: Option<u32>,
    /// Failover priority; 0 is the highest and is omitted on the wire.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub priority: u32,
    /// Fields not modelled above, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LocalityLbEndpoints {
    /// The group's locality, or the empty locality if unset.
    pub fn locality(&self) -> Locality {
        self.locality.clone().unwrap_or_default()
    }
}

/// A single endpoint.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LbEndpoint {
    /// Where the endpoint listens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<Endpoint>,
    /// Health as known to the control plane.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_status: Option<String>,
    /// Weight within the group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_balancing_weight: Option<u32>,
    /// Fields not modelled above, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LbEndpoint {
    /// The socket address of the endpoint, if it has one.
    pub fn socket_address(&self) -> Option<&SocketAddress> {
        self.endpoint
            .as_ref()?
            .address
            .as_ref()?
            .socket_address
            .as_ref()
    }

    /// The IP or hostname of the endpoint.
    pub fn address(&self) -> Option<&str> {
        self.socket_address().map(|s| s.address.as_str())
    }

    /// Filter metadata published under `namespace`, e.g. `istio`.
    pub fn filter_metadata(&self, namespace: &str) -> Option<&Value> {
        self.extra.get("metadata")?.get("filter_metadata")?.get(namespace)
    }
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

/// Endpoint details.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Network address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    /// Fields not modelled above, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Network address; only socket addresses are modelled.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    /// IP or hostname and port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socket_address: Option<SocketAddress>,
    /// Fields not modelled above, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// IP or hostname and port.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SocketAddress {
    /// IP address or hostname.
    pub address: String,
    /// Port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port_value: Option<u32>,
    /// Fields not modelled above, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
