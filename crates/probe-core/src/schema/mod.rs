//! Decoded Envoy admin views.
//!
//! The admin interface answers `/server_info` and `/config_dump` with
//! protobuf messages rendered as JSON. This module models the parts of those
//! messages that tests inspect and keeps the rest as opaque JSON, so that a
//! newer proxy adding fields does not break decoding while a response with
//! the wrong shape still fails loudly.

mod config_dump;
mod duration;
mod server_info;
mod type_url;

pub use config_dump::{
    Address, BootstrapDump, ClusterLoadAssignment, ClustersDump, ConfigDump, ConfigDumpBody,
    ConfigDumpEntry, DumpSummary, DynamicCluster, DynamicEndpointConfig, DynamicListener,
    DynamicRouteConfig, Endpoint, EndpointsDump, LbEndpoint, ListenerState, ListenersDump,
    LocalityLbEndpoints, RoutesDump, ScopedRoutesDump, SecretsDump, SocketAddress, StaticCluster,
    StaticEndpointConfig, StaticListener, StaticRouteConfig,
};
pub use duration::{format_duration, parse_duration};
pub use server_info::{ServerInfo, ServerState};
pub use type_url::DumpType;
