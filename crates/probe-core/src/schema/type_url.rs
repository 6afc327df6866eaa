//! Type URLs of config dump entries.
//!
//! Each entry of a config dump carries an `@type` URL naming the admin
//! message it holds. Proxies still on the `v2alpha` admin API and proxies on
//! `v3` use different packages for the same messages, so entries are
//! classified by the short message name.

use std::fmt;

/// Kind of a config dump entry, classified from its `@type` URL.
///
/// # Example
///
/// ```rust
/// use probe_core::schema::DumpType;
///
/// let v3 = DumpType::from_type_url("type.googleapis.com/envoy.admin.v3.ClustersConfigDump");
/// let v2 = DumpType::from_type_url("type.googleapis.com/envoy.admin.v2alpha.ClustersConfigDump");
/// assert_eq!(v3, DumpType::Clusters);
/// assert_eq!(v2, DumpType::Clusters);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DumpType {
    /// `BootstrapConfigDump`.
    Bootstrap,
    /// `ClustersConfigDump`.
    Clusters,
    /// `ListenersConfigDump`.
    Listeners,
    /// `RoutesConfigDump`.
    Routes,
    /// `ScopedRoutesConfigDump`.
    ScopedRoutes,
    /// `SecretsConfigDump`.
    Secrets,
    /// `EndpointsConfigDump`.
    Endpoints,
    /// Any other admin message.
    Other,
}

impl DumpType {
    /// Type URL for the v3 `BootstrapConfigDump`.
    pub const BOOTSTRAP: &'static str = "type.googleapis.com/envoy.admin.v3.BootstrapConfigDump";

    /// Type URL for the v3 `ClustersConfigDump`.
    pub const CLUSTERS: &'static str = "type.googleapis.com/envoy.admin.v3.ClustersConfigDump";

    /// Type URL for the v3 `ListenersConfigDump`.
    pub const LISTENERS: &'static str = "type.googleapis.com/envoy.admin.v3.ListenersConfigDump";

    /// Type URL for the v3 `RoutesConfigDump`.
    pub const ROUTES: &'static str = "type.googleapis.com/envoy.admin.v3.RoutesConfigDump";

    /// Type URL for the v3 `ScopedRoutesConfigDump`.
    pub const SCOPED_ROUTES: &'static str =
        "type.googleapis.com/envoy.admin.v3.ScopedRoutesConfigDump";

    /// Type URL for the v3 `SecretsConfigDump`.
    pub const SECRETS: &'static str = "type.googleapis.com/envoy.admin.v3.SecretsConfigDump";

    /// Type URL for the v3 `EndpointsConfigDump`.
    pub const ENDPOINTS: &'static str = "type.googleapis.com/envoy.admin.v3.EndpointsConfigDump";

    /// Classify a type URL.
    #[must_use]
    pub fn from_type_url(type_url: &str) -> Self {
        match short_name(type_url) {
            "BootstrapConfigDump" => Self::Bootstrap,
            "ClustersConfigDump" => Self::Clusters,
            "ListenersConfigDump" => Self::Listeners,
            "RoutesConfigDump" => Self::Routes,
            "ScopedRoutesConfigDump" => Self::ScopedRoutes,
            "SecretsConfigDump" => Self::Secrets,
            "EndpointsConfigDump" => Self::Endpoints,
            _ => Self::Other,
        }
    }

    /// The v3 type URL for this kind, or `None` for [`DumpType::Other`].
    #[must_use]
    pub fn type_url(&self) -> Option<&'static str> {
        match self {
            Self::Bootstrap => Some(Self::BOOTSTRAP),
            Self::Clusters => Some(Self::CLUSTERS),
            Self::Listeners => Some(Self::LISTENERS),
            Self::Routes => Some(Self::ROUTES),
            Self::ScopedRoutes => Some(Self::SCOPED_ROUTES),
            Self::Secrets => Some(Self::SECRETS),
            Self::Endpoints => Some(Self::ENDPOINTS),
            Self::Other => None,
        }
    }
}

impl fmt::Display for DumpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.type_url() {
            Some(url) => write!(f, "{}", short_name(url)),
            None => write!(f, "Other"),
        }
    }
}

/// Extract the message name from a type URL.
///
/// For example, `type.googleapis.com/envoy.admin.v3.ClustersConfigDump`
/// returns `ClustersConfigDump`.
fn short_name(type_url: &str) -> &str {
    type_url
        .rsplit('/')
        .next()
        .and_then(|s| s.rsplit('.').next())
        .unwrap_or(type_url)
}
