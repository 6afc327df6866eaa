//! Locality labels.
//!
//! This module provides [`Locality`], the hierarchical region/zone/sub-zone
//! label the control plane uses to bias routing. Test fixtures spell
//! localities as `region/zone/subzone`; Envoy reports them as JSON objects
//! with `region`, `zone` and `sub_zone` keys. Both forms map to this type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ProbeError;

/// Region/zone/sub-zone topology label.
///
/// Empty components mean "unspecified". A locality with only a region is
/// a scope that contains every zone of that region.
///
/// # Example
///
/// ```rust
/// use probe_core::Locality;
///
/// let endpoint: Locality = "closeregion/zone/subzone".parse().unwrap();
/// let scope: Locality = "closeregion".parse().unwrap();
///
/// assert!(endpoint.is_within(&scope));
/// assert!(!scope.is_within(&endpoint));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Locality {
    #[serde(skip_serializing_if = "String::is_empty")]
    region: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    zone: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    sub_zone: String,
}

impl Locality {
    /// Create a locality from its three components.
    #[must_use]
    pub fn new(
        region: impl Into<String>,
        zone: impl Into<String>,
        sub_zone: impl Into<String>,
    ) -> Self {
        Self {
            region: region.into(),
            zone: zone.into(),
            sub_zone: sub_zone.into(),
        }
    }

    /// The region component.
    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }

    /// The zone component.
    #[must_use]
    pub fn zone(&self) -> &str {
        &self.zone
    }

    /// The sub-zone component.
    #[must_use]
    pub fn sub_zone(&self) -> &str {
        &self.sub_zone
    }

    /// Check if no component is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.region.is_empty() && self.zone.is_empty() && self.sub_zone.is_empty()
    }

    /// Check if this locality lies inside `scope`.
    ///
    /// Components are compared top-down; the first empty component of
    /// `scope` matches everything below it.
    #[must_use]
    pub fn is_within(&self, scope: &Locality) -> bool {
        let pairs = [
            (&scope.region, &self.region),
            (&scope.zone, &self.zone),
            (&scope.sub_zone, &self.sub_zone),
        ];
        for (want, have) in pairs {
            if want.is_empty() {
                return true;
            }
            if want != have {
                return false;
            }
        }
        true
    }
}

impl FromStr for Locality {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::default());
        }

        let parts: Vec<&str> = s.split('/').collect();
        if parts.len() > 3 {
            return Err(ProbeError::Configuration(format!(
                "locality '{s}' has more than three components"
            )));
        }
        if parts.iter().any(|p| p.is_empty()) {
            return Err(ProbeError::Configuration(format!(
                "locality '{s}' has an empty component"
            )));
        }

        let mut parts = parts.into_iter();
        Ok(Self::new(
            parts.next().unwrap_or_default(),
            parts.next().unwrap_or_default(),
            parts.next().unwrap_or_default(),
        ))
    }
}

impl fmt::Display for Locality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.region)?;
        if !self.zone.is_empty() || !self.sub_zone.is_empty() {
            write!(f, "/{}", self.zone)?;
        }
        if !self.sub_zone.is_empty() {
            write!(f, "/{}", self.sub_zone)?;
        }
        Ok(())
    }
}
