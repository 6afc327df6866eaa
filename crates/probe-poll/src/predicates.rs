//! Ready-made acceptance predicates.
//!
//! Scenario code usually waits for one of a few things before sending
//! traffic: a cluster for a host exists, its endpoints have arrived, and the
//! endpoints carry the locality and priority the control plane should have
//! assigned. Each helper returns a closure usable with
//! [`ConvergencePoller::wait_for_convergence`](crate::ConvergencePoller::wait_for_convergence).
//!
//! Missing resources yield [`Verdict::Retry`] since a later push may add
//! them; malformed expectations yield [`Verdict::Fail`].

use probe_core::{ConfigDump, Locality};

use crate::Verdict;

/// Boxed predicate, for combining heterogeneous checks.
pub type BoxPredicate = Box<dyn FnMut(&ConfigDump) -> Verdict + Send>;

/// Accept once a cluster with exactly this name is present.
pub fn has_cluster(name: impl Into<String>) -> impl FnMut(&ConfigDump) -> Verdict + Send {
    let name = name.into();
    move |dump| {
        if dump.cluster(&name).is_some() {
            Verdict::Accept
        } else {
            Verdict::retry(format!("cluster {name} not present"))
        }
    }
}

/// Accept once an outbound cluster for `host` is present.
///
/// Outbound clusters are named `outbound|<port>|<subset>|<host>`, so this
/// matches any port and subset. Inbound, static and other clusters never
/// match, nor does an empty host.
pub fn has_cluster_for_host(
    host: impl Into<String>,
) -> impl FnMut(&ConfigDump) -> Verdict + Send {
    let host = host.into();
    move |dump| {
        let found = !host.is_empty()
            && dump.clusters().into_iter().any(|cluster| {
                cluster
                    .get("name")
                    .and_then(|n| n.as_str())
                    .and_then(outbound_host)
                    .is_some_and(|h| h == host)
            });
        if found {
            Verdict::Accept
        } else {
            Verdict::retry(format!("no cluster for host {host}"))
        }
    }
}

/// Host part of an `outbound|<port>|<subset>|<host>` cluster name.
fn outbound_host(name: &str) -> Option<&str> {
    let mut parts = name.splitn(4, '|');
    if parts.next()? != "outbound" {
        return None;
    }
    let _port = parts.next()?;
    let _subset = parts.next()?;
    parts.next().filter(|host| !host.is_empty() && !host.contains('|'))
}

/// Accept once a listener with this name is present.
pub fn has_listener(name: impl Into<String>) -> impl FnMut(&ConfigDump) -> Verdict + Send {
    let name = name.into();
    move |dump| {
        if dump.listener(&name).is_some() {
            Verdict::Accept
        } else {
            Verdict::retry(format!("listener {name} not present"))
        }
    }
}

/// Accept once `cluster` has at least one endpoint inside `locality`.
///
/// `locality` uses the `region/zone/subzone` form; a malformed value fails
/// the poll immediately.
pub fn endpoints_in_locality(
    cluster: impl Into<String>,
    locality: &str,
) -> impl FnMut(&ConfigDump) -> Verdict + Send {
    let cluster = cluster.into();
    let scope = locality.parse::<Locality>();
    move |dump| {
        let scope = match &scope {
            Ok(scope) => scope,
            Err(err) => return Verdict::fail(err.to_string()),
        };
        let Some(assignment) = dump.endpoint_assignment(&cluster) else {
            return Verdict::retry(format!("no endpoints for cluster {cluster}"));
        };
        let count: usize = assignment
            .in_locality(scope)
            .map(|group| group.lb_endpoints.len())
            .sum();
        if count > 0 {
            Verdict::Accept
        } else {
            Verdict::retry(format!("cluster {cluster} has no endpoints in {scope}"))
        }
    }
}

/// Accept once every endpoint group of `cluster` inside `locality` has
/// `priority`, and there is at least one such group.
pub fn locality_priority(
    cluster: impl Into<String>,
    locality: &str,
    priority: u32,
) -> impl FnMut(&ConfigDump) -> Verdict + Send {
    let cluster = cluster.into();
    let scope = locality.parse::<Locality>();
    move |dump| {
        let scope = match &scope {
            Ok(scope) => scope,
            Err(err) => return Verdict::fail(err.to_string()),
        };
        let Some(assignment) = dump.endpoint_assignment(&cluster) else {
            return Verdict::retry(format!("no endpoints for cluster {cluster}"));
        };

        let mut groups = assignment.in_locality(scope).peekable();
        if groups.peek().is_none() {
            return Verdict::retry(format!("cluster {cluster} has no endpoints in {scope}"));
        }
        match groups.find(|group| group.priority != priority) {
            None => Verdict::Accept,
            Some(group) => Verdict::retry(format!(
                "cluster {cluster} endpoints in {} have priority {}, want {priority}",
                group.locality(),
                group.priority
            )),
        }
    }
}

/// Accept once every predicate accepts the same snapshot.
///
/// All predicates see every snapshot. A failure from any of them wins over
/// a retry; the first retry reason is reported otherwise.
pub fn all_of(mut predicates: Vec<BoxPredicate>) -> impl FnMut(&ConfigDump) -> Verdict + Send {
    move |dump| {
        let mut pending = None;
        for predicate in predicates.iter_mut() {
            match predicate(dump) {
                Verdict::Accept => {}
                Verdict::Fail(reason) => return Verdict::Fail(reason),
                Verdict::Retry(reason) => {
                    pending.get_or_insert(reason);
                }
            }
        }
        match pending {
            Some(reason) => Verdict::Retry(reason),
            None => Verdict::Accept,
        }
    }
}
