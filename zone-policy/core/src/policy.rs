use crate::{
    labels::PodSelector,
    peer::{Peers, PolicyPeer},
    Error, Result,
};
use once_cell::sync::Lazy;
use regex::Regex;
use zone_policy_k8s_api::{self as k8s, PolicyType};

static NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9-]+$").expect("policy name pattern must compile"));

/// One isolation policy: the pods it selects and the peers they may exchange traffic with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Policy {
    name: String,
    pod_selector: PodSelector,
    ingress: Peers,
    egress: Peers,
}

/// Determines the traffic directions a policy isolates, given the number of peers permitted in
/// each direction.
///
/// A direction with peers is always declared. A policy without any peers declares both
/// directions, denying all traffic for the pods it selects.
pub fn infer_policy_types(ingress: usize, egress: usize) -> Vec<PolicyType> {
    let mut types = Vec::with_capacity(2);
    if ingress > 0 || egress == 0 {
        types.push(PolicyType::Ingress);
    }
    if egress > 0 || ingress == 0 {
        types.push(PolicyType::Egress);
    }
    types
}

// === impl Policy ===

impl Policy {
    pub const DENY_ALL: &'static str = "default-deny";

    pub fn new(name: impl Into<String>, pod_selector: PodSelector) -> Result<Self> {
        let name = name.into();
        if !NAME.is_match(&name) {
            return Err(Error::InvalidName(name));
        }
        Ok(Self {
            name,
            pod_selector,
            ingress: Peers::default(),
            egress: Peers::default(),
        })
    }

    /// A policy that selects every pod and permits no traffic.
    pub fn deny_all() -> Self {
        Self {
            name: Self::DENY_ALL.to_string(),
            pod_selector: PodSelector::default(),
            ingress: Peers::default(),
            egress: Peers::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pod_selector(&self) -> &PodSelector {
        &self.pod_selector
    }

    pub fn ingress(&self) -> &Peers {
        &self.ingress
    }

    pub fn egress(&self) -> &Peers {
        &self.egress
    }

    /// Permits traffic from `peer`. Returns `false` if an equal peer was already permitted.
    pub fn add_ingress_peer(&mut self, peer: impl Into<PolicyPeer>) -> bool {
        self.ingress.insert(peer.into())
    }

    /// Permits traffic to `peer`. Returns `false` if an equal peer was already permitted.
    pub fn add_egress_peer(&mut self, peer: impl Into<PolicyPeer>) -> bool {
        self.egress.insert(peer.into())
    }

    pub fn policy_types(&self) -> Vec<PolicyType> {
        infer_policy_types(self.ingress.len(), self.egress.len())
    }

    /// Renders the policy document. All peers of a direction are combined into a single rule.
    pub fn to_resource(&self) -> k8s::NetworkPolicy {
        let ingress = (!self.ingress.is_empty()).then(|| {
            vec![k8s::IngressRule {
                from: self.ingress.to_resources(),
            }]
        });
        let egress = (!self.egress.is_empty()).then(|| {
            vec![k8s::EgressRule {
                to: self.egress.to_resources(),
            }]
        });

        k8s::NetworkPolicy::new(
            &self.name,
            k8s::NetworkPolicySpec {
                pod_selector: self.pod_selector.to_resource(),
                policy_types: self.policy_types(),
                ingress,
                egress,
            },
        )
    }
}

/// Decodes a policy document.
///
/// Only documents the generator could have produced are accepted: at most one rule per
/// direction, and `policyTypes` consistent with the rules that are present.
impl TryFrom<k8s::NetworkPolicy> for Policy {
    type Error = Error;

    fn try_from(resource: k8s::NetworkPolicy) -> Result<Self> {
        if resource.api_version != k8s::NetworkPolicy::API_VERSION
            || resource.kind != k8s::NetworkPolicy::KIND
        {
            return Err(Error::UnsupportedResource(format!(
                "{}/{}",
                resource.api_version, resource.kind
            )));
        }

        let name = resource.metadata.name.unwrap_or_default();
        let k8s::NetworkPolicySpec {
            pod_selector,
            policy_types,
            ingress,
            egress,
        } = resource.spec;

        let mut policy = Self::new(name, pod_selector.into())?;
        let from = single_rule(
            &policy.name,
            "ingress",
            ingress.map(|rules| rules.into_iter().map(|r| r.from).collect()),
        )?;
        for peer in from {
            policy.add_ingress_peer(PolicyPeer::try_from(peer)?);
        }
        let to = single_rule(
            &policy.name,
            "egress",
            egress.map(|rules| rules.into_iter().map(|r| r.to).collect()),
        )?;
        for peer in to {
            policy.add_egress_peer(PolicyPeer::try_from(peer)?);
        }

        let expected = policy.policy_types();
        if policy_types != expected {
            return Err(Error::UnsupportedResource(format!(
                "policy {} declares policyTypes {:?} but its rules imply {:?}",
                policy.name, policy_types, expected
            )));
        }

        Ok(policy)
    }
}

fn single_rule(
    name: &str,
    direction: &str,
    rules: Option<Vec<Vec<k8s::NetworkPolicyPeer>>>,
) -> Result<Vec<k8s::NetworkPolicyPeer>> {
    let mut rules = rules.unwrap_or_default();
    match rules.len() {
        0 => Ok(Vec::new()),
        1 => Ok(rules.remove(0)),
        n => Err(Error::UnsupportedResource(format!(
            "policy {} has {} {} rules",
            name, n, direction
        ))),
    }
}
