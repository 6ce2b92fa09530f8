use crate::{
    labels::{LabelSelector, PodSelector},
    peer::PolicyPeer,
    policy::Policy,
    Error, Result,
};
use once_cell::sync::Lazy;
use regex::Regex;

static SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new("[^a-z0-9]+").expect("separator pattern must compile"));

/// A named group of pods and the external networks associated with it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Zone {
    name: String,
    cidrs: Vec<String>,
    normalized_name: String,
    pod_selector: PodSelector,
}

/// Transliterates `name` to ASCII, lowercases it, and collapses every run of characters outside
/// `[a-z0-9]` into a single `-`, dropping leading and trailing separators.
pub fn normalize(name: &str) -> String {
    let lower = deunicode::deunicode(name).to_ascii_lowercase();
    SEPARATORS
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}

// === impl Zone ===

impl Zone {
    /// The label that identifies a zone's pods.
    pub const LABEL: &'static str = "zone";

    pub fn new(
        name: impl Into<String>,
        cidrs: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self> {
        let name = name.into();
        let normalized_name = normalize(&name);
        if normalized_name.is_empty() {
            return Err(Error::InvalidName(name));
        }

        let mut labels = LabelSelector::default();
        labels.set(Self::LABEL, &normalized_name);

        Ok(Self {
            cidrs: cidrs.into_iter().map(Into::into).collect(),
            pod_selector: labels.into(),
            normalized_name,
            name,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cidrs(&self) -> &[String] {
        &self.cidrs
    }

    pub fn normalized_name(&self) -> &str {
        &self.normalized_name
    }

    /// Selects `zone: <normalized name>`.
    pub fn pod_selector(&self) -> &PodSelector {
        &self.pod_selector
    }

    pub fn policy_name(&self) -> String {
        format!("{}-zone", self.normalized_name)
    }

    /// Permits traffic from this zone's pods and networks into the pods selected by `policy`.
    pub fn contribute_ingress_rules(&self, policy: &mut Policy) {
        policy.add_ingress_peer(self.pod_selector.clone());
        for cidr in &self.cidrs {
            policy.add_ingress_peer(PolicyPeer::IpBlock(cidr.clone()));
        }
    }

    /// Permits traffic from the pods selected by `policy` to this zone's pods and networks.
    pub fn contribute_egress_rules(&self, policy: &mut Policy) {
        policy.add_egress_peer(self.pod_selector.clone());
        for cidr in &self.cidrs {
            policy.add_egress_peer(PolicyPeer::IpBlock(cidr.clone()));
        }
    }

    /// Builds the zone's own policy, which admits traffic within the zone and to and from the
    /// zone's networks.
    pub fn to_policy(&self) -> Result<Policy> {
        let mut policy = Policy::new(self.policy_name(), self.pod_selector.clone())?;
        self.contribute_ingress_rules(&mut policy);
        self.contribute_egress_rules(&mut policy);
        Ok(policy)
    }
}
