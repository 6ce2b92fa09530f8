use crate::{
    labels::{LabelSelector, PodSelector},
    Error,
};
use zone_policy_k8s_api as k8s;

/// A permitted counterparty of a policy rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PolicyPeer {
    /// A raw address range. The range is not validated.
    IpBlock(String),

    /// Pods in the policy's namespace matching a selector.
    Pod(PodSelector),

    /// Pods in namespaces matching a selector.
    Namespace(LabelSelector),
}

/// An insertion-ordered set of peers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Peers(Vec<PolicyPeer>);

// === impl PolicyPeer ===

impl PolicyPeer {
    pub fn to_resource(&self) -> k8s::NetworkPolicyPeer {
        match self {
            Self::IpBlock(cidr) => k8s::NetworkPolicyPeer::ip_block(cidr),
            Self::Pod(selector) => k8s::NetworkPolicyPeer::pod_selector(selector.to_resource()),
            Self::Namespace(selector) => {
                k8s::NetworkPolicyPeer::namespace_selector(selector.to_resource())
            }
        }
    }
}

impl From<PodSelector> for PolicyPeer {
    fn from(selector: PodSelector) -> Self {
        Self::Pod(selector)
    }
}

impl TryFrom<k8s::NetworkPolicyPeer> for PolicyPeer {
    type Error = Error;

    fn try_from(peer: k8s::NetworkPolicyPeer) -> Result<Self, Self::Error> {
        match peer {
            k8s::NetworkPolicyPeer {
                ip_block: Some(cidr),
                pod_selector: None,
                namespace_selector: None,
            } => Ok(Self::IpBlock(cidr)),
            k8s::NetworkPolicyPeer {
                ip_block: None,
                pod_selector: Some(selector),
                namespace_selector: None,
            } => Ok(Self::Pod(selector.into())),
            k8s::NetworkPolicyPeer {
                ip_block: None,
                pod_selector: None,
                namespace_selector: Some(ns),
            } => Ok(Self::Namespace(ns.label_selector.into())),
            peer => {
                let fields = [
                    ("ipBlock", peer.ip_block.is_some()),
                    ("podSelector", peer.pod_selector.is_some()),
                    ("namespaceSelector", peer.namespace_selector.is_some()),
                ]
                .into_iter()
                .filter_map(|(field, set)| set.then_some(field))
                .collect::<Vec<_>>();
                let msg = if fields.is_empty() {
                    "no peer type set".to_string()
                } else {
                    format!("multiple peer types set: {}", fields.join(", "))
                };
                Err(Error::UnsupportedPeerType(msg))
            }
        }
    }
}

// === impl Peers ===

impl Peers {
    /// Adds a peer unless an equal peer is already present.
    ///
    /// Returns `true` if the peer was added.
    pub fn insert(&mut self, peer: PolicyPeer) -> bool {
        if self.0.contains(&peer) {
            return false;
        }
        self.0.push(peer);
        true
    }

    pub fn contains(&self, peer: &PolicyPeer) -> bool {
        self.0.contains(peer)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PolicyPeer> {
        self.0.iter()
    }

    pub(crate) fn to_resources(&self) -> Vec<k8s::NetworkPolicyPeer> {
        self.0.iter().map(PolicyPeer::to_resource).collect()
    }
}

impl<'a> IntoIterator for &'a Peers {
    type Item = &'a PolicyPeer;
    type IntoIter = std::slice::Iter<'a, PolicyPeer>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl std::iter::FromIterator<PolicyPeer> for Peers {
    fn from_iter<T: IntoIterator<Item = PolicyPeer>>(iter: T) -> Self {
        let mut peers = Self::default();
        for peer in iter {
            peers.insert(peer);
        }
        peers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(name: &'static str) -> PodSelector {
        LabelSelector::from_iter(Some(("zone", name))).into()
    }

    #[test]
    fn variants_are_never_equal_across_types() {
        let labels = LabelSelector::from_iter(Some(("zone", "front-end")));
        let pod = PolicyPeer::Pod(labels.clone().into());
        let ns = PolicyPeer::Namespace(labels);
        assert_ne!(pod, ns);
        assert_ne!(
            PolicyPeer::IpBlock("10.0.0.0/8".into()),
            PolicyPeer::Pod(PodSelector::default())
        );
    }

    #[test]
    fn insert_dedups_by_value() {
        let mut peers = Peers::default();
        assert!(peers.insert(zone("front-end").into()));
        assert!(peers.insert(PolicyPeer::IpBlock("10.10.1.0/24".into())));
        assert!(!peers.insert(zone("front-end").into()));
        assert!(!peers.insert(PolicyPeer::IpBlock("10.10.1.0/24".into())));
        assert!(peers.insert(zone("back-end").into()));

        assert_eq!(
            peers.iter().cloned().collect::<Vec<_>>(),
            vec![
                zone("front-end").into(),
                PolicyPeer::IpBlock("10.10.1.0/24".into()),
                zone("back-end").into(),
            ]
        );
    }

    #[test]
    fn decodes_rendered_peers() {
        for peer in [
            PolicyPeer::IpBlock("10.11.0.0/24".into()),
            PolicyPeer::Pod(zone("back-end")),
            PolicyPeer::Namespace(LabelSelector::from_iter(Some(("env", "prod")))),
        ] {
            assert_eq!(PolicyPeer::try_from(peer.to_resource()), Ok(peer));
        }
    }

    #[test]
    fn rejects_ambiguous_peers() {
        let empty = k8s::NetworkPolicyPeer::default();
        assert_eq!(
            PolicyPeer::try_from(empty),
            Err(Error::UnsupportedPeerType("no peer type set".to_string()))
        );

        let both = k8s::NetworkPolicyPeer {
            pod_selector: Some(zone("front-end").to_resource()),
            ..k8s::NetworkPolicyPeer::ip_block("10.0.0.0/8")
        };
        assert_eq!(
            PolicyPeer::try_from(both),
            Err(Error::UnsupportedPeerType(
                "multiple peer types set: ipBlock, podSelector".to_string()
            ))
        );
    }
}
