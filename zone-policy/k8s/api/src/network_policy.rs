use super::{labels::LabelSelector, ObjectMeta};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An isolation policy document.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkPolicy {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: NetworkPolicySpec,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkPolicySpec {
    /// Selects the pods this policy applies to.
    pub pod_selector: LabelSelector,

    pub policy_types: Vec<PolicyType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingress: Option<Vec<IngressRule>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub egress: Option<Vec<EgressRule>>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum PolicyType {
    Ingress,
    Egress,
}

/// Peers that may connect to the selected pods. Peers are alternatives.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct IngressRule {
    #[serde(default)]
    pub from: Vec<NetworkPolicyPeer>,
}

/// Peers the selected pods may connect to. Peers are alternatives.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct EgressRule {
    #[serde(default)]
    pub to: Vec<NetworkPolicyPeer>,
}

/// One counterparty of a rule.
///
/// Exactly one field is expected to be set. Documents produced by the generator always satisfy
/// this; documents read from elsewhere may not.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkPolicyPeer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_block: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_selector: Option<LabelSelector>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace_selector: Option<NamespaceSelector>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceSelector {
    #[serde(default)]
    pub label_selector: LabelSelector,
}

// === impl NetworkPolicy ===

impl NetworkPolicy {
    pub const API_VERSION: &'static str = "networking.k8s.io/v1";
    pub const KIND: &'static str = "NetworkPolicy";

    pub fn new(name: impl ToString, spec: NetworkPolicySpec) -> Self {
        Self {
            api_version: Self::API_VERSION.to_string(),
            kind: Self::KIND.to_string(),
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                ..Default::default()
            },
            spec,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.metadata.name.as_deref()
    }
}

// === impl PolicyType ===

impl fmt::Display for PolicyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ingress => f.write_str("Ingress"),
            Self::Egress => f.write_str("Egress"),
        }
    }
}

// === impl NetworkPolicyPeer ===

impl NetworkPolicyPeer {
    pub fn ip_block(cidr: impl ToString) -> Self {
        Self {
            ip_block: Some(cidr.to_string()),
            ..Default::default()
        }
    }

    pub fn pod_selector(selector: LabelSelector) -> Self {
        Self {
            pod_selector: Some(selector),
            ..Default::default()
        }
    }

    pub fn namespace_selector(label_selector: LabelSelector) -> Self {
        Self {
            namespace_selector: Some(NamespaceSelector { label_selector }),
            ..Default::default()
        }
    }
}
