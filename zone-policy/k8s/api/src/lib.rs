#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

//! Wire shapes of the documents produced by the zone policy generator.
//!
//! These types only describe how a policy is serialized; the rules that decide what a policy
//! contains live in `zone-policy-core`.

pub mod labels;
pub mod network_policy;

pub use self::{
    labels::LabelSelector,
    network_policy::{
        EgressRule, IngressRule, NamespaceSelector, NetworkPolicy, NetworkPolicyPeer,
        NetworkPolicySpec, PolicyType,
    },
};
pub use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
