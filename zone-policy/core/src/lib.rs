//! Zone policy generation.
//!
//! A [`ZoneRegistry`] holds a set of named zones, each a group of pods selected by a `zone` label
//! plus the external networks that belong to the zone. Every zone owns one [`Policy`] that admits
//! traffic within the zone and to/from its networks. Allowing traffic from one zone to another adds
//! an egress peer to the source zone's policy and an ingress peer to the destination zone's policy:
//!
//! ```text
//! allow(A, B):   [ A-zone ] --egress--> [ zone: b ]
//!                [ B-zone ] <-ingress-- [ zone: a ]
//! ```
//!
//! The emitted documents always start with a `default-deny` policy that selects every pod and
//! permits nothing, so that only traffic permitted by a zone policy is admitted.

#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod labels;
pub mod peer;
pub mod policy;
pub mod registry;
pub mod zone;


pub use self::{
    labels::{LabelSelector, PodSelector},
    peer::{Peers, PolicyPeer},
    policy::Policy,
    registry::ZoneRegistry,
    zone::Zone,
};
pub use zone_policy_k8s_api as k8s;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid name {0:?}: must consist of [a-z0-9-]+")]
    InvalidName(String),

    #[error("no zone named {0:?}")]
    UnknownZone(String),

    #[error("zone {0:?} is already defined")]
    DuplicateZone(String),

    #[error("zone {name:?} normalizes to {normalized:?}, which is already used by zone {existing:?}")]
    ZoneNameCollision {
        name: String,
        existing: String,
        normalized: String,
    },

    #[error("unsupported policy peer: {0}")]
    UnsupportedPeerType(String),

    #[error("unsupported resource: {0}")]
    UnsupportedResource(String),
}
