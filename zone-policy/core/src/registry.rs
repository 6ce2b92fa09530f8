use crate::{policy::Policy, zone::Zone, Error, Result};
use indexmap::IndexMap;
use tracing::{debug, trace};
use zone_policy_k8s_api as k8s;

/// Holds all zones, in declaration order, and the policy generated for each of them.
///
/// Each registry exclusively owns its zones and policies; independent registries share no state.
#[derive(Clone, Debug, Default)]
pub struct ZoneRegistry {
    zones: IndexMap<String, ZoneEntry>,
}

#[derive(Clone, Debug)]
struct ZoneEntry {
    zone: Zone,
    policy: Policy,
}

// === impl ZoneRegistry ===

impl ZoneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a zone and generates its policy.
    ///
    /// The zone's own pods and networks are immediately permitted in both directions. Fails if
    /// the name is already registered, or if it normalizes to the same identifier as another
    /// zone's name.
    pub fn add_zone(
        &mut self,
        name: impl Into<String>,
        cidrs: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<&Zone> {
        let name = name.into();
        if self.zones.contains_key(&name) {
            return Err(Error::DuplicateZone(name));
        }

        let zone = Zone::new(name.clone(), cidrs)?;
        if let Some(existing) = self
            .zones
            .values()
            .find(|e| e.zone.normalized_name() == zone.normalized_name())
        {
            return Err(Error::ZoneNameCollision {
                name,
                existing: existing.zone.name().to_string(),
                normalized: zone.normalized_name().to_string(),
            });
        }

        let policy = zone.to_policy()?;
        debug!(zone = %name, policy = %policy.name(), networks = zone.cidrs().len(), "Added zone");
        let entry = self.zones.entry(name).or_insert(ZoneEntry { zone, policy });
        Ok(&entry.zone)
    }

    /// Permits the pods of zone `from` to send traffic to the pods of zone `to`.
    ///
    /// The destination's policy gains an ingress peer selecting the source zone and the source's
    /// policy gains an egress peer selecting the destination zone. Traffic in the opposite
    /// direction is unaffected. Neither policy is modified if either zone is unknown.
    pub fn allow(&mut self, from: &str, to: &str) -> Result<()> {
        let from_idx = self
            .zones
            .get_index_of(from)
            .ok_or_else(|| Error::UnknownZone(from.to_string()))?;
        let to_idx = self
            .zones
            .get_index_of(to)
            .ok_or_else(|| Error::UnknownZone(to.to_string()))?;

        let from_selector = self.zones[from_idx].zone.pod_selector().clone();
        let to_selector = self.zones[to_idx].zone.pod_selector().clone();
        let ingress = self.zones[to_idx].policy.add_ingress_peer(from_selector);
        let egress = self.zones[from_idx].policy.add_egress_peer(to_selector);

        if ingress || egress {
            debug!(%from, %to, "Allowed traffic");
        } else {
            trace!(%from, %to, "Traffic already allowed");
        }
        Ok(())
    }

    /// Renders the `default-deny` policy followed by each zone's policy in declaration order.
    pub fn emit_documents(&self) -> Vec<k8s::NetworkPolicy> {
        std::iter::once(Policy::deny_all().to_resource())
            .chain(self.zones.values().map(|e| e.policy.to_resource()))
            .collect()
    }

    pub fn zone(&self, name: &str) -> Option<&Zone> {
        self.zones.get(name).map(|e| &e.zone)
    }

    /// Returns the policy generated for the zone named `name`.
    pub fn policy(&self, name: &str) -> Option<&Policy> {
        self.zones.get(name).map(|e| &e.policy)
    }

    pub fn zones(&self) -> impl Iterator<Item = &Zone> + '_ {
        self.zones.values().map(|e| &e.zone)
    }

    pub fn zone_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.zones.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}
