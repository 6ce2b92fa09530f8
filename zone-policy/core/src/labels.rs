use indexmap::IndexMap;
use zone_policy_k8s_api as k8s;

pub type Map = IndexMap<String, String>;

/// An exact-match label selector.
///
/// Equality is structural and ignores the order in which labels were set; rendering preserves
/// that order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelSelector(Map);

/// Selects the pods a policy applies to, or the pods on the other side of a rule.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PodSelector(LabelSelector);

// === impl LabelSelector ===

impl LabelSelector {
    /// Sets `key` to `value`, replacing any previous value.
    pub fn set(&mut self, key: impl ToString, value: impl ToString) {
        self.0.insert(key.to_string(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn to_resource(&self) -> k8s::LabelSelector {
        k8s::LabelSelector::from_map(self.0.clone())
    }
}

impl From<k8s::LabelSelector> for LabelSelector {
    fn from(selector: k8s::LabelSelector) -> Self {
        Self(selector.match_labels)
    }
}

impl std::iter::FromIterator<(String, String)> for LabelSelector {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl std::iter::FromIterator<(&'static str, &'static str)> for LabelSelector {
    fn from_iter<T: IntoIterator<Item = (&'static str, &'static str)>>(iter: T) -> Self {
        iter.into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }
}

// === impl PodSelector ===

impl PodSelector {
    pub fn new(selector: LabelSelector) -> Self {
        Self(selector)
    }

    pub fn label_selector(&self) -> &LabelSelector {
        &self.0
    }

    pub fn set(&mut self, key: impl ToString, value: impl ToString) {
        self.0.set(key, value);
    }

    pub fn to_resource(&self) -> k8s::LabelSelector {
        self.0.to_resource()
    }
}

impl From<LabelSelector> for PodSelector {
    fn from(selector: LabelSelector) -> Self {
        Self(selector)
    }
}

impl From<k8s::LabelSelector> for PodSelector {
    fn from(selector: k8s::LabelSelector) -> Self {
        Self(selector.into())
    }
}
