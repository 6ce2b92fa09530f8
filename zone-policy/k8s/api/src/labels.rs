use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Label keys and values, in the order they were assigned.
pub type Map = IndexMap<String, String>;

/// An exact-match label selector.
///
/// An empty selector serializes as `{}`, which selects every pod in the namespace.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelSelector {
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub match_labels: Map,
}

// === impl LabelSelector ===

impl LabelSelector {
    pub fn from_map(match_labels: Map) -> Self {
        Self { match_labels }
    }

    pub fn is_empty(&self) -> bool {
        self.match_labels.is_empty()
    }
}

impl std::iter::FromIterator<(String, String)> for LabelSelector {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self::from_map(iter.into_iter().collect())
    }
}

impl std::iter::FromIterator<(&'static str, &'static str)> for LabelSelector {
    fn from_iter<T: IntoIterator<Item = (&'static str, &'static str)>>(iter: T) -> Self {
        Self::from_map(
            iter.into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}
