//=========================================================================
// Scene Arguments
//=========================================================================
//
// Keyed string arguments passed along with a scene switch, e.g. the id
// of the selected user.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::BTreeMap;

//=== SceneArgs ===========================================================

/// Arguments delivered to [`Scene::on_enter`](super::Scene::on_enter).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SceneArgs {
    values: BTreeMap<String, String>,
}

impl SceneArgs {
    /// Creates an empty argument set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Returns the value for `key`. Empty strings count as absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
