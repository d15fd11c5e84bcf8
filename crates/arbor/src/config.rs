//! World configuration.
//!
//! A [`WorldConfig`] can be built in code or loaded from JSON. Every field has
//! a default, so a config file only needs the keys it changes:
//!
//! ```json
//! { "destroy_policy": "orphan" }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SceneError};

/// What happens to the children of a destroyed game object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DestroyPolicy {
    /// Destroy the whole subtree along with the object.
    #[default]
    Recursive,
    /// Destroy only the object. Its children survive as root objects.
    Orphan,
}

/// Settings for a [`World`](crate::ecs::World).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub destroy_policy: DestroyPolicy,
    /// Number of game-object records to reserve up front.
    pub initial_capacity: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            destroy_policy: DestroyPolicy::Recursive,
            initial_capacity: 64,
        }
    }
}

impl WorldConfig {
    /// Parse a config from a JSON string. Missing keys keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| SceneError::Io(path.display().to_string(), e))?;
        Self::from_json_str(&json)
    }

    /// Return a copy with the given destroy policy.
    pub fn with_destroy_policy(mut self, policy: DestroyPolicy) -> Self {
        self.destroy_policy = policy;
        self
    }
}
