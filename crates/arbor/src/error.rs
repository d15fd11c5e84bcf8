//! Error types for scene-graph operations.
//!
//! Lookups never fail: a miss is `None` or an empty `Vec`. Only operations that
//! would corrupt the registry or the hierarchy report a [`SceneError`].

use thiserror::Error;

use crate::ecs::GameObject;

pub type Result<T> = std::result::Result<T, SceneError>;

#[derive(Error, Debug)]
pub enum SceneError {
    /// The handle does not refer to a registered game object. It was either
    /// destroyed already or never belonged to this world.
    #[error("game object {0} is not registered in this world")]
    InvalidGameObject(GameObject),

    /// Attaching `child` under `parent` would make `child` its own ancestor.
    #[error("cannot parent {child} under {parent}: {child} is {parent} or one of its ancestors")]
    HierarchyCycle {
        parent: GameObject,
        child: GameObject,
    },

    /// The component instance is already attached to a game object.
    #[error("component is already attached to game object {owner}")]
    ComponentAlreadyAttached { owner: GameObject },

    #[error("failed to read config file '{0}': {1}")]
    Io(String, #[source] std::io::Error),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}
