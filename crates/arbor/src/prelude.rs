//! Convenience re-exports — `use arbor::prelude::*` for the common items.

pub use crate::capabilities;
pub use crate::config::{DestroyPolicy, WorldConfig};
pub use crate::ecs::{Component, GameObject, Owner, World};
pub use crate::error::SceneError;
pub use crate::math::{Quat, Transform, Vec3};
#[cfg(feature = "diagnostics")]
pub use crate::diag::{WorldStats, format_hierarchy};
