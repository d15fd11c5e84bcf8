//! # Arbor — Game Object Scene Graph
//!
//! Named, tagged game objects arranged in a parent/child tree, each carrying
//! a list of shared components that can be queried by concrete type or by a
//! capability trait they expose.
//!
//! Start with `use arbor::prelude::*`, create a [`World`](ecs::World), and
//! spawn objects into it. The [`global`] module offers a per-thread default
//! world for code that prefers `GameObject::find("player")` style lookups.

pub mod config;
pub mod ecs;
pub mod error;
pub mod global;
pub mod math;
pub mod prelude;

#[cfg(feature = "diagnostics")]
pub mod diag;
