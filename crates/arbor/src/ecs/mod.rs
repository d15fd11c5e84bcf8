//! # Game Objects, Components, and the World
//!
//! A small scene graph in the style of classic game-object frameworks: named,
//! tagged objects arranged in a tree, each carrying a list of components.
//!
//! ## Module Overview
//!
//! - [`entity`]: generational [`GameObject`] handles
//! - [`component`]: the [`Component`] trait, type erasure, capability casts
//! - [`world`]: the [`World`] registry (spawn, destroy, name/tag lookup)
//! - [`hierarchy`]: parent/child links and activity propagation
//! - [`query`]: typed component queries on objects, subtrees, and the world

pub mod component;
pub mod entity;
pub mod hierarchy;
pub mod query;
pub mod world;

pub use component::{Component, ErasedComponent, Owner};
pub use entity::GameObject;
pub use hierarchy::Ancestors;
pub use world::World;
