//! # Game Object Hierarchies: Parent/Child Relationships
//!
//! Each game object has at most one parent and an ordered list of children.
//! Both sides of the link are updated together: there is no way to set a
//! parent without also listing the child under it, and no way to create a
//! cycle.
//!
//! ## Usage
//!
//! ```
//! use arbor::ecs::World;
//!
//! let mut world = World::new();
//! let ship = world.spawn("ship", "vehicle", 0);
//! let turret = world.spawn_child(ship, "turret", "weapon", 0).unwrap();
//!
//! assert_eq!(world.parent(turret), Some(ship));
//! assert_eq!(world.children(ship), &[turret]);
//!
//! world.set_active(ship, false).unwrap();
//! assert!(world.is_active_self(turret));
//! assert!(!world.is_active_in_world(turret));
//! ```
//!
//! The parent link is a handle, so it does not keep the parent alive. If the
//! parent goes away the link stops resolving and the child is treated as a
//! root.

use super::entity::GameObject;
use super::world::World;
use crate::error::{Result, SceneError};

/// Iterator over an object's ancestors, nearest first. Created by
/// [`World::ancestors`].
pub struct Ancestors<'w> {
    world: &'w World,
    next: Option<GameObject>,
}

impl Iterator for Ancestors<'_> {
    type Item = GameObject;

    fn next(&mut self) -> Option<GameObject> {
        let current = self.next?;
        self.next = self.world.parent(current);
        Some(current)
    }
}

impl World {
    /// The parent of `obj`, or `None` for a root, a dead handle, or a parent
    /// that no longer exists.
    pub fn parent(&self, obj: GameObject) -> Option<GameObject> {
        self.record(obj)?
            .parent
            .filter(|&parent| self.is_alive(parent))
    }

    /// The children of `obj` in the order they were added. Empty for a dead
    /// handle.
    pub fn children(&self, obj: GameObject) -> &[GameObject] {
        self.record(obj).map(|r| r.children.as_slice()).unwrap_or(&[])
    }

    /// Ancestors of `obj`, nearest first. Stops at the first parent link that
    /// does not resolve.
    pub fn ancestors(&self, obj: GameObject) -> Ancestors<'_> {
        Ancestors {
            world: self,
            next: self.parent(obj),
        }
    }

    /// Every object below `obj`, depth-first pre-order (a child, then its
    /// subtree, then the next child). Does not include `obj` itself.
    pub fn descendants(&self, obj: GameObject) -> Vec<GameObject> {
        let mut result = Vec::new();
        let mut stack: Vec<GameObject> = self.children(obj).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            result.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        result
    }

    /// Whether `ancestor` appears on the parent chain of `obj`.
    pub fn is_ancestor_of(&self, ancestor: GameObject, obj: GameObject) -> bool {
        self.ancestors(obj).any(|a| a == ancestor)
    }

    /// Whether `obj` is active once its ancestors are taken into account: its
    /// own flag is set and every resolvable ancestor's flag is set too.
    pub fn is_active_in_world(&self, obj: GameObject) -> bool {
        self.is_active_self(obj) && self.ancestors(obj).all(|a| self.is_active_self(a))
    }

    /// Make `child` the last child of `parent`, detaching it from its previous
    /// parent first.
    ///
    /// Adding a child that is already under `parent` leaves it where it is.
    /// Fails with [`SceneError::HierarchyCycle`] when `child` is `parent` or
    /// one of its ancestors.
    pub fn add_child(&mut self, parent: GameObject, child: GameObject) -> Result<()> {
        for obj in [parent, child] {
            if !self.is_alive(obj) {
                return Err(SceneError::InvalidGameObject(obj));
            }
        }
        if child == parent || self.is_ancestor_of(child, parent) {
            return Err(SceneError::HierarchyCycle { parent, child });
        }

        match self.parent(child) {
            Some(current) if current == parent => return Ok(()),
            Some(previous) => {
                self.remove_child(previous, child);
            }
            None => {}
        }

        self.expect_record_mut(parent)?.children.push(child);
        self.expect_record_mut(child)?.parent = Some(parent);
        log::trace!("parented {child} under {parent}");
        Ok(())
    }

    /// Remove `child` from `parent`'s children and clear its parent link.
    ///
    /// Returns `false`, changing nothing, when `child` is not a child of
    /// `parent`.
    pub fn remove_child(&mut self, parent: GameObject, child: GameObject) -> bool {
        let Some(record) = self.record_mut(parent) else {
            return false;
        };
        let Some(pos) = record.children.iter().position(|&c| c == child) else {
            return false;
        };
        record.children.remove(pos);

        if let Some(child_record) = self.record_mut(child) {
            if child_record.parent == Some(parent) {
                child_record.parent = None;
            }
        }
        log::trace!("unparented {child} from {parent}");
        true
    }

    /// Reparent `child` in one step. `Some(parent)` behaves like
    /// [`add_child`](Self::add_child); `None` makes `child` a root.
    pub fn set_parent(&mut self, child: GameObject, parent: Option<GameObject>) -> Result<()> {
        match parent {
            Some(parent) => self.add_child(parent, child),
            None => {
                if !self.is_alive(child) {
                    return Err(SceneError::InvalidGameObject(child));
                }
                if let Some(previous) = self.parent(child) {
                    self.remove_child(previous, child);
                }
                Ok(())
            }
        }
    }

    /// Spawn a game object directly under `parent`.
    ///
    /// Fails without spawning anything if `parent` is not alive.
    pub fn spawn_child(
        &mut self,
        parent: GameObject,
        name: &str,
        tag: &str,
        layer: i32,
    ) -> Result<GameObject> {
        if !self.is_alive(parent) {
            return Err(SceneError::InvalidGameObject(parent));
        }
        let child = self.spawn(name, tag, layer);
        self.add_child(parent, child)?;
        Ok(child)
    }
}
