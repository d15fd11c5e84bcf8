//! # GameObject Handles
//!
//! A [`GameObject`] is a small copyable handle. The
//! [`World`](super::world::World) owns the object's name, tag, transform,
//! components, and hierarchy links; the handle only says *which* object, in
//! *which* world.
//!
//! ## What a handle carries
//!
//! ```text
//! GameObject { world: 3, index: 5, generation: 1 }
//!              │         │         └ bumped every time slot 5 is vacated
//!              │         └ slot in the world's ObjectSlots
//!              └ id stamped on every World when it is created
//! ```
//!
//! Destroyed slots are recycled, so the generation tells an old occupant from
//! a new one. The world id keeps handles from resolving anywhere except the
//! world that issued them, including a world that replaced it (see
//! [`global::init`](crate::global::init)).
//!
//! This is what makes the parent link a *weak* reference: a child keeps its
//! parent's handle, and once the parent is destroyed that handle simply stops
//! resolving. Equality is identity: two objects with the same name are still
//! different handles.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_WORLD_ID: AtomicU32 = AtomicU32::new(1);

/// Identity of a game object registered in a [`World`](super::world::World).
///
/// Created by [`World::spawn`](super::world::World::spawn) and invalidated by
/// [`World::destroy`](super::world::World::destroy). Use
/// [`World::is_alive`](super::world::World::is_alive) to check validity and
/// `Option<GameObject>` where a reference may be absent.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameObject {
    pub(crate) world: u32,
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl GameObject {
    /// Id of the world that issued this handle.
    pub fn world_id(self) -> u32 {
        self.world
    }

    /// Raw slot index. Recycled after the object is destroyed.
    pub fn index(self) -> u32 {
        self.index
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for GameObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GameObject({}v{}@w{})",
            self.index, self.generation, self.world
        )
    }
}

impl fmt::Display for GameObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

struct Slot<T> {
    /// Generation of the current occupant, or of the next one when vacant.
    generation: u32,
    value: Option<T>,
}

/// Per-object storage of one world, addressed by [`GameObject`] handles.
///
/// Issuing a handle and storing the object's data are the same step, so a
/// handle is alive exactly when its slot is occupied by its generation.
///
/// ```text
/// world:   3
/// slots:   [ (g0, Some) (g1, None) (g0, Some) (g2, None) ]
/// vacant:  [1, 3]        reused last-in first-out
/// ```
pub(crate) struct ObjectSlots<T> {
    world: u32,
    slots: Vec<Slot<T>>,
    vacant: Vec<u32>,
    occupied: usize,
}

impl<T> ObjectSlots<T> {
    /// Empty storage with a fresh world id.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            world: NEXT_WORLD_ID.fetch_add(1, Ordering::Relaxed),
            slots: Vec::with_capacity(capacity),
            vacant: Vec::new(),
            occupied: 0,
        }
    }

    pub fn world_id(&self) -> u32 {
        self.world
    }

    /// Store `value` and return the handle that addresses it.
    pub fn insert(&mut self, value: T) -> GameObject {
        self.occupied += 1;
        if let Some(index) = self.vacant.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            return GameObject {
                world: self.world,
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            value: Some(value),
        });
        GameObject {
            world: self.world,
            index,
            generation: 0,
        }
    }

    fn slot(&self, obj: GameObject) -> Option<&Slot<T>> {
        if obj.world != self.world {
            return None;
        }
        self.slots
            .get(obj.index as usize)
            .filter(|slot| slot.generation == obj.generation)
    }

    pub fn contains(&self, obj: GameObject) -> bool {
        self.get(obj).is_some()
    }

    pub fn get(&self, obj: GameObject) -> Option<&T> {
        self.slot(obj)?.value.as_ref()
    }

    pub fn get_mut(&mut self, obj: GameObject) -> Option<&mut T> {
        if obj.world != self.world {
            return None;
        }
        self.slots
            .get_mut(obj.index as usize)
            .filter(|slot| slot.generation == obj.generation)?
            .value
            .as_mut()
    }

    /// Vacate the slot behind `obj`, returning its data. `None` if the handle
    /// is stale or foreign, in which case nothing changes.
    pub fn remove(&mut self, obj: GameObject) -> Option<T> {
        if obj.world != self.world {
            return None;
        }
        let slot = self
            .slots
            .get_mut(obj.index as usize)
            .filter(|slot| slot.generation == obj.generation)?;
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.vacant.push(obj.index);
        self.occupied -= 1;
        Some(value)
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.occupied
    }

    #[cfg(any(feature = "diagnostics", test))]
    pub fn vacant_count(&self) -> usize {
        self.vacant.len()
    }

    #[cfg(any(feature = "diagnostics", test))]
    pub fn total_slots(&self) -> u32 {
        self.slots.len() as u32
    }
}
