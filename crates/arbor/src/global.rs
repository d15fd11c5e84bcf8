//! # The Process-Wide World
//!
//! Most code should own a [`World`] and pass it around. For code written
//! against the classic "static game object" style, this module keeps one
//! default world per thread:
//!
//! - it is created with [`WorldConfig::default`] the first time it is touched;
//! - [`init`] replaces it with a fresh world built from a given config;
//! - [`shutdown`] destroys every object in it.
//!
//! Components are `Rc`, so the world cannot cross threads; each thread that
//! uses this module gets its own. Tests therefore never see each other's
//! objects.
//!
//! ```
//! use arbor::ecs::GameObject;
//!
//! let player = GameObject::new("player", "unit", 0);
//! assert_eq!(GameObject::find("player"), Some(player));
//!
//! GameObject::destroy(player).unwrap();
//! assert!(!player.is_valid());
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::WorldConfig;
use crate::ecs::{GameObject, World};
use crate::error::Result;

thread_local! {
    static WORLD: RefCell<World> = RefCell::new(World::new());
}

/// Replace this thread's world with a new one built from `config`. Objects in
/// the old world are destroyed first.
pub fn init(config: WorldConfig) {
    WORLD.with(|cell| {
        let mut world = cell.borrow_mut();
        world.clear();
        *world = World::with_config(config);
    });
    log::info!("process-wide world initialized");
}

/// Destroy every object in this thread's world. The world itself stays
/// usable with its current config.
pub fn shutdown() {
    WORLD.with(|cell| cell.borrow_mut().clear());
    log::info!("process-wide world shut down");
}

/// Run `f` with shared access to this thread's world.
///
/// # Panics
///
/// Panics if called from inside [`with_mut`] on the same thread (for example
/// from a [`Component::on_attach`](crate::ecs::Component::on_attach) hook).
pub fn with<R>(f: impl FnOnce(&World) -> R) -> R {
    WORLD.with(|cell| f(&cell.borrow()))
}

/// Run `f` with exclusive access to this thread's world.
///
/// # Panics
///
/// Panics if called from inside [`with`] or [`with_mut`] on the same thread.
pub fn with_mut<R>(f: impl FnOnce(&mut World) -> R) -> R {
    WORLD.with(|cell| f(&mut cell.borrow_mut()))
}

/// Shortcuts that go through the process-wide world.
impl GameObject {
    /// Construct a game object in the process-wide world.
    pub fn new(name: &str, tag: &str, layer: i32) -> GameObject {
        with_mut(|world| world.spawn(name, tag, layer))
    }

    /// Whether this handle refers to a live object in the process-wide world.
    pub fn is_valid(self) -> bool {
        with(|world| world.is_alive(self))
    }

    pub fn find(name: &str) -> Option<GameObject> {
        with(|world| world.find(name))
    }

    pub fn find_with_tag(tag: &str) -> Option<GameObject> {
        with(|world| world.find_with_tag(tag))
    }

    pub fn find_game_objects_with_tag(tag: &str) -> Vec<GameObject> {
        with(|world| world.find_game_objects_with_tag(tag))
    }

    pub fn find_object_of_type<T: ?Sized + 'static>(include_inactive: bool) -> Option<Rc<T>> {
        with(|world| world.find_object_of_type::<T>(include_inactive))
    }

    pub fn find_objects_of_type<T: ?Sized + 'static>(include_inactive: bool) -> Vec<Rc<T>> {
        with(|world| world.find_objects_of_type::<T>(include_inactive))
    }

    /// Destroy `obj` in the process-wide world.
    pub fn destroy(obj: GameObject) -> Result<()> {
        with_mut(|world| world.destroy(obj))
    }

    /// Detach `component` from whichever object in the process-wide world
    /// holds it.
    pub fn destroy_component<T: ?Sized>(component: &Rc<T>) -> Option<GameObject> {
        with_mut(|world| world.destroy_component(component))
    }
}
