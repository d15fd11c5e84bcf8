//! # Typed Component Queries
//!
//! Every query takes a type parameter `T` and returns `Rc<T>`. `T` may be a
//! concrete component type, `dyn Component`, or a capability trait object the
//! component exposes (see [`component`](super::component)).
//!
//! | Query                         | Searches                                   |
//! |-------------------------------|--------------------------------------------|
//! | `get_component(s)`            | the object itself                          |
//! | `get_component(s)_in_children`| each child's subtree, depth-first pre-order|
//! | `get_component(s)_in_parent`  | the direct parent only                     |
//! | `find_object(s)_of_type`      | every live object, construction order      |
//!
//! Within one object, components are visited in attach order.

use std::rc::Rc;

use super::entity::GameObject;
use super::world::World;

impl World {
    /// First component on `obj` that matches `T`.
    pub fn get_component<T: ?Sized + 'static>(&self, obj: GameObject) -> Option<Rc<T>> {
        self.record(obj)?.components.first::<T>()
    }

    /// Every component on `obj` that matches `T`, in attach order.
    pub fn get_components<T: ?Sized + 'static>(&self, obj: GameObject) -> Vec<Rc<T>> {
        self.record(obj)
            .map(|r| r.components.all::<T>().collect())
            .unwrap_or_default()
    }

    /// First match in the subtrees below `obj`. The object itself is not
    /// searched.
    pub fn get_component_in_children<T: ?Sized + 'static>(&self, obj: GameObject) -> Option<Rc<T>> {
        self.descendants(obj)
            .into_iter()
            .find_map(|d| self.get_component::<T>(d))
    }

    /// Every match in the subtrees below `obj`, depth-first pre-order.
    pub fn get_components_in_children<T: ?Sized + 'static>(&self, obj: GameObject) -> Vec<Rc<T>> {
        self.descendants(obj)
            .into_iter()
            .flat_map(|d| self.get_components::<T>(d))
            .collect()
    }

    /// First match on the direct parent of `obj`. Grandparents are not
    /// searched.
    pub fn get_component_in_parent<T: ?Sized + 'static>(&self, obj: GameObject) -> Option<Rc<T>> {
        self.get_component::<T>(self.parent(obj)?)
    }

    /// Every match on the direct parent of `obj`.
    pub fn get_components_in_parent<T: ?Sized + 'static>(&self, obj: GameObject) -> Vec<Rc<T>> {
        self.parent(obj)
            .map(|p| self.get_components::<T>(p))
            .unwrap_or_default()
    }

    /// First component of type `T` on any live object.
    ///
    /// Objects that are inactive in the world are skipped unless
    /// `include_inactive` is set.
    pub fn find_object_of_type<T: ?Sized + 'static>(&self, include_inactive: bool) -> Option<Rc<T>> {
        self.iter()
            .filter(|&obj| include_inactive || self.is_active_in_world(obj))
            .find_map(|obj| self.get_component::<T>(obj))
    }

    /// Every component of type `T` on any live object, in construction order
    /// of their owners.
    pub fn find_objects_of_type<T: ?Sized + 'static>(&self, include_inactive: bool) -> Vec<Rc<T>> {
        self.iter()
            .filter(|&obj| include_inactive || self.is_active_in_world(obj))
            .flat_map(|obj| self.get_components::<T>(obj))
            .collect()
    }
}
