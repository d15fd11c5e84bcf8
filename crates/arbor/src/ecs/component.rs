//! # Components: Type-Erased, Shared, Queried by Type
//!
//! A component is a piece of behavior or data attached to one
//! [`GameObject`]. The scene graph stores components it knows nothing about,
//! so each object keeps a [`ComponentList`] of `Rc<dyn Component>`.
//!
//! ## Why `Rc`?
//!
//! A component is shared between the object that owns it and any client code
//! that still holds the reference it attached (or got back from a query).
//! `Rc` gives that shared ownership. Components that need to change after
//! being attached use interior mutability (`Cell`, `RefCell`) for their state.
//!
//! ## Typed queries
//!
//! A query asks for `T` and gets back `Rc<T>`. A component matches when:
//!
//! - its concrete type is `T`, or
//! - `T` is `dyn Component` (every component matches), or
//! - the component exposes `T` as a *capability* through
//!   [`Component::cast_capability`].
//!
//! Capabilities are trait objects. The [`capabilities!`](crate::capabilities)
//! macro writes the cast for you:
//!
//! ```
//! use std::any::{Any, TypeId};
//! use std::rc::Rc;
//! use arbor::capabilities;
//! use arbor::ecs::Component;
//!
//! trait Damageable {
//!     fn health(&self) -> u32;
//! }
//!
//! struct Crate;
//!
//! impl Damageable for Crate {
//!     fn health(&self) -> u32 { 10 }
//! }
//!
//! impl Component for Crate {
//!     fn cast_capability(self: Rc<Self>, capability: TypeId) -> Option<Box<dyn Any>> {
//!         capabilities!(self, capability => dyn Damageable)
//!     }
//! }
//! ```

use std::any::{Any, TypeId};
use std::cell::Cell;
use std::rc::Rc;

use super::entity::GameObject;

/// Type-erasure helpers every [`Component`] gets for free.
///
/// Implemented for all `'static` sized types; never implement it by hand.
pub trait ErasedComponent: Any {
    /// `TypeId` of the concrete component type.
    fn concrete_type_id(&self) -> TypeId;
    /// Fully-qualified name of the concrete component type.
    fn concrete_type_name(&self) -> &'static str;
    /// Box this `Rc` (as `Rc<Self>`) so it can be downcast by concrete type.
    fn into_any_rc(self: Rc<Self>) -> Box<dyn Any>;
}

impl<T: Any> ErasedComponent for T {
    fn concrete_type_id(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn concrete_type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn into_any_rc(self: Rc<Self>) -> Box<dyn Any> {
        Box::new(self)
    }
}

/// A piece of behavior or data attached to a [`GameObject`].
///
/// All methods have defaults, so a plain marker is a valid component:
///
/// ```
/// struct Player;
/// impl arbor::ecs::Component for Player {}
/// ```
pub trait Component: ErasedComponent {
    /// Called right after the component is attached to `owner`.
    fn on_attach(&self, _owner: GameObject) {}

    /// Called right after the component is removed from `owner`, either
    /// explicitly or because `owner` was destroyed.
    fn on_detach(&self, _owner: GameObject) {}

    /// Expose this component as the capability identified by `capability`.
    ///
    /// Return `Some(Box<Rc<dyn Capability>>)` when the component implements
    /// the capability trait, `None` otherwise. Use
    /// [`capabilities!`](crate::capabilities) rather than writing this by hand.
    fn cast_capability(self: Rc<Self>, _capability: TypeId) -> Option<Box<dyn Any>> {
        None
    }
}

/// Implements the body of [`Component::cast_capability`] for a list of
/// capability trait objects.
///
/// ```ignore
/// fn cast_capability(self: Rc<Self>, capability: TypeId) -> Option<Box<dyn Any>> {
///     capabilities!(self, capability => dyn Damageable, dyn Interactable)
/// }
/// ```
#[macro_export]
macro_rules! capabilities {
    ($this:expr, $capability:expr => $($cap:ty),+ $(,)?) => {{
        let this = $this;
        let capability: ::std::any::TypeId = $capability;
        $(
            if capability == ::std::any::TypeId::of::<$cap>() {
                let cast: ::std::rc::Rc<$cap> = this;
                ::std::option::Option::Some(
                    ::std::boxed::Box::new(cast) as ::std::boxed::Box<dyn ::std::any::Any>
                )
            } else
        )+
        {
            ::std::option::Option::None
        }
    }};
}

/// Convenience cell a component can embed to remember its owner.
///
/// ```
/// use arbor::ecs::{Component, GameObject, Owner};
///
/// #[derive(Default)]
/// struct Health {
///     owner: Owner,
/// }
///
/// impl Component for Health {
///     fn on_attach(&self, owner: GameObject) {
///         self.owner.set(Some(owner));
///     }
///     fn on_detach(&self, _owner: GameObject) {
///         self.owner.set(None);
///     }
/// }
/// ```
#[derive(Debug, Default)]
pub struct Owner(Cell<Option<GameObject>>);

impl Owner {
    pub fn get(&self) -> Option<GameObject> {
        self.0.get()
    }

    pub fn set(&self, owner: Option<GameObject>) {
        self.0.set(owner);
    }
}

/// Try to view `component` as `T`.
pub(crate) fn cast_component<T: ?Sized + 'static>(component: &Rc<dyn Component>) -> Option<Rc<T>> {
    let wanted = TypeId::of::<T>();
    let erased: Box<dyn Any> = if wanted == TypeId::of::<dyn Component>() {
        Box::new(Rc::clone(component))
    } else if wanted == (**component).concrete_type_id() {
        Rc::clone(component).into_any_rc()
    } else {
        Rc::clone(component).cast_capability(wanted)?
    };
    erased.downcast::<Rc<T>>().ok().map(|rc| *rc)
}

/// Address of the shared allocation behind `rc`, ignoring any vtable.
///
/// A concrete `Rc<Health>` and an `Rc<dyn Damageable>` obtained from it
/// compare equal.
pub(crate) fn allocation_addr<T: ?Sized>(rc: &Rc<T>) -> *const () {
    Rc::as_ptr(rc) as *const ()
}

/// The components of one game object, in attach order.
#[derive(Default)]
pub(crate) struct ComponentList {
    items: Vec<Rc<dyn Component>>,
}

impl ComponentList {
    pub fn push(&mut self, component: Rc<dyn Component>) {
        self.items.push(component);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rc<dyn Component>> {
        self.items.iter()
    }

    /// Whether this exact allocation is in the list.
    pub fn contains_addr(&self, addr: *const ()) -> bool {
        self.position_of(addr).is_some()
    }

    /// Remove the component with this allocation address, keeping the order
    /// of the others.
    pub fn remove_addr(&mut self, addr: *const ()) -> Option<Rc<dyn Component>> {
        let index = self.position_of(addr)?;
        Some(self.items.remove(index))
    }

    /// Take every component out, leaving the list empty.
    pub fn take_all(&mut self) -> Vec<Rc<dyn Component>> {
        std::mem::take(&mut self.items)
    }

    /// First component that matches `T`.
    pub fn first<T: ?Sized + 'static>(&self) -> Option<Rc<T>> {
        self.items.iter().find_map(cast_component::<T>)
    }

    /// Every component that matches `T`, in attach order.
    pub fn all<T: ?Sized + 'static>(&self) -> impl Iterator<Item = Rc<T>> + '_ {
        self.items.iter().filter_map(cast_component::<T>)
    }

    fn position_of(&self, addr: *const ()) -> Option<usize> {
        self.items.iter().position(|c| allocation_addr(c) == addr)
    }
}
