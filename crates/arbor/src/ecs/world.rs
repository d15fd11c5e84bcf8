//! # World: The Registry of Live Game Objects
//!
//! The [`World`] owns every game object's data and is the single source of
//! truth for which objects exist.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ World                                                    │
//! │                                                          │
//! │  objects: ObjectSlots<GameObjectRecord>                  │
//! │    handle → name, tag, layer, active, transform,         │
//! │             parent, children, components                 │
//! │    (issues and retires the handles too)                  │
//! │                                                          │
//! │  order: Vec<GameObject>                                  │
//! │    live handles in construction order; every lookup      │
//! │    walks this, so "first match" is deterministic         │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Client code holds [`GameObject`] handles, never references into the
//! world, so destroying an object cannot leave anything dangling: stale
//! handles just stop resolving.
//!
//! Hierarchy operations live in [`hierarchy`](super::hierarchy) and typed
//! component queries in [`query`](super::query); both extend `World`.

use std::rc::Rc;

use super::component::{allocation_addr, Component, ComponentList, ErasedComponent};
use super::entity::{GameObject, ObjectSlots};
use crate::config::{DestroyPolicy, WorldConfig};
use crate::error::{Result, SceneError};
use crate::math::Transform;

/// Everything the world knows about one game object.
pub(crate) struct GameObjectRecord {
    pub name: String,
    pub tag: String,
    pub layer: i32,
    pub active: bool,
    pub transform: Transform,
    /// Non-owning link. May refer to a destroyed object; resolve through
    /// [`World::parent`].
    pub parent: Option<GameObject>,
    pub children: Vec<GameObject>,
    pub components: ComponentList,
}

impl GameObjectRecord {
    fn new(name: &str, tag: &str, layer: i32) -> Self {
        Self {
            name: name.to_string(),
            tag: tag.to_string(),
            layer,
            active: true,
            transform: Transform::default(),
            parent: None,
            children: Vec::new(),
            components: ComponentList::default(),
        }
    }
}

/// The registry of all live game objects.
pub struct World {
    config: WorldConfig,
    objects: ObjectSlots<GameObjectRecord>,
    /// Live handles in construction order.
    order: Vec<GameObject>,
    #[cfg(feature = "diagnostics")]
    pub(crate) spawned_this_frame: u32,
    #[cfg(feature = "diagnostics")]
    pub(crate) destroyed_this_frame: u32,
}

impl World {
    pub fn new() -> Self {
        Self::with_config(WorldConfig::default())
    }

    pub fn with_config(config: WorldConfig) -> Self {
        let capacity = config.initial_capacity;
        Self {
            config,
            objects: ObjectSlots::with_capacity(capacity),
            order: Vec::with_capacity(capacity),
            #[cfg(feature = "diagnostics")]
            spawned_this_frame: 0,
            #[cfg(feature = "diagnostics")]
            destroyed_this_frame: 0,
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    // ── Record access ────────────────────────────────────────────────

    pub(crate) fn record(&self, obj: GameObject) -> Option<&GameObjectRecord> {
        self.objects.get(obj)
    }

    pub(crate) fn record_mut(&mut self, obj: GameObject) -> Option<&mut GameObjectRecord> {
        self.objects.get_mut(obj)
    }

    /// Like [`record_mut`](Self::record_mut), but a dead handle is an error.
    pub(crate) fn expect_record_mut(&mut self, obj: GameObject) -> Result<&mut GameObjectRecord> {
        self.record_mut(obj).ok_or(SceneError::InvalidGameObject(obj))
    }

    // ── Spawn ────────────────────────────────────────────────────────

    /// Construct a game object and register it. New objects are active, have
    /// an identity transform, no parent, no children, and no components.
    pub fn spawn(&mut self, name: &str, tag: &str, layer: i32) -> GameObject {
        let obj = self.objects.insert(GameObjectRecord::new(name, tag, layer));
        self.order.push(obj);
        #[cfg(feature = "diagnostics")]
        {
            self.spawned_this_frame += 1;
        }
        log::debug!("spawned {obj} \"{name}\" (tag \"{tag}\", layer {layer})");
        obj
    }

    // ── Identity & attributes ────────────────────────────────────────

    /// Whether `obj` refers to a game object registered in this world. False
    /// for destroyed handles and for handles issued by another world.
    pub fn is_alive(&self, obj: GameObject) -> bool {
        self.objects.contains(obj)
    }

    /// Id stamped on every handle this world issues.
    pub fn id(&self) -> u32 {
        self.objects.world_id()
    }

    /// Number of live game objects.
    pub fn entity_count(&self) -> usize {
        self.objects.len()
    }

    /// Live game objects in construction order.
    pub fn iter(&self) -> impl Iterator<Item = GameObject> + '_ {
        self.order.iter().copied()
    }

    pub fn name(&self, obj: GameObject) -> Option<&str> {
        self.record(obj).map(|r| r.name.as_str())
    }

    pub fn tag(&self, obj: GameObject) -> Option<&str> {
        self.record(obj).map(|r| r.tag.as_str())
    }

    pub fn layer(&self, obj: GameObject) -> Option<i32> {
        self.record(obj).map(|r| r.layer)
    }

    pub fn set_name(&mut self, obj: GameObject, name: &str) -> Result<()> {
        self.expect_record_mut(obj)?.name = name.to_string();
        Ok(())
    }

    pub fn set_tag(&mut self, obj: GameObject, tag: &str) -> Result<()> {
        self.expect_record_mut(obj)?.tag = tag.to_string();
        Ok(())
    }

    pub fn set_layer(&mut self, obj: GameObject, layer: i32) -> Result<()> {
        self.expect_record_mut(obj)?.layer = layer;
        Ok(())
    }

    /// Set the object's own active flag. Descendants are affected through
    /// [`is_active_in_world`](Self::is_active_in_world).
    pub fn set_active(&mut self, obj: GameObject, active: bool) -> Result<()> {
        self.expect_record_mut(obj)?.active = active;
        Ok(())
    }

    /// The object's own active flag, ignoring its ancestors. `false` for a
    /// dead handle.
    pub fn is_active_self(&self, obj: GameObject) -> bool {
        self.record(obj).is_some_and(|r| r.active)
    }

    pub fn transform(&self, obj: GameObject) -> Option<&Transform> {
        self.record(obj).map(|r| &r.transform)
    }

    pub fn transform_mut(&mut self, obj: GameObject) -> Option<&mut Transform> {
        self.record_mut(obj).map(|r| &mut r.transform)
    }

    // ── Lookup ───────────────────────────────────────────────────────

    /// First live object (construction order) with the given name.
    pub fn find(&self, name: &str) -> Option<GameObject> {
        self.iter().find(|&obj| self.name(obj) == Some(name))
    }

    /// First live object (construction order) with the given tag.
    pub fn find_with_tag(&self, tag: &str) -> Option<GameObject> {
        self.iter().find(|&obj| self.tag(obj) == Some(tag))
    }

    /// Every live object with the given tag, in construction order.
    pub fn find_game_objects_with_tag(&self, tag: &str) -> Vec<GameObject> {
        self.iter().filter(|&obj| self.tag(obj) == Some(tag)).collect()
    }

    // ── Components ───────────────────────────────────────────────────

    /// Attach `component` to `obj` and notify it with
    /// [`Component::on_attach`].
    ///
    /// Several components of the same type may be attached to one object, but
    /// one component instance belongs to at most one object.
    pub fn add_component<T: Component>(&mut self, obj: GameObject, component: Rc<T>) -> Result<()> {
        if !self.is_alive(obj) {
            return Err(SceneError::InvalidGameObject(obj));
        }
        if let Some(owner) = self.owner_of(&component) {
            return Err(SceneError::ComponentAlreadyAttached { owner });
        }

        let erased: Rc<dyn Component> = component;
        self.expect_record_mut(obj)?.components.push(Rc::clone(&erased));
        log::debug!(
            "attached {} to {obj}",
            short_type_name((*erased).concrete_type_name())
        );
        erased.on_attach(obj);
        Ok(())
    }

    /// The object that currently holds this component instance, if any.
    ///
    /// Matches by allocation, so a capability reference (`Rc<dyn Trait>`)
    /// obtained from a query finds the same owner as the concrete `Rc`.
    pub fn owner_of<T: ?Sized>(&self, component: &Rc<T>) -> Option<GameObject> {
        let addr = allocation_addr(component);
        self.iter().find(|&obj| {
            self.record(obj)
                .is_some_and(|r| r.components.contains_addr(addr))
        })
    }

    /// Number of components attached to `obj`. Zero for a dead handle.
    pub fn component_count(&self, obj: GameObject) -> usize {
        self.record(obj).map_or(0, |r| r.components.len())
    }

    /// Detach a component from whichever object holds it.
    ///
    /// Scans every live object for this exact instance. Returns the former
    /// owner, or `None` when no object holds it.
    pub fn destroy_component<T: ?Sized>(&mut self, component: &Rc<T>) -> Option<GameObject> {
        let Some(owner) = self.owner_of(component) else {
            log::warn!("destroy_component: component is not attached to any game object");
            return None;
        };
        let addr = allocation_addr(component);
        let removed = self.record_mut(owner)?.components.remove_addr(addr)?;
        log::debug!(
            "detached {} from {owner}",
            short_type_name((*removed).concrete_type_name())
        );
        removed.on_detach(owner);
        Some(owner)
    }

    // ── Destroy ──────────────────────────────────────────────────────

    /// Destroy a game object.
    ///
    /// With [`DestroyPolicy::Recursive`] the whole subtree goes with it; with
    /// [`DestroyPolicy::Orphan`] its children become root objects. Either way
    /// the object is unlinked from its parent, its components are detached
    /// (each gets [`Component::on_detach`]), and no lookup returns it again.
    ///
    /// Fails with [`SceneError::InvalidGameObject`] if `obj` is not a
    /// registered object, including when it was already destroyed.
    pub fn destroy(&mut self, obj: GameObject) -> Result<()> {
        if !self.is_alive(obj) {
            return Err(SceneError::InvalidGameObject(obj));
        }

        if let Some(parent) = self.parent(obj) {
            if let Some(record) = self.record_mut(parent) {
                record.children.retain(|&c| c != obj);
            }
        }

        match self.config.destroy_policy {
            DestroyPolicy::Recursive => {
                let mut doomed = vec![obj];
                doomed.extend(self.descendants(obj));
                log::debug!("destroying {obj} and {} descendant(s)", doomed.len() - 1);
                for victim in doomed {
                    self.release(victim);
                }
                self.forget_released();
            }
            DestroyPolicy::Orphan => {
                let children = self
                    .record(obj)
                    .map(|r| r.children.clone())
                    .unwrap_or_default();
                for child in children {
                    if let Some(record) = self.record_mut(child) {
                        record.parent = None;
                    }
                }
                log::debug!("destroying {obj}, orphaning its children");
                self.release(obj);
                self.forget_released();
            }
        }
        Ok(())
    }

    /// Destroy every game object.
    pub fn clear(&mut self) {
        for obj in std::mem::take(&mut self.order) {
            self.release(obj);
        }
    }

    /// Drop one object's record and retire its handle. Leaves the parent's
    /// child list and `order` alone; callers unlink first and call
    /// [`forget_released`](Self::forget_released) once afterwards.
    fn release(&mut self, obj: GameObject) {
        let Some(mut record) = self.objects.remove(obj) else {
            return;
        };
        for component in record.components.take_all() {
            component.on_detach(obj);
        }
        #[cfg(feature = "diagnostics")]
        {
            self.destroyed_this_frame += 1;
        }
    }

    /// Drop released handles from `order` in a single pass.
    fn forget_released(&mut self) {
        let objects = &self.objects;
        self.order.retain(|&o| objects.contains(o));
    }

    #[cfg(feature = "diagnostics")]
    pub(crate) fn slots(&self) -> &ObjectSlots<GameObjectRecord> {
        &self.objects
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip the module path from a fully-qualified type name, keeping only the
/// short name (e.g. `game::combat::Health` → `Health`).
pub(crate) fn short_type_name(full: &str) -> &str {
    full.rsplit("::").next().unwrap_or(full)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use crate::ecs::component::Owner;

    struct Health(u32);
    impl Component for Health {}

    struct Marker;
    impl Component for Marker {}

    #[derive(Default)]
    struct Tracked {
        owner: Owner,
        detached: Cell<u32>,
    }

    impl Component for Tracked {
        fn on_attach(&self, owner: GameObject) {
            self.owner.set(Some(owner));
        }

        fn on_detach(&self, _owner: GameObject) {
            self.owner.set(None);
            self.detached.set(self.detached.get() + 1);
        }
    }

    #[test]
    fn spawn_registers_object() {
        let mut world = World::new();
        let e = world.spawn("player", "unit", 3);

        assert!(world.is_alive(e));
        assert_eq!(world.entity_count(), 1);
        assert_eq!(world.name(e), Some("player"));
        assert_eq!(world.tag(e), Some("unit"));
        assert_eq!(world.layer(e), Some(3));
        assert!(world.is_active_self(e));
        assert_eq!(world.transform(e), Some(&Transform::IDENTITY));
    }

    #[test]
    fn equality_is_identity_not_attributes() {
        let mut world = World::new();
        let a = world.spawn("twin", "t", 0);
        let b = world.spawn("twin", "t", 0);
        assert_ne!(a, b);
        assert_eq!(a, world.find("twin").unwrap());
    }

    #[test]
    fn find_returns_first_in_construction_order() {
        let mut world = World::new();
        let first = world.spawn("dup", "", 0);
        let _second = world.spawn("dup", "", 0);
        assert_eq!(world.find("dup"), Some(first));
        assert_eq!(world.find("missing"), None);
    }

    #[test]
    fn find_stops_returning_destroyed_object() {
        let mut world = World::new();
        let e = world.spawn("ghost", "spooky", 0);
        assert_eq!(world.find("ghost"), Some(e));

        world.destroy(e).unwrap();
        assert_eq!(world.find("ghost"), None);
        assert_eq!(world.find_with_tag("spooky"), None);
        assert!(world.find_game_objects_with_tag("spooky").is_empty());
        assert!(!world.is_alive(e));
    }

    #[test]
    fn tag_lookup_returns_exactly_the_tagged_set() {
        let mut world = World::new();
        let a = world.spawn("a", "enemy", 0);
        let _b = world.spawn("b", "friend", 0);
        let c = world.spawn("c", "enemy", 0);

        assert_eq!(world.find_game_objects_with_tag("enemy"), vec![a, c]);
        assert_eq!(world.find_with_tag("enemy"), Some(a));
        assert!(world.find_game_objects_with_tag("nobody").is_empty());

        world.set_tag(a, "friend").unwrap();
        assert_eq!(world.find_game_objects_with_tag("enemy"), vec![c]);
    }

    #[test]
    fn destroying_twice_is_an_invalid_reference() {
        let mut world = World::new();
        let e = world.spawn("once", "", 0);
        world.destroy(e).unwrap();

        let err = world.destroy(e).unwrap_err();
        assert!(matches!(err, SceneError::InvalidGameObject(h) if h == e));
    }

    #[test]
    fn stale_handle_does_not_resolve_to_recycled_slot() {
        let mut world = World::new();
        let old = world.spawn("old", "", 0);
        world.destroy(old).unwrap();
        let new = world.spawn("new", "", 0);

        assert_eq!(new.index(), old.index());
        assert_eq!(world.name(old), None);
        assert_eq!(world.name(new), Some("new"));
        assert!(world.destroy(old).is_err());
        assert!(world.is_alive(new));
    }

    #[test]
    fn handles_from_another_world_never_resolve() {
        let mut home = World::new();
        let mut away = World::new();
        let ours = home.spawn("in_home", "", 0);
        let theirs = away.spawn("in_away", "", 0);
        assert_eq!(ours.index(), theirs.index());
        assert_ne!(ours, theirs);
        assert_ne!(home.id(), away.id());

        assert!(!away.is_alive(ours));
        assert_eq!(away.name(ours), None);
        assert!(matches!(away.set_name(ours, "hijacked"), Err(SceneError::InvalidGameObject(_))));
        assert!(matches!(away.destroy(ours), Err(SceneError::InvalidGameObject(_))));
        assert!(away.add_component(ours, Rc::new(Marker)).is_err());

        assert_eq!(away.name(theirs), Some("in_away"));
        assert_eq!(away.entity_count(), 1);
        assert_eq!(home.name(ours), Some("in_home"));
    }

    #[test]
    fn mutators_reject_dead_handles() {
        let mut world = World::new();
        let e = world.spawn("e", "", 0);
        world.destroy(e).unwrap();

        assert!(world.set_active(e, false).is_err());
        assert!(world.set_name(e, "x").is_err());
        assert!(world.set_layer(e, 1).is_err());
        assert!(world.transform_mut(e).is_none());
        assert!(!world.is_active_self(e));
    }

    #[test]
    fn transform_is_mutable_in_place() {
        let mut world = World::new();
        let e = world.spawn("e", "", 0);
        world.transform_mut(e).unwrap().translation.x = 4.0;
        assert_eq!(world.transform(e).unwrap().translation.x, 4.0);
    }

    #[test]
    fn add_component_notifies_owner() {
        let mut world = World::new();
        let e = world.spawn("e", "", 0);
        let tracked = Rc::new(Tracked::default());

        world.add_component(e, tracked.clone()).unwrap();
        assert_eq!(tracked.owner.get(), Some(e));
        assert_eq!(world.owner_of(&tracked), Some(e));
        assert_eq!(world.component_count(e), 1);
    }

    #[test]
    fn add_component_to_dead_object_fails() {
        let mut world = World::new();
        let e = world.spawn("e", "", 0);
        world.destroy(e).unwrap();
        let err = world.add_component(e, Rc::new(Marker)).unwrap_err();
        assert!(matches!(err, SceneError::InvalidGameObject(_)));
    }

    #[test]
    fn component_instance_belongs_to_one_object() {
        let mut world = World::new();
        let a = world.spawn("a", "", 0);
        let b = world.spawn("b", "", 0);
        let health = Rc::new(Health(10));

        world.add_component(a, health.clone()).unwrap();
        let err = world.add_component(b, health.clone()).unwrap_err();
        assert!(matches!(err, SceneError::ComponentAlreadyAttached { owner } if owner == a));
        let err = world.add_component(a, health).unwrap_err();
        assert!(matches!(err, SceneError::ComponentAlreadyAttached { .. }));
        assert_eq!(world.component_count(b), 0);
    }

    #[test]
    fn destroy_component_removes_only_that_instance() {
        let mut world = World::new();
        let e = world.spawn("e", "", 0);
        let first = Rc::new(Health(1));
        let second = Rc::new(Health(2));
        world.add_component(e, first.clone()).unwrap();
        world.add_component(e, second.clone()).unwrap();

        assert_eq!(world.destroy_component(&first), Some(e));
        let left: Vec<u32> = world.get_components::<Health>(e).iter().map(|h| h.0).collect();
        assert_eq!(left, vec![2]);
        assert_eq!(world.owner_of(&first), None);
    }

    #[test]
    fn destroy_component_reports_not_found() {
        let mut world = World::new();
        let _e = world.spawn("e", "", 0);
        let loose = Rc::new(Marker);
        assert_eq!(world.destroy_component(&loose), None);
    }

    #[test]
    fn destroy_component_notifies_detach() {
        let mut world = World::new();
        let e = world.spawn("e", "", 0);
        let tracked = Rc::new(Tracked::default());
        world.add_component(e, tracked.clone()).unwrap();

        world.destroy_component(&tracked);
        assert_eq!(tracked.owner.get(), None);
        assert_eq!(tracked.detached.get(), 1);
    }

    #[test]
    fn destroying_object_detaches_its_components() {
        let mut world = World::new();
        let e = world.spawn("e", "", 0);
        let tracked = Rc::new(Tracked::default());
        world.add_component(e, tracked.clone()).unwrap();

        world.destroy(e).unwrap();
        assert_eq!(tracked.detached.get(), 1);
        assert_eq!(Rc::strong_count(&tracked), 1);
    }

    #[test]
    fn clear_destroys_everything() {
        let mut world = World::new();
        let a = world.spawn("a", "", 0);
        let b = world.spawn("b", "", 0);
        world.add_child(a, b).unwrap();
        let tracked = Rc::new(Tracked::default());
        world.add_component(b, tracked.clone()).unwrap();

        world.clear();
        assert_eq!(world.entity_count(), 0);
        assert_eq!(world.iter().count(), 0);
        assert!(!world.is_alive(a));
        assert_eq!(tracked.detached.get(), 1);
    }

    #[test]
    fn clearing_many_objects_frees_every_slot() {
        let mut world = World::new();
        let handles: Vec<GameObject> = (0..20_000).map(|_| world.spawn("n", "", 0)).collect();

        world.clear();
        assert_eq!(world.entity_count(), 0);
        assert_eq!(world.iter().count(), 0);
        assert!(handles.iter().all(|&h| !world.is_alive(h)));

        let reused = world.spawn("again", "", 0);
        assert_eq!(world.iter().collect::<Vec<_>>(), vec![reused]);
    }

    #[test]
    fn destroying_large_subtree_keeps_construction_order_of_survivors() {
        let mut world = World::new();
        let before = world.spawn("before", "", 0);
        let root = world.spawn("root", "", 0);
        let mut tip = root;
        for _ in 0..5_000 {
            tip = world.spawn_child(tip, "link", "", 0).unwrap();
            world.spawn_child(root, "leaf", "", 0).unwrap();
        }
        let after = world.spawn("after", "", 0);

        world.destroy(root).unwrap();
        assert_eq!(world.iter().collect::<Vec<_>>(), vec![before, after]);
        assert_eq!(world.entity_count(), 2);
        assert!(!world.is_alive(tip));
    }

    #[test]
    fn short_type_name_strips_path() {
        assert_eq!(short_type_name("game::combat::Health"), "Health");
        assert_eq!(short_type_name("Health"), "Health");
    }
}
