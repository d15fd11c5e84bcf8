//! Diagnostics: world statistics and hierarchy snapshots.
//!
//! Enabled by the `diagnostics` feature flag. [`World::stats`] reports handle
//! pool usage plus spawn/destroy counts since the last
//! [`World::take_frame_stats`]. [`snapshot`] captures the whole tree in a
//! serializable form, and [`format_hierarchy`] renders it as indented text
//! for logs:
//!
//! ```text
//! player [unit] layer 0 (Health, Inventory)
//!   sword [weapon] layer 1 (Damage)
//!   shield [armor] layer 1 inactive
//! ```

use std::fmt::Write;

use serde::Serialize;

use crate::ecs::world::short_type_name;
use crate::ecs::{ErasedComponent, GameObject, World};
use crate::math::Transform;

/// Handle pool usage and per-frame churn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorldStats {
    pub entity_count: usize,
    pub total_slots: u32,
    pub free_slots: usize,
    pub spawned_this_frame: u32,
    pub destroyed_this_frame: u32,
}

/// One game object and its subtree.
#[derive(Debug, Clone, Serialize)]
pub struct ObjectSnapshot {
    pub id: u32,
    pub generation: u32,
    pub name: String,
    pub tag: String,
    pub layer: i32,
    pub active_self: bool,
    pub active_in_world: bool,
    pub transform: Transform,
    /// Short type names of the attached components, in attach order.
    pub components: Vec<String>,
    pub children: Vec<ObjectSnapshot>,
}

/// Every root object (no resolvable parent) with its subtree, in construction
/// order.
#[derive(Debug, Clone, Serialize)]
pub struct HierarchySnapshot {
    pub entity_count: usize,
    pub roots: Vec<ObjectSnapshot>,
}

impl HierarchySnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl World {
    /// Current statistics. Does not reset the per-frame counters.
    pub fn stats(&self) -> WorldStats {
        WorldStats {
            entity_count: self.entity_count(),
            total_slots: self.slots().total_slots(),
            free_slots: self.slots().vacant_count(),
            spawned_this_frame: self.spawned_this_frame,
            destroyed_this_frame: self.destroyed_this_frame,
        }
    }

    /// Current statistics, then reset the per-frame counters.
    pub fn take_frame_stats(&mut self) -> WorldStats {
        let stats = self.stats();
        self.spawned_this_frame = 0;
        self.destroyed_this_frame = 0;
        stats
    }
}

/// Capture the current hierarchy.
pub fn snapshot(world: &World) -> HierarchySnapshot {
    let roots = world
        .iter()
        .filter(|&obj| world.parent(obj).is_none())
        .filter_map(|obj| snapshot_object(world, obj))
        .collect();
    HierarchySnapshot {
        entity_count: world.entity_count(),
        roots,
    }
}

fn snapshot_object(world: &World, obj: GameObject) -> Option<ObjectSnapshot> {
    let record = world.record(obj)?;
    Some(ObjectSnapshot {
        id: obj.index(),
        generation: obj.generation(),
        name: record.name.clone(),
        tag: record.tag.clone(),
        layer: record.layer,
        active_self: record.active,
        active_in_world: world.is_active_in_world(obj),
        transform: record.transform,
        components: record
            .components
            .iter()
            .map(|c| short_type_name((**c).concrete_type_name()).to_string())
            .collect(),
        children: record
            .children
            .iter()
            .filter_map(|&child| snapshot_object(world, child))
            .collect(),
    })
}

/// Render the hierarchy as indented text, two spaces per level.
pub fn format_hierarchy(world: &World) -> String {
    let mut out = String::new();
    for root in &snapshot(world).roots {
        write_object(&mut out, root, 0);
    }
    out
}

fn write_object(out: &mut String, obj: &ObjectSnapshot, depth: usize) {
    let _ = write!(
        out,
        "{:indent$}{} [{}] layer {}",
        "",
        obj.name,
        obj.tag,
        obj.layer,
        indent = depth * 2
    );
    if !obj.components.is_empty() {
        let _ = write!(out, " ({})", obj.components.join(", "));
    }
    if !obj.active_self {
        out.push_str(" inactive");
    }
    out.push('\n');
    for child in &obj.children {
        write_object(out, child, depth + 1);
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::ecs::Component;

    struct Health;
    impl Component for Health {}

    struct Inventory;
    impl Component for Inventory {}

    fn sample_world() -> World {
        let mut world = World::new();
        let player = world.spawn("player", "unit", 0);
        world.add_component(player, Rc::new(Health)).unwrap();
        world.add_component(player, Rc::new(Inventory)).unwrap();
        let sword = world.spawn_child(player, "sword", "weapon", 1).unwrap();
        world.set_active(sword, false).unwrap();
        world.spawn("camera", "", 0);
        world
    }

    #[test]
    fn stats_count_churn_per_frame() {
        let mut world = World::new();
        let a = world.spawn("a", "", 0);
        world.spawn("b", "", 0);
        world.destroy(a).unwrap();

        let stats = world.take_frame_stats();
        assert_eq!(stats.entity_count, 1);
        assert_eq!(stats.spawned_this_frame, 2);
        assert_eq!(stats.destroyed_this_frame, 1);
        assert_eq!(stats.total_slots, 2);
        assert_eq!(stats.free_slots, 1);

        let next = world.stats();
        assert_eq!(next.spawned_this_frame, 0);
        assert_eq!(next.destroyed_this_frame, 0);
    }

    #[test]
    fn snapshot_nests_children_under_roots() {
        let world = sample_world();
        let snap = snapshot(&world);

        assert_eq!(snap.entity_count, 3);
        assert_eq!(snap.roots.len(), 2);
        let player = &snap.roots[0];
        assert_eq!(player.components, vec!["Health", "Inventory"]);
        assert_eq!(player.children.len(), 1);
        assert_eq!(player.children[0].name, "sword");
        assert!(!player.children[0].active_in_world);
        assert_eq!(snap.roots[1].name, "camera");
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let json = snapshot(&sample_world()).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["roots"][0]["name"], "player");
        assert_eq!(value["roots"][0]["children"][0]["tag"], "weapon");
    }

    #[test]
    fn formatted_hierarchy_is_indented() {
        let text = format_hierarchy(&sample_world());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "player [unit] layer 0 (Health, Inventory)",
                "  sword [weapon] layer 1 inactive",
                "camera [] layer 0",
            ]
        );
    }
}
