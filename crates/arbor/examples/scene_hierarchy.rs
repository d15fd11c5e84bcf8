//! Scene hierarchy — solar system demo.
//!
//! Builds a sun with orbiting planets and moons, queries components across
//! the tree by concrete type and by capability, then destroys a planet and
//! shows its moons going with it.
//!
//! Run with: `RUST_LOG=debug cargo run -p arbor --example scene_hierarchy`

use std::any::{Any, TypeId};
use std::cell::Cell;
use std::rc::Rc;

use arbor::prelude::*;

// ── Capabilities ────────────────────────────────────────────────────────

trait Orbiting {
    fn advance(&self, dt: f32);
    fn angle(&self) -> f32;
}

// ── Components ──────────────────────────────────────────────────────────

struct Star {
    luminosity: f32,
}

impl Component for Star {}

struct Orbit {
    speed: f32,
    angle: Cell<f32>,
    owner: Owner,
}

impl Orbit {
    fn new(speed: f32) -> Self {
        Self {
            speed,
            angle: Cell::new(0.0),
            owner: Owner::default(),
        }
    }
}

impl Orbiting for Orbit {
    fn advance(&self, dt: f32) {
        self.angle.set(self.angle.get() + self.speed * dt);
    }

    fn angle(&self) -> f32 {
        self.angle.get()
    }
}

impl Component for Orbit {
    fn on_attach(&self, owner: GameObject) {
        self.owner.set(Some(owner));
    }

    fn on_detach(&self, _owner: GameObject) {
        self.owner.set(None);
    }

    fn cast_capability(self: Rc<Self>, capability: TypeId) -> Option<Box<dyn Any>> {
        capabilities!(self, capability => dyn Orbiting)
    }
}

fn main() -> arbor::error::Result<()> {
    env_logger::init();

    let mut world = World::new();

    let sun = world.spawn("sun", "star", 0);
    world.add_component(sun, Rc::new(Star { luminosity: 1.0 }))?;

    let mut planets = Vec::new();
    for (i, name) in ["mercury", "venus", "earth"].into_iter().enumerate() {
        let planet = world.spawn_child(sun, name, "planet", 1)?;
        if let Some(t) = world.transform_mut(planet) {
            *t = Transform::from_xy(80.0 * (i + 1) as f32, 0.0);
        }
        world.add_component(planet, Rc::new(Orbit::new(1.0 / (i + 1) as f32)))?;
        planets.push(planet);
    }

    let earth = planets[2];
    let moon = world.spawn_child(earth, "moon", "moon", 2)?;
    world.add_component(moon, Rc::new(Orbit::new(4.0)))?;

    for orbit in world.get_components_in_children::<dyn Orbiting>(sun) {
        orbit.advance(0.5);
    }
    for orbit in world.find_objects_of_type::<Orbit>(false) {
        if let Some(owner) = orbit.owner.get() {
            log::debug!("{} advanced to {:.2}", world.name(owner).unwrap_or("?"), orbit.angle());
        }
    }

    let star = world
        .get_component_in_parent::<Star>(earth)
        .map(|s| s.luminosity)
        .unwrap_or_default();
    log::info!("earth orbits a star of luminosity {star}");

    for planet in world.find_game_objects_with_tag("planet") {
        let angle = world
            .get_component::<dyn Orbiting>(planet)
            .map(|o| o.angle())
            .unwrap_or_default();
        log::info!(
            "{} at angle {angle:.2} with {} moon(s)",
            world.name(planet).unwrap_or("?"),
            world.children(planet).len()
        );
    }

    #[cfg(feature = "diagnostics")]
    log::info!("scene before:\n{}", format_hierarchy(&world));

    // Detaching by capability reference removes the concrete Orbit.
    if let Some(orbit) = world.get_component::<dyn Orbiting>(planets[0]) {
        world.destroy_component(&orbit);
    }

    world.destroy(earth)?;
    log::info!(
        "earth destroyed; moon still alive: {}, {} orbiting bodies left",
        world.is_alive(moon),
        world.find_objects_of_type::<dyn Orbiting>(false).len()
    );

    #[cfg(feature = "diagnostics")]
    {
        log::info!("scene after:\n{}", format_hierarchy(&world));
        let stats = world.take_frame_stats();
        log::info!(
            "{} live objects, {} spawned, {} destroyed",
            stats.entity_count,
            stats.spawned_this_frame,
            stats.destroyed_this_frame
        );
    }

    Ok(())
}
