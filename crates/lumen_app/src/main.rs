use std::{collections::BTreeSet, time::Duration};

use bevy_ecs::prelude::*;
use lumen_core::{App, time::Time, transform::Transform};
use lumen_lights::{LightKind, LightPlugin, Lights, shader_struct::generate_shader_struct};
use lumen_scene::{NodeName, PendingScenes, SceneDescription, SceneResult, ScenePlugin};

const DEMO_SCENE: &str = include_str!("../assets/demo_scene.json");
const DEFAULT_FRAMES: u32 = 120;
const FRAME: Duration = Duration::from_micros(16_667);

/// Nodes with this name spin around Y, dragging their children along.
const TURNTABLE: &str = "turntable";

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run() -> SceneResult<()> {
    let scene = match std::env::args().nth(1) {
        Some(path) => SceneDescription::load(path)?,
        None => SceneDescription::from_json(DEMO_SCENE)?,
    };
    let frames = std::env::var("LUMEN_FRAMES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_FRAMES);

    let mut app = App::new();
    app.add_plugin(LightPlugin::default());
    app.add_plugin(ScenePlugin);
    app.add_system(turntable_system);

    app.world.resource_mut::<PendingScenes>().0.push(scene);

    log::info!("Running {frames} frames");
    for _ in 0..frames {
        app.step(FRAME);
    }

    report(&app.world)
}

fn turntable_system(mut nodes: Query<(&mut Transform, &NodeName)>, time: Res<Time>) {
    let angle = 0.5 * time.delta_seconds();
    for (mut transform, name) in &mut nodes {
        if name.0 == TURNTABLE {
            transform.rotate_y(angle);
        }
    }
}

fn report(world: &World) -> SceneResult<()> {
    let lights = world.resource::<Lights>();
    let time = world.resource::<Time>();
    println!(
        "After {} frames ({:.2}s), {} lights:",
        time.frame_count(),
        time.elapsed_seconds(),
        lights.len()
    );

    let mut rows = Vec::with_capacity(lights.len());
    for light in lights.iter() {
        rows.push((
            light.light_id()?,
            light.kind(),
            light.is_enabled()?,
            light.position()?,
            light.direction()?,
        ));
    }
    rows.sort_by(|a, b| a.0.cmp(&b.0));

    for (id, kind, enabled, position, direction) in rows {
        let state = if enabled { "on " } else { "off" };
        println!("  {id:<8} {kind:<12} {state} pos {position:.3} dir {direction:.3}");
    }

    // One struct per kind in use, the way a shader aggregator would ask for them.
    let kinds: BTreeSet<LightKind> = lights.iter().map(|l| l.kind()).collect();
    for kind in kinds {
        println!();
        print!("{}", generate_shader_struct(kind.struct_name(), kind.descriptor()));
    }

    Ok(())
}
