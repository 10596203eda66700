use bevy_ecs::prelude::*;
use lumen_core::{
    App, FrameListeners, ListenerId, Plugin, Stage,
    transform::{GlobalTransform, Parent},
};
use lumen_lights::{Light, LightBackend, Lights};

mod description;
mod error;

pub use description::{
    LightDescription, LightKindDescription, NodeDescription, SceneDescription, UniformDescription,
};
pub use error::{SceneError, SceneResult};

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.world.init_resource::<PendingScenes>();
        app.world.init_resource::<LoadedScenes>();

        app.add_system_to_stage(Stage::PreUpdate, spawn_pending_scenes);
    }
}

#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct NodeName(pub String);

/// Scenes queued for spawning at the start of the next frame.
#[derive(Resource, Default)]
pub struct PendingScenes(pub Vec<SceneDescription>);

#[derive(Resource, Default, Debug)]
pub struct LoadedScenes(pub Vec<SpawnedScene>);

/// What a scene turned into, in description order.
#[derive(Debug, Clone, Default)]
pub struct SpawnedScene {
    pub nodes: Vec<Entity>,
    pub lights: Vec<ListenerId>,
}

pub fn spawn_pending_scenes(world: &mut World) {
    let pending = match world.get_resource_mut::<PendingScenes>() {
        Some(mut pending) if !pending.0.is_empty() => std::mem::take(&mut pending.0),
        _ => return,
    };

    for scene in pending {
        match spawn_scene(world, &scene) {
            Ok(spawned) => {
                log::info!(
                    "Spawned scene: {} nodes, {} lights",
                    spawned.nodes.len(),
                    spawned.lights.len()
                );
                world.init_resource::<LoadedScenes>();
                world.resource_mut::<LoadedScenes>().0.push(spawned);
            }
            Err(e) => log::error!("Failed to spawn scene: {e}"),
        }
    }
}

/// Spawns nodes and lights. Needs the `LightBackend` from the light plugin.
///
/// Lights are fully configured before anything is spawned, so a failing scene
/// leaves the world as it was.
pub fn spawn_scene(world: &mut World, scene: &SceneDescription) -> SceneResult<SpawnedScene> {
    scene.validate()?;
    let backend = world
        .get_resource::<LightBackend>()
        .cloned()
        .ok_or(SceneError::MissingLightBackend)?;

    let lights = scene
        .lights
        .iter()
        .enumerate()
        .map(|(index, desc)| Ok((build_light(&backend, index, desc)?, desc.node)))
        .collect::<SceneResult<Vec<_>>>()?;

    world.init_resource::<FrameListeners>();
    world.init_resource::<Lights>();

    let mut spawned = SpawnedScene::default();

    for node in &scene.nodes {
        let entity = world
            .spawn((
                node.transform(),
                GlobalTransform::default(),
                NodeName(node.name.clone()),
            ))
            .id();
        spawned.nodes.push(entity);
    }

    // Parents may come after their children in the list, link in a second pass.
    for (index, node) in scene.nodes.iter().enumerate() {
        if let Some(parent) = node.parent {
            let parent_entity = spawned.nodes[parent];
            world.entity_mut(spawned.nodes[index]).insert(Parent(parent_entity));
        }
    }

    for (mut light, node) in lights {
        if let Some(node) = node {
            let owner = spawned.nodes[node];
            let attached = world.resource_scope(|_, mut listeners: Mut<FrameListeners>| {
                light.set_owner_object(Some(owner), &mut listeners)
            });
            if let Err(e) = attached {
                despawn_scene(world, &spawned);
                return Err(e.into());
            }
        }

        let id = world.resource_mut::<Lights>().insert(light);
        spawned.lights.push(id);
    }

    Ok(spawned)
}

fn build_light(
    backend: &LightBackend,
    index: usize,
    desc: &LightDescription,
) -> SceneResult<Light> {
    let kind = desc
        .kind
        .to_kind()
        .ok_or(SceneError::UnknownLightKind { light: index })?;
    let mut light = backend.create_light(kind)?;

    if let Some(orientation) = desc.orientation() {
        light.set_default_orientation(orientation);
    }
    if let Some(light_id) = &desc.light_id {
        light.set_light_id(light_id)?;
    }
    for (key, value) in &desc.uniforms {
        light.set_uniform(key, (*value).into())?;
    }
    if !desc.enabled {
        light.disable()?;
    }
    Ok(light)
}

/// Removes everything a scene spawned: its lights are detached and released,
/// its nodes despawned.
pub fn despawn_scene(world: &mut World, spawned: &SpawnedScene) {
    if !spawned.lights.is_empty() {
        world.init_resource::<FrameListeners>();
        world.init_resource::<Lights>();
        world.resource_scope(|world, mut listeners: Mut<FrameListeners>| {
            let mut lights = world.resource_mut::<Lights>();
            for &id in &spawned.lights {
                if let Err(e) = lights.remove(id, &mut listeners) {
                    log::warn!("Failed to detach light {id}: {e}");
                }
            }
        });
    }

    for &node in &spawned.nodes {
        world.despawn(node);
    }
}
