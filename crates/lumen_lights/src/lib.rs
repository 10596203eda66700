use std::{collections::HashMap, sync::Arc};

use bevy_ecs::prelude::*;
use lumen_core::{
    App, FrameListeners, ListenerId, Plugin, Stage,
    time::Time,
    transform::{GlobalTransform, transform_propagation_system},
};

pub mod error;
pub mod kind;
pub mod light;
pub mod shader_struct;
pub mod storage;
pub mod uniform;

pub use error::{LightError, LightResult};
pub use kind::LightKind;
pub use light::{FrameSync, Light};
pub use storage::{LightStorage, MemoryLightStorage, NativeLight};
pub use uniform::UniformValue;

/// The storage every light created through the app goes to.
#[derive(Resource, Clone)]
pub struct LightBackend(pub Arc<dyn LightStorage>);

impl LightBackend {
    pub fn create_light(&self, kind: LightKind) -> LightResult<Light> {
        Light::new(kind, self.0.clone())
    }
}

/// Every live light, keyed by the id it registers for frame ticks with.
#[derive(Resource, Default, Debug)]
pub struct Lights {
    lights: HashMap<ListenerId, Light>,
}

impl Lights {
    pub fn insert(&mut self, light: Light) -> ListenerId {
        let id = light.id();
        self.lights.insert(id, light);
        id
    }

    pub fn get(&self, id: ListenerId) -> Option<&Light> {
        self.lights.get(&id)
    }

    pub fn get_mut(&mut self, id: ListenerId) -> Option<&mut Light> {
        self.lights.get_mut(&id)
    }

    /// Detaches the light from its owner before handing it back.
    pub fn remove(
        &mut self,
        id: ListenerId,
        listeners: &mut FrameListeners,
    ) -> LightResult<Option<Light>> {
        let Some(mut light) = self.lights.remove(&id) else {
            return Ok(None);
        };
        light.set_owner_object(None, listeners)?;
        Ok(Some(light))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Light> {
        self.lights.values()
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }
}

/// Runs the frame sync of every registered light.
/// Ids registered by other listeners are ignored.
pub fn light_frame_sync_system(
    lights: Res<Lights>,
    listeners: Res<FrameListeners>,
    time: Res<Time>,
    transforms: Query<&GlobalTransform>,
) {
    let frame_time = time.delta_seconds();

    for id in listeners.iter() {
        let Some(light) = lights.get(id) else {
            continue;
        };
        if let Err(e) = light.on_draw_frame(frame_time, &transforms) {
            log::error!("Frame sync failed for light {id}: {e}");
        }
    }
}

pub struct LightPlugin {
    backend: LightBackend,
}

impl LightPlugin {
    pub fn with_storage(storage: Arc<dyn LightStorage>) -> Self {
        Self {
            backend: LightBackend(storage),
        }
    }
}

impl Default for LightPlugin {
    fn default() -> Self {
        Self::with_storage(Arc::new(MemoryLightStorage::new()))
    }
}

impl Plugin for LightPlugin {
    fn build(&self, app: &mut App) {
        app.world.insert_resource(self.backend.clone());
        app.world.init_resource::<Lights>();

        app.add_system_to_stage(
            Stage::PostUpdate,
            light_frame_sync_system.after(transform_propagation_system),
        );
    }
}
