use std::sync::Arc;

use bevy_ecs::entity::Entity;
use glam::{Mat4, Quat, Vec3, Vec4};
use lumen_core::{FrameListeners, ListenerId, transform::WorldTransforms};

use crate::{
    error::{LightResult, check_finite, check_not_empty},
    kind::LightKind,
    shader_struct::generate_shader_struct,
    storage::{LightStorage, NativeLight},
    uniform::{ENABLED, UniformValue, WORLD_DIRECTION, WORLD_POSITION},
};

/// What a frame sync actually wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameSync {
    pub position_changed: bool,
    pub direction_changed: bool,
}

impl FrameSync {
    pub fn any(&self) -> bool {
        self.position_changed || self.direction_changed
    }
}

/// A light source attached (or not) to a scene node.
///
/// Uniform values live in the [`LightStorage`]; the light only keeps its
/// handle, its kind, the default orientation and a non-owning link to the
/// node that owns it.
pub struct Light {
    id: ListenerId,
    kind: LightKind,
    storage: Arc<dyn LightStorage>,
    native: NativeLight,
    default_orientation: Quat,
    owner: Option<Entity>,
}

impl Light {
    /// Creates the storage-side light and seeds the kind's default uniforms.
    pub fn new(kind: LightKind, storage: Arc<dyn LightStorage>) -> LightResult<Self> {
        let native = storage.create();
        let light = Self {
            id: ListenerId::new(),
            kind,
            storage,
            native,
            default_orientation: Quat::IDENTITY,
            owner: None,
        };

        for &(key, value) in kind.defaults() {
            light.set_uniform(key, value)?;
        }

        log::debug!("Created {kind} light {} ({:?})", light.id, native);
        Ok(light)
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }

    pub fn kind(&self) -> LightKind {
        self.kind
    }

    pub fn native(&self) -> NativeLight {
        self.native
    }

    pub fn owner(&self) -> Option<Entity> {
        self.owner
    }

    // --- Attach / Detach ---

    /// Moves the light to `new_owner`.
    ///
    /// Frame registration only toggles on attach (None -> Some) and detach
    /// (Some -> None); re-parenting keeps the existing registration.
    pub fn set_owner_object(
        &mut self,
        new_owner: Option<Entity>,
        listeners: &mut FrameListeners,
    ) -> LightResult<()> {
        if self.owner == new_owner {
            return Ok(());
        }

        match (self.owner, new_owner) {
            (None, Some(node)) => {
                self.storage.set_parent(self.native, Some(node))?;
                listeners.register(self.id);
                log::debug!("Light {} attached to {node:?}", self.id);
            }
            (Some(_), Some(node)) => {
                self.storage.set_parent(self.native, Some(node))?;
                log::debug!("Light {} moved to {node:?}", self.id);
            }
            (Some(old), None) => {
                self.storage.set_parent(self.native, None)?;
                listeners.unregister(self.id);
                log::debug!("Light {} detached from {old:?}", self.id);
            }
            (None, None) => {}
        }

        self.owner = new_owner;
        Ok(())
    }

    // --- Enable / Disable ---

    pub fn enable(&self) -> LightResult<()> {
        self.set_float(ENABLED, 1.0)?;
        self.storage.enable(self.native)
    }

    pub fn disable(&self) -> LightResult<()> {
        self.set_float(ENABLED, 0.0)?;
        self.storage.disable(self.native)
    }

    pub fn is_enabled(&self) -> LightResult<bool> {
        Ok(self.get_float(ENABLED)? > 0.0)
    }

    // --- Position / identity ---

    /// World position, as last written by the frame sync or `set_position`.
    pub fn position(&self) -> LightResult<Vec3> {
        self.get_vec3(WORLD_POSITION)
    }

    pub fn set_position(&self, position: Vec3) -> LightResult<()> {
        self.set_vec3(WORLD_POSITION, position)
    }

    pub fn direction(&self) -> LightResult<Vec3> {
        self.get_vec3(WORLD_DIRECTION)
    }

    pub fn light_id(&self) -> LightResult<String> {
        self.storage.light_id(self.native)
    }

    pub fn set_light_id(&self, id: &str) -> LightResult<()> {
        check_not_empty("id", id)?;
        self.storage.set_light_id(self.native, id)
    }

    pub fn default_orientation(&self) -> Quat {
        self.default_orientation
    }

    /// Orientation applied before the owner's world transform.
    /// Lights look down +Z by default.
    pub fn set_default_orientation(&mut self, orientation: Quat) {
        self.default_orientation = orientation;
    }

    // --- Shader side ---

    pub fn shader_source(&self) -> &'static str {
        self.kind.shader_source()
    }

    pub fn uniform_descriptor(&self) -> &'static str {
        self.kind.descriptor()
    }

    pub fn shader_struct(&self) -> String {
        generate_shader_struct(self.kind.struct_name(), self.kind.descriptor())
    }

    // --- Uniforms ---

    pub fn get_float(&self, key: &str) -> LightResult<f32> {
        self.storage.get_float(self.native, key)
    }

    pub fn set_float(&self, key: &str, value: f32) -> LightResult<()> {
        check_not_empty("key", key)?;
        check_finite("value", value)?;
        self.storage.set_float(self.native, key, value)
    }

    pub fn get_vec3(&self, key: &str) -> LightResult<Vec3> {
        self.storage.get_vec3(self.native, key)
    }

    pub fn set_vec3(&self, key: &str, value: Vec3) -> LightResult<()> {
        check_not_empty("key", key)?;
        self.storage.set_vec3(self.native, key, value)
    }

    pub fn get_vec4(&self, key: &str) -> LightResult<Vec4> {
        self.storage.get_vec4(self.native, key)
    }

    pub fn set_vec4(&self, key: &str, value: Vec4) -> LightResult<()> {
        check_not_empty("key", key)?;
        self.storage.set_vec4(self.native, key, value)
    }

    pub fn set_uniform(&self, key: &str, value: UniformValue) -> LightResult<()> {
        match value {
            UniformValue::Float(v) => self.set_float(key, v),
            UniformValue::Vec3(v) => self.set_vec3(key, v),
            UniformValue::Vec4(v) => self.set_vec4(key, v),
        }
    }

    // --- Frame sync ---

    /// Recomputes world position and direction from the owner's transform.
    ///
    /// Each uniform is written only if it differs exactly from the stored
    /// value, so a static owner costs no writes.
    pub fn on_draw_frame(
        &self,
        frame_time: f32,
        transforms: &impl WorldTransforms,
    ) -> LightResult<FrameSync> {
        let Some(owner) = self.owner else {
            return Ok(FrameSync::default());
        };
        if !self.is_enabled()? {
            return Ok(FrameSync::default());
        }

        let old_direction = self.get_vec3(WORLD_DIRECTION)?;
        let old_position = self.get_vec3(WORLD_POSITION)?;

        let Some(world) = transforms.world_matrix(owner) else {
            log::warn!("Light {} owner {owner:?} has no world transform, skipping", self.id);
            return Ok(FrameSync::default());
        };

        let light_rotation = Mat4::from_quat(self.default_orientation);
        let new_position = world.w_axis.truncate();
        let new_direction = (world * light_rotation).transform_vector3(Vec3::Z);

        let mut sync = FrameSync::default();
        if old_direction != new_direction {
            self.set_vec3(WORLD_DIRECTION, new_direction)?;
            sync.direction_changed = true;
        }
        if old_position != new_position {
            self.set_vec3(WORLD_POSITION, new_position)?;
            sync.position_changed = true;
        }

        if sync.any() {
            log::trace!(
                "Light {} synced in {frame_time:.4}s frame: pos {new_position} dir {new_direction}",
                self.id
            );
        }
        Ok(sync)
    }
}

impl Drop for Light {
    fn drop(&mut self) {
        if let Err(e) = self.storage.destroy(self.native) {
            log::warn!("Light {} was already released: {e}", self.id);
        }
    }
}

impl std::fmt::Debug for Light {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Light")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("native", &self.native)
            .field("default_orientation", &self.default_orientation)
            .field("owner", &self.owner)
            .finish()
    }
}
