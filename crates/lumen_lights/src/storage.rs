//! The storage side of a light.
//!
//! A [`Light`](crate::Light) owns no uniform values itself: every read and
//! write goes through a [`LightStorage`] keyed by an opaque [`NativeLight`]
//! handle. Swapping the backend (a renderer's uniform buffers, a scripting
//! host, the in-memory table below) does not touch the light logic.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use bevy_ecs::entity::Entity;
use glam::{Vec3, Vec4};

use crate::error::{LightError, LightResult};

/// Opaque handle to a light living inside a [`LightStorage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NativeLight(pub u64);

pub trait LightStorage: Send + Sync {
    fn create(&self) -> NativeLight;
    fn destroy(&self, light: NativeLight) -> LightResult<()>;

    fn enable(&self, light: NativeLight) -> LightResult<()>;
    fn disable(&self, light: NativeLight) -> LightResult<()>;

    fn get_float(&self, light: NativeLight, key: &str) -> LightResult<f32>;
    fn set_float(&self, light: NativeLight, key: &str, value: f32) -> LightResult<()>;
    fn get_vec3(&self, light: NativeLight, key: &str) -> LightResult<Vec3>;
    fn set_vec3(&self, light: NativeLight, key: &str, value: Vec3) -> LightResult<()>;
    fn get_vec4(&self, light: NativeLight, key: &str) -> LightResult<Vec4>;
    fn set_vec4(&self, light: NativeLight, key: &str, value: Vec4) -> LightResult<()>;

    fn set_parent(&self, light: NativeLight, parent: Option<Entity>) -> LightResult<()>;
    fn parent(&self, light: NativeLight) -> LightResult<Option<Entity>>;

    fn light_id(&self, light: NativeLight) -> LightResult<String>;
    fn set_light_id(&self, light: NativeLight, id: &str) -> LightResult<()>;
}

#[derive(Debug, Default)]
struct LightRecord {
    enabled: bool,
    floats: HashMap<String, f32>,
    vec3s: HashMap<String, Vec3>,
    vec4s: HashMap<String, Vec4>,
    parent: Option<Entity>,
    light_id: String,
    uniform_writes: u64,
}

#[derive(Debug, Default)]
struct MemoryTables {
    next_handle: u64,
    lights: HashMap<NativeLight, LightRecord>,
}

/// Uniform tables kept in process memory.
///
/// Counts uniform writes per light, which is how tests observe that the frame
/// sync skips redundant updates.
#[derive(Debug, Default)]
pub struct MemoryLightStorage {
    tables: Mutex<MemoryTables>,
}

impl MemoryLightStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, MemoryTables> {
        // A panic while holding the lock cannot leave a record half written.
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn with_record<T>(
        &self,
        light: NativeLight,
        f: impl FnOnce(&mut LightRecord) -> LightResult<T>,
    ) -> LightResult<T> {
        let mut tables = self.tables();
        let record = tables
            .lights
            .get_mut(&light)
            .ok_or(LightError::UnknownLight(light))?;
        f(record)
    }

    /// Number of `set_*` calls that reached this light.
    pub fn write_count(&self, light: NativeLight) -> Option<u64> {
        self.tables().lights.get(&light).map(|r| r.uniform_writes)
    }

    /// Storage-side enabled flag, toggled by `enable` / `disable`.
    pub fn is_enabled(&self, light: NativeLight) -> Option<bool> {
        self.tables().lights.get(&light).map(|r| r.enabled)
    }

    pub fn live_lights(&self) -> usize {
        self.tables().lights.len()
    }
}

impl LightStorage for MemoryLightStorage {
    fn create(&self) -> NativeLight {
        let mut tables = self.tables();
        tables.next_handle += 1;
        let handle = NativeLight(tables.next_handle);
        tables.lights.insert(
            handle,
            LightRecord {
                enabled: true,
                ..Default::default()
            },
        );
        handle
    }

    fn destroy(&self, light: NativeLight) -> LightResult<()> {
        self.tables()
            .lights
            .remove(&light)
            .map(|_| ())
            .ok_or(LightError::UnknownLight(light))
    }

    fn enable(&self, light: NativeLight) -> LightResult<()> {
        self.with_record(light, |r| {
            r.enabled = true;
            Ok(())
        })
    }

    fn disable(&self, light: NativeLight) -> LightResult<()> {
        self.with_record(light, |r| {
            r.enabled = false;
            Ok(())
        })
    }

    fn get_float(&self, light: NativeLight, key: &str) -> LightResult<f32> {
        self.with_record(light, |r| {
            r.floats
                .get(key)
                .copied()
                .ok_or_else(|| LightError::unknown_uniform(key))
        })
    }

    fn set_float(&self, light: NativeLight, key: &str, value: f32) -> LightResult<()> {
        self.with_record(light, |r| {
            r.floats.insert(key.to_owned(), value);
            r.uniform_writes += 1;
            Ok(())
        })
    }

    fn get_vec3(&self, light: NativeLight, key: &str) -> LightResult<Vec3> {
        self.with_record(light, |r| {
            r.vec3s
                .get(key)
                .copied()
                .ok_or_else(|| LightError::unknown_uniform(key))
        })
    }

    fn set_vec3(&self, light: NativeLight, key: &str, value: Vec3) -> LightResult<()> {
        self.with_record(light, |r| {
            r.vec3s.insert(key.to_owned(), value);
            r.uniform_writes += 1;
            Ok(())
        })
    }

    fn get_vec4(&self, light: NativeLight, key: &str) -> LightResult<Vec4> {
        self.with_record(light, |r| {
            r.vec4s
                .get(key)
                .copied()
                .ok_or_else(|| LightError::unknown_uniform(key))
        })
    }

    fn set_vec4(&self, light: NativeLight, key: &str, value: Vec4) -> LightResult<()> {
        self.with_record(light, |r| {
            r.vec4s.insert(key.to_owned(), value);
            r.uniform_writes += 1;
            Ok(())
        })
    }

    fn set_parent(&self, light: NativeLight, parent: Option<Entity>) -> LightResult<()> {
        self.with_record(light, |r| {
            r.parent = parent;
            Ok(())
        })
    }

    fn parent(&self, light: NativeLight) -> LightResult<Option<Entity>> {
        self.with_record(light, |r| Ok(r.parent))
    }

    fn light_id(&self, light: NativeLight) -> LightResult<String> {
        self.with_record(light, |r| Ok(r.light_id.clone()))
    }

    fn set_light_id(&self, light: NativeLight, id: &str) -> LightResult<()> {
        self.with_record(light, |r| {
            r.light_id = id.to_owned();
            Ok(())
        })
    }
}
