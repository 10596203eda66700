use glam::{Vec3, Vec4};

/// A typed shader uniform value as stored per light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec3(Vec3),
    Vec4(Vec4),
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        UniformValue::Float(v)
    }
}

impl From<Vec3> for UniformValue {
    fn from(v: Vec3) -> Self {
        UniformValue::Vec3(v)
    }
}

impl From<Vec4> for UniformValue {
    fn from(v: Vec4) -> Self {
        UniformValue::Vec4(v)
    }
}

// Uniform names every light kind declares.
pub const ENABLED: &str = "enabled";
pub const WORLD_POSITION: &str = "world_position";
pub const WORLD_DIRECTION: &str = "world_direction";
