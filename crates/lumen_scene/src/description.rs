use std::{collections::BTreeMap, path::Path};

use glam::{Quat, Vec3, Vec4};
use lumen_core::transform::Transform;
use lumen_lights::{LightKind, UniformValue};

use crate::error::{SceneError, SceneResult};

#[derive(serde::Deserialize, Clone, Debug, Default)]
pub struct SceneDescription {
    #[serde(default)]
    pub nodes: Vec<NodeDescription>,
    #[serde(default)]
    pub lights: Vec<LightDescription>,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct NodeDescription {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub translation: [f32; 3],
    #[serde(default = "identity_rotation")]
    pub rotation: [f32; 4],
    #[serde(default = "unit_scale")]
    pub scale: [f32; 3],
    /// Index into `nodes`.
    #[serde(default)]
    pub parent: Option<usize>,
}

#[derive(serde::Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LightKindDescription {
    Base,
    Directional,
    Point,
    Spot,
    #[serde(other)]
    Unknown,
}

impl LightKindDescription {
    pub fn to_kind(self) -> Option<LightKind> {
        match self {
            LightKindDescription::Base => Some(LightKind::Base),
            LightKindDescription::Directional => Some(LightKind::Directional),
            LightKindDescription::Point => Some(LightKind::Point),
            LightKindDescription::Spot => Some(LightKind::Spot),
            LightKindDescription::Unknown => None,
        }
    }
}

#[derive(serde::Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum UniformDescription {
    Float(f32),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
}

impl From<UniformDescription> for UniformValue {
    fn from(d: UniformDescription) -> Self {
        match d {
            UniformDescription::Float(v) => UniformValue::Float(v),
            UniformDescription::Vec3(v) => UniformValue::Vec3(Vec3::from_array(v)),
            UniformDescription::Vec4(v) => UniformValue::Vec4(Vec4::from_array(v)),
        }
    }
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct LightDescription {
    pub kind: LightKindDescription,
    /// Index into `nodes`; unattached when absent.
    #[serde(default)]
    pub node: Option<usize>,
    pub light_id: Option<String>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    /// Quaternion as `[x, y, z, w]`.
    pub default_orientation: Option<[f32; 4]>,
    #[serde(default)]
    pub uniforms: BTreeMap<String, UniformDescription>,
}

fn identity_rotation() -> [f32; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

fn unit_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

fn enabled_by_default() -> bool {
    true
}

impl NodeDescription {
    pub fn transform(&self) -> Transform {
        Transform {
            translation: Vec3::from_array(self.translation),
            rotation: Quat::from_array(self.rotation).normalize(),
            scale: Vec3::from_array(self.scale),
        }
    }
}

impl LightDescription {
    pub fn orientation(&self) -> Option<Quat> {
        self.default_orientation.map(|q| Quat::from_array(q).normalize())
    }
}

fn is_valid_rotation(q: [f32; 4]) -> bool {
    let q = Quat::from_array(q);
    q.is_finite() && q.length_squared() > 0.0
}

impl SceneDescription {
    pub fn from_json(json: &str) -> SceneResult<Self> {
        let scene: SceneDescription = serde_json::from_str(json)?;
        scene.validate()?;
        Ok(scene)
    }

    pub fn load(path: impl AsRef<Path>) -> SceneResult<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        log::info!("Loading scene from {}", path.as_ref().display());
        Self::from_json(&json)
    }

    /// Checks every index and quaternion before anything is spawned.
    pub fn validate(&self) -> SceneResult<()> {
        for (index, node) in self.nodes.iter().enumerate() {
            if let Some(parent) = node.parent {
                if parent >= self.nodes.len() || parent == index {
                    return Err(SceneError::InvalidParent { node: index, parent });
                }
            }
            if !is_valid_rotation(node.rotation) {
                return Err(SceneError::InvalidRotation { node: index });
            }
        }

        for (index, light) in self.lights.iter().enumerate() {
            if light.kind.to_kind().is_none() {
                return Err(SceneError::UnknownLightKind { light: index });
            }
            if let Some(node) = light.node {
                if node >= self.nodes.len() {
                    return Err(SceneError::InvalidLightNode { light: index, node });
                }
            }
            if let Some(q) = light.default_orientation {
                if !is_valid_rotation(q) {
                    return Err(SceneError::InvalidOrientation { light: index });
                }
            }
        }

        Ok(())
    }
}
