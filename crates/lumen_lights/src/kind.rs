use std::fmt;

use glam::{Vec3, Vec4};

use crate::uniform::{ENABLED, UniformValue, WORLD_DIRECTION, WORLD_POSITION};

/// The light implementations the fragment shader knows about.
///
/// Each kind fixes its uniform descriptor, its GLSL source and its default
/// uniform values; see [`LightKindInfo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LightKind {
    Base,
    Directional,
    Point,
    Spot,
}

#[derive(Debug)]
pub struct LightKindInfo {
    /// Suffix of the generated GLSL struct, `Struct<struct_name>`.
    pub struct_name: &'static str,
    pub descriptor: &'static str,
    pub shader_source: &'static str,
    pub defaults: &'static [(&'static str, UniformValue)],
}

const BASE_DEFAULTS: [(&str, UniformValue); 3] = [
    (ENABLED, UniformValue::Float(1.0)),
    (WORLD_POSITION, UniformValue::Vec3(Vec3::ZERO)),
    (WORLD_DIRECTION, UniformValue::Vec3(Vec3::Z)),
];

const DIRECT_DEFAULTS: [(&str, UniformValue); 6] = [
    BASE_DEFAULTS[0],
    BASE_DEFAULTS[1],
    BASE_DEFAULTS[2],
    ("ambient_intensity", UniformValue::Vec4(Vec4::new(0.0, 0.0, 0.0, 1.0))),
    ("diffuse_intensity", UniformValue::Vec4(Vec4::ONE)),
    ("specular_intensity", UniformValue::Vec4(Vec4::ONE)),
];

const POINT_DEFAULTS: [(&str, UniformValue); 9] = [
    DIRECT_DEFAULTS[0],
    DIRECT_DEFAULTS[1],
    DIRECT_DEFAULTS[2],
    DIRECT_DEFAULTS[3],
    DIRECT_DEFAULTS[4],
    DIRECT_DEFAULTS[5],
    ("attenuation_constant", UniformValue::Float(1.0)),
    ("attenuation_linear", UniformValue::Float(0.0)),
    ("attenuation_quadratic", UniformValue::Float(0.0)),
];

// Cone angles are stored as cosines: cos(10 deg) and cos(15 deg).
const SPOT_DEFAULTS: [(&str, UniformValue); 11] = [
    POINT_DEFAULTS[0],
    POINT_DEFAULTS[1],
    POINT_DEFAULTS[2],
    POINT_DEFAULTS[3],
    POINT_DEFAULTS[4],
    POINT_DEFAULTS[5],
    POINT_DEFAULTS[6],
    POINT_DEFAULTS[7],
    POINT_DEFAULTS[8],
    ("inner_cone_angle", UniformValue::Float(0.984_807_7)),
    ("outer_cone_angle", UniformValue::Float(0.965_925_8)),
];

static KIND_TABLE: [LightKindInfo; 4] = [
    LightKindInfo {
        struct_name: "LightBase",
        descriptor: "float enabled float3 world_position float3 world_direction",
        shader_source: include_str!("shaders/light_base.glsl"),
        defaults: &BASE_DEFAULTS,
    },
    LightKindInfo {
        struct_name: "DirectLight",
        descriptor: "float enabled float3 world_position float3 world_direction \
                     float4 ambient_intensity float4 diffuse_intensity float4 specular_intensity",
        shader_source: include_str!("shaders/direct_light.glsl"),
        defaults: &DIRECT_DEFAULTS,
    },
    LightKindInfo {
        struct_name: "PointLight",
        descriptor: "float enabled float3 world_position float3 world_direction \
                     float4 ambient_intensity float4 diffuse_intensity float4 specular_intensity \
                     float attenuation_constant float attenuation_linear float attenuation_quadratic",
        shader_source: include_str!("shaders/point_light.glsl"),
        defaults: &POINT_DEFAULTS,
    },
    LightKindInfo {
        struct_name: "SpotLight",
        descriptor: "float enabled float3 world_position float3 world_direction \
                     float4 ambient_intensity float4 diffuse_intensity float4 specular_intensity \
                     float attenuation_constant float attenuation_linear float attenuation_quadratic \
                     float inner_cone_angle float outer_cone_angle",
        shader_source: include_str!("shaders/spot_light.glsl"),
        defaults: &SPOT_DEFAULTS,
    },
];

impl LightKind {
    pub const ALL: [LightKind; 4] = [
        LightKind::Base,
        LightKind::Directional,
        LightKind::Point,
        LightKind::Spot,
    ];

    pub fn info(self) -> &'static LightKindInfo {
        let index = match self {
            LightKind::Base => 0,
            LightKind::Directional => 1,
            LightKind::Point => 2,
            LightKind::Spot => 3,
        };
        &KIND_TABLE[index]
    }

    pub fn struct_name(self) -> &'static str {
        self.info().struct_name
    }

    pub fn descriptor(self) -> &'static str {
        self.info().descriptor
    }

    pub fn shader_source(self) -> &'static str {
        self.info().shader_source
    }

    pub fn defaults(self) -> &'static [(&'static str, UniformValue)] {
        self.info().defaults
    }
}

impl fmt::Display for LightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.struct_name())
    }
}
