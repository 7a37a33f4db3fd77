//! Typed schema for the level document.
//!
//! Wire names are the document's camelCase; everything optional in the
//! document is optional or defaulted here, so a parsed [`LevelDoc`] never
//! needs a second validation pass for shape — only cross-references remain
//! to check at build time.

use glam::{Vec2, Vec3};
use playspace_common::ProcessMode;
use playspace_render::{Color, GeometryKind, MaterialKind, TextureMapping, WrapMode};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Vec3Spec {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Vec3Spec {
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Vec2Spec {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
}

impl Vec2Spec {
    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Texture projection modes as the document spells them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingSpec {
    Uv,
    CubeReflection,
    EquirectangularReflection,
}

impl MappingSpec {
    pub fn to_mapping(self) -> TextureMapping {
        match self {
            MappingSpec::Uv => TextureMapping::Uv,
            MappingSpec::CubeReflection => TextureMapping::CubeReflection,
            MappingSpec::EquirectangularReflection => TextureMapping::EquirectangularReflection,
        }
    }
}

/// Wrap modes as the document spells them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapSpec {
    Repeat,
    ClampToEdge,
    MirroredRepeat,
}

impl WrapSpec {
    pub fn to_wrap(self) -> WrapMode {
        match self {
            WrapSpec::Repeat => WrapMode::Repeat,
            WrapSpec::ClampToEdge => WrapMode::ClampToEdge,
            WrapSpec::MirroredRepeat => WrapMode::MirroredRepeat,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackgroundSpec {
    #[serde(rename = "type")]
    pub mapping: MappingSpec,
    pub filename: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextureSpec {
    pub filename: String,
    #[serde(default)]
    pub mapping: Option<MappingSpec>,
    #[serde(rename = "wrapS", default)]
    pub wrap_s: Option<WrapSpec>,
    #[serde(rename = "wrapT", default)]
    pub wrap_t: Option<WrapSpec>,
    #[serde(default)]
    pub repeat: Option<Vec2Spec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelSpec {
    pub filename: String,
    #[serde(default = "default_scale")]
    pub scale: f32,
}

fn default_scale() -> f32 {
    1.0
}

/// A color as the document writes it: a packed number or a hex string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ColorSpec {
    Packed(u32),
    Text(String),
}

impl ColorSpec {
    /// Parse into a color; `None` when the text form is not hex.
    pub fn to_color(&self) -> Option<Color> {
        match self {
            ColorSpec::Packed(value) => Some(Color::from_hex(*value)),
            ColorSpec::Text(text) => {
                let hex = text
                    .strip_prefix('#')
                    .or_else(|| text.strip_prefix("0x"))
                    .unwrap_or(text);
                u32::from_str_radix(hex, 16).ok().map(Color::from_hex)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialKindSpec {
    Basic,
    Lambert,
    Phong,
    Standard,
}

impl MaterialKindSpec {
    pub fn to_kind(self) -> MaterialKind {
        match self {
            MaterialKindSpec::Basic => MaterialKind::Basic,
            MaterialKindSpec::Lambert => MaterialKind::Lambert,
            MaterialKindSpec::Phong => MaterialKind::Phong,
            MaterialKindSpec::Standard => MaterialKind::Standard,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MaterialSpec {
    #[serde(rename = "type")]
    pub kind: MaterialKindSpec,
    /// Texture name to sample, referencing the level's texture dict.
    #[serde(default)]
    pub map: Option<String>,
    #[serde(default)]
    pub color: Option<ColorSpec>,
    #[serde(rename = "flatShading", default)]
    pub flat_shading: Option<bool>,
    #[serde(default)]
    pub emissive: Option<ColorSpec>,
    #[serde(default)]
    pub shininess: Option<f32>,
    #[serde(default)]
    pub roughness: Option<f32>,
    #[serde(default)]
    pub metalness: Option<f32>,
}

/// Geometry primitives, selected by the `type` tag. A fixed closed set;
/// dimensional defaults follow the renderer's conventions.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GeometrySpec {
    Box {
        #[serde(default = "dim_one")]
        width: f32,
        #[serde(default = "dim_one")]
        height: f32,
        #[serde(default = "dim_one")]
        depth: f32,
    },
    Sphere {
        #[serde(default = "dim_one")]
        radius: f32,
        #[serde(rename = "widthSegments", default = "segments_32")]
        width_segments: u32,
        #[serde(rename = "heightSegments", default = "segments_16")]
        height_segments: u32,
    },
    Cylinder {
        #[serde(rename = "radiusTop", default = "dim_one")]
        radius_top: f32,
        #[serde(rename = "radiusBottom", default = "dim_one")]
        radius_bottom: f32,
        #[serde(default = "dim_one")]
        height: f32,
        #[serde(rename = "radialSegments", default = "segments_32")]
        radial_segments: u32,
    },
    Cone {
        #[serde(default = "dim_one")]
        radius: f32,
        #[serde(default = "dim_one")]
        height: f32,
        #[serde(rename = "radialSegments", default = "segments_32")]
        radial_segments: u32,
        #[serde(rename = "heightSegments", default = "segments_1")]
        height_segments: u32,
    },
    Circle {
        #[serde(default = "dim_one")]
        radius: f32,
        #[serde(rename = "radialSegments", default = "segments_32")]
        radial_segments: u32,
    },
    Plane {
        #[serde(default = "dim_one")]
        width: f32,
        #[serde(default = "dim_one")]
        height: f32,
    },
    Torus {
        #[serde(default = "dim_one")]
        radius: f32,
        #[serde(rename = "tubeRadius", default = "tube_default")]
        tube_radius: f32,
        #[serde(rename = "radialSegments", default = "segments_12")]
        radial_segments: u32,
        #[serde(rename = "tubularSegments", default = "segments_48")]
        tubular_segments: u32,
    },
}

fn dim_one() -> f32 {
    1.0
}
fn tube_default() -> f32 {
    0.4
}
fn segments_1() -> u32 {
    1
}
fn segments_12() -> u32 {
    12
}
fn segments_16() -> u32 {
    16
}
fn segments_32() -> u32 {
    32
}
fn segments_48() -> u32 {
    48
}

impl GeometrySpec {
    pub fn to_kind(self) -> GeometryKind {
        match self {
            GeometrySpec::Box {
                width,
                height,
                depth,
            } => GeometryKind::Box {
                width,
                height,
                depth,
            },
            GeometrySpec::Sphere {
                radius,
                width_segments,
                height_segments,
            } => GeometryKind::Sphere {
                radius,
                width_segments,
                height_segments,
            },
            GeometrySpec::Cylinder {
                radius_top,
                radius_bottom,
                height,
                radial_segments,
            } => GeometryKind::Cylinder {
                radius_top,
                radius_bottom,
                height,
                radial_segments,
            },
            GeometrySpec::Cone {
                radius,
                height,
                radial_segments,
                height_segments,
            } => GeometryKind::Cone {
                radius,
                height,
                radial_segments,
                height_segments,
            },
            GeometrySpec::Circle {
                radius,
                radial_segments,
            } => GeometryKind::Circle {
                radius,
                segments: radial_segments,
            },
            GeometrySpec::Plane { width, height } => GeometryKind::Plane { width, height },
            GeometrySpec::Torus {
                radius,
                tube_radius,
                radial_segments,
                tubular_segments,
            } => GeometryKind::Torus {
                radius,
                tube_radius,
                radial_segments,
                tubular_segments,
            },
        }
    }
}

/// Collision options for world meshes and entities.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct CollisionSpec {
    /// Derive the shape from the referenced geometry (world meshes only).
    #[serde(rename = "copyFromGeometry", default)]
    pub copy_from_geometry: bool,
    #[serde(default)]
    pub offset: Option<Vec3Spec>,
    #[serde(default)]
    pub boundaries: Option<Vec3Spec>,
    #[serde(default)]
    pub rotation: Option<Vec3Spec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MeshSpec {
    #[serde(rename = "meshName")]
    pub mesh_name: String,
    pub geometry: String,
    pub material: String,
    #[serde(default)]
    pub position: Vec3Spec,
    #[serde(default)]
    pub rotation: Vec3Spec,
    #[serde(default)]
    pub collision: Option<CollisionSpec>,
    #[serde(rename = "castShadow", default)]
    pub cast_shadow: bool,
    #[serde(rename = "receiveShadow", default)]
    pub receive_shadow: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntitySpec {
    #[serde(rename = "entName")]
    pub ent_name: String,
    #[serde(default)]
    pub origin: Vec3Spec,
    #[serde(default)]
    pub rotation: Vec3Spec,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub collision: Option<CollisionSpec>,
    #[serde(rename = "processMode", default)]
    pub process_mode: ProcessMode,
}

/// The level document: named resources plus the static world geometry and
/// dynamic entity lists that reference them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LevelDoc {
    #[serde(default)]
    pub background: Option<BackgroundSpec>,
    #[serde(default)]
    pub textures: BTreeMap<String, TextureSpec>,
    #[serde(default)]
    pub models: BTreeMap<String, ModelSpec>,
    #[serde(default)]
    pub materials: BTreeMap<String, MaterialSpec>,
    #[serde(default)]
    pub geometries: BTreeMap<String, GeometrySpec>,
    #[serde(default)]
    pub world_geometry: Vec<MeshSpec>,
    #[serde(default)]
    pub entity_list: Vec<EntitySpec>,
}
