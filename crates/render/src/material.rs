use crate::texture::TextureBinding;
use std::sync::atomic::{AtomicBool, Ordering};

/// Linear RGB color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build from a packed `0xRRGGBB` value.
    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }
}

/// Material tiers, cheapest first. Each tier extends the configurable
/// surface of the one before it: basic (color) ⊂ lambert (flat shading,
/// emissive) ⊂ phong (shininess) ⊂ standard (roughness, metalness).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialKind {
    Basic,
    Lambert,
    Phong,
    Standard,
}

impl MaterialKind {
    pub fn tag(&self) -> &'static str {
        match self {
            MaterialKind::Basic => "basic",
            MaterialKind::Lambert => "lambert",
            MaterialKind::Phong => "phong",
            MaterialKind::Standard => "standard",
        }
    }
}

/// A surface description.
///
/// Fields beyond a kind's tier are left at their defaults and ignored by
/// backends; builders only populate the tier-appropriate ones.
#[derive(Debug)]
pub struct Material {
    pub kind: MaterialKind,
    pub color: Color,
    pub flat_shading: bool,
    pub emissive: Option<Color>,
    pub shininess: f32,
    pub roughness: f32,
    pub metalness: f32,
    pub map: Option<TextureBinding>,
    disposed: AtomicBool,
}

impl Material {
    pub fn new(kind: MaterialKind, color: Color) -> Self {
        Self {
            kind,
            color,
            flat_shading: false,
            emissive: None,
            shininess: 30.0,
            roughness: 1.0,
            metalness: 0.0,
            map: None,
            disposed: AtomicBool::new(false),
        }
    }

    pub fn basic(color: Color) -> Self {
        Self::new(MaterialKind::Basic, color)
    }

    /// Release the native resources. Returns true the first time only.
    pub fn dispose(&self) -> bool {
        !self.disposed.swap(true, Ordering::AcqRel)
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }
}
