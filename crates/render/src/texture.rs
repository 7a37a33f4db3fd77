use glam::Vec2;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// How a texture is projected when used as a background or environment map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextureMapping {
    #[default]
    Uv,
    CubeReflection,
    EquirectangularReflection,
}

/// Wrapping behavior outside the [0, 1] UV range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WrapMode {
    Repeat,
    #[default]
    ClampToEdge,
    MirroredRepeat,
}

/// Color space the texel data is encoded in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorSpace {
    #[default]
    Linear,
    Srgb,
}

/// A shared image resource.
///
/// Sampling state lives in [`TextureBinding`], not here: the texture may be
/// shared by any number of consumers, and one consumer's wrap settings must
/// not leak into another's.
#[derive(Debug)]
pub struct Texture {
    name: String,
    width: u32,
    height: u32,
    disposed: AtomicBool,
}

impl Texture {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            disposed: AtomicBool::new(false),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Release the native resources. Returns true the first time only.
    pub fn dispose(&self) -> bool {
        !self.disposed.swap(true, Ordering::AcqRel)
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }
}

/// Per-use sampling state for a shared [`Texture`].
#[derive(Debug, Clone)]
pub struct TextureBinding {
    pub texture: Arc<Texture>,
    pub color_space: ColorSpace,
    pub mapping: TextureMapping,
    pub wrap_s: WrapMode,
    pub wrap_t: WrapMode,
    pub repeat: Vec2,
}

impl TextureBinding {
    pub fn new(texture: Arc<Texture>) -> Self {
        Self {
            texture,
            color_space: ColorSpace::default(),
            mapping: TextureMapping::default(),
            wrap_s: WrapMode::default(),
            wrap_t: WrapMode::default(),
            repeat: Vec2::ONE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_defaults() {
        let tex = Arc::new(Texture::new("grass.png", 64, 64));
        let binding = TextureBinding::new(tex.clone());
        assert_eq!(binding.wrap_s, WrapMode::ClampToEdge);
        assert_eq!(binding.repeat, Vec2::ONE);
        assert_eq!(binding.texture.name(), "grass.png");
    }

    #[test]
    fn bindings_share_one_texture() {
        let tex = Arc::new(Texture::new("shared.png", 8, 8));
        let a = TextureBinding::new(tex.clone());
        let mut b = TextureBinding::new(tex.clone());
        b.wrap_s = WrapMode::Repeat;
        // Sampling state diverges, the underlying image does not.
        assert!(Arc::ptr_eq(&a.texture, &b.texture));
        assert_ne!(a.wrap_s, b.wrap_s);
    }

    #[test]
    fn texture_dispose_once() {
        let tex = Texture::new("t.png", 4, 4);
        assert!(tex.dispose());
        assert!(!tex.dispose());
    }
}
