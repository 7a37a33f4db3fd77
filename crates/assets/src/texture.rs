use crate::cache::{AssetLoader, ResourceCache};
use crate::error::ResourceError;
use playspace_render::Texture;
use std::path::Path;

/// Decodes image files into shared [`Texture`] resources.
pub struct ImageTextureLoader;

impl AssetLoader for ImageTextureLoader {
    type Asset = Texture;

    fn load(&self, path: &Path) -> Result<Texture, ResourceError> {
        let img = image::open(path).map_err(|e| match e {
            image::ImageError::IoError(io) => ResourceError::from_io(path.to_path_buf(), io),
            other => ResourceError::Decode {
                path: path.to_path_buf(),
                reason: other.to_string(),
            },
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        tracing::debug!(texture = %name, width = img.width(), height = img.height(), "texture decoded");
        Ok(Texture::new(name, img.width(), img.height()))
    }

    fn dispose(&self, texture: &Texture) {
        texture.dispose();
        tracing::debug!(texture = %texture.name(), "texture disposed");
    }
}

/// Texture cache rooted at the image asset directory.
pub type TextureCache = ResourceCache<ImageTextureLoader>;

impl TextureCache {
    /// Cache textures under `<asset_root>/assets/img/`.
    pub fn open(asset_root: impl AsRef<Path>) -> Self {
        ResourceCache::new(ImageTextureLoader, asset_root.as_ref().join("assets/img"))
    }
}
