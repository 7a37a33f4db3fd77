use crate::cache::{AssetLoader, ResourceCache};
use crate::error::ResourceError;
use std::path::Path;

/// An opaque audio clip.
///
/// Decoding and mixing are a playback backend's concern; the cache only
/// keys, counts, and hands out the raw bytes.
#[derive(Debug)]
pub struct AudioClip {
    pub name: String,
    pub data: Vec<u8>,
}

impl AudioClip {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Reads audio files as opaque clips.
pub struct AudioClipLoader;

impl AssetLoader for AudioClipLoader {
    type Asset = AudioClip;

    fn load(&self, path: &Path) -> Result<AudioClip, ResourceError> {
        let data =
            std::fs::read(path).map_err(|e| ResourceError::from_io(path.to_path_buf(), e))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        tracing::debug!(clip = %name, bytes = data.len(), "audio clip read");
        Ok(AudioClip { name, data })
    }
}

/// Audio cache rooted at the sound asset directory.
pub type AudioCache = ResourceCache<AudioClipLoader>;

impl AudioCache {
    /// Cache clips under `<asset_root>/assets/snd/`.
    pub fn open(asset_root: impl AsRef<Path>) -> Self {
        ResourceCache::new(AudioClipLoader, asset_root.as_ref().join("assets/snd"))
    }
}
