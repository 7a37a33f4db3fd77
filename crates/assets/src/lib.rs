//! Asset caches: reference-counted, keyed by filename.
//!
//! # Invariants
//! - One load per key per miss: concurrent acquires of an in-flight key
//!   block and share the published result.
//! - An entry is evicted and disposed exactly when its count reaches zero.
//! - A failed load leaves no entry behind.
//!
//! Each asset type gets its own cache instance rooted at its asset
//! directory (`assets/mdl`, `assets/img`, `assets/snd`). Caches are plain
//! services constructed by the application, not globals.

mod audio;
mod cache;
mod error;
mod model;
mod texture;

pub use audio::{AudioCache, AudioClip, AudioClipLoader};
pub use cache::{AssetLoader, ResourceCache};
pub use error::ResourceError;
pub use model::{DisposeStats, GltfModelLoader, Model, ModelCache, ModelNode, dispose_model};
pub use texture::{ImageTextureLoader, TextureCache};

pub fn crate_info() -> &'static str {
    "playspace-assets v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("assets"));
    }
}
