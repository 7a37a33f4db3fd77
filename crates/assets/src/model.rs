use crate::cache::{AssetLoader, ResourceCache};
use crate::error::ResourceError;
use glam::{EulerRot, Quat, Vec3};
use playspace_common::Transform;
use playspace_render::{
    Color, ColorSpace, Geometry, GeometryKind, Material, MaterialKind, MeshRef, Texture,
    TextureBinding,
};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

/// A loaded model: a prototype node tree instantiated into the scene graph
/// by whoever acquired it.
#[derive(Debug)]
pub struct Model {
    /// Source filename the model was cached under.
    pub name: String,
    pub root: ModelNode,
}

/// One node of a model's prototype tree.
#[derive(Debug)]
pub struct ModelNode {
    pub name: String,
    pub transform: Transform,
    pub mesh: Option<MeshRef>,
    pub children: Vec<ModelNode>,
}

/// Counts of sub-resources released by one disposal traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisposeStats {
    pub geometries: usize,
    pub materials: usize,
    pub textures: usize,
}

impl DisposeStats {
    pub fn total(&self) -> usize {
        self.geometries + self.materials + self.textures
    }
}

/// Dispose every geometry, material, and texture reachable from the model,
/// each exactly once.
///
/// Sub-resources may be aliased across sub-meshes (one material shared by
/// several nodes, one texture shared by several materials); a visited set
/// keyed by shared-pointer identity guards against double disposal.
pub fn dispose_model(model: &Model) -> DisposeStats {
    let mut stats = DisposeStats::default();
    let mut visited: HashSet<usize> = HashSet::new();
    dispose_node(&model.root, &mut visited, &mut stats);
    stats
}

fn dispose_node(node: &ModelNode, visited: &mut HashSet<usize>, stats: &mut DisposeStats) {
    if let Some(mesh) = &node.mesh {
        if visited.insert(Arc::as_ptr(&mesh.geometry) as usize) && mesh.geometry.dispose() {
            stats.geometries += 1;
        }
        if visited.insert(Arc::as_ptr(&mesh.material) as usize) {
            if let Some(binding) = &mesh.material.map {
                if visited.insert(Arc::as_ptr(&binding.texture) as usize)
                    && binding.texture.dispose()
                {
                    stats.textures += 1;
                }
            }
            if mesh.material.dispose() {
                stats.materials += 1;
            }
        }
    }
    for child in &node.children {
        dispose_node(child, visited, stats);
    }
}

/// Imports glTF files into [`Model`] trees.
///
/// Keeps the engine's loading convention: the model root is the first root
/// node of the default scene, not the scene itself.
pub struct GltfModelLoader;

impl AssetLoader for GltfModelLoader {
    type Asset = Model;

    fn load(&self, path: &Path) -> Result<Model, ResourceError> {
        let (document, _buffers, images) = gltf::import(path).map_err(|e| match e {
            gltf::Error::Io(io) => ResourceError::from_io(path.to_path_buf(), io),
            other => ResourceError::Decode {
                path: path.to_path_buf(),
                reason: other.to_string(),
            },
        })?;

        let scene = document
            .default_scene()
            .or_else(|| document.scenes().next())
            .ok_or_else(|| ResourceError::Decode {
                path: path.to_path_buf(),
                reason: "glTF file has no scene".into(),
            })?;
        let root_node = scene.nodes().next().ok_or_else(|| ResourceError::Decode {
            path: path.to_path_buf(),
            reason: "glTF default scene is empty".into(),
        })?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let root = build_node(&root_node, &images);
        tracing::debug!(model = %name, "model imported");
        Ok(Model { name, root })
    }

    fn dispose(&self, model: &Model) {
        let stats = dispose_model(model);
        tracing::debug!(model = %model.name, released = stats.total(), "model disposed");
    }
}

fn build_node(node: &gltf::Node<'_>, images: &[gltf::image::Data]) -> ModelNode {
    let (translation, rotation, scale) = node.transform().decomposed();
    let quat = Quat::from_xyzw(rotation[0], rotation[1], rotation[2], rotation[3]);
    let (rx, ry, rz) = quat.to_euler(EulerRot::XYZ);
    let transform = Transform {
        position: Vec3::from_array(translation),
        rotation: Vec3::new(rx, ry, rz),
        scale: Vec3::from_array(scale),
    };

    let mesh = node.mesh().map(|mesh| {
        let mut vertex_count = 0u32;
        let mut index_count = 0u32;
        for prim in mesh.primitives() {
            vertex_count += prim
                .get(&gltf::Semantic::Positions)
                .map(|a| a.count() as u32)
                .unwrap_or(0);
            index_count += prim.indices().map(|a| a.count() as u32).unwrap_or(0);
        }
        let material = mesh
            .primitives()
            .next()
            .map(|prim| build_material(&prim.material(), images))
            .unwrap_or_else(|| Material::basic(Color::WHITE));

        MeshRef {
            geometry: Arc::new(Geometry::new(GeometryKind::TriangleMesh {
                vertex_count,
                index_count,
            })),
            material: Arc::new(material),
        }
    });

    ModelNode {
        name: node.name().unwrap_or("node").to_string(),
        transform,
        mesh,
        children: node
            .children()
            .map(|child| build_node(&child, images))
            .collect(),
    }
}

fn build_material(material: &gltf::Material<'_>, images: &[gltf::image::Data]) -> Material {
    let pbr = material.pbr_metallic_roughness();
    let [r, g, b, _a] = pbr.base_color_factor();
    let mut out = Material::new(MaterialKind::Standard, Color::new(r, g, b));
    out.roughness = pbr.roughness_factor();
    out.metalness = pbr.metallic_factor();

    if let Some(info) = pbr.base_color_texture() {
        let source = info.texture().source();
        let (width, height) = images
            .get(source.index())
            .map(|img| (img.width, img.height))
            .unwrap_or((0, 0));
        let name = source
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("image_{}", source.index()));
        let mut binding = TextureBinding::new(Arc::new(Texture::new(name, width, height)));
        binding.color_space = ColorSpace::Srgb;
        out.map = Some(binding);
    }
    out
}

/// Model cache rooted at the models asset directory.
pub type ModelCache = ResourceCache<GltfModelLoader>;

impl ModelCache {
    /// Cache models under `<asset_root>/assets/mdl/`.
    pub fn open(asset_root: impl AsRef<Path>) -> Self {
        ResourceCache::new(GltfModelLoader, asset_root.as_ref().join("assets/mdl"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(name: &str, mesh: Option<MeshRef>) -> ModelNode {
        ModelNode {
            name: name.into(),
            transform: Transform::default(),
            mesh,
            children: Vec::new(),
        }
    }

    fn textured_mesh(material: Arc<Material>) -> MeshRef {
        MeshRef {
            geometry: Arc::new(Geometry::new(GeometryKind::TriangleMesh {
                vertex_count: 24,
                index_count: 36,
            })),
            material,
        }
    }

    #[test]
    fn dispose_shared_material_once() {
        let mut material = Material::new(MaterialKind::Standard, Color::WHITE);
        material.map = Some(TextureBinding::new(Arc::new(Texture::new("skin.png", 4, 4))));
        let material = Arc::new(material);

        // Two sub-meshes alias the same material (and through it the same
        // texture); each has its own geometry.
        let model = Model {
            name: "a.glb".into(),
            root: ModelNode {
                name: "root".into(),
                transform: Transform::default(),
                mesh: None,
                children: vec![
                    leaf("left", Some(textured_mesh(Arc::clone(&material)))),
                    leaf("right", Some(textured_mesh(Arc::clone(&material)))),
                ],
            },
        };

        let stats = dispose_model(&model);
        assert_eq!(stats.geometries, 2);
        assert_eq!(stats.materials, 1);
        assert_eq!(stats.textures, 1);
        assert!(material.is_disposed());
    }

    #[test]
    fn dispose_twice_releases_nothing_more() {
        let model = Model {
            name: "b.glb".into(),
            root: leaf(
                "only",
                Some(textured_mesh(Arc::new(Material::basic(Color::WHITE)))),
            ),
        };
        let first = dispose_model(&model);
        assert_eq!(first.total(), 2);
        let second = dispose_model(&model);
        assert_eq!(second.total(), 0);
    }

    #[test]
    fn gltf_import_reads_node_tree() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tree.gltf");
        std::fs::write(
            &path,
            r#"{
                "asset": {"version": "2.0"},
                "scene": 0,
                "scenes": [{"nodes": [0]}],
                "nodes": [
                    {"name": "trunk", "translation": [1.0, 2.0, 3.0], "children": [1]},
                    {"name": "crown", "translation": [0.0, 1.5, 0.0]}
                ]
            }"#,
        )
        .unwrap();

        let model = GltfModelLoader.load(&path).unwrap();
        assert_eq!(model.name, "tree.gltf");
        assert_eq!(model.root.name, "trunk");
        assert_eq!(model.root.transform.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(model.root.children.len(), 1);
        assert_eq!(model.root.children[0].name, "crown");
    }

    #[test]
    fn gltf_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = GltfModelLoader
            .load(&dir.path().join("absent.gltf"))
            .unwrap_err();
        assert!(matches!(err, ResourceError::NotFound { .. }));
    }

    #[test]
    fn model_cache_roots_under_mdl() {
        let cache = ModelCache::open("/game");
        assert!(cache.base_path().ends_with("assets/mdl"));
    }
}
