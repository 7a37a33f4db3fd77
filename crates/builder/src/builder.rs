use crate::error::BuildError;
use crate::schema::{ColorSpec, LevelDoc, MaterialKindSpec, Vec3Spec, WrapSpec};
use glam::Vec3;
use playspace_assets::{AssetLoader, Model, ResourceCache};
use playspace_common::Transform;
use playspace_physics::{BodyDesc, CollisionShape};
use playspace_render::{
    Color, ColorSpace, Geometry, GeometryKind, Material, MeshRef, Node, SceneGraph, Texture,
    TextureBinding,
};
use playspace_scene::{Entity, GameScene};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

struct LoadedModel {
    /// Held so the model stays resident across the whole build.
    #[allow(dead_code)]
    handle: Arc<Model>,
    filename: String,
    scale: f32,
}

/// Instantiates level documents into a [`GameScene`].
///
/// A builder owns its own name tables, so separate levels load through
/// separate builders without interference. One builder handles one level
/// at a time; its tables are reset at the start of every build.
pub struct WorldBuilder {
    levels_path: PathBuf,
    textures: BTreeMap<String, TextureBinding>,
    models: BTreeMap<String, LoadedModel>,
    materials: BTreeMap<String, Arc<Material>>,
    geometries: BTreeMap<String, Arc<Geometry>>,
}

impl WorldBuilder {
    pub fn new(levels_path: impl Into<PathBuf>) -> Self {
        Self {
            levels_path: levels_path.into(),
            textures: BTreeMap::new(),
            models: BTreeMap::new(),
            materials: BTreeMap::new(),
            geometries: BTreeMap::new(),
        }
    }

    /// Read, parse, and build a level document from the levels directory.
    pub fn load_level<M, T>(
        &mut self,
        filename: &str,
        scene: &mut GameScene,
        models: &ResourceCache<M>,
        textures: &ResourceCache<T>,
    ) -> Result<(), BuildError>
    where
        M: AssetLoader<Asset = Model>,
        T: AssetLoader<Asset = Texture>,
    {
        let path = self.levels_path.join(filename);
        tracing::info!(level = %path.display(), "loading level");
        let text = std::fs::read_to_string(&path).map_err(|e| BuildError::Io {
            path: path.clone(),
            source: e,
        })?;
        let doc: LevelDoc =
            serde_json::from_str(&text).map_err(|e| BuildError::Json { path, source: e })?;
        self.build(&doc, scene, models, textures)
    }

    /// Instantiate an already-parsed document into the scene.
    ///
    /// Stages run strictly in order; any unresolved cross-reference or
    /// failed resource load aborts the whole build.
    pub fn build<M, T>(
        &mut self,
        doc: &LevelDoc,
        scene: &mut GameScene,
        models: &ResourceCache<M>,
        textures: &ResourceCache<T>,
    ) -> Result<(), BuildError>
    where
        M: AssetLoader<Asset = Model>,
        T: AssetLoader<Asset = Texture>,
    {
        self.textures.clear();
        self.models.clear();
        self.materials.clear();
        self.geometries.clear();

        self.load_background(doc, scene, textures)?;
        self.load_textures(doc, textures)?;
        self.load_models(doc, models)?;
        self.setup_materials(doc)?;
        self.setup_geometries(doc);
        self.init_meshes(doc, scene)?;
        self.init_entities(doc, scene)?;
        scene.load(models);

        tracing::info!(
            meshes = doc.world_geometry.len(),
            entities = doc.entity_list.len(),
            "level built"
        );
        Ok(())
    }

    fn load_background<T>(
        &mut self,
        doc: &LevelDoc,
        scene: &mut GameScene,
        textures: &ResourceCache<T>,
    ) -> Result<(), BuildError>
    where
        T: AssetLoader<Asset = Texture>,
    {
        let Some(bg) = &doc.background else {
            return Ok(());
        };
        let texture = textures.acquire(&bg.filename)?;
        let mut binding = TextureBinding::new(texture);
        binding.color_space = ColorSpace::Srgb;
        binding.mapping = bg.mapping.to_mapping();
        scene.set_background(Some(binding));
        Ok(())
    }

    fn load_textures<T>(
        &mut self,
        doc: &LevelDoc,
        textures: &ResourceCache<T>,
    ) -> Result<(), BuildError>
    where
        T: AssetLoader<Asset = Texture>,
    {
        for (name, spec) in &doc.textures {
            let texture = textures.acquire(&spec.filename)?;
            let mut binding = TextureBinding::new(texture);
            binding.color_space = ColorSpace::Srgb;
            if let Some(mapping) = spec.mapping {
                binding.mapping = mapping.to_mapping();
            }
            binding.wrap_s = spec.wrap_s.map(WrapSpec::to_wrap).unwrap_or_default();
            binding.wrap_t = spec.wrap_t.map(WrapSpec::to_wrap).unwrap_or_default();
            if let Some(repeat) = spec.repeat {
                // Zero repeat counts collapse UVs; treat them as unset.
                binding.repeat.x = if repeat.x == 0.0 { 1.0 } else { repeat.x };
                binding.repeat.y = if repeat.y == 0.0 { 1.0 } else { repeat.y };
            }
            self.textures.insert(name.clone(), binding);
        }
        Ok(())
    }

    fn load_models<M>(&mut self, doc: &LevelDoc, models: &ResourceCache<M>) -> Result<(), BuildError>
    where
        M: AssetLoader<Asset = Model>,
    {
        for (name, spec) in &doc.models {
            let handle = models.acquire(&spec.filename)?;
            self.models.insert(
                name.clone(),
                LoadedModel {
                    handle,
                    filename: spec.filename.clone(),
                    scale: spec.scale,
                },
            );
        }
        Ok(())
    }

    fn setup_materials(&mut self, doc: &LevelDoc) -> Result<(), BuildError> {
        for (name, spec) in &doc.materials {
            let owner = || format!("material '{name}'");
            let color = match &spec.color {
                Some(c) => parse_color(c, owner())?,
                None => Color::WHITE,
            };
            let mut material = Material::new(spec.kind.to_kind(), color);

            // Tiered property application: each tier extends the previous.
            if spec.kind != MaterialKindSpec::Basic {
                material.flat_shading = spec.flat_shading.unwrap_or(false);
                material.emissive = match &spec.emissive {
                    Some(c) => Some(parse_color(c, owner())?),
                    None => None,
                };
            }
            if matches!(
                spec.kind,
                MaterialKindSpec::Phong | MaterialKindSpec::Standard
            ) {
                if let Some(shininess) = spec.shininess {
                    material.shininess = shininess;
                }
            }
            if spec.kind == MaterialKindSpec::Standard {
                if let Some(roughness) = spec.roughness {
                    material.roughness = roughness;
                }
                if let Some(metalness) = spec.metalness {
                    material.metalness = metalness;
                }
            }

            if let Some(map) = &spec.map {
                let binding =
                    self.textures
                        .get(map)
                        .ok_or_else(|| BuildError::UnresolvedReference {
                            kind: "texture",
                            key: map.clone(),
                            owner: owner(),
                        })?;
                material.map = Some(binding.clone());
            }

            self.materials.insert(name.clone(), Arc::new(material));
        }
        Ok(())
    }

    fn setup_geometries(&mut self, doc: &LevelDoc) {
        for (name, spec) in &doc.geometries {
            self.geometries
                .insert(name.clone(), Arc::new(Geometry::new(spec.to_kind())));
        }
    }

    fn init_meshes(&mut self, doc: &LevelDoc, scene: &mut GameScene) -> Result<(), BuildError> {
        for spec in &doc.world_geometry {
            let owner = || format!("mesh '{}'", spec.mesh_name);
            let geometry = self.geometries.get(&spec.geometry).ok_or_else(|| {
                BuildError::UnresolvedReference {
                    kind: "geometry",
                    key: spec.geometry.clone(),
                    owner: owner(),
                }
            })?;
            let material = self.materials.get(&spec.material).ok_or_else(|| {
                BuildError::UnresolvedReference {
                    kind: "material",
                    key: spec.material.clone(),
                    owner: owner(),
                }
            })?;
            let position = spec.position.to_vec3();
            let rotation = spec.rotation.to_vec3();

            // The node stays hidden until fully configured, so a partially
            // textured mesh never shows for a frame.
            let mut node = Node::new(spec.mesh_name.clone())
                .with_transform(Transform {
                    position,
                    rotation,
                    scale: Vec3::ONE,
                })
                .with_mesh(MeshRef {
                    geometry: Arc::clone(geometry),
                    material: Arc::clone(material),
                });
            node.visible = false;
            let node_id = scene.add_to_world(node)?;

            let mut entity = Entity::new(position);
            entity.set_name(spec.mesh_name.clone());
            entity.set_rotation(rotation);
            entity.set_visual(node_id);

            if let Some(collision) = &spec.collision {
                let shape = if collision.copy_from_geometry {
                    collision_shape_from_geometry(geometry.kind())
                } else {
                    // World-mesh boundaries are full extents.
                    let boundaries = collision.boundaries.unwrap_or_default().to_vec3();
                    CollisionShape::Cuboid {
                        half_extents: boundaries / 2.0,
                    }
                };
                let body_rotation = collision
                    .rotation
                    .map(Vec3Spec::to_vec3)
                    .unwrap_or(rotation);
                let offset = collision.offset.map(Vec3Spec::to_vec3).unwrap_or(Vec3::ZERO);
                entity.set_body_desc(
                    BodyDesc::fixed(shape)
                        .at(position)
                        .rotated(body_rotation)
                        .offset(offset),
                );
            }

            reveal_mesh(scene.graph_mut(), node_id, spec.cast_shadow, spec.receive_shadow);
            scene.add_entity(entity);
        }
        Ok(())
    }

    fn init_entities(&mut self, doc: &LevelDoc, scene: &mut GameScene) -> Result<(), BuildError> {
        for spec in &doc.entity_list {
            let origin = spec.origin.to_vec3();
            let mut entity = Entity::new(origin);
            entity.set_name(spec.ent_name.clone());
            entity.set_rotation(spec.rotation.to_vec3());
            entity.set_process_mode(spec.process_mode);

            if let Some(collision) = &spec.collision {
                if let Some(boundaries) = collision.boundaries {
                    // Entity boundaries are already half extents.
                    let offset = collision.offset.map(Vec3Spec::to_vec3).unwrap_or(Vec3::ZERO);
                    entity.set_body_desc(
                        BodyDesc::dynamic(CollisionShape::Cuboid {
                            half_extents: boundaries.to_vec3(),
                        })
                        .at(origin)
                        .offset(offset),
                    );
                }
            }

            if let Some(model_key) = &spec.model {
                let model = self.models.get(model_key).ok_or_else(|| {
                    BuildError::UnresolvedReference {
                        kind: "model",
                        key: model_key.clone(),
                        owner: format!("entity '{}'", spec.ent_name),
                    }
                })?;
                entity.set_model_name(model.filename.clone());
                entity.set_scale(model.scale);
            }

            scene.add_entity(entity);
        }
        Ok(())
    }
}

/// Check every cross-reference in a parsed document without touching
/// resources or a scene. The build performs the same checks as it resolves;
/// this is the cheap standalone pass for tooling.
pub fn validate(doc: &LevelDoc) -> Result<(), BuildError> {
    for (name, material) in &doc.materials {
        if let Some(map) = &material.map {
            if !doc.textures.contains_key(map) {
                return Err(BuildError::UnresolvedReference {
                    kind: "texture",
                    key: map.clone(),
                    owner: format!("material '{name}'"),
                });
            }
        }
        if let Some(color) = &material.color {
            parse_color(color, format!("material '{name}'"))?;
        }
    }
    for mesh in &doc.world_geometry {
        let owner = || format!("mesh '{}'", mesh.mesh_name);
        if !doc.geometries.contains_key(&mesh.geometry) {
            return Err(BuildError::UnresolvedReference {
                kind: "geometry",
                key: mesh.geometry.clone(),
                owner: owner(),
            });
        }
        if !doc.materials.contains_key(&mesh.material) {
            return Err(BuildError::UnresolvedReference {
                kind: "material",
                key: mesh.material.clone(),
                owner: owner(),
            });
        }
    }
    for entity in &doc.entity_list {
        if let Some(model) = &entity.model {
            if !doc.models.contains_key(model) {
                return Err(BuildError::UnresolvedReference {
                    kind: "model",
                    key: model.clone(),
                    owner: format!("entity '{}'", entity.ent_name),
                });
            }
        }
    }
    Ok(())
}

fn reveal_mesh(graph: &mut SceneGraph, id: playspace_render::NodeId, cast: bool, receive: bool) {
    if let Some(node) = graph.node_mut(id) {
        node.cast_shadow = cast;
        node.receive_shadow = receive;
        node.visible = true;
    }
}

fn parse_color(spec: &ColorSpec, owner: String) -> Result<Color, BuildError> {
    spec.to_color().ok_or_else(|| BuildError::InvalidColor {
        value: match spec {
            ColorSpec::Packed(value) => format!("{value:#x}"),
            ColorSpec::Text(text) => text.clone(),
        },
        owner,
    })
}

/// Per-type mapping from a visual geometry to a collision shape.
///
/// Planes become a thin box so they still block along their face; types
/// with no box-like dimensions fall back to a unit-ish box.
fn collision_shape_from_geometry(kind: GeometryKind) -> CollisionShape {
    match kind {
        GeometryKind::Box {
            width,
            height,
            depth,
        } => CollisionShape::Cuboid {
            half_extents: Vec3::new(width / 2.0, height / 2.0, depth / 2.0),
        },
        GeometryKind::Plane { width, height } => CollisionShape::Cuboid {
            half_extents: Vec3::new(width / 2.0, height / 2.0, 0.001),
        },
        GeometryKind::Sphere { radius, .. } => CollisionShape::Ball { radius },
        GeometryKind::Cylinder {
            radius_top, height, ..
        } => CollisionShape::Cylinder {
            half_height: height / 2.0,
            radius: radius_top,
        },
        GeometryKind::Cone { height, .. } => CollisionShape::Cuboid {
            half_extents: Vec3::new(0.5, height / 2.0, 0.5),
        },
        GeometryKind::Circle { .. }
        | GeometryKind::Torus { .. }
        | GeometryKind::TriangleMesh { .. } => CollisionShape::Cuboid {
            half_extents: Vec3::splat(0.5),
        },
    }
}
