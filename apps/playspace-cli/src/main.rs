use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glam::{Quat, Vec3};
use playspace_assets::{ModelCache, TextureCache};
use playspace_builder::{LevelDoc, WorldBuilder};
use playspace_locomotion::{
    ControllerFrame, ControllerPose, DashMove, MovementMode, PlayerRig, Teleporter,
};
use playspace_physics::{BodyDesc, CollisionShape};
use playspace_render::{DebugTextRenderer, RenderView};
use playspace_scene::{Entity, GameScene};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "playspace-cli", about = "Headless driver for playspace levels")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print engine version and crate info
    Info,
    /// Parse a level document and check its cross-references
    Validate {
        /// Level file inside the levels directory
        level: String,
        /// Directory holding level documents
        #[arg(long, default_value = "./levels")]
        levels_dir: String,
    },
    /// Build a level and run the scene headless
    Run {
        /// Level file inside the levels directory
        level: String,
        /// Directory holding level documents
        #[arg(long, default_value = "./levels")]
        levels_dir: String,
        /// Root directory containing assets/mdl, assets/img, assets/snd
        #[arg(long, default_value = ".")]
        asset_root: String,
        /// Number of frames to simulate
        #[arg(short, long, default_value = "60")]
        ticks: u64,
        /// Mirror collision shapes as debug nodes in the dump
        #[arg(long)]
        debug_collisions: bool,
    },
    /// Run a canned teleport-and-dash locomotion demo
    Locomotion {
        /// Number of frames to simulate after the teleport
        #[arg(short, long, default_value = "30")]
        ticks: u64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("playspace-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("render: {}", playspace_render::crate_info());
            println!("physics: {}", playspace_physics::crate_info());
            println!("assets: {}", playspace_assets::crate_info());
            println!("scene: {}", playspace_scene::crate_info());
            println!("builder: {}", playspace_builder::crate_info());
            println!("locomotion: {}", playspace_locomotion::crate_info());
        }
        Commands::Validate { level, levels_dir } => {
            let path = std::path::Path::new(&levels_dir).join(&level);
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            let doc: LevelDoc = serde_json::from_str(&text)
                .with_context(|| format!("parsing {}", path.display()))?;
            playspace_builder::validate(&doc)?;
            println!(
                "{}: OK ({} meshes, {} entities, {} materials, {} geometries)",
                level,
                doc.world_geometry.len(),
                doc.entity_list.len(),
                doc.materials.len(),
                doc.geometries.len()
            );
        }
        Commands::Run {
            level,
            levels_dir,
            asset_root,
            ticks,
            debug_collisions,
        } => {
            let models = ModelCache::open(&asset_root);
            let textures = TextureCache::open(&asset_root);
            let mut scene = GameScene::new();
            scene.set_debug_collisions(debug_collisions);

            let mut builder = WorldBuilder::new(&levels_dir);
            builder
                .load_level(&level, &mut scene, &models, &textures)
                .with_context(|| format!("building level {level}"))?;

            let dt = f64::from(scene.physics().timestep());
            for i in 0..ticks {
                scene.update(i as f64 * dt);
            }

            let output = scene.render(&DebugTextRenderer::new(), &RenderView::default());
            println!("{output}");
            println!(
                "Simulated {ticks} frames ({} entities, {} bodies)",
                scene.entity_count(),
                scene.physics().body_count()
            );
        }
        Commands::Locomotion { ticks } => {
            // A floor the teleporter accepts, and a bodiless player rig.
            let mut scene = GameScene::new();
            let mut floor = Entity::new(Vec3::ZERO);
            floor.set_name("TELEPORTABLE_floor");
            floor.set_body_desc(BodyDesc::fixed(CollisionShape::Cuboid {
                half_extents: Vec3::new(10.0, 0.1, 10.0),
            }));
            scene.add_entity(floor);

            let player = scene.add_entity(Entity::new(Vec3::ZERO));
            let mut rig = PlayerRig::new(
                player,
                MovementMode::Dash {
                    teleporter: Teleporter::new(20.0),
                    dash: DashMove::default(),
                },
            );

            // Point down-forward from shoulder height and pull the trigger.
            let pose = ControllerPose {
                position: Vec3::new(0.0, 1.6, 0.0),
                orientation: Quat::from_rotation_x(-std::f32::consts::FRAC_PI_4),
            };
            let dt = f64::from(scene.physics().timestep());
            rig.update(
                &mut scene,
                &ControllerFrame {
                    pose,
                    select_pressed: true,
                    ..Default::default()
                },
                dt as f32,
            );
            rig.update(
                &mut scene,
                &ControllerFrame {
                    pose,
                    select_released: true,
                    ..Default::default()
                },
                dt as f32,
            );

            for i in 0..ticks {
                scene.update(i as f64 * dt);
                rig.update(&mut scene, &ControllerFrame::default(), dt as f32);
                let p = scene
                    .entity(player)
                    .map(|e| e.origin())
                    .unwrap_or(Vec3::ZERO);
                println!("frame {i:>3}: player at ({:.2}, {:.2}, {:.2})", p.x, p.y, p.z);
            }
        }
    }

    Ok(())
}
