//! lumen-export - lumen asset tool
//!
//! Generates procedural meshes, converts models to OBJ, inspects textures and
//! prints the uniform set of a configured scene.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lumen_geometry::{AxisConvention, CountPolicy, Mesh, SphereMesh, SphereParams, generate_cube};
use lumen_scene::{SceneConfig, SceneObject, scene_uniforms};
use std::path::PathBuf;

use lumen_export::{DecodedTexture, LoadOptions, export_obj, load_model};

#[derive(Parser)]
#[command(name = "lumen-export")]
#[command(about = "lumen asset tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a UV sphere as OBJ
    Sphere {
        #[arg(long, default_value_t = 1.0)]
        radius: f32,

        /// Longitude divisions
        #[arg(long, default_value_t = 36)]
        sectors: u32,

        /// Latitude divisions
        #[arg(long, default_value_t = 18)]
        stacks: u32,

        /// Put the poles on ±Y instead of ±Z
        #[arg(long)]
        y_up: bool,

        /// Raise too-small counts to the minimum instead of failing
        #[arg(long)]
        clamp: bool,

        /// Output .obj file
        #[arg(short, long, default_value = "sphere.obj")]
        output: PathBuf,
    },

    /// Generate an axis-aligned cube as OBJ
    Cube {
        #[arg(long, default_value_t = 0.5)]
        half_extent: f32,

        /// Output .obj file
        #[arg(short, long, default_value = "cube.obj")]
        output: PathBuf,
    },

    /// Import a model (glTF/GLB/OBJ) and write all its meshes as one OBJ
    Model {
        /// Input model file
        input: PathBuf,

        /// Output .obj file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Keep texture V as stored in the file
        #[arg(long)]
        no_flip_uvs: bool,

        /// Also decode every referenced texture
        #[arg(long)]
        check_textures: bool,
    },

    /// Decode an image and print its layout
    Texture {
        /// Input PNG/JPG file
        input: PathBuf,

        /// Keep the first row at the top
        #[arg(long)]
        no_flip: bool,
    },

    /// Print the uniform set of the configured scene
    Uniforms {
        /// Scene config (default: config.toml in the platform config dir)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Sphere {
            radius,
            sectors,
            stacks,
            y_up,
            clamp,
            output,
        } => {
            let axis = if y_up {
                AxisConvention::YUp
            } else {
                AxisConvention::ZUp
            };
            let policy = if clamp {
                CountPolicy::Clamp
            } else {
                CountPolicy::Reject
            };
            let params = SphereParams::new(radius, sectors, stacks)
                .with_axis(axis)
                .with_count_policy(policy);
            let sphere = SphereMesh::build(params).context("Failed to generate sphere")?;
            export_obj(sphere.mesh(), "sphere", &output)?;
        }

        Commands::Cube {
            half_extent,
            output,
        } => {
            let mesh: Mesh = generate_cube(half_extent).context("Failed to generate cube")?;
            export_obj(&mesh, "cube", &output)?;
        }

        Commands::Model {
            input,
            output,
            no_flip_uvs,
            check_textures,
        } => {
            let output = output.unwrap_or_else(|| input.with_extension("export.obj"));
            tracing::info!("Converting {:?} -> {:?}", input, output);

            let options = LoadOptions {
                flip_uvs: !no_flip_uvs,
            };
            let model = load_model(&input, &options)?;
            for mesh in &model.meshes {
                for (name, unit) in mesh.sampler_bindings() {
                    tracing::debug!("{}: {} -> unit {}", mesh.name, name, unit);
                }
            }
            if check_textures {
                let textures = model.load_textures(!no_flip_uvs)?;
                tracing::info!("Decoded {} textures", textures.len());
            }

            let name = input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("model");
            export_obj(&model.merged(), name, &output)?;
        }

        Commands::Texture { input, no_flip } => {
            let texture = DecodedTexture::load(&input, !no_flip)?;
            println!(
                "{}x{} {:?}, {} bytes",
                texture.width,
                texture.height,
                texture.format,
                texture.pixels.len()
            );
        }

        Commands::Uniforms { config } => {
            let config = match config {
                Some(path) => SceneConfig::load_from(&path)
                    .with_context(|| format!("Failed to load scene config: {:?}", path))?,
                None => SceneConfig::load(),
            };

            let frame = config.build_frame();
            let lights = config.build_lights(&frame.camera);
            let object = SceneObject {
                material: config.build_material()?,
                ..SceneObject::default()
            };

            for (name, value) in scene_uniforms(&frame, &lights, &object).sorted() {
                println!("{name} = {value}");
            }
        }
    }

    Ok(())
}
