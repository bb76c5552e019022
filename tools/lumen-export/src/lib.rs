//! lumen-export library
//!
//! Model import, texture decoding and OBJ writing shared by the `lumen-export`
//! binary and its tests.

pub mod model;
pub mod texture;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use lumen_geometry::{Mesh, write_obj};

pub use model::{LoadOptions, Model, ModelMesh, TextureKind, TextureRef, load_model};
pub use texture::{DecodedTexture, PixelFormat, SamplerDesc, TextureError, TextureUnits};

/// Write `mesh` to an OBJ file at `output`
pub fn export_obj(mesh: &Mesh, name: &str, output: &Path) -> Result<()> {
    let file =
        File::create(output).with_context(|| format!("Failed to create output: {:?}", output))?;
    let mut writer = BufWriter::new(file);
    write_obj(mesh, name, &mut writer)
        .and_then(|()| writer.flush())
        .with_context(|| format!("Failed to write OBJ: {:?}", output))?;

    tracing::info!(
        "Wrote {:?}: {} vertices, {} triangles",
        output,
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(())
}
