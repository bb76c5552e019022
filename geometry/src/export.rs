//! Wavefront OBJ export

use std::io::{self, Write};

use crate::types::Mesh;

/// Write a mesh as Wavefront OBJ
///
/// Emits `v`, `vt` (when the mesh has UVs), `vn`, and one `f` line per
/// triangle with 1-based indices. Line indices are written as `l` records.
pub fn write_obj<W: Write>(mesh: &Mesh, name: &str, writer: &mut W) -> io::Result<()> {
    writeln!(writer, "# {} vertices, {} triangles", mesh.vertex_count(), mesh.triangle_count())?;
    writeln!(writer, "o {name}")?;

    for [x, y, z] in &mesh.positions {
        writeln!(writer, "v {x:.6} {y:.6} {z:.6}")?;
    }

    let has_uvs = mesh.has_uvs();
    if has_uvs {
        for [u, v] in &mesh.uvs {
            writeln!(writer, "vt {u:.6} {v:.6}")?;
        }
    }

    for [x, y, z] in &mesh.normals {
        writeln!(writer, "vn {x:.6} {y:.6} {z:.6}")?;
    }

    for tri in mesh.indices.chunks_exact(3) {
        let (a, b, c) = (tri[0] + 1, tri[1] + 1, tri[2] + 1);
        if has_uvs {
            writeln!(writer, "f {a}/{a}/{a} {b}/{b}/{b} {c}/{c}/{c}")?;
        } else {
            writeln!(writer, "f {a}//{a} {b}//{b} {c}//{c}")?;
        }
    }

    for line in mesh.line_indices.chunks_exact(2) {
        writeln!(writer, "l {} {}", line[0] + 1, line[1] + 1)?;
    }

    Ok(())
}
