//! Model import (glTF/GLB/OBJ -> meshes + texture references)
//!
//! Every mesh is triangulated and carries positions, normals and UVs; attributes
//! the file lacks are filled with zeros. Texture files are only referenced here,
//! decoding is left to [`crate::texture`].

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use hashbrown::{HashMap, HashSet};
use lumen_geometry::Mesh;

use crate::texture::DecodedTexture;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Flip texture V (`v -> 1 - v`) for GL-style origins
    pub flip_uvs: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { flip_uvs: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TextureKind {
    Diffuse,
    Specular,
    Normal,
    Height,
}

impl TextureKind {
    /// Sampler base name in the model shaders
    pub fn sampler_name(self) -> &'static str {
        match self {
            TextureKind::Diffuse => "texture_diffuse",
            TextureKind::Specular => "texture_specular",
            TextureKind::Normal => "texture_normal",
            TextureKind::Height => "texture_height",
        }
    }
}

/// A texture file referenced by a material, path relative to the model
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextureRef {
    pub kind: TextureKind,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelMesh {
    pub name: String,
    pub mesh: Mesh,
    pub textures: Vec<TextureRef>,
}

impl ModelMesh {
    /// `(uniform name, unit)` for every texture, units assigned in order
    ///
    /// Names are `materials[N].texture_<kind>` with N counting textures of the
    /// same kind.
    pub fn sampler_bindings(&self) -> Vec<(String, u32)> {
        let mut per_kind: HashMap<TextureKind, u32> = HashMap::new();
        self.textures
            .iter()
            .enumerate()
            .map(|(unit, texture)| {
                let n = per_kind.entry(texture.kind).or_insert(0);
                let name = format!("materials[{}].{}", n, texture.kind.sampler_name());
                *n += 1;
                (name, unit as u32)
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    pub meshes: Vec<ModelMesh>,
    /// Each referenced texture once, in first-use order
    pub textures_loaded: Vec<TextureRef>,
    /// Directory texture paths are relative to
    pub directory: PathBuf,
}

impl Model {
    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(|m| m.mesh.vertex_count()).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|m| m.mesh.triangle_count()).sum()
    }

    /// All meshes concatenated into one
    pub fn merged(&self) -> Mesh {
        let mut merged = Mesh::new();
        for mesh in &self.meshes {
            merged.append(&mesh.mesh);
        }
        merged
    }

    pub fn texture_path(&self, texture: &TextureRef) -> PathBuf {
        self.directory.join(&texture.path)
    }

    /// Decode every referenced texture
    pub fn load_textures(&self, flip_vertically: bool) -> Result<Vec<DecodedTexture>> {
        self.textures_loaded
            .iter()
            .map(|texture| {
                let path = self.texture_path(texture);
                DecodedTexture::load(&path, flip_vertically)
                    .with_context(|| format!("Failed to load {:?} texture", texture.kind))
            })
            .collect()
    }

    fn push_mesh(&mut self, mesh: ModelMesh, seen: &mut HashSet<PathBuf>) {
        for texture in &mesh.textures {
            if seen.insert(texture.path.clone()) {
                self.textures_loaded.push(texture.clone());
            }
        }
        self.meshes.push(mesh);
    }
}

/// Load a model, choosing the importer by file extension
pub fn load_model(path: &Path, options: &LoadOptions) -> Result<Model> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    let model = match ext.as_str() {
        "obj" => load_obj(path, options)?,
        "gltf" | "glb" => load_gltf(path, options)?,
        _ => bail!(
            "Unsupported model format: {:?} (use .obj, .gltf, or .glb)",
            path
        ),
    };

    if model.meshes.is_empty() {
        bail!("No meshes found in {:?}", path);
    }

    tracing::info!(
        "Loaded model {:?}: {} meshes, {} vertices, {} triangles, {} textures",
        path,
        model.meshes.len(),
        model.vertex_count(),
        model.triangle_count(),
        model.textures_loaded.len()
    );
    Ok(model)
}

fn model_directory(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}

fn flip(uv: [f32; 2], options: &LoadOptions) -> [f32; 2] {
    if options.flip_uvs {
        [uv[0], 1.0 - uv[1]]
    } else {
        uv
    }
}

// =============================================================
// glTF
// =============================================================

fn load_gltf(path: &Path, options: &LoadOptions) -> Result<Model> {
    let gltf = gltf::Gltf::open(path).with_context(|| format!("Failed to load glTF: {:?}", path))?;
    let directory = model_directory(path);
    let buffers = gltf::import_buffers(&gltf.document, Some(directory.as_path()), gltf.blob.clone())
        .with_context(|| format!("Failed to load glTF buffers: {:?}", path))?;

    let mut model = Model {
        directory,
        ..Model::default()
    };
    let mut seen = HashSet::new();

    let roots: Vec<gltf::Node> = match gltf.document.default_scene().or_else(|| gltf.document.scenes().next()) {
        Some(scene) => scene.nodes().collect(),
        None => Vec::new(),
    };

    if roots.is_empty() {
        // No scene graph: take the meshes as listed
        for mesh in gltf.document.meshes() {
            for mesh in gltf_meshes(&mesh, &buffers, options)? {
                model.push_mesh(mesh, &mut seen);
            }
        }
    } else {
        let mut walk = NodeWalk {
            path,
            buffers: &buffers,
            options,
            visited: HashSet::new(),
        };
        for node in roots {
            walk.process_node(&node, &mut model, &mut seen)?;
        }
    }

    Ok(model)
}

/// Depth-first walk over the scene's node tree
struct NodeWalk<'a> {
    path: &'a Path,
    buffers: &'a [gltf::buffer::Data],
    options: &'a LoadOptions,
    /// Node indices already walked; a node reached twice means a cycle
    visited: HashSet<usize>,
}

impl NodeWalk<'_> {
    fn process_node(
        &mut self,
        node: &gltf::Node,
        model: &mut Model,
        seen: &mut HashSet<PathBuf>,
    ) -> Result<()> {
        if !self.visited.insert(node.index()) {
            bail!("Cyclic node hierarchy in {:?} (node {})", self.path, node.index());
        }
        if let Some(mesh) = node.mesh() {
            for mesh in gltf_meshes(&mesh, self.buffers, self.options)? {
                model.push_mesh(mesh, seen);
            }
        }
        for child in node.children() {
            self.process_node(&child, model, seen)?;
        }
        Ok(())
    }
}

/// One [`ModelMesh`] per triangle primitive
fn gltf_meshes(
    mesh: &gltf::Mesh,
    buffers: &[gltf::buffer::Data],
    options: &LoadOptions,
) -> Result<Vec<ModelMesh>> {
    let name = mesh
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("mesh{}", mesh.index()));
    let mut out = Vec::new();

    for primitive in mesh.primitives() {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            tracing::warn!(
                "Skipping primitive {} of {:?}: mode {:?} is not triangles",
                primitive.index(),
                name,
                primitive.mode()
            );
            continue;
        }

        let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

        let positions: Vec<[f32; 3]> = reader
            .read_positions()
            .with_context(|| format!("No positions in mesh {:?}", name))?
            .collect();
        let count = positions.len();

        let normals: Vec<[f32; 3]> = match reader.read_normals() {
            Some(iter) => iter.collect(),
            None => vec![[0.0; 3]; count],
        };
        let uvs: Vec<[f32; 2]> = match reader.read_tex_coords(0) {
            Some(iter) => iter.into_f32().map(|uv| flip(uv, options)).collect(),
            None => vec![[0.0; 2]; count],
        };
        let indices: Vec<u32> = match reader.read_indices() {
            Some(iter) => iter.into_u32().collect(),
            None => (0..count as u32).collect(),
        };

        if normals.len() != count || uvs.len() != count {
            bail!("Attribute count mismatch in mesh {:?}", name);
        }

        let mesh = Mesh {
            positions,
            normals,
            uvs,
            indices,
            line_indices: Vec::new(),
        };
        if !mesh.indices_in_bounds() {
            bail!("Index out of range in mesh {:?}", name);
        }

        out.push(ModelMesh {
            name: name.clone(),
            mesh,
            textures: gltf_textures(&primitive.material()),
        });
    }

    Ok(out)
}

fn gltf_textures(material: &gltf::Material) -> Vec<TextureRef> {
    let mut textures = Vec::new();
    let mut push = |kind: TextureKind, texture: gltf::Texture| match texture.source().source() {
        gltf::image::Source::Uri { uri, .. } => textures.push(TextureRef {
            kind,
            path: PathBuf::from(uri),
        }),
        gltf::image::Source::View { .. } => {
            tracing::debug!("Skipping embedded {:?} texture", kind);
        }
    };

    if let Some(info) = material.pbr_metallic_roughness().base_color_texture() {
        push(TextureKind::Diffuse, info.texture());
    }
    if let Some(normal) = material.normal_texture() {
        push(TextureKind::Normal, normal.texture());
    }
    textures
}

// =============================================================
// OBJ
// =============================================================

/// Texture maps declared in an .mtl file, keyed by material name
fn parse_mtl(path: &Path) -> Result<HashMap<String, Vec<TextureRef>>> {
    let file = File::open(path).with_context(|| format!("Failed to open MTL: {:?}", path))?;
    let reader = BufReader::new(file);

    let mut materials: HashMap<String, Vec<TextureRef>> = HashMap::new();
    let mut current: Option<String> = None;

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((keyword, rest)) = line.split_once(char::is_whitespace) else {
            continue;
        };
        let rest = rest.trim();

        let kind = match keyword {
            "newmtl" => {
                materials.entry(rest.to_string()).or_default();
                current = Some(rest.to_string());
                continue;
            }
            "map_Kd" => TextureKind::Diffuse,
            "map_Ks" => TextureKind::Specular,
            "norm" | "map_Kn" => TextureKind::Normal,
            "map_Bump" | "map_bump" | "bump" | "disp" => TextureKind::Height,
            _ => continue,
        };

        // Options like `-bm 1.0` precede the file name
        let Some(file_name) = rest.split_whitespace().last() else {
            continue;
        };
        if let Some(name) = &current {
            materials.entry(name.clone()).or_default().push(TextureRef {
                kind,
                path: PathBuf::from(file_name),
            });
        }
    }

    Ok(materials)
}

/// Resolve a 1-based (or negative, relative) OBJ index against `len` elements
fn resolve_index(s: &str, len: usize) -> Option<usize> {
    let i: i64 = s.parse().ok()?;
    if i > 0 {
        Some(i as usize - 1)
    } else if i < 0 {
        len.checked_sub(i.unsigned_abs() as usize)
    } else {
        None
    }
}

/// Parse OBJ vertex reference: "v", "v/vt", "v/vt/vn", or "v//vn"
fn parse_obj_vertex(
    s: &str,
    counts: (usize, usize, usize),
) -> Option<(usize, Option<usize>, Option<usize>)> {
    let mut parts = s.split('/');
    let vi = resolve_index(parts.next()?, counts.0)?;
    let vti = parts
        .next()
        .filter(|s| !s.is_empty())
        .and_then(|s| resolve_index(s, counts.1));
    let vni = parts
        .next()
        .filter(|s| !s.is_empty())
        .and_then(|s| resolve_index(s, counts.2));
    Some((vi, vti, vni))
}

fn load_obj(path: &Path, options: &LoadOptions) -> Result<Model> {
    let file = File::open(path).with_context(|| format!("Failed to open OBJ: {:?}", path))?;
    let reader = BufReader::new(file);
    let directory = model_directory(path);

    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut tex_coords: Vec<[f32; 2]> = Vec::new();
    let mut normals_raw: Vec<[f32; 3]> = Vec::new();

    let mut materials: HashMap<String, Vec<TextureRef>> = HashMap::new();
    let mut model = Model {
        directory: directory.clone(),
        ..Model::default()
    };
    let mut seen = HashSet::new();
    let mut current = ModelMesh {
        name: "default".to_string(),
        ..ModelMesh::default()
    };

    let parse_floats = |parts: &[&str]| -> Vec<f32> {
        parts.iter().map(|p| p.parse().unwrap_or(0.0)).collect()
    };

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts[0] {
            "v" if parts.len() >= 4 => {
                let v = parse_floats(&parts[1..4]);
                positions.push([v[0], v[1], v[2]]);
            }
            "vt" if parts.len() >= 3 => {
                let v = parse_floats(&parts[1..3]);
                tex_coords.push([v[0], v[1]]);
            }
            "vn" if parts.len() >= 4 => {
                let v = parse_floats(&parts[1..4]);
                normals_raw.push([v[0], v[1], v[2]]);
            }
            "mtllib" if parts.len() >= 2 => {
                let mtl_path = directory.join(parts[1..].join(" "));
                match parse_mtl(&mtl_path) {
                    Ok(parsed) => materials.extend(parsed),
                    Err(e) => tracing::warn!("Ignoring material library: {e:#}"),
                }
            }
            "o" | "g" => {
                let name = parts.get(1).copied().unwrap_or("default").to_string();
                if current.mesh.is_empty() {
                    current.name = name;
                } else {
                    let textures = current.textures.clone();
                    let finished = std::mem::replace(
                        &mut current,
                        ModelMesh {
                            name,
                            mesh: Mesh::new(),
                            textures,
                        },
                    );
                    model.push_mesh(finished, &mut seen);
                }
            }
            "usemtl" if parts.len() >= 2 => {
                let textures = materials.get(parts[1]).cloned().unwrap_or_default();
                if !current.mesh.is_empty() && current.textures != textures {
                    let name = current.name.clone();
                    let finished = std::mem::replace(
                        &mut current,
                        ModelMesh {
                            name,
                            mesh: Mesh::new(),
                            textures: Vec::new(),
                        },
                    );
                    model.push_mesh(finished, &mut seen);
                }
                current.textures = textures;
            }
            "f" if parts.len() >= 4 => {
                let counts = (positions.len(), tex_coords.len(), normals_raw.len());
                let face_verts: Vec<_> = parts[1..]
                    .iter()
                    .filter_map(|v| parse_obj_vertex(v, counts))
                    .collect();
                if face_verts.len() < 3 {
                    continue;
                }

                // Fan triangulation for convex polygons
                let mesh = &mut current.mesh;
                for i in 1..face_verts.len() - 1 {
                    for &idx in &[0, i, i + 1] {
                        let (vi, vti, vni) = face_verts[idx];
                        mesh.indices.push(mesh.positions.len() as u32);
                        mesh.positions
                            .push(positions.get(vi).copied().unwrap_or([0.0; 3]));
                        mesh.uvs.push(flip(
                            vti.and_then(|t| tex_coords.get(t).copied())
                                .unwrap_or([0.0; 2]),
                            options,
                        ));
                        mesh.normals.push(
                            vni.and_then(|n| normals_raw.get(n).copied())
                                .unwrap_or([0.0; 3]),
                        );
                    }
                }
            }
            _ => {}
        }
    }

    if !current.mesh.is_empty() {
        model.push_mesh(current, &mut seen);
    }

    Ok(model)
}
