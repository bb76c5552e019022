//! Surface materials
//!
//! [`Material`] is resolved once when uniforms are written: plain colors for the
//! lighting demos, sampler units for the lighting-map demos.

use std::fmt;
use std::str::FromStr;

use glam::Vec3;

use crate::uniform::UniformSink;

/// Phong material with constant colors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMaterial {
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub shininess: f32,
}

impl Default for ColorMaterial {
    /// Coral, as in the basic lighting demo
    fn default() -> Self {
        Self {
            ambient: Vec3::new(1.0, 0.5, 0.31),
            diffuse: Vec3::new(1.0, 0.5, 0.31),
            specular: Vec3::splat(0.5),
            shininess: 32.0,
        }
    }
}

/// Backend texture object, opaque to this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(pub u32);

/// A texture bound to a sampler unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureSlot {
    pub unit: u32,
    pub texture: TextureHandle,
}

impl TextureSlot {
    pub fn new(unit: u32, texture: TextureHandle) -> Self {
        Self { unit, texture }
    }
}

/// Phong material driven by diffuse/specular (and optional emission) maps
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TexturedMaterial {
    pub diffuse: TextureSlot,
    pub specular: TextureSlot,
    pub emission: Option<TextureSlot>,
    pub shininess: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    Basic(ColorMaterial),
    Textured(TexturedMaterial),
}

impl Default for Material {
    fn default() -> Self {
        Material::Basic(ColorMaterial::default())
    }
}

impl From<ColorMaterial> for Material {
    fn from(material: ColorMaterial) -> Self {
        Material::Basic(material)
    }
}

impl From<TexturedMaterial> for Material {
    fn from(material: TexturedMaterial) -> Self {
        Material::Textured(material)
    }
}

impl From<MaterialPreset> for Material {
    fn from(preset: MaterialPreset) -> Self {
        Material::Basic(preset.material())
    }
}

impl Material {
    pub fn shininess(&self) -> f32 {
        match self {
            Material::Basic(m) => m.shininess,
            Material::Textured(m) => m.shininess,
        }
    }

    /// Write `material.*` uniforms
    ///
    /// Textured materials write sampler units as ints.
    pub fn write_uniforms(&self, sink: &mut dyn UniformSink) {
        match self {
            Material::Basic(m) => {
                sink.set_vec3("material.ambient", m.ambient);
                sink.set_vec3("material.diffuse", m.diffuse);
                sink.set_vec3("material.specular", m.specular);
            }
            Material::Textured(m) => {
                sink.set_int("material.diffuse", m.diffuse.unit as i32);
                sink.set_int("material.specular", m.specular.unit as i32);
                if let Some(emission) = m.emission {
                    sink.set_int("material.emission", emission.unit as i32);
                }
            }
        }
        sink.set_float("material.shininess", self.shininess());
    }

    /// `(unit, texture)` pairs the backend must bind before drawing
    pub fn texture_bindings(&self) -> Vec<(u32, TextureHandle)> {
        match self {
            Material::Basic(_) => Vec::new(),
            Material::Textured(m) => [Some(m.diffuse), Some(m.specular), m.emission]
                .into_iter()
                .flatten()
                .map(|slot| (slot.unit, slot.texture))
                .collect(),
        }
    }
}

/// Named real-world materials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialPreset {
    Emerald,
    Jade,
    Obsidian,
    Pearl,
    Ruby,
    Turquoise,
    Brass,
    Bronze,
    Chrome,
    Copper,
    Gold,
    Silver,
}

/// (ambient, diffuse, specular, shininess / 128)
type PresetRow = ([f32; 3], [f32; 3], [f32; 3], f32);

impl MaterialPreset {
    pub const ALL: [MaterialPreset; 12] = [
        MaterialPreset::Emerald,
        MaterialPreset::Jade,
        MaterialPreset::Obsidian,
        MaterialPreset::Pearl,
        MaterialPreset::Ruby,
        MaterialPreset::Turquoise,
        MaterialPreset::Brass,
        MaterialPreset::Bronze,
        MaterialPreset::Chrome,
        MaterialPreset::Copper,
        MaterialPreset::Gold,
        MaterialPreset::Silver,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MaterialPreset::Emerald => "emerald",
            MaterialPreset::Jade => "jade",
            MaterialPreset::Obsidian => "obsidian",
            MaterialPreset::Pearl => "pearl",
            MaterialPreset::Ruby => "ruby",
            MaterialPreset::Turquoise => "turquoise",
            MaterialPreset::Brass => "brass",
            MaterialPreset::Bronze => "bronze",
            MaterialPreset::Chrome => "chrome",
            MaterialPreset::Copper => "copper",
            MaterialPreset::Gold => "gold",
            MaterialPreset::Silver => "silver",
        }
    }

    /// Following preset, wrapping after the last
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|&p| p == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    #[rustfmt::skip]
    fn row(self) -> PresetRow {
        match self {
            MaterialPreset::Emerald => ([0.0215, 0.1745, 0.0215], [0.07568, 0.61424, 0.07568], [0.633, 0.727811, 0.633], 0.6),
            MaterialPreset::Jade => ([0.135, 0.2225, 0.1575], [0.54, 0.89, 0.63], [0.316228, 0.316228, 0.316228], 0.1),
            MaterialPreset::Obsidian => ([0.05375, 0.05, 0.06625], [0.18275, 0.17, 0.22525], [0.332741, 0.328634, 0.346435], 0.3),
            MaterialPreset::Pearl => ([0.25, 0.20725, 0.20725], [1.0, 0.829, 0.829], [0.296648, 0.296648, 0.296648], 0.088),
            MaterialPreset::Ruby => ([0.1745, 0.01175, 0.01175], [0.61424, 0.04136, 0.04136], [0.727811, 0.626959, 0.626959], 0.6),
            MaterialPreset::Turquoise => ([0.1, 0.18725, 0.1745], [0.396, 0.74151, 0.69102], [0.297254, 0.30829, 0.306678], 0.1),
            MaterialPreset::Brass => ([0.329412, 0.223529, 0.027451], [0.780392, 0.568627, 0.113725], [0.992157, 0.941176, 0.807843], 0.21794872),
            MaterialPreset::Bronze => ([0.2125, 0.1275, 0.054], [0.714, 0.4284, 0.18144], [0.393548, 0.271906, 0.166721], 0.2),
            MaterialPreset::Chrome => ([0.25, 0.25, 0.25], [0.4, 0.4, 0.4], [0.774597, 0.774597, 0.774597], 0.6),
            MaterialPreset::Copper => ([0.19125, 0.0735, 0.0225], [0.7038, 0.27048, 0.0828], [0.256777, 0.137622, 0.086014], 0.1),
            MaterialPreset::Gold => ([0.24725, 0.1995, 0.0745], [0.75164, 0.60648, 0.22648], [0.628281, 0.555802, 0.366065], 0.4),
            MaterialPreset::Silver => ([0.19225, 0.19225, 0.19225], [0.50754, 0.50754, 0.50754], [0.508273, 0.508273, 0.508273], 0.4),
        }
    }

    pub fn material(self) -> ColorMaterial {
        let (ambient, diffuse, specular, shininess) = self.row();
        ColorMaterial {
            ambient: Vec3::from_array(ambient),
            diffuse: Vec3::from_array(diffuse),
            specular: Vec3::from_array(specular),
            shininess: shininess * 128.0,
        }
    }
}

impl fmt::Display for MaterialPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MaterialPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.name() == lower)
            .ok_or_else(|| format!("unknown material preset '{s}'"))
    }
}
