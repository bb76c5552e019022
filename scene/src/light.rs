//! Light sources and their shader uniforms

use glam::Vec3;

use crate::camera::FlyCamera;
use crate::uniform::UniformSink;

/// Phong color triple shared by every light kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightColor {
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

impl LightColor {
    pub const fn new(ambient: Vec3, diffuse: Vec3, specular: Vec3) -> Self {
        Self {
            ambient,
            diffuse,
            specular,
        }
    }

    /// Uniform grey levels for each term
    pub const fn grey(ambient: f32, diffuse: f32, specular: f32) -> Self {
        Self::new(Vec3::splat(ambient), Vec3::splat(diffuse), Vec3::splat(specular))
    }
}

impl Default for LightColor {
    fn default() -> Self {
        Self::grey(0.2, 0.5, 1.0)
    }
}

/// Distance falloff `1 / (constant + linear * d + quadratic * d^2)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Default for Attenuation {
    /// Covers a range of roughly 50 units
    fn default() -> Self {
        Self {
            constant: 1.0,
            linear: 0.09,
            quadratic: 0.032,
        }
    }
}

impl Attenuation {
    pub fn factor(&self, distance: f32) -> f32 {
        1.0 / (self.constant + self.linear * distance + self.quadratic * distance * distance)
    }
}

/// A light source
///
/// Spot cone angles are stored in degrees and written to shaders as cosines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Directional {
        direction: Vec3,
        color: LightColor,
    },
    Point {
        position: Vec3,
        color: LightColor,
        attenuation: Attenuation,
    },
    Spot {
        position: Vec3,
        direction: Vec3,
        color: LightColor,
        attenuation: Attenuation,
        cut_off: f32,
        outer_cut_off: f32,
    },
}

impl Light {
    pub fn directional(direction: Vec3, color: LightColor) -> Self {
        Light::Directional { direction, color }
    }

    pub fn point(position: Vec3, color: LightColor, attenuation: Attenuation) -> Self {
        Light::Point {
            position,
            color,
            attenuation,
        }
    }

    pub fn spot(
        position: Vec3,
        direction: Vec3,
        color: LightColor,
        attenuation: Attenuation,
        cut_off: f32,
        outer_cut_off: f32,
    ) -> Self {
        Light::Spot {
            position,
            direction,
            color,
            attenuation,
            cut_off,
            outer_cut_off,
        }
    }

    pub fn color(&self) -> &LightColor {
        match self {
            Light::Directional { color, .. }
            | Light::Point { color, .. }
            | Light::Spot { color, .. } => color,
        }
    }

    pub fn position(&self) -> Option<Vec3> {
        match self {
            Light::Directional { .. } => None,
            Light::Point { position, .. } | Light::Spot { position, .. } => Some(*position),
        }
    }

    /// Distance attenuation at `fragment_pos` (1.0 for directional lights)
    pub fn attenuation_at(&self, fragment_pos: Vec3) -> f32 {
        match self {
            Light::Directional { .. } => 1.0,
            Light::Point {
                position,
                attenuation,
                ..
            }
            | Light::Spot {
                position,
                attenuation,
                ..
            } => attenuation.factor(position.distance(fragment_pos)),
        }
    }

    /// Soft-edged cone intensity in `[0, 1]` (1.0 for non-spot lights)
    pub fn spot_intensity(&self, fragment_pos: Vec3) -> f32 {
        let Light::Spot {
            position,
            direction,
            cut_off,
            outer_cut_off,
            ..
        } = self
        else {
            return 1.0;
        };

        let theta = (fragment_pos - *position)
            .normalize_or_zero()
            .dot(direction.normalize_or_zero());
        let inner = cut_off.to_radians().cos();
        let outer = outer_cut_off.to_radians().cos();
        let epsilon = inner - outer;
        if epsilon <= 0.0 {
            // Hard edge
            return if theta >= inner { 1.0 } else { 0.0 };
        }
        ((theta - outer) / epsilon).clamp(0.0, 1.0)
    }

    /// Write this light's fields as `{block}.field` uniforms
    pub fn write_uniforms(&self, block: &str, sink: &mut dyn UniformSink) {
        let color = self.color();
        match self {
            Light::Directional { direction, .. } => {
                sink.set_vec3(&format!("{block}.direction"), *direction);
            }
            Light::Point { position, .. } => {
                sink.set_vec3(&format!("{block}.position"), *position);
            }
            Light::Spot {
                position,
                direction,
                cut_off,
                outer_cut_off,
                ..
            } => {
                sink.set_vec3(&format!("{block}.position"), *position);
                sink.set_vec3(&format!("{block}.direction"), *direction);
                sink.set_float(&format!("{block}.cutOff"), cut_off.to_radians().cos());
                sink.set_float(
                    &format!("{block}.outerCutOff"),
                    outer_cut_off.to_radians().cos(),
                );
            }
        }

        sink.set_vec3(&format!("{block}.ambient"), color.ambient);
        sink.set_vec3(&format!("{block}.diffuse"), color.diffuse);
        sink.set_vec3(&format!("{block}.specular"), color.specular);

        if let Light::Point { attenuation, .. } | Light::Spot { attenuation, .. } = self {
            sink.set_float(&format!("{block}.constant"), attenuation.constant);
            sink.set_float(&format!("{block}.linear"), attenuation.linear);
            sink.set_float(&format!("{block}.quadratic"), attenuation.quadratic);
        }
    }
}

/// The set of lights bound to a lighting shader
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LightRig {
    pub directional: Option<Light>,
    pub points: Vec<Light>,
    pub spot: Option<Light>,
}

impl LightRig {
    /// Sun, four point lights and a camera flashlight
    pub fn multiple_lights() -> Self {
        let point_positions = [
            Vec3::new(0.7, 0.2, 2.0),
            Vec3::new(2.3, -3.3, -4.0),
            Vec3::new(-4.0, 2.0, -12.0),
            Vec3::new(0.0, 0.0, -3.0),
        ];
        let camera = FlyCamera::default();

        Self {
            directional: Some(Light::directional(
                Vec3::new(-0.2, -1.0, -0.3),
                LightColor::grey(0.05, 0.5, 1.0),
            )),
            points: point_positions
                .into_iter()
                .map(|p| Light::point(p, LightColor::grey(0.05, 0.5, 1.0), Attenuation::default()))
                .collect(),
            spot: Some(Light::spot(
                camera.position,
                camera.front(),
                LightColor::grey(0.0, 1.0, 1.0),
                Attenuation::default(),
                12.5,
                15.0,
            )),
        }
    }

    /// Move the spot light onto the camera, pointing where it looks
    pub fn attach_spot_to_camera(&mut self, camera: &FlyCamera) {
        if let Some(Light::Spot {
            position,
            direction,
            ..
        }) = &mut self.spot
        {
            *position = camera.position;
            *direction = camera.front();
        }
    }

    /// Writes `dirLight`, `pointLights[i]` and `spotLight`
    pub fn write_uniforms(&self, sink: &mut dyn UniformSink) {
        if let Some(light) = &self.directional {
            light.write_uniforms("dirLight", sink);
        }
        for (i, light) in self.points.iter().enumerate() {
            light.write_uniforms(&format!("pointLights[{i}]"), sink);
        }
        if let Some(light) = &self.spot {
            light.write_uniforms("spotLight", sink);
        }
    }
}
