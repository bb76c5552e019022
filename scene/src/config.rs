//! Scene configuration (config.toml)
//!
//! Describes the sphere, camera, lights and window for a demo scene. Every
//! field has a default, so an empty file yields the multiple-lights scene.

use std::path::{Path, PathBuf};

use glam::Vec3;
use lumen_geometry::{AxisConvention, CountPolicy, GeometryError, SphereMesh, SphereParams};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::camera::FlyCamera;
use crate::frame::FrameContext;
use crate::light::{Attenuation, Light, LightColor, LightRig};
use crate::material::{ColorMaterial, Material, MaterialPreset};

/// File name inside the platform config directory
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scene config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize scene config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error("unknown material preset '{0}'")]
    UnknownPreset(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SceneConfig {
    #[serde(default)]
    pub sphere: SphereConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub lights: LightsConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

/// Serialized form of [`AxisConvention`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AxisSetting {
    #[default]
    ZUp,
    YUp,
}

impl From<AxisSetting> for AxisConvention {
    fn from(axis: AxisSetting) -> Self {
        match axis {
            AxisSetting::ZUp => AxisConvention::ZUp,
            AxisSetting::YUp => AxisConvention::YUp,
        }
    }
}

/// Serialized form of [`CountPolicy`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PolicySetting {
    #[default]
    Reject,
    Clamp,
}

impl From<PolicySetting> for CountPolicy {
    fn from(policy: PolicySetting) -> Self {
        match policy {
            PolicySetting::Reject => CountPolicy::Reject,
            PolicySetting::Clamp => CountPolicy::Clamp,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SphereConfig {
    /// Sphere radius (default: 1.0)
    #[serde(default = "default_radius")]
    pub radius: f32,
    /// Longitude divisions (default: 36)
    #[serde(default = "default_sectors")]
    pub sectors: u32,
    /// Latitude divisions (default: 18)
    #[serde(default = "default_stacks")]
    pub stacks: u32,
    #[serde(default)]
    pub axis: AxisSetting,
    #[serde(default)]
    pub count_policy: PolicySetting,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_camera_position")]
    pub position: [f32; 3],
    /// Degrees (default: -90, looking down -Z)
    #[serde(default = "default_yaw")]
    pub yaw: f32,
    /// Degrees (default: 0)
    #[serde(default)]
    pub pitch: f32,
    /// Units per second (default: 2.5)
    #[serde(default = "default_speed")]
    pub speed: f32,
    /// Degrees per pixel (default: 0.1)
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f32,
    /// Vertical field of view in degrees (default: 45)
    #[serde(default = "default_fov")]
    pub fov: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionalConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_sun_direction")]
    pub direction: [f32; 3],
    #[serde(default = "default_ambient")]
    pub ambient: [f32; 3],
    #[serde(default = "default_diffuse")]
    pub diffuse: [f32; 3],
    #[serde(default = "default_specular")]
    pub specular: [f32; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointConfig {
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default = "default_ambient")]
    pub ambient: [f32; 3],
    #[serde(default = "default_diffuse")]
    pub diffuse: [f32; 3],
    #[serde(default = "default_specular")]
    pub specular: [f32; 3],
    #[serde(default = "default_constant")]
    pub constant: f32,
    #[serde(default = "default_linear")]
    pub linear: f32,
    #[serde(default = "default_quadratic")]
    pub quadratic: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Follow the camera like a flashlight (default: true)
    #[serde(default = "default_true")]
    pub attach_to_camera: bool,
    /// Used when not attached to the camera
    #[serde(default = "default_camera_position")]
    pub position: [f32; 3],
    #[serde(default = "default_spot_direction")]
    pub direction: [f32; 3],
    #[serde(default)]
    pub ambient: [f32; 3],
    #[serde(default = "default_specular")]
    pub diffuse: [f32; 3],
    #[serde(default = "default_specular")]
    pub specular: [f32; 3],
    #[serde(default = "default_constant")]
    pub constant: f32,
    #[serde(default = "default_linear")]
    pub linear: f32,
    #[serde(default = "default_quadratic")]
    pub quadratic: f32,
    /// Inner cone angle in degrees (default: 12.5)
    #[serde(default = "default_cut_off")]
    pub cut_off: f32,
    /// Outer cone angle in degrees (default: 15)
    #[serde(default = "default_outer_cut_off")]
    pub outer_cut_off: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightsConfig {
    #[serde(default)]
    pub directional: DirectionalConfig,
    #[serde(default = "default_points")]
    pub points: Vec<PointConfig>,
    #[serde(default)]
    pub spot: SpotConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Window width in pixels (default: 800)
    #[serde(default = "default_width")]
    pub width: u32,
    /// Window height in pixels (default: 600)
    #[serde(default = "default_height")]
    pub height: u32,
    /// Material preset name; the coral basic material when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
}

fn default_true() -> bool {
    true
}
fn default_radius() -> f32 {
    1.0
}
fn default_sectors() -> u32 {
    36
}
fn default_stacks() -> u32 {
    18
}

fn default_camera_position() -> [f32; 3] {
    [0.0, 0.0, 3.0]
}
fn default_yaw() -> f32 {
    crate::camera::DEFAULT_YAW
}
fn default_speed() -> f32 {
    crate::camera::DEFAULT_SPEED
}
fn default_sensitivity() -> f32 {
    crate::camera::DEFAULT_SENSITIVITY
}
fn default_fov() -> f32 {
    crate::camera::DEFAULT_FOV
}

fn default_sun_direction() -> [f32; 3] {
    [-0.2, -1.0, -0.3]
}
fn default_spot_direction() -> [f32; 3] {
    [0.0, 0.0, -1.0]
}
fn default_ambient() -> [f32; 3] {
    [0.05; 3]
}
fn default_diffuse() -> [f32; 3] {
    [0.5; 3]
}
fn default_specular() -> [f32; 3] {
    [1.0; 3]
}
fn default_constant() -> f32 {
    1.0
}
fn default_linear() -> f32 {
    0.09
}
fn default_quadratic() -> f32 {
    0.032
}
fn default_cut_off() -> f32 {
    12.5
}
fn default_outer_cut_off() -> f32 {
    15.0
}
fn default_points() -> Vec<PointConfig> {
    [
        [0.7, 0.2, 2.0],
        [2.3, -3.3, -4.0],
        [-4.0, 2.0, -12.0],
        [0.0, 0.0, -3.0],
    ]
    .into_iter()
    .map(|position| PointConfig {
        position,
        ..PointConfig::default()
    })
    .collect()
}

fn default_width() -> u32 {
    crate::frame::DEFAULT_WIDTH
}
fn default_height() -> u32 {
    crate::frame::DEFAULT_HEIGHT
}

impl Default for SphereConfig {
    fn default() -> Self {
        Self {
            radius: default_radius(),
            sectors: default_sectors(),
            stacks: default_stacks(),
            axis: AxisSetting::default(),
            count_policy: PolicySetting::default(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: default_camera_position(),
            yaw: default_yaw(),
            pitch: 0.0,
            speed: default_speed(),
            sensitivity: default_sensitivity(),
            fov: default_fov(),
        }
    }
}

impl Default for DirectionalConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            direction: default_sun_direction(),
            ambient: default_ambient(),
            diffuse: default_diffuse(),
            specular: default_specular(),
        }
    }
}

impl Default for PointConfig {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            ambient: default_ambient(),
            diffuse: default_diffuse(),
            specular: default_specular(),
            constant: default_constant(),
            linear: default_linear(),
            quadratic: default_quadratic(),
        }
    }
}

impl Default for SpotConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            attach_to_camera: true,
            position: default_camera_position(),
            direction: default_spot_direction(),
            ambient: [0.0; 3],
            diffuse: default_specular(),
            specular: default_specular(),
            constant: default_constant(),
            linear: default_linear(),
            quadratic: default_quadratic(),
            cut_off: default_cut_off(),
            outer_cut_off: default_outer_cut_off(),
        }
    }
}

impl Default for LightsConfig {
    fn default() -> Self {
        Self {
            directional: DirectionalConfig::default(),
            points: default_points(),
            spot: SpotConfig::default(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            material: None,
        }
    }
}

fn color(ambient: [f32; 3], diffuse: [f32; 3], specular: [f32; 3]) -> LightColor {
    LightColor::new(
        Vec3::from_array(ambient),
        Vec3::from_array(diffuse),
        Vec3::from_array(specular),
    )
}

impl SceneConfig {
    /// Parse a config file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML for
    /// this schema.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Write the config as pretty TOML, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `config.toml` from the platform config directory
    ///
    /// A missing file yields defaults; an unreadable or invalid one is logged
    /// and also yields defaults.
    pub fn load() -> Self {
        let Some(path) = config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => {
                info!("Loaded scene config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Ignoring scene config: {e}");
                Self::default()
            }
        }
    }

    /// Save to the platform config directory
    pub fn save(&self) -> Result<(), ConfigError> {
        match config_path() {
            Some(path) => self.save_to(&path),
            None => Ok(()),
        }
    }

    pub fn sphere_params(&self) -> SphereParams {
        SphereParams::new(self.sphere.radius, self.sphere.sectors, self.sphere.stacks)
            .with_axis(self.sphere.axis.into())
            .with_count_policy(self.sphere.count_policy.into())
    }

    pub fn build_sphere(&self) -> Result<SphereMesh, ConfigError> {
        Ok(SphereMesh::build(self.sphere_params())?)
    }

    pub fn build_camera(&self) -> FlyCamera {
        let c = &self.camera;
        let mut camera = FlyCamera::with_angles(Vec3::from_array(c.position), Vec3::Y, c.yaw, c.pitch);
        camera.movement_speed = c.speed;
        camera.mouse_sensitivity = c.sensitivity;
        camera.set_fov(c.fov);
        camera
    }

    /// Light rig with the flashlight attached to `camera` when configured so
    pub fn build_lights(&self, camera: &FlyCamera) -> LightRig {
        let lights = &self.lights;
        let sun = &lights.directional;
        let spot = &lights.spot;

        let mut rig = LightRig {
            directional: sun.enabled.then(|| {
                Light::directional(
                    Vec3::from_array(sun.direction),
                    color(sun.ambient, sun.diffuse, sun.specular),
                )
            }),
            points: lights
                .points
                .iter()
                .map(|p| {
                    Light::point(
                        Vec3::from_array(p.position),
                        color(p.ambient, p.diffuse, p.specular),
                        Attenuation {
                            constant: p.constant,
                            linear: p.linear,
                            quadratic: p.quadratic,
                        },
                    )
                })
                .collect(),
            spot: spot.enabled.then(|| {
                Light::spot(
                    Vec3::from_array(spot.position),
                    Vec3::from_array(spot.direction),
                    color(spot.ambient, spot.diffuse, spot.specular),
                    Attenuation {
                        constant: spot.constant,
                        linear: spot.linear,
                        quadratic: spot.quadratic,
                    },
                    spot.cut_off,
                    spot.outer_cut_off,
                )
            }),
        };

        if spot.attach_to_camera {
            rig.attach_spot_to_camera(camera);
        }
        rig
    }

    pub fn build_material(&self) -> Result<Material, ConfigError> {
        match &self.render.material {
            None => Ok(Material::Basic(ColorMaterial::default())),
            Some(name) => name
                .parse::<MaterialPreset>()
                .map(Material::from)
                .map_err(|_| ConfigError::UnknownPreset(name.clone())),
        }
    }

    pub fn build_frame(&self) -> FrameContext {
        FrameContext::new(self.build_camera(), self.render.width, self.render.height)
    }
}

/// Returns the platform-specific configuration directory.
///
/// On Linux: `~/.config/lumen`
/// Returns `None` if the home directory cannot be determined.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("io.lumen", "", "lumen").map(|dirs| dirs.config_dir().to_path_buf())
}

fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_FILE))
}
