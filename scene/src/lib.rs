//! Scene state for the lighting demos
//!
//! Camera, lights, materials and per-frame input state, plus the uniform
//! tables they produce. Nothing here touches a GPU: a render backend consumes
//! the matrices and [`UniformSink`] writes.

pub mod camera;
pub mod config;
pub mod frame;
pub mod light;
pub mod material;
pub mod object;
pub mod uniform;

pub use camera::{CameraMovement, FlyCamera};
pub use config::{ConfigError, SceneConfig};
pub use frame::{FrameContext, FrameTiming, MouseState, orbit_position};
pub use light::{Attenuation, Light, LightColor, LightRig};
pub use material::{
    ColorMaterial, Material, MaterialPreset, TextureHandle, TextureSlot, TexturedMaterial,
};
pub use object::{SceneObject, sierpinski_transforms};
pub use uniform::{UniformMap, UniformSink, UniformValue};

/// Full uniform set for one lit object: lights, camera and object
pub fn scene_uniforms(frame: &FrameContext, lights: &LightRig, object: &SceneObject) -> UniformMap {
    let mut uniforms = UniformMap::new();
    let (view, projection) = frame.view_projection();
    uniforms.set_vec3("viewPos", frame.camera.position);
    lights.write_uniforms(&mut uniforms);
    object.write_uniforms(view, projection, &mut uniforms);
    uniforms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_uniforms_complete() {
        let frame = FrameContext::default();
        let lights = LightRig::multiple_lights();
        let object = SceneObject::default();
        let uniforms = scene_uniforms(&frame, &lights, &object);

        // viewPos + 42 light values + 3 matrices + 4 material values
        assert_eq!(uniforms.len(), 50);
        assert_eq!(uniforms.get_vec3("viewPos"), Some(frame.camera.position));
        assert_eq!(uniforms.get_mat4("view"), Some(frame.camera.view_matrix()));
    }
}
