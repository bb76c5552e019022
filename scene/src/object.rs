//! Placed, materialed scene objects

use glam::{Mat3, Mat4, Quat, Vec3};

use crate::material::Material;
use crate::uniform::UniformSink;

/// Positions of the ten containers in the lighting scenes
pub const CONTAINER_POSITIONS: [Vec3; 10] = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(2.0, 5.0, -15.0),
    Vec3::new(-1.5, -2.2, -2.5),
    Vec3::new(-3.8, -2.0, -12.3),
    Vec3::new(2.4, -0.4, -3.5),
    Vec3::new(-1.7, 3.0, -7.5),
    Vec3::new(1.3, -2.0, -2.5),
    Vec3::new(1.5, 2.0, -2.5),
    Vec3::new(1.5, 0.2, -1.5),
    Vec3::new(-1.3, 1.0, -1.5),
];

/// Deepest level [`sierpinski_transforms`] expands
pub const SIERPINSKI_MAX_DEPTH: u32 = 10;

/// Child placements inside a parent triangle: top, bottom-right, bottom-left
const SIERPINSKI_OFFSETS: [Vec3; 3] = [
    Vec3::new(0.0, 2.0 / 3.0, 0.0),
    Vec3::new(0.57735, -1.0 / 3.0, 0.0),
    Vec3::new(-0.57735, -1.0 / 3.0, 0.0),
];

/// Transforms for every triangle of a Sierpinski triangle, parents before children
///
/// Each level translates into its slot, turns `120 * slot` degrees about +Z
/// and halves X and Y before recursing into three children. `depth` is capped
/// at [`SIERPINSKI_MAX_DEPTH`]; depth 0 yields nothing.
pub fn sierpinski_transforms(depth: u32) -> Vec<Mat4> {
    let depth = depth.min(SIERPINSKI_MAX_DEPTH);
    let mut transforms = Vec::with_capacity((3usize.pow(depth) - 1) / 2);
    push_sierpinski(Mat4::IDENTITY, Vec3::ZERO, 0, depth, &mut transforms);
    transforms
}

fn push_sierpinski(parent: Mat4, offset: Vec3, slot: u32, depth: u32, out: &mut Vec<Mat4>) {
    if depth == 0 {
        return;
    }
    let transform = parent
        * Mat4::from_translation(offset)
        * Mat4::from_rotation_z((120.0 * slot as f32).to_radians())
        * Mat4::from_scale(Vec3::new(0.5, 0.5, 1.0));
    out.push(transform);

    for (slot, &offset) in SIERPINSKI_OFFSETS.iter().enumerate() {
        push_sierpinski(transform, offset, slot as u32, depth - 1, out);
    }
}

/// An object instance: transform plus material
///
/// The mesh itself lives with the render backend; this only carries what the
/// shader needs per draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneObject {
    pub position: Vec3,
    pub scale: Vec3,
    /// Axis and angle in degrees
    pub rotation: Option<(Vec3, f32)>,
    pub material: Material,
}

impl Default for SceneObject {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Material::default())
    }
}

impl SceneObject {
    pub fn new(position: Vec3, material: Material) -> Self {
        Self {
            position,
            scale: Vec3::ONE,
            rotation: None,
            material,
        }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }

    pub fn with_rotation(mut self, axis: Vec3, degrees: f32) -> Self {
        self.rotation = Some((axis, degrees));
        self
    }

    /// The ten containers, each rotated 20 degrees more than the last
    pub fn container_field(material: Material) -> Vec<SceneObject> {
        CONTAINER_POSITIONS
            .iter()
            .enumerate()
            .map(|(i, &position)| {
                SceneObject::new(position, material)
                    .with_rotation(Vec3::new(1.0, 0.3, 0.5), 20.0 * i as f32)
            })
            .collect()
    }

    /// `T * R * S`
    pub fn model_matrix(&self) -> Mat4 {
        let rotation = match self.rotation {
            Some((axis, degrees)) => match axis.try_normalize() {
                Some(axis) => Quat::from_axis_angle(axis, degrees.to_radians()),
                None => Quat::IDENTITY,
            },
            None => Quat::IDENTITY,
        };
        Mat4::from_scale_rotation_translation(self.scale, rotation, self.position)
    }

    /// Inverse-transpose of the model matrix's upper 3x3
    pub fn normal_matrix(&self) -> Mat3 {
        Mat3::from_mat4(self.model_matrix()).inverse().transpose()
    }

    /// Writes `model`, `view`, `projection` and the material
    pub fn write_uniforms(&self, view: Mat4, projection: Mat4, sink: &mut dyn UniformSink) {
        sink.set_mat4("model", self.model_matrix());
        sink.set_mat4("view", view);
        sink.set_mat4("projection", projection);
        self.material.write_uniforms(sink);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uniform::UniformMap;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_model_matrix_order() {
        let object = SceneObject::new(Vec3::new(1.0, 2.0, 3.0), Material::default())
            .with_scale(2.0)
            .with_rotation(Vec3::Y, 90.0);
        // Scale, then rotate +X onto -Z, then translate
        let p = object.model_matrix().transform_point3(Vec3::X);
        assert!((p - Vec3::new(1.0, 2.0, 1.0)).length() < EPS, "{p:?}");
    }

    #[test]
    fn test_zero_axis_means_no_rotation() {
        let object = SceneObject::default().with_rotation(Vec3::ZERO, 45.0);
        assert_eq!(object.model_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn test_normal_matrix_undoes_non_uniform_scale() {
        let mut object = SceneObject::default();
        object.scale = Vec3::new(2.0, 1.0, 1.0);
        let n = object.normal_matrix() * Vec3::X;
        assert!((n - Vec3::new(0.5, 0.0, 0.0)).length() < EPS);
    }

    #[test]
    fn test_container_field() {
        let field = SceneObject::container_field(Material::default());
        assert_eq!(field.len(), 10);
        assert_eq!(field[0].model_matrix(), Mat4::IDENTITY);
        assert_eq!(field[3].rotation.map(|(_, a)| a), Some(60.0));
    }

    #[test]
    fn test_sierpinski_counts() {
        assert!(sierpinski_transforms(0).is_empty());
        assert_eq!(sierpinski_transforms(1), vec![Mat4::from_scale(Vec3::new(0.5, 0.5, 1.0))]);
        assert_eq!(sierpinski_transforms(3).len(), 1 + 3 + 9);
        // Capped at the maximum depth
        assert_eq!(sierpinski_transforms(25).len(), (3usize.pow(10) - 1) / 2);
    }

    #[test]
    fn test_sierpinski_child_placement() {
        let transforms = sierpinski_transforms(2);
        assert_eq!(transforms.len(), 4);

        // Children sit at half the parent's offsets
        let top = transforms[1].transform_point3(Vec3::ZERO);
        assert!((top - Vec3::new(0.0, 1.0 / 3.0, 0.0)).length() < EPS, "{top:?}");
        let right = transforms[2].transform_point3(Vec3::ZERO);
        assert!((right - Vec3::new(0.288675, -1.0 / 6.0, 0.0)).length() < EPS, "{right:?}");

        // Second level is a quarter size and the bottom-right child is turned 120 degrees
        let x = transforms[2].transform_vector3(Vec3::X);
        assert!((x.length() - 0.25).abs() < EPS);
        let expected = Vec3::new(120f32.to_radians().cos(), 120f32.to_radians().sin(), 0.0) * 0.25;
        assert!((x - expected).length() < EPS, "{x:?}");
    }

    #[test]
    fn test_object_uniforms() {
        let mut map = UniformMap::new();
        SceneObject::default().write_uniforms(Mat4::IDENTITY, Mat4::IDENTITY, &mut map);
        assert_eq!(map.get_mat4("model"), Some(Mat4::IDENTITY));
        assert!(map.contains("view"));
        assert!(map.contains("projection"));
        assert!(map.contains("material.shininess"));
    }
}
