//! UV sphere generation (sector/stack parametrization)

use glam::Vec3;
use std::f32::consts::{FRAC_PI_2, PI};
use tracing::{debug, warn};

use crate::error::GeometryError;
use crate::types::{Mesh, MeshBuilderUV};

/// Fewest longitude divisions that still close the surface
pub const MIN_SECTOR_COUNT: u32 = 3;
/// Fewest latitude divisions that still close the surface
pub const MIN_STACK_COUNT: u32 = 2;

/// Which axis generated coordinates treat as "up"
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AxisConvention {
    /// Poles on ±Z, coordinates emitted as computed
    #[default]
    ZUp,
    /// Poles on ±Y, coordinates remapped `(x, y, z) -> (x, z, -y)`
    YUp,
}

impl AxisConvention {
    /// Remap a Z-up vector into this convention
    #[inline]
    pub fn apply(self, v: Vec3) -> Vec3 {
        match self {
            AxisConvention::ZUp => v,
            AxisConvention::YUp => Vec3::new(v.x, v.z, -v.y),
        }
    }
}

/// What to do with sector/stack counts below the minimum
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CountPolicy {
    /// Fail with [`GeometryError::InvalidParameter`]
    #[default]
    Reject,
    /// Raise to the minimum and log a warning
    Clamp,
}

/// Input parameters for [`generate_sphere`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphereParams {
    pub radius: f32,
    /// Longitude divisions
    pub sector_count: u32,
    /// Latitude divisions
    pub stack_count: u32,
    pub axis: AxisConvention,
    pub count_policy: CountPolicy,
}

impl Default for SphereParams {
    fn default() -> Self {
        Self::new(1.0, 36, 18)
    }
}

impl SphereParams {
    /// Z-up sphere that rejects out-of-range counts
    pub fn new(radius: f32, sector_count: u32, stack_count: u32) -> Self {
        Self {
            radius,
            sector_count,
            stack_count,
            axis: AxisConvention::ZUp,
            count_policy: CountPolicy::Reject,
        }
    }

    pub fn with_axis(mut self, axis: AxisConvention) -> Self {
        self.axis = axis;
        self
    }

    pub fn with_count_policy(mut self, count_policy: CountPolicy) -> Self {
        self.count_policy = count_policy;
        self
    }

    /// Validate the parameters and return the effective set that will be built
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidParameter`] if the radius is not a
    /// positive finite number, if a count is below its minimum under
    /// [`CountPolicy::Reject`], or if the vertex count does not fit a `u32`
    /// index.
    pub fn validated(&self) -> Result<SphereParams, GeometryError> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(GeometryError::invalid(
                "radius",
                self.radius,
                "must be a positive finite number",
            ));
        }

        let sector_count = check_count(
            "sector_count",
            self.sector_count,
            MIN_SECTOR_COUNT,
            self.count_policy,
        )?;
        let stack_count = check_count(
            "stack_count",
            self.stack_count,
            MIN_STACK_COUNT,
            self.count_policy,
        )?;

        let vertices = (u64::from(stack_count) + 1).checked_mul(u64::from(sector_count) + 1);
        if vertices.is_none_or(|n| n > u64::from(u32::MAX)) {
            return Err(GeometryError::invalid(
                "sector_count",
                format!("{sector_count} x {stack_count}"),
                "vertex count does not fit 32-bit indices",
            ));
        }

        Ok(SphereParams {
            sector_count,
            stack_count,
            ..*self
        })
    }

    /// `(stack_count + 1) * (sector_count + 1)`
    pub fn vertex_count(&self) -> usize {
        (self.stack_count as usize + 1) * (self.sector_count as usize + 1)
    }

    /// Three indices per triangle, `2 * stack_count - 2` triangles per sector
    pub fn index_count(&self) -> usize {
        let triangles = (self.sector_count as usize) * (2 * self.stack_count as usize).saturating_sub(2);
        triangles * 3
    }

    /// Two indices per segment, `2 * stack_count - 1` segments per sector
    pub fn line_index_count(&self) -> usize {
        let segments = (self.sector_count as usize) * (2 * self.stack_count as usize).saturating_sub(1);
        segments * 2
    }
}

fn check_count(
    name: &'static str,
    requested: u32,
    min: u32,
    policy: CountPolicy,
) -> Result<u32, GeometryError> {
    if requested >= min {
        return Ok(requested);
    }
    match policy {
        CountPolicy::Reject => Err(GeometryError::invalid(
            name,
            requested,
            "below the minimum (3 sectors, 2 stacks)",
        )),
        CountPolicy::Clamp => {
            warn!("generate_sphere: {name} = {requested} is below the minimum, clamping to {min}");
            Ok(min)
        }
    }
}

/// Generate a UV sphere centered at the origin
///
/// Vertices are laid out ring by ring from the north pole (stack 0) to the
/// south pole, `sector_count + 1` per ring. The last column duplicates the
/// position and normal of the first with `u = 1.0`, so textures wrap without
/// a visible seam.
///
/// Pole rings collapse to a point; only one triangle per sector is emitted
/// there, so no zero-area triangles are produced. Winding is CCW seen from
/// outside in either axis convention.
///
/// # UV Mapping
/// - U: `sector / sector_count`, 0 → 1 around the polar axis
/// - V: `stack / stack_count`, 0 at the north pole, 1 at the south pole
///
/// # Errors
///
/// See [`SphereParams::validated`].
pub fn generate_sphere<M: MeshBuilderUV>(params: &SphereParams) -> Result<M, GeometryError> {
    let params = params.validated()?;
    let SphereParams {
        radius,
        sector_count,
        stack_count,
        axis,
        ..
    } = params;

    let mut mesh = M::default();
    mesh.reserve(params.vertex_count(), params.index_count());

    let length_inv = 1.0 / radius;
    let sector_step = 2.0 * PI / sector_count as f32;
    let stack_step = PI / stack_count as f32;

    for i in 0..=stack_count {
        let stack_angle = FRAC_PI_2 - i as f32 * stack_step; // pi/2 down to -pi/2
        let xy = radius * stack_angle.cos();
        let z = radius * stack_angle.sin();
        let v = i as f32 / stack_count as f32;

        for j in 0..=sector_count {
            // 2*pi is evaluated as 0 so the seam column matches column 0 exactly
            let sector_angle = (j % sector_count) as f32 * sector_step;
            let position = Vec3::new(xy * sector_angle.cos(), xy * sector_angle.sin(), z);
            let normal = position * length_inv;
            let u = j as f32 / sector_count as f32;

            mesh.add_vertex_uv(axis.apply(position), (u, v), axis.apply(normal));
        }
    }

    //  k1----k1+1
    //  |    / |
    //  |   /  |     k1 -> k2 -> k1+1
    //  |  /   |     k1+1 -> k2 -> k2+1
    //  | /    |
    //  k2----k2+1
    for i in 0..stack_count {
        let mut k1 = i * (sector_count + 1);
        let mut k2 = k1 + sector_count + 1;

        for _ in 0..sector_count {
            if i != 0 {
                mesh.add_triangle(k1, k2, k1 + 1);
            }
            if i != stack_count - 1 {
                mesh.add_triangle(k1 + 1, k2, k2 + 1);
            }

            mesh.add_line(k1, k2);
            if i != 0 {
                mesh.add_line(k1, k1 + 1);
            }

            k1 += 1;
            k2 += 1;
        }
    }

    debug!(
        "generate_sphere: radius={radius}, sectors={sector_count}, stacks={stack_count}, axis={axis:?}"
    );

    Ok(mesh)
}

/// A built sphere together with the parameters it was built from
#[derive(Clone, Debug)]
pub struct SphereMesh {
    params: SphereParams,
    mesh: Mesh,
}

impl SphereMesh {
    /// Build a sphere, keeping the effective (post-policy) parameters
    pub fn build(params: SphereParams) -> Result<Self, GeometryError> {
        let effective = params.validated()?;
        let mesh = generate_sphere(&effective)?;
        Ok(Self {
            params: effective,
            mesh,
        })
    }

    /// Z-up sphere with the default (rejecting) count policy
    pub fn new(radius: f32, sector_count: u32, stack_count: u32) -> Result<Self, GeometryError> {
        Self::build(SphereParams::new(radius, sector_count, stack_count))
    }

    pub fn params(&self) -> &SphereParams {
        &self.params
    }

    pub fn radius(&self) -> f32 {
        self.params.radius
    }

    pub fn sector_count(&self) -> u32 {
        self.params.sector_count
    }

    pub fn stack_count(&self) -> u32 {
        self.params.stack_count
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn into_mesh(self) -> Mesh {
        self.mesh
    }

    /// Index of the vertex at `stack`, `sector`; `None` outside the grid
    pub fn vertex_index(&self, stack: u32, sector: u32) -> Option<usize> {
        if stack > self.params.stack_count || sector > self.params.sector_count {
            return None;
        }
        Some((stack as usize) * (self.params.sector_count as usize + 1) + sector as usize)
    }
}
