//! Property tests for the procedural generators

use std::io;
use std::sync::{Arc, Mutex};

use glam::Vec3;

use crate::{
    AxisConvention, CountPolicy, GeometryError, Mesh, MeshBuilder, MeshBuilderUV, SphereMesh,
    SphereParams, generate_cube, generate_sphere,
};

const EPS: f32 = 1e-5;

fn v(p: [f32; 3]) -> Vec3 {
    Vec3::from_array(p)
}

/// Every triangle's face normal must point away from the origin
fn assert_outward_ccw(mesh: &Mesh) {
    for (t, tri) in mesh.indices.chunks_exact(3).enumerate() {
        let a = v(mesh.positions[tri[0] as usize]);
        let b = v(mesh.positions[tri[1] as usize]);
        let c = v(mesh.positions[tri[2] as usize]);
        let face = (b - a).cross(c - a);
        let outward = v(mesh.normals[tri[0] as usize])
            + v(mesh.normals[tri[1] as usize])
            + v(mesh.normals[tri[2] as usize]);
        assert!(face.length() > 1e-9, "triangle {t} is degenerate");
        assert!(face.dot(outward) > 0.0, "triangle {t} is wound inward");
    }
}

/// Shared sink for captured log lines
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn sphere(radius: f32, sectors: u32, stacks: u32) -> SphereMesh {
    SphereMesh::new(radius, sectors, stacks).unwrap()
}

// =============================================================
// Scenarios
// =============================================================

#[test]
fn test_scenario_a_minimal_caps_only() {
    let s = sphere(1.0, 4, 2);
    assert_eq!(s.mesh().vertex_count(), 15);
    assert_eq!(s.mesh().indices.len(), 24);
    assert_eq!(s.mesh().triangle_count(), 8);
}

#[test]
fn test_scenario_b_minimum_counts() {
    let s = sphere(2.0, 3, 2);
    assert_eq!(s.mesh().vertex_count(), 12);
    assert!(s.mesh().indices_in_bounds());
}

#[test]
fn test_scenario_c_zero_radius_rejected() {
    let err = SphereMesh::new(0.0, 36, 18).unwrap_err();
    assert!(matches!(
        err,
        GeometryError::InvalidParameter { name: "radius", .. }
    ));
}

#[test]
fn test_scenario_d_y_up_keeps_x_axis_point() {
    assert_eq!(AxisConvention::YUp.apply(Vec3::X), Vec3::X);

    let s = SphereMesh::build(SphereParams::new(1.0, 4, 2).with_axis(AxisConvention::YUp)).unwrap();
    // Equator ring, first sector: (1, 0, 0) in Z-up
    let idx = s.vertex_index(1, 0).unwrap();
    assert_eq!(s.mesh().positions[idx], [1.0, 0.0, 0.0]);
    assert_eq!(s.mesh().normals[idx], [1.0, 0.0, 0.0]);
}

// =============================================================
// Invariants
// =============================================================

#[test]
fn test_vertex_count_formula() {
    for (sectors, stacks) in [(3, 2), (8, 4), (36, 18), (64, 33)] {
        let s = sphere(1.0, sectors, stacks);
        let expected = ((stacks + 1) * (sectors + 1)) as usize;
        assert_eq!(s.mesh().vertex_count(), expected);
        assert_eq!(s.mesh().normals.len(), expected);
        assert_eq!(s.mesh().uvs.len(), expected);
        assert_eq!(s.mesh().indices.len(), s.params().index_count());
        assert_eq!(s.mesh().line_indices.len(), s.params().line_index_count());
    }
}

#[test]
fn test_normals_unit_and_positions_on_surface() {
    let radius = 2.5;
    let s = sphere(radius, 24, 12);
    for (p, n) in s.mesh().positions.iter().zip(&s.mesh().normals) {
        let (p, n) = (v(*p), v(*n));
        assert!((n.length() - 1.0).abs() < EPS, "normal {n:?} not unit length");
        assert!((p.length() - radius).abs() < EPS * radius, "{p:?} off the surface");
        assert!((p / radius - n).length() < EPS);
    }
}

#[test]
fn test_uvs_in_unit_square() {
    let s = sphere(1.0, 17, 9);
    for &[u, v] in &s.mesh().uvs {
        assert!((0.0..=1.0).contains(&u));
        assert!((0.0..=1.0).contains(&v));
    }
    // North pole ring has v = 0, south pole ring v = 1
    assert_eq!(s.mesh().uvs[s.vertex_index(0, 5).unwrap()][1], 0.0);
    assert_eq!(s.mesh().uvs[s.vertex_index(9, 5).unwrap()][1], 1.0);
}

#[test]
fn test_seam_columns_coincide() {
    let sectors = 12;
    let s = sphere(1.5, sectors, 7);
    for stack in 0..=7 {
        let first = s.vertex_index(stack, 0).unwrap();
        let last = s.vertex_index(stack, sectors).unwrap();
        assert_eq!(s.mesh().positions[first], s.mesh().positions[last]);
        assert_eq!(s.mesh().normals[first], s.mesh().normals[last]);
        assert_eq!(s.mesh().uvs[first][0], 0.0);
        assert_eq!(s.mesh().uvs[last][0], 1.0);
        assert_eq!(s.mesh().uvs[first][1], s.mesh().uvs[last][1]);
    }
}

#[test]
fn test_pole_rings_collapse() {
    let radius = 3.0;
    let stacks = 6;
    let s = sphere(radius, 10, stacks);
    let north = Vec3::new(0.0, 0.0, radius);
    let south = Vec3::new(0.0, 0.0, -radius);
    for sector in 0..=10 {
        let n = v(s.mesh().positions[s.vertex_index(0, sector).unwrap()]);
        let p = v(s.mesh().positions[s.vertex_index(stacks, sector).unwrap()]);
        assert!((n - north).length() < EPS * radius);
        assert!((p - south).length() < EPS * radius);
    }
}

#[test]
fn test_y_up_moves_poles_to_y() {
    let s = SphereMesh::build(SphereParams::new(1.0, 8, 4).with_axis(AxisConvention::YUp)).unwrap();
    let north = v(s.mesh().positions[s.vertex_index(0, 3).unwrap()]);
    assert!((north - Vec3::Y).length() < EPS);
    let south = v(s.mesh().positions[s.vertex_index(4, 3).unwrap()]);
    assert!((south - Vec3::NEG_Y).length() < EPS);
    // UVs are unaffected by the remap
    let z_up = sphere(1.0, 8, 4);
    assert_eq!(z_up.mesh().uvs, s.mesh().uvs);
}

#[test]
fn test_winding_outward_ccw() {
    assert_outward_ccw(sphere(1.0, 4, 2).mesh());
    assert_outward_ccw(sphere(1.0, 32, 16).mesh());
    let y_up = SphereMesh::build(SphereParams::new(0.2, 32, 16).with_axis(AxisConvention::YUp))
        .unwrap();
    assert_outward_ccw(y_up.mesh());
}

#[test]
fn test_indices_in_bounds() {
    for (sectors, stacks) in [(3, 2), (5, 3), (64, 32)] {
        assert!(sphere(1.0, sectors, stacks).mesh().indices_in_bounds());
    }
}

#[test]
fn test_line_indices_cover_rings_and_meridians() {
    let s = sphere(1.0, 4, 2);
    // 4 meridian segments per stack (8) + 4 equator segments
    assert_eq!(s.mesh().line_count(), 12);
    assert_eq!(&s.mesh().line_indices[..2], &[0, 5]);
}

// =============================================================
// Parameter validation
// =============================================================

#[test]
fn test_invalid_radius_values() {
    for radius in [-1.0, f32::NAN, f32::INFINITY] {
        assert!(SphereMesh::new(radius, 8, 4).is_err(), "radius {radius} accepted");
    }
}

#[test]
fn test_reject_policy_below_minimum() {
    let err = SphereMesh::new(1.0, 2, 2).unwrap_err();
    assert!(matches!(
        err,
        GeometryError::InvalidParameter { name: "sector_count", .. }
    ));
    let err = SphereMesh::new(1.0, 3, 1).unwrap_err();
    assert!(matches!(
        err,
        GeometryError::InvalidParameter { name: "stack_count", .. }
    ));
}

#[test]
fn test_clamp_policy_raises_counts() {
    let params = SphereParams::new(1.0, 1, 0).with_count_policy(CountPolicy::Clamp);
    let s = SphereMesh::build(params).unwrap();
    assert_eq!(s.sector_count(), 3);
    assert_eq!(s.stack_count(), 2);
    assert_eq!(s.mesh().vertex_count(), 12);
    assert_outward_ccw(s.mesh());
}

#[test]
fn test_dense_sphere_has_no_count_cap() {
    let s = sphere(1.0, 2048, 1024);
    assert_eq!(s.mesh().vertex_count(), 1025 * 2049);
    assert_eq!(s.mesh().triangle_count(), 2048 * (2 * 1024 - 2));
    assert!(s.mesh().indices_in_bounds());
}

#[test]
fn test_vertex_count_beyond_u32_indices_rejected() {
    for policy in [CountPolicy::Reject, CountPolicy::Clamp] {
        let params = SphereParams::new(1.0, u32::MAX, 2).with_count_policy(policy);
        assert!(matches!(
            params.validated(),
            Err(GeometryError::InvalidParameter { name: "sector_count", .. })
        ));
    }
    assert!(SphereParams::new(1.0, u32::MAX, u32::MAX).validated().is_err());
    // Largest grid that still fits
    assert!(SphereParams::new(1.0, 65535, 65534).validated().is_ok());
}

#[test]
fn test_vertex_index_outside_grid() {
    let s = sphere(1.0, 8, 4);
    assert_eq!(s.vertex_index(4, 8), Some(44));
    assert_eq!(s.vertex_index(5, 0), None);
    assert_eq!(s.vertex_index(0, 9), None);
}

#[test]
fn test_clamp_policy_logs_requested_and_effective_counts() {
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .with_writer(move || LogBuffer(writer.clone()))
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let params = SphereParams::new(1.0, 1, 2).with_count_policy(CountPolicy::Clamp);
        SphereMesh::build(params).unwrap();
    });

    let logs = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
    assert!(logs.contains("WARN"), "{logs}");
    assert!(logs.contains("sector_count = 1"), "{logs}");
    assert!(logs.contains("clamping to 3"), "{logs}");
    assert!(!logs.contains("stack_count"), "{logs}");
}

#[test]
fn test_error_message_names_parameter() {
    let err = SphereMesh::new(-2.0, 8, 4).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("radius"));
    assert!(msg.contains("-2"));
}

// =============================================================
// Builder genericity
// =============================================================

#[derive(Default)]
struct CountingBuilder {
    vertices: u32,
    triangles: usize,
}

impl MeshBuilder for CountingBuilder {
    fn add_vertex(&mut self, _position: Vec3, _normal: Vec3) -> u32 {
        self.vertices += 1;
        self.vertices - 1
    }

    fn add_triangle(&mut self, _i0: u32, _i1: u32, _i2: u32) {
        self.triangles += 1;
    }
}

impl MeshBuilderUV for CountingBuilder {
    fn add_vertex_uv(&mut self, position: Vec3, _uv: (f32, f32), normal: Vec3) -> u32 {
        self.add_vertex(position, normal)
    }
}

#[test]
fn test_generators_fill_custom_builders() {
    let counts: CountingBuilder = generate_sphere(&SphereParams::new(1.0, 6, 3)).unwrap();
    assert_eq!(counts.vertices, 28);
    assert_eq!(counts.triangles, 6 * 4);

    let counts: CountingBuilder = generate_cube(1.0).unwrap();
    assert_eq!(counts.vertices, 24);
    assert_eq!(counts.triangles, 12);
}

// =============================================================
// Cube
// =============================================================

#[test]
fn test_cube_counts_and_extent() {
    let mesh: Mesh = generate_cube(0.5).unwrap();
    assert_eq!(mesh.vertex_count(), 24);
    assert_eq!(mesh.indices.len(), 36);
    assert!(mesh.indices_in_bounds());
    for p in &mesh.positions {
        assert!(p.iter().all(|c| c.abs() == 0.5));
    }
    for n in &mesh.normals {
        assert_eq!(v(*n).length(), 1.0);
    }
}

#[test]
fn test_cube_winding_outward() {
    let mesh: Mesh = generate_cube(2.0).unwrap();
    assert_outward_ccw(&mesh);
}

#[test]
fn test_cube_invalid_extent() {
    assert!(generate_cube::<Mesh>(0.0).is_err());
    assert!(generate_cube::<Mesh>(f32::NAN).is_err());
}
