// Curve fitting and mesh generation used to realize lines and spheres.

use cube_core::mesh::{ribbon_into, uv_sphere};
use cube_core::spline::{catmull_rom_point, resample_into};
use glam::Vec3;

fn near(a: Vec3, b: Vec3) -> bool {
    a.abs_diff_eq(b, 1e-4)
}

// ---------------- Catmull-Rom ----------------

#[test]
fn curve_passes_through_control_points() {
    let pts = [
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(3.0, 1.0, 0.0),
        Vec3::new(4.0, 4.0, 2.0),
        Vec3::new(9.0, 2.0, 1.0),
    ];
    for (i, p) in pts.iter().enumerate() {
        let t = i as f32 / 3.0;
        let got = catmull_rom_point(&pts, t).unwrap();
        assert!(near(got, *p), "t={t}: {got:?} vs {p:?}");
    }
}

#[test]
fn collinear_points_give_a_straight_curve() {
    let pts: Vec<Vec3> = (0..5).map(|i| Vec3::new(i as f32 * 2.0, 1.0, -1.0)).collect();
    let mut out = Vec::new();
    resample_into(&pts, 25, &mut out);
    assert_eq!(out.len(), 25);
    for w in out.windows(2) {
        assert!((w[0].y - 1.0).abs() < 1e-4 && (w[0].z + 1.0).abs() < 1e-4);
        assert!(w[1].x >= w[0].x - 1e-4);
    }
}

#[test]
fn resample_keeps_endpoints_and_reuses_buffer() {
    let pts = [Vec3::ZERO, Vec3::new(1.0, 2.0, 0.0), Vec3::new(2.0, 0.0, 5.0)];
    let mut out = vec![Vec3::splat(99.0); 40];
    resample_into(&pts, 9, &mut out);
    assert_eq!(out.len(), 9);
    assert!(near(out[0], pts[0]));
    assert!(near(out[4], pts[1]));
    assert!(near(out[8], pts[2]));
}

#[test]
fn repeated_points_do_not_produce_nan() {
    let pts = [Vec3::ONE, Vec3::ONE, Vec3::new(2.0, 1.0, 1.0)];
    let mut out = Vec::new();
    resample_into(&pts, 16, &mut out);
    assert!(out.iter().all(|p| p.is_finite()));
}

#[test]
fn degenerate_inputs() {
    assert_eq!(catmull_rom_point(&[], 0.5), None);
    assert_eq!(catmull_rom_point(&[Vec3::X], 0.7), Some(Vec3::X));
    let mut out = vec![Vec3::ONE];
    resample_into(&[], 4, &mut out);
    assert!(out.is_empty());
    resample_into(&[Vec3::Y, Vec3::Z], 1, &mut out);
    assert_eq!(out, vec![Vec3::Y]);
}

// ---------------- Meshes ----------------

#[test]
fn uv_sphere_is_a_closed_unit_mesh() {
    let (vertices, indices) = uv_sphere(8);
    assert_eq!(vertices.len(), 81);
    // two triangles per quad, one at each pole row
    assert_eq!(indices.len(), (8 * 8 * 2 - 2 * 8) * 3);
    assert!(vertices.iter().all(|v| (v.length() - 1.0).abs() < 1e-5));
    assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
}

#[test]
fn ribbon_faces_the_eye() {
    let pts: Vec<Vec3> = (0..4).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect();
    let mut out = Vec::new();
    ribbon_into(&pts, 0.5, Vec3::new(1.5, 0.0, 100.0), &mut out);
    assert_eq!(out.len(), 3 * 6);
    for v in &out {
        // offsets lie in the plane facing the eye, so z stays on the line
        assert!(v.z.abs() < 1e-4);
        assert!((v.y.abs() - 0.5).abs() < 1e-4);
    }
}

#[test]
fn ribbon_needs_two_points() {
    let mut out = vec![Vec3::ZERO; 3];
    ribbon_into(&[Vec3::ONE], 1.0, Vec3::Z, &mut out);
    assert!(out.is_empty());
}
