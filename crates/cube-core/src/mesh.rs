//! CPU-side geometry for the primitive factories: a unit UV sphere and a
//! camera-facing ribbon around a polyline.

use glam::Vec3;

/// Unit UV sphere with `segments` slices and stacks.
///
/// Returns vertex positions (which double as normals) and triangle indices.
pub fn uv_sphere(segments: u32) -> (Vec<Vec3>, Vec<u32>) {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity(((segments + 1) * (segments + 1)) as usize);
    for stack in 0..=segments {
        let v = stack as f32 / segments as f32;
        let theta = v * std::f32::consts::PI;
        for slice in 0..=segments {
            let u = slice as f32 / segments as f32;
            let phi = u * std::f32::consts::TAU;
            vertices.push(Vec3::new(
                -phi.cos() * theta.sin(),
                theta.cos(),
                phi.sin() * theta.sin(),
            ));
        }
    }

    let row = segments + 1;
    let mut indices = Vec::with_capacity((segments * segments * 6) as usize);
    for stack in 0..segments {
        for slice in 0..segments {
            let a = stack * row + slice + 1;
            let b = stack * row + slice;
            let c = (stack + 1) * row + slice;
            let d = (stack + 1) * row + slice + 1;
            // poles collapse to a single triangle per quad
            if stack != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if stack != segments - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    (vertices, indices)
}

/// Expand a polyline into a triangle list ribbon of the given half-width
/// whose face turns toward `eye`. Writes 6 vertices per segment into `out`
/// after clearing it.
pub fn ribbon_into(points: &[Vec3], half_width: f32, eye: Vec3, out: &mut Vec<Vec3>) {
    out.clear();
    if points.len() < 2 {
        return;
    }
    let side_at = |i: usize| -> Vec3 {
        let prev = points[i.saturating_sub(1)];
        let next = points[(i + 1).min(points.len() - 1)];
        let tangent = (next - prev).normalize_or_zero();
        let to_eye = (eye - points[i]).normalize_or_zero();
        tangent.cross(to_eye).normalize_or_zero() * half_width
    };

    let mut prev_side = side_at(0);
    for i in 1..points.len() {
        let side = side_at(i);
        let (a, b) = (points[i - 1], points[i]);
        out.extend_from_slice(&[
            a - prev_side,
            a + prev_side,
            b + side,
            a - prev_side,
            b + side,
            b - side,
        ]);
        prev_side = side;
    }
}
