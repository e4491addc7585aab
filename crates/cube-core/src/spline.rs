//! Centripetal Catmull-Rom curve through a point sequence.
//!
//! Open curve: the virtual control points before the first and after the
//! last sample are mirrored from their neighbours.

use glam::Vec3;

const MIN_SEGMENT: f32 = 1e-4;

/// Evaluate the curve through `points` at parameter `t` in [0, 1].
///
/// Returns `None` for an empty point list.
pub fn catmull_rom_point(points: &[Vec3], t: f32) -> Option<Vec3> {
    let l = points.len();
    match l {
        0 => return None,
        1 => return Some(points[0]),
        _ => {}
    }

    let p = (l - 1) as f32 * t.clamp(0.0, 1.0);
    let mut seg = p.floor() as usize;
    let mut weight = p - seg as f32;
    if seg >= l - 1 {
        seg = l - 2;
        weight = 1.0;
    }

    let p1 = points[seg];
    let p2 = points[seg + 1];
    let p0 = if seg > 0 {
        points[seg - 1]
    } else {
        2.0 * points[0] - points[1]
    };
    let p3 = if seg + 2 < l {
        points[seg + 2]
    } else {
        2.0 * points[l - 1] - points[l - 2]
    };

    let mut dt0 = p0.distance_squared(p1).powf(0.25);
    let mut dt1 = p1.distance_squared(p2).powf(0.25);
    let mut dt2 = p2.distance_squared(p3).powf(0.25);
    if dt1 < MIN_SEGMENT {
        dt1 = 1.0;
    }
    if dt0 < MIN_SEGMENT {
        dt0 = dt1;
    }
    if dt2 < MIN_SEGMENT {
        dt2 = dt1;
    }

    Some(nonuniform_segment(p0, p1, p2, p3, dt0, dt1, dt2, weight))
}

// Cubic Hermite segment p1 -> p2 with tangents from a non-uniform parameterisation.
#[allow(clippy::too_many_arguments)]
fn nonuniform_segment(
    p0: Vec3,
    p1: Vec3,
    p2: Vec3,
    p3: Vec3,
    dt0: f32,
    dt1: f32,
    dt2: f32,
    w: f32,
) -> Vec3 {
    let t1 = ((p1 - p0) / dt0 - (p2 - p0) / (dt0 + dt1) + (p2 - p1) / dt1) * dt1;
    let t2 = ((p2 - p1) / dt1 - (p3 - p1) / (dt1 + dt2) + (p3 - p2) / dt2) * dt1;

    let c0 = p1;
    let c1 = t1;
    let c2 = -3.0 * p1 + 3.0 * p2 - 2.0 * t1 - t2;
    let c3 = 2.0 * p1 - 2.0 * p2 + t1 + t2;

    let w2 = w * w;
    c0 + c1 * w + c2 * w2 + c3 * w2 * w
}

/// Fill `out` with `count` points spaced evenly in curve parameter, first
/// and last sample included. `out` is cleared first so its allocation can be
/// reused tick after tick.
pub fn resample_into(points: &[Vec3], count: usize, out: &mut Vec<Vec3>) {
    out.clear();
    if points.is_empty() || count == 0 {
        return;
    }
    if count == 1 {
        out.push(points[0]);
        return;
    }
    let last = (count - 1) as f32;
    out.extend((0..count).filter_map(|i| catmull_rom_point(points, i as f32 / last)));
}
