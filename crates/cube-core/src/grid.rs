//! Grid enumeration and per-cell visual state.
//!
//! Cells live in one flat array in [`iterate_cube`] order (x outermost,
//! z innermost), so a cell at `(x, y, z)` is always found at
//! `x * N² + y * N + z` by both the scene builder and every tick.

use glam::{UVec3, Vec3};

use crate::color::hsl;
use crate::constants::*;
use crate::scene::PrimitiveId;

/// Visit every integer coordinate of an `n`×`n`×`n` grid, x-major, z-minor.
pub fn iterate_cube(n: usize, mut visit: impl FnMut(usize, usize, usize)) {
    for x in 0..n {
        for y in 0..n {
            for z in 0..n {
                visit(x, y, z);
            }
        }
    }
}

#[inline]
pub fn flat_index(n: usize, x: usize, y: usize, z: usize) -> usize {
    x * n * n + y * n + z
}

/// World-space center of a cell: `r * (1 + 2g * coord)` on each axis.
#[inline]
pub fn cell_position(coord: UVec3, radius: f32, gap: f32) -> Vec3 {
    (Vec3::ONE + 2.0 * gap * coord.as_vec3()) * radius
}

/// Color a cell gets when the scene is built: hue follows `(x+y+z) / 3N`.
#[inline]
pub fn build_color(coord: UVec3, n: usize) -> Vec3 {
    let hue = (coord.x + coord.y + coord.z) as f32 / (n as f32 * 3.0);
    hsl(hue, CELL_SATURATION, CELL_LIGHTNESS)
}

/// Color a cell is reset to at the start of every tick: hue follows `xyz / N³`.
#[inline]
pub fn baseline_color(coord: UVec3, n: usize) -> Vec3 {
    let hue = (coord.x * coord.y * coord.z) as f32 / (n as f32).powi(3);
    hsl(hue, CELL_SATURATION, CELL_LIGHTNESS)
}

#[derive(Clone, Debug)]
pub struct GridCell {
    pub coord: UVec3,
    /// Cached from `coord`, radius and gap; refreshed on reconfigure.
    pub position: Vec3,
    pub color: Vec3,
    pub opacity: f32,
    pub transparent: bool,
    /// Size multiplier; 1 is at rest.
    pub scale: f32,
    /// Sphere primitive this cell drives in the scene backend.
    pub primitive: PrimitiveId,
}

impl GridCell {
    pub fn new(coord: UVec3, position: Vec3, color: Vec3, primitive: PrimitiveId) -> Self {
        Self {
            coord,
            position,
            color,
            opacity: CELL_BUILD_OPACITY,
            transparent: true,
            scale: REST_SCALE,
            primitive,
        }
    }

    /// Restore the translucent resting look with the given color.
    #[inline]
    pub fn reset_style(&mut self, color: Vec3) {
        self.color = color;
        self.opacity = CELL_REST_OPACITY;
        self.transparent = true;
    }

    /// One step of scale relaxation toward rest.
    ///
    /// Above rest the scale decays by `decay`; an undershoot below rest is
    /// corrected in a single step.
    #[inline]
    pub fn relax_scale(&mut self, decay: f32) {
        if self.scale > REST_SCALE {
            self.scale *= decay;
        } else if self.scale < REST_SCALE {
            // multiplying by 1/scale can land a ulp short of rest
            self.scale = REST_SCALE;
        }
    }

    /// Mark the cell as touched by a line. Only a resting cell snaps to the
    /// close scale; an already enlarged one keeps decaying.
    #[inline]
    pub fn highlight(&mut self, color: Vec3, close_scale: f32) {
        if self.scale <= REST_SCALE {
            self.scale = close_scale;
        }
        self.color = color;
        self.opacity = CELL_HIGHLIGHT_OPACITY;
        self.transparent = false;
    }
}
