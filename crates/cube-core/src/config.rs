use crate::constants::ORBIT_GAP_FACTOR;
use crate::error::CubeError;

/// Scene configuration. Fixed for the lifetime of a scene until explicitly
/// reconfigured.
#[derive(Clone, Debug, PartialEq)]
pub struct GridConfig {
    /// Side length N of the grid (amount of spheres along one edge).
    pub cube_size: usize,
    /// Radius of every sphere.
    pub sphere_radius: f32,
    /// Gap between spheres in terms of sphere radius.
    pub sphere_gap: f32,
    /// Amount of moving sine lines.
    pub number_of_lines: usize,
    /// Opaque background as `0xRRGGBB`; `None` renders on a transparent surface.
    pub background_clear: Option<u32>,
    /// Per-tick decay applied to the scale of highlighted spheres.
    pub radius_decay_rate: f32,
    /// Scale a resting sphere jumps to when a line passes through it.
    pub close_sphere_scale: f32,
    /// Factor the frame counter is multiplied by (so like `sin(factor * frame)`).
    pub time_factor: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cube_size: 7,
            sphere_radius: 5.0,
            sphere_gap: 8.0,
            number_of_lines: 6,
            background_clear: Some(0x000111),
            radius_decay_rate: 0.99,
            close_sphere_scale: 3.0,
            time_factor: 1.0 / 200.0,
        }
    }
}

impl GridConfig {
    pub fn validate(&self) -> Result<(), CubeError> {
        if self.cube_size < 1 {
            return Err(CubeError::InvalidConfig("cube_size must be at least 1"));
        }
        // line magnitude is N-2, which turns negative below 2
        if self.cube_size < 2 && self.number_of_lines > 0 {
            return Err(CubeError::InvalidConfig(
                "cube_size must be at least 2 when lines are drawn",
            ));
        }
        if !(self.sphere_radius > 0.0) {
            return Err(CubeError::InvalidConfig("sphere_radius must be positive"));
        }
        if !(self.sphere_gap > 0.0) {
            return Err(CubeError::InvalidConfig("sphere_gap must be positive"));
        }
        if !(self.radius_decay_rate > 0.0 && self.radius_decay_rate < 1.0) {
            return Err(CubeError::InvalidConfig(
                "radius_decay_rate must lie strictly between 0 and 1",
            ));
        }
        if !(self.close_sphere_scale > 0.0) {
            return Err(CubeError::InvalidConfig(
                "close_sphere_scale must be positive",
            ));
        }
        if !(self.time_factor > 0.0) {
            return Err(CubeError::InvalidConfig("time_factor must be positive"));
        }
        Ok(())
    }

    /// Aggregate edge length of the whole grid: `2r(g(N-1)+1)`.
    #[inline]
    pub fn cube_length(&self) -> f32 {
        2.0 * self.sphere_radius * (self.sphere_gap * (self.cube_size as f32 - 1.0) + 1.0)
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cube_size.pow(3)
    }

    /// Distance between the camera orbit and the cube's vertical axis.
    #[inline]
    pub fn orbit_radius(&self) -> f32 {
        self.cube_length() + self.sphere_radius * self.sphere_gap * ORBIT_GAP_FACTOR
    }

    /// Whether `other` keeps the same cell and line counts as `self`.
    #[inline]
    pub fn same_shape(&self, other: &GridConfig) -> bool {
        self.cube_size == other.cube_size && self.number_of_lines == other.number_of_lines
    }
}
