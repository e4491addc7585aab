use glam::Vec3;

use crate::constants::LINE_DEFAULT_COLOR;
use crate::error::CubeError;
use crate::scene::PrimitiveId;
use crate::sine::SineEmitter;

/// One parametric path traced through the grid, with its display color and
/// the per-tick buffers its geometry is rebuilt in.
#[derive(Clone, Debug)]
pub struct Line {
    emitter: SineEmitter,
    pub color: Vec3,
    /// Set on the first tick that realizes the line in the scene.
    pub primitive: Option<PrimitiveId>,
    pub(crate) samples: Vec<Vec3>,
    pub(crate) curve: Vec<Vec3>,
}

impl Line {
    /// Wrap a three-axis emitter; the line stays white until first realized.
    pub fn new(emitter: SineEmitter) -> Result<Self, CubeError> {
        if emitter.dims() != 3 {
            return Err(CubeError::LineDimensions {
                found: emitter.dims(),
            });
        }
        Ok(Self {
            emitter,
            color: Vec3::from(LINE_DEFAULT_COLOR),
            primitive: None,
            samples: Vec::new(),
            curve: Vec::new(),
        })
    }

    #[inline]
    pub fn emitter(&self) -> &SineEmitter {
        &self.emitter
    }

    /// Spatial points sampled on the most recent tick.
    #[inline]
    pub fn samples(&self) -> &[Vec3] {
        &self.samples
    }

    /// Smoothed curve published on the most recent tick.
    #[inline]
    pub fn curve(&self) -> &[Vec3] {
        &self.curve
    }

    /// Size the reusable buffers for an `n`-sided grid.
    pub(crate) fn reserve_for(&mut self, n: usize) {
        self.samples.reserve_exact(n.saturating_sub(self.samples.capacity()));
        self.curve
            .reserve_exact((n * n).saturating_sub(self.curve.capacity()));
    }
}
