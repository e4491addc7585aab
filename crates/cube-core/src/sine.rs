//! Parametric n-dimensional sine generator.
//!
//! A [`SineEmitter`] evaluates, for every axis `i`,
//!
//! ```text
//! magnitude[i] * sin(spatial[i] * position[i] + temporal[i] * time + phase[i]) + offset[i]
//! ```
//!
//! Parameters are validated once when the emitter is made; evaluating it
//! never fails for a scalar position and has no internal state. Time is
//! `f64` and the sine argument is formed in double precision, so long
//! sessions keep their phase.

use glam::Vec3;
use rand::Rng;
use smallvec::SmallVec;

use crate::error::CubeError;

pub type Axes = SmallVec<[f32; 3]>;

/// A sine parameter given either once for every axis or per axis.
#[derive(Clone, Debug, PartialEq)]
pub enum AxisParam {
    Scalar(f32),
    PerAxis(Axes),
}

impl From<f32> for AxisParam {
    fn from(v: f32) -> Self {
        AxisParam::Scalar(v)
    }
}

impl<const N: usize> From<[f32; N]> for AxisParam {
    fn from(v: [f32; N]) -> Self {
        AxisParam::PerAxis(v.iter().copied().collect())
    }
}

impl From<&[f32]> for AxisParam {
    fn from(v: &[f32]) -> Self {
        AxisParam::PerAxis(v.iter().copied().collect())
    }
}

impl From<Vec<f32>> for AxisParam {
    fn from(v: Vec<f32>) -> Self {
        AxisParam::PerAxis(v.into_iter().collect())
    }
}

impl AxisParam {
    /// Expand to exactly `dims` values; `argument` names the parameter slot in errors.
    fn broadcast(self, dims: usize, argument: usize) -> Result<Axes, CubeError> {
        match self {
            AxisParam::Scalar(v) => Ok(std::iter::repeat(v).take(dims).collect()),
            AxisParam::PerAxis(values) if values.len() == dims => Ok(values),
            AxisParam::PerAxis(values) => Err(CubeError::DimensionMismatch {
                argument,
                expected: dims,
                found: values.len(),
            }),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SineEmitter {
    magnitude: Axes,
    spatial: Axes,
    temporal: Axes,
    phase: Axes,
    offset: Axes,
}

/// Build an emitter from magnitude, spatial multiplier, temporal multiplier,
/// inside (phase) constant and outside (offset) constant over `dims` axes.
///
/// Scalars repeat for every axis. Fails if `dims` is 0 or any per-axis
/// parameter has a length other than `dims`.
pub fn sine_emitter(
    magnitude: impl Into<AxisParam>,
    spatial: impl Into<AxisParam>,
    temporal: impl Into<AxisParam>,
    phase: impl Into<AxisParam>,
    offset: impl Into<AxisParam>,
    dims: usize,
) -> Result<SineEmitter, CubeError> {
    if dims == 0 {
        return Err(CubeError::NonPositiveDimensions);
    }
    Ok(SineEmitter {
        magnitude: magnitude.into().broadcast(dims, 0)?,
        spatial: spatial.into().broadcast(dims, 1)?,
        temporal: temporal.into().broadcast(dims, 2)?,
        phase: phase.into().broadcast(dims, 3)?,
        offset: offset.into().broadcast(dims, 4)?,
    })
}

impl SineEmitter {
    /// Three-axis emitter with the given magnitude and every other sine
    /// parameter drawn uniformly from [-1, 1]; no outside offset.
    pub fn random<R: Rng>(magnitude: f32, rng: &mut R) -> Self {
        let mut ident = || -> Axes { (0..3).map(|_| rng.gen_range(-1.0..=1.0)).collect() };
        let spatial = ident();
        let temporal = ident();
        let phase = ident();
        Self {
            magnitude: std::iter::repeat(magnitude).take(3).collect(),
            spatial,
            temporal,
            phase,
            offset: std::iter::repeat(0.0).take(3).collect(),
        }
    }

    #[inline]
    pub fn dims(&self) -> usize {
        self.magnitude.len()
    }

    #[inline]
    fn axis(&self, i: usize, position: f32, time: f64) -> f32 {
        let arg = self.spatial[i] as f64 * position as f64
            + self.temporal[i] as f64 * time
            + self.phase[i] as f64;
        self.magnitude[i] * arg.sin() as f32 + self.offset[i]
    }

    /// Evaluate with the same position on every axis.
    pub fn emit(&self, position: f32, time: f64) -> Axes {
        (0..self.dims()).map(|i| self.axis(i, position, time)).collect()
    }

    /// Evaluate with one position per axis.
    pub fn emit_axes(&self, positions: &[f32], time: f64) -> Result<Axes, CubeError> {
        if positions.len() != self.dims() {
            return Err(CubeError::DimensionMismatch {
                argument: 0,
                expected: self.dims(),
                found: positions.len(),
            });
        }
        Ok(positions
            .iter()
            .enumerate()
            .map(|(i, &p)| self.axis(i, p, time))
            .collect())
    }

    /// First three axes as a vector; missing axes read as zero.
    #[inline]
    pub fn emit_vec3(&self, position: f32, time: f64) -> Vec3 {
        let get = |i: usize| {
            if i < self.dims() {
                self.axis(i, position, time)
            } else {
                0.0
            }
        };
        Vec3::new(get(0), get(1), get(2))
    }
}
