use glam::IVec3;
use thiserror::Error;

/// Errors raised while building or driving a cube scene.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CubeError {
    #[error("invalid dimensions on argument {argument}: expected {expected}, found {found}")]
    DimensionMismatch {
        argument: usize,
        expected: usize,
        found: usize,
    },

    #[error("you can't have 0 or negative dimensions")]
    NonPositiveDimensions,

    #[error("line generators must emit 3 axes, found {found}")]
    LineDimensions { found: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    #[error("3D rendering is not supported in this environment")]
    RenderingUnsupported,

    #[error("line {line} sample {position} maps to cell {coord} outside the grid")]
    SampleOutsideGrid {
        line: usize,
        position: usize,
        coord: IVec3,
    },

    #[error("cube size and line count cannot change after the scene is built")]
    GridShapeChanged,

    #[error("gpu error: {0}")]
    Gpu(String),
}
