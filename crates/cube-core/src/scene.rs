//! Interfaces the engine consumes from a renderer.
//!
//! The engine owns all visual state (cells, lines, camera) and talks to the
//! renderer only through [`SceneBackend`]: it asks for sphere and line
//! primitives once, replaces line geometry every tick and hands over a
//! [`FrameView`] whenever the host is ready to paint.

use glam::{UVec2, Vec3};

use crate::error::CubeError;
use crate::grid::GridCell;
use crate::state::Camera;

/// Opaque handle to a primitive owned by a [`SceneBackend`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct PrimitiveId(pub u32);

/// Everything a backend needs to make a sphere primitive.
#[derive(Clone, Debug, PartialEq)]
pub struct SphereDesc {
    pub position: Vec3,
    pub radius: f32,
    /// Width/height segment count of the sphere mesh.
    pub edges: u32,
    pub color: Vec3,
    pub opacity: f32,
}

/// Polyline to be drawn as a thick, camera-facing ribbon.
#[derive(Clone, Copy, Debug)]
pub struct LineGeometry<'a> {
    pub points: &'a [Vec3],
    pub half_width: f32,
    /// Eye position the ribbon should face.
    pub eye: Vec3,
}

/// Everything a backend needs to make a line primitive.
#[derive(Clone, Copy, Debug)]
pub struct LineDesc<'a> {
    pub resolution: UVec2,
    pub camera: &'a Camera,
    pub color: Vec3,
    pub geometry: LineGeometry<'a>,
}

/// Read-only snapshot handed to the backend on every paint.
#[derive(Clone, Copy, Debug)]
pub struct FrameView<'a> {
    pub camera: &'a Camera,
    pub cells: &'a [GridCell],
    pub sphere_radius: f32,
    /// `None` paints on a transparent surface.
    pub background: Option<Vec3>,
}

pub trait SceneBackend {
    /// Whether this environment can render 3D at all.
    fn supports_rendering(&self) -> bool {
        true
    }

    /// Show a diagnostic in place of the visualization.
    fn report_unsupported(&mut self, _message: &str) {}

    fn add_sphere(&mut self, desc: &SphereDesc) -> PrimitiveId;

    fn add_line(&mut self, desc: &LineDesc<'_>) -> PrimitiveId;

    /// Free the geometry currently attached to a line primitive.
    fn release_line_geometry(&mut self, id: PrimitiveId);

    /// Attach new geometry to a line primitive whose old geometry was released.
    fn set_line_geometry(&mut self, id: PrimitiveId, geometry: &LineGeometry<'_>);

    fn remove(&mut self, id: PrimitiveId);

    fn clear(&mut self);

    fn render(&mut self, view: &FrameView<'_>) -> Result<(), CubeError>;

    fn resize(&mut self, width: u32, height: u32);
}

/// Diagnostic text shown when 3D rendering is unavailable. `api_present`
/// tells a missing API (old browser) apart from a missing adapter.
pub fn unsupported_message(api_present: bool) -> String {
    let culprit = if api_present { "graphics card" } else { "browser" };
    format!("Your {culprit} does not seem to support WebGPU")
}

/// Device-pixel size of a drawing surface laid out at `width` x `height`
/// CSS pixels. Never smaller than one pixel per side.
pub fn backing_size(width: u32, height: u32, pixel_ratio: f64) -> (u32, u32) {
    let ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
        pixel_ratio
    } else {
        1.0
    };
    let scale = |v: u32| ((v as f64 * ratio).round() as u32).max(1);
    (scale(width), scale(height))
}
