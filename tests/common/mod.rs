// Scene backend that records every call instead of drawing.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use cube_core::{
    CubeError, FrameView, GridConfig, LineDesc, LineGeometry, PrimitiveId, SceneBackend,
    SphereDesc,
};
use glam::Vec3;

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    AddLine(PrimitiveId),
    Release(PrimitiveId),
    Set(PrimitiveId, usize),
    Remove(PrimitiveId),
}

#[derive(Default)]
pub struct RecordingScene {
    pub unsupported: bool,
    /// Shared so it can be inspected after a failed constructor consumed the backend.
    pub notices: Rc<RefCell<Vec<String>>>,
    next_id: u32,
    pub spheres: Vec<(PrimitiveId, SphereDesc)>,
    pub line_colors: Vec<(PrimitiveId, Vec3)>,
    pub calls: Vec<Call>,
    pub last_size: Option<(u32, u32)>,
    pub clears: usize,
    pub renders: usize,
    pub last_background: Option<Vec3>,
}

impl RecordingScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unsupported() -> Self {
        Self {
            unsupported: true,
            ..Self::default()
        }
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    fn allocate(&mut self) -> PrimitiveId {
        let id = PrimitiveId(self.next_id);
        self.next_id += 1;
        id
    }
}

impl SceneBackend for RecordingScene {
    fn supports_rendering(&self) -> bool {
        !self.unsupported
    }

    fn report_unsupported(&mut self, message: &str) {
        self.notices.borrow_mut().push(message.to_string());
    }

    fn add_sphere(&mut self, desc: &SphereDesc) -> PrimitiveId {
        let id = self.allocate();
        self.spheres.push((id, desc.clone()));
        id
    }

    fn add_line(&mut self, desc: &LineDesc<'_>) -> PrimitiveId {
        let id = self.allocate();
        self.line_colors.push((id, desc.color));
        self.calls.push(Call::AddLine(id));
        id
    }

    fn release_line_geometry(&mut self, id: PrimitiveId) {
        self.calls.push(Call::Release(id));
    }

    fn set_line_geometry(&mut self, id: PrimitiveId, geometry: &LineGeometry<'_>) {
        self.calls.push(Call::Set(id, geometry.points.len()));
    }

    fn remove(&mut self, id: PrimitiveId) {
        self.calls.push(Call::Remove(id));
    }

    fn clear(&mut self) {
        self.clears += 1;
    }

    fn render(&mut self, view: &FrameView<'_>) -> Result<(), CubeError> {
        self.renders += 1;
        self.last_background = view.background;
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.last_size = Some((width, height));
    }
}

/// Small grid with unit spheres, handy for checking exact geometry.
pub fn small_config(cube_size: usize, number_of_lines: usize) -> GridConfig {
    GridConfig {
        cube_size,
        number_of_lines,
        sphere_radius: 1.0,
        sphere_gap: 1.0,
        ..GridConfig::default()
    }
}

pub fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

pub fn approx_vec(a: Vec3, b: Vec3) -> bool {
    a.abs_diff_eq(b, 1e-4)
}
