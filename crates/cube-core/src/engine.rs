//! Scene construction and the per-tick update pass.
//!
//! A [`Visualizer`] owns the grid cells, the lines and the camera, and drives
//! a [`SceneBackend`] with them. Each [`Visualizer::tick`] runs four phases
//! in order: cell reset with scale relaxation, camera orbit, line sampling
//! with cell highlight, and curve fit with geometry publish. A tick never
//! yields halfway, so a paint always sees a fully finished tick.

use glam::{IVec3, UVec2, UVec3, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::color::{from_hex, hsl};
use crate::config::GridConfig;
use crate::constants::*;
use crate::error::CubeError;
use crate::grid::{baseline_color, build_color, cell_position, flat_index, iterate_cube, GridCell};
use crate::line::Line;
use crate::scene::{
    unsupported_message, FrameView, LineDesc, LineGeometry, SceneBackend, SphereDesc,
};
use crate::sine::SineEmitter;
use crate::spline;
use crate::state::Camera;

pub struct Visualizer<B: SceneBackend> {
    config: GridConfig,
    cube_length: f32,
    width: u32,
    height: u32,
    frame: u64,
    camera: Camera,
    cells: Vec<GridCell>,
    lines: Vec<Line>,
    backend: B,
}

impl<B: SceneBackend> Visualizer<B> {
    /// Build a scene with randomly parameterised lines.
    pub fn new(backend: B, width: u32, height: u32, config: GridConfig) -> Result<Self, CubeError> {
        Self::with_rng(backend, width, height, config, &mut StdRng::from_entropy())
    }

    /// Build a scene whose line parameters are reproducible from `seed`.
    pub fn with_seed(
        backend: B,
        width: u32,
        height: u32,
        config: GridConfig,
        seed: u64,
    ) -> Result<Self, CubeError> {
        Self::with_rng(backend, width, height, config, &mut StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        backend: B,
        width: u32,
        height: u32,
        config: GridConfig,
        rng: &mut StdRng,
    ) -> Result<Self, CubeError> {
        // magnitude N-2 keeps the lines off the outermost shell
        let magnitude = config.cube_size as f32 - 2.0;
        let lines = (0..config.number_of_lines)
            .map(|_| Line::new(SineEmitter::random(magnitude, rng)))
            .collect::<Result<Vec<_>, _>>()?;
        Self::with_lines(backend, width, height, config, lines)
    }

    /// Build a scene around explicit lines. `config.number_of_lines` is
    /// overwritten with the amount given.
    pub fn with_lines(
        mut backend: B,
        width: u32,
        height: u32,
        mut config: GridConfig,
        mut lines: Vec<Line>,
    ) -> Result<Self, CubeError> {
        config.number_of_lines = lines.len();
        config.validate()?;

        if !backend.supports_rendering() {
            backend.report_unsupported(&unsupported_message(false));
            return Err(CubeError::RenderingUnsupported);
        }

        let n = config.cube_size;
        let cube_length = config.cube_length();
        backend.resize(width, height);

        let mut cells = Vec::with_capacity(config.cell_count());
        iterate_cube(n, |x, y, z| {
            let coord = UVec3::new(x as u32, y as u32, z as u32);
            let desc = SphereDesc {
                position: cell_position(coord, config.sphere_radius, config.sphere_gap),
                radius: config.sphere_radius,
                edges: SPHERE_EDGES,
                color: build_color(coord, n),
                opacity: CELL_BUILD_OPACITY,
            };
            let primitive = backend.add_sphere(&desc);
            cells.push(GridCell::new(coord, desc.position, desc.color, primitive));
        });

        for line in &mut lines {
            line.reserve_for(n);
        }

        log::info!(
            "[scene] cells={} lines={} cube_length={:.1}",
            cells.len(),
            lines.len(),
            cube_length
        );

        Ok(Self {
            camera: Camera::for_cube(cube_length, width, height),
            config,
            cube_length,
            width,
            height,
            frame: 0,
            cells,
            lines,
            backend,
        })
    }

    /// Advance the logical clock by one frame.
    ///
    /// Fails with [`CubeError::SampleOutsideGrid`] when a line sample rounds
    /// to a cell outside the grid; the rest of that tick is skipped and the
    /// next tick starts over from a clean reset.
    pub fn tick(&mut self) -> Result<(), CubeError> {
        self.frame += 1;
        self.reset_cells();
        self.camera.orbit(self.frame, &self.config);
        for i in 0..self.lines.len() {
            self.trace_line(i)?;
            self.publish_line(i);
        }
        log::trace!("[tick] frame={}", self.frame);
        Ok(())
    }

    // Phase A: baseline look and scale relaxation for every cell.
    fn reset_cells(&mut self) {
        let n = self.config.cube_size;
        let decay = self.config.radius_decay_rate;
        let cells = &mut self.cells;
        iterate_cube(n, |x, y, z| {
            let cell = &mut cells[flat_index(n, x, y, z)];
            cell.reset_style(baseline_color(cell.coord, n));
            cell.relax_scale(decay);
        });
    }

    // Phase C: sample the line's path and highlight the cells it passes.
    fn trace_line(&mut self, i: usize) -> Result<(), CubeError> {
        let n = self.config.cube_size;
        let radius = self.config.sphere_radius;
        let gap = self.config.sphere_gap;
        let close_scale = self.config.close_sphere_scale;
        let time = line_time(self.frame, self.config.time_factor);
        let center = (n as f32 - 2.0) / 2.0 + 1.0;

        let line = &mut self.lines[i];
        line.samples.clear();
        for d in 0..n {
            let grid = line.emitter().emit_vec3(d as f32, time) / 2.0 + Vec3::splat(center);
            let rounded = round_half_up(grid);
            if !in_grid(rounded, n) {
                return Err(CubeError::SampleOutsideGrid {
                    line: i,
                    position: d,
                    coord: rounded,
                });
            }
            line.samples
                .push((Vec3::ONE + 2.0 * gap * grid) * radius);

            let c = rounded.as_uvec3();
            let cell = &mut self.cells[flat_index(n, c.x as usize, c.y as usize, c.z as usize)];
            cell.highlight(line.color, close_scale);
        }
        Ok(())
    }

    // Phase D: fit the curve and hand it to the backend.
    fn publish_line(&mut self, i: usize) {
        let n = self.config.cube_size;
        let half_width = self.config.sphere_radius * LINE_HALF_WIDTH_RADII;
        let line_count = self.lines.len();
        let eye = self.camera.eye;

        let line = &mut self.lines[i];
        spline::resample_into(&line.samples, n * n, &mut line.curve);
        let geometry = LineGeometry {
            points: &line.curve,
            half_width,
            eye,
        };

        match line.primitive {
            Some(id) => {
                self.backend.release_line_geometry(id);
                self.backend.set_line_geometry(id, &geometry);
            }
            None => {
                let color = hsl(i as f32 / line_count as f32, LINE_SATURATION, LINE_LIGHTNESS);
                let id = self.backend.add_line(&LineDesc {
                    resolution: UVec2::new(self.width, self.height),
                    camera: &self.camera,
                    color,
                    geometry,
                });
                line.color = color;
                line.primitive = Some(id);
            }
        }
    }

    /// Submit the most recently finished tick to the renderer.
    pub fn paint(&mut self) -> Result<(), CubeError> {
        self.backend.clear();
        let view = FrameView {
            camera: &self.camera,
            cells: &self.cells,
            sphere_radius: self.config.sphere_radius,
            background: self.config.background_clear.map(from_hex),
        };
        self.backend.render(&view)
    }

    pub fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.update_dimensions();
    }

    pub fn set_width(&mut self, width: u32) {
        self.width = width;
        self.update_dimensions();
    }

    pub fn set_height(&mut self, height: u32) {
        self.height = height;
        self.update_dimensions();
    }

    // The camera keeps the aspect ratio it was built with.
    fn update_dimensions(&mut self) {
        self.backend.resize(self.width, self.height);
    }

    /// Replace the configuration of a built scene.
    ///
    /// Cube size and line count are fixed once cells and lines exist; a
    /// config that changes either is rejected and the old one stays active.
    /// Everything else takes effect from the next tick, with cube length and
    /// cell positions re-derived.
    pub fn reconfigure(&mut self, config: GridConfig) -> Result<(), CubeError> {
        config.validate()?;
        if !self.config.same_shape(&config) {
            log::warn!(
                "[scene] reconfigure rejected: {}x{} lines={} -> {}x{} lines={}",
                self.config.cube_size,
                self.config.cube_size,
                self.config.number_of_lines,
                config.cube_size,
                config.cube_size,
                config.number_of_lines
            );
            return Err(CubeError::GridShapeChanged);
        }
        self.config = config;
        self.cube_length = self.config.cube_length();
        for cell in &mut self.cells {
            cell.position =
                cell_position(cell.coord, self.config.sphere_radius, self.config.sphere_gap);
        }
        Ok(())
    }

    /// Remove every primitive from the backend and hand it back.
    pub fn teardown(mut self) -> B {
        for cell in &self.cells {
            self.backend.remove(cell.primitive);
        }
        for id in self.lines.iter().filter_map(|l| l.primitive) {
            self.backend.remove(id);
        }
        self.backend
    }

    #[inline]
    pub fn config(&self) -> &GridConfig {
        &self.config
    }
    #[inline]
    pub fn cube_length(&self) -> f32 {
        self.cube_length
    }
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }
    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }
    #[inline]
    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }
    #[inline]
    pub fn cells_mut(&mut self) -> &mut [GridCell] {
        &mut self.cells
    }
    #[inline]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }
    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }
    #[inline]
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

/// Generator time for `frame`: `frame * time_factor * 2`, kept in `f64`
/// so the frame counter never loses precision.
#[inline]
pub fn line_time(frame: u64, time_factor: f32) -> f64 {
    frame as f64 * time_factor as f64 * LINE_TIME_MULTIPLIER as f64
}

/// Round each axis with halves going up, so -0.5 lands on cell 0.
#[inline]
pub fn round_half_up(v: Vec3) -> IVec3 {
    (v + Vec3::splat(0.5)).floor().as_ivec3()
}

#[inline]
fn in_grid(c: IVec3, n: usize) -> bool {
    let n = n as i32;
    c.cmpge(IVec3::ZERO).all() && c.cmplt(IVec3::splat(n)).all()
}
