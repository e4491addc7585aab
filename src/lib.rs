#![cfg(target_arch = "wasm32")]
//! Browser host: mounts a cube-of-spheres scene into a DOM container and
//! drives it with WebGPU.

use std::cell::RefCell;
use std::rc::Rc;

use cube_core::gpu::GpuScene;
use cube_core::{unsupported_message, CubeError, GridConfig, Visualizer};
use wasm_bindgen::prelude::*;
use web_sys as web;

mod dom;
mod frame;
mod options;

pub use options::VisualizerOptions;

use frame::{Driver, SharedVisualizer};

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("cube-web loaded");
    Ok(())
}

/// A running visualization bound to one container element.
#[wasm_bindgen]
pub struct CubeVisualizer {
    canvas: web::HtmlCanvasElement,
    // layout size in CSS pixels; the scene itself works in device pixels
    css_size: (u32, u32),
    vis: SharedVisualizer,
    driver: Driver,
}

#[wasm_bindgen]
impl CubeVisualizer {
    /// Build the scene inside `container` and start animating it.
    ///
    /// When WebGPU is unavailable a notice is placed in the container and
    /// the returned promise rejects.
    pub async fn create(
        container: web::HtmlElement,
        width: u32,
        height: u32,
        options: Option<VisualizerOptions>,
    ) -> Result<CubeVisualizer, JsValue> {
        let options = options.unwrap_or_default();
        mount(container, width, height, options.config().clone(), options.seed())
            .await
            .map_err(|e| JsValue::from_str(&format!("{e:#}")))
    }

    #[wasm_bindgen(js_name = setSize)]
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.css_size = (width, height);
        let (w, h) = dom::set_backing_size(&self.canvas, width, height);
        self.vis.borrow_mut().set_size(w, h);
    }

    #[wasm_bindgen(js_name = setWidth)]
    pub fn set_width(&mut self, width: u32) {
        self.css_size.0 = width;
        let (w, _) = dom::set_backing_size(&self.canvas, width, self.css_size.1);
        self.vis.borrow_mut().set_width(w);
    }

    #[wasm_bindgen(js_name = setHeight)]
    pub fn set_height(&mut self, height: u32) {
        self.css_size.1 = height;
        let (_, h) = dom::set_backing_size(&self.canvas, self.css_size.0, height);
        self.vis.borrow_mut().set_height(h);
    }

    /// Apply new options. Cube size and line count must stay the same.
    /// Switching between a solid and a transparent background also switches
    /// how the canvas composites with the page.
    pub fn reconfigure(&mut self, options: &VisualizerOptions) -> Result<(), JsValue> {
        self.vis
            .borrow_mut()
            .reconfigure(options.config().clone())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Frames simulated so far.
    #[wasm_bindgen(getter)]
    pub fn frame(&self) -> f64 {
        self.vis.borrow().frame() as f64
    }

    /// Stop both loops, release every primitive and remove the canvas.
    pub fn destroy(mut self) {
        self.driver.stop();
        let CubeVisualizer { canvas, vis, .. } = self;
        match Rc::try_unwrap(vis) {
            Ok(cell) => {
                _ = cell.into_inner().teardown();
            }
            Err(_) => log::warn!("[scene] visualizer still shared at destroy"),
        }
        canvas.remove();
        log::info!("[scene] destroyed");
    }
}

async fn mount(
    container: web::HtmlElement,
    width: u32,
    height: u32,
    config: GridConfig,
    seed: Option<u64>,
) -> anyhow::Result<CubeVisualizer> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let api_present = dom::webgpu_available();
    if !api_present {
        dom::show_message(&document, &container, &unsupported_message(false));
        return Err(CubeError::RenderingUnsupported.into());
    }

    let (canvas, (px_width, px_height)) = dom::attach_canvas(&document, &container, width, height)?;
    let instance = wgpu::Instance::default();
    let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
    let backend =
        match GpuScene::new(&instance, surface, px_width, px_height, config.background_clear).await {
            Ok(b) => b,
            Err(e) => {
                canvas.remove();
                if e == CubeError::RenderingUnsupported {
                    dom::show_message(&document, &container, &unsupported_message(api_present));
                }
                return Err(e.into());
            }
        };

    let vis = match seed {
        Some(seed) => Visualizer::with_seed(backend, px_width, px_height, config, seed)?,
        None => Visualizer::new(backend, px_width, px_height, config)?,
    };
    let vis: SharedVisualizer = Rc::new(RefCell::new(vis));
    let driver = Driver::start(vis.clone())?;
    Ok(CubeVisualizer {
        canvas,
        css_size: (width, height),
        vis,
        driver,
    })
}
