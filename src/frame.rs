use std::cell::{Cell, RefCell};
use std::rc::Rc;

use cube_core::gpu::GpuScene;
use cube_core::{Visualizer, LOGIC_TICKS_PER_SECOND};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub type SharedVisualizer = Rc<RefCell<Visualizer<GpuScene<'static>>>>;

/// Owns the two browser loops driving a scene: a `setInterval` logic loop at
/// a fixed rate and a `requestAnimationFrame` paint loop. Both stop on
/// [`Driver::stop`].
pub struct Driver {
    running: Rc<Cell<bool>>,
    interval: Option<i32>,
    raf_handle: Rc<Cell<Option<i32>>>,
    // keep the callbacks alive for as long as the loops may fire
    _logic: Option<Closure<dyn FnMut()>>,
    paint: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
}

impl Driver {
    pub fn start(vis: SharedVisualizer) -> anyhow::Result<Self> {
        let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
        let running = Rc::new(Cell::new(true));

        let logic_vis = vis.clone();
        let logic_running = running.clone();
        let logic = Closure::wrap(Box::new(move || {
            if !logic_running.get() {
                return;
            }
            if let Err(e) = logic_vis.borrow_mut().tick() {
                log::error!("[tick] {e}");
            }
        }) as Box<dyn FnMut()>);
        let interval = window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                logic.as_ref().unchecked_ref(),
                (1000 / LOGIC_TICKS_PER_SECOND) as i32,
            )
            .map_err(|e| anyhow::anyhow!("setInterval failed: {:?}", e))?;

        let paint: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
        let raf_handle = Rc::new(Cell::new(None));
        let paint_clone = paint.clone();
        let paint_running = running.clone();
        let paint_handle = raf_handle.clone();
        *paint.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            if !paint_running.get() {
                return;
            }
            if let Err(e) = vis.borrow_mut().paint() {
                log::error!("[paint] {e}");
            }
            paint_handle.set(request_frame(&paint_clone));
        }) as Box<dyn FnMut()>));
        raf_handle.set(request_frame(&paint));

        log::info!("[driver] started tick_ms={}", 1000 / LOGIC_TICKS_PER_SECOND);
        Ok(Self {
            running,
            interval: Some(interval),
            raf_handle,
            _logic: Some(logic),
            paint,
        })
    }

    pub fn stop(&mut self) {
        self.running.set(false);
        if let Some(w) = web::window() {
            if let Some(id) = self.interval.take() {
                w.clear_interval_with_handle(id);
            }
            if let Some(id) = self.raf_handle.take() {
                _ = w.cancel_animation_frame(id);
            }
        }
        // break the closure's reference to itself
        self.paint.borrow_mut().take();
        self._logic.take();
    }
}

fn request_frame(callback: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) -> Option<i32> {
    let window = web::window()?;
    let cb = callback.borrow();
    window
        .request_animation_frame(cb.as_ref()?.as_ref().unchecked_ref())
        .ok()
}
