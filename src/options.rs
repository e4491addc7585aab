use cube_core::GridConfig;
use wasm_bindgen::prelude::*;

/// Scene options passed from JavaScript. Unset fields keep their defaults.
#[wasm_bindgen]
#[derive(Clone, Debug, Default)]
pub struct VisualizerOptions {
    config: GridConfig,
    seed: Option<u64>,
}

#[wasm_bindgen]
impl VisualizerOptions {
    #[wasm_bindgen(constructor)]
    pub fn new() -> VisualizerOptions {
        Self::default()
    }

    #[wasm_bindgen(setter = cubeSize)]
    pub fn set_cube_size(&mut self, value: u32) {
        self.config.cube_size = value as usize;
    }

    #[wasm_bindgen(setter = sphereRadius)]
    pub fn set_sphere_radius(&mut self, value: f32) {
        self.config.sphere_radius = value;
    }

    #[wasm_bindgen(setter = sphereGap)]
    pub fn set_sphere_gap(&mut self, value: f32) {
        self.config.sphere_gap = value;
    }

    #[wasm_bindgen(setter = numberOfLines)]
    pub fn set_number_of_lines(&mut self, value: u32) {
        self.config.number_of_lines = value as usize;
    }

    /// Opaque background as `0xRRGGBB`.
    #[wasm_bindgen(setter = backgroundClear)]
    pub fn set_background_clear(&mut self, value: u32) {
        self.config.background_clear = Some(value & 0x00ff_ffff);
    }

    /// Render on a transparent canvas instead of a solid background.
    #[wasm_bindgen(js_name = transparentBackground)]
    pub fn transparent_background(&mut self) {
        self.config.background_clear = None;
    }

    #[wasm_bindgen(setter = radiusDecayRate)]
    pub fn set_radius_decay_rate(&mut self, value: f32) {
        self.config.radius_decay_rate = value;
    }

    #[wasm_bindgen(setter = closeSphereScale)]
    pub fn set_close_sphere_scale(&mut self, value: f32) {
        self.config.close_sphere_scale = value;
    }

    #[wasm_bindgen(setter = timeFactor)]
    pub fn set_time_factor(&mut self, value: f32) {
        self.config.time_factor = value;
    }

    /// Make the line parameters reproducible.
    #[wasm_bindgen(setter)]
    pub fn set_seed(&mut self, value: u32) {
        self.seed = Some(value as u64);
    }
}

impl VisualizerOptions {
    pub(crate) fn config(&self) -> &GridConfig {
        &self.config
    }

    pub(crate) fn seed(&self) -> Option<u64> {
        self.seed
    }
}
