// Shared visual tuning constants used by the engine and both frontends.

// Logic loop
pub const LOGIC_TICKS_PER_SECOND: u32 = 60;
pub const MAX_CATCH_UP_TICKS: u32 = 8; // ticks run at most per clock poll after a stall
pub const LINE_TIME_MULTIPLIER: f32 = 2.0; // lines move twice as fast as the camera orbit

// Cell appearance
pub const CELL_SATURATION: f32 = 0.75;
pub const CELL_LIGHTNESS: f32 = 0.5;
pub const CELL_BUILD_OPACITY: f32 = 0.6; // opacity handed to the sphere factory
pub const CELL_REST_OPACITY: f32 = 0.5; // opacity restored every tick
pub const CELL_HIGHLIGHT_OPACITY: f32 = 1.0;
pub const REST_SCALE: f32 = 1.0;
pub const SPHERE_EDGES: u32 = 8;

// Line appearance
pub const LINE_SATURATION: f32 = 0.8;
pub const LINE_LIGHTNESS: f32 = 0.5;
pub const LINE_HALF_WIDTH_RADII: f32 = 1.0; // ribbon half-width in sphere radii
pub const LINE_DEFAULT_COLOR: [f32; 3] = [1.0, 1.0, 1.0];

// Camera
pub const CAMERA_FOVY_DEGREES: f32 = 60.0;
pub const CAMERA_ZNEAR: f32 = 5.0;
pub const CAMERA_ZFAR: f32 = 5000.0;
pub const CAMERA_START_OFFSET: f32 = -100.0; // x/z of the camera before the first tick
pub const ORBIT_GAP_FACTOR: f32 = 20.0; // orbit radius = cube length + r * g * factor

// Lighting used by the wgpu backend
pub const AMBIENT_LIGHT: f32 = 0.35;
