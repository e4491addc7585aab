// Tests for the surface helpers the hosts use when sizing and compositing.

use cube_core::backing_size;
use cube_core::gpu::pick_alpha_mode;
use wgpu::CompositeAlphaMode::{Auto, Inherit, Opaque, PostMultiplied, PreMultiplied};

// ---------------- Alpha mode ----------------

#[test]
fn transparent_background_prefers_premultiplied() {
    assert_eq!(pick_alpha_mode(&[Opaque, PreMultiplied], true), PreMultiplied);
    assert_eq!(pick_alpha_mode(&[Opaque, PreMultiplied], false), Opaque);
}

#[test]
fn alpha_mode_falls_back_to_what_the_surface_offers() {
    assert_eq!(pick_alpha_mode(&[Opaque], true), Opaque);
    assert_eq!(pick_alpha_mode(&[PreMultiplied, Inherit], false), Inherit);
    assert_eq!(pick_alpha_mode(&[PostMultiplied, Opaque], false), PostMultiplied);
    assert_eq!(pick_alpha_mode(&[], true), Auto);
    assert_eq!(pick_alpha_mode(&[PreMultiplied], false), Auto);
}

// ---------------- Backing size ----------------

#[test]
fn backing_store_follows_pixel_ratio() {
    assert_eq!(backing_size(800, 600, 1.0), (800, 600));
    assert_eq!(backing_size(800, 600, 2.0), (1600, 1200));
    assert_eq!(backing_size(100, 50, 1.5), (150, 75));
    // rounds to the nearest device pixel
    assert_eq!(backing_size(101, 33, 1.25), (126, 41));
}

#[test]
fn odd_pixel_ratios_fall_back_to_one() {
    assert_eq!(backing_size(640, 480, 0.0), (640, 480));
    assert_eq!(backing_size(640, 480, -2.0), (640, 480));
    assert_eq!(backing_size(640, 480, f64::NAN), (640, 480));
    assert_eq!(backing_size(640, 480, f64::INFINITY), (640, 480));
}

#[test]
fn backing_store_is_never_empty() {
    assert_eq!(backing_size(0, 0, 2.0), (1, 1));
    assert_eq!(backing_size(1, 1, 0.25), (1, 1));
}
