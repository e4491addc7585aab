// Tests for the n-dimensional sine generator and line wrapping.

use cube_core::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-5
}

#[test]
fn evaluates_each_axis_independently() {
    let e = sine_emitter(2.0, [1.0, 2.0, 3.0], 0.0, 0.0, 1.0, 3).unwrap();
    let out = e.emit(0.5, 0.0);
    assert_eq!(out.len(), 3);
    assert!(close(out[0], 2.0 * 0.5f32.sin() + 1.0));
    assert!(close(out[1], 2.0 * 1.0f32.sin() + 1.0));
    assert!(close(out[2], 2.0 * 1.5f32.sin() + 1.0));
}

#[test]
fn time_and_phase_shift_the_wave() {
    let e = sine_emitter(1.0, 0.0, 2.0, 0.25, 0.0, 1).unwrap();
    assert!(close(e.emit(123.0, 0.5)[0], 1.25f32.sin()));
}

#[test]
fn scalars_broadcast_like_repeated_arrays() {
    let scalar = sine_emitter(2.0, 0.5, 0.1, 0.0, -1.0, 3).unwrap();
    let arrays = sine_emitter(
        [2.0, 2.0, 2.0],
        [0.5, 0.5, 0.5],
        vec![0.1, 0.1, 0.1],
        &[0.0, 0.0, 0.0][..],
        [-1.0, -1.0, -1.0],
        3,
    )
    .unwrap();
    assert_eq!(scalar, arrays);
    assert_eq!(scalar.emit(1.7, 3.0), arrays.emit(1.7, 3.0));
}

#[test]
fn zero_dimensions_are_rejected() {
    assert_eq!(
        sine_emitter(1.0, 1.0, 1.0, 1.0, 1.0, 0),
        Err(CubeError::NonPositiveDimensions)
    );
}

#[test]
fn mismatched_parameter_reports_its_slot() {
    let err = sine_emitter(1.0, [1.0, 2.0], 0.0, 0.0, 0.0, 3).unwrap_err();
    assert_eq!(
        err,
        CubeError::DimensionMismatch {
            argument: 1,
            expected: 3,
            found: 2,
        }
    );
    let err = sine_emitter(1.0, 1.0, 1.0, 1.0, [0.0; 4], 3).unwrap_err();
    assert!(matches!(
        err,
        CubeError::DimensionMismatch { argument: 4, .. }
    ));
}

#[test]
fn per_axis_positions_must_match_dimensions() {
    let e = sine_emitter(1.0, 1.0, 0.0, 0.0, 0.0, 2).unwrap();
    let out = e.emit_axes(&[0.0, std::f32::consts::FRAC_PI_2], 0.0).unwrap();
    assert!(close(out[0], 0.0));
    assert!(close(out[1], 1.0));
    assert!(e.emit_axes(&[0.0], 0.0).is_err());
}

#[test]
fn vec3_view_matches_axes() {
    let e = sine_emitter(1.5, [0.3, 0.6, 0.9], 0.2, 0.1, 0.0, 3).unwrap();
    let axes = e.emit(2.0, 4.0);
    let v = e.emit_vec3(2.0, 4.0);
    assert_eq!([v.x, v.y, v.z], [axes[0], axes[1], axes[2]]);
}

#[test]
fn random_emitters_are_seeded_and_bounded() {
    let a = SineEmitter::random(4.0, &mut StdRng::seed_from_u64(9));
    let b = SineEmitter::random(4.0, &mut StdRng::seed_from_u64(9));
    assert_eq!(a, b);
    assert_eq!(a.dims(), 3);
    for step in 0..200 {
        let t = step as f64 * 0.37;
        for v in a.emit(step as f32 % 7.0, t) {
            assert!(v.abs() <= 4.0 + 1e-5);
        }
    }
}

#[test]
fn lines_require_three_axes() {
    let flat = sine_emitter(1.0, 1.0, 1.0, 0.0, 0.0, 2).unwrap();
    assert_eq!(
        Line::new(flat).unwrap_err(),
        CubeError::LineDimensions { found: 2 }
    );
    let line = Line::new(sine_emitter(1.0, 1.0, 1.0, 0.0, 0.0, 3).unwrap()).unwrap();
    assert!(line.primitive.is_none());
    assert!(line.samples().is_empty());
}

#[test]
fn late_times_keep_their_phase() {
    // frame 20_000_001 at the default time factor, doubled for lines
    let t = 20_000_001.0f64 / 200.0 * 2.0;
    let e = sine_emitter(1.0, 0.0, 1.0, 0.0, 0.0, 1).unwrap();
    assert!(close(e.emit(0.0, t)[0], t.sin() as f32));
}
