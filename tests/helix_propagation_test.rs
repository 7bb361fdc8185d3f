use approx::{assert_abs_diff_eq, assert_relative_eq};
use nalgebra::{Matrix3, Matrix4};

use pirouette::constants::{alpha, Matrix5, Matrix7, Vector5, DEFAULT_B_FIELD};
use pirouette::helix::Helix;
use pirouette::pirouette_errors::PirouetteError;
use pirouette::range_check::{CheckConfig, RangeLimits, RangePolicy};
use pirouette::three_vector::ThreeVector;

fn sample_parameters() -> Vector5 {
    Vector5::new(0.4, 0.9, alpha(DEFAULT_B_FIELD) / 40.0, -1.1, 0.55)
}

fn sample_covariance() -> Matrix5 {
    // diagonally dominant symmetric matrix, realistic enough for propagation
    let mut ea = Matrix5::identity() * 1e-4;
    ea[(0, 2)] = 1e-6;
    ea[(2, 0)] = 1e-6;
    ea[(1, 4)] = -2e-6;
    ea[(4, 1)] = -2e-6;
    ea
}

#[test]
fn test_zero_covariance_propagates_to_zero() {
    let helix = Helix::new(ThreeVector::default(), sample_parameters(), Matrix5::zeros());
    assert!(helix.matrix_valid());

    for i in 0..10 {
        let dphi = i as f64 * 0.7 - 3.5;
        let (_, ex) = helix.x_with_error(dphi);
        let (_, em) = helix.momentum_with_error(dphi);
        let (_, e4) = helix.four_momentum_with_error(dphi, 0.139570);
        let (_, _, emx) = helix.four_momentum_and_position(dphi, 0.139570);
        assert_eq!(ex, Matrix3::zeros());
        assert_eq!(em, Matrix3::zeros());
        assert_eq!(e4, Matrix4::zeros());
        assert_eq!(emx, Matrix7::zeros());
    }
}

#[test]
fn test_ignored_matrix_propagates_to_zero() {
    let mut helix = Helix::new(ThreeVector::default(), sample_parameters(), sample_covariance());
    helix.ignore_error_matrix();
    assert!(!helix.matrix_valid());
    assert_eq!(helix.ea(), &Matrix5::zeros());

    let (_, ex) = helix.x_with_error(1.3);
    assert_eq!(ex, Matrix3::zeros());

    // repeated calls are no-ops
    helix.ignore_error_matrix();
    assert_eq!(helix.ea(), &Matrix5::zeros());

    // supplying a covariance re-arms propagation
    helix.set_ea(sample_covariance());
    assert!(helix.matrix_valid());
    let (_, ex) = helix.x_with_error(1.3);
    assert!(ex[(0, 0)] > 0.0);
}

#[test]
fn test_propagated_covariance_is_symmetric_and_nonnegative() {
    let helix = Helix::new(ThreeVector::default(), sample_parameters(), sample_covariance());
    for i in 0..8 {
        let dphi = i as f64 * 0.9 - 3.6;
        let (_, ex) = helix.x_with_error(dphi);
        let (_, em) = helix.momentum_with_error(dphi);
        for r in 0..3 {
            assert!(ex[(r, r)] >= 0.0);
            assert!(em[(r, r)] >= 0.0);
            for c in 0..3 {
                assert_relative_eq!(ex[(r, c)], ex[(c, r)], max_relative = 1e-12);
                assert_relative_eq!(em[(r, c)], em[(c, r)], max_relative = 1e-12);
            }
        }
    }
}

#[test]
fn test_combined_block_matches_individual_propagation() {
    let helix = Helix::new(ThreeVector::default(), sample_parameters(), sample_covariance());
    let mass = 0.105658;
    let dphi = 0.6;
    let (p4, x, emx) = helix.four_momentum_and_position(dphi, mass);
    let (p4_alone, e4) = helix.four_momentum_with_error(dphi, mass);
    let (x_alone, ex) = helix.x_with_error(dphi);

    assert_eq!(p4, p4_alone);
    assert_eq!(x, x_alone);
    for r in 0..4 {
        for c in 0..4 {
            assert_relative_eq!(emx[(r, c)], e4[(r, c)], max_relative = 1e-12);
        }
    }
    for r in 0..3 {
        for c in 0..3 {
            assert_relative_eq!(emx[(4 + r, 4 + c)], ex[(r, c)], max_relative = 1e-12);
        }
    }
}

#[test]
fn test_pivot_move_keeps_the_space_curve() {
    let mut helix = Helix::new(
        ThreeVector::new(0.1, -0.3, 2.0),
        sample_parameters(),
        sample_covariance(),
    );
    let kappa = helix.kappa();
    let tanl = helix.tanl();
    let center = helix.center();
    let on_track = helix.x(0.8);

    helix.set_pivot(on_track).unwrap();

    // curvature and dip are invariant, the center does not move
    assert_eq!(helix.kappa(), kappa);
    assert_eq!(helix.tanl(), tanl);
    assert_abs_diff_eq!(helix.center().x(), center.x(), epsilon = 1e-10);
    assert_abs_diff_eq!(helix.center().y(), center.y(), epsilon = 1e-10);

    // a pivot on the track zeroes the local offsets
    assert_abs_diff_eq!(helix.dr(), 0.0, epsilon = 1e-10);
    assert_abs_diff_eq!(helix.dz(), 0.0, epsilon = 1e-10);
    let back = helix.x(0.0);
    assert_abs_diff_eq!(back.x(), on_track.x(), epsilon = 1e-10);
    assert_abs_diff_eq!(back.y(), on_track.y(), epsilon = 1e-10);
    assert_abs_diff_eq!(back.z(), on_track.z(), epsilon = 1e-10);
}

#[test]
fn test_pivot_move_transforms_covariance_once() {
    let mut helix = Helix::new(
        ThreeVector::default(),
        sample_parameters(),
        sample_covariance(),
    );
    let before = *helix.ea();
    let target = ThreeVector::new(1.5, -0.7, 0.4);

    let mut reference = helix;
    reference.set_pivot(target).unwrap();
    let j = helix.del_ap_del_a(reference.a());
    let expected = j * before * j.transpose();

    helix.set_pivot(target).unwrap();
    for r in 0..5 {
        for c in 0..5 {
            assert_relative_eq!(helix.ea()[(r, c)], expected[(r, c)], max_relative = 1e-12);
        }
    }
}

#[test]
fn test_pivot_move_couples_dz_and_tanl() {
    // dz' = dz - r·tanl·dphi: a dip-angle uncertainty must leak into dz
    // once the pivot moves along the track
    let mut ea = Matrix5::zeros();
    ea[(4, 4)] = 1e-4;
    let mut helix = Helix::new(ThreeVector::default(), sample_parameters(), ea);
    let target = helix.x(0.8);

    let expected_slope = -helix.radius() * 0.8;
    helix.set_pivot(target).unwrap();

    assert_relative_eq!(
        helix.ea()[(3, 3)],
        expected_slope * expected_slope * 1e-4,
        max_relative = 1e-9
    );
    assert_relative_eq!(
        helix.ea()[(3, 4)],
        expected_slope * 1e-4,
        max_relative = 1e-9
    );
    // tanl itself is untouched by the move
    assert_eq!(helix.ea()[(4, 4)], 1e-4);
}

#[test]
fn test_ignored_matrix_survives_pivot_move() {
    let mut helix = Helix::new(
        ThreeVector::default(),
        sample_parameters(),
        sample_covariance(),
    );
    helix.ignore_error_matrix();
    helix.set_pivot(ThreeVector::new(0.5, 0.5, 0.5)).unwrap();
    assert!(!helix.matrix_valid());
    assert_eq!(helix.ea(), &Matrix5::zeros());
}

#[test]
fn test_range_policy_on_mutation() {
    // wide enough for sample_parameters() (kappa = alpha/40 ≈ 5.56): only the
    // dz = 100.0 mutation below is meant to violate the window
    let limits = RangeLimits::new(
        Vector5::new(-5.0, -10.0, -10.0, -50.0, -3.0),
        Vector5::new(5.0, 10.0, 10.0, 50.0, 3.0),
    );

    let mut silent = Helix::from_parameters(ThreeVector::default(), sample_parameters())
        .with_config(CheckConfig::new(limits, RangePolicy::Silent))
        .unwrap();
    // in-window to begin with: invalidity below comes from the mutation alone
    assert!(silent.is_valid());
    silent
        .set_params(Vector5::new(0.0, 0.0, 0.1, 100.0, 0.0))
        .unwrap();
    assert!(!silent.is_valid());

    let mut raising = Helix::from_parameters(ThreeVector::default(), sample_parameters())
        .with_config(CheckConfig::new(limits, RangePolicy::Raise))
        .unwrap();
    assert_eq!(
        raising.set_params(Vector5::new(0.0, 0.0, 0.1, 100.0, 0.0)),
        Err(PirouetteError::OutOfRange {
            index: 3,
            value: 100.0
        })
    );

    // Print behaves like Silent apart from the log record
    let mut printing = Helix::from_parameters(ThreeVector::default(), sample_parameters())
        .with_config(CheckConfig::new(limits, RangePolicy::Print))
        .unwrap();
    printing
        .set_params(Vector5::new(0.0, 0.0, 0.1, 100.0, 0.0))
        .unwrap();
    assert!(!printing.is_valid());
}
