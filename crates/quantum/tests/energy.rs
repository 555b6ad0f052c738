use std::f64::consts::{FRAC_PI_2, PI};

use approx::assert_relative_eq;
use quantum::{
    coefficients, energy, evaluate,
    params::{neutral_parameters, NUM_PARAMETERS},
    Expectations, HamiltonianCoefficients, EQUILIBRIUM_BOND_LENGTH,
};

/// Angles reaching the floor when h_zz > 0 and h_zi, h_iz < 0.
fn floor_parameters() -> [f64; NUM_PARAMETERS] {
    [0.0, 0.0, 0.0, 0.0, 3.0 * FRAC_PI_2, 0.0, 0.0, 0.0]
}

#[test]
fn neutral_point_reduces_to_identity_term() {
    let h = coefficients(EQUILIBRIUM_BOND_LENGTH).unwrap();
    let e = evaluate(&neutral_parameters(), &h).unwrap();
    assert_relative_eq!(e, h.h_ii, epsilon = 1e-12);

    let x = Expectations::of(&neutral_parameters());
    assert!(x.zz.abs() < 1e-12 && x.zi.abs() < 1e-12 && x.iz.abs() < 1e-12);
}

#[test]
fn floor_is_reached_below_identity_term() {
    let h = coefficients(EQUILIBRIUM_BOND_LENGTH).unwrap();
    let e = energy(&floor_parameters(), &h);
    assert_relative_eq!(e, h.lower_bound(), epsilon = 1e-12);
    assert!(e < h.h_ii, "E = {}", e);
}

#[test]
fn coefficient_signs_move_the_minimum() {
    let h = HamiltonianCoefficients::new(-1.0, 0.4, -0.2, -0.2);
    let flipped = HamiltonianCoefficients::new(-1.0, 0.4, 0.2, 0.2);

    let p = floor_parameters();
    assert_relative_eq!(energy(&p, &h), h.lower_bound(), epsilon = 1e-12);
    assert!(energy(&p, &flipped) > flipped.lower_bound() + 0.5);

    let mut q = p;
    q[1] = PI;
    q[3] = PI;
    assert_relative_eq!(energy(&q, &flipped), flipped.lower_bound(), epsilon = 1e-12);
}

#[test]
fn identical_inputs_identical_energy() {
    let h = coefficients(1.1).unwrap();
    let p = [0.5, 0.6, 0.7, 0.8, 0.9, 1.0, 1.1, 1.2];
    assert_eq!(
        evaluate(&p, &h).unwrap().to_bits(),
        evaluate(&p, &h).unwrap().to_bits()
    );
}

#[test]
fn wrong_parameter_count_is_invalid() {
    let h = coefficients(EQUILIBRIUM_BOND_LENGTH).unwrap();
    let err = evaluate(&[0.1, 0.2, 0.3, 0.4], &h).unwrap_err();
    assert!(err.is_invalid_parameter(), "{err}");
    assert!(evaluate(&[], &h).unwrap_err().is_invalid_parameter());
}

#[test]
fn nan_coefficients_are_unstable() {
    let h = HamiltonianCoefficients::new(f64::NAN, 0.1, 0.1, 0.1);
    assert!(!h.is_finite());
    let err = evaluate(&[0.5; NUM_PARAMETERS], &h).unwrap_err();
    assert!(err.is_numerical_instability(), "{err}");
}

#[test]
fn infinite_angle_is_unstable() {
    let h = coefficients(EQUILIBRIUM_BOND_LENGTH).unwrap();
    let mut p = [0.5; NUM_PARAMETERS];
    p[1] = f64::INFINITY;
    assert!(evaluate(&p, &h).unwrap_err().is_numerical_instability());
}
