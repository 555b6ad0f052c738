use approx::assert_relative_eq;
use quantum::{
    coefficients, energy,
    params::{neutral_parameters, random_parameters},
    HamiltonianModel,
};
use rng::ONDRng;
use vqe::{evaluate_fixed, linspace, Cobyla, Config, EnergyCurveSampler, VqeSolver};

fn sampler() -> EnergyCurveSampler<Cobyla> {
    let start = random_parameters(&mut ONDRng::new(b"sweep"));
    EnergyCurveSampler::new(HamiltonianModel::default(), Cobyla::default(), start)
}

#[test]
fn parallel_matches_sequential() {
    let bond_lengths = linspace(0.3, 2.0, 8).unwrap();
    let config = Config::new(40, 1e-6).unwrap();
    let s = sampler();

    let sequential = s.sweep(&bond_lengths, &config).unwrap();
    let parallel = s.sweep_parallel(&bond_lengths, &config).unwrap();
    assert_eq!(sequential, parallel);
}

#[test]
fn one_bad_point_fails_whole_sweep() {
    let config = Config::new(20, 1e-6).unwrap();
    let err = sampler().sweep(&[0.5, -1.0], &config).unwrap_err();
    assert!(err.is_invalid_parameter(), "{}", err);

    let err = sampler()
        .sweep_parallel(&[0.5, 0.8, f64::NAN], &config)
        .unwrap_err();
    assert!(err.is_invalid_parameter(), "{}", err);
}

#[test]
fn points_share_initial_parameters() {
    let solver = VqeSolver::new(1.0).unwrap().with_seed("shared");
    let config = Config::new(15, 1e-6).unwrap();
    let curve = solver
        .sampler(Cobyla::default())
        .sweep(&[0.4, 0.9], &config)
        .unwrap();

    for p in &curve {
        let single = VqeSolver::new(p.bond_length)
            .unwrap()
            .with_seed("shared")
            .optimize(15, None)
            .unwrap();
        assert_eq!(p.energy.to_bits(), single.best_energy.to_bits());
    }
}

#[test]
fn fixed_parameters_track_identity_term() {
    let model = HamiltonianModel::default();
    let bond_lengths = [0.5, 1.0, 1.5];
    let curve = evaluate_fixed(&model, &bond_lengths, &neutral_parameters()).unwrap();

    for p in &curve {
        let h = coefficients(p.bond_length).unwrap();
        assert_relative_eq!(p.energy, h.h_ii, epsilon = 1e-12);
    }

    let angles = [0.3, 1.1, 2.0, 0.4, 5.0, 0.2, 0.9, 3.3];
    let curve = evaluate_fixed(&model, &bond_lengths, &angles).unwrap();
    for p in &curve {
        let h = coefficients(p.bond_length).unwrap();
        assert_eq!(p.energy, energy(&angles, &h));
    }

    assert!(evaluate_fixed(&model, &[], &angles)
        .unwrap_err()
        .is_invalid_parameter());
}

#[test]
fn linspace_includes_both_ends() {
    let r = linspace(0.3, 2.0, 18).unwrap();
    assert_eq!(r.len(), 18);
    assert_eq!(r[0], 0.3);
    assert_eq!(r[17], 2.0);
    assert_relative_eq!(r[1] - r[0], 0.1, epsilon = 1e-12);

    assert!(linspace(0.3, 2.0, 1).is_err());
    assert!(linspace(2.0, 0.3, 5).is_err());
    assert!(linspace(0.0, 1.0, 5).is_err());
}
