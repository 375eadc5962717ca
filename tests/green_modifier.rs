use assert::close;
use rand::Rng;
use rand_mt::Mt64;

use exactdiag::basis::{Basis, ImmmBasis};
use exactdiag::green::{get_modified_state, operator_matrix, Combination, GfOperator};
use exactdiag::{Operator, Spin};

const SEED: u64 = 1434;

fn norm2(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum()
}

fn sector(orbitals: &[usize], n_up: usize, n_down: usize) -> ImmmBasis<u16> {
    ImmmBasis::new(orbitals.to_vec(), n_up, n_down).unwrap()
}

#[test]
fn test_particle_plus_hole_weight() {
    // <c c^dagger> + <c^dagger c> = 1 for every one-orbital site.
    let orbitals = [1, 2, 1];
    let source = sector(&orbitals, 2, 1);
    let mut rng = Mt64::new(SEED);
    let mut gs: Vec<f64> = (0..source.size()).map(|_| rng.gen::<f64>() - 0.5).collect();
    let norm = <f64>::sqrt(norm2(&gs));
    gs.iter_mut().for_each(|x| *x /= norm);

    for spin in Spin::BOTH {
        let (pu, pd) = source.has_new_parts(Operator::Constructor, spin).unwrap();
        let (hu, hd) = source.has_new_parts(Operator::Destructor, spin).unwrap();
        let particle = sector(&orbitals, pu, pd);
        let hole = sector(&orbitals, hu, hd);
        for site in [0, 2] {
            let zp = get_modified_state(&source, &particle, &gs, GfOperator::fermionic(Operator::Constructor), site, None, spin);
            let zh = get_modified_state(&source, &hole, &gs, GfOperator::fermionic(Operator::Destructor), site, None, spin);
            close(norm2(&zp) + norm2(&zh), 1.0, 1e-12);
        }
    }
}

#[test]
fn test_bonding_and_antibonding() {
    // One spin down particle on two copper sites: the bonding combination
    // of the holes is found entirely in (c_0 + c_1).
    let orbitals = [1, 1];
    let source = sector(&orbitals, 0, 1);
    let target = sector(&orbitals, 0, 0);
    let bonding = vec![<f64>::sqrt(0.5), <f64>::sqrt(0.5)];
    let op = GfOperator::fermionic(Operator::Destructor);
    let sym = get_modified_state(&source, &target, &bonding, op, 0, Some((1, Combination::Symmetric)), Spin::Down);
    let anti = get_modified_state(&source, &target, &bonding, op, 0, Some((1, Combination::Antisymmetric)), Spin::Down);
    close(norm2(&sym), 2.0, 1e-12);
    close(norm2(&anti), 0.0, 1e-12);
}

#[test]
fn test_operator_matrix_columns() {
    let orbitals = [2, 1];
    let source = sector(&orbitals, 1, 2);
    let target = sector(&orbitals, 1, 1);
    let op = GfOperator::fermionic(Operator::Destructor);
    let m = operator_matrix(&source, &target, op, 0, Spin::Down, 1);
    // A target state is reached from at most one source state.
    let mut seen = vec![false; target.size()];
    for i in 0..source.size() {
        for (j, v) in m.row(i) {
            assert!(!seen[j]);
            seen[j] = true;
            assert_eq!(v.abs(), 1.0);
        }
    }
    // Every target state with slot (0, 1) empty in spin down is reached.
    for j in 0..target.size() {
        let state = target.state_at(j);
        assert_eq!(seen[j], target.is_there_an_electron_at(&state, 0, Spin::Down, 1) == 0);
    }
}
