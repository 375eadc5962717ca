use log::{debug, error};

use crate::basis::Basis;
use crate::sparse::{CrsMatrix, SparseRow};
use crate::{Operator, Spin};

/// Operator applied on the ground state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GfOperator {
    pub what: Operator,
    /// Non-fermionic operators are applied without any sign.
    pub fermionic: bool,
}

impl GfOperator {
    pub fn fermionic(what: Operator) -> Self {
        GfOperator { what, fermionic: true }
    }

    pub fn non_fermionic(what: Operator) -> Self {
        GfOperator { what, fermionic: false }
    }

    pub fn is_fermionic(&self) -> bool {
        self.fermionic
    }
}

/// Relative sign of the second site in a two-site modified state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combination {
    /// $c_i + c_j$
    Symmetric,
    /// $c_i - c_j$
    Antisymmetric,
}

impl Combination {
    pub fn sign(&self) -> i32 {
        match self {
            Combination::Symmetric => 1,
            Combination::Antisymmetric => -1,
        }
    }
}

fn check_sectors<B: Basis>(source: &B, target: &B, op: GfOperator, spin: Spin) {
    let reached = source.has_new_parts(op.what, spin);
    let expected = Some((target.n_particles(Spin::Up), target.n_particles(Spin::Down)));
    if reached != expected {
        error!("{:?} on spin {} from sector ({}, {}) reaches {:?}, target sector is {:?}.",
            op.what, spin, source.n_particles(Spin::Up), source.n_particles(Spin::Down), reached, expected);
        panic!("Target basis is not the sector reached by the operator.");
    }
}

/// Accumulates $\pm O_{(\mathrm{site},\mathrm{orb}),\sigma}\vert\psi\rangle$ into `z`.
/// # Arguments
/// * __`z`__ - Output vector, indexed in `target`.
/// * __`gs`__ - Input vector, indexed in `source`.
/// * __`isign`__ - Global sign of the contribution.
/// # Panics
/// If `target` is not the sector reached from `source`, if `gs` does not
/// match `source` or if an index of `target` falls outside `z`.
#[allow(clippy::too_many_arguments)]
pub fn acc_modified_state<B: Basis>(
    z: &mut [f64],
    source: &B,
    target: &B,
    gs: &[f64],
    op: GfOperator,
    site: usize,
    spin: Spin,
    orb: usize,
    isign: i32,
) {
    check_sectors(source, target, op, spin);
    if gs.len() != source.size() {
        error!("Vector of length {} given for a source basis of size {}.", gs.len(), source.size());
        panic!("Input vector does not match the source basis.");
    }
    for (i, &amplitude) in gs.iter().enumerate() {
        let state = source.state_at(i);
        let j = match target.bra_index(&state, op.what, site, spin, orb) {
            Some(j) => j,
            None => continue,
        };
        if j >= z.len() {
            error!("Index {} reached from {} by {:?} on site {} orbital {} spin {} is out of a vector of length {}.",
                j, state, op.what, site, orb, spin, z.len());
            panic!("Modified state index {} out of bounds ({}).", j, z.len());
        }
        let sign = if op.is_fermionic() {
            source.do_sign_gf(&state, site, spin, orb)
        } else {
            1
        };
        z[j] += (isign * sign) as f64 * amplitude;
    }
}

/// Builds $\left(O_{i\sigma} \pm O_{j\sigma}\right)\vert\psi\rangle$, each
/// site operator summed over the orbitals of its site.
/// # Arguments
/// * __`jsite`__ - Second site and its relative sign. `None` applies the
/// operator on `isite` alone.
pub fn get_modified_state<B: Basis>(
    source: &B,
    target: &B,
    gs: &[f64],
    op: GfOperator,
    isite: usize,
    jsite: Option<(usize, Combination)>,
    spin: Spin,
) -> Vec<f64> {
    let mut z = vec![0.0; target.size()];
    for orb in 0..source.orbs_per_site(isite) {
        acc_modified_state(&mut z, source, target, gs, op, isite, spin, orb, 1);
    }
    if let Some((j, combination)) = jsite {
        for orb in 0..source.orbs_per_site(j) {
            acc_modified_state(&mut z, source, target, gs, op, j, spin, orb, combination.sign());
        }
    }
    debug!("Modified state of dimension {} built from site {} ({:?}).", z.len(), isite, jsite);
    z
}

/// Matrix of a single operator between two sectors.
/// # Returns
/// A `source.size() x target.size()` matrix with one entry per source state
/// the operator does not annihilate, the transpose of
/// $\langle y\vert O\vert x\rangle$.
pub fn operator_matrix<B: Basis>(source: &B, target: &B, op: GfOperator, site: usize, spin: Spin, orb: usize) -> CrsMatrix {
    check_sectors(source, target, op, spin);
    let rows = source.size();
    let mut matrix = CrsMatrix::new();
    matrix.resize_rectangular(rows, target.size(), rows);
    let mut row = SparseRow::with_capacity(1);
    let mut n_counter = 0;
    for i in 0..rows {
        matrix.set_row(i, n_counter);
        let state = source.state_at(i);
        if let Some(j) = target.bra_index(&state, op.what, site, spin, orb) {
            let sign = if op.is_fermionic() {
                source.do_sign_gf(&state, site, spin, orb)
            } else {
                1
            };
            row.add(j, sign as f64);
        }
        n_counter += row.finalize(&mut matrix);
    }
    matrix.set_row(rows, n_counter);
    matrix
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::basis::FeAsBasis;

    fn apply(source: &FeAsBasis<u16>, what: Operator, v: &[f64], site: usize, spin: Spin, orb: usize) -> (FeAsBasis<u16>, Vec<f64>) {
        let (n_up, n_down) = source.has_new_parts(what, spin).unwrap();
        let target = FeAsBasis::new(source.n_sites(), source.orbitals(), n_up, n_down).unwrap();
        let mut z = vec![0.0; target.size()];
        acc_modified_state(&mut z, source, &target, v, GfOperator::fermionic(what), site, spin, orb, 1);
        (target, z)
    }

    #[test]
    fn test_anticommutation() {
        let basis = FeAsBasis::<u16>::new(2, 2, 1, 1).unwrap();
        let modes: Vec<(usize, usize, Spin)> = (0..2)
            .flat_map(|s| (0..2).flat_map(move |o| Spin::BOTH.into_iter().map(move |sp| (s, o, sp))))
            .collect();
        for k in 0..basis.size() {
            let mut e = vec![0.0; basis.size()];
            e[k] = 1.0;
            for &(sa, oa, spa) in modes.iter() {
                for &(sb, ob, spb) in modes.iter() {
                    // c_a c_b^dagger + c_b^dagger c_a
                    let (mid1, v1) = apply(&basis, Operator::Constructor, &e, sb, spb, ob);
                    let (end1, w1) = apply(&mid1, Operator::Destructor, &v1, sa, spa, oa);
                    let (mid2, v2) = apply(&basis, Operator::Destructor, &e, sa, spa, oa);
                    let (end2, w2) = apply(&mid2, Operator::Constructor, &v2, sb, spb, ob);
                    assert_eq!(end1.size(), end2.size());
                    let same = sa == sb && oa == ob && spa == spb;
                    for x in 0..end1.size() {
                        let expected = if same && x == k { 1.0 } else { 0.0 };
                        assert_eq!(w1[x] + w2[x], expected, "modes {:?} {:?} state {}", (sa, oa, spa), (sb, ob, spb), k);
                    }
                }
            }
        }
    }

    #[test]
    fn test_combinations() {
        let source = FeAsBasis::<u16>::new(2, 2, 2, 1).unwrap();
        let target = FeAsBasis::<u16>::new(2, 2, 1, 1).unwrap();
        let gs: Vec<f64> = (0..source.size()).map(|i| 1.0 + i as f64).collect();
        let op = GfOperator::fermionic(Operator::Destructor);
        let zi = get_modified_state(&source, &target, &gs, op, 0, None, Spin::Up);
        let zj = get_modified_state(&source, &target, &gs, op, 1, None, Spin::Up);
        let sym = get_modified_state(&source, &target, &gs, op, 0, Some((1, Combination::Symmetric)), Spin::Up);
        let anti = get_modified_state(&source, &target, &gs, op, 0, Some((1, Combination::Antisymmetric)), Spin::Up);
        for x in 0..target.size() {
            assert_eq!(sym[x], zi[x] + zj[x]);
            assert_eq!(anti[x], zi[x] - zj[x]);
        }
    }

    #[test]
    fn test_non_fermionic_has_no_sign() {
        let source = FeAsBasis::<u16>::new(2, 1, 2, 0).unwrap();
        let target = FeAsBasis::<u16>::new(2, 1, 1, 0).unwrap();
        // Only state: both sites occupied.
        let gs = vec![1.0];
        let signed = get_modified_state(&source, &target, &gs, GfOperator::fermionic(Operator::Destructor), 1, None, Spin::Up);
        let plain = get_modified_state(&source, &target, &gs, GfOperator::non_fermionic(Operator::Destructor), 1, None, Spin::Up);
        // Removing site 1 passes over site 0.
        assert_eq!(signed, vec![-1.0, 0.0]);
        assert_eq!(plain, vec![1.0, 0.0]);
    }

    #[test]
    fn test_operator_matrix() {
        let source = FeAsBasis::<u16>::new(2, 2, 1, 2).unwrap();
        let target = FeAsBasis::<u16>::new(2, 2, 1, 1).unwrap();
        let op = GfOperator::fermionic(Operator::Destructor);
        let m = operator_matrix(&source, &target, op, 1, Spin::Down, 0);
        assert_eq!(m.rows(), source.size());
        assert_eq!(m.cols(), target.size());
        for i in 0..source.size() {
            let mut e = vec![0.0; source.size()];
            e[i] = 1.0;
            let mut z = vec![0.0; target.size()];
            acc_modified_state(&mut z, &source, &target, &e, op, 1, Spin::Down, 0, 1);
            let mut row = vec![0.0; target.size()];
            for (j, v) in m.row(i) {
                row[j] = v;
            }
            assert_eq!(row, z);
        }
    }

    #[test]
    #[should_panic]
    fn test_short_output_panics() {
        let source = FeAsBasis::<u16>::new(2, 2, 1, 1).unwrap();
        let target = FeAsBasis::<u16>::new(2, 2, 2, 1).unwrap();
        let gs = vec![1.0; source.size()];
        let mut z = vec![0.0; 2];
        acc_modified_state(&mut z, &source, &target, &gs, GfOperator::fermionic(Operator::Constructor), 1, Spin::Up, 1, 1);
    }

    #[test]
    #[should_panic]
    fn test_wrong_sector_panics() {
        let source = FeAsBasis::<u16>::new(2, 2, 1, 1).unwrap();
        let target = FeAsBasis::<u16>::new(2, 2, 1, 1).unwrap();
        let gs = vec![1.0; source.size()];
        get_modified_state(&source, &target, &gs, GfOperator::fermionic(Operator::Constructor), 0, None, Spin::Up);
    }
}
