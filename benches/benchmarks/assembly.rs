use criterion::{black_box, criterion_group, Criterion};
use exactdiag::basis::Basis;
use exactdiag::geometry::{CouplingTable, TermKind};
use exactdiag::hamiltonian::{matrix_vector_product, setup_hamiltonian, Model};
use exactdiag::models::{FeAsParams, FeBasedSc};

const NSITES: usize = 4;
const NORBS: usize = 2;

fn ladder() -> CouplingTable {
    let mut geometry = CouplingTable::uniform(NSITES, NORBS).unwrap();
    for i in 0..NSITES {
        let j = (i + 1) % NSITES;
        for a in 0..NORBS {
            geometry.set(i, a, j, a, TermKind::Hopping, -1.0);
        }
        geometry.set(i, 0, j, 1, TermKind::Hopping, 0.2);
    }
    geometry
}

pub fn setup_feas(c: &mut Criterion) {
    let geometry = ladder();
    let params = FeAsParams::new([4.0, 2.0, -1.0, 0.5], vec![0.0; NSITES]);
    let model = FeBasedSc::<_, u16>::new(4, 4, params, &geometry).unwrap();
    c.bench_function("Setup FeAs Hamiltonian 4x2 half filling", |b| {
        b.iter(|| setup_hamiltonian(black_box(&model)))
    });
}

pub fn matrix_free_feas(c: &mut Criterion) {
    let geometry = ladder();
    let params = FeAsParams::new([4.0, 2.0, -1.0, 0.5], vec![0.0; NSITES]);
    let model = FeBasedSc::<_, u16>::new(4, 4, params, &geometry).unwrap();
    let n = model.basis().size();
    let y: Vec<f64> = (0..n).map(|i| <f64>::sin(i as f64)).collect();
    let mut x = vec![0.0; n];
    c.bench_function("Matrix-free product 4x2 half filling", |b| {
        b.iter(|| matrix_vector_product(&model, &mut x, black_box(&y)))
    });
}

criterion_group!(benches, setup_feas, matrix_free_feas);
