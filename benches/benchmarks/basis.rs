use criterion::{black_box, criterion_group, Criterion};
use exactdiag::basis::{Basis, BasisOneSpin, FeAsBasis};
use exactdiag::Spin;

pub fn enumerate_sector(c: &mut Criterion) {
    c.bench_function("Enumerate C(16, 8)", |b| {
        b.iter(|| BasisOneSpin::<u32>::new(black_box(8), 2, 8).unwrap())
    });
}

pub fn perfect_index(c: &mut Criterion) {
    let basis = FeAsBasis::<u32>::new(6, 2, 6, 6).unwrap();
    let up = basis.sector(Spin::Up);
    c.bench_function("Perfect index C(12, 6)", |b| {
        b.iter(|| {
            let mut acc = 0;
            for &word in up.iter() {
                acc += up.perfect_index(black_box(word));
            }
            acc
        })
    });
}

pub fn gf_sign(c: &mut Criterion) {
    let basis = FeAsBasis::<u32>::new(4, 2, 4, 4).unwrap();
    c.bench_function("Green function sign 4x2", |b| {
        b.iter(|| {
            let mut acc = 0;
            for idx in 0..basis.size() {
                let state = basis.state_at(idx);
                acc += basis.do_sign_gf(&state, black_box(3), Spin::Down, 1);
            }
            acc
        })
    });
}

criterion_group!(benches, enumerate_sector, perfect_index, gf_sign);
