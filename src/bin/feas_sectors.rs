use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use std::path::Path;

use exactdiag::geometry::{CouplingTable, TermKind};
use exactdiag::hamiltonian::{matrix_vector_product, setup_hamiltonian, Model};
use exactdiag::basis::Basis;
use exactdiag::models::{FeAsParams, FeBasedSc};
use exactdiag::parse::couplings::parse_couplings_def;

const NSITES: usize = 4;
const NORBS: usize = 2;
const CONS_T: f64 = -1.0;
const CONS_T_INTER: f64 = 0.3;
const HUBBARD_U: [f64; 4] = [4.0, 2.0, -1.0, 0.5];
const SYMMETRY_TOLERANCE: f64 = 1e-12;

/// Open chain, intra-orbital hopping `CONS_T` and inter-orbital hopping
/// `CONS_T_INTER` between neighbours.
fn chain() -> CouplingTable {
    let mut geometry = match CouplingTable::uniform(NSITES, NORBS) {
        Ok(g) => g,
        Err(e) => panic!("{}", e),
    };
    for i in 0..NSITES - 1 {
        for a in 0..NORBS {
            for b in 0..NORBS {
                let t = if a == b { CONS_T } else { CONS_T_INTER };
                geometry.set(i, a, i + 1, b, TermKind::Hopping, t);
            }
        }
    }
    geometry
}

fn main() {
    // Initialize logger
    env_logger::init();
    let geometry = match std::env::args().nth(1) {
        Some(fp) => match parse_couplings_def(Path::new(&fp), vec![NORBS; NSITES]) {
            Ok(g) => g,
            Err(e) => {
                error!("{}", e);
                eprintln!("{}", format!("Could not read {}: {}", fp, e).red());
                std::process::exit(1);
            }
        },
        None => chain(),
    };

    let n_slots = NSITES * NORBS;
    let sectors: Vec<(usize, usize)> = (0..=n_slots)
        .flat_map(|n_up| (0..=n_slots).map(move |n_down| (n_up, n_down)))
        .collect();
    let progress_bar = ProgressBar::new(sectors.len() as u64);
    progress_bar.set_prefix("Sectors: ");
    progress_bar.set_style(ProgressStyle::with_template("[{elapsed_precise}] {prefix} {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")
    .unwrap()
    .progress_chars("##-"));

    let mut failed = 0;
    let mut total_nnz = 0;
    for &(n_up, n_down) in sectors.iter() {
        progress_bar.set_message(format!("({}, {})", n_up, n_down));
        let params = FeAsParams::new(HUBBARD_U, vec![0.0; NSITES]);
        let model = match FeBasedSc::<_, u16>::new(n_up, n_down, params, &geometry) {
            Ok(m) => m,
            Err(e) => {
                error!("{}", e);
                failed += 1;
                progress_bar.inc(1);
                continue;
            }
        };
        let h = setup_hamiltonian(&model);
        total_nnz += h.nnz();

        // The matrix-free product must agree with the stored matrix.
        let y: Vec<f64> = (0..h.rows()).map(|i| <f64>::cos(i as f64)).collect();
        let expected = h.matvec(&y);
        let mut x = vec![0.0; model.basis().size()];
        matrix_vector_product(&model, &mut x, &y);
        let diff = x.iter().zip(expected.iter()).map(|(a, b)| <f64>::abs(a - b)).fold(0.0, f64::max);

        if !h.is_symmetric(SYMMETRY_TOLERANCE) || diff > SYMMETRY_TOLERANCE {
            error!("Sector ({}, {}) failed: symmetric = {}, matrix-free difference = {:e}.",
                n_up, n_down, h.is_symmetric(SYMMETRY_TOLERANCE), diff);
            failed += 1;
        } else {
            info!("Sector ({}, {}): dimension {}, {} non-zeros.", n_up, n_down, h.rows(), h.nnz());
        }
        progress_bar.inc(1);
    }
    progress_bar.finish_with_message("done");

    println!("{} sectors, {} non-zeros in total.", sectors.len(), total_nnz);
    if failed == 0 {
        println!("{}", "All sectors are hermitian and consistent.".green());
    } else {
        println!("{}", format!("{} sectors failed.", failed).red());
        std::process::exit(1);
    }
}
