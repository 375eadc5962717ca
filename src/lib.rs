//! Exact diagonalization core for multi-orbital lattice fermion models.
//!
//! The crate builds the occupation-number basis of a given particle-number
//! sector and the Hamiltonian acting on it, either as an explicit
//! compressed-sparse-row matrix or as a matrix-free matrix-vector product.
//! The result is meant to be handed to an iterative eigensolver.

/// Sign picked up when two fermionic operators are exchanged.
pub const FERMION_SIGN: i32 = -1;

/// Spin species of an electron.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Spin {
    Up,
    Down,
}

impl Spin {
    /// Both spins, up first.
    pub const BOTH: [Spin; 2] = [Spin::Up, Spin::Down];
}

impl std::fmt::Display for Spin {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Spin::Up => write!(f, "{}", strings::UPARROW),
            Spin::Down => write!(f, "{}", strings::DOWNARROW),
        }
    }
}

/// Single fermionic operator kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// $c^\dagger$
    Constructor,
    /// $c$
    Destructor,
}

impl Operator {
    /// Change in particle number when this operator is applied.
    pub fn delta(&self) -> isize {
        match self {
            Operator::Constructor => 1,
            Operator::Destructor => -1,
        }
    }
}

// Have the FockState struct at the root.
include!("fock_state.rs");

/// Unicode glyphs used in the display of states.
pub mod strings;

/// Errors reported when a basis or a model is misconfigured.
pub mod errors;

/// Occupation-number bases.
/// # Definition
/// A single spin sector with $N$ particles over $N_s N_o$ slots holds every
/// occupation word of popcount $N$, sorted numerically. Its size is
///
/// $$
/// \dim = \binom{N_sN_o}{N}
/// $$
///
/// and the rank of a word with set bits $p_0<p_1<\dots<p_{N-1}$ is
///
/// $$
/// r = \sum_{k=0}^{N-1}\binom{p_k}{k+1}.
/// $$
///
/// The two spin sectors are combined through the direct product index
/// $i = x + y\dim_\uparrow$.
pub mod basis;

/// Lattice connectivity and coupling amplitudes.
pub mod geometry;

/// Input file parsing util.
/// # Subfiles
/// * __`couplings.csv`__ - Coupling table of the lattice. In csv format, 6
/// columns: `i`, `orb_i`, `j`, `orb_j`, `kind` and `value`.
pub mod parse;

/// Compressed sparse row storage and the cached sparse row used by the
/// matrix-free product.
pub mod sparse;

/// Generic two-pass Hamiltonian assembly.
/// # Definition
/// A model yields, for every basis state $\vert x\rangle$, its diagonal energy
/// $\langle x\vert H\vert x\rangle$ and the sequence of off-diagonal terms
/// $\langle x'\vert H\vert x\rangle$. The same sequence is consumed once to
/// count the non-zeros and once to fill the matrix.
pub mod hamiltonian;

/// Concrete lattice models.
pub mod models;

/// Green's function state modifier.
/// # Definition
/// Builds
///
/// $$
/// \vert\phi\rangle = \left(c^{(\dagger)}_{i\sigma} \pm c^{(\dagger)}_{j\sigma}\right)
/// \vert\psi_0\rangle
/// $$
///
/// in the sector with one particle more (or less) than $\vert\psi_0\rangle$.
pub mod green;
