/// Coupling table parser.
pub mod couplings;
