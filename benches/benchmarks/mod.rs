pub mod assembly;
pub mod basis;
