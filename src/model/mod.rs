pub mod lattice;
pub mod site;
pub mod structure;
pub mod types;
