// src/domain/drop/mod.rs

pub mod descriptor;
pub mod invariants;

pub use descriptor::DropDescriptor;
pub use invariants::validate_descriptor;
