//! Spec maps: curated `Symbol,Description` tables, one per protocol vocabulary.

pub mod error;
pub mod parse;
pub mod table;

pub use error::SpecMapError;
pub use parse::load_spec_maps;
pub use table::{SpecMap, SpecMaps};
