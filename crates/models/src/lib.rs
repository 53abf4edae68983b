//! Persistence layer: sea-orm entities, scalar-to-column conversions and the
//! database connection.

pub mod conversions;
pub mod db;
pub mod errors;
pub mod user;

pub use conversions::{ColumnConversion, ConversionRegistry, Converter};
pub use errors::ModelError;
