//! Writers for the downloadable table formats

pub mod csv;
#[cfg(feature = "pdf")]
pub mod pdf;
