// File I/O operations

pub mod csv;
pub mod document;
pub mod error;

pub use error::IoError;
