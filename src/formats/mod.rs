//! Resource file formats understood by locsheet.

pub mod strings;

pub use strings::{Format as StringsFormat, Pair};
