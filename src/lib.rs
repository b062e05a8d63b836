#![forbid(unsafe_code)]
//! Localization table toolkit for Apple `.strings` projects.
//!
//! Loads a project folder (one `<lang>.lproj` directory per language) into an
//! in-memory [`LocalizationTable`], supports editing keys and values per
//! group, filtering and searching, and exchanging CSV snapshots of a group.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use locsheet::{Filter, folder, snapshot};
//!
//! let loaded = folder::load_folder("MyApp")?;
//! let mut table = loaded.table;
//!
//! // Edit the active group.
//! table.add_key("welcome_title", Some("Shown on first launch"))?;
//! table.update_value("en", "welcome_title", "Welcome!", None)?;
//!
//! // List untranslated keys.
//! for key in table.filtered_keys(Filter::Untranslated, "") {
//!     println!("{}", key);
//! }
//!
//! // Write a CSV snapshot next to the project.
//! let path = snapshot::export_snapshot(&table, "Localizable", &loaded.title, ".")?;
//! println!("exported {}", path.display());
//! # Ok::<(), locsheet::Error>(())
//! ```
//!
//! # Design notes
//!
//! - Snapshots use RFC-4180 quoting via the `csv` crate, so commas, quotes,
//!   and newlines in values survive a round trip.
//! - Export row order is lexicographic by key for deterministic, diff-friendly
//!   output; table views keep insertion order.
//! - Languages are never registered implicitly by an edit. Snapshot imports
//!   reject unknown languages unless
//!   [`snapshot::ImportOptions::allow_new_languages`] is set.

pub mod error;
pub mod folder;
pub mod formats;
pub mod snapshot;
pub mod table;
pub mod traits;
pub mod types;

// Re-export the most used types for easy consumption.
pub use crate::{
    error::Error,
    folder::{LoadedFolder, load_folder, save_folder},
    snapshot::{ImportBatch, ImportOptions, MergeReport},
    table::{Group, LocalizationTable},
    types::{Filter, LocalizationEntry},
};
