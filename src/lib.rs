//! Fetch a music review listing, cache it under `data/`, pull the
//! artist/album/year fields out of the markup and assemble a ranked table.

pub mod cache;
pub mod cleaner;
pub mod db;
pub mod error;
pub mod extract;
pub mod fields;
pub mod recipe;
pub mod settings;
pub mod table;
pub mod transform;

pub use cache::{Fetch, HttpFetcher, Source};
pub use cleaner::DataCleaner;
pub use error::{CleanerError, Result};
pub use extract::TagSelector;
pub use fields::Field;
pub use recipe::Recipe;
pub use settings::Settings;
pub use table::{ReviewRecord, ReviewTable};
