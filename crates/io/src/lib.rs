//! `planogrid-io` — file loading and re-export around the engine.
//!
//! The engine decodes from in-memory strings; this crate gets those
//! strings off disk (with an encoding fallback for Excel-flavored
//! exports) and re-serializes the arranged ordering back to CSV.

pub mod export;
pub mod feed;

pub use export::ordered_csv;
pub use feed::{load_catalog, load_inventory, read_file_as_utf8};
