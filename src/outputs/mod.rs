//! Output generation for the synthesized feed.
//!
//! # Submodules
//!
//! - [`rss`]: Orders and caps the extracted items, renders the RSS 2.0
//!   document (with the Media RSS image extension), and writes it to disk.

pub mod rss;
