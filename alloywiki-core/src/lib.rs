//! # alloywiki-core
//!
//! Core library for the alloywiki static site generator.
//!
//! This crate indexes a markdown corpus of alloy sheets, rewrites
//! `[[wikilinks]]` and `![[embeds]]` into HTML, and emits whitelisted
//! aggregate pages plus one page per document. It also extracts alloy
//! sample properties from the corpus for JSON export.

pub mod builder;
pub mod config;
pub mod emit;
pub mod index;
pub mod markdown;
pub mod models;
pub mod properties;
pub mod rename;
pub mod slug;
pub mod whitelist;

pub use builder::{BuildError, SiteBuilder};
pub use config::Config;
pub use index::LinkIndex;
pub use markdown::MarkdownProcessor;
pub use models::{BuildReport, Diagnostic, DiagnosticSeverity, Document};
pub use properties::{scan_samples, AlloySample};
pub use rename::{normalize_names, Rename, RenameSummary};
pub use slug::document_key;
pub use whitelist::Whitelist;
