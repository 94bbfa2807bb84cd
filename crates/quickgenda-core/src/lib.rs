//! # QuickGenda Core
//!
//! Turns an agenda CSV into filled template pages: session model, CSV
//! parsing, name normalization, layout math, the settings object, the host
//! page abstraction and the placeholder filler.
//!
//! This crate performs no filesystem or process I/O. Image lookups go
//! through [`images::ImageProbe`] and pages through [`host::PageHost`], so
//! the application decides where files and documents live.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`parse`] | CSV text to [`models::Session`]s |
//! | [`names`] | Title stripping and filename variants |
//! | [`text`] | Line breaks and chairperson splitting |
//! | [`layout`] | Units, bounds, grid and row positions |
//! | [`settings`] | JSON settings with product defaults |
//! | [`host`] | Page and table traits, in-memory page |
//! | [`placeholders`] | Typed label registry |
//! | [`images`] | Avatar and flag matching |
//! | [`fill`] | Per-page orchestration |
//! | [`analysis`] | Template capabilities and suggestions |

pub mod analysis;
pub mod error;
pub mod fill;
pub mod host;
pub mod images;
pub mod layout;
pub mod models;
pub mod names;
pub mod parse;
pub mod placeholders;
pub mod settings;
pub mod text;
