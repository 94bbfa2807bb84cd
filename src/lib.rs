//! # QuickGenda
//!
//! Generates one filled agenda page per session from an agenda CSV and a
//! labelled page template. The pure fill logic lives in [`quickgenda_core`];
//! this crate adds files, configuration and the `agenda` CLI.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML run configuration and settings loading |
//! | [`template`] | Template page and output document files |
//! | [`image_fs`] | Filesystem image probe and folder scan |
//! | [`generate`] | The generate run loop |
//! | [`report`] | Plain-text import report |
//! | [`inspect`] | CSV and template overview |

pub mod config;
pub mod generate;
pub mod image_fs;
pub mod inspect;
pub mod report;
pub mod template;
