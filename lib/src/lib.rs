//! Profile export and import for the bukurs bookmark manager.
//!
//! An export picks categories of a profile, packs them into an
//! [`models::ExportDocument`] and optionally encrypts it into a text
//! artifact. An import classifies such an artifact, validates it and merges
//! the chosen categories into the profile store.

pub mod config;
pub mod crypto;
pub mod error;
pub mod export;
pub mod import;
pub mod lock;
pub mod models;
pub mod store;
pub mod transport;
pub mod utils;

pub use error::{ProfileError, Result};
