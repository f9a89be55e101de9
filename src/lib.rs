//! Library crate for usrgrp-ldif.
//!
//! This crate exposes the building blocks of the converter:
//! - Run configuration and directory constants (`config`)
//! - Error and result types (`error`)
//! - Group membership indexing (`groups`)
//! - Credential hashing (`hash`)
//! - LDIF entry rendering (`ldif`)
//! - CSV record loading and role classification (`records`)
//! - Mode resolution and run orchestration (`run`)
//!
//! It is used by the `usrgrp-ldif` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod config;
pub mod error;
pub mod groups;
pub mod hash;
pub mod ldif;
pub mod records;
pub mod run;

// Re-export commonly used items at the crate root for convenience
/// Convenient error and result types shared across the crate.
pub use error::{DynError, Result};
