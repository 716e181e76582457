//! pbxpatch: safe source-file registration for Xcode project manifests
//!
//! Registers a source file everywhere a `project.pbxproj` needs to know about
//! it: a PBXFileReference declaration, a PBXBuildFile entry per build target,
//! the owning PBXGroup's children list, and each target's Sources build
//! phase.
//!
//! # Architecture
//!
//! All mutations compile down to a single primitive: [`Insertion`], a
//! verified byte-offset splice into the in-memory document. Intelligence
//! lives in span acquisition (marker scanning in [`pbx::locator`]), not in
//! the application logic. The document is treated as text in, text out — no
//! AST, no grammar, targeted pattern-driven edits only.
//!
//! # Safety
//!
//! - Duplicate registration is rejected before any identifier is minted
//! - Timestamped backup before mutation, atomic write (tempfile + fsync +
//!   rename) after post-mutation validation succeeds
//! - The destination file is never touched on any failure path
//!
//! # Example
//!
//! ```no_run
//! use pbxpatch::{Registrar, RunConfig};
//! use std::path::PathBuf;
//!
//! let config = RunConfig {
//!     project: PathBuf::from("App.xcodeproj/project.pbxproj"),
//!     source_file: PathBuf::from("App/Views/HomeView.swift"),
//!     group: "Views".to_string(),
//!     targets: vec!["App".to_string()],
//!     dry_run: false,
//! };
//!
//! match Registrar::new(config).run() {
//!     Ok(outcome) => println!("registered: {:?}", outcome.report),
//!     Err(e) => eprintln!("registration failed: {}", e),
//! }
//! ```

pub mod backup;
pub mod ident;
pub mod pbx;
pub mod splice;
pub mod transaction;
pub mod validate;

// Re-exports
pub use ident::{mint, mint_unique, token_population, IdentError};
pub use pbx::{find_block, find_section, LocateError, MutateError, Span};
pub use splice::{Insertion, SpliceError};
pub use transaction::{
    Outcome, Phase, RegisterError, Registrar, RunConfig, RunFailure, RunReport,
};
pub use validate::{already_registered, validate, ValidateError, REQUIRED_SECTIONS};
