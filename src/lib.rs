//! Remold: Assisted Code-Migration Client
//!
//! Client core for a backend-driven code-migration service: holds the
//! inferred target project structure as a JSON document, exposes a pure
//! tree-edit protocol over it, persists the working copy locally, and
//! submits it to the migrator service for conversion.

pub mod config;
pub mod error;
pub mod logging;
pub mod migrator;
pub mod session;
pub mod store;
pub mod tooling;
pub mod tree;
