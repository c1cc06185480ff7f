//! Session module for exchanging the working collection with the scan stage.
//!
//! # Features
//!
//! * **Persistence**: Items, their metrics and their removal flags in JSON.
//! * **Integrity**: Each session file is wrapped in an envelope with a SHA256 checksum.
//! * **Versioning**: Files carry a format version; unknown versions are rejected.
//!
//! # Architecture
//!
//! * [`data`]: The serializable session model.
//! * [`io`]: Logic for saving, loading, and verifying session files.

pub mod data;
pub mod io;

pub use data::{Session, SESSION_VERSION};
