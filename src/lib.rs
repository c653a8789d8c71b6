//! VoiceMemo - voice memo recorder for the terminal
//!
//! This crate records audio from the microphone, keeps the recordings on
//! the local disk or in a remote object store, and lets them be replayed
//! or deleted.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Recording status machine, file naming, library and config value objects
//! - **Application**: The recording controller, persistence variants and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (cpal, rodio, tokio::fs, HTTP object store)
//! - **CLI**: Command-line interface, interactive session, and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
