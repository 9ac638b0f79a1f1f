//! Spor - WebVTT Transcript Ingestion
//!
//! A local-first CLI tool for parsing WebVTT course transcripts and building
//! a searchable vector store from them.
//!
//! The name "Spor" comes from the Norwegian word for "track" — as in a
//! subtitle track.
//!
//! # Overview
//!
//! Spor allows you to:
//! - Parse WebVTT subtitle files into timestamped, metadata-rich records
//! - Derive course/lesson/technology identity from file paths
//! - Ingest whole course directories into a Qdrant vector store in
//!   rate-limited batches, ready for retrieval-augmented chat
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `vtt` - WebVTT parsing: timestamps, sanitization, cue blocks, chunking
//! - `metadata` - Path metadata extraction
//! - `loader` - Per-file loading, record construction and file discovery
//! - `embedding` - Embedding generation
//! - `vector_store` - Vector store abstraction
//! - `ingest` - Batch ingestion driver
//!
//! # Example
//!
//! ```rust,no_run
//! use spor::loader::{LoaderOptions, VttLoader};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let options = LoaderOptions {
//!         combine_segments: true,
//!         segments_per_chunk: 4,
//!         ..LoaderOptions::default()
//!     };
//!     let loader = VttLoader::new("genai-cohort/nodejs/01-introduction.vtt", options)?;
//!     let records = loader.load().await?;
//!     println!("Parsed {} records", records.len());
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod ingest;
pub mod loader;
pub mod metadata;
pub mod vector_store;
pub mod vtt;

pub use error::{Result, SporError};
