//! # Commenting Service
//!
//! CRUD backend for short user comments, exposed as a JSON REST API.
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: Wire types shared by every layer
//! - [`db`]: Repository trait, storage backends and their configuration
//! - [`services`]: The comment service sitting between transport and storage
//! - [`config`]: Server and logging settings
//! - `http`: Axum-based HTTP server and request handlers
//! - `logging`: Subscriber construction for the binary
//!
//! ## Storage backends
//!
//! - `local-repo`: in-memory store, used by default and in tests
//! - `postgres-repo`: PostgreSQL through Diesel with embedded migrations

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;
pub mod config;
pub mod db;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;

#[cfg(feature = "http-server")]
pub mod logging;
