//! HTTP server module for the comments backend.
//!
//! This module provides an axum-based HTTP server that exposes the comment
//! service as a JSON REST API.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                              │
//! │  - Path id and JSON body decoding                        │
//! │  - JSON encoding, error envelope, status policy          │
//! │  - CORS, compression, tracing, panic isolation           │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Service Layer (services::CommentService)                │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Repository Layer (db/)                                  │
//! │  - LocalRepository / PostgresRepository                  │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
