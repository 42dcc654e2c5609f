//! Service layer for business logic.
//!
//! Services sit between the HTTP handlers and the repository traits.

pub mod comments;

pub use comments::CommentService;
