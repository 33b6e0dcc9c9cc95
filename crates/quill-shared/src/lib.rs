//! # Quill Shared
//!
//! Request/response types shared across the API surface, plus the
//! standard response envelopes.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse};
