//! Web API module for Stratus.
//!
//! This module provides the REST API: registration and authentication,
//! folder hierarchy management, and file upload/download.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;
