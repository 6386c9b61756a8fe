//! HTTP server module.
//!
//! An axum server exposing the synthetic (mock) endpoints and the archive-backed
//! endpoints over one router.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - Query validation                                       │
//! │  - JSON / PNG responses                                   │
//! │  - CORS, compression, tracing, error mapping              │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Service Layer (services/)                                │
//! │  - Synthetic series, mock scoring, plotting               │
//! │  - Archive pipeline                                       │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Archive Layer (archive/)                                 │
//! │  - LocalArchive / HttpArchive + product cache             │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
