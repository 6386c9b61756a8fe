//! Service layer for business logic and orchestration.
//!
//! Services sit between the HTTP handlers and the numerical routines and
//! archives. They hold no state of their own.

pub mod lightcurve;
pub mod pipeline;
pub mod plot;
pub mod scoring;

pub use lightcurve::{synthetic_series, SeriesPair};
pub use pipeline::{load_and_flatten, PipelineError, PipelineOutput, PipelineRequest};
pub use plot::{render_panels, Panel};
pub use scoring::{classify, planet_score, ScoreRequest};
