//! # Exoplanet light-curve backend
//!
//! Serves synthetic and archive light curves for exoplanet-transit
//! visualization, plus a mocked classification endpoint, so a front-end demo can
//! fetch plots and JSON series without a real model behind it.
//!
//! ## Architecture
//!
//! - [`models`]: light curves, missions and classification results
//! - [`algorithms`]: synthetic generator, flattening filters, cleaning steps
//! - [`archive`]: light-curve archives (local directory, remote HTTP) and the product cache
//! - [`services`]: synthetic series, archive pipeline, mock scoring, PNG rendering
//! - [`config`]: server and archive configuration
//! - [`http`]: axum router and handlers
//!
//! ## Endpoints
//!
//! | Route | Response |
//! |-------|----------|
//! | `GET /`, `GET /health` | liveness JSON |
//! | `GET /plot-test` | PNG of a synthetic curve, raw and flattened |
//! | `GET /lc-test` | synthetic curve as JSON |
//! | `POST /predict` | mock classification |
//! | `GET /lc/{target_id}` | archive curve as JSON |
//! | `GET /plot/{target_id}` | archive curve as PNG |

pub mod algorithms;
pub mod archive;
pub mod config;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
