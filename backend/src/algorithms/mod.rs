//! Numerical routines for light-curve generation and detrending.
//!
//! Everything here is pure and synchronous; the HTTP layer runs these on the
//! blocking thread pool.

pub mod cleaning;
pub mod flatten;
pub mod synthetic;

pub use cleaning::{median, normalize, remove_nans, stitch, CleaningError};
pub use flatten::{effective_window, flatten, moving_average_trend, savgol_flatten, savgol_trend};
pub use synthetic::{synthetic_transit, SyntheticParams};
