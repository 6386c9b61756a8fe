pub mod classification;
pub mod light_curve;
pub mod mission;

pub use classification::*;
pub use light_curve::*;
pub use mission::*;
