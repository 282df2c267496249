//! Correlation derivations.
//!
//! - Autocorrelation profile by lag

mod autocorrelation;

pub use autocorrelation::{Autocorrelation, AutocorrelationConfig};
