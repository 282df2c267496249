//! Change derivations.
//!
//! - Differential (first difference)

mod differential;

pub use differential::{Differential, DifferentialConfig};
