//! Local extrema derivations.
//!
//! - Maxima (strict local peaks)
//! - Minima (strict local troughs)
//!
//! Both keep the value at a qualifying interior position and leave every
//! other position missing. The endpoints have a single neighbour and never
//! qualify.

mod maxima;
mod minima;

pub use maxima::Maxima;
pub use minima::Minima;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration shared by the extrema derivations. It takes no parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExtremaConfig;
