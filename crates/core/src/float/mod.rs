//! Float-account balance mutation.
//!
//! A float account is a running balance per branch, channel and provider
//! (MoMo float with MTN, cash in till, power float with ECG, ...). Every
//! service transaction moves one or more of them; this module decides which
//! and by how much, and enforces the balance rules before anything is written.

pub mod error;
pub mod movement;
pub mod types;

#[cfg(test)]
mod movement_props;

pub use error::FloatError;
pub use movement::{
    AppliedMovement, FloatMovement, FloatTarget, ResolvedMovement, float_movements,
    reversal_movements,
};
pub use types::{FloatAccountInfo, FloatAccountKind, FloatAlert, FloatApplied};
