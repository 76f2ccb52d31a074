//! Precedent status: the transition rules and the manager that appends
//! status changes.

pub mod propagation;
pub mod transitions;

pub use propagation::{apply_treatment_in, log_change, StatusPropagationManager};
pub use transitions::check_transition;
