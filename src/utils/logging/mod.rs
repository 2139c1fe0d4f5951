//! Logging utilities for output and progress tracking
//!
//! This module provides utilities for consistent log lines and progress bars
//! around population-sized computations.

pub mod log;
pub mod progress;

// Re-export commonly used functions for convenience
pub use log::{log_exclusions, log_operation_complete, log_operation_start};
pub use progress::{create_main_progress_bar, finish_progress_bar};
