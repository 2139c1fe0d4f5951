//! Logging utilities
//!
//! This module provides standardized logging functions for engine operations.

use std::time::Duration;

/// Log an operation start with consistent format
///
/// # Arguments
/// * `operation` - Description of the operation
/// * `subject` - What the operation runs over (e.g. "Statins fills")
pub fn log_operation_start(operation: &str, subject: &str) {
    log::info!("{operation} {subject}");
}

/// Log an operation completion with consistent format
///
/// # Arguments
/// * `operation` - Description of the operation
/// * `items` - Number of items processed
/// * `elapsed` - Optional elapsed time
pub fn log_operation_complete(operation: &str, items: usize, elapsed: Option<Duration>) {
    if let Some(duration) = elapsed {
        log::info!("Successfully {operation} {items} items in {duration:?}");
    } else {
        log::info!("Successfully {operation} {items} items");
    }
}

/// Log units excluded from an aggregate for lack of data
///
/// # Arguments
/// * `unit` - Kind of unit excluded (e.g. "members", "measures")
/// * `count` - Number of excluded units
/// * `reason` - Why they were excluded
pub fn log_exclusions(unit: &str, count: usize, reason: &str) {
    if count > 0 {
        log::warn!("Excluded {count} {unit}: {reason}");
    }
}
