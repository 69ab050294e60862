//! Shared text formatting utilities for consistent styling

use console::style;
use std::{fmt::Display, time::Duration};

/// Format text with key field styling (bold and cyan when colors enabled)
pub(crate) fn format_key<T: Display>(text: T, use_colors: bool) -> String {
    let text = text.to_string();

    if use_colors {
        style(text).bold().cyan().to_string()
    } else {
        text
    }
}

/// `1.2s`, or `350ms` below a second.
pub(crate) fn format_duration(duration: Duration) -> String {
    if duration < Duration::from_secs(1) {
        format!("{}ms", duration.as_millis())
    } else {
        format!("{:.1}s", duration.as_secs_f64())
    }
}
