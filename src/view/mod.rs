//! Presentation state for the admin and voter screens, independent of how
//! the screens are drawn. Each view is plain data plus transitions, and can
//! render itself as text.

pub mod candidates;
pub mod dashboard;
pub mod login;
pub mod results;
pub mod voter;

/// Percentages are always shown to one decimal place.
pub fn format_percentage(percentage: f64) -> String {
    format!("{percentage:.1}%")
}
