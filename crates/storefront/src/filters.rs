//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Highest star rating a game pass can carry.
const MAX_STARS: usize = 5;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Returns the content hash for main.css.
///
/// The hash is computed at build time from the CSS file content.
///
/// Usage in templates: `{{ ""|css_hash }}`
#[askama::filter_fn]
pub fn css_hash(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(env!("CSS_HASH"))
}

/// Returns the content hash for app.js.
///
/// Usage in templates: `{{ ""|js_hash }}`
#[askama::filter_fn]
pub fn js_hash(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(env!("JS_HASH"))
}

/// Renders a 0-5 rating as filled and empty stars.
///
/// Usage in templates: `{{ rating|stars }}`
#[askama::filter_fn]
pub fn stars(rating: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(star_row(&rating.to_string()))
}

fn star_row(rating: &str) -> String {
    let filled = rating.trim().parse::<usize>().unwrap_or(0).min(MAX_STARS);
    let mut row = "★".repeat(filled);
    row.push_str(&"☆".repeat(MAX_STARS - filled));
    row
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_row() {
        assert_eq!(star_row("4"), "★★★★☆");
        assert_eq!(star_row("0"), "☆☆☆☆☆");
        assert_eq!(star_row("9"), "★★★★★");
        assert_eq!(star_row("n/a"), "☆☆☆☆☆");
    }
}
