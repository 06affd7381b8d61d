//! Year extraction from free-text periods such as "May 2021 — Sep 2024" or
//! "2024 — Present".

use chrono::{Datelike, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

static YEAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]{4}").expect("year pattern is a valid regex"));

const PRESENT_MARKER: &str = "Present";

/// Returned by [`sort_year`] when a period carries no year at all.
pub const NO_YEAR: i32 = 0;

pub fn current_year() -> i32 {
    Utc::now().year()
}

fn years(period: &str) -> impl Iterator<Item = i32> + '_ {
    YEAR_PATTERN
        .find_iter(period)
        .filter_map(|m| m.as_str().parse::<i32>().ok())
}

/// Year used to order cards: the end year of the range.
///
/// Ongoing periods ("... Present") use their last explicit year, or
/// `current_year` when they have none. Everything else uses the last year
/// found, or [`NO_YEAR`].
pub fn sort_year(period: &str, current_year: i32) -> i32 {
    let last = years(period).last();
    if period.contains(PRESENT_MARKER) {
        last.unwrap_or(current_year)
    } else {
        last.unwrap_or(NO_YEAR)
    }
}

/// Year used to place an event on the timeline: the first year found.
/// A leading `0000` counts as undated.
pub fn timeline_year(period: &str) -> Option<i32> {
    years(period).next().filter(|&year| year > NO_YEAR)
}
