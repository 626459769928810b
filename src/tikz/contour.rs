//! Text protection for labels drawn over lines.

use crate::geometry::LINE_BREAK;
use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref RE_SPECIAL: Regex = Regex::new(r"(\\?)([#$%&_])").unwrap();
}

/// Escape TeX special characters that are not already escaped.
pub fn escape_tex(text: &str) -> String {
    RE_SPECIAL
        .replace_all(text, |caps: &Captures| format!("\\{}", &caps[2]))
        .into_owned()
}

/// Wrap every label line in `\contour{white}{...}` so it stays legible on
/// top of arrows and lifelines. Empty text stays empty.
pub fn contour(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    text.split(LINE_BREAK)
        .map(|line| format!("\\contour{{white}}{{{}}}", escape_tex(line)))
        .collect::<Vec<_>>()
        .join(LINE_BREAK)
}
