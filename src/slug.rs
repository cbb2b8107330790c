use std::sync::LazyLock;

use regex::Regex;

static NON_ALNUM_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^a-z0-9]+").expect("valid slug regex"));

/// URL-safe id for a series name: lowercase, non-alphanumeric runs become a
/// single `-`, no leading or trailing `-`.
pub fn slugify(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    NON_ALNUM_RUN
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_owned()
}
