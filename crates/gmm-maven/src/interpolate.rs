//! `${property}` interpolation for POM values.

use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::LazyLock;

static PROPERTY_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("Invalid regex"));

/// Properties referring to other properties are followed at most this many times.
const MAX_PASSES: usize = 10;

pub struct Interpolator {
    values: HashMap<String, String>,
}

impl Interpolator {
    pub fn new(values: HashMap<String, String>) -> Self {
        Self { values }
    }

    /// Replaces every known `${key}` in `input`; unknown references stay verbatim.
    pub fn interpolate(&self, input: &str) -> String {
        if !input.contains("${") {
            return input.to_string();
        }

        let mut current = input.to_string();
        for _ in 0..MAX_PASSES {
            let next = PROPERTY_REF
                .replace_all(&current, |caps: &Captures<'_>| {
                    self.values
                        .get(caps[1].trim())
                        .cloned()
                        .unwrap_or_else(|| caps[0].to_string())
                })
                .into_owned();
            if next == current {
                break;
            }
            current = next;
        }

        if PROPERTY_REF.is_match(&current) {
            tracing::warn!("Unresolved property reference in '{}'", current);
        }
        current
    }

    pub fn interpolate_opt(&self, input: Option<&str>) -> Option<String> {
        input.map(|s| self.interpolate(s))
    }
}
