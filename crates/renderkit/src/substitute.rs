//! Variable substitution
//!
//! `${name}` placeholders are replaced by the value of `name`. Names
//! without a value are left as they are. Replacement happens in a single
//! pass, so values that themselves look like placeholders are inserted
//! verbatim.

use regex::{Captures, Regex};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::hash::BuildHasher;
use std::sync::LazyLock;

/// Placeholder that renders as a literal `$`
pub const DOLLAR_ESCAPE: &str = "${dollar}";

const DOLLAR_NAME: &str = "dollar";

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^{}]+)\}").expect("PLACEHOLDER must compile"));

/// Source of values for placeholders
pub trait Variables {
    fn get_var(&self, name: &str) -> Option<&str>;
}

impl<S: BuildHasher> Variables for HashMap<String, String, S> {
    fn get_var(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl Variables for BTreeMap<String, String> {
    fn get_var(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

/// Replace every known `${name}` in `text`
///
/// `${dollar}` is never substituted here, even if `vars` has a value
/// for it; it is left for [`unescape`].
pub fn substitute<V: Variables + ?Sized>(text: &str, vars: &V) -> String {
    PLACEHOLDER
        .replace_all(text, |caps: &Captures| {
            let name = &caps[1];
            if name == DOLLAR_NAME {
                return caps[0].to_string();
            }
            vars.get_var(name)
                .map_or_else(|| caps[0].to_string(), str::to_string)
        })
        .into_owned()
}

/// Turn every `${dollar}` into `$`
pub fn unescape(text: &str) -> String {
    text.replace(DOLLAR_ESCAPE, "$")
}

/// Names of the placeholders in `text` that `vars` has no value for
pub fn unresolved<V: Variables + ?Sized>(text: &str, vars: &V) -> BTreeSet<String> {
    PLACEHOLDER
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .filter(|name| name != DOLLAR_NAME && vars.get_var(name).is_none())
        .collect()
}
