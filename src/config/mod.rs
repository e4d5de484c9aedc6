pub mod auth;
#[cfg(feature = "cli")]
pub mod cli;
pub mod rules;

use regex::{Captures, Regex};
use std::sync::OnceLock;

/// Replaces `${VAR}` with the value of the environment variable `VAR`. Unknown
/// variables are left in place.
pub(crate) fn substitute_env_vars(content: &str) -> String {
    static ENV_VAR: OnceLock<Regex> = OnceLock::new();
    let re = ENV_VAR.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("env var regex is valid"));

    re.replace_all(content, |caps: &Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    })
    .into_owned()
}
