//! Configuration utility functions
//!
//! Helpers for reading prefixed environment variables. Every helper takes a
//! lookup function so callers can read from the process environment or from
//! a fixed map in tests.

use std::path::PathBuf;
use std::str::FromStr;

use super::ENV_PREFIX;

/// Builds the environment variable name for an option, e.g. `monitor` -> `OBFUSCATOR_MONITOR`.
pub fn env_key(option: &str) -> String {
    format!("{}{}", ENV_PREFIX, option.to_uppercase())
}

/// Reads the process environment.
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get a string value for an option, ignoring empty values
pub fn get_env_string<F>(lookup: &F, option: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(&env_key(option)).filter(|val| !val.is_empty())
}

/// Get a path value for an option
pub fn get_env_path<F>(lookup: &F, option: &str) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    get_env_string(lookup, option).map(PathBuf::from)
}

/// Get a boolean value for an option ("true"/"1"/"yes" or "false"/"0"/"no")
pub fn get_env_bool<F>(lookup: &F, option: &str) -> Option<bool>
where
    F: Fn(&str) -> Option<String>,
{
    let key = env_key(option);
    let val = get_env_string(lookup, option)?;
    match val.to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => {
            log::warn!("Ignoring {}={}: expected a boolean", key, val);
            None
        }
    }
}

/// Get a parsed value for an option; unparsable values are ignored with a warning
pub fn get_env_parsed<T, F>(lookup: &F, option: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let key = env_key(option);
    let val = get_env_string(lookup, option)?;
    match val.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            log::warn!("Ignoring {}={}: invalid value", key, val);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_env_key_is_prefixed_and_uppercased() {
        assert_eq!(env_key("scene_on"), "OBFUSCATOR_SCENE_ON");
    }

    #[test]
    fn test_get_env_bool_variants() {
        let lookup = lookup_from(&[
            ("OBFUSCATOR_A", "TRUE"),
            ("OBFUSCATOR_B", "0"),
            ("OBFUSCATOR_C", "maybe"),
        ]);
        assert_eq!(get_env_bool(&lookup, "a"), Some(true));
        assert_eq!(get_env_bool(&lookup, "b"), Some(false));
        assert_eq!(get_env_bool(&lookup, "c"), None);
        assert_eq!(get_env_bool(&lookup, "missing"), None);
    }

    #[test]
    fn test_get_env_parsed_ignores_garbage() {
        let lookup = lookup_from(&[("OBFUSCATOR_PORT", "44x"), ("OBFUSCATOR_MONITOR", " 2 ")]);
        assert_eq!(get_env_parsed::<u16, _>(&lookup, "port"), None);
        assert_eq!(get_env_parsed::<usize, _>(&lookup, "monitor"), Some(2));
    }

    #[test]
    fn test_empty_string_is_unset() {
        let lookup = lookup_from(&[("OBFUSCATOR_SCENE_ON", "")]);
        assert_eq!(get_env_string(&lookup, "scene_on"), None);
    }
}
