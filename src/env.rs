//! Typed, best-effort access to environment variables.
//!
//! Every read here is fail-soft: an unset variable yields the default, an
//! unparsable value yields the default, and a value outside the optional
//! allowed list yields `None`. Nothing errors.

use std::env;
use std::path::PathBuf;

use once_cell::sync::Lazy;

/// Application prefix for variable names, read once from
/// `BURROW_APP_PREFIX`. Empty when unset.
pub static APP_PREFIX: Lazy<String> =
    Lazy::new(|| env::var("BURROW_APP_PREFIX").unwrap_or_default());

/// Joins [`APP_PREFIX`] and `key` with an underscore; just `key` when no
/// prefix is configured.
pub fn prefixed(key: &str) -> String {
    if APP_PREFIX.is_empty() {
        key.to_string()
    } else {
        format!("{}_{}", APP_PREFIX.as_str(), key)
    }
}

/// Retrieves the string value of `key`.
///
/// A set value outside `allowed` yields `None` (not the default); an unset
/// variable yields `default`.
pub fn get_str(key: &str, allowed: Option<&[&str]>, default: Option<&str>) -> Option<String> {
    match env::var(key) {
        Ok(value) => match allowed {
            Some(values) if !values.contains(&value.as_str()) => None,
            _ => Some(value),
        },
        Err(_) => default.map(String::from),
    }
}

/// Retrieves the integer value of `key`.
pub fn get_int(key: &str, allowed: Option<&[i64]>, default: Option<i64>) -> Option<i64> {
    match env::var(key) {
        Ok(value) => match value.trim().parse::<i64>() {
            Ok(parsed) => match allowed {
                Some(values) if !values.contains(&parsed) => None,
                _ => Some(parsed),
            },
            Err(_) => default,
        },
        Err(_) => default,
    }
}

/// Retrieves the float value of `key`.
pub fn get_float(key: &str, allowed: Option<&[f64]>, default: Option<f64>) -> Option<f64> {
    match env::var(key) {
        Ok(value) => match value.trim().parse::<f64>() {
            Ok(parsed) => match allowed {
                Some(values) if !values.contains(&parsed) => None,
                _ => Some(parsed),
            },
            Err(_) => default,
        },
        Err(_) => default,
    }
}

/// Retrieves the boolean value of `key`.
///
/// Accepted spellings, case disregarded: `1`, `t`, `true` for true and `0`,
/// `f`, `false` for false. Any other set value yields `None`.
pub fn get_bool(key: &str, default: Option<bool>) -> Option<bool> {
    match env::var(key) {
        Ok(value) => match value.to_lowercase().as_str() {
            "1" | "t" | "true" => Some(true),
            "0" | "f" | "false" => Some(false),
            _ => None,
        },
        Err(_) => default,
    }
}

/// Retrieves the filesystem path value of `key`.
pub fn get_path(key: &str, default: Option<PathBuf>) -> Option<PathBuf> {
    match env::var(key) {
        Ok(value) => Some(PathBuf::from(value)),
        Err(_) => default,
    }
}

/// Retrieves the comma-separated string values of `key`.
///
/// An unset or empty variable yields `None`; any element outside `allowed`
/// rejects the whole list.
pub fn get_strs(key: &str, allowed: Option<&[&str]>) -> Option<Vec<String>> {
    let raw = env::var(key).ok()?;
    if raw.is_empty() {
        return None;
    }
    let values: Vec<String> = raw.split(',').map(String::from).collect();
    if let Some(accepted) = allowed {
        if values.iter().any(|v| !accepted.contains(&v.as_str())) {
            return None;
        }
    }
    Some(values)
}

/// Retrieves the comma-separated integer values of `key`.
///
/// Any unparsable or disallowed element rejects the whole list.
pub fn get_ints(key: &str, allowed: Option<&[i64]>) -> Option<Vec<i64>> {
    let raw = env::var(key).ok()?;
    if raw.is_empty() {
        return None;
    }
    let mut values = Vec::new();
    for part in raw.split(',') {
        let parsed = part.trim().parse::<i64>().ok()?;
        if let Some(accepted) = allowed {
            if !accepted.contains(&parsed) {
                return None;
            }
        }
        values.push(parsed);
    }
    Some(values)
}

/// Retrieves the comma-separated float values of `key`.
pub fn get_floats(key: &str, allowed: Option<&[f64]>) -> Option<Vec<f64>> {
    let raw = env::var(key).ok()?;
    if raw.is_empty() {
        return None;
    }
    let mut values = Vec::new();
    for part in raw.split(',') {
        let parsed = part.trim().parse::<f64>().ok()?;
        if let Some(accepted) = allowed {
            if !accepted.contains(&parsed) {
                return None;
            }
        }
        values.push(parsed);
    }
    Some(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own variable name: the test harness runs these in
    // parallel within one process.

    #[test]
    fn prefixed_without_prefix_is_identity() {
        // BURROW_APP_PREFIX is unset in the test environment
        assert_eq!(prefixed("SOME_KEY"), "SOME_KEY");
    }

    #[test]
    fn str_default_and_allowed() {
        env::set_var("BURROW_T_STR", "beta");
        assert_eq!(get_str("BURROW_T_STR", None, None), Some("beta".into()));
        assert_eq!(
            get_str("BURROW_T_STR", Some(&["alpha", "beta"]), None),
            Some("beta".into())
        );
        // present but disallowed: None, not the default
        assert_eq!(
            get_str("BURROW_T_STR", Some(&["alpha"]), Some("alpha")),
            None
        );
        assert_eq!(
            get_str("BURROW_T_STR_UNSET", None, Some("fallback")),
            Some("fallback".into())
        );
    }

    #[test]
    fn int_parsing_is_best_effort() {
        env::set_var("BURROW_T_INT", "42");
        assert_eq!(get_int("BURROW_T_INT", None, None), Some(42));
        env::set_var("BURROW_T_INT_BAD", "forty-two");
        assert_eq!(get_int("BURROW_T_INT_BAD", None, Some(7)), Some(7));
        assert_eq!(get_int("BURROW_T_INT_UNSET", None, None), None);
    }

    #[test]
    fn bool_spellings() {
        for (raw, expected) in [("1", true), ("T", true), ("true", true), ("0", false), ("F", false), ("FALSE", false)] {
            env::set_var("BURROW_T_BOOL", raw);
            assert_eq!(get_bool("BURROW_T_BOOL", None), Some(expected));
        }
        env::set_var("BURROW_T_BOOL", "yes");
        assert_eq!(get_bool("BURROW_T_BOOL", Some(true)), None);
    }

    #[test]
    fn lists_reject_as_a_whole() {
        env::set_var("BURROW_T_INTS", "1,2,3");
        assert_eq!(get_ints("BURROW_T_INTS", None), Some(vec![1, 2, 3]));
        assert_eq!(get_ints("BURROW_T_INTS", Some(&[1, 2])), None);
        env::set_var("BURROW_T_INTS_BAD", "1,x,3");
        assert_eq!(get_ints("BURROW_T_INTS_BAD", None), None);
        env::set_var("BURROW_T_STRS", "a,b");
        assert_eq!(
            get_strs("BURROW_T_STRS", None),
            Some(vec!["a".to_string(), "b".to_string()])
        );
    }
}
