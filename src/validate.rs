//! Table-driven validation of map-shaped input.
//!
//! Validators read a named attribute out of a [`Value::Map`], coerce common
//! string/number spellings, check the caller's rules, and append rendered
//! messages to a caller-owned error list. Messages come from a
//! [`MessageCatalog`] that is always passed explicitly; the built-in English
//! table is the only static, and it is immutable.
//!
//! Attribute names may be dotted (`"payload.person.age"`): the last chain
//! segment indexes the map, the full name labels the message.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::text;
use crate::tree::Value;

// ============================================================================
// MESSAGE CATALOG
// ============================================================================

/// Required attribute.
pub const MSG_REQUIRED: u32 = 121;
/// Invalid value.
pub const MSG_INVALID: u32 = 141;
/// Must be less than the maximum.
pub const MSG_LESS_THAN: u32 = 143;
/// Must be greater than the minimum.
pub const MSG_GREATER_THAN: u32 = 144;
/// Length must be exactly the given size.
pub const MSG_LENGTH_EXACT: u32 = 146;
/// Length shorter than the minimum.
pub const MSG_LENGTH_SHORT: u32 = 147;
/// Length longer than the maximum.
pub const MSG_LENGTH_LONG: u32 = 148;
/// Must be the single allowed value.
pub const MSG_MUST_BE: u32 = 149;
/// Must be one of the allowed values.
pub const MSG_ONE_OF: u32 = 150;
/// Must be within the range.
pub const MSG_IN_RANGE: u32 = 151;
/// Must be of the given type.
pub const MSG_BAD_TYPE: u32 = 152;
/// Must match the pattern.
pub const MSG_BAD_PATTERN: u32 = 153;

static BUILTIN_MESSAGES: Lazy<HashMap<u32, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (MSG_REQUIRED, "Required attribute"),
        (MSG_INVALID, "Invalid value {}"),
        (MSG_LESS_THAN, "Invalid value {}: must be less than {}"),
        (MSG_GREATER_THAN, "Invalid value {}: must be greater than {}"),
        (MSG_LENGTH_EXACT, "Invalid value {}: length must be {}"),
        (MSG_LENGTH_SHORT, "Invalid value {}: length shorter than {}"),
        (MSG_LENGTH_LONG, "Invalid value {}: length longer than {}"),
        (MSG_MUST_BE, "Invalid value {}: must be {}"),
        (MSG_ONE_OF, "Invalid value {}: must be one of {}"),
        (MSG_IN_RANGE, "Invalid value {}: must be in the range {}"),
        (MSG_BAD_TYPE, "Invalid value {}: must be type {}"),
        (MSG_BAD_PATTERN, "Invalid value {}: does not match pattern {}"),
    ])
});

/// Catalog of numbered message templates.
///
/// Templates hold positional `{}` placeholders. An optional prefix is
/// rendered before the code (`PREFIX121: ...`), mirroring the convention of
/// downstream services that tag their error namespaces.
#[derive(Debug, Clone, Default)]
pub struct MessageCatalog {
    prefix: Option<String>,
    overrides: HashMap<u32, String>,
}

/// One argument for [`MessageCatalog::format_error`].
#[derive(Debug, Clone)]
pub enum MsgArg {
    /// Drops the next placeholder (and its leading separator) instead of
    /// filling it.
    Omitted,
    /// Fills the next placeholder verbatim.
    Verbatim(String),
    /// Fills the next placeholder wrapped in single quotes.
    Quoted(String),
}

impl MessageCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the namespace prefix rendered before the message code.
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = Some(prefix.to_string());
        self
    }

    /// Adds or replaces the template for `code` in this catalog instance.
    pub fn with_message(mut self, code: u32, template: &str) -> Self {
        self.overrides.insert(code, template.to_string());
        self
    }

    fn template(&self, code: u32) -> &str {
        if let Some(custom) = self.overrides.get(&code) {
            return custom;
        }
        BUILTIN_MESSAGES.get(&code).copied().unwrap_or("")
    }

    /// Renders the message for `code`, filling placeholders from `args` and
    /// appending the `@attr` label when given.
    pub fn format_error(&self, code: u32, args: &[MsgArg], attr: Option<&str>) -> String {
        let mut result = String::new();
        if let Some(prefix) = &self.prefix {
            result.push_str(prefix);
            result.push_str(&code.to_string());
            result.push_str(": ");
        }
        result.push_str(self.template(code));
        for arg in args {
            match arg {
                MsgArg::Omitted => {
                    // drop the placeholder together with its separator; a
                    // ": {}" tail is preferred over a bare " {}"
                    let colon = result.find(": {}");
                    let space = result.find(" {}");
                    match (colon, space) {
                        (Some(c), Some(s)) if c <= s => {
                            result = result.replacen(": {}", "", 1);
                        }
                        _ => {
                            result = result.replacen(" {}", "", 1);
                        }
                    }
                }
                MsgArg::Verbatim(text) => {
                    result = result.replacen("{}", text, 1);
                }
                MsgArg::Quoted(text) => {
                    result = result.replacen("{}", &format!("'{}'", text), 1);
                }
            }
        }
        if let Some(attr) = attr {
            result.push_str(" @");
            result.push_str(attr);
        }
        result
    }
}

/// Splits rendered messages back into structured maps with `code`,
/// `description`, and `attribute` entries, the shape typically emitted in a
/// JSON error reply.
pub fn format_errors(catalog: &MessageCatalog, errors: &[String]) -> Value {
    let mut items = Vec::new();
    for error in errors {
        let mut entry = im::HashMap::new();
        let mut desc = error.as_str();
        if let Some(pos) = error.rfind('@') {
            let attr = &error[pos + 1..];
            if pos > 0 && text::find_whitespace(attr).is_none() {
                entry.insert("attribute".to_string(), Value::String(attr.to_string()));
                desc = error[..pos].trim_end();
            }
        }
        let mut description = desc.to_string();
        if let Some(prefix) = &catalog.prefix {
            if desc.starts_with(prefix.as_str()) {
                if let Some(pos) = desc.find(':') {
                    entry.insert("code".to_string(), Value::String(desc[..pos].to_string()));
                    description = desc[pos + 1..].trim_start().to_string();
                }
            }
        }
        entry.insert("description".to_string(), Value::String(description));
        items.push(Value::Map(entry));
    }
    Value::List(items)
}

/// Rebuilds flat message strings from the structured list produced by
/// [`format_errors`].
pub fn unformat_errors(formatted: &Value) -> Vec<String> {
    let Value::List(items) = formatted else {
        return Vec::new();
    };
    let mut result = Vec::new();
    for item in items {
        match item {
            Value::Map(map) => {
                let code = map.get("code").and_then(Value::as_str).unwrap_or("");
                let desc = map.get("description").and_then(Value::as_str).unwrap_or("''");
                result.push(format!("{}: {}", code, text::sanitize(desc)));
            }
            Value::String(s) => result.push(s.clone()),
            _ => {}
        }
    }
    result
}

// ============================================================================
// FIELD VALIDATORS
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct BoolRules {
    pub default: Option<bool>,
    pub required: bool,
}

#[derive(Debug, Clone, Default)]
pub struct IntRules<'a> {
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub values: Option<&'a [i64]>,
    pub default: Option<i64>,
    pub required: bool,
}

#[derive(Debug, Clone, Default)]
pub struct FloatRules<'a> {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub values: Option<&'a [f64]>,
    pub default: Option<f64>,
    pub required: bool,
}

#[derive(Debug, Clone, Default)]
pub struct StrRules<'a> {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub values: Option<&'a [&'a str]>,
    pub pattern: Option<&'a Regex>,
    pub default: Option<&'a str>,
    pub required: bool,
}

fn attr_suffix(attr: &str) -> &str {
    match attr.rfind('.') {
        Some(pos) => &attr[pos + 1..],
        None => attr,
    }
}

fn lookup<'a>(source: &'a Value, attr: &str) -> Option<&'a Value> {
    source.as_map()?.get(attr_suffix(attr))
}

fn is_absent(value: Option<&Value>) -> bool {
    match value {
        None => true,
        Some(Value::Nil) => true,
        Some(Value::String(s)) => s.is_empty(),
        _ => false,
    }
}

fn push_error(errors: &mut Vec<String>, message: String) {
    errors.push(message);
}

fn quoted(value: impl ToString) -> MsgArg {
    MsgArg::Quoted(value.to_string())
}

/// Validates the boolean attribute `attr` of `source`.
///
/// Accepted spellings besides `Bool`: the numbers `1`/`0` and the strings
/// `1`/`t`/`true` and `0`/`f`/`false`, case disregarded.
pub fn validate_bool(
    catalog: &MessageCatalog,
    errors: &mut Vec<String>,
    source: &Value,
    attr: &str,
    rules: &BoolRules,
) -> Option<bool> {
    let value = lookup(source, attr);
    if is_absent(value) {
        if rules.default.is_some() {
            return rules.default;
        }
        if rules.required {
            push_error(errors, catalog.format_error(MSG_REQUIRED, &[], Some(attr)));
        }
        return None;
    }
    let coerced = match value {
        Some(Value::Bool(b)) => Some(*b),
        Some(Value::String(s)) => match s.to_lowercase().as_str() {
            "1" | "t" | "true" => Some(true),
            "0" | "f" | "false" => Some(false),
            _ => None,
        },
        Some(Value::Number(n)) if *n == 1.0 => Some(true),
        Some(Value::Number(n)) if *n == 0.0 => Some(false),
        _ => None,
    };
    if coerced.is_none() {
        let shown = value.map(|v| v.to_string()).unwrap_or_default();
        push_error(
            errors,
            catalog.format_error(
                MSG_BAD_TYPE,
                &[quoted(shown), MsgArg::Verbatim("bool".to_string())],
                Some(attr),
            ),
        );
    }
    coerced
}

/// Validates the integer attribute `attr` of `source`.
///
/// A numeric string coerces; a fractional number or a boolean does not.
pub fn validate_int(
    catalog: &MessageCatalog,
    errors: &mut Vec<String>,
    source: &Value,
    attr: &str,
    rules: &IntRules,
) -> Option<i64> {
    let value = lookup(source, attr);
    if is_absent(value) {
        if rules.default.is_some() {
            return rules.default;
        }
        if rules.required {
            push_error(errors, catalog.format_error(MSG_REQUIRED, &[], Some(attr)));
        }
        return None;
    }
    let coerced = match value {
        Some(Value::Number(n)) if n.fract() == 0.0 => Some(*n as i64),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    let Some(parsed) = coerced else {
        let shown = value.map(|v| v.to_string()).unwrap_or_default();
        push_error(
            errors,
            catalog.format_error(
                MSG_BAD_TYPE,
                &[quoted(shown), MsgArg::Verbatim("int".to_string())],
                Some(attr),
            ),
        );
        return None;
    };
    if let Some(accepted) = rules.values {
        if !accepted.contains(&parsed) {
            push_membership_error(catalog, errors, attr, parsed, accepted);
            return None;
        }
        return Some(parsed);
    }
    if let Some(message) = check_range(
        catalog,
        attr,
        parsed as f64,
        rules.min.map(|m| m as f64),
        rules.max.map(|m| m as f64),
        &parsed.to_string(),
    ) {
        push_error(errors, message);
        return None;
    }
    Some(parsed)
}

/// Validates the float attribute `attr` of `source`.
pub fn validate_float(
    catalog: &MessageCatalog,
    errors: &mut Vec<String>,
    source: &Value,
    attr: &str,
    rules: &FloatRules,
) -> Option<f64> {
    let value = lookup(source, attr);
    if is_absent(value) {
        if rules.default.is_some() {
            return rules.default;
        }
        if rules.required {
            push_error(errors, catalog.format_error(MSG_REQUIRED, &[], Some(attr)));
        }
        return None;
    }
    let coerced = match value {
        Some(Value::Number(n)) => Some(*n),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    let Some(parsed) = coerced else {
        let shown = value.map(|v| v.to_string()).unwrap_or_default();
        push_error(
            errors,
            catalog.format_error(
                MSG_BAD_TYPE,
                &[quoted(shown), MsgArg::Verbatim("float".to_string())],
                Some(attr),
            ),
        );
        return None;
    };
    if let Some(accepted) = rules.values {
        if !accepted.contains(&parsed) {
            push_membership_error(catalog, errors, attr, parsed, accepted);
            return None;
        }
        return Some(parsed);
    }
    if let Some(message) = check_range(
        catalog,
        attr,
        parsed,
        rules.min,
        rules.max,
        &Value::Number(parsed).to_string(),
    ) {
        push_error(errors, message);
        return None;
    }
    Some(parsed)
}

/// Validates the string attribute `attr` of `source`.
pub fn validate_str(
    catalog: &MessageCatalog,
    errors: &mut Vec<String>,
    source: &Value,
    attr: &str,
    rules: &StrRules,
) -> Option<String> {
    let value = lookup(source, attr);
    if is_absent(value) {
        if let Some(default) = rules.default {
            return Some(default.to_string());
        }
        if rules.required {
            push_error(errors, catalog.format_error(MSG_REQUIRED, &[], Some(attr)));
        }
        return None;
    }
    let Some(Value::String(text)) = value else {
        let shown = value.map(|v| v.to_string()).unwrap_or_default();
        push_error(
            errors,
            catalog.format_error(
                MSG_BAD_TYPE,
                &[quoted(shown), MsgArg::Verbatim("str".to_string())],
                Some(attr),
            ),
        );
        return None;
    };
    if let Some(accepted) = rules.values {
        if !accepted.contains(&text.as_str()) {
            push_membership_error(catalog, errors, attr, text, accepted);
            return None;
        }
        return Some(text.clone());
    }
    let length = text.chars().count();
    match (rules.min_length, rules.max_length) {
        (Some(min), Some(max)) if min == max && length != min => {
            push_error(
                errors,
                catalog.format_error(
                    MSG_LENGTH_EXACT,
                    &[quoted(text), quoted(min)],
                    Some(attr),
                ),
            );
            return None;
        }
        _ => {
            if let Some(max) = rules.max_length {
                if length > max {
                    push_error(
                        errors,
                        catalog.format_error(
                            MSG_LENGTH_LONG,
                            &[quoted(text), quoted(max)],
                            Some(attr),
                        ),
                    );
                    return None;
                }
            }
            if let Some(min) = rules.min_length {
                if length < min {
                    push_error(
                        errors,
                        catalog.format_error(
                            MSG_LENGTH_SHORT,
                            &[quoted(text), quoted(min)],
                            Some(attr),
                        ),
                    );
                    return None;
                }
            }
        }
    }
    if let Some(pattern) = rules.pattern {
        if !pattern.is_match(text) {
            push_error(
                errors,
                catalog.format_error(
                    MSG_BAD_PATTERN,
                    &[quoted(text), quoted(pattern.as_str())],
                    Some(attr),
                ),
            );
            return None;
        }
    }
    Some(text.clone())
}

fn push_membership_error<T: std::fmt::Display>(
    catalog: &MessageCatalog,
    errors: &mut Vec<String>,
    attr: &str,
    value: impl std::fmt::Display,
    accepted: &[T],
) {
    let message = if accepted.len() == 1 {
        catalog.format_error(
            MSG_MUST_BE,
            &[quoted(&value), quoted(&accepted[0])],
            Some(attr),
        )
    } else {
        let listed = accepted
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        catalog.format_error(
            MSG_ONE_OF,
            &[quoted(&value), MsgArg::Verbatim(format!("[{}]", listed))],
            Some(attr),
        )
    };
    errors.push(message);
}

fn check_range(
    catalog: &MessageCatalog,
    attr: &str,
    value: f64,
    min: Option<f64>,
    max: Option<f64>,
    shown: &str,
) -> Option<String> {
    let below = min.map(|m| value < m).unwrap_or(false);
    let above = max.map(|m| value > m).unwrap_or(false);
    if !below && !above {
        return None;
    }
    let message = match (min, max) {
        (Some(min), Some(max)) => catalog.format_error(
            MSG_IN_RANGE,
            &[
                quoted(shown),
                MsgArg::Verbatim(format!(
                    "[{}, {}]",
                    Value::Number(min),
                    Value::Number(max)
                )),
            ],
            Some(attr),
        ),
        (Some(min), None) => catalog.format_error(
            MSG_GREATER_THAN,
            &[quoted(shown), quoted(Value::Number(min))],
            Some(attr),
        ),
        _ => catalog.format_error(
            MSG_LESS_THAN,
            &[quoted(shown), quoted(Value::Number(max.unwrap_or_default()))],
            Some(attr),
        ),
    };
    Some(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::from_json_str;

    fn catalog() -> MessageCatalog {
        MessageCatalog::new().with_prefix("APP")
    }

    #[test]
    fn format_error_quotes_and_labels() {
        let msg = catalog().format_error(
            MSG_BAD_TYPE,
            &[quoted("x"), MsgArg::Verbatim("int".to_string())],
            Some("payload.age"),
        );
        assert_eq!(msg, "APP152: Invalid value 'x': must be type int @payload.age");
    }

    #[test]
    fn format_error_omitted_drops_placeholder() {
        let msg = MessageCatalog::new().format_error(MSG_INVALID, &[MsgArg::Omitted], None);
        assert_eq!(msg, "Invalid value");
    }

    #[test]
    fn int_coerces_strings_and_flags_garbage() {
        let source = from_json_str(r#"{"age": "42", "bad": "x"}"#).unwrap();
        let mut errors = Vec::new();
        let rules = IntRules { min: Some(18), max: Some(130), ..Default::default() };
        assert_eq!(
            validate_int(&catalog(), &mut errors, &source, "person.age", &rules),
            Some(42)
        );
        assert!(errors.is_empty());
        assert_eq!(
            validate_int(&catalog(), &mut errors, &source, "person.bad", &rules),
            None
        );
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("@person.bad"));
        assert!(errors[0].contains("must be type int"));
    }

    #[test]
    fn int_range_and_membership() {
        let source = from_json_str(r#"{"n": 7}"#).unwrap();
        let mut errors = Vec::new();
        let rules = IntRules { min: Some(10), max: Some(20), ..Default::default() };
        assert_eq!(validate_int(&catalog(), &mut errors, &source, "n", &rules), None);
        assert!(errors[0].contains("must be in the range [10, 20]"));

        let rules = IntRules { values: Some(&[1, 2, 3]), ..Default::default() };
        assert_eq!(validate_int(&catalog(), &mut errors, &source, "n", &rules), None);
        assert!(errors[1].contains("must be one of [1, 2, 3]"));
    }

    #[test]
    fn required_and_default_interplay() {
        let source = from_json_str(r#"{"present": ""}"#).unwrap();
        let mut errors = Vec::new();
        let rules = StrRules { required: true, ..Default::default() };
        assert_eq!(
            validate_str(&catalog(), &mut errors, &source, "present", &rules),
            None
        );
        assert!(errors[0].contains("Required attribute"));

        let rules = StrRules { default: Some("fallback"), required: true, ..Default::default() };
        assert_eq!(
            validate_str(&catalog(), &mut errors, &source, "missing", &rules),
            Some("fallback".to_string())
        );
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn bool_spellings_coerce() {
        let source = from_json_str(r#"{"a": "T", "b": 0, "c": true, "d": "sim"}"#).unwrap();
        let mut errors = Vec::new();
        let rules = BoolRules::default();
        assert_eq!(validate_bool(&catalog(), &mut errors, &source, "a", &rules), Some(true));
        assert_eq!(validate_bool(&catalog(), &mut errors, &source, "b", &rules), Some(false));
        assert_eq!(validate_bool(&catalog(), &mut errors, &source, "c", &rules), Some(true));
        assert_eq!(validate_bool(&catalog(), &mut errors, &source, "d", &rules), None);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn str_pattern_and_length() {
        let pattern = Regex::new(r"^[a-z]+$").unwrap();
        let source = from_json_str(r#"{"tag": "Abc", "name": "xy"}"#).unwrap();
        let mut errors = Vec::new();
        let rules = StrRules { pattern: Some(&pattern), ..Default::default() };
        assert_eq!(validate_str(&catalog(), &mut errors, &source, "tag", &rules), None);
        assert!(errors[0].contains("does not match pattern"));

        let rules = StrRules { min_length: Some(3), ..Default::default() };
        assert_eq!(validate_str(&catalog(), &mut errors, &source, "name", &rules), None);
        assert!(errors[1].contains("length shorter than"));
    }

    #[test]
    fn format_errors_round_trip() {
        let cat = catalog();
        let rendered = vec![
            cat.format_error(MSG_REQUIRED, &[], Some("person.name")),
            "free-form failure".to_string(),
        ];
        let formatted = format_errors(&cat, &rendered);
        let items = formatted.as_list().unwrap();
        assert_eq!(items.len(), 2);
        let first = items[0].as_map().unwrap();
        assert_eq!(first.get("code").and_then(Value::as_str), Some("APP121"));
        assert_eq!(
            first.get("attribute").and_then(Value::as_str),
            Some("person.name")
        );
        assert_eq!(
            first.get("description").and_then(Value::as_str),
            Some("Required attribute")
        );

        let flat = unformat_errors(&formatted);
        assert_eq!(flat[0], "APP121: Required attribute");
    }
}
