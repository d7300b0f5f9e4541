use std::num::NonZeroUsize;
use std::sync::LazyLock;

use regex::Regex;

use super::controller::FieldKey;
use super::rules::FieldRules;

/// W3C approximation used by HTML5 `type=email` inputs.
pub const EMAIL_PATTERN: &str =
    r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9-]+(?:\.[a-zA-Z0-9-]+)*$";

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("EMAIL_PATTERN must compile"));

pub trait FieldLens<T>: Copy + 'static {
    type Value: Clone + PartialEq + 'static;

    fn key(self) -> FieldKey;
    fn get<'a>(self, model: &'a T) -> &'a Self::Value;
    fn set(self, model: &mut T, value: Self::Value);
}

/// A struct of text fields that a [`super::FormState`] can drive by name.
pub trait FormModel: Clone + 'static {
    type Fields;

    fn fields() -> Self::Fields;
    fn field_keys() -> &'static [FieldKey];
    fn value(&self, key: FieldKey) -> Option<&str>;
    fn set_value(&mut self, key: FieldKey, value: String) -> bool;

    fn resolve_key(name: &str) -> Option<FieldKey> {
        Self::field_keys()
            .iter()
            .copied()
            .find(|key| key.as_str() == name)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, thiserror::Error)]
pub enum RuleViolation {
    #[error("Required field.")]
    Required,
    #[error("Must be at least {0} characters.")]
    MinLength(NonZeroUsize),
    #[error("Not an email address.")]
    Email,
}

impl RuleViolation {
    pub fn message(&self) -> String {
        self.to_string()
    }
}

pub fn is_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}

/// Evaluates every declared constraint in the fixed order required,
/// min length, email. `None` means the value was never set and cannot be
/// evaluated yet, which is distinct from an empty (valid) list.
pub fn validate(value: Option<&str>, rules: &FieldRules) -> Option<Vec<RuleViolation>> {
    let value = value?;
    let mut errors = Vec::new();

    if rules.required && value.is_empty() {
        errors.push(RuleViolation::Required);
    }

    if let Some(min) = rules.min_length {
        if value.chars().count() < min.get() {
            errors.push(RuleViolation::MinLength(min));
        }
    }

    if rules.email && !is_email(value) {
        errors.push(RuleViolation::Email);
    }

    Some(errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(value: &str, rules: FieldRules) -> Vec<String> {
        validate(Some(value), &rules)
            .expect("a present value is always evaluable")
            .iter()
            .map(RuleViolation::message)
            .collect()
    }

    #[test]
    fn missing_value_is_not_evaluable() {
        assert_eq!(validate(None, &FieldRules::required().min_length(3).email()), None);
        assert_eq!(validate(None, &FieldRules::none()), None);
    }

    #[test]
    fn undeclared_constraints_are_skipped() {
        assert_eq!(validate(Some(""), &FieldRules::none()), Some(Vec::new()));
    }

    #[test]
    fn required_fails_only_on_empty_value() {
        assert_eq!(messages("", FieldRules::required()), vec!["Required field."]);
        assert!(messages("x", FieldRules::required()).is_empty());
        assert!(messages(" ", FieldRules::required()).is_empty());
    }

    #[test]
    fn min_length_reports_configured_length() {
        let rules = FieldRules::none().min_length(6);
        assert_eq!(messages("short", rules), vec!["Must be at least 6 characters."]);
        assert!(messages("123456", rules).is_empty());
    }

    #[test]
    fn min_length_counts_characters_not_bytes() {
        let rules = FieldRules::none().min_length(3);
        assert!(messages("äöü", rules).is_empty());
        assert_eq!(messages("äö", rules).len(), 1);
    }

    #[test]
    fn email_pattern_accepts_and_rejects() {
        assert!(is_email("a@b.com"));
        assert!(is_email("hello@world.com"));
        assert!(is_email("first.last+tag@mail-host.example.org"));
        assert!(is_email("o'neil@host"));
        assert!(is_email("{weird}|~@host"));
        for invalid in ["", "a@", "@b.com", "a.b.com", "a@b..com", "a b@c.com", "a@b.com."] {
            assert!(!is_email(invalid), "{invalid:?} should not be an email");
        }
    }

    #[test]
    fn violations_keep_fixed_order() {
        let rules = FieldRules::required().min_length(4).email();
        assert_eq!(
            messages("", rules),
            vec![
                "Required field.",
                "Must be at least 4 characters.",
                "Not an email address."
            ]
        );
        assert_eq!(
            messages("", FieldRules::required().email()),
            vec!["Required field.", "Not an email address."]
        );
        assert_eq!(
            messages("ab", rules),
            vec!["Must be at least 4 characters.", "Not an email address."]
        );
    }
}
