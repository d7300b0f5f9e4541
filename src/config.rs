use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};

use crate::form::{FieldRules, FormModel, FormOptions, RuleSet};

pub const DEFAULT_AVATAR: &str = "img/no-user-pic.png";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read form config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse form config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("form config declares rules for unknown field `{0}`")]
    UnknownField(String),
}

/// Form settings as read from TOML:
///
/// ```toml
/// default_avatar = "img/no-user-pic.png"
/// validate_first_error_only = false
///
/// [fields.password]
/// required = true
/// min_length = 6
/// ```
///
/// Each `[fields.<name>]` table replaces the sign-up defaults for that one
/// field; fields without a table keep their default rules. An empty table
/// removes every constraint from its field.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormConfig {
    pub default_avatar: String,
    pub validate_first_error_only: bool,
    #[serde(deserialize_with = "merge_over_default_fields")]
    pub fields: BTreeMap<String, FieldRules>,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            default_avatar: DEFAULT_AVATAR.to_owned(),
            validate_first_error_only: false,
            fields: default_fields(),
        }
    }
}

fn default_fields() -> BTreeMap<String, FieldRules> {
    crate::signup::default_rules()
        .iter()
        .map(|(key, rules)| (key.as_str().to_owned(), rules))
        .collect()
}

fn merge_over_default_fields<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<String, FieldRules>, D::Error>
where
    D: Deserializer<'de>,
{
    let overrides = BTreeMap::<String, FieldRules>::deserialize(deserializer)?;
    let mut fields = default_fields();
    fields.extend(overrides);
    Ok(fields)
}

impl FormConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::info!(
            path = %path.display(),
            fields = config.fields.len(),
            "loaded form config"
        );
        Ok(config)
    }

    pub fn options(&self) -> FormOptions {
        FormOptions {
            validate_first_error_only: self.validate_first_error_only,
        }
    }

    /// Resolves field names against the model so that a misspelled field
    /// fails loudly instead of silently losing its rules.
    pub fn rule_set<T>(&self) -> Result<RuleSet, ConfigError>
    where
        T: FormModel,
    {
        self.fields
            .iter()
            .map(|(name, rules)| {
                T::resolve_key(name)
                    .map(|key| (key, *rules))
                    .ok_or_else(|| ConfigError::UnknownField(name.clone()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use super::*;
    use crate::form::FieldKey;
    use crate::signup::SignUpModel;

    #[test]
    fn default_config_matches_sign_up_rules() {
        let rules = FormConfig::default()
            .rule_set::<SignUpModel>()
            .expect("default rules resolve");
        assert_eq!(
            rules.get(FieldKey::new("email")),
            FieldRules::required().email()
        );
        assert_eq!(
            rules.get(FieldKey::new("password")),
            FieldRules::required().min_length(6)
        );
        assert_eq!(rules.get(FieldKey::new("handle")), FieldRules::required());
        assert!(rules.get(FieldKey::new("avatar")).is_unconstrained());
        assert_eq!(rules, crate::signup::default_rules());
    }

    #[test]
    fn parses_partial_toml_with_defaults() {
        let config = FormConfig::from_toml_str(
            r#"
            validate_first_error_only = true

            [fields.password]
            required = true
            minLength = 8

            [fields.email]
            email = true
            "#,
        )
        .expect("config parses");

        assert!(config.options().validate_first_error_only);
        assert_eq!(config.default_avatar, DEFAULT_AVATAR);
        assert_eq!(config.fields.len(), 4);
        assert_eq!(
            config.fields["password"].min_length,
            NonZeroUsize::new(8)
        );
        assert!(!config.fields["email"].required);
    }

    #[test]
    fn field_tables_override_only_their_own_field() {
        let config =
            FormConfig::from_toml_str("[fields.password]\nrequired = true\nmin_length = 10\n")
                .expect("config parses");
        let rules = config.rule_set::<SignUpModel>().expect("rules resolve");

        assert_eq!(
            rules.get(FieldKey::new("password")),
            FieldRules::required().min_length(10)
        );
        assert_eq!(
            rules.get(FieldKey::new("email")),
            FieldRules::required().email()
        );
        assert_eq!(rules.get(FieldKey::new("handle")), FieldRules::required());

        let relaxed = FormConfig::from_toml_str("[fields.handle]\n").expect("config parses");
        assert!(relaxed.fields["handle"].is_unconstrained());
        assert_eq!(relaxed.fields["email"], FieldRules::required().email());
    }

    #[test]
    fn rejects_zero_min_length_and_unknown_keys() {
        assert!(matches!(
            FormConfig::from_toml_str("[fields.password]\nmin_length = 0\n"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            FormConfig::from_toml_str("[fields.password]\npattern = \"x\"\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn unknown_field_names_are_reported() {
        let config = FormConfig::from_toml_str("[fields.nickname]\nrequired = true\n")
            .expect("config parses");
        let error = config
            .rule_set::<SignUpModel>()
            .expect_err("nickname is not a sign-up field");
        assert!(matches!(error, ConfigError::UnknownField(name) if name == "nickname"));
    }

    #[test]
    fn missing_file_reports_path() {
        let error = FormConfig::load("/definitely/not/here.toml").expect_err("missing file");
        assert!(error.to_string().contains("/definitely/not/here.toml"));
    }
}
