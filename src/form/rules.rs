use std::collections::BTreeMap;
use std::num::NonZeroUsize;

use serde::Deserialize;

use super::controller::FieldKey;

/// Declarative constraints for one field. Every declared constraint is
/// evaluated; none of them short-circuits another.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldRules {
    pub required: bool,
    #[serde(alias = "minLength")]
    pub min_length: Option<NonZeroUsize>,
    pub email: bool,
}

impl FieldRules {
    pub const fn none() -> Self {
        Self {
            required: false,
            min_length: None,
            email: false,
        }
    }

    pub const fn required() -> Self {
        Self {
            required: true,
            ..Self::none()
        }
    }

    /// A zero length is not a constraint and clears any previous minimum.
    pub const fn min_length(self, length: usize) -> Self {
        Self {
            min_length: NonZeroUsize::new(length),
            ..self
        }
    }

    pub const fn email(self) -> Self {
        Self {
            email: true,
            ..self
        }
    }

    /// Fields without constraints never block the aggregate form validity.
    pub const fn is_unconstrained(&self) -> bool {
        !self.required && self.min_length.is_none() && !self.email
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RuleSet {
    rules: BTreeMap<FieldKey, FieldRules>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: FieldKey, rules: FieldRules) -> Self {
        self.insert(key, rules);
        self
    }

    pub fn insert(&mut self, key: FieldKey, rules: FieldRules) {
        self.rules.insert(key, rules);
    }

    pub fn get(&self, key: FieldKey) -> FieldRules {
        self.rules.get(&key).copied().unwrap_or_default()
    }

    pub fn constrained_keys(&self) -> impl Iterator<Item = FieldKey> + '_ {
        self.rules
            .iter()
            .filter(|(_, rules)| !rules.is_unconstrained())
            .map(|(key, _)| *key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, FieldRules)> + '_ {
        self.rules.iter().map(|(key, rules)| (*key, *rules))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl FromIterator<(FieldKey, FieldRules)> for RuleSet {
    fn from_iter<I: IntoIterator<Item = (FieldKey, FieldRules)>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}
