use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use super::rules::RuleSet;
use super::validation::{FieldLens, FormModel, RuleViolation, validate};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FieldKey(&'static str);

impl FieldKey {
    pub const fn new(value: &'static str) -> Self {
        Self(value)
    }

    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl Display for FieldKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Validity {
    #[default]
    NotEvaluated,
    Valid,
    Invalid,
}

impl Validity {
    pub const fn is_valid(self) -> bool {
        matches!(self, Validity::Valid)
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FormOptions {
    pub validate_first_error_only: bool,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FieldMeta {
    pub touched: bool,
    pub errors: Vec<RuleViolation>,
}

impl FieldMeta {
    /// Errors are only ever recorded for touched fields, so a pristine field
    /// is never reported as invalid.
    pub fn validity(&self) -> Validity {
        match (self.touched, self.errors.is_empty()) {
            (false, _) => Validity::NotEvaluated,
            (true, true) => Validity::Valid,
            (true, false) => Validity::Invalid,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FormSnapshot<T> {
    pub model: T,
    pub is_valid: bool,
    pub field_meta: BTreeMap<FieldKey, FieldMeta>,
}

#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum FormError {
    #[error("unknown form field `{0}`")]
    UnknownField(String),
    #[error("{operation} request was rejected: {message}")]
    Collaborator {
        operation: &'static str,
        message: String,
    },
}

pub type FormResult<T> = Result<T, FormError>;

/// Field values, touched markers and derived validity for one mounted form.
#[derive(Clone, Debug)]
pub struct FormState<T> {
    options: FormOptions,
    rules: RuleSet,
    initial_model: T,
    model: T,
    field_meta: BTreeMap<FieldKey, FieldMeta>,
    form_valid: bool,
}

impl<T> FormState<T>
where
    T: FormModel,
{
    /// Rules for keys the model does not have are dropped, since such a
    /// field could never be touched and would keep the form invalid.
    pub fn new(initial: T, rules: RuleSet, options: FormOptions) -> Self {
        let rules = rules
            .iter()
            .filter(|(key, _)| {
                let known = T::field_keys().contains(key);
                if !known {
                    tracing::warn!(field = %key, "dropping rules for unknown form field");
                }
                known
            })
            .collect();
        Self::build(initial, rules, options)
    }

    /// Like [`FormState::new`] but rejects rules for keys the model lacks.
    pub fn try_new(initial: T, rules: RuleSet, options: FormOptions) -> FormResult<Self> {
        if let Some((key, _)) = rules
            .iter()
            .find(|(key, _)| !T::field_keys().contains(key))
        {
            return Err(FormError::UnknownField(key.as_str().to_owned()));
        }
        Ok(Self::build(initial, rules, options))
    }

    fn build(initial: T, rules: RuleSet, options: FormOptions) -> Self {
        let field_meta = T::field_keys()
            .iter()
            .map(|key| (*key, FieldMeta::default()))
            .collect();
        let mut state = Self {
            options,
            rules,
            initial_model: initial.clone(),
            model: initial,
            field_meta,
            form_valid: false,
        };
        state.form_valid = state.compute_form_valid();
        state
    }

    pub fn options(&self) -> FormOptions {
        self.options
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn model(&self) -> &T {
        &self.model
    }

    pub fn update(&mut self, key: FieldKey, value: impl Into<String>) -> FormResult<Validity> {
        if !self.model.set_value(key, value.into()) {
            return Err(FormError::UnknownField(key.as_str().to_owned()));
        }
        Ok(self.revalidate(key))
    }

    pub fn update_named(&mut self, name: &str, value: impl Into<String>) -> FormResult<Validity> {
        let key = T::resolve_key(name).ok_or_else(|| FormError::UnknownField(name.to_owned()))?;
        self.update(key, value)
    }

    pub fn set<L>(&mut self, lens: L, value: L::Value) -> Validity
    where
        L: FieldLens<T>,
    {
        lens.set(&mut self.model, value);
        self.revalidate(lens.key())
    }

    pub fn value(&self, key: FieldKey) -> Option<&str> {
        self.model.value(key)
    }

    pub fn errors(&self, key: FieldKey) -> &[RuleViolation] {
        self.field_meta
            .get(&key)
            .map(|meta| meta.errors.as_slice())
            .unwrap_or_default()
    }

    pub fn validity(&self, key: FieldKey) -> Validity {
        self.field_meta
            .get(&key)
            .map(FieldMeta::validity)
            .unwrap_or_default()
    }

    pub fn is_touched(&self, key: FieldKey) -> bool {
        self.field_meta.get(&key).is_some_and(|meta| meta.touched)
    }

    pub fn is_valid(&self) -> bool {
        self.form_valid
    }

    pub fn field_meta<L>(&self, lens: L) -> Option<&FieldMeta>
    where
        L: FieldLens<T>,
    {
        self.field_meta.get(&lens.key())
    }

    pub fn field_error_for_display(&self, key: FieldKey) -> Option<String> {
        let meta = self.field_meta.get(&key)?;
        if !meta.touched {
            return None;
        }
        meta.errors.first().map(RuleViolation::message)
    }

    pub fn snapshot(&self) -> FormSnapshot<T> {
        FormSnapshot {
            model: self.model.clone(),
            is_valid: self.form_valid,
            field_meta: self.field_meta.clone(),
        }
    }

    pub fn reset_to_initial(&mut self) {
        self.model = self.initial_model.clone();
        for meta in self.field_meta.values_mut() {
            *meta = FieldMeta::default();
        }
        self.refresh_form_valid();
    }

    pub fn reset_field<L>(&mut self, lens: L)
    where
        L: FieldLens<T>,
    {
        let initial_value = lens.get(&self.initial_model).clone();
        lens.set(&mut self.model, initial_value);
        if let Some(meta) = self.field_meta.get_mut(&lens.key()) {
            *meta = FieldMeta::default();
        }
        self.refresh_form_valid();
    }

    fn revalidate(&mut self, key: FieldKey) -> Validity {
        let rules = self.rules.get(key);
        let mut errors = validate(self.model.value(key), &rules).unwrap_or_default();
        if self.options.validate_first_error_only {
            errors.truncate(1);
        }

        let meta = self.field_meta.entry(key).or_default();
        meta.touched = true;
        meta.errors = errors;
        let validity = meta.validity();
        tracing::trace!(
            field = %key,
            errors = meta.errors.len(),
            ?validity,
            "field revalidated"
        );

        self.refresh_form_valid();
        validity
    }

    fn refresh_form_valid(&mut self) {
        let next = self.compute_form_valid();
        if next != self.form_valid {
            tracing::debug!(form_valid = next, "aggregate form validity changed");
        }
        self.form_valid = next;
    }

    /// Only constrained fields participate; an untouched constrained field
    /// keeps the form invalid.
    fn compute_form_valid(&self) -> bool {
        self.rules
            .constrained_keys()
            .all(|key| self.validity(key).is_valid())
    }
}
