mod binding;
mod controller;
mod gate;
mod rules;
mod validation;


pub use binding::{ActionView, FieldView, FormView};
pub use chirper_form_derive::FormModel;
pub use controller::{
    FieldKey, FieldMeta, FormError, FormOptions, FormResult, FormSnapshot, FormState, Validity,
};
pub use gate::{SubmitAction, UnknownAction, can_submit};
pub use rules::{FieldRules, RuleSet};
pub use validation::{EMAIL_PATTERN, FieldLens, FormModel, RuleViolation, is_email, validate};
