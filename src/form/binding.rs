use super::controller::{FieldKey, FormState, Validity};
use super::gate::SubmitAction;
use super::validation::{FormModel, RuleViolation};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldView {
    pub key: FieldKey,
    pub value: String,
    pub validity: Validity,
    pub feedback: Vec<String>,
}

impl FieldView {
    pub fn css_class(&self) -> Option<&'static str> {
        match self.validity {
            Validity::NotEvaluated => None,
            Validity::Valid => Some("is-valid"),
            Validity::Invalid => Some("is-invalid"),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ActionView {
    pub action: SubmitAction,
    pub label: &'static str,
    pub disabled: bool,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FormView {
    pub form_valid: bool,
    pub fields: Vec<FieldView>,
    pub actions: Vec<ActionView>,
}

impl FormView {
    pub fn field(&self, key: FieldKey) -> Option<&FieldView> {
        self.fields.iter().find(|field| field.key == key)
    }

    pub fn action(&self, action: SubmitAction) -> Option<&ActionView> {
        self.actions.iter().find(|view| view.action == action)
    }
}

impl<T> FormState<T>
where
    T: FormModel,
{
    pub fn field_view(&self, key: FieldKey) -> Option<FieldView> {
        let value = self.value(key)?;
        let validity = self.validity(key);
        // Pristine fields show no feedback whatever their raw value is.
        let feedback = if self.is_touched(key) {
            self.errors(key).iter().map(RuleViolation::message).collect()
        } else {
            Vec::new()
        };
        Some(FieldView {
            key,
            value: value.to_owned(),
            validity,
            feedback,
        })
    }

    pub fn view(&self) -> FormView {
        let fields = T::field_keys()
            .iter()
            .filter_map(|key| self.field_view(*key))
            .collect();
        let actions = SubmitAction::ALL
            .into_iter()
            .map(|action| ActionView {
                action,
                label: action.label(),
                disabled: !self.can_submit(action),
            })
            .collect();
        FormView {
            form_valid: self.is_valid(),
            fields,
            actions,
        }
    }
}
