use std::fmt::{Display, Formatter};
use std::str::FromStr;

use super::controller::FormState;
use super::validation::FormModel;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum SubmitAction {
    SignUp,
    SignIn,
}

impl SubmitAction {
    pub const ALL: [SubmitAction; 2] = [SubmitAction::SignUp, SubmitAction::SignIn];

    pub const fn as_str(self) -> &'static str {
        match self {
            SubmitAction::SignUp => "sign-up",
            SubmitAction::SignIn => "sign-in",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            SubmitAction::SignUp => "Sign-up",
            SubmitAction::SignIn => "Sign-in",
        }
    }
}

impl Display for SubmitAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("unknown submit action `{0}`")]
pub struct UnknownAction(pub String);

impl FromStr for SubmitAction {
    type Err = UnknownAction;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        SubmitAction::ALL
            .into_iter()
            .find(|action| action.as_str() == value)
            .ok_or_else(|| UnknownAction(value.to_owned()))
    }
}

/// Every action is gated on the same aggregate validity, so sign-in also
/// waits for fields only sign-up consumes.
pub fn can_submit<T>(_action: SubmitAction, state: &FormState<T>) -> bool
where
    T: FormModel,
{
    state.is_valid()
}

impl<T> FormState<T>
where
    T: FormModel,
{
    pub fn can_submit(&self, action: SubmitAction) -> bool {
        can_submit(action, self)
    }
}
