use crate::auth::{Authenticator, SessionState, SignInRequest, SignUpRequest};
use crate::config::{ConfigError, FormConfig};
use crate::form::{
    FieldKey, FieldLens, FieldRules, FormError, FormModel, FormOptions, FormResult, FormState,
    FormView, RuleSet, SubmitAction, Validity,
};

#[derive(Clone, Debug, Default, Eq, PartialEq, FormModel)]
pub struct SignUpModel {
    pub email: String,
    pub password: String,
    pub handle: String,
    pub avatar: String,
}

pub fn default_rules() -> RuleSet {
    let fields = SignUpModel::fields();
    RuleSet::new()
        .with(fields.email().key(), FieldRules::required().email())
        .with(fields.password().key(), FieldRules::required().min_length(6))
        .with(fields.handle().key(), FieldRules::required())
        .with(fields.avatar().key(), FieldRules::none())
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FormEvent {
    FieldChanged { field: String, value: String },
    Submit(SubmitAction),
    SessionChanged(SessionState),
    SignOut,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DispatchOutcome {
    Updated { field: FieldKey, validity: Validity },
    Submitted(SubmitAction),
    /// The action was not permitted; nothing changed.
    Gated(SubmitAction),
    SessionChanged,
    SignedOut,
    Ignored,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SignUpView {
    pub form: FormView,
    pub show_spinner: bool,
    pub show_sign_out: bool,
}

pub struct SignUpForm<A> {
    state: FormState<SignUpModel>,
    authenticator: A,
    session: SessionState,
    default_avatar: String,
}

impl<A> SignUpForm<A>
where
    A: Authenticator,
{
    pub fn new(authenticator: A) -> Self {
        Self {
            state: FormState::new(
                SignUpModel::default(),
                default_rules(),
                FormOptions::default(),
            ),
            authenticator,
            session: SessionState::default(),
            default_avatar: crate::config::DEFAULT_AVATAR.to_owned(),
        }
    }

    pub fn with_config(authenticator: A, config: &FormConfig) -> Result<Self, ConfigError> {
        let rules = config.rule_set::<SignUpModel>()?;
        Ok(Self {
            state: FormState::new(SignUpModel::default(), rules, config.options()),
            authenticator,
            session: SessionState::default(),
            default_avatar: config.default_avatar.clone(),
        })
    }

    pub fn state(&self) -> &FormState<SignUpModel> {
        &self.state
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn authenticator(&self) -> &A {
        &self.authenticator
    }

    pub fn into_authenticator(self) -> A {
        self.authenticator
    }

    pub fn can_submit(&self, action: SubmitAction) -> bool {
        self.state.can_submit(action)
    }

    pub fn dispatch(&mut self, event: FormEvent) -> FormResult<DispatchOutcome> {
        match event {
            FormEvent::FieldChanged { field, value } => {
                let key = SignUpModel::resolve_key(&field)
                    .ok_or_else(|| FormError::UnknownField(field))?;
                let validity = self.state.update(key, value)?;
                Ok(DispatchOutcome::Updated {
                    field: key,
                    validity,
                })
            }
            FormEvent::Submit(action) => Ok(if self.on_submit(action)? {
                DispatchOutcome::Submitted(action)
            } else {
                DispatchOutcome::Gated(action)
            }),
            FormEvent::SessionChanged(session) => {
                self.on_session_change(session);
                Ok(DispatchOutcome::SessionChanged)
            }
            FormEvent::SignOut => Ok(if self.on_sign_out()? {
                DispatchOutcome::SignedOut
            } else {
                DispatchOutcome::Ignored
            }),
        }
    }

    pub fn on_field_change(
        &mut self,
        field: &str,
        value: impl Into<String>,
    ) -> FormResult<Validity> {
        self.state.update_named(field, value)
    }

    /// Returns whether the collaborator was invoked. A gated action is a
    /// no-op rather than an error.
    pub fn on_submit(&mut self, action: SubmitAction) -> FormResult<bool> {
        if !self.can_submit(action) {
            tracing::debug!(%action, "submit ignored while form is invalid");
            return Ok(false);
        }

        let model = self.state.model();
        let result = match action {
            SubmitAction::SignUp => {
                let avatar = if model.avatar.is_empty() {
                    self.default_avatar.clone()
                } else {
                    model.avatar.clone()
                };
                let request = SignUpRequest {
                    email: model.email.clone(),
                    password: model.password.clone(),
                    handle: model.handle.clone(),
                    avatar,
                };
                self.authenticator.sign_up(&request)
            }
            SubmitAction::SignIn => {
                let request = SignInRequest {
                    email: model.email.clone(),
                    password: model.password.clone(),
                };
                self.authenticator.sign_in(&request)
            }
        };

        result.map_err(|error| FormError::Collaborator {
            operation: action.as_str(),
            message: error.to_string(),
        })?;
        tracing::info!(%action, "submitted form");
        Ok(true)
    }

    pub fn on_session_change(&mut self, session: SessionState) {
        tracing::info!(
            signed_in = session.user().is_some(),
            connecting = session.is_connecting(),
            "auth state changed"
        );
        self.session = session;
    }

    /// Sign-out is only offered while a user is signed in.
    pub fn on_sign_out(&mut self) -> FormResult<bool> {
        if self.session.user().is_none() {
            return Ok(false);
        }
        self.authenticator
            .sign_out()
            .map_err(|error| FormError::Collaborator {
                operation: "sign-out",
                message: error.to_string(),
            })?;
        Ok(true)
    }

    pub fn view(&self) -> SignUpView {
        SignUpView {
            form: self.state.view(),
            show_spinner: self.session.is_connecting(),
            show_sign_out: self.session.user().is_some(),
        }
    }
}
