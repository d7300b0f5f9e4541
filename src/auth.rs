//! Boundary to the authentication service.
//!
//! The form core never waits on authentication. It hands requests to an
//! [`Authenticator`] and learns about the outcome later through a
//! [`SessionState`] change.

use std::convert::Infallible;
use std::fmt::{Debug, Formatter};

#[derive(Clone, Eq, PartialEq)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub handle: String,
    pub avatar: String,
}

impl Debug for SignUpRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignUpRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("handle", &self.handle)
            .field("avatar", &self.avatar)
            .finish()
    }
}

#[derive(Clone, Eq, PartialEq)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

impl Debug for SignInRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignInRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AuthUser {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum SessionState {
    /// No auth state has been reported yet.
    #[default]
    Connecting,
    SignedOut,
    SignedIn(AuthUser),
}

impl SessionState {
    pub fn user(&self) -> Option<&AuthUser> {
        match self {
            SessionState::SignedIn(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_connecting(&self) -> bool {
        matches!(self, SessionState::Connecting)
    }
}

pub trait Authenticator {
    type Error: std::error::Error + Send + Sync + 'static;

    fn sign_up(&mut self, request: &SignUpRequest) -> Result<(), Self::Error>;
    fn sign_in(&mut self, request: &SignInRequest) -> Result<(), Self::Error>;
    fn sign_out(&mut self) -> Result<(), Self::Error>;
}

impl<A> Authenticator for &mut A
where
    A: Authenticator + ?Sized,
{
    type Error = A::Error;

    fn sign_up(&mut self, request: &SignUpRequest) -> Result<(), Self::Error> {
        (**self).sign_up(request)
    }

    fn sign_in(&mut self, request: &SignInRequest) -> Result<(), Self::Error> {
        (**self).sign_in(request)
    }

    fn sign_out(&mut self) -> Result<(), Self::Error> {
        (**self).sign_out()
    }
}

/// Collaborator that only reports what it was asked to do, as the sign-up
/// exercise app does with its success alert.
#[derive(Clone, Debug, Default)]
pub struct AlertAuthenticator {
    alerts: Vec<String>,
    sign_ups: Vec<SignUpRequest>,
    sign_ins: Vec<SignInRequest>,
    sign_outs: usize,
}

impl AlertAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alert(&self) -> Option<&str> {
        self.alerts.last().map(String::as_str)
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    pub fn sign_ups(&self) -> &[SignUpRequest] {
        &self.sign_ups
    }

    pub fn sign_ins(&self) -> &[SignInRequest] {
        &self.sign_ins
    }

    pub fn sign_outs(&self) -> usize {
        self.sign_outs
    }
}

impl Authenticator for AlertAuthenticator {
    type Error = Infallible;

    fn sign_up(&mut self, request: &SignUpRequest) -> Result<(), Self::Error> {
        self.alerts.push(format!(
            "Signing up: '{}' with handle '{}'",
            request.email, request.handle
        ));
        self.sign_ups.push(request.clone());
        Ok(())
    }

    fn sign_in(&mut self, request: &SignInRequest) -> Result<(), Self::Error> {
        self.alerts.push(format!("Signing in: '{}'", request.email));
        self.sign_ins.push(request.clone());
        Ok(())
    }

    fn sign_out(&mut self) -> Result<(), Self::Error> {
        self.alerts.push("Signing out".to_owned());
        self.sign_outs += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_debug_redacts_password() {
        let request = SignInRequest {
            email: "hello@world.com".into(),
            password: "hunter22".into(),
        };
        let rendered = format!("{request:?}");
        assert!(rendered.contains("hello@world.com"));
        assert!(!rendered.contains("hunter22"));
    }

    #[test]
    fn alert_authenticator_formats_exercise_alerts() {
        let mut auth = AlertAuthenticator::new();
        auth.sign_up(&SignUpRequest {
            email: "hello@world.com".into(),
            password: "123456".into(),
            handle: "anonymous".into(),
            avatar: "img/no-user-pic.png".into(),
        })
        .expect("sign up");
        assert_eq!(
            auth.alert(),
            Some("Signing up: 'hello@world.com' with handle 'anonymous'")
        );

        auth.sign_in(&SignInRequest {
            email: "hello@world.com".into(),
            password: "123456".into(),
        })
        .expect("sign in");
        assert_eq!(auth.alert(), Some("Signing in: 'hello@world.com'"));
        assert_eq!(auth.sign_ups().len(), 1);
        assert_eq!(auth.sign_ins().len(), 1);
    }

    #[test]
    fn session_exposes_signed_in_user() {
        let user = AuthUser {
            uid: "u1".into(),
            email: "a@b.com".into(),
            display_name: Some("anonymous".into()),
            photo_url: None,
        };
        assert!(SessionState::default().is_connecting());
        assert_eq!(SessionState::SignedOut.user(), None);
        assert_eq!(SessionState::SignedIn(user.clone()).user(), Some(&user));
    }
}
