pub mod auth;
pub mod config;
pub mod form;
pub mod signup;

pub use auth::{AlertAuthenticator, Authenticator, SessionState};
pub use config::{ConfigError, FormConfig};
pub use signup::{DispatchOutcome, FormEvent, SignUpForm, SignUpModel};
