//! Backend session handling for Weatherify.
//!
//! The backend owns the session (a cookie) and the OAuth dance with the music
//! provider. This crate decides, once per launch, whether the user is logged
//! in, and drives the login redirect and logout.

pub mod callback;
pub mod error;
pub mod markers;
pub mod session;

pub use callback::{LoginRedirect, RedirectListener};
pub use error::AuthError;
pub use markers::{read_marker, strip_markers, LoginMarker, LOGIN_ERROR_PARAM, LOGIN_SUCCESS_PARAM};
pub use session::{LogoutOutcome, SessionCheck, SessionState, SessionStatusChecker};
