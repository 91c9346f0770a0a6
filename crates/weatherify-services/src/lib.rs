pub mod backend;
pub mod error;
pub mod playlist;

pub use backend::{
    BackendClient, PlaylistLink, SessionStatus, GENERATE_PATH, LOGIN_PATH, LOGOUT_PATH,
    STATUS_PATH,
};
pub use error::BackendError;
pub use playlist::{PlaylistError, PlaylistRequester};
