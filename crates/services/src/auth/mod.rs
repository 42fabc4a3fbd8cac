mod credentials;
mod session_store;

pub use crate::error::AuthError;
pub use credentials::{DEMO_EMAIL, DEMO_PASSWORD};
pub use session_store::{SessionStore, SignupRequest};
