//! Authentication for the EC site.
//!
//! Provides the demo user directory, role checks and cookie sessions.

mod directory;
mod error;
mod password;
mod session;
mod user;

pub use directory::{UserDirectory, DEMO_ADMIN_EMAIL, DEMO_BUYER_EMAIL, DEMO_PASSWORD};
pub use error::AuthError;
pub use password::PasswordHasher;
pub use session::{Session, SessionId, SessionStore, DEFAULT_SESSION_TTL_SECS};
pub use user::{Role, User};
