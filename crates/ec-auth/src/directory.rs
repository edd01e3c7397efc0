//! Demo user directory.

use crate::password::PasswordHasher;
use crate::user::{Role, User};
use crate::AuthError;

/// Email of the demo buyer account.
pub const DEMO_BUYER_EMAIL: &str = "buyer@example.com";
/// Email of the demo admin account.
pub const DEMO_ADMIN_EMAIL: &str = "admin@example.com";
/// Password shared by the demo accounts.
pub const DEMO_PASSWORD: &str = "demo";

struct Account {
    user: User,
    password_hash: String,
}

/// Fixed set of accounts that can log in.
pub struct UserDirectory {
    accounts: Vec<Account>,
    hasher: PasswordHasher,
}

impl UserDirectory {
    /// Directory with no accounts.
    pub fn new(hasher: PasswordHasher) -> Self {
        Self {
            accounts: Vec::new(),
            hasher,
        }
    }

    /// Directory holding the demo buyer and admin accounts.
    pub fn with_demo_accounts() -> Result<Self, AuthError> {
        let mut directory = Self::new(PasswordHasher::fast());
        directory.add(
            User::new("user-buyer", DEMO_BUYER_EMAIL, "Demo Buyer", Role::Buyer),
            DEMO_PASSWORD,
        )?;
        directory.add(
            User::new("user-admin", DEMO_ADMIN_EMAIL, "Demo Admin", Role::Admin),
            DEMO_PASSWORD,
        )?;
        Ok(directory)
    }

    /// Register an account, hashing its password.
    pub fn add(&mut self, user: User, password: &str) -> Result<(), AuthError> {
        let password_hash = self.hasher.hash(password)?;
        self.accounts.retain(|a| !a.user.email.eq_ignore_ascii_case(&user.email));
        self.accounts.push(Account {
            user,
            password_hash,
        });
        Ok(())
    }

    /// Check credentials and return the matching user.
    ///
    /// Unknown emails and wrong passwords both yield
    /// [`AuthError::InvalidCredentials`].
    pub fn authenticate(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let account = self
            .accounts
            .iter()
            .find(|a| a.user.email.eq_ignore_ascii_case(email.trim()))
            .ok_or(AuthError::InvalidCredentials)?;

        if self.hasher.verify(password, &account.password_hash)? {
            Ok(account.user.clone())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }

    /// Look up a user by id.
    pub fn find(&self, id: &str) -> Option<User> {
        self.accounts
            .iter()
            .find(|a| a.user.id.as_str() == id)
            .map(|a| a.user.clone())
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
