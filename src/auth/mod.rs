//! Credential storage for the Leave Converter.
//!
//! Passwords are stored as salted PBKDF2 hashes (see [`hash_password`]).
//! [`CredentialStore`] owns the account rules: minimum password length,
//! self-modification and last-admin protection.

mod credentials;
mod password;

pub use credentials::CredentialStore;
pub use password::{hash_password, verify_password};
