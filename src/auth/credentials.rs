//! User account management.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::AuthConfig;
use crate::error::{ConverterError, ConverterResult};
use crate::models::{UserAccount, UserProfile};
use crate::store::Repository;

use super::password::{hash_password, verify_password};

/// Stores user accounts and enforces the credential policy.
///
/// Only an active admin may deactivate or delete accounts. The actor may not
/// target their own account, and the last active admin cannot be removed.
/// These checks run inside a single repository transaction with the change.
#[derive(Clone)]
pub struct CredentialStore {
    repository: Arc<dyn Repository<UserAccount>>,
    policy: AuthConfig,
}

impl CredentialStore {
    /// Creates a credential store over the given repository.
    pub fn new(repository: Arc<dyn Repository<UserAccount>>, policy: AuthConfig) -> Self {
        Self { repository, policy }
    }

    /// Seeds the configured admin account if no users exist.
    ///
    /// Returns true if the account was created.
    pub fn ensure_bootstrap_admin(&self) -> ConverterResult<bool> {
        if !self.repository.list()?.is_empty() {
            return Ok(false);
        }

        let admin = self.policy.bootstrap_admin.clone();
        let mut seed = Some(self.new_account(&admin.username, &admin.password, &admin.full_name, true));
        self.repository.transact(&mut |accounts: &mut Vec<UserAccount>| {
            if accounts.is_empty() {
                accounts.extend(seed.take());
            }
            Ok(())
        })?;
        if seed.is_some() {
            return Ok(false);
        }

        warn!(
            username = %admin.username,
            "Created default admin account; change its password after first login"
        );
        Ok(true)
    }

    /// Returns the account if the username exists, is active and the password
    /// matches. Every other case returns `None`.
    pub fn authenticate(&self, username: &str, password: &str) -> ConverterResult<Option<UserAccount>> {
        let Some(account) = self.repository.get(username)? else {
            debug!(username = %username, "Login for unknown user");
            return Ok(None);
        };
        if !account.active {
            debug!(username = %username, "Login for inactive user");
            return Ok(None);
        }
        if !verify_password(password, &account.password_hash)? {
            debug!(username = %username, "Login with wrong password");
            return Ok(None);
        }
        Ok(Some(account))
    }

    /// Adds a new active user.
    ///
    /// # Errors
    ///
    /// - [`ConverterError::InvalidUser`] if the username or full name is blank
    /// - [`ConverterError::WeakPassword`] if the password is too short
    /// - [`ConverterError::DuplicateUser`] if the username is taken
    pub fn add_user(
        &self,
        username: &str,
        password: &str,
        full_name: &str,
        is_admin: bool,
    ) -> ConverterResult<UserProfile> {
        let username = username.trim();
        let full_name = full_name.trim();
        require_non_blank("username", username)?;
        require_non_blank("full_name", full_name)?;
        if self.repository.get(username)?.is_some() {
            return Err(ConverterError::DuplicateUser {
                username: username.to_string(),
            });
        }
        self.check_strength(password)?;

        let account = self.new_account(username, password, full_name, is_admin);
        if !self.repository.insert(account.clone())? {
            return Err(ConverterError::DuplicateUser {
                username: username.to_string(),
            });
        }
        info!(username = %username, is_admin, "User added");
        Ok(UserProfile::from(&account))
    }

    /// Lists every user without password hashes.
    pub fn list_users(&self) -> ConverterResult<Vec<UserProfile>> {
        Ok(self.repository.list()?.iter().map(UserProfile::from).collect())
    }

    /// Sets a new password without checking the old one.
    pub fn reset_password(&self, username: &str, new_password: &str) -> ConverterResult<()> {
        self.require(username)?;
        self.check_strength(new_password)?;

        let password_hash = hash_password(new_password, self.policy.pbkdf2_iterations);
        self.replace_hash(username, password_hash)?;
        info!(username = %username, "Password reset");
        Ok(())
    }

    /// Changes a user's own password.
    ///
    /// # Errors
    ///
    /// - [`ConverterError::InvalidCredentials`] if `current` does not match
    /// - [`ConverterError::PasswordUnchanged`] if `new_password` equals `current`
    /// - [`ConverterError::WeakPassword`] if `new_password` is too short
    pub fn change_password(&self, username: &str, current: &str, new_password: &str) -> ConverterResult<()> {
        let account = self.require(username)?;
        if !verify_password(current, &account.password_hash)? {
            return Err(ConverterError::InvalidCredentials);
        }
        if current == new_password {
            return Err(ConverterError::PasswordUnchanged);
        }
        self.check_strength(new_password)?;

        let password_hash = hash_password(new_password, self.policy.pbkdf2_iterations);
        self.replace_hash(username, password_hash)?;
        info!(username = %username, "Password changed");
        Ok(())
    }

    /// Activates or deactivates `username` on behalf of `actor`.
    ///
    /// # Errors
    ///
    /// - [`ConverterError::NotAuthorized`] unless `actor` is an active admin
    /// - [`ConverterError::SelfModification`] if `actor` is `username`
    /// - [`ConverterError::UserNotFound`] if `username` does not exist
    /// - [`ConverterError::LastActiveAdmin`] if deactivating would leave no
    ///   active admin
    pub fn set_active(&self, actor: &str, username: &str, active: bool) -> ConverterResult<()> {
        self.repository.transact(&mut |accounts: &mut Vec<UserAccount>| {
            let index = find_modifiable(accounts, actor, username)?;
            if !active {
                ensure_not_last_admin(accounts, index)?;
            }
            accounts[index].active = active;
            Ok(())
        })?;

        info!(actor = %actor, username = %username, active, "User status changed");
        Ok(())
    }

    /// Deletes `username` on behalf of `actor`.
    ///
    /// Fails under the same rules as [`CredentialStore::set_active`].
    pub fn delete_user(&self, actor: &str, username: &str) -> ConverterResult<()> {
        self.repository.transact(&mut |accounts: &mut Vec<UserAccount>| {
            let index = find_modifiable(accounts, actor, username)?;
            ensure_not_last_admin(accounts, index)?;
            accounts.remove(index);
            Ok(())
        })?;

        info!(actor = %actor, username = %username, "User deleted");
        Ok(())
    }

    fn new_account(&self, username: &str, password: &str, full_name: &str, is_admin: bool) -> UserAccount {
        UserAccount {
            username: username.to_string(),
            password_hash: hash_password(password, self.policy.pbkdf2_iterations),
            full_name: full_name.to_string(),
            is_admin,
            active: true,
            created_at: Utc::now(),
        }
    }

    fn replace_hash(&self, username: &str, password_hash: String) -> ConverterResult<()> {
        self.repository.transact(&mut |accounts: &mut Vec<UserAccount>| {
            let account = accounts
                .iter_mut()
                .find(|account| account.username == username)
                .ok_or_else(|| user_not_found(username))?;
            account.password_hash = password_hash.clone();
            Ok(())
        })
    }

    fn require(&self, username: &str) -> ConverterResult<UserAccount> {
        self.repository
            .get(username)?
            .ok_or_else(|| user_not_found(username))
    }

    fn check_strength(&self, password: &str) -> ConverterResult<()> {
        if password.chars().count() < self.policy.min_password_length {
            return Err(ConverterError::WeakPassword {
                min_length: self.policy.min_password_length,
            });
        }
        Ok(())
    }
}

fn user_not_found(username: &str) -> ConverterError {
    ConverterError::UserNotFound {
        username: username.to_string(),
    }
}

fn require_non_blank(field: &str, value: &str) -> ConverterResult<()> {
    if value.is_empty() {
        return Err(ConverterError::InvalidUser {
            field: field.to_string(),
            message: "must not be blank".to_string(),
        });
    }
    Ok(())
}

/// Position of `username` in `accounts`, once `actor` is confirmed as an
/// active admin acting on someone else.
fn find_modifiable(accounts: &[UserAccount], actor: &str, username: &str) -> ConverterResult<usize> {
    let authorized = accounts
        .iter()
        .any(|account| account.username == actor && account.is_active_admin());
    if !authorized {
        return Err(ConverterError::NotAuthorized {
            actor: actor.to_string(),
        });
    }
    if actor == username {
        return Err(ConverterError::SelfModification {
            username: username.to_string(),
        });
    }
    accounts
        .iter()
        .position(|account| account.username == username)
        .ok_or_else(|| user_not_found(username))
}

fn ensure_not_last_admin(accounts: &[UserAccount], index: usize) -> ConverterResult<()> {
    let target = &accounts[index];
    if !target.is_active_admin() {
        return Ok(());
    }
    let active_admins = accounts
        .iter()
        .filter(|account| account.is_active_admin())
        .count();
    if active_admins <= 1 {
        return Err(ConverterError::LastActiveAdmin {
            username: target.username.clone(),
        });
    }
    Ok(())
}
