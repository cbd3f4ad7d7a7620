//! Error types for the Leave Converter.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every condition raised outside the breakdown core. The core itself
//! never fails: unmatched employees and missing hours degrade to a skip or
//! a zero instead of an error.

use thiserror::Error;

/// The main error type for the Leave Converter.
///
/// # Example
///
/// ```
/// use leave_converter::error::ConverterError;
///
/// let error = ConverterError::EmployeeNotFound {
///     id: "1042".to_string(),
/// };
/// assert_eq!(error.to_string(), "Employee not found: 1042");
/// ```
#[derive(Debug, Error)]
pub enum ConverterError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// One or more required columns could not be matched in the upload.
    #[error(
        "Missing required columns: {}\n\nAvailable columns in your file: {}\n\nPlease ensure your Excel file has these column headers.",
        missing.join(", "),
        available.join(", ")
    )]
    MissingColumns {
        /// Canonical names of the columns that were not found.
        missing: Vec<String>,
        /// Header labels that were present in the upload.
        available: Vec<String>,
    },

    /// A data cell could not be interpreted.
    #[error("Invalid value in row {row}, column '{column}': {message}")]
    InvalidCell {
        /// The 1-based spreadsheet row number.
        row: usize,
        /// The canonical column name.
        column: String,
        /// A description of what was wrong with the cell.
        message: String,
    },

    /// The workbook could not be opened or read.
    #[error("Failed to read workbook: {message}")]
    Workbook {
        /// A description of the read failure.
        message: String,
    },

    /// The breakdown workbook could not be written.
    #[error("Failed to export breakdown: {message}")]
    Export {
        /// A description of the write failure.
        message: String,
    },

    /// A repository could not be read from or written to.
    #[error("Storage error at '{path}': {message}")]
    Storage {
        /// The storage location involved.
        path: String,
        /// A description of the failure.
        message: String,
    },

    /// No employee exists with the given identifier.
    #[error("Employee not found: {id}")]
    EmployeeNotFound {
        /// The identifier that was looked up.
        id: String,
    },

    /// An employee with the given identifier already exists.
    #[error("Employee {id} already exists")]
    DuplicateEmployee {
        /// The conflicting identifier.
        id: String,
    },

    /// An employee record was invalid.
    #[error("Invalid employee field '{field}': {message}")]
    InvalidEmployee {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// No user exists with the given username.
    #[error("User not found: {username}")]
    UserNotFound {
        /// The username that was looked up.
        username: String,
    },

    /// A user with the given username already exists.
    #[error("Username already exists: {username}")]
    DuplicateUser {
        /// The conflicting username.
        username: String,
    },

    /// A password was shorter than the configured minimum.
    #[error("Password must be at least {min_length} characters")]
    WeakPassword {
        /// The minimum accepted length.
        min_length: usize,
    },

    /// A supplied password did not match the stored hash.
    #[error("Current password is incorrect")]
    InvalidCredentials,

    /// A new password was identical to the current one.
    #[error("New password must be different from current password")]
    PasswordUnchanged,

    /// A user account field was invalid.
    #[error("Invalid user field '{field}': {message}")]
    InvalidUser {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// The acting user may not manage accounts.
    #[error("User '{actor}' is not an active admin")]
    NotAuthorized {
        /// The acting user.
        actor: String,
    },

    /// A user attempted to deactivate or delete their own account.
    #[error("Cannot modify your own account: {username}")]
    SelfModification {
        /// The acting user.
        username: String,
    },

    /// The operation would leave no active administrator.
    #[error("Cannot remove the last active admin: {username}")]
    LastActiveAdmin {
        /// The administrator that was targeted.
        username: String,
    },

    /// A stored password hash was malformed.
    #[error("Malformed password hash: {message}")]
    PasswordHash {
        /// A description of the problem.
        message: String,
    },
}

/// A type alias for Results that return ConverterError.
pub type ConverterResult<T> = Result<T, ConverterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = ConverterError::ConfigNotFound {
            path: "/missing/converter.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/converter.yaml"
        );
    }

    #[test]
    fn test_missing_columns_lists_missing_and_available() {
        let error = ConverterError::MissingColumns {
            missing: vec!["Start Date".to_string(), "No Days".to_string()],
            available: vec!["Emp. Number".to_string(), "Initials".to_string()],
        };
        let message = error.to_string();
        assert!(message.starts_with("Missing required columns: Start Date, No Days"));
        assert!(message.contains("Available columns in your file: Emp. Number, Initials"));
    }

    #[test]
    fn test_invalid_cell_displays_row_and_column() {
        let error = ConverterError::InvalidCell {
            row: 12,
            column: "Start Date".to_string(),
            message: "unrecognised date 'soon'".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid value in row 12, column 'Start Date': unrecognised date 'soon'"
        );
    }

    #[test]
    fn test_weak_password_displays_minimum() {
        let error = ConverterError::WeakPassword { min_length: 6 };
        assert_eq!(
            error.to_string(),
            "Password must be at least 6 characters"
        );
    }

    #[test]
    fn test_last_active_admin_displays_username() {
        let error = ConverterError::LastActiveAdmin {
            username: "admin".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Cannot remove the last active admin: admin"
        );
    }

    #[test]
    fn test_not_authorized_displays_actor() {
        let error = ConverterError::NotAuthorized {
            actor: "clerk".to_string(),
        };
        assert_eq!(error.to_string(), "User 'clerk' is not an active admin");
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<ConverterError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_not_found() -> ConverterResult<()> {
            Err(ConverterError::EmployeeNotFound {
                id: "9".to_string(),
            })
        }

        fn propagates_error() -> ConverterResult<()> {
            returns_not_found()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
