mod home;
pub use home::Home;

mod dashboard;
pub use dashboard::Dashboard;

mod login;
pub use login::Login;

mod register;
pub use register::Register;

mod forgot_password;
pub use forgot_password::ForgotPassword;

mod not_found;
pub use not_found::NotFound;

/// Supabase's default minimum password length.
pub(crate) const MIN_PASSWORD_LEN: usize = 6;

pub(crate) fn validate_email(email: &str) -> Result<(), String> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err("Please enter a valid email".to_string());
    }
    Ok(())
}

pub(crate) fn validate_new_password(password: &str, confirm: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        ));
    }
    if password != confirm {
        return Err("Passwords do not match".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email(" ada@example.com ").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("ada.example.com").is_err());
    }

    #[test]
    fn test_validate_new_password() {
        assert!(validate_new_password("secret", "secret").is_ok());
        assert_eq!(
            validate_new_password("short", "short"),
            Err("Password must be at least 6 characters".to_string())
        );
        assert_eq!(
            validate_new_password("secret1", "secret2"),
            Err("Passwords do not match".to_string())
        );
    }
}
