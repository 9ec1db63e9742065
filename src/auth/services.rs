use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use regex::Regex;
use tracing::error;

use crate::{
    auth::{
        dto::{AuthResponse, CredentialsRequest},
        jwt::JwtKeys,
        repo_types::User,
    },
    error::{AppError, AppResult},
};

pub const MIN_PASSWORD_LEN: usize = 8;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    static ref MOBILE_RE: Regex = Regex::new(r"^\+?[0-9]{7,15}$").unwrap();
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub(crate) fn is_valid_mobile(mobile: &str) -> bool {
    MOBILE_RE.is_match(mobile)
}

/// Normalized login identifiers; at least one is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifiers {
    pub email: Option<String>,
    pub mobile: Option<String>,
}

/// Lowercases emails, strips separators from mobile numbers and validates both.
pub fn normalize_identifiers(req: &CredentialsRequest) -> AppResult<Identifiers> {
    let email = req
        .email
        .as_deref()
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty());
    let mobile = req
        .mobile
        .as_deref()
        .map(|m| {
            m.chars()
                .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
                .collect::<String>()
        })
        .filter(|m| !m.is_empty());

    if email.is_none() && mobile.is_none() {
        return Err(AppError::Validation("Email or mobile number is required".into()));
    }
    if let Some(e) = &email {
        if !is_valid_email(e) {
            return Err(AppError::Validation("Invalid email".into()));
        }
    }
    if let Some(m) = &mobile {
        if !is_valid_mobile(m) {
            return Err(AppError::Validation("Invalid mobile number".into()));
        }
    }
    Ok(Identifiers { email, mobile })
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// Signs a fresh access/refresh pair for `user`.
pub fn issue_tokens(keys: &JwtKeys, user: User) -> AppResult<AuthResponse> {
    let token = keys.sign_access(user.id)?;
    let refresh_token = keys.sign_refresh(user.id)?;
    Ok(AuthResponse {
        token,
        refresh_token,
        user: user.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds(email: Option<&str>, mobile: Option<&str>) -> CredentialsRequest {
        CredentialsRequest {
            email: email.map(Into::into),
            mobile: mobile.map(Into::into),
            password: "irrelevant".into(),
        }
    }

    #[test]
    fn hash_and_verify() {
        let hash = hash_password("Secur3P@ssw0rd!").expect("hashing should succeed");
        assert!(verify_password("Secur3P@ssw0rd!", &hash).expect("verify should succeed"));
        assert!(!verify_password("wrong-password", &hash).expect("verify should not error"));
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify_password("anything", "not-a-valid-hash").is_err());
    }

    #[test]
    fn identifiers_are_normalized() {
        let ids = normalize_identifiers(&creds(Some("  Jo@Example.COM "), Some("+1 (555) 010-2030")))
            .expect("valid identifiers");
        assert_eq!(ids.email.as_deref(), Some("jo@example.com"));
        assert_eq!(ids.mobile.as_deref(), Some("+15550102030"));
    }

    #[test]
    fn identifiers_are_validated() {
        assert!(matches!(
            normalize_identifiers(&creds(None, None)),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            normalize_identifiers(&creds(Some("   "), Some(""))),
            Err(AppError::Validation(_))
        ));
        assert!(normalize_identifiers(&creds(Some("no-at-sign"), None)).is_err());
        assert!(normalize_identifiers(&creds(None, Some("12ab"))).is_err());
        assert!(normalize_identifiers(&creds(None, Some("5550102030"))).is_ok());
    }
}
