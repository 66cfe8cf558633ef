use time::OffsetDateTime;
use tracing::{error, info, instrument, warn};

use super::dto::{ProfileFields, RegisterRequest};
use super::validation::{self, Violation};
use crate::accounts::{NewAccount, RepoError, Role};
use crate::auth::password::hash_password;
use crate::state::AppState;

#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("user with email {0} already exists")]
    DuplicateEmail(String),

    #[error("invalid registration request ({} violations)", .0.len())]
    ValidationFailed(Vec<Violation>),

    #[error("credential hashing failed: {0}")]
    CredentialHashingFailed(String),

    #[error("account creation failed: {0}")]
    AccountCreationFailed(String),

    #[error("profile creation failed: {0}")]
    ProfileCreationFailed(String),

    #[error("account lookup failed: {0}")]
    Lookup(#[from] RepoError),
}

impl RegistrationError {
    /// Whether the caller can fix the request and retry.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            RegistrationError::DuplicateEmail(_) | RegistrationError::ValidationFailed(_)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisteredAccount {
    pub id: i64,
    pub role: Role,
}

/// Duplicate check, validation, hashing, then account and profile inserts in
/// one transaction. Either both rows are committed or neither is.
#[instrument(skip(st, req), fields(email = %req.email, role = %req.role))]
pub async fn register_account(
    st: &AppState,
    req: RegisterRequest,
) -> Result<RegisteredAccount, RegistrationError> {
    if !req.email.is_empty() && st.accounts.find_by_email(&req.email).await?.is_some() {
        warn!("email already registered");
        return Err(RegistrationError::DuplicateEmail(req.email));
    }

    let registration = validation::parse(req).map_err(|violations| {
        warn!(violations = violations.len(), "registration failed validation");
        RegistrationError::ValidationFailed(violations)
    })?;

    let hash = hash_password(&registration.password).map_err(|e| {
        error!(error = %e, "hash_password failed");
        RegistrationError::CredentialHashingFailed(e.to_string())
    })?;

    let role = registration.profile.role();
    let account = NewAccount::new(registration.email, hash, role, OffsetDateTime::now_utc());

    let mut tx = st.registrations.begin().await.map_err(|e| {
        error!(error = %e, "begin registration tx failed");
        RegistrationError::AccountCreationFailed(e.to_string())
    })?;

    let account_id = tx.create_account(&account).await.map_err(|e| {
        error!(error = %e, "create account failed");
        RegistrationError::AccountCreationFailed(e.to_string())
    })?;
    if account_id == 0 {
        error!("store returned no account id");
        return Err(RegistrationError::AccountCreationFailed(
            "store returned no account id".into(),
        ));
    }

    let created = match registration.profile {
        ProfileFields::JobSeeker(fields) => tx.create_job_seeker(&fields.into_profile(account_id)).await,
        ProfileFields::Company(fields) => tx.create_company(&fields.into_profile(account_id)).await,
    };
    created.map_err(|e| {
        error!(error = %e, account_id, "create profile failed");
        RegistrationError::ProfileCreationFailed(e.to_string())
    })?;

    tx.commit().await.map_err(|e| {
        error!(error = %e, account_id, "commit registration failed");
        RegistrationError::ProfileCreationFailed(e.to_string())
    })?;

    info!(account_id, %role, "account registered");
    Ok(RegisteredAccount {
        id: account_id,
        role,
    })
}
