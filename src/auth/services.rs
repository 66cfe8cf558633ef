use tracing::{error, info, instrument, warn};

use super::dto::{LoginRequest, PublicProfile};
use super::jwt::TokenError;
use super::password::{compare_dummy, compare_password};
use crate::accounts::{Account, RepoError, Role};
use crate::state::AppState;

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    /// Same for unknown email, wrong password and inactive account.
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("account lookup failed: {0}")]
    Lookup(#[from] RepoError),

    #[error("token issuance failed: {0}")]
    Token(#[from] TokenError),
}

/// Check the credentials and issue a session token.
#[instrument(skip(st, req), fields(email = %req.email))]
pub async fn login(st: &AppState, req: LoginRequest) -> Result<String, LoginError> {
    if req.email.is_empty() || req.password.is_empty() {
        warn!("login with empty credentials");
        return Err(LoginError::InvalidCredentials);
    }

    let account = match st.accounts.find_by_email(&req.email).await {
        Ok(Some(a)) => a,
        Ok(None) => {
            compare_dummy(req.password.as_bytes());
            warn!("login unknown email");
            return Err(LoginError::InvalidCredentials);
        }
        Err(e) => {
            error!(error = %e, "find_by_email failed");
            return Err(e.into());
        }
    };

    if !compare_password(&account.password_hash, req.password.as_bytes()) {
        warn!(account_id = account.id, "login invalid password");
        return Err(LoginError::InvalidCredentials);
    }
    if !account.is_active {
        warn!(account_id = account.id, "login to inactive account");
        return Err(LoginError::InvalidCredentials);
    }

    let token = st.keys.sign(account.id).map_err(|e| {
        error!(error = %e, account_id = account.id, "jwt sign failed");
        LoginError::Token(e)
    })?;

    info!(account_id = account.id, "account logged in");
    Ok(token)
}

/// Load the profile matching the account's role, if one exists.
pub async fn load_profile(
    st: &AppState,
    account: &Account,
) -> Result<Option<PublicProfile>, RepoError> {
    let profile = match account.role {
        Role::JobSeeker => st
            .job_seekers
            .find_by_account(account.id)
            .await?
            .map(PublicProfile::JobSeeker),
        Role::Company => st
            .companies
            .find_by_account(account.id)
            .await?
            .map(PublicProfile::Company),
    };
    Ok(profile)
}
