use serde::{Deserialize, Serialize};

use crate::accounts::{Account, CompanyProfile, JobSeekerProfile};

/// Request body for login. Missing fields decode as empty and are then
/// rejected as invalid credentials.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// The caller's account together with its role profile.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub account: Account,
    pub profile: Option<PublicProfile>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PublicProfile {
    JobSeeker(JobSeekerProfile),
    Company(CompanyProfile),
}
