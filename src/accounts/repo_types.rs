use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use time::OffsetDateTime;

use super::repo::RepoError;

/// Which kind of end user an account belongs to. Fixed at creation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Role {
    JobSeeker,
    Company,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::JobSeeker => "JobSeeker",
            Role::Company => "Company",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive: "jobseeker", "JOBSEEKER" and "JobSeeker" all parse.
impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("jobseeker") {
            Ok(Role::JobSeeker)
        } else if s.eq_ignore_ascii_case("company") {
            Ok(Role::Company)
        } else {
            Err(UnknownRole(s.to_string()))
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown role `{0}`")]
pub struct UnknownRole(pub String);

/// Account record. `id == 0` means not persisted yet.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // Argon2 PHC string, never exposed
    pub role: Role,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Values written by the registration workflow when creating an account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl NewAccount {
    /// Active account with both timestamps set to `now`.
    pub fn new(email: String, password_hash: String, role: Role, now: OffsetDateTime) -> Self {
        Self {
            email,
            password_hash,
            role,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSeekerProfile {
    #[serde(skip_serializing)]
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub profile_summary: String,
    pub skills: Vec<String>,
    pub experience: i32,
    pub education: String,
    pub account_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    #[serde(skip_serializing)]
    pub id: i64,
    pub name: String,
    pub headquarters: String,
    pub website: String,
    pub industry: String,
    pub company_size: String,
    pub account_id: i64,
}

// ---- rows as stored in postgres ----

#[derive(Debug, FromRow)]
pub(crate) struct AccountRow {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl TryFrom<AccountRow> for Account {
    type Error = RepoError;

    fn try_from(r: AccountRow) -> Result<Self, Self::Error> {
        let role = r
            .role
            .parse::<Role>()
            .map_err(|e| RepoError::Corrupt(format!("account {}: {}", r.id, e)))?;
        Ok(Self {
            id: r.id,
            email: r.email,
            password_hash: r.password_hash,
            role,
            is_active: r.is_active,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct JobSeekerRow {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub profile_summary: String,
    pub skills: Json<Vec<String>>,
    pub experience: i32,
    pub education: String,
    pub account_id: i64,
}

impl From<JobSeekerRow> for JobSeekerProfile {
    fn from(r: JobSeekerRow) -> Self {
        Self {
            id: r.id,
            first_name: r.first_name,
            last_name: r.last_name,
            profile_summary: r.profile_summary,
            skills: r.skills.0,
            experience: r.experience,
            education: r.education,
            account_id: r.account_id,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct CompanyRow {
    pub id: i64,
    pub name: String,
    pub headquarters: String,
    pub website: String,
    pub industry: String,
    pub company_size: String,
    pub account_id: i64,
}

impl From<CompanyRow> for CompanyProfile {
    fn from(r: CompanyRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            headquarters: r.headquarters,
            website: r.website,
            industry: r.industry,
            company_size: r.company_size,
            account_id: r.account_id,
        }
    }
}
