use serde::{Deserialize, Serialize};

use crate::accounts::{CompanyProfile, JobSeekerProfile, Role};

/// Registration body as it arrives on the wire: account credentials plus the
/// fields of both profile kinds. Only the group matching `role` may be set.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub role: String,

    // job seeker
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_summary: Option<String>,
    pub skills: Option<Vec<String>>,
    pub experience: Option<i64>,
    pub education: Option<String>,

    // company
    pub name: Option<String>,
    pub headquarters: Option<String>,
    pub website: Option<String>,
    pub industry: Option<String>,
    pub company_size: Option<String>,
}

/// A registration that passed validation. The profile group is chosen by
/// role, so the other role's fields cannot be carried along.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub profile: ProfileFields,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileFields {
    JobSeeker(JobSeekerFields),
    Company(CompanyFields),
}

impl ProfileFields {
    pub fn role(&self) -> Role {
        match self {
            ProfileFields::JobSeeker(_) => Role::JobSeeker,
            ProfileFields::Company(_) => Role::Company,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSeekerFields {
    pub first_name: String,
    pub last_name: String,
    pub profile_summary: String,
    pub skills: Vec<String>,
    pub experience: i32,
    pub education: String,
}

impl JobSeekerFields {
    pub fn into_profile(self, account_id: i64) -> JobSeekerProfile {
        JobSeekerProfile {
            id: 0,
            first_name: self.first_name,
            last_name: self.last_name,
            profile_summary: self.profile_summary,
            skills: self.skills,
            experience: self.experience,
            education: self.education,
            account_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyFields {
    pub name: String,
    pub headquarters: String,
    pub website: String,
    pub industry: String,
    pub company_size: String,
}

impl CompanyFields {
    pub fn into_profile(self, account_id: i64) -> CompanyProfile {
        CompanyProfile {
            id: 0,
            name: self.name,
            headquarters: self.headquarters,
            website: self.website,
            industry: self.industry,
            company_size: self.company_size,
            account_id,
        }
    }
}

/// Body of a successful registration.
#[derive(Debug, Serialize)]
pub struct RegisteredResponse {
    pub success: bool,
    pub message: String,
}
