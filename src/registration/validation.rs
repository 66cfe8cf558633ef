//! Role-conditioned validation of registration requests.
//!
//! `validate` never stops at the first problem: every violation found is
//! returned so a client can fix all fields in one round trip.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use super::dto::{CompanyFields, JobSeekerFields, ProfileFields, RegisterRequest, Registration};
use crate::accounts::Role;

pub const PASSWORD_MIN: usize = 6;
pub const PASSWORD_MAX: usize = 200;
pub const PERSON_NAME_MAX: usize = 100;
pub const SUMMARY_MAX: usize = 500;
pub const TEXT_MAX: usize = 255;
pub const COMPANY_SIZE_MAX: usize = 50;
pub const EXPERIENCE_MIN: i64 = 0;
pub const EXPERIENCE_MAX: i64 = 50;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    static ref ALPHA_RE: Regex = Regex::new(r"^[A-Za-z]+$").unwrap();
    static ref URL_RE: Regex = Regex::new(
        r"^(?i)https?://[a-z0-9]([a-z0-9-]*[a-z0-9])?(\.[a-z0-9]([a-z0-9-]*[a-z0-9])?)*(:\d{1,5})?([/?#]\S*)?$"
    )
    .unwrap();
}

/// One field-level failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: &'static str,
    #[serde(flatten)]
    pub reason: Reason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum Reason {
    Required,
    InvalidEmail,
    InvalidRole,
    TooShort { min: usize },
    TooLong { max: usize },
    NotAlpha,
    OutOfRange { min: i64, max: i64 },
    InvalidUrl,
    ForbiddenForRole { role: Role },
}

impl Violation {
    fn new(field: &'static str, reason: Reason) -> Self {
        Self { field, reason }
    }
}

/// Every violation in `req`, structural checks first.
pub fn validate(req: &RegisterRequest) -> Vec<Violation> {
    let mut violations = credential_violations(req);
    match role_of(req) {
        Ok(Role::JobSeeker) => violations.extend(job_seeker_violations(req)),
        Ok(Role::Company) => violations.extend(company_violations(req)),
        Err(v) => violations.push(v),
    }
    violations
}

/// Validate and, when clean, narrow the request to the matching profile.
pub fn parse(req: RegisterRequest) -> Result<Registration, Vec<Violation>> {
    let violations = validate(&req);
    if !violations.is_empty() {
        return Err(violations);
    }
    let role = role_of(&req).map_err(|v| vec![v])?;

    let profile = match role {
        Role::JobSeeker => ProfileFields::JobSeeker(JobSeekerFields {
            first_name: req.first_name.unwrap_or_default(),
            last_name: req.last_name.unwrap_or_default(),
            profile_summary: req.profile_summary.unwrap_or_default(),
            skills: req.skills.unwrap_or_default(),
            // range checked above
            experience: req.experience.unwrap_or(0) as i32,
            education: req.education.unwrap_or_default(),
        }),
        Role::Company => ProfileFields::Company(CompanyFields {
            name: req.name.unwrap_or_default(),
            headquarters: req.headquarters.unwrap_or_default(),
            website: req.website.unwrap_or_default(),
            industry: req.industry.unwrap_or_default(),
            company_size: req.company_size.unwrap_or_default(),
        }),
    };
    Ok(Registration {
        email: req.email,
        password: req.password,
        profile,
    })
}

fn role_of(req: &RegisterRequest) -> Result<Role, Violation> {
    if req.role.trim().is_empty() {
        return Err(Violation::new("role", Reason::Required));
    }
    req.role
        .parse::<Role>()
        .map_err(|_| Violation::new("role", Reason::InvalidRole))
}

fn credential_violations(req: &RegisterRequest) -> Vec<Violation> {
    let mut out = Vec::new();

    if req.email.is_empty() {
        out.push(Violation::new("email", Reason::Required));
    } else if !EMAIL_RE.is_match(&req.email) {
        out.push(Violation::new("email", Reason::InvalidEmail));
    }

    let password_len = req.password.chars().count();
    if password_len == 0 {
        out.push(Violation::new("password", Reason::Required));
    } else if password_len < PASSWORD_MIN {
        out.push(Violation::new("password", Reason::TooShort { min: PASSWORD_MIN }));
    } else if password_len > PASSWORD_MAX {
        out.push(Violation::new("password", Reason::TooLong { max: PASSWORD_MAX }));
    }

    out
}

fn job_seeker_violations(req: &RegisterRequest) -> Vec<Violation> {
    let mut out = Vec::new();
    out.extend(alpha_name("firstName", req.first_name.as_deref(), PERSON_NAME_MAX));
    out.extend(alpha_name("lastName", req.last_name.as_deref(), PERSON_NAME_MAX));
    out.extend(too_long("profileSummary", req.profile_summary.as_deref(), SUMMARY_MAX));
    if let Some(years) = req.experience {
        if !(EXPERIENCE_MIN..=EXPERIENCE_MAX).contains(&years) {
            out.push(Violation::new(
                "experience",
                Reason::OutOfRange {
                    min: EXPERIENCE_MIN,
                    max: EXPERIENCE_MAX,
                },
            ));
        }
    }
    out.extend(too_long("education", req.education.as_deref(), TEXT_MAX));

    let company_only = [
        ("name", is_set(&req.name)),
        ("headquarters", is_set(&req.headquarters)),
        ("website", is_set(&req.website)),
        ("industry", is_set(&req.industry)),
        ("companySize", is_set(&req.company_size)),
    ];
    out.extend(forbidden(&company_only, Role::JobSeeker));
    out
}

fn company_violations(req: &RegisterRequest) -> Vec<Violation> {
    let mut out = Vec::new();
    out.extend(alpha_name("name", req.name.as_deref(), TEXT_MAX));
    out.extend(too_long("headquarters", req.headquarters.as_deref(), TEXT_MAX));
    if let Some(site) = req.website.as_deref().filter(|s| !s.is_empty()) {
        if site.chars().count() > TEXT_MAX {
            out.push(Violation::new("website", Reason::TooLong { max: TEXT_MAX }));
        } else if !URL_RE.is_match(site) {
            out.push(Violation::new("website", Reason::InvalidUrl));
        }
    }
    out.extend(too_long("industry", req.industry.as_deref(), TEXT_MAX));
    out.extend(too_long("companySize", req.company_size.as_deref(), COMPANY_SIZE_MAX));

    let job_seeker_only = [
        ("firstName", is_set(&req.first_name)),
        ("lastName", is_set(&req.last_name)),
        ("profileSummary", is_set(&req.profile_summary)),
        ("skills", req.skills.as_ref().is_some_and(|s| !s.is_empty())),
        ("experience", req.experience.is_some_and(|y| y != 0)),
        ("education", is_set(&req.education)),
    ];
    out.extend(forbidden(&job_seeker_only, Role::Company));
    out
}

/// Required, letters only, bounded length.
fn alpha_name(field: &'static str, value: Option<&str>, max: usize) -> Vec<Violation> {
    let value = value.unwrap_or_default();
    if value.is_empty() {
        return vec![Violation::new(field, Reason::Required)];
    }
    let mut out = Vec::new();
    if !ALPHA_RE.is_match(value) {
        out.push(Violation::new(field, Reason::NotAlpha));
    }
    out.extend(too_long(field, Some(value), max));
    out
}

fn too_long(field: &'static str, value: Option<&str>, max: usize) -> Option<Violation> {
    value
        .filter(|v| v.chars().count() > max)
        .map(|_| Violation::new(field, Reason::TooLong { max }))
}

fn forbidden(fields: &[(&'static str, bool)], role: Role) -> Vec<Violation> {
    fields
        .iter()
        .filter(|(_, present)| *present)
        .map(|(field, _)| Violation::new(*field, Reason::ForbiddenForRole { role }))
        .collect()
}

fn is_set(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}
