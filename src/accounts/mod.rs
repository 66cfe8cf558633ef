#[cfg(test)]
pub mod memory;
pub mod postgres;
pub mod repo;
pub mod repo_types;

pub use repo::{
    AccountRepository, CompanyRepository, JobSeekerRepository, RegistrationStore, RepoError,
};
pub use repo_types::{Account, CompanyProfile, JobSeekerProfile, NewAccount, Role};
