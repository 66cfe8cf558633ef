use async_trait::async_trait;

use super::repo_types::{Account, CompanyProfile, JobSeekerProfile, NewAccount};

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("foreign key violated: {0}")]
    ForeignKeyViolation(String),

    #[error("constraint violated: {0}")]
    Constraint(String),

    #[error("corrupt row: {0}")]
    Corrupt(String),

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        use sqlx::error::ErrorKind;

        let sqlx::Error::Database(db_err) = &err else {
            return RepoError::Database(err);
        };
        let msg = db_err.message().to_string();
        match db_err.kind() {
            ErrorKind::UniqueViolation => RepoError::UniqueViolation(msg),
            ErrorKind::ForeignKeyViolation => RepoError::ForeignKeyViolation(msg),
            ErrorKind::CheckViolation | ErrorKind::NotNullViolation => RepoError::Constraint(msg),
            // 22001: string_data_right_truncation (value too long for column)
            _ if db_err.code().as_deref() == Some("22001") => RepoError::Constraint(msg),
            _ => RepoError::Database(err),
        }
    }
}

/// Read side of the account store.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, RepoError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, RepoError>;
}

#[async_trait]
pub trait JobSeekerRepository: Send + Sync {
    async fn find_by_account(&self, account_id: i64) -> Result<Option<JobSeekerProfile>, RepoError>;
}

#[async_trait]
pub trait CompanyRepository: Send + Sync {
    async fn find_by_account(&self, account_id: i64) -> Result<Option<CompanyProfile>, RepoError>;
}

/// Opens the transactional scope a registration is written through.
#[async_trait]
pub trait RegistrationStore: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn RegistrationTx>, RepoError>;
}

/// Write side of the account, job seeker and company stores, bound to a
/// single transaction. Nothing becomes visible until `commit`; dropping the
/// scope discards every write made through it.
#[async_trait]
pub trait RegistrationTx: Send {
    /// Returns the id assigned by the store. An id of 0 means nothing was created.
    async fn create_account(&mut self, account: &NewAccount) -> Result<i64, RepoError>;
    async fn create_job_seeker(&mut self, profile: &JobSeekerProfile) -> Result<(), RepoError>;
    async fn create_company(&mut self, profile: &CompanyProfile) -> Result<(), RepoError>;
    async fn commit(self: Box<Self>) -> Result<(), RepoError>;
}
