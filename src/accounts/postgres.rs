use async_trait::async_trait;
use sqlx::{postgres::PgExecutor, types::Json, PgPool, Postgres, Transaction};
use tracing::debug;

use super::repo::{
    AccountRepository, CompanyRepository, JobSeekerRepository, RegistrationStore, RegistrationTx,
    RepoError,
};
use super::repo_types::{
    Account, AccountRow, CompanyProfile, CompanyRow, JobSeekerProfile, JobSeekerRow, NewAccount,
};

/// Postgres-backed implementation of every account store trait.
#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountRepository for PgStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, RepoError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, email, password_hash, role, is_active, created_at, updated_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        row.map(Account::try_from).transpose()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, RepoError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, email, password_hash, role, is_active, created_at, updated_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        row.map(Account::try_from).transpose()
    }
}

#[async_trait]
impl JobSeekerRepository for PgStore {
    async fn find_by_account(&self, account_id: i64) -> Result<Option<JobSeekerProfile>, RepoError> {
        let row = sqlx::query_as::<_, JobSeekerRow>(
            r#"
            SELECT id, first_name, last_name, profile_summary, skills, experience, education, account_id
            FROM job_seekers
            WHERE account_id = $1
            "#,
        )
        .bind(account_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(Into::into))
    }
}

#[async_trait]
impl CompanyRepository for PgStore {
    async fn find_by_account(&self, account_id: i64) -> Result<Option<CompanyProfile>, RepoError> {
        let row = sqlx::query_as::<_, CompanyRow>(
            r#"
            SELECT id, name, headquarters, website, industry, company_size, account_id
            FROM companies
            WHERE account_id = $1
            "#,
        )
        .bind(account_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(Into::into))
    }
}

#[async_trait]
impl RegistrationStore for PgStore {
    async fn begin(&self) -> Result<Box<dyn RegistrationTx>, RepoError> {
        let tx = self.db.begin().await?;
        Ok(Box::new(PgRegistrationTx { tx }))
    }
}

pub struct PgRegistrationTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl RegistrationTx for PgRegistrationTx {
    async fn create_account(&mut self, account: &NewAccount) -> Result<i64, RepoError> {
        insert_account(&mut *self.tx, account).await
    }

    async fn create_job_seeker(&mut self, profile: &JobSeekerProfile) -> Result<(), RepoError> {
        insert_job_seeker(&mut *self.tx, profile).await
    }

    async fn create_company(&mut self, profile: &CompanyProfile) -> Result<(), RepoError> {
        insert_company(&mut *self.tx, profile).await
    }

    async fn commit(self: Box<Self>) -> Result<(), RepoError> {
        let this = *self;
        this.tx.commit().await?;
        Ok(())
    }
}

// ---- inserts ----

/// Insert an account and return its new id.
pub async fn insert_account<'e, E: PgExecutor<'e>>(
    ex: E,
    account: &NewAccount,
) -> Result<i64, RepoError> {
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO accounts (email, password_hash, role, is_active, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(&account.email)
    .bind(&account.password_hash)
    .bind(account.role.as_str())
    .bind(account.is_active)
    .bind(account.created_at)
    .bind(account.updated_at)
    .fetch_one(ex)
    .await?;
    debug!(account_id = id, role = %account.role, "account row inserted");
    Ok(id)
}

pub async fn insert_job_seeker<'e, E: PgExecutor<'e>>(
    ex: E,
    profile: &JobSeekerProfile,
) -> Result<(), RepoError> {
    sqlx::query(
        r#"
        INSERT INTO job_seekers
            (first_name, last_name, profile_summary, skills, experience, education, account_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(&profile.first_name)
    .bind(&profile.last_name)
    .bind(&profile.profile_summary)
    .bind(Json(&profile.skills))
    .bind(profile.experience)
    .bind(&profile.education)
    .bind(profile.account_id)
    .execute(ex)
    .await?;
    Ok(())
}

pub async fn insert_company<'e, E: PgExecutor<'e>>(
    ex: E,
    profile: &CompanyProfile,
) -> Result<(), RepoError> {
    sqlx::query(
        r#"
        INSERT INTO companies
            (name, headquarters, website, industry, company_size, account_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(&profile.name)
    .bind(&profile.headquarters)
    .bind(&profile.website)
    .bind(&profile.industry)
    .bind(&profile.company_size)
    .bind(profile.account_id)
    .execute(ex)
    .await?;
    Ok(())
}
