//! In-memory account store with the same constraints as the postgres schema.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::repo::{
    AccountRepository, CompanyRepository, JobSeekerRepository, RegistrationStore, RegistrationTx,
    RepoError,
};
use super::repo_types::{Account, CompanyProfile, JobSeekerProfile, NewAccount, Role};

const EMAIL_MAX: usize = 255;

#[derive(Debug, Clone, Default)]
struct Tables {
    last_account_id: i64,
    last_profile_id: i64,
    accounts: BTreeMap<i64, Account>,
    job_seekers: BTreeMap<i64, JobSeekerProfile>,
    companies: BTreeMap<i64, CompanyProfile>,
}

impl Tables {
    fn account_with_role(&self, account_id: i64, role: Role) -> Result<(), RepoError> {
        match self.accounts.get(&account_id) {
            Some(a) if a.role == role => Ok(()),
            Some(a) => Err(RepoError::ForeignKeyViolation(format!(
                "account {} has role {}, expected {}",
                account_id, a.role, role
            ))),
            None => Err(RepoError::ForeignKeyViolation(format!(
                "account {} does not exist",
                account_id
            ))),
        }
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    fail_profiles: Arc<AtomicBool>,
    zero_ids: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent profile insert fail, to exercise rollback paths.
    pub fn fail_profile_inserts(&self) {
        self.fail_profiles.store(true, Ordering::SeqCst);
    }

    /// Make `create_account` report id 0 without inserting anything.
    pub fn zero_account_ids(&self) {
        self.zero_ids.store(true, Ordering::SeqCst);
    }

    pub async fn account_count(&self) -> usize {
        self.tables.lock().await.accounts.len()
    }

    pub async fn deactivate(&self, account_id: i64) {
        if let Some(a) = self.tables.lock().await.accounts.get_mut(&account_id) {
            a.is_active = false;
        }
    }
}

#[async_trait]
impl AccountRepository for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, RepoError> {
        let t = self.tables.lock().await;
        Ok(t.accounts.values().find(|a| a.email == email).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, RepoError> {
        Ok(self.tables.lock().await.accounts.get(&id).cloned())
    }
}

#[async_trait]
impl JobSeekerRepository for MemoryStore {
    async fn find_by_account(&self, account_id: i64) -> Result<Option<JobSeekerProfile>, RepoError> {
        Ok(self.tables.lock().await.job_seekers.get(&account_id).cloned())
    }
}

#[async_trait]
impl CompanyRepository for MemoryStore {
    async fn find_by_account(&self, account_id: i64) -> Result<Option<CompanyProfile>, RepoError> {
        Ok(self.tables.lock().await.companies.get(&account_id).cloned())
    }
}

#[async_trait]
impl RegistrationStore for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn RegistrationTx>, RepoError> {
        let guard = self.tables.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(MemoryTx {
            guard,
            staged,
            fail_profiles: self.fail_profiles.load(Ordering::SeqCst),
            zero_ids: self.zero_ids.load(Ordering::SeqCst),
        }))
    }
}

/// Holds the table lock for its whole lifetime, so transactions are serial.
struct MemoryTx {
    guard: OwnedMutexGuard<Tables>,
    staged: Tables,
    fail_profiles: bool,
    zero_ids: bool,
}

#[async_trait]
impl RegistrationTx for MemoryTx {
    async fn create_account(&mut self, account: &NewAccount) -> Result<i64, RepoError> {
        if self.zero_ids {
            return Ok(0);
        }
        if account.email.chars().count() > EMAIL_MAX {
            return Err(RepoError::Constraint("email exceeds 255 characters".into()));
        }
        if self.staged.accounts.values().any(|a| a.email == account.email) {
            return Err(RepoError::UniqueViolation(format!(
                "email {} already exists",
                account.email
            )));
        }
        self.staged.last_account_id += 1;
        let id = self.staged.last_account_id;
        self.staged.accounts.insert(
            id,
            Account {
                id,
                email: account.email.clone(),
                password_hash: account.password_hash.clone(),
                role: account.role,
                is_active: account.is_active,
                created_at: account.created_at,
                updated_at: account.updated_at,
            },
        );
        Ok(id)
    }

    async fn create_job_seeker(&mut self, profile: &JobSeekerProfile) -> Result<(), RepoError> {
        if self.fail_profiles {
            return Err(RepoError::Constraint("profile inserts disabled".into()));
        }
        self.staged.account_with_role(profile.account_id, Role::JobSeeker)?;
        if self.staged.job_seekers.contains_key(&profile.account_id) {
            return Err(RepoError::UniqueViolation(format!(
                "account {} already has a job seeker profile",
                profile.account_id
            )));
        }
        self.staged.last_profile_id += 1;
        let stored = JobSeekerProfile {
            id: self.staged.last_profile_id,
            ..profile.clone()
        };
        self.staged.job_seekers.insert(profile.account_id, stored);
        Ok(())
    }

    async fn create_company(&mut self, profile: &CompanyProfile) -> Result<(), RepoError> {
        if self.fail_profiles {
            return Err(RepoError::Constraint("profile inserts disabled".into()));
        }
        self.staged.account_with_role(profile.account_id, Role::Company)?;
        if self.staged.companies.contains_key(&profile.account_id) {
            return Err(RepoError::UniqueViolation(format!(
                "account {} already has a company profile",
                profile.account_id
            )));
        }
        self.staged.last_profile_id += 1;
        let stored = CompanyProfile {
            id: self.staged.last_profile_id,
            ..profile.clone()
        };
        self.staged.companies.insert(profile.account_id, stored);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), RepoError> {
        let MemoryTx {
            mut guard, staged, ..
        } = *self;
        *guard = staged;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn new_account(email: &str, role: Role) -> NewAccount {
        NewAccount::new(email.into(), "hash".into(), role, OffsetDateTime::now_utc())
    }

    fn company(account_id: i64) -> CompanyProfile {
        CompanyProfile {
            id: 0,
            name: "Acme".into(),
            headquarters: String::new(),
            website: String::new(),
            industry: String::new(),
            company_size: String::new(),
            account_id,
        }
    }

    #[tokio::test]
    async fn committed_writes_become_visible() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let id = tx.create_account(&new_account("c@acme.io", Role::Company)).await.unwrap();
        tx.create_company(&company(id)).await.unwrap();
        tx.commit().await.unwrap();

        let account = store.find_by_email("c@acme.io").await.unwrap().unwrap();
        assert_eq!(account.id, id);
        assert!(CompanyRepository::find_by_account(&store, id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn dropped_scope_discards_writes() {
        let store = MemoryStore::new();
        {
            let mut tx = store.begin().await.unwrap();
            tx.create_account(&new_account("c@acme.io", Role::Company)).await.unwrap();
        }
        assert!(store.find_by_email("c@acme.io").await.unwrap().is_none());
        assert_eq!(store.account_count().await, 0);
    }

    #[tokio::test]
    async fn email_is_unique() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        tx.create_account(&new_account("dup@x.io", Role::JobSeeker)).await.unwrap();
        let err = tx.create_account(&new_account("dup@x.io", Role::Company)).await.unwrap_err();
        assert!(matches!(err, RepoError::UniqueViolation(_)));
    }

    #[tokio::test]
    async fn profile_requires_existing_account_with_matching_role() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let err = tx.create_company(&company(0)).await.unwrap_err();
        assert!(matches!(err, RepoError::ForeignKeyViolation(_)));

        let id = tx.create_account(&new_account("js@x.io", Role::JobSeeker)).await.unwrap();
        let err = tx.create_company(&company(id)).await.unwrap_err();
        assert!(matches!(err, RepoError::ForeignKeyViolation(_)));
    }
}
