//! Application repository: the service seam between UI and storage.
//!
//! UI components hold an `Arc<dyn ApplicationRepository>` and never touch
//! the database directly, so the store can be swapped (on-disk SQLite,
//! in-memory) and tested in isolation.

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use crate::db::{unix_timestamp, DatabaseError};
use crate::error::{Error, Result};
use crate::model::{
    ApplicationDraft, ApplicationRecord, ApplicationStatus, BankType,
};
use crate::storage::Database;

/// Contract for the application record store and its status workflow.
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Validate and persist a draft. Any prior record for the same
    /// (`farmer_email`, `solution`) pair is replaced; the new record starts
    /// as [`ApplicationStatus::Pending`].
    async fn submit(&self, draft: ApplicationDraft) -> Result<ApplicationRecord>;

    /// All records reviewed by the given bank type, in insertion order.
    async fn list_for(&self, bank_type: BankType) -> Result<Vec<ApplicationRecord>>;

    /// Fetch one record by id.
    async fn get(&self, id: &str) -> Result<ApplicationRecord>;

    /// Apply a status transition. Only `Pending -> Approved` and
    /// `Pending -> Rejected` are legal; both outcomes are terminal.
    async fn set_status(
        &self,
        id: &str,
        status: ApplicationStatus,
    ) -> Result<ApplicationRecord>;

    /// Banker approval, a thin call into [`Self::set_status`].
    async fn approve(&self, id: &str) -> Result<ApplicationRecord> {
        self.set_status(id, ApplicationStatus::Approved).await
    }

    /// Banker rejection, a thin call into [`Self::set_status`].
    async fn reject(&self, id: &str) -> Result<ApplicationRecord> {
        self.set_status(id, ApplicationStatus::Rejected).await
    }
}

/// SQLite-backed repository.
#[derive(Clone)]
pub struct SqliteRepository {
    db: Database,
}

impl SqliteRepository {
    pub const fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ApplicationRepository for SqliteRepository {
    async fn submit(&self, draft: ApplicationDraft) -> Result<ApplicationRecord> {
        draft.validate()?;

        let record = ApplicationRecord {
            id: Uuid::new_v4().to_string(),
            farmer_email: draft.farmer_email.trim().to_string(),
            farmer_name: draft.farmer_name.trim().to_string(),
            cin: draft.cin.trim().to_string(),
            solution: draft.solution,
            status: ApplicationStatus::Pending,
            submitted_at: unix_timestamp(),
            files: draft.files,
        };

        self.db.replace_application(&record).await?;

        info!(
            id = %record.id,
            farmer = %record.farmer_email,
            solution = record.solution.as_i64(),
            "Application submitted"
        );
        Ok(record)
    }

    async fn list_for(&self, bank_type: BankType) -> Result<Vec<ApplicationRecord>> {
        Ok(self.db.list_applications(bank_type).await?)
    }

    async fn get(&self, id: &str) -> Result<ApplicationRecord> {
        map_not_found(self.db.get_application(id).await, id)
    }

    async fn set_status(
        &self,
        id: &str,
        status: ApplicationStatus,
    ) -> Result<ApplicationRecord> {
        if !status.is_terminal() {
            return Err(Error::validation("status"));
        }

        let current = map_not_found(self.db.get_application(id).await, id)?;
        if current.status.is_terminal() {
            return Err(Error::TerminalStatus {
                id: id.to_string(),
                status: current.status,
            });
        }

        self.db
            .update_application_status(id, status.as_str())
            .await?;

        info!(id, status = %status, "Application status updated");
        map_not_found(self.db.get_application(id).await, id)
    }
}

/// Storage reports missing rows as `DatabaseError::NotFound`; the repository
/// contract surfaces them as the domain `Error::NotFound`.
fn map_not_found<T>(result: std::result::Result<T, DatabaseError>, id: &str) -> Result<T> {
    result.map_err(|e| match e {
        DatabaseError::NotFound(_) => Error::NotFound { id: id.to_string() },
        other => Error::Database(other),
    })
}
