//! Database queries for the Fellah stores.

use crate::model::{
    ApplicationRecord, BankType, FarmerProfile, Persona, Session, Solution,
};

use super::db::{Database, DatabaseError};
use super::models::{ApplicationRow, FileRow, ProfileRow, SessionRow};

impl Database {
    // =========================================================================
    // Application record queries
    // =========================================================================

    /// Insert an application record, replacing any prior record for the same
    /// (`farmer_email`, `solution`) pair. Files are written in draft order.
    pub async fn replace_application(
        &self,
        record: &ApplicationRecord,
    ) -> Result<(), DatabaseError> {
        let mut tx = self.pool().begin().await?;

        sqlx::query("DELETE FROM applications WHERE farmer_email = ? AND solution = ?")
            .bind(&record.farmer_email)
            .bind(record.solution.as_i64())
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r"
            INSERT INTO applications (id, farmer_email, farmer_name, cin, solution, status, submitted_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(&record.id)
        .bind(&record.farmer_email)
        .bind(&record.farmer_name)
        .bind(&record.cin)
        .bind(record.solution.as_i64())
        .bind(record.status.as_str())
        .bind(record.submitted_at)
        .execute(&mut *tx)
        .await?;

        for (category, files) in &record.files {
            for (position, file) in files.iter().enumerate() {
                #[allow(clippy::cast_possible_wrap)]
                sqlx::query(
                    r"
                    INSERT INTO application_files (application_id, category, name, size, mime, position)
                    VALUES (?, ?, ?, ?, ?, ?)
                    ",
                )
                .bind(&record.id)
                .bind(category.as_str())
                .bind(&file.name)
                .bind(file.size as i64)
                .bind(&file.mime)
                .bind(position as i64)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(())
    }

    /// Get an application record by id.
    pub async fn get_application(&self, id: &str) -> Result<ApplicationRecord, DatabaseError> {
        let row = sqlx::query_as::<_, ApplicationRow>("SELECT * FROM applications WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("Application {id}")))?;

        let files = self.list_files(id).await?;
        row.into_record(files)
    }

    /// Find a farmer's record for one track, if any (the farmer status view).
    pub async fn find_application(
        &self,
        farmer_email: &str,
        solution: Solution,
    ) -> Result<Option<ApplicationRecord>, DatabaseError> {
        let row = sqlx::query_as::<_, ApplicationRow>(
            "SELECT * FROM applications WHERE farmer_email = ? AND solution = ?",
        )
        .bind(farmer_email)
        .bind(solution.as_i64())
        .fetch_optional(self.pool())
        .await?;

        match row {
            Some(row) => {
                let files = self.list_files(&row.id).await?;
                Ok(Some(row.into_record(files)?))
            }
            None => Ok(None),
        }
    }

    /// List all records for one bank type, in insertion order.
    pub async fn list_applications(
        &self,
        bank_type: BankType,
    ) -> Result<Vec<ApplicationRecord>, DatabaseError> {
        let rows = sqlx::query_as::<_, ApplicationRow>(
            "SELECT * FROM applications WHERE solution = ? ORDER BY rowid ASC",
        )
        .bind(bank_type.solution().as_i64())
        .fetch_all(self.pool())
        .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let files = self.list_files(&row.id).await?;
            records.push(row.into_record(files)?);
        }
        Ok(records)
    }

    /// Overwrite the stored status of a record. Transition legality is the
    /// repository's concern, not the storage layer's.
    pub async fn update_application_status(
        &self,
        id: &str,
        status: &str,
    ) -> Result<(), DatabaseError> {
        let result = sqlx::query("UPDATE applications SET status = ? WHERE id = ?")
            .bind(status)
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("Application {id}")));
        }
        Ok(())
    }

    async fn list_files(&self, application_id: &str) -> Result<Vec<FileRow>, DatabaseError> {
        let files = sqlx::query_as::<_, FileRow>(
            "SELECT * FROM application_files WHERE application_id = ? ORDER BY category ASC, position ASC",
        )
        .bind(application_id)
        .fetch_all(self.pool())
        .await?;
        Ok(files)
    }

    // =========================================================================
    // Session queries
    // =========================================================================

    /// Store the active session for a persona, replacing any prior one.
    pub async fn store_session(&self, session: &Session) -> Result<(), DatabaseError> {
        sqlx::query(
            r"
            INSERT OR REPLACE INTO sessions (persona, email, solution, bank_type, created_at)
            VALUES (?, ?, ?, ?, ?)
            ",
        )
        .bind(session.persona.as_str())
        .bind(&session.email)
        .bind(session.solution.map(Solution::as_i64))
        .bind(session.bank_type.map(BankType::as_str))
        .bind(session.created_at)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Get the active session for a persona, if any.
    pub async fn get_session(&self, persona: Persona) -> Result<Option<Session>, DatabaseError> {
        let row = sqlx::query_as::<_, SessionRow>("SELECT * FROM sessions WHERE persona = ?")
            .bind(persona.as_str())
            .fetch_optional(self.pool())
            .await?;

        row.map(SessionRow::into_session).transpose()
    }

    /// Delete the active session for a persona (logout).
    pub async fn clear_session(&self, persona: Persona) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM sessions WHERE persona = ?")
            .bind(persona.as_str())
            .execute(self.pool())
            .await?;
        Ok(())
    }

    // =========================================================================
    // Profile queries
    // =========================================================================

    /// Store a farmer profile, replacing any prior one for the same email.
    pub async fn store_profile(&self, profile: &FarmerProfile) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT OR REPLACE INTO profiles (email, name, cin) VALUES (?, ?, ?)",
        )
        .bind(&profile.email)
        .bind(&profile.name)
        .bind(&profile.cin)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Get a farmer profile by email, if any.
    pub async fn get_profile(&self, email: &str) -> Result<Option<FarmerProfile>, DatabaseError> {
        let row = sqlx::query_as::<_, ProfileRow>("SELECT * FROM profiles WHERE email = ?")
            .bind(email)
            .fetch_optional(self.pool())
            .await?;
        Ok(row.map(FarmerProfile::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::unix_timestamp;
    use crate::model::{ApplicationStatus, DocumentCategory, DocumentFiles, FileMeta};

    fn record(id: &str, email: &str, solution: Solution) -> ApplicationRecord {
        let mut files = DocumentFiles::new();
        files.insert(
            DocumentCategory::Cin,
            vec![FileMeta {
                name: "cin.pdf".to_string(),
                size: 2048,
                mime: "application/pdf".to_string(),
            }],
        );
        ApplicationRecord {
            id: id.to_string(),
            farmer_email: email.to_string(),
            farmer_name: "Farmer".to_string(),
            cin: "12345678".to_string(),
            solution,
            status: ApplicationStatus::Pending,
            submitted_at: unix_timestamp(),
            files,
        }
    }

    #[tokio::test]
    async fn replace_then_get_round_trips() {
        let db = Database::open_in_memory().await.unwrap();
        let rec = record("rec-1", "a@b.tn", Solution::LandLoan);
        db.replace_application(&rec).await.unwrap();

        let loaded = db.get_application("rec-1").await.unwrap();
        assert_eq!(loaded.farmer_email, "a@b.tn");
        assert_eq!(loaded.status, ApplicationStatus::Pending);
        assert_eq!(
            loaded.files.get(&DocumentCategory::Cin).map(Vec::len),
            Some(1)
        );
    }

    #[tokio::test]
    async fn replacement_removes_prior_record_and_its_files() {
        let db = Database::open_in_memory().await.unwrap();
        db.replace_application(&record("rec-1", "a@b.tn", Solution::LandLoan))
            .await
            .unwrap();
        db.replace_application(&record("rec-2", "a@b.tn", Solution::LandLoan))
            .await
            .unwrap();

        let listed = db.list_applications(BankType::Normal).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, "rec-2");

        assert!(matches!(
            db.get_application("rec-1").await,
            Err(DatabaseError::NotFound(_))
        ));

        // Orphaned file rows would show up as files on no record at all.
        let orphans: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM application_files WHERE application_id = 'rec-1'")
                .fetch_one(db.pool())
                .await
                .unwrap();
        assert_eq!(orphans, 0);
    }

    #[tokio::test]
    async fn listing_is_partitioned_by_bank_type() {
        let db = Database::open_in_memory().await.unwrap();
        db.replace_application(&record("rec-1", "a@b.tn", Solution::LandLoan))
            .await
            .unwrap();
        db.replace_application(&record("rec-2", "b@c.tn", Solution::Equipment))
            .await
            .unwrap();

        let normal = db.list_applications(BankType::Normal).await.unwrap();
        assert!(normal.iter().all(|r| r.solution == Solution::LandLoan));
        let islamic = db.list_applications(BankType::Islamic).await.unwrap();
        assert!(islamic.iter().all(|r| r.solution == Solution::Equipment));
    }

    #[tokio::test]
    async fn status_update_on_unknown_id_is_not_found() {
        let db = Database::open_in_memory().await.unwrap();
        assert!(matches!(
            db.update_application_status("nope", "approved").await,
            Err(DatabaseError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn session_store_is_one_per_persona() {
        let db = Database::open_in_memory().await.unwrap();
        assert!(db.get_session(Persona::Farmer).await.unwrap().is_none());

        let first = Session::farmer("a@b.tn", Solution::LandLoan, unix_timestamp());
        db.store_session(&first).await.unwrap();
        let second = Session::farmer("c@d.tn", Solution::Equipment, unix_timestamp());
        db.store_session(&second).await.unwrap();

        let active = db.get_session(Persona::Farmer).await.unwrap().unwrap();
        assert_eq!(active.email, "c@d.tn");
        assert_eq!(active.bank_type, Some(BankType::Islamic));

        db.clear_session(Persona::Farmer).await.unwrap();
        assert!(db.get_session(Persona::Farmer).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn profile_round_trips() {
        let db = Database::open_in_memory().await.unwrap();
        let profile = FarmerProfile {
            email: "a@b.tn".to_string(),
            name: "Amine".to_string(),
            cin: "12345678".to_string(),
        };
        db.store_profile(&profile).await.unwrap();

        let loaded = db.get_profile("a@b.tn").await.unwrap().unwrap();
        assert_eq!(loaded.name, "Amine");
        assert!(db.get_profile("x@y.tn").await.unwrap().is_none());
    }
}
