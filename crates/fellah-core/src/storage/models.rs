//! Database row models and their conversions into domain types.

use serde::{Deserialize, Serialize};

use crate::db::DatabaseError;
use crate::model::{
    ApplicationRecord, ApplicationStatus, BankType, DocumentCategory, DocumentFiles, FarmerProfile,
    FileMeta, Persona, Session, Solution,
};

/// Application record row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ApplicationRow {
    pub id: String,
    pub farmer_email: String,
    pub farmer_name: String,
    pub cin: String,
    pub solution: i64,
    pub status: String,
    pub submitted_at: i64,
}

impl ApplicationRow {
    /// Combine an application row with its file rows into a domain record.
    pub fn into_record(self, files: Vec<FileRow>) -> Result<ApplicationRecord, DatabaseError> {
        let solution = Solution::from_i64(self.solution)
            .ok_or_else(|| DatabaseError::Decode(format!("unknown solution {}", self.solution)))?;
        let status = ApplicationStatus::parse(&self.status)
            .ok_or_else(|| DatabaseError::Decode(format!("unknown status {:?}", self.status)))?;

        let mut grouped = DocumentFiles::new();
        for row in files {
            let category = DocumentCategory::parse(&row.category).ok_or_else(|| {
                DatabaseError::Decode(format!("unknown document category {:?}", row.category))
            })?;
            #[allow(clippy::cast_sign_loss)]
            grouped.entry(category).or_default().push(FileMeta {
                name: row.name,
                size: row.size.max(0) as u64,
                mime: row.mime,
            });
        }

        Ok(ApplicationRecord {
            id: self.id,
            farmer_email: self.farmer_email,
            farmer_name: self.farmer_name,
            cin: self.cin,
            solution,
            status,
            submitted_at: self.submitted_at,
            files: grouped,
        })
    }
}

/// Uploaded-file metadata row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FileRow {
    pub id: i64,
    pub application_id: String,
    pub category: String,
    pub name: String,
    pub size: i64,
    pub mime: String,
    pub position: i64,
}

/// Session row, at most one per persona.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SessionRow {
    pub persona: String,
    pub email: String,
    pub solution: Option<i64>,
    pub bank_type: Option<String>,
    pub created_at: i64,
}

impl SessionRow {
    pub fn into_session(self) -> Result<Session, DatabaseError> {
        let persona = Persona::parse(&self.persona)
            .ok_or_else(|| DatabaseError::Decode(format!("unknown persona {:?}", self.persona)))?;
        let solution = match self.solution {
            Some(value) => Some(Solution::from_i64(value).ok_or_else(|| {
                DatabaseError::Decode(format!("unknown solution {value}"))
            })?),
            None => None,
        };
        let bank_type = match self.bank_type.as_deref() {
            Some(value) => Some(BankType::parse(value).ok_or_else(|| {
                DatabaseError::Decode(format!("unknown bank type {value:?}"))
            })?),
            None => None,
        };

        Ok(Session {
            persona,
            email: self.email,
            solution,
            bank_type,
            created_at: self.created_at,
        })
    }
}

/// Farmer profile row, keyed by email.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProfileRow {
    pub email: String,
    pub name: String,
    pub cin: String,
}

impl From<ProfileRow> for FarmerProfile {
    fn from(row: ProfileRow) -> Self {
        Self {
            email: row.email,
            name: row.name,
            cin: row.cin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app_row(status: &str, solution: i64) -> ApplicationRow {
        ApplicationRow {
            id: "rec-1".to_string(),
            farmer_email: "a@b.tn".to_string(),
            farmer_name: "A".to_string(),
            cin: "11112222".to_string(),
            solution,
            status: status.to_string(),
            submitted_at: 1_750_000_000,
        }
    }

    #[test]
    fn row_converts_with_grouped_files() {
        let files = vec![
            FileRow {
                id: 1,
                application_id: "rec-1".to_string(),
                category: "cin".to_string(),
                name: "cin.pdf".to_string(),
                size: 10,
                mime: "application/pdf".to_string(),
                position: 0,
            },
            FileRow {
                id: 2,
                application_id: "rec-1".to_string(),
                category: "cin".to_string(),
                name: "cin-back.pdf".to_string(),
                size: 12,
                mime: "application/pdf".to_string(),
                position: 1,
            },
        ];

        let record = app_row("pending", 1).into_record(files).unwrap();
        assert_eq!(record.solution, Solution::LandLoan);
        assert_eq!(record.status, ApplicationStatus::Pending);
        let cin_files = record.files.get(&DocumentCategory::Cin).unwrap();
        assert_eq!(cin_files.len(), 2);
        assert_eq!(cin_files[0].name, "cin.pdf");
    }

    #[test]
    fn bad_encodings_are_decode_errors() {
        assert!(matches!(
            app_row("pending", 9).into_record(Vec::new()),
            Err(DatabaseError::Decode(_))
        ));
        assert!(matches!(
            app_row("archived", 1).into_record(Vec::new()),
            Err(DatabaseError::Decode(_))
        ));
    }
}
