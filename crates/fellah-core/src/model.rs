//! Domain model: financing tracks, application records, document metadata.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The acting role in the UI, determining which views and data are visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    Farmer,
    Banker,
}

impl Persona {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Farmer => "farmer",
            Self::Banker => "banker",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "farmer" => Some(Self::Farmer),
            "banker" => Some(Self::Banker),
            _ => None,
        }
    }
}

/// One of the two financing tracks offered to farmers.
///
/// Encoded as `1`/`2` in storage and on the CLI, matching the track numbers
/// shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Solution {
    /// Track 1: land-paper regularization and a bank loan.
    #[serde(rename = "1")]
    LandLoan,
    /// Track 2: equipment request reviewed by an Islamic bank.
    #[serde(rename = "2")]
    Equipment,
}

impl Solution {
    /// The reviewing institution category, derived one-to-one from the track.
    pub const fn bank_type(self) -> BankType {
        match self {
            Self::LandLoan => BankType::Normal,
            Self::Equipment => BankType::Islamic,
        }
    }

    pub const fn as_i64(self) -> i64 {
        match self {
            Self::LandLoan => 1,
            Self::Equipment => 2,
        }
    }

    pub const fn from_i64(value: i64) -> Option<Self> {
        match value {
            1 => Some(Self::LandLoan),
            2 => Some(Self::Equipment),
            _ => None,
        }
    }
}

/// The reviewing institution category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BankType {
    Normal,
    Islamic,
}

impl BankType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Islamic => "islamic",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "normal" => Some(Self::Normal),
            "islamic" => Some(Self::Islamic),
            _ => None,
        }
    }

    /// The single financing track this bank type reviews.
    pub const fn solution(self) -> Solution {
        match self {
            Self::Normal => Solution::LandLoan,
            Self::Islamic => Solution::Equipment,
        }
    }
}

/// Review status of an application record.
///
/// `Approved` and `Rejected` are terminal; see
/// [`ApplicationRepository::set_status`](crate::repository::ApplicationRepository::set_status).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Document categories attached to an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentCategory {
    Cin,
    LandPapers,
    ProofOfExploitation,
    ExpertReport,
}

impl DocumentCategory {
    /// All categories, in display order.
    pub const ALL: [Self; 4] = [
        Self::Cin,
        Self::LandPapers,
        Self::ProofOfExploitation,
        Self::ExpertReport,
    ];

    /// Categories that must be non-empty before a record may be created.
    /// `ExpertReport` is optional.
    pub const REQUIRED: [Self; 3] = [Self::Cin, Self::LandPapers, Self::ProofOfExploitation];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cin => "cin",
            Self::LandPapers => "land_papers",
            Self::ProofOfExploitation => "proof_of_exploitation",
            Self::ExpertReport => "expert_report",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "cin" => Some(Self::Cin),
            "land_papers" => Some(Self::LandPapers),
            "proof_of_exploitation" => Some(Self::ProofOfExploitation),
            "expert_report" => Some(Self::ExpertReport),
            _ => None,
        }
    }

    pub const fn is_required(self) -> bool {
        !matches!(self, Self::ExpertReport)
    }
}

/// Metadata of an uploaded file. Binary content is never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMeta {
    pub name: String,
    pub size: u64,
    pub mime: String,
}

impl FileMeta {
    /// Build metadata from a filesystem path (the TUI's "file picker"):
    /// file name, on-disk size, and a mime type guessed from the extension.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let meta = std::fs::metadata(path)?;
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        let mime = mime_for_path(path).to_string();
        Ok(Self {
            name,
            size: meta.len(),
            mime,
        })
    }
}

/// Guess a mime type from a file extension. Unknown extensions fall back to
/// `application/octet-stream`.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Map of document category to its ordered file entries.
pub type DocumentFiles = BTreeMap<DocumentCategory, Vec<FileMeta>>;

/// What a farmer submits: identity fields, the chosen track, and the
/// attached document metadata. Validated before it becomes a record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationDraft {
    pub farmer_email: String,
    pub farmer_name: String,
    pub cin: String,
    pub solution: Solution,
    #[serde(default)]
    pub files: DocumentFiles,
}

impl ApplicationDraft {
    pub fn new(
        farmer_email: impl Into<String>,
        farmer_name: impl Into<String>,
        cin: impl Into<String>,
        solution: Solution,
    ) -> Self {
        Self {
            farmer_email: farmer_email.into(),
            farmer_name: farmer_name.into(),
            cin: cin.into(),
            solution,
            files: DocumentFiles::new(),
        }
    }

    /// Append a file to a document category, preserving insertion order.
    pub fn add_file(&mut self, category: DocumentCategory, file: FileMeta) {
        self.files.entry(category).or_default().push(file);
    }

    pub fn files_for(&self, category: DocumentCategory) -> &[FileMeta] {
        self.files.get(&category).map_or(&[], Vec::as_slice)
    }

    /// Check required identity fields and required document categories.
    ///
    /// The reported `field` is a stable key (`farmer_email`, `cin`,
    /// `land_papers`, ...) that the UI maps to a localized label.
    pub fn validate(&self) -> Result<()> {
        if self.farmer_email.trim().is_empty() {
            return Err(Error::validation("farmer_email"));
        }
        if !is_valid_email(self.farmer_email.trim()) {
            return Err(Error::validation("farmer_email"));
        }
        if self.farmer_name.trim().is_empty() {
            return Err(Error::validation("farmer_name"));
        }
        if self.cin.trim().is_empty() {
            return Err(Error::validation("cin"));
        }
        for category in DocumentCategory::REQUIRED {
            if self.files_for(category).is_empty() {
                return Err(Error::validation(category.as_str()));
            }
        }
        Ok(())
    }
}

/// Minimal well-formedness check: local part, `@`, domain with a dot.
pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    domain.split('.').count() >= 2 && !domain.starts_with('.') && !domain.ends_with('.')
}

/// A persisted application record: the validated draft plus identity,
/// status, and submission time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: String,
    pub farmer_email: String,
    pub farmer_name: String,
    pub cin: String,
    pub solution: Solution,
    pub status: ApplicationStatus,
    pub submitted_at: i64,
    pub files: DocumentFiles,
}

impl ApplicationRecord {
    pub const fn bank_type(&self) -> BankType {
        self.solution.bank_type()
    }
}

/// Per-farmer profile, keyed by email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FarmerProfile {
    pub email: String,
    pub name: String,
    pub cin: String,
}

/// The currently "logged in" persona and its metadata. At most one stored
/// session per persona; login replaces, logout deletes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub persona: Persona,
    pub email: String,
    pub solution: Option<Solution>,
    pub bank_type: Option<BankType>,
    pub created_at: i64,
}

impl Session {
    pub fn farmer(email: impl Into<String>, solution: Solution, created_at: i64) -> Self {
        Self {
            persona: Persona::Farmer,
            email: email.into(),
            solution: Some(solution),
            bank_type: Some(solution.bank_type()),
            created_at,
        }
    }

    pub fn banker(email: impl Into<String>, bank_type: BankType, created_at: i64) -> Self {
        Self {
            persona: Persona::Banker,
            email: email.into(),
            solution: None,
            bank_type: Some(bank_type),
            created_at,
        }
    }
}
