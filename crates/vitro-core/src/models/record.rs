//! Growth-media ingredient record domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stage of the tissue-culture protocol a medium is formulated for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CulturePhase {
    Initiation,
    Multiplication,
    Rooting,
    Acclimatization,
}

/// One ingredient line of a growth-medium formulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaRecord {
    pub id: Uuid,
    /// Plant species the medium is formulated for.
    pub species: String,
    pub phase: CulturePhase,
    /// Component name (e.g. a salt, hormone, or gelling agent).
    pub ingredient: String,
    pub concentration: f64,
    /// Unit for `concentration` (e.g. `mg/L`).
    pub unit: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMediaRecord {
    pub species: String,
    pub phase: CulturePhase,
    pub ingredient: String,
    pub concentration: f64,
    pub unit: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateMediaRecord {
    pub species: Option<String>,
    pub phase: Option<CulturePhase>,
    pub ingredient: Option<String>,
    pub concentration: Option<f64>,
    pub unit: Option<String>,
    /// `Some(Some(val))` = set, `Some(None)` = clear, `None` = no change.
    pub notes: Option<Option<String>>,
}

/// Optional filters for catalog listings.
#[derive(Debug, Clone, Default)]
pub struct MediaRecordFilter {
    pub species: Option<String>,
    pub phase: Option<CulturePhase>,
    /// Substring match on the ingredient name.
    pub ingredient: Option<String>,
}
