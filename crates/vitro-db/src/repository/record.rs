//! SurrealDB implementation of [`MediaRecordRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;
use vitro_core::error::{VitroError, VitroResult};
use vitro_core::models::record::{
    CreateMediaRecord, CulturePhase, MediaRecord, MediaRecordFilter, UpdateMediaRecord,
};
use vitro_core::repository::{MediaRecordRepository, PaginatedResult, Pagination};

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct RecordRow {
    species: String,
    phase: String,
    ingredient: String,
    concentration: f64,
    unit: String,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct RecordRowWithId {
    record_id: String,
    species: String,
    phase: String,
    ingredient: String,
    concentration: f64,
    unit: String,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// Row struct for the distinct-species query.
#[derive(Debug, SurrealValue)]
struct SpeciesRow {
    species: String,
}

fn parse_phase(s: &str) -> Result<CulturePhase, DbError> {
    match s {
        "Initiation" => Ok(CulturePhase::Initiation),
        "Multiplication" => Ok(CulturePhase::Multiplication),
        "Rooting" => Ok(CulturePhase::Rooting),
        "Acclimatization" => Ok(CulturePhase::Acclimatization),
        other => Err(DbError::Query(format!("unknown culture phase: {other}"))),
    }
}

fn phase_to_string(p: &CulturePhase) -> &'static str {
    match p {
        CulturePhase::Initiation => "Initiation",
        CulturePhase::Multiplication => "Multiplication",
        CulturePhase::Rooting => "Rooting",
        CulturePhase::Acclimatization => "Acclimatization",
    }
}

impl RecordRow {
    fn into_record(self, id: Uuid) -> Result<MediaRecord, DbError> {
        Ok(MediaRecord {
            id,
            species: self.species,
            phase: parse_phase(&self.phase)?,
            ingredient: self.ingredient,
            concentration: self.concentration,
            unit: self.unit,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl RecordRowWithId {
    fn try_into_record(self) -> Result<MediaRecord, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Query(format!("invalid UUID: {e}")))?;
        Ok(MediaRecord {
            id,
            species: self.species,
            phase: parse_phase(&self.phase)?,
            ingredient: self.ingredient,
            concentration: self.concentration,
            unit: self.unit,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn validate(input: &CreateMediaRecord) -> VitroResult<()> {
    if input.species.is_empty() {
        return Err(VitroError::Validation {
            message: "species must not be empty".into(),
        });
    }
    if input.ingredient.is_empty() {
        return Err(VitroError::Validation {
            message: "ingredient must not be empty".into(),
        });
    }
    if input.concentration < 0.0 {
        return Err(VitroError::Validation {
            message: "concentration must not be negative".into(),
        });
    }
    Ok(())
}

/// SurrealDB implementation of the media-record repository.
#[derive(Clone)]
pub struct SurrealMediaRecordRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealMediaRecordRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> MediaRecordRepository for SurrealMediaRecordRepository<C> {
    async fn create(&self, input: CreateMediaRecord) -> VitroResult<MediaRecord> {
        validate(&input)?;

        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('media_record', $id) SET \
                 species = $species, \
                 phase = $phase, \
                 ingredient = $ingredient, \
                 concentration = $concentration, \
                 unit = $unit, \
                 notes = $notes",
            )
            .bind(("id", id_str.clone()))
            .bind(("species", input.species))
            .bind(("phase", phase_to_string(&input.phase).to_string()))
            .bind(("ingredient", input.ingredient))
            .bind(("concentration", input.concentration))
            .bind(("unit", input.unit))
            .bind(("notes", input.notes))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<RecordRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "media_record".into(),
            id: id_str,
        })?;

        Ok(row.into_record(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> VitroResult<MediaRecord> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('media_record', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RecordRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "media_record".into(),
            id: id_str,
        })?;

        Ok(row.into_record(id)?)
    }

    async fn update(&self, id: Uuid, input: UpdateMediaRecord) -> VitroResult<MediaRecord> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.species.is_some() {
            sets.push("species = $species");
        }
        if input.phase.is_some() {
            sets.push("phase = $phase");
        }
        if input.ingredient.is_some() {
            sets.push("ingredient = $ingredient");
        }
        if input.concentration.is_some() {
            sets.push("concentration = $concentration");
        }
        if input.unit.is_some() {
            sets.push("unit = $unit");
        }
        if input.notes.is_some() {
            sets.push("notes = $notes");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('media_record', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(species) = input.species {
            builder = builder.bind(("species", species));
        }
        if let Some(ref phase) = input.phase {
            builder = builder.bind(("phase", phase_to_string(phase).to_string()));
        }
        if let Some(ingredient) = input.ingredient {
            builder = builder.bind(("ingredient", ingredient));
        }
        if let Some(concentration) = input.concentration {
            builder = builder.bind(("concentration", concentration));
        }
        if let Some(unit) = input.unit {
            builder = builder.bind(("unit", unit));
        }
        if let Some(notes) = input.notes {
            // notes is Option<Option<String>>: Some(Some(v)) = set, Some(None) = clear
            builder = builder.bind(("notes", notes));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<RecordRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "media_record".into(),
            id: id_str,
        })?;

        Ok(row.into_record(id)?)
    }

    async fn delete(&self, id: Uuid) -> VitroResult<()> {
        self.db
            .query("DELETE type::record('media_record', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(
        &self,
        filter: MediaRecordFilter,
        pagination: Pagination,
    ) -> VitroResult<PaginatedResult<MediaRecord>> {
        let mut wheres = Vec::new();
        if filter.species.is_some() {
            wheres.push("species = $species");
        }
        if filter.phase.is_some() {
            wheres.push("phase = $phase");
        }
        if filter.ingredient.is_some() {
            wheres.push("string::contains(ingredient, $ingredient)");
        }
        let where_clause = if wheres.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", wheres.join(" AND "))
        };

        let count_query = format!(
            "SELECT count() AS total FROM media_record{where_clause} GROUP ALL"
        );
        let mut builder = self.db.query(&count_query);
        if let Some(ref species) = filter.species {
            builder = builder.bind(("species", species.clone()));
        }
        if let Some(ref phase) = filter.phase {
            builder = builder.bind(("phase", phase_to_string(phase).to_string()));
        }
        if let Some(ref ingredient) = filter.ingredient {
            builder = builder.bind(("ingredient", ingredient.clone()));
        }
        let mut count_result = builder.await.map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let page_query = format!(
            "SELECT meta::id(id) AS record_id, * FROM media_record{where_clause} \
             ORDER BY created_at ASC \
             LIMIT $limit START $offset"
        );
        let mut builder = self
            .db
            .query(&page_query)
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset));
        if let Some(species) = filter.species {
            builder = builder.bind(("species", species));
        }
        if let Some(ref phase) = filter.phase {
            builder = builder.bind(("phase", phase_to_string(phase).to_string()));
        }
        if let Some(ingredient) = filter.ingredient {
            builder = builder.bind(("ingredient", ingredient));
        }
        let mut result = builder.await.map_err(DbError::from)?;

        let rows: Vec<RecordRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_record())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn species(&self) -> VitroResult<Vec<String>> {
        let mut result = self
            .db
            .query("SELECT species FROM media_record GROUP BY species")
            .await
            .map_err(DbError::from)?;

        let rows: Vec<SpeciesRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.into_iter().map(|r| r.species).collect())
    }
}
