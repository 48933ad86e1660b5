//! Integration tests for the media-record repository using in-memory
//! SurrealDB.

use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use vitro_core::error::VitroError;
use vitro_core::models::record::{
    CreateMediaRecord, CulturePhase, MediaRecordFilter, UpdateMediaRecord,
};
use vitro_core::repository::{MediaRecordRepository, Pagination};
use vitro_db::SurrealMediaRecordRepository;

async fn setup() -> SurrealMediaRecordRepository<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    vitro_db::run_migrations(&db).await.unwrap();
    SurrealMediaRecordRepository::new(db)
}

fn sucrose() -> CreateMediaRecord {
    CreateMediaRecord {
        species: "Musa acuminata".into(),
        phase: CulturePhase::Multiplication,
        ingredient: "Sucrose".into(),
        concentration: 30_000.0,
        unit: "mg/L".into(),
        notes: None,
    }
}

#[tokio::test]
async fn create_and_get_record() {
    let repo = setup().await;

    let record = repo.create(sucrose()).await.unwrap();
    assert_eq!(record.species, "Musa acuminata");
    assert_eq!(record.phase, CulturePhase::Multiplication);
    assert_eq!(record.ingredient, "Sucrose");
    assert_eq!(record.unit, "mg/L");
    assert!(record.notes.is_none());

    let fetched = repo.get_by_id(record.id).await.unwrap();
    assert_eq!(fetched.id, record.id);
    assert_eq!(fetched.ingredient, "Sucrose");
}

#[tokio::test]
async fn get_missing_record_is_not_found() {
    let repo = setup().await;
    let err = repo.get_by_id(uuid::Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, VitroError::NotFound { .. }));
}

#[tokio::test]
async fn update_is_partial_and_returns_the_new_state() {
    let repo = setup().await;
    let record = repo.create(sucrose()).await.unwrap();

    let updated = repo
        .update(
            record.id,
            UpdateMediaRecord {
                concentration: Some(20_000.0),
                notes: Some(Some("reduced for rooting trials".into())),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.concentration, 20_000.0);
    assert_eq!(updated.notes.as_deref(), Some("reduced for rooting trials"));
    // Untouched fields survive.
    assert_eq!(updated.species, "Musa acuminata");
    assert_eq!(updated.ingredient, "Sucrose");
}

#[tokio::test]
async fn delete_removes_the_record() {
    let repo = setup().await;
    let record = repo.create(sucrose()).await.unwrap();

    repo.delete(record.id).await.unwrap();

    let err = repo.get_by_id(record.id).await.unwrap_err();
    assert!(matches!(err, VitroError::NotFound { .. }));
}

#[tokio::test]
async fn list_filters_by_species_and_phase() {
    let repo = setup().await;

    repo.create(sucrose()).await.unwrap();
    repo.create(CreateMediaRecord {
        species: "Musa acuminata".into(),
        phase: CulturePhase::Rooting,
        ingredient: "IBA".into(),
        concentration: 1.0,
        unit: "mg/L".into(),
        notes: None,
    })
    .await
    .unwrap();
    repo.create(CreateMediaRecord {
        species: "Solanum tuberosum".into(),
        phase: CulturePhase::Multiplication,
        ingredient: "BAP".into(),
        concentration: 2.0,
        unit: "mg/L".into(),
        notes: None,
    })
    .await
    .unwrap();

    let page = repo
        .list(
            MediaRecordFilter {
                species: Some("Musa acuminata".into()),
                ..Default::default()
            },
            Pagination::default(),
        )
        .await
        .unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.items.len(), 2);

    let page = repo
        .list(
            MediaRecordFilter {
                species: Some("Musa acuminata".into()),
                phase: Some(CulturePhase::Rooting),
                ..Default::default()
            },
            Pagination::default(),
        )
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].ingredient, "IBA");
}

#[tokio::test]
async fn list_filters_by_ingredient_substring() {
    let repo = setup().await;

    repo.create(sucrose()).await.unwrap();
    repo.create(CreateMediaRecord {
        ingredient: "Myo-inositol".into(),
        ..sucrose()
    })
    .await
    .unwrap();

    let page = repo
        .list(
            MediaRecordFilter {
                ingredient: Some("inositol".into()),
                ..Default::default()
            },
            Pagination::default(),
        )
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].ingredient, "Myo-inositol");
}

#[tokio::test]
async fn list_paginates_with_total() {
    let repo = setup().await;

    for i in 0..5 {
        repo.create(CreateMediaRecord {
            ingredient: format!("Component {i}"),
            ..sucrose()
        })
        .await
        .unwrap();
    }

    let page = repo
        .list(
            MediaRecordFilter::default(),
            Pagination {
                offset: 0,
                limit: 2,
            },
        )
        .await
        .unwrap();
    assert_eq!(page.total, 5);
    assert_eq!(page.items.len(), 2);

    let rest = repo
        .list(
            MediaRecordFilter::default(),
            Pagination {
                offset: 4,
                limit: 2,
            },
        )
        .await
        .unwrap();
    assert_eq!(rest.total, 5);
    assert_eq!(rest.items.len(), 1);
}

#[tokio::test]
async fn species_returns_distinct_values() {
    let repo = setup().await;

    repo.create(sucrose()).await.unwrap();
    repo.create(sucrose()).await.unwrap();
    repo.create(CreateMediaRecord {
        species: "Solanum tuberosum".into(),
        ..sucrose()
    })
    .await
    .unwrap();

    let mut species = repo.species().await.unwrap();
    species.sort();
    assert_eq!(species, vec!["Musa acuminata", "Solanum tuberosum"]);
}

#[tokio::test]
async fn validation_rejects_bad_input() {
    let repo = setup().await;

    let err = repo
        .create(CreateMediaRecord {
            species: "".into(),
            ..sucrose()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, VitroError::Validation { .. }));

    let err = repo
        .create(CreateMediaRecord {
            concentration: -1.0,
            ..sucrose()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, VitroError::Validation { .. }));
}
