//! Integration tests for deposition evidence sequencing.

mod common;

use common::create_user;
use rollon_db::models::deposition::CreateDeposition;
use rollon_db::models::evidence::CreateEvidence;
use rollon_db::repositories::{DepositionRepo, EvidenceRepo};
use sqlx::PgPool;

async fn create_evidence(pool: &PgPool, uploader_id: i64, title: &str) -> i64 {
    EvidenceRepo::create(
        pool,
        &CreateEvidence {
            uploader_id,
            title: title.to_string(),
            file_path: format!("blobs/{title}.pdf"),
            file_type: "pdf".to_string(),
            size_bytes: Some(1024),
            case_tag: None,
        },
    )
    .await
    .expect("evidence creation should succeed")
    .id
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sequence_orders_by_position_then_insertion(pool: PgPool) {
    let lawyer = create_user(&pool, "compiler", "lawyer").await;
    let deposition = DepositionRepo::create(
        &pool,
        &CreateDeposition {
            author_id: lawyer.id,
            title: "Case summary".to_string(),
            content: None,
        },
    )
    .await
    .expect("deposition creation should succeed");

    let ev_a = create_evidence(&pool, lawyer.id, "exhibit-a").await;
    let ev_b = create_evidence(&pool, lawyer.id, "exhibit-b").await;
    let ev_c = create_evidence(&pool, lawyer.id, "exhibit-c").await;

    // Attach out of order, with a tie at position 1.
    DepositionRepo::attach_evidence(&pool, deposition.id, ev_c, 2, lawyer.id)
        .await
        .expect("attach should succeed");
    DepositionRepo::attach_evidence(&pool, deposition.id, ev_a, 1, lawyer.id)
        .await
        .expect("attach should succeed");
    DepositionRepo::attach_evidence(&pool, deposition.id, ev_b, 1, lawyer.id)
        .await
        .expect("attach should succeed");

    let sequence = DepositionRepo::list_sequence(&pool, deposition.id)
        .await
        .expect("sequence read should succeed");
    let ids: Vec<i64> = sequence.iter().map(|e| e.evidence_id).collect();

    // Position first; within the tie, the earlier attachment comes first.
    assert_eq!(ids, vec![ev_a, ev_b, ev_c]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_attach_violates_unique_constraint(pool: PgPool) {
    let lawyer = create_user(&pool, "compiler2", "lawyer").await;
    let deposition = DepositionRepo::create(
        &pool,
        &CreateDeposition {
            author_id: lawyer.id,
            title: "Dup check".to_string(),
            content: Some("Notes".to_string()),
        },
    )
    .await
    .expect("deposition creation should succeed");
    let ev = create_evidence(&pool, lawyer.id, "exhibit-dup").await;

    DepositionRepo::attach_evidence(&pool, deposition.id, ev, 0, lawyer.id)
        .await
        .expect("first attach should succeed");
    let err = DepositionRepo::attach_evidence(&pool, deposition.id, ev, 5, lawyer.id)
        .await
        .expect_err("re-attaching the same evidence must fail");

    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.constraint(), Some("uq_deposition_evidence"));
        }
        other => panic!("expected a database error, got {other:?}"),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_detach_removes_and_reports(pool: PgPool) {
    let lawyer = create_user(&pool, "compiler3", "lawyer").await;
    let deposition = DepositionRepo::create(
        &pool,
        &CreateDeposition {
            author_id: lawyer.id,
            title: "Detach check".to_string(),
            content: None,
        },
    )
    .await
    .expect("deposition creation should succeed");
    let ev = create_evidence(&pool, lawyer.id, "exhibit-detach").await;

    DepositionRepo::attach_evidence(&pool, deposition.id, ev, 0, lawyer.id)
        .await
        .expect("attach should succeed");

    let removed = DepositionRepo::detach_evidence(&pool, deposition.id, ev)
        .await
        .expect("detach should succeed");
    assert!(removed);

    let removed_again = DepositionRepo::detach_evidence(&pool, deposition.id, ev)
        .await
        .expect("detach should succeed");
    assert!(!removed_again, "second detach must report nothing removed");

    let sequence = DepositionRepo::list_sequence(&pool, deposition.id)
        .await
        .expect("sequence read should succeed");
    assert!(sequence.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_by_author_scopes_to_author(pool: PgPool) {
    let lawyer_a = create_user(&pool, "author_a", "lawyer").await;
    let lawyer_b = create_user(&pool, "author_b", "lawyer").await;

    DepositionRepo::create(
        &pool,
        &CreateDeposition {
            author_id: lawyer_a.id,
            title: "Mine".to_string(),
            content: None,
        },
    )
    .await
    .expect("deposition creation should succeed");

    let mine = DepositionRepo::list_by_author(&pool, lawyer_a.id)
        .await
        .expect("listing should succeed");
    let theirs = DepositionRepo::list_by_author(&pool, lawyer_b.id)
        .await
        .expect("listing should succeed");
    assert_eq!(mine.len(), 1);
    assert!(theirs.is_empty());
}
