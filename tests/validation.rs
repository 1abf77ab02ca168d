//! Integration tests for on-demand artifact validation

use std::collections::BTreeMap;

use tempfile::TempDir;

use marker_fetcher::app::{
    ChecksumTable, ChecksumVerifier, Response, Sha256Hash, StorageLayout, ValidationReport,
};
use marker_fetcher::AppError;

const ACCESSIONS: &[u8] = br#"[{"id":"NC_000001.10","chromosome":"1"}]"#;

fn accession_ids() -> Vec<String> {
    (1..=25).map(|n| format!("NC_{:06}.1", n)).collect()
}

fn marker_content(id: &str) -> Vec<u8> {
    format!(
        r#"[{{"id":"rs{}","alternate_ids":[],"gene_names":[],"accession_id":"{}","start":1,"end":2,"variants":[]}}]"#,
        id.len(),
        id
    )
    .into_bytes()
}

/// Write 25 valid marker artifacts and return a verifier expecting them
async fn create_populated_store(temp_dir: &TempDir) -> ChecksumVerifier {
    let layout = StorageLayout::new(temp_dir.path());
    layout.ensure_directories().await.unwrap();

    tokio::fs::write(layout.accessions_path(), ACCESSIONS)
        .await
        .unwrap();

    let mut digests = BTreeMap::new();
    for id in accession_ids() {
        let content = marker_content(&id);
        tokio::fs::write(layout.marker_path(&id), &content)
            .await
            .unwrap();
        digests.insert(id, Sha256Hash::digest(&content));
    }

    let table = ChecksumTable::new(Sha256Hash::digest(ACCESSIONS), digests);
    ChecksumVerifier::new(table, layout)
}

#[tokio::test]
async fn test_all_artifacts_valid() {
    let temp_dir = TempDir::new().unwrap();
    let verifier = create_populated_store(&temp_dir).await;

    let report = verifier.validate_all().await.unwrap();

    assert!(report.accession);
    assert_eq!(report.markers.len(), 25);
    assert!(report.is_successful());
}

#[tokio::test]
async fn test_one_corrupted_file_among_twenty_five() {
    let temp_dir = TempDir::new().unwrap();
    let verifier = create_populated_store(&temp_dir).await;

    let corrupted = "NC_000013.1";
    let path = verifier.layout().marker_path(corrupted);
    let mut content = tokio::fs::read(&path).await.unwrap();
    content[0] = b' ';
    tokio::fs::write(&path, content).await.unwrap();

    let report = verifier.validate_all().await.unwrap();

    assert!(report.accession);
    assert_eq!(report.markers.values().filter(|valid| !**valid).count(), 1);
    assert_eq!(report.invalid_markers(), vec![corrupted]);
    assert_eq!(report.valid_count(), 24);
}

#[tokio::test]
async fn test_missing_files_are_invalid_not_errors() {
    let temp_dir = TempDir::new().unwrap();
    let verifier = create_populated_store(&temp_dir).await;

    tokio::fs::remove_file(verifier.layout().accessions_path())
        .await
        .unwrap();
    tokio::fs::remove_file(verifier.layout().marker_path("NC_000001.1"))
        .await
        .unwrap();

    let report = verifier.validate_all().await.unwrap();

    assert!(!report.accession);
    assert_eq!(report.invalid_markers(), vec!["NC_000001.1"]);
}

#[tokio::test]
async fn test_report_envelope_shape() {
    let temp_dir = TempDir::new().unwrap();
    let verifier = create_populated_store(&temp_dir).await;

    let report = verifier.validate_all().await.unwrap();
    let value = serde_json::to_value(Response::ok(report)).unwrap();

    assert_eq!(value["success"], serde_json::json!(true));
    assert_eq!(value["data"]["accession"], serde_json::json!(true));
    assert_eq!(
        value["data"]["markers"]["NC_000025.1"],
        serde_json::json!(true)
    );
    assert!(value.get("error").is_none());
}

#[tokio::test]
async fn test_unreadable_artifact_fails_validation_run() {
    let temp_dir = TempDir::new().unwrap();
    let verifier = create_populated_store(&temp_dir).await;

    let path = verifier.layout().marker_path("NC_000007.1");
    tokio::fs::remove_file(&path).await.unwrap();
    tokio::fs::create_dir(&path).await.unwrap();

    let result = verifier.validate_all().await;

    let error = AppError::from(result.unwrap_err());
    let envelope = Response::<ValidationReport>::failed(&error);
    assert!(!envelope.success);
    assert_eq!(envelope.error.unwrap().kind, "storage_unavailable");
}
