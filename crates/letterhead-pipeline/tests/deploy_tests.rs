//! Integration tests for the multi-document deployment driver.

mod common;

use common::{
    backend, body_tables_snapshot, containers_snapshot, fast_layout_config, tables_snapshot,
    ScriptedService,
};
use letterhead_core::{LetterheadError, Mutation};
use letterhead_pipeline::{CancelToken, DeployConfig, Deployer, RenderedDocument};

fn fast_deploy_config() -> DeployConfig {
    DeployConfig {
        folder_name: "Staging_QA".to_string(),
        toc: false,
        repeat_table_headers: false,
        layout: fast_layout_config(),
    }
}

fn document(title: &str) -> RenderedDocument {
    RenderedDocument {
        title: title.to_string(),
        html: format!("<html><body><h1>{title}</h1></body></html>"),
    }
}

#[tokio::test]
async fn test_failures_are_isolated_per_document() {
    // The first document dies in phase 1; the second sails through.
    let service = ScriptedService::new()
        .with_snapshots(vec![containers_snapshot(), tables_snapshot()])
        .with_create_results(vec![Ok("doc-1".to_string()), Ok("doc-2".to_string())])
        .with_batch_results(vec![Err(backend(400, "header already exists"))]);
    let config = fast_deploy_config();
    let deployer = Deployer::new(&service, &config, CancelToken::new());

    let summary = deployer
        .run(&[document("Access Policy"), document("Incident Response")])
        .await
        .unwrap();

    assert_eq!(summary.outcomes.len(), 2);
    assert_eq!(summary.succeeded(), 1);
    assert_eq!(summary.failed(), 1);

    let first = &summary.outcomes[0];
    assert_eq!(first.document_id.as_deref(), Some("doc-1"));
    assert!(matches!(
        first.result,
        Err(LetterheadError::Backend { status: 400, .. })
    ));

    let second = &summary.outcomes[1];
    assert_eq!(second.document_id.as_deref(), Some("doc-2"));
    assert!(second.succeeded());

    // Both documents were uploaded into the resolved folder.
    let uploads = service.recorded_uploads();
    assert_eq!(uploads.len(), 2);
    assert!(uploads
        .iter()
        .all(|(_, folder)| folder.as_deref() == Some("folder-1")));
}

#[tokio::test]
async fn test_upload_failure_is_isolated() {
    let service = ScriptedService::new()
        .with_snapshots(vec![containers_snapshot(), tables_snapshot()])
        .with_create_results(vec![
            Err(backend(403, "quota exceeded")),
            Ok("doc-2".to_string()),
        ]);
    let config = fast_deploy_config();
    let deployer = Deployer::new(&service, &config, CancelToken::new());

    let summary = deployer
        .run(&[document("Access Policy"), document("Incident Response")])
        .await
        .unwrap();

    let first = &summary.outcomes[0];
    assert!(first.document_id.is_none());
    assert!(matches!(
        first.result,
        Err(LetterheadError::Backend { status: 403, .. })
    ));
    assert!(summary.outcomes[1].succeeded());
}

#[tokio::test]
async fn test_toc_failure_is_contained() {
    let service = ScriptedService::new()
        .with_snapshots(vec![containers_snapshot(), tables_snapshot()])
        .with_batch_results(vec![Err(backend(400, "unsupported element"))]);
    let mut config = fast_deploy_config();
    config.toc = true;
    let deployer = Deployer::new(&service, &config, CancelToken::new());

    let summary = deployer.run(&[document("Access Policy")]).await.unwrap();

    assert_eq!(summary.succeeded(), 1);
    let batches = service.recorded_batches();
    // The rejected ToC batch came first; the layout still completed.
    assert!(matches!(
        batches[0][0],
        Mutation::InsertTableOfContents { index: 1 }
    ));
    assert_eq!(batches.len(), 5);
}

#[tokio::test]
async fn test_repeat_table_headers_targets_every_body_table() {
    let service = ScriptedService::new().with_snapshots(vec![
        body_tables_snapshot(&[5, 20]),
        containers_snapshot(),
        tables_snapshot(),
    ]);
    let mut config = fast_deploy_config();
    config.repeat_table_headers = true;
    let deployer = Deployer::new(&service, &config, CancelToken::new());

    let summary = deployer.run(&[document("Access Policy")]).await.unwrap();

    assert_eq!(summary.succeeded(), 1);
    let batches = service.recorded_batches();
    assert_eq!(batches[0].len(), 2);
    assert!(matches!(
        &batches[0][0],
        Mutation::SetTableHeaderRow { table_start_index: 5, row_indices } if row_indices == &[0]
    ));
    assert!(matches!(
        &batches[0][1],
        Mutation::SetTableHeaderRow { table_start_index: 20, row_indices } if row_indices == &[0]
    ));
}

#[tokio::test]
async fn test_cancelled_run_errors_before_uploading() {
    let service = ScriptedService::new();
    let config = fast_deploy_config();
    let cancel = CancelToken::new();
    cancel.cancel();
    let deployer = Deployer::new(&service, &config, cancel);

    let error = deployer
        .run(&[document("Access Policy")])
        .await
        .unwrap_err();

    assert!(matches!(error, LetterheadError::Cancelled));
    assert!(service.recorded_uploads().is_empty());
}
