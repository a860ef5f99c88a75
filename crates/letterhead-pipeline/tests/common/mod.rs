//! Shared test support: a scripted in-memory document service and snapshot
//! fixtures.

#![allow(dead_code)]

use async_trait::async_trait;
use letterhead_backend::DocumentService;
use letterhead_core::{
    LetterheadError, Mutation, MutationBatch, Result, RetryMode, RetryPolicy, Segment, Snapshot,
    StructuralElement, Table, TableCell, TableRow,
};
use letterhead_pipeline::{ImageSizePt, LayoutConfig, PollSettings};
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;

pub fn backend(status: u16, message: &str) -> LetterheadError {
    LetterheadError::Backend {
        status,
        message: message.to_string(),
    }
}

/// 1x2 layout table with cell boundaries at the given indices.
pub fn layout_table(left_start: u32, right_start: u32) -> Table {
    Table {
        rows: 1,
        columns: 2,
        table_rows: vec![TableRow {
            start_index: 0,
            table_cells: vec![
                TableCell {
                    start_index: left_start,
                    end_index: left_start + 2,
                },
                TableCell {
                    start_index: right_start,
                    end_index: right_start + 2,
                },
            ],
        }],
    }
}

fn segment(id: &str, content: Vec<StructuralElement>) -> Segment {
    Segment {
        segment_id: id.to_string(),
        content,
    }
}

fn table_element(start: u32, table: Table) -> StructuralElement {
    StructuralElement {
        start_index: start,
        end_index: start + 7,
        paragraph: None,
        table: Some(table),
    }
}

/// Snapshot of a freshly created document: body only.
pub fn empty_snapshot() -> Snapshot {
    Snapshot {
        document_id: "doc-1".to_string(),
        title: "Access Policy".to_string(),
        body: Segment::default(),
        headers: BTreeMap::new(),
        footers: BTreeMap::new(),
    }
}

/// Snapshot after the containers were created but before their tables
/// propagated.
pub fn containers_snapshot() -> Snapshot {
    let mut snapshot = empty_snapshot();
    snapshot
        .headers
        .insert("hdr-1".to_string(), segment("hdr-1", Vec::new()));
    snapshot
        .footers
        .insert("ftr-1".to_string(), segment("ftr-1", Vec::new()));
    snapshot
}

/// Snapshot once both layout tables are visible. Cell boundaries sit at
/// indices 1 and 3, so the content-insertion offsets are 2 and 4.
pub fn tables_snapshot() -> Snapshot {
    let mut snapshot = empty_snapshot();
    snapshot.headers.insert(
        "hdr-1".to_string(),
        segment("hdr-1", vec![table_element(0, layout_table(1, 3))]),
    );
    snapshot.footers.insert(
        "ftr-1".to_string(),
        segment("ftr-1", vec![table_element(0, layout_table(1, 3))]),
    );
    snapshot
}

/// Snapshot whose body contains tables at the given start indices.
pub fn body_tables_snapshot(starts: &[u32]) -> Snapshot {
    let mut snapshot = empty_snapshot();
    snapshot.body = Segment {
        segment_id: String::new(),
        content: starts
            .iter()
            .map(|&start| table_element(start, layout_table(start + 1, start + 3)))
            .collect(),
    };
    snapshot
}

/// Layout configuration with millisecond-scale delays for tests.
pub fn fast_layout_config() -> LayoutConfig {
    LayoutConfig {
        logo_uri: "https://assets.example.com/logo.png".to_string(),
        logo_size: Some(ImageSizePt {
            width: 110.5,
            height: 34.0,
        }),
        retry: RetryPolicy {
            max_attempts: 3,
            initial_delay: Duration::from_millis(5),
            max_delay: Duration::from_millis(20),
            multiplier: 2.0,
            mode: RetryMode::Strict,
        },
        polling: PollSettings {
            interval: Duration::from_millis(5),
            max_attempts: 5,
        },
        ..LayoutConfig::default()
    }
}

/// Scripted [`DocumentService`]: successive calls pop pre-arranged results
/// and every interaction is recorded for assertions.
#[derive(Default)]
pub struct ScriptedService {
    /// Snapshots returned by successive `get_document` calls; the last one
    /// repeats once the script runs out. An empty script is a 404.
    snapshots: Mutex<Vec<Snapshot>>,
    /// Outcomes of successive `batch_update` calls; `Ok` once exhausted.
    batch_results: Mutex<Vec<Result<()>>>,
    /// Outcomes of successive `create_document` calls; `Ok("doc-1")` once
    /// exhausted.
    create_results: Mutex<Vec<Result<String>>>,
    batches: Mutex<Vec<Vec<Mutation>>>,
    uploads: Mutex<Vec<(String, Option<String>)>>,
    get_calls: Mutex<u32>,
}

impl ScriptedService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshots(self, snapshots: Vec<Snapshot>) -> Self {
        *self.snapshots.lock().unwrap() = snapshots;
        self
    }

    pub fn with_batch_results(self, results: Vec<Result<()>>) -> Self {
        *self.batch_results.lock().unwrap() = results;
        self
    }

    pub fn with_create_results(self, results: Vec<Result<String>>) -> Self {
        *self.create_results.lock().unwrap() = results;
        self
    }

    /// Every committed batch, in call order.
    pub fn recorded_batches(&self) -> Vec<Vec<Mutation>> {
        self.batches.lock().unwrap().clone()
    }

    /// `(title, folder_id)` of every uploaded document.
    pub fn recorded_uploads(&self) -> Vec<(String, Option<String>)> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn get_calls(&self) -> u32 {
        *self.get_calls.lock().unwrap()
    }
}

#[async_trait]
impl DocumentService for ScriptedService {
    async fn resolve_folder(&self, _name: &str) -> Result<String> {
        Ok("folder-1".to_string())
    }

    async fn create_document(
        &self,
        title: &str,
        _html: &str,
        folder_id: Option<&str>,
    ) -> Result<String> {
        self.uploads
            .lock()
            .unwrap()
            .push((title.to_string(), folder_id.map(str::to_string)));
        let mut results = self.create_results.lock().unwrap();
        if results.is_empty() {
            Ok("doc-1".to_string())
        } else {
            results.remove(0)
        }
    }

    async fn get_document(&self, _document_id: &str) -> Result<Snapshot> {
        *self.get_calls.lock().unwrap() += 1;
        let mut snapshots = self.snapshots.lock().unwrap();
        match snapshots.len() {
            0 => Err(backend(404, "no snapshot scripted")),
            1 => Ok(snapshots[0].clone()),
            _ => Ok(snapshots.remove(0)),
        }
    }

    async fn batch_update(&self, _document_id: &str, batch: &MutationBatch) -> Result<()> {
        self.batches.lock().unwrap().push(batch.mutations().to_vec());
        let mut results = self.batch_results.lock().unwrap();
        if results.is_empty() {
            Ok(())
        } else {
            results.remove(0)
        }
    }
}
