//! Multi-document deployment driver.
//!
//! Documents are processed sequentially, one pipeline instance per
//! document, with no state shared between them. A failure is recorded
//! against its document and the run continues; only cancellation stops the
//! run early.

use crate::body;
use crate::cancel::CancelToken;
use crate::layout::{LayoutBuilder, LayoutConfig, LayoutReport};
use crate::retry::{self, RetryOutcome};
use letterhead_backend::DocumentService;
use letterhead_core::Result;
use tracing::{error, info};

/// A rendered document ready for upload.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub title: String,
    pub html: String,
}

/// Configuration for a deployment run.
#[derive(Debug, Clone)]
pub struct DeployConfig {
    /// Remote staging folder the documents are created in.
    pub folder_name: String,
    /// Insert a table of contents into each document body.
    pub toc: bool,
    /// Enable repeating header rows on body tables.
    pub repeat_table_headers: bool,
    pub layout: LayoutConfig,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            folder_name: "Document_Staging".to_string(),
            toc: true,
            repeat_table_headers: true,
            layout: LayoutConfig::default(),
        }
    }
}

/// Outcome of one document's deployment.
#[derive(Debug)]
pub struct DocumentOutcome {
    pub title: String,
    /// Remote id, present once the upload succeeded.
    pub document_id: Option<String>,
    pub result: Result<LayoutReport>,
}

impl DocumentOutcome {
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }
}

/// Summary of a deployment run.
#[derive(Debug, Default)]
pub struct DeploySummary {
    pub outcomes: Vec<DocumentOutcome>,
}

impl DeploySummary {
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded()).count()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// Deploys rendered documents and applies the corporate layout to each.
pub struct Deployer<'a, S: DocumentService + ?Sized> {
    service: &'a S,
    config: &'a DeployConfig,
    cancel: CancelToken,
}

impl<'a, S: DocumentService + ?Sized> Deployer<'a, S> {
    pub fn new(service: &'a S, config: &'a DeployConfig, cancel: CancelToken) -> Self {
        Self {
            service,
            config,
            cancel,
        }
    }

    /// Runs the deployment.
    ///
    /// Per-document failures are isolated: they are recorded in the summary
    /// and the run moves on to the next document.
    ///
    /// # Errors
    /// Only run-level failures error out: the staging folder cannot be
    /// resolved, or the run is cancelled before any document is processed.
    pub async fn run(&self, documents: &[RenderedDocument]) -> Result<DeploySummary> {
        info!(
            "deploying {} document(s) to folder '{}'",
            documents.len(),
            self.config.folder_name
        );
        let folder_id = retry::execute(
            "resolve staging folder",
            &self.config.layout.retry.strict(),
            &self.cancel,
            || self.service.resolve_folder(&self.config.folder_name),
        )
        .await
        .and_then(RetryOutcome::into_result)?;

        let mut summary = DeploySummary::default();
        for document in documents {
            if self.cancel.is_cancelled() {
                info!(
                    "deployment cancelled, {} document(s) not processed",
                    documents.len() - summary.outcomes.len()
                );
                break;
            }
            summary.outcomes.push(self.deploy_one(&folder_id, document).await);
        }

        info!(
            "deployment complete: {} succeeded, {} failed",
            summary.succeeded(),
            summary.failed()
        );
        Ok(summary)
    }

    async fn deploy_one(&self, folder_id: &str, document: &RenderedDocument) -> DocumentOutcome {
        let created = retry::execute(
            "create document",
            &self.config.layout.retry.strict(),
            &self.cancel,
            || {
                self.service
                    .create_document(&document.title, &document.html, Some(folder_id))
            },
        )
        .await
        .and_then(RetryOutcome::into_result);

        let document_id = match created {
            Ok(id) => id,
            Err(error) => {
                error!("'{}': upload failed: {error}", document.title);
                return DocumentOutcome {
                    title: document.title.clone(),
                    document_id: None,
                    result: Err(error),
                };
            }
        };
        info!("deployed '{}' ({document_id})", document.title);

        let result = self.structure(&document_id, &document.title).await;
        if let Err(error) = &result {
            error!("'{}': structuring failed: {error}", document.title);
        }
        DocumentOutcome {
            title: document.title.clone(),
            document_id: Some(document_id),
            result,
        }
    }

    /// Body enrichment followed by the layout phase sequence.
    async fn structure(&self, document_id: &str, title: &str) -> Result<LayoutReport> {
        if self.config.toc {
            body::insert_table_of_contents(
                self.service,
                &self.config.layout.retry,
                &self.cancel,
                document_id,
            )
            .await?;
        }
        if self.config.repeat_table_headers {
            body::repeat_table_headers(
                self.service,
                &self.config.layout.retry,
                &self.cancel,
                document_id,
            )
            .await?;
        }
        let mut builder = LayoutBuilder::new(self.service, &self.config.layout, self.cancel.clone());
        builder.run(document_id, title).await
    }
}
