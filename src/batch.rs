/*!
 * Batch script parsing.
 *
 * This module contains functionality for parsing many independent documents
 * concurrently, with a bounded number of in-flight jobs, per-document error
 * capture and progress tracking. One document's failure never aborts or
 * blocks its siblings.
 */

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use futures::stream::{self, StreamExt};
use log::{debug, warn};
use serde::Serialize;
use tokio::sync::Semaphore;

use crate::script_parser::{ParseOptions, ScriptParser};
use crate::script_types::ParsedScript;

/// One document submitted to a batch run
#[derive(Debug, Clone)]
pub struct BatchDocument {
    /// Caller-chosen identifier, typically the source path
    pub id: String,

    /// Raw script text
    pub text: String,

    /// Per-document parse options
    pub options: ParseOptions,
}

/// Per-document failure details
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BatchFailure {
    /// Stable error code, e.g. "empty_input"
    pub code: String,

    /// Human-readable message
    pub message: String,

    /// Identifier of the failed document
    pub document: String,
}

/// Outcome of parsing one document in a batch
#[derive(Debug, Serialize)]
pub struct BatchOutcome {
    /// Document identifier
    pub id: String,

    /// Parsed aggregate on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<ParsedScript>,

    /// Failure details on error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<BatchFailure>,
}

impl BatchOutcome {
    /// Whether this document parsed successfully
    pub fn is_success(&self) -> bool {
        self.script.is_some()
    }
}

/// Aggregate result of a batch run, outcomes in submission order
#[derive(Debug, Serialize)]
pub struct BatchReport {
    /// Per-document outcomes
    pub outcomes: Vec<BatchOutcome>,

    /// Count of documents parsed successfully
    pub succeeded: usize,

    /// Count of documents that failed validation
    pub failed: usize,
}

/// Batch parser fanning one [`ScriptParser`] out over many documents
pub struct BatchParser {
    /// Shared parser, safe to invoke concurrently
    parser: Arc<ScriptParser>,

    /// Maximum number of documents parsed at once
    max_concurrent_jobs: usize,
}

impl BatchParser {
    /// Create a new batch parser with the given concurrency bound
    pub fn new(max_concurrent_jobs: usize) -> Self {
        BatchParser {
            parser: Arc::new(ScriptParser::new()),
            max_concurrent_jobs: max_concurrent_jobs.max(1),
        }
    }

    /// Parse all documents, reporting progress as `(done, total)`.
    ///
    /// Document runs are fully independent; failures are captured in the
    /// per-document outcome and the report is assembled in submission
    /// order regardless of completion order.
    pub async fn parse_documents(
        &self,
        documents: Vec<BatchDocument>,
        progress_callback: impl Fn(usize, usize) + Clone + Send + 'static,
    ) -> BatchReport {
        let total = documents.len();
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent_jobs));
        let processed = Arc::new(AtomicUsize::new(0));

        let results = stream::iter(documents.into_iter().enumerate())
            .map(|(index, document)| {
                let parser = self.parser.clone();
                let semaphore = semaphore.clone();
                let processed = processed.clone();
                let progress_callback = progress_callback.clone();

                async move {
                    let _permit = semaphore.acquire().await.unwrap();

                    let start = Instant::now();
                    let result = parser.parse(&document.text, &document.options);

                    let current = processed.fetch_add(1, Ordering::SeqCst) + 1;
                    progress_callback(current, total);

                    match &result {
                        Ok(parsed) => debug!(
                            "Document '{}' parsed in {:?} ({} scene(s))",
                            document.id,
                            start.elapsed(),
                            parsed.total_scenes
                        ),
                        Err(e) => warn!("Document '{}' failed: {}", document.id, e),
                    }

                    (index, document.id, result)
                }
            })
            .buffer_unordered(self.max_concurrent_jobs)
            .collect::<Vec<_>>()
            .await;

        // Restore submission order before assembling the report.
        let mut sorted = results;
        sorted.sort_by_key(|(index, _, _)| *index);

        let mut outcomes = Vec::with_capacity(total);
        let mut succeeded = 0;
        let mut failed = 0;

        for (_, id, result) in sorted {
            match result {
                Ok(script) => {
                    succeeded += 1;
                    outcomes.push(BatchOutcome {
                        id,
                        script: Some(script),
                        error: None,
                    });
                }
                Err(e) => {
                    failed += 1;
                    let failure = BatchFailure {
                        code: e.code().to_string(),
                        message: e.to_string(),
                        document: id.clone(),
                    };
                    outcomes.push(BatchOutcome {
                        id,
                        script: None,
                        error: Some(failure),
                    });
                }
            }
        }

        BatchReport {
            outcomes,
            succeeded,
            failed,
        }
    }
}
