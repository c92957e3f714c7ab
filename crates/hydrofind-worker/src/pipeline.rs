//! The Worker's per-message orchestration : receive, VALIDATE,
//! dispatch to the single/batch pipeline, then decide the
//! ack/nack/republish-with-backoff outcome and write the terminal TaskStore
//! state. Grounded in consumer loop shape
//! (`tasker-worker/src/worker/event_driven_processor.rs`) but simplified to
//! the single-message-in-flight model prefetch=1 implies.

use chrono::Utc;
use hydrofind_artifact::ArtifactBuilder;
use hydrofind_broker::{Broker, WorkMessage};
use hydrofind_catalog::CatalogAdapter;
use hydrofind_llm::LlmGateway;
use hydrofind_shared::{
    ErrorKind, HydroError, HydroResult, Task, TaskError, TaskKind, TaskResult, TaskStatus,
};
use hydrofind_store::TaskStoreClient;
use tracing::{info, instrument, warn};

use crate::batch::run_batch;
use crate::single::{classify_oracle_error, SinglePipeline, SingleOutcome, StageFailure};

pub struct Worker<'a> {
    pub broker: &'a Broker,
    pub llm: &'a LlmGateway,
    pub catalog: &'a CatalogAdapter,
    pub store: &'a (dyn TaskStoreClient + 'a),
    pub artifact_builder: ArtifactBuilder,
    pub max_retries: u32,
    pub partial_results_enabled: bool,
}

impl<'a> Worker<'a> {
    fn single_pipeline(&self) -> SinglePipeline<'a> {
        SinglePipeline {
            llm: self.llm,
            catalog: self.catalog,
            store: self.store,
            partial_results_enabled: self.partial_results_enabled,
        }
    }

    /// Run forever, one message at a time (prefetch=1: only one message in
    /// flight per worker). Returns only if `recv` itself fails unrecoverably
    /// (the broker connection is gone).
    pub async fn run_forever(&self) -> HydroResult<()> {
        loop {
            self.handle_next().await?;
        }
    }

    /// Block for the next message and run it through to ack/nack. Exposed
    /// alongside `run_forever` for callers (tests, a single-shot worker mode)
    /// that want one message processed at a time rather than an infinite loop.
    pub async fn handle_next(&self) -> HydroResult<()> {
        let (message, retry_count, delivery) = self.broker.recv().await?;
        let message = match message {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, "dropping undecodable delivery");
                return delivery.ack().await;
            }
        };
        let task_id = message.task_id().to_string();
        if let Err(e) = self.process(message, retry_count, delivery).await {
            warn!(task_id, error = %e, "failed to finalize message processing");
        }
        Ok(())
    }

    #[instrument(skip(self, message, delivery), fields(task_id = message.task_id()))]
    async fn process(
        &self,
        message: WorkMessage,
        retry_count: u32,
        delivery: hydrofind_broker::Delivery,
    ) -> HydroResult<()> {
        // VALIDATE: non-empty task_id and query/text. Invalid messages are
        // dead on arrival — ack-and-drop, no TaskStore interaction at all.
        let (query_or_text, is_batch) = match &message {
            WorkMessage::Single { query, .. } => (query.clone(), false),
            WorkMessage::Batch { text, .. } => (text.clone(), true),
        };
        if message.task_id().trim().is_empty() || query_or_text.trim().is_empty() {
            warn!("dropping malformed message (empty task_id or query/text)");
            return delivery.ack().await;
        }

        let outcome = if is_batch {
            self.process_batch(&query_or_text).await
        } else {
            self.process_single(&query_or_text).await
        };

        let persist_result = match outcome {
            Ok(write) => self.finalize(message.task_id(), write).await,
            Err(StageFailure::Retryable(e)) => {
                if hydrofind_shared::retry::should_retry(retry_count, self.max_retries) {
                    let delay = hydrofind_shared::retry::backoff_delay(retry_count);
                    info!(retry_count, delay_secs = delay.as_secs(), "retrying after transient failure");
                    tokio::time::sleep(delay).await;
                    self.broker.republish_with_retry(&message, retry_count + 1).await?;
                    return delivery.ack().await;
                } else {
                    warn!(retry_count, "retry budget exhausted, writing terminal error");
                    self.finalize_error(message.task_id(), e).await
                }
            }
            Err(StageFailure::Terminal(e)) => self.finalize_error(message.task_id(), e).await,
        };

        // PERSIST is the commit point: a write failure here is a
        // `persistence_failure` and nack-requeues so broker redelivery
        // drives re-attempt, distinct from the counted retry/backoff path
        // above.
        match persist_result {
            Ok(()) => delivery.ack().await,
            Err(e) => {
                warn!(error = %e, "TaskStore commit failed, nack-requeue");
                delivery.nack(true).await
            }
        }
    }

    async fn process_single(&self, query: &str) -> Result<Finalize, StageFailure> {
        let pipeline = self.single_pipeline();
        match pipeline.run(query).await? {
            SingleOutcome::Cache(result) => Ok(Finalize {
                status: TaskStatus::Completed,
                result: TaskResult::Single(result),
                build_artifact: false,
            }),
            SingleOutcome::Resolved(result) => {
                let completed = result.match_count > 0;
                Ok(Finalize {
                    status: if completed { TaskStatus::Completed } else { TaskStatus::Partial },
                    build_artifact: completed,
                    result: TaskResult::Single(result),
                })
            }
        }
    }

    async fn process_batch(&self, text: &str) -> Result<Finalize, StageFailure> {
        let lines = self.llm.split_batch(text).await.map_err(classify_oracle_error)?;
        let pipeline = self.single_pipeline();
        let batch = run_batch(&pipeline, &lines).await;
        Ok(Finalize { status: TaskStatus::Completed, result: TaskResult::Batch(batch), build_artifact: true })
    }

    /// Write the terminal success state, unless the task was canceled out
    /// from under the Worker ("canceled is sticky").
    async fn finalize(&self, task_id: &str, write: Finalize) -> HydroResult<()> {
        if self.is_canceled(task_id).await? {
            info!(task_id, "task canceled mid-flight, discarding result");
            return Ok(());
        }

        if write.build_artifact {
            // BUILD_ARTIFACT: confirm the artifact renders and leave a
            // reference under the task key; bytes are re-derived lazily by
            // the Download handler, not stored here.
            match self.artifact_builder.build(&write.result) {
                Ok(_) => self.store.put_excel_ref(task_id, task_id).await?,
                Err(e) => warn!(task_id, error = %e, "artifact render failed, skipping excel ref"),
            }
        }

        let now = Utc::now().timestamp();
        let task = self.load_or_new(task_id, &write.result, now).await?;
        let task = Task {
            status: write.status,
            updated_at: now,
            result: Some(write.result),
            error: None,
            ..task
        };
        self.store.put_task(&task).await.map_err(|e| self.nack_worthy(e))
    }

    async fn finalize_error(&self, task_id: &str, error: HydroError) -> HydroResult<()> {
        if self.is_canceled(task_id).await? {
            info!(task_id, "task canceled mid-flight, discarding error write");
            return Ok(());
        }
        let now = Utc::now().timestamp();
        let kind = error.kind().unwrap_or(ErrorKind::Internal);
        let task = self.load_or_new_bare(task_id, now).await?;
        let task = Task {
            status: TaskStatus::Error,
            updated_at: now,
            error: Some(TaskError { kind, message: error.to_string() }),
            ..task
        };
        self.store.put_task(&task).await.map_err(|e| self.nack_worthy(e))
    }

    async fn is_canceled(&self, task_id: &str) -> HydroResult<bool> {
        Ok(matches!(
            self.store.get_task(task_id).await?,
            Some(task) if task.status == TaskStatus::Canceled
        ))
    }

    async fn load_or_new(&self, task_id: &str, result: &TaskResult, now: i64) -> HydroResult<Task> {
        let kind = match result {
            TaskResult::Single(_) => TaskKind::Single,
            TaskResult::Batch(_) => TaskKind::Batch,
        };
        self.load_or_new_with_kind(task_id, kind, now).await
    }

    async fn load_or_new_bare(&self, task_id: &str, now: i64) -> HydroResult<Task> {
        self.load_or_new_with_kind(task_id, TaskKind::Single, now).await
    }

    async fn load_or_new_with_kind(&self, task_id: &str, kind: TaskKind, now: i64) -> HydroResult<Task> {
        Ok(match self.store.get_task(task_id).await? {
            Some(task) => task,
            None => Task::new_processing(task_id.to_string(), kind, String::new(), 0, now),
        })
    }

    /// The PERSIST commit write failed: `persistence_failure` is handled by
    /// nack-requeue, not the counted retry/backoff path, so this is
    /// deliberately surfaced as an error from `finalize`/`finalize_error` for
    /// the caller to turn into a nack rather than an ack.
    fn nack_worthy(&self, e: HydroError) -> HydroError {
        HydroError::persistence_failure(e.to_string())
    }
}

struct Finalize {
    status: TaskStatus,
    result: TaskResult,
    build_artifact: bool,
}
