use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use anyhow::Context;
use futures::future::join_all;
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::app_core::DomainEvent;
use crate::ports::GenerativeApi;
use crate::run::{RunEvent, RunId};
use restyle_core::{EncodedImage, PromptKind, PromptSet, RestyleError};

/// Sends events for one run, tagged with its id.
#[derive(Clone)]
pub struct RunReporter {
    tx: mpsc::Sender<DomainEvent>,
    run_id: RunId,
}

impl RunReporter {
    pub fn new(tx: mpsc::Sender<DomainEvent>, run_id: RunId) -> Self {
        Self { tx, run_id }
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    pub async fn emit(&self, ev: RunEvent) {
        let _ = self
            .tx
            .send(DomainEvent::Run {
                run_id: self.run_id,
                ev,
            })
            .await;
    }

    pub async fn fail(&self, err: RestyleError) {
        error!(
            run_id = %self.run_id,
            kind = ?err.kind(),
            detail = %err.detail(),
            "run failed"
        );
        self.emit(RunEvent::Failed {
            message: err.to_string(),
        })
        .await;
    }

    fn blocking_fail(&self, err: RestyleError) {
        error!(run_id = %self.run_id, detail = %err.detail(), "run could not start");
        let _ = self.tx.blocking_send(DomainEvent::Run {
            run_id: self.run_id,
            ev: RunEvent::Failed {
                message: err.to_string(),
            },
        });
    }
}

/// Style image plus source image to one synthesized image.
pub async fn single_shot<A: GenerativeApi + ?Sized>(
    api: &A,
    style: &EncodedImage,
    source: &EncodedImage,
    reporter: &RunReporter,
) {
    match api.synthesize_styled(style, source).await {
        Ok(image) => {
            info!(run_id = %reporter.run_id(), "single-shot run finished");
            reporter.emit(RunEvent::SingleImageReady { image }).await;
        }
        Err(e) => reporter.fail(e).await,
    }
}

/// Reference image to three prompts, then three concurrent syntheses.
///
/// Prompts are published before any synthesis starts. The run only succeeds
/// if all three syntheses do.
pub async fn multi_prompt<A: GenerativeApi + ?Sized>(
    api: &A,
    reference: &EncodedImage,
    source: &EncodedImage,
    reporter: &RunReporter,
) {
    let prompts = match api.derive_prompts(reference).await {
        Ok(prompts) => prompts,
        Err(e) => {
            reporter.fail(e).await;
            return;
        }
    };
    info!(run_id = %reporter.run_id(), "prompts derived");

    reporter
        .emit(RunEvent::PromptsReady {
            prompts: prompts.clone(),
        })
        .await;
    reporter.emit(RunEvent::SynthesisStarted).await;

    match synthesize_all(api, &prompts, source).await {
        Ok(images) => {
            info!(run_id = %reporter.run_id(), "multi-prompt run finished");
            reporter.emit(RunEvent::ImagesReady { images }).await;
        }
        Err(e) => reporter.fail(e).await,
    }
}

/// Runs one synthesis per prompt concurrently and waits for all of them.
/// On any failure the first error in kind order is returned and every
/// successful image is discarded.
pub async fn synthesize_all<A: GenerativeApi + ?Sized>(
    api: &A,
    prompts: &PromptSet,
    source: &EncodedImage,
) -> Result<Vec<(PromptKind, EncodedImage)>, RestyleError> {
    let results = join_all(prompts.iter().map(|(kind, prompt)| async move {
        (kind, api.synthesize_image(prompt, source).await)
    }))
    .await;

    results
        .into_iter()
        .map(|(kind, res)| res.map(|image| (kind, image)))
        .collect()
}

/// Starts flows on worker threads that drive the shared runtime.
pub struct RunOrchestrator<A> {
    api: Arc<A>,
    tx: mpsc::Sender<DomainEvent>,
}

impl<A: GenerativeApi> RunOrchestrator<A> {
    pub fn new(api: Arc<A>, tx: mpsc::Sender<DomainEvent>) -> Self {
        Self { api, tx }
    }

    pub fn start_single_shot(
        &self,
        style: EncodedImage,
        source: EncodedImage,
        run_id: RunId,
    ) -> anyhow::Result<()> {
        self.spawn_worker("restyle-single-shot", run_id, move |api, reporter| async move {
            single_shot(api.as_ref(), &style, &source, &reporter).await;
        })
    }

    pub fn start_multi_prompt(
        &self,
        reference: EncodedImage,
        source: EncodedImage,
        run_id: RunId,
    ) -> anyhow::Result<()> {
        self.spawn_worker("restyle-multi-prompt", run_id, move |api, reporter| async move {
            multi_prompt(api.as_ref(), &reference, &source, &reporter).await;
        })
    }

    fn spawn_worker<F, Fut>(&self, name: &str, run_id: RunId, flow: F) -> anyhow::Result<()>
    where
        F: FnOnce(Arc<A>, RunReporter) -> Fut + Send + 'static,
        Fut: Future<Output = ()>,
    {
        let api = self.api.clone();
        let reporter = RunReporter::new(self.tx.clone(), run_id);

        std::thread::Builder::new()
            .name(name.into())
            .spawn(move || {
                let rt = match crate::async_runtime::runtime() {
                    Ok(rt) => rt,
                    Err(e) => {
                        reporter.blocking_fail(RestyleError::Unknown(format!(
                            "failed to start async runtime: {e}"
                        )));
                        return;
                    }
                };
                // A panicking flow still ends its run.
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                    rt.block_on(flow(api, reporter.clone()))
                }));
                if outcome.is_err() {
                    reporter.blocking_fail(RestyleError::Unknown("run worker panicked".into()));
                }
            })
            .context("Failed to spawn run worker thread")?;

        Ok(())
    }
}
