use std::sync::Arc;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::app_core::{AppCommand, AppStore, DomainEvent};
use crate::domain::{ImageRole, MULTI_PROMPT_MISSING_IMAGES, SINGLE_SHOT_MISSING_IMAGES};
use crate::orchestrator::RunOrchestrator;
use crate::ports::GenerativeApi;
use crate::run::{FlowKind, RunEvent, RunId};
use restyle_config::ApiConfig;
use restyle_core::{encode_file, RestyleError};
use restyle_infra::GeminiClient;

/// Owns the store, turns commands into events and runs, and applies worker
/// events while dropping those that belong to a superseded run.
pub struct RestyleKernel<A> {
    pub store: AppStore,
    orchestrator: RunOrchestrator<A>,
    last_run: Option<RunId>,

    tx: mpsc::Sender<DomainEvent>,
    rx: mpsc::Receiver<DomainEvent>,
}

/// Kernel talking to the real service, built from the startup configuration.
pub fn gemini_kernel(config: &ApiConfig) -> anyhow::Result<RestyleKernel<GeminiClient>> {
    let client = GeminiClient::from_config(config).context("Failed to build API client")?;
    Ok(RestyleKernel::new(AppStore::default(), client))
}

impl<A: GenerativeApi> RestyleKernel<A> {
    pub fn new(store: AppStore, api: A) -> Self {
        Self::with_shared_api(store, Arc::new(api))
    }

    pub fn with_shared_api(store: AppStore, api: Arc<A>) -> Self {
        let (tx, rx) = mpsc::channel(100);
        Self {
            store,
            orchestrator: RunOrchestrator::new(api, tx.clone()),
            last_run: None,
            tx,
            rx,
        }
    }

    pub fn dispatch(&mut self, cmd: AppCommand) {
        match cmd {
            AppCommand::SelectImage { role, path } => match encode_file(&path) {
                Ok(image) => {
                    debug!(?role, name = image.name(), "image selected");
                    self.store
                        .apply(DomainEvent::ImageSelected { role, image });
                }
                Err(e) if e.is_rejection() => {
                    // Selection stays as it was.
                    warn!(?role, path = %path.display(), error = %e, "image rejected");
                }
                Err(e) => {
                    error!(?role, path = %path.display(), error = %e, "failed to read image");
                    self.store.apply(DomainEvent::UserError(format!(
                        "Could not read {}: {e}",
                        path.display()
                    )));
                }
            },

            AppCommand::SelectEncoded { role, image } => {
                self.store.apply(DomainEvent::ImageSelected { role, image });
            }

            AppCommand::RemoveImage(role) => self.store.apply(DomainEvent::ImageRemoved(role)),

            AppCommand::StartSingleShot => self.start(FlowKind::SingleShot),
            AppCommand::StartMultiPrompt => self.start(FlowKind::MultiPrompt),

            AppCommand::Reset => self.store.apply(DomainEvent::Reset),
        }
    }

    fn start(&mut self, flow: FlowKind) {
        let selection = self.store.state().selection;
        let (Some(reference), Some(source)) = (
            selection.get(ImageRole::Reference).cloned(),
            selection.get(ImageRole::Source).cloned(),
        ) else {
            let message = match flow {
                FlowKind::SingleShot => SINGLE_SHOT_MISSING_IMAGES,
                FlowKind::MultiPrompt => MULTI_PROMPT_MISSING_IMAGES,
            };
            self.store
                .apply(DomainEvent::UserError(RestyleError::Validation(message.into()).to_string()));
            return;
        };

        let run_id = self.last_run.map_or_else(RunId::first, RunId::next);
        self.last_run = Some(run_id);
        self.store.apply(DomainEvent::RunStarted { run_id, flow });
        info!(%run_id, ?flow, "run started");

        let started = match flow {
            FlowKind::SingleShot => self
                .orchestrator
                .start_single_shot(reference, source, run_id),
            FlowKind::MultiPrompt => self
                .orchestrator
                .start_multi_prompt(reference, source, run_id),
        };

        if let Err(e) = started {
            let err = RestyleError::Unknown(format!("{e:#}"));
            error!(%run_id, detail = %err.detail(), "run could not start");
            self.store.apply(DomainEvent::Run {
                run_id,
                ev: RunEvent::Failed {
                    message: err.to_string(),
                },
            });
        }
    }

    /// Applies every pending worker event without waiting.
    pub fn tick(&mut self) {
        while let Ok(ev) = self.rx.try_recv() {
            self.accept(ev);
        }
    }

    /// Waits for the next worker event and applies it. Returns `false` once
    /// no further events can arrive.
    pub async fn pump(&mut self) -> bool {
        match self.rx.recv().await {
            Some(ev) => {
                self.accept(ev);
                true
            }
            None => false,
        }
    }

    fn accept(&self, ev: DomainEvent) {
        if let DomainEvent::Run { run_id, .. } = &ev {
            let current = self.store.state().run.run_id;
            if current != Some(*run_id) {
                debug!(stale = %run_id, ?current, "dropping event from superseded run");
                return;
            }
        }
        self.store.apply(ev);
    }

    pub fn current_run(&self) -> Option<RunId> {
        self.store.state().run.run_id
    }

    pub fn sender(&self) -> mpsc::Sender<DomainEvent> {
        self.tx.clone()
    }
}
