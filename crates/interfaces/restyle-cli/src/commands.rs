use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use humansize::{format_size, DECIMAL};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, info};

use crate::{CliFlow, CliOutput};
use restyle_app_core::kernel::gemini_kernel;
use restyle_app_core::{
    status_line, uploader_vm, AppCommand, AppState, FlowKind, GenerativeApi, ImageRole,
    RestyleKernel, RunPhase,
};
use restyle_config::ApiConfig;
use restyle_core::{encode_file, EncodedImage, PromptKind, PromptSet};
use restyle_infra::GeminiClient;

/// A generated image saved to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedImage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<PromptKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    pub path: Utf8PathBuf,
    pub bytes: usize,
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub async fn cmd_prompts(
    config: &ApiConfig,
    reference: Utf8PathBuf,
    output: CliOutput,
) -> Result<PromptSet> {
    let image = encode_file(reference.as_std_path())
        .with_context(|| format!("Cannot use {reference} as a reference image"))?;
    let client = GeminiClient::from_config(config).context("Failed to build API client")?;

    let pb = spinner(RunPhase::DerivingPrompts.label());
    let prompts = client.derive_prompts(&image).await;
    pb.finish_and_clear();
    let prompts = prompts?;

    match output {
        CliOutput::Json => println!("{}", serde_json::to_string_pretty(&prompts)?),
        CliOutput::Text => {
            for (kind, prompt) in prompts.iter() {
                println!(":: {}", kind.title());
                println!("   {prompt}");
            }
        }
    }
    Ok(prompts)
}

/// Runs one flow against the configured service and saves its images.
pub async fn cmd_generate(
    config: &ApiConfig,
    flow: CliFlow,
    reference: Utf8PathBuf,
    source: Utf8PathBuf,
    out_dir: Utf8PathBuf,
    output: CliOutput,
) -> Result<Vec<SavedImage>> {
    let mut kernel = gemini_kernel(config)?;
    select(&mut kernel, ImageRole::Reference, &reference)?;
    select(&mut kernel, ImageRole::Source, &source)?;

    let flow = FlowKind::from(flow);
    let state = run(&mut kernel, flow).await?;

    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create output directory {out_dir}"))?;
    let saved = save_results(&state, flow, &out_dir)?;

    match output {
        CliOutput::Json => println!("{}", serde_json::to_string_pretty(&saved)?),
        CliOutput::Text => {
            for image in &saved {
                if let (Some(kind), Some(prompt)) = (image.kind, &image.prompt) {
                    println!(":: {}: {prompt}", kind.title());
                }
                println!(
                    "   Saved {} ({})",
                    image.path,
                    format_size(image.bytes as u64, DECIMAL)
                );
            }
        }
    }
    Ok(saved)
}

fn select<A: GenerativeApi>(
    kernel: &mut RestyleKernel<A>,
    role: ImageRole,
    path: &Utf8Path,
) -> Result<()> {
    kernel.dispatch(AppCommand::SelectImage {
        role,
        path: path.as_std_path().to_path_buf(),
    });

    let state = kernel.store.state();
    if uploader_vm(&state, role).file_name.is_some() {
        debug!(?role, %path, "selected");
        return Ok(());
    }
    match state.run.error_message {
        Some(msg) => Err(anyhow!(msg)),
        None => Err(anyhow!(
            "{path} was not accepted as the {}: only PNG and JPEG files are supported",
            role.title()
        )),
    }
}

/// Starts a run and applies its events until it finishes.
pub async fn run<A: GenerativeApi>(
    kernel: &mut RestyleKernel<A>,
    flow: FlowKind,
) -> Result<AppState> {
    kernel.dispatch(match flow {
        FlowKind::SingleShot => AppCommand::StartSingleShot,
        FlowKind::MultiPrompt => AppCommand::StartMultiPrompt,
    });

    let state = kernel.store.state();
    if state.run.run_id.is_none() {
        let msg = state.run.error_message.unwrap_or_else(|| "run did not start".into());
        return Err(anyhow!(msg));
    }

    let pb = spinner(&status_line(&state));
    while !kernel.store.state().run.phase.is_terminal() {
        if !kernel.pump().await {
            pb.finish_and_clear();
            return Err(anyhow!("run ended without a result"));
        }
        pb.set_message(status_line(&kernel.store.state()));
    }
    pb.finish_and_clear();

    let state = kernel.store.state();
    if state.run.phase == RunPhase::Failed {
        let msg = state.run.error_message.unwrap_or_default();
        return Err(anyhow!(msg));
    }
    info!(run_id = ?state.run.run_id, ?flow, "run done");
    Ok(state)
}

fn save_results(state: &AppState, flow: FlowKind, dir: &Utf8Path) -> Result<Vec<SavedImage>> {
    match flow {
        FlowKind::SingleShot => {
            let image = state
                .generated
                .as_ref()
                .context("Run finished without an image")?;
            Ok(vec![save_image(dir, "restyled", image, None, None)?])
        }
        FlowKind::MultiPrompt => state
            .slots
            .iter()
            .map(|slot| {
                let image = slot
                    .image
                    .as_ref()
                    .with_context(|| format!("{} result has no image", slot.title))?;
                save_image(
                    dir,
                    slot.kind.key(),
                    image,
                    Some(slot.kind),
                    slot.prompt.clone(),
                )
            })
            .collect(),
    }
}

fn save_image(
    dir: &Utf8Path,
    stem: &str,
    image: &EncodedImage,
    kind: Option<PromptKind>,
    prompt: Option<String>,
) -> Result<SavedImage> {
    let bytes = image.decode().context("Generated image is not valid base64")?;
    let path = dir.join(format!("{stem}.{}", image.media_type().file_extension()));
    std::fs::write(&path, &bytes).with_context(|| format!("Failed to write {path}"))?;
    Ok(SavedImage {
        kind,
        prompt,
        path,
        bytes: bytes.len(),
    })
}
