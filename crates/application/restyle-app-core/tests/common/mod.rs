#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use restyle_app_core::{AppState, AppStore, GenerativeApi, RestyleKernel};
use restyle_core::{EncodedImage, MediaType, PromptSet, RestyleError};

pub fn png(tag: &str) -> EncodedImage {
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend_from_slice(tag.as_bytes());
    EncodedImage::from_bytes(&bytes, MediaType::Png, format!("{tag}.png")).unwrap()
}

/// What the stub returns for `synthesize_image(prompt, _)`.
pub fn image_for(prompt: &str) -> EncodedImage {
    png(&format!("generated:{prompt}"))
}

/// Deterministic stand-in for the remote service.
///
/// Prompts are derived from the reference image name as `<stem>-s`,
/// `<stem>-d` and `<stem>-t`.
#[derive(Default)]
pub struct StubApi {
    pub derive_calls: AtomicUsize,
    pub synth_calls: AtomicUsize,
    pub styled_calls: AtomicUsize,
    pub synth_in_flight: AtomicUsize,
    pub max_synth_in_flight: AtomicUsize,

    pub fixed_prompts: Option<PromptSet>,
    pub derive_error: Option<RestyleError>,
    pub synth_errors: HashMap<String, RestyleError>,
    pub styled_error: Option<RestyleError>,
    pub slow_reference: Option<(String, Duration)>,
    pub panic_on_styled: bool,
}

impl StubApi {
    pub fn network_calls(&self) -> usize {
        self.derive_calls.load(Ordering::SeqCst)
            + self.synth_calls.load(Ordering::SeqCst)
            + self.styled_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerativeApi for StubApi {
    async fn derive_prompts(&self, reference: &EncodedImage) -> Result<PromptSet, RestyleError> {
        self.derive_calls.fetch_add(1, Ordering::SeqCst);
        if let Some((name, delay)) = &self.slow_reference {
            if reference.name() == name {
                tokio::time::sleep(*delay).await;
            }
        }
        if let Some(err) = &self.derive_error {
            return Err(err.clone());
        }
        if let Some(prompts) = &self.fixed_prompts {
            return Ok(prompts.clone());
        }
        let stem = reference.name().trim_end_matches(".png");
        Ok(PromptSet::new(format!("{stem}-s"), format!("{stem}-d"), format!("{stem}-t")).unwrap())
    }

    async fn synthesize_image(
        &self,
        prompt: &str,
        _source: &EncodedImage,
    ) -> Result<EncodedImage, RestyleError> {
        self.synth_calls.fetch_add(1, Ordering::SeqCst);
        let now = self.synth_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_synth_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(10)).await;
        self.synth_in_flight.fetch_sub(1, Ordering::SeqCst);
        if let Some(err) = self.synth_errors.get(prompt) {
            return Err(err.clone());
        }
        Ok(image_for(prompt))
    }

    async fn synthesize_styled(
        &self,
        style: &EncodedImage,
        source: &EncodedImage,
    ) -> Result<EncodedImage, RestyleError> {
        self.styled_calls.fetch_add(1, Ordering::SeqCst);
        if self.panic_on_styled {
            panic!("stub service crashed");
        }
        if let Some(err) = &self.styled_error {
            return Err(err.clone());
        }
        Ok(png(&format!("styled:{}+{}", style.name(), source.name())))
    }
}

pub fn kernel(api: &Arc<StubApi>) -> RestyleKernel<StubApi> {
    RestyleKernel::with_shared_api(AppStore::default(), api.clone())
}

/// Applies worker events until the run is done or failed.
pub async fn run_to_end(kernel: &mut RestyleKernel<StubApi>) -> AppState {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !kernel.store.state().run.phase.is_terminal() {
            kernel.pump().await;
        }
    })
    .await
    .expect("run did not reach a terminal phase");
    kernel.store.state()
}
