//! Start/stop lifecycle for the render loop.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use log::info;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::extraction::ExtractionManager;
use crate::scene_index::SceneTimeIndex;
use crate::video::VideoSource;

use super::loop_worker::render_loop;

/// Owns the render loop task: spawned when the overlay is activated,
/// cancelled and joined when it is deactivated so no CPU burns while hidden.
pub struct RenderController {
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl RenderController {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn start(
        &mut self,
        video: Arc<dyn VideoSource>,
        scene_index: Arc<Mutex<SceneTimeIndex>>,
        manager: Arc<Mutex<ExtractionManager>>,
    ) -> Result<()> {
        if self.handle.is_some() {
            bail!("render loop already active");
        }

        info!("starting render loop");
        let cancel_token = CancellationToken::new();
        let token_clone = cancel_token.clone();

        let handle = tokio::spawn(render_loop(video, scene_index, manager, token_clone));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("render loop task failed to join")
                .map(|_| ())
        } else {
            Ok(())
        }
    }
}

impl Default for RenderController {
    fn default() -> Self {
        Self::new()
    }
}
