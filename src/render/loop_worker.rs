//! The render loop: keeps visible extracted elements in sync with playback.
//!
//! An extracted element is positioned independently of the underlying video,
//! so its raster surface must be refreshed every tick to stay a live copy
//! rather than a frozen snapshot. The loop runs only while the overlay is
//! active; transient failures (no decodable frame, degenerate rect) are
//! logged and retried next tick.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::time::{Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::extraction::ExtractionManager;
use crate::scene_index::SceneTimeIndex;
use crate::video::VideoSource;

use super::surface::resample_into;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = false;

use crate::{log_info, log_warn};

const RENDER_TICK_MS: u64 = 33;

pub async fn render_loop(
    video: Arc<dyn VideoSource>,
    scene_index: Arc<Mutex<SceneTimeIndex>>,
    manager: Arc<Mutex<ExtractionManager>>,
    cancel_token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(Duration::from_millis(RENDER_TICK_MS));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                render_tick(&video, &scene_index, &manager).await;
            }
            _ = cancel_token.cancelled() => {
                log_info!("render loop shutting down");
                break;
            }
        }
    }
}

async fn render_tick(
    video: &Arc<dyn VideoSource>,
    scene_index: &Arc<Mutex<SceneTimeIndex>>,
    manager: &Arc<Mutex<ExtractionManager>>,
) {
    let t = video.current_time();
    let active_scene = scene_index.lock().await.find_scene_at_time(t);
    let Some(active_scene) = active_scene else {
        return;
    };

    let mut manager = manager.lock().await;
    if !manager.scene_has_elements(active_scene) {
        return;
    }

    let Some(frame) = video.current_frame() else {
        log_info!("no decodable frame at t={t:.3}, skipping tick");
        return;
    };

    for element in manager.elements_for_scene_mut(active_scene) {
        if !element.is_canvas_view {
            continue;
        }
        if let Err(err) = resample_into(&frame, &element.source_rect, &mut element.surface) {
            log_warn!("resample failed for element {}: {err:?}", element.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventSink;
    use crate::extraction::ExtractionConfig;
    use crate::models::{BoundingBox, Detection, DisplayGeometry, Scene, ViewportSize};
    use image::{Rgba, RgbaImage};
    use std::sync::atomic::{AtomicU8, Ordering};

    /// In-memory video source whose frame color can be swapped between ticks.
    struct TestVideo {
        shade: AtomicU8,
    }

    impl TestVideo {
        fn new(shade: u8) -> Self {
            Self {
                shade: AtomicU8::new(shade),
            }
        }

        fn set_shade(&self, shade: u8) {
            self.shade.store(shade, Ordering::SeqCst);
        }
    }

    impl VideoSource for TestVideo {
        fn current_time(&self) -> f64 {
            1.0
        }

        fn duration(&self) -> f64 {
            60.0
        }

        fn intrinsic_size(&self) -> (u32, u32) {
            (640, 360)
        }

        fn current_frame(&self) -> Option<RgbaImage> {
            let s = self.shade.load(Ordering::SeqCst);
            Some(RgbaImage::from_pixel(640, 360, Rgba([s, s, s, 255])))
        }
    }

    fn setup(video: &Arc<TestVideo>) -> (Arc<Mutex<SceneTimeIndex>>, Arc<Mutex<ExtractionManager>>) {
        let mut scene = Scene::new(0, 0.0);
        scene.attach_detections(vec![Detection {
            class_name: "figure".into(),
            confidence: 0.9,
            bbox: BoundingBox::new(100.0, 100.0, 200.0, 180.0),
            text: None,
            ocr_class: None,
            ocr_source: None,
        }]);

        let display = DisplayGeometry::fit(ViewportSize::new(640.0, 360.0), 640, 360);
        let mut manager = ExtractionManager::new(EventSink::new());
        manager.extract_all(
            &scene,
            video.current_frame().as_ref(),
            &display,
            &ExtractionConfig::default(),
        );

        let index = SceneTimeIndex::build(std::slice::from_ref(&scene));
        (Arc::new(Mutex::new(index)), Arc::new(Mutex::new(manager)))
    }

    #[tokio::test]
    async fn tick_refreshes_visible_surfaces() {
        let video = Arc::new(TestVideo::new(50));
        let (index, manager) = setup(&video);

        video.set_shade(200);
        let video_dyn: Arc<dyn VideoSource> = video.clone();
        render_tick(&video_dyn, &index, &manager).await;

        let manager = manager.lock().await;
        let surface = &manager.elements()[0].surface;
        assert_eq!(*surface.get_pixel(0, 0), Rgba([200, 200, 200, 255]));
    }

    #[tokio::test]
    async fn text_mode_elements_are_not_redrawn() {
        let video = Arc::new(TestVideo::new(50));
        let (index, manager) = setup(&video);

        {
            let mut guard = manager.lock().await;
            let el = &mut guard.elements_mut()[0];
            el.ocr_text = Some("text".into());
            el.set_text_mode(true);
        }

        video.set_shade(200);
        let video_dyn: Arc<dyn VideoSource> = video.clone();
        render_tick(&video_dyn, &index, &manager).await;

        let manager = manager.lock().await;
        let surface = &manager.elements()[0].surface;
        assert_eq!(*surface.get_pixel(0, 0), Rgba([50, 50, 50, 255]));
    }
}
