//! The overlay engine: single owner of all mutable engine state.
//!
//! Everything the overlay does flows through this object — scene records,
//! the time index, extracted elements, gestures, highlighting, and the
//! render loop lifecycle. No module-level globals, so several engines can
//! coexist and teardown is just dropping the value.

use std::sync::Arc;

use anyhow::Result;
use log::{info, warn};
use tokio::sync::{broadcast, Mutex};

use crate::events::{EngineEvent, EventSink};
use crate::extraction::{ExtractionConfig, ExtractionManager};
use crate::highlight::CrossModalHighlighter;
use crate::interaction::{
    refresh_surfaces_for_viewport, HitRegion, InteractionController, PointerInput, WheelInput,
};
use crate::models::{
    Detection, DisplayGeometry, OcrItem, RelationshipTable, Scene, TranscriptLine, ViewportSize,
};
use crate::render::surface::{resample_into, resize_surface};
use crate::render::RenderController;
use crate::scene_index::SceneTimeIndex;
use crate::search::SearchNavigator;
use crate::video::VideoSource;

pub struct OverlayEngine {
    video: Arc<dyn VideoSource>,
    scenes: Vec<Scene>,
    scene_index: Arc<Mutex<SceneTimeIndex>>,
    manager: Arc<Mutex<ExtractionManager>>,
    interaction: InteractionController,
    highlighter: CrossModalHighlighter,
    render: RenderController,
    events: EventSink,
    extraction_config: ExtractionConfig,
    display: DisplayGeometry,
    overlay_active: bool,
}

impl OverlayEngine {
    pub fn new(video: Arc<dyn VideoSource>, viewport: ViewportSize) -> Self {
        let (iw, ih) = video.intrinsic_size();
        let display = DisplayGeometry::fit(viewport, iw, ih);
        let events = EventSink::new();

        Self {
            video,
            scenes: Vec::new(),
            scene_index: Arc::new(Mutex::new(SceneTimeIndex::new())),
            manager: Arc::new(Mutex::new(ExtractionManager::new(events.clone()))),
            interaction: InteractionController::new(),
            highlighter: CrossModalHighlighter::new(events.clone()),
            render: RenderController::new(),
            events,
            extraction_config: ExtractionConfig::default(),
            display,
            overlay_active: false,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.events.subscribe()
    }

    pub fn set_extraction_config(&mut self, config: ExtractionConfig) {
        self.extraction_config = config;
    }

    pub fn display_geometry(&self) -> &DisplayGeometry {
        &self.display
    }

    // ------------------------------------------------------------------
    // Backend records

    /// Replace the scene list and rebuild the time index.
    pub async fn load_scenes(&mut self, scenes: Vec<Scene>) {
        info!("loading {} scenes", scenes.len());
        self.scenes = scenes;
        self.scene_index.lock().await.rebuild(&self.scenes);
    }

    /// Append a scene that appeared after initial load.
    pub async fn append_scene(&mut self, scene: Scene) {
        self.scenes.push(scene);
        self.scene_index.lock().await.rebuild(&self.scenes);
    }

    /// Attach detection/OCR results that finished asynchronously. Existing
    /// scene objects are updated in place so cached references stay valid;
    /// the time index is rebuilt because scene content changed.
    pub async fn apply_scene_update(
        &mut self,
        scene_index: usize,
        detections: Option<Vec<Detection>>,
        ocr_results: Option<Vec<OcrItem>>,
    ) {
        let Some(scene) = self.scenes.iter_mut().find(|s| s.index == scene_index) else {
            return;
        };
        if let Some(detections) = detections {
            scene.attach_detections(detections);
        }
        if let Some(ocr) = ocr_results {
            scene.attach_ocr(ocr);
        }
        self.scene_index.lock().await.rebuild(&self.scenes);
    }

    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    pub fn set_transcript(&mut self, transcript: Vec<TranscriptLine>) {
        self.highlighter.set_transcript(transcript);
    }

    pub fn set_relationships(&mut self, table: RelationshipTable) {
        self.highlighter.set_relationships(table);
    }

    // ------------------------------------------------------------------
    // Overlay lifecycle

    pub fn is_overlay_active(&self) -> bool {
        self.overlay_active
    }

    /// Activate or deactivate the overlay. Activation starts the render
    /// loop; deactivation cancels it so nothing burns CPU while hidden.
    pub async fn set_overlay_active(&mut self, active: bool) -> Result<()> {
        if active == self.overlay_active {
            return Ok(());
        }
        self.overlay_active = active;

        if active {
            self.render.start(
                self.video.clone(),
                self.scene_index.clone(),
                self.manager.clone(),
            )?;
        } else {
            self.render.stop().await?;
        }
        Ok(())
    }

    /// The viewport was resized. Element fractions stay valid by
    /// construction; only the derived display mapping and the raster
    /// surfaces need refreshing.
    pub async fn set_viewport(&mut self, viewport: ViewportSize) {
        let (iw, ih) = self.video.intrinsic_size();
        self.display = DisplayGeometry::fit(viewport, iw, ih);

        let frame = self.video.current_frame();
        let mut manager = self.manager.lock().await;
        refresh_surfaces_for_viewport(&mut manager, &self.display, frame.as_ref());
    }

    // ------------------------------------------------------------------
    // Extraction

    pub async fn scene_at(&self, t: f64) -> Option<usize> {
        self.scene_index.lock().await.find_scene_at_time(t)
    }

    /// Extract all regions of the scene active at the current playback
    /// time. Returns the number of elements created (0 when the scene was
    /// already extracted).
    pub async fn extract_current_scene(&mut self) -> usize {
        let t = self.video.current_time();
        let Some(scene_index) = self.scene_at(t).await else {
            return 0;
        };
        self.extract_scene(scene_index).await
    }

    pub async fn extract_scene(&mut self, scene_index: usize) -> usize {
        let Some(scene) = self.scenes.iter().find(|s| s.index == scene_index) else {
            return 0;
        };
        let frame = self.video.current_frame();
        let mut manager = self.manager.lock().await;
        manager.extract_all(
            scene,
            frame.as_ref(),
            &self.display,
            &self.extraction_config,
        )
    }

    pub async fn delete_element(&mut self, element_id: &str) -> bool {
        self.interaction.forget(element_id);
        self.manager.lock().await.delete_element(element_id)
    }

    pub async fn clear_elements(&mut self) {
        self.interaction.clear();
        self.manager.lock().await.clear_all();
    }

    pub async fn element_count(&self) -> usize {
        self.manager.lock().await.len()
    }

    /// Run a closure against the element collection. Used by hosting code
    /// for rendering and inspection without cloning surfaces.
    pub async fn with_elements<R>(&self, f: impl FnOnce(&ExtractionManager) -> R) -> R {
        let manager = self.manager.lock().await;
        f(&manager)
    }

    pub async fn set_element_locked(&mut self, element_id: &str, locked: bool) {
        if let Some(element) = self.manager.lock().await.element_mut(element_id) {
            element.set_locked(locked);
        }
    }

    /// Toggle between text rendering and raster view. Returning to raster
    /// view resizes the surface to the current display rectangle; the
    /// element may have been moved or resized while it showed text.
    pub async fn set_element_text_mode(&mut self, element_id: &str, text_mode: bool) {
        let frame = self.video.current_frame();
        let viewport = self.display.viewport;
        if let Some(element) = self.manager.lock().await.element_mut(element_id) {
            element.set_text_mode(text_mode);
            if element.is_canvas_view {
                let rect = element.display_rect(viewport);
                resize_surface(&mut element.surface, rect.width, rect.height);
                if let Some(frame) = frame {
                    if let Err(err) =
                        resample_into(&frame, &element.source_rect, &mut element.surface)
                    {
                        warn!("text mode exit resample failed for {element_id}: {err:?}");
                    }
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Interaction

    /// Pointer-down over the overlay. Hit-tests the active scene's elements
    /// (top first) and starts a gesture when one is hit; returns the hit
    /// element id. Elements of other scenes are not being rendered and
    /// never capture the pointer.
    pub async fn pointer_down(&mut self, input: PointerInput) -> Option<String> {
        let active_scene = self.scene_at(self.video.current_time()).await;
        let manager = self.manager.lock().await;
        let (element_id, region) = crate::interaction::hit_test(
            &manager,
            active_scene,
            input.x,
            input.y,
            self.display.viewport,
        )?;
        let started = self.interaction.on_pointer_down(
            &manager,
            &element_id,
            input,
            region,
            self.display.viewport,
        );
        started.then_some(element_id)
    }

    pub async fn pointer_down_on(
        &mut self,
        element_id: &str,
        input: PointerInput,
        region: HitRegion,
    ) -> bool {
        let manager = self.manager.lock().await;
        self.interaction
            .on_pointer_down(&manager, element_id, input, region, self.display.viewport)
    }

    pub async fn pointer_move(&mut self, element_id: &str, input: PointerInput) {
        let frame = self.video.current_frame();
        let mut manager = self.manager.lock().await;
        self.interaction.on_pointer_move(
            &mut manager,
            element_id,
            input,
            self.display.viewport,
            frame.as_ref(),
        );
    }

    pub fn pointer_up(&mut self, element_id: &str) {
        self.interaction.on_pointer_up(element_id);
    }

    pub fn capture_lost(&mut self, element_id: &str) {
        self.interaction.on_capture_lost(element_id);
    }

    pub async fn wheel(&mut self, element_id: &str, wheel: WheelInput) {
        let frame = self.video.current_frame();
        let mut manager = self.manager.lock().await;
        self.interaction.on_wheel(
            &mut manager,
            element_id,
            wheel,
            self.display.viewport,
            frame.as_ref(),
        );
    }

    // ------------------------------------------------------------------
    // Cross-modal highlighting

    pub async fn set_highlight_enabled(&mut self, enabled: bool) {
        let mut manager = self.manager.lock().await;
        self.highlighter.set_enabled(enabled, &mut manager);
    }

    pub fn is_highlight_enabled(&self) -> bool {
        self.highlighter.is_enabled()
    }

    /// Playback-time update: drives the video → text highlight direction.
    pub async fn on_time_update(&mut self, t: f64) {
        let scene = self.scene_index.lock().await.find_scene_at_time(t);
        let mut manager = self.manager.lock().await;
        self.highlighter.on_time_update(t, scene, &mut manager);
    }

    /// Element click: drives the text direction and emits selection events.
    /// Returns the transcript line indices to highlight.
    pub async fn select_element(&mut self, element_id: &str) -> Vec<usize> {
        let manager = self.manager.lock().await;
        self.highlighter.on_element_selected(&manager, element_id)
    }

    // ------------------------------------------------------------------
    // Search

    /// Fuzzy search over transcript lines.
    pub fn search_transcript(&self, query: &str) -> SearchNavigator {
        SearchNavigator::search(
            self.highlighter.transcript().iter().map(|l| l.text.as_str()),
            query,
        )
    }

    /// Fuzzy search over recognized slide text across all scenes, in scene
    /// order.
    pub fn search_slide_text(&self, query: &str) -> SearchNavigator {
        let lines: Vec<&str> = self
            .scenes
            .iter()
            .flat_map(|s| s.ocr_results.iter().map(|item| item.text.as_str()))
            .collect();
        SearchNavigator::search(lines, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BoundingBox;
    use image::{Rgba, RgbaImage};
    use std::sync::atomic::{AtomicU64, Ordering};

    struct ScriptedVideo {
        time_ms: AtomicU64,
    }

    impl ScriptedVideo {
        fn new() -> Self {
            Self {
                time_ms: AtomicU64::new(0),
            }
        }

        fn seek(&self, t: f64) {
            self.time_ms.store((t * 1000.0) as u64, Ordering::SeqCst);
        }
    }

    impl VideoSource for ScriptedVideo {
        fn current_time(&self) -> f64 {
            self.time_ms.load(Ordering::SeqCst) as f64 / 1000.0
        }
        fn duration(&self) -> f64 {
            300.0
        }
        fn intrinsic_size(&self) -> (u32, u32) {
            (1920, 1080)
        }
        fn current_frame(&self) -> Option<RgbaImage> {
            Some(RgbaImage::from_pixel(1920, 1080, Rgba([60, 60, 60, 255])))
        }
    }

    fn scene_with_figure(index: usize, start: f64) -> Scene {
        let mut scene = Scene::new(index, start);
        scene.attach_detections(vec![Detection {
            class_name: "figure".into(),
            confidence: 0.9,
            bbox: BoundingBox::new(100.0, 100.0, 500.0, 400.0),
            text: None,
            ocr_class: None,
            ocr_source: None,
        }]);
        scene
    }

    async fn engine() -> (OverlayEngine, Arc<ScriptedVideo>) {
        let video = Arc::new(ScriptedVideo::new());
        let mut engine = OverlayEngine::new(video.clone(), ViewportSize::new(1280.0, 720.0));
        engine
            .load_scenes(vec![scene_with_figure(0, 0.0), scene_with_figure(1, 30.0)])
            .await;
        (engine, video)
    }

    #[tokio::test]
    async fn extract_current_scene_follows_playback_time() {
        let (mut engine, video) = engine().await;

        video.seek(35.0);
        let created = engine.extract_current_scene().await;
        assert_eq!(created, 1);
        engine
            .with_elements(|m| {
                assert_eq!(m.elements()[0].scene_index, 1);
            })
            .await;

        // Second trigger on the same scene: idempotent.
        assert_eq!(engine.extract_current_scene().await, 0);
    }

    #[tokio::test]
    async fn overlay_activation_controls_render_loop() {
        let (mut engine, _video) = engine().await;
        assert!(!engine.is_overlay_active());

        engine.set_overlay_active(true).await.unwrap();
        assert!(engine.is_overlay_active());
        // Re-activation is a no-op, not an error.
        engine.set_overlay_active(true).await.unwrap();

        engine.set_overlay_active(false).await.unwrap();
        assert!(!engine.is_overlay_active());
    }

    #[tokio::test]
    async fn viewport_resize_preserves_fractions() {
        let (mut engine, _video) = engine().await;
        engine.extract_scene(0).await;

        let (frac_pos, frac_size) = engine
            .with_elements(|m| {
                let e = &m.elements()[0];
                (e.position, e.size)
            })
            .await;

        engine.set_viewport(ViewportSize::new(640.0, 360.0)).await;

        engine
            .with_elements(|m| {
                let e = &m.elements()[0];
                assert!((e.position.x - frac_pos.x).abs() < 1e-12);
                assert!((e.size.width - frac_size.width).abs() < 1e-12);
                // Surface tracks the smaller display size.
                let rect = e.display_rect(ViewportSize::new(640.0, 360.0));
                assert_eq!(
                    e.surface.dimensions(),
                    (rect.width.round() as u32, rect.height.round() as u32)
                );
            })
            .await;
    }

    #[tokio::test]
    async fn pointer_down_hit_tests_and_drags() {
        let (mut engine, _video) = engine().await;
        engine.extract_scene(0).await;

        let rect = engine
            .with_elements(|m| m.elements()[0].display_rect(ViewportSize::new(1280.0, 720.0)))
            .await;

        let grab = PointerInput::at(rect.x + 10.0, rect.y + 10.0);
        let id = engine.pointer_down(grab).await.expect("element hit");
        engine
            .pointer_move(&id, PointerInput::at(grab.x + 50.0, grab.y))
            .await;
        engine.pointer_up(&id);

        let moved = engine
            .with_elements(|m| {
                m.element(&id)
                    .unwrap()
                    .display_rect(ViewportSize::new(1280.0, 720.0))
            })
            .await;
        assert!((moved.x - (rect.x + 50.0)).abs() < 1e-6);

        // Pointer-down on empty space hits nothing.
        assert!(engine.pointer_down(PointerInput::at(5.0, 5.0)).await.is_none());
    }

    #[tokio::test]
    async fn pointer_down_ignores_elements_of_inactive_scenes() {
        let (mut engine, video) = engine().await;

        video.seek(35.0);
        assert_eq!(engine.extract_current_scene().await, 1);
        let rect = engine
            .with_elements(|m| m.elements()[0].display_rect(ViewportSize::new(1280.0, 720.0)))
            .await;
        let center = PointerInput::at(rect.x + rect.width / 2.0, rect.y + rect.height / 2.0);

        // Back in scene 0 the element is no longer rendered; a click on its
        // old rectangle must fall through instead of starting a gesture.
        video.seek(5.0);
        assert!(engine.pointer_down(center).await.is_none());

        video.seek(35.0);
        assert!(engine.pointer_down(center).await.is_some());
    }

    #[tokio::test]
    async fn leaving_text_mode_refreshes_the_raster_surface() {
        let video = Arc::new(ScriptedVideo::new());
        let mut engine = OverlayEngine::new(video.clone(), ViewportSize::new(1280.0, 720.0));
        let mut scene = Scene::new(0, 0.0);
        scene.attach_detections(vec![Detection {
            class_name: "other-text".into(),
            confidence: 0.9,
            bbox: BoundingBox::new(100.0, 100.0, 500.0, 400.0),
            text: Some("loss surface".into()),
            ocr_class: Some(crate::models::TextClass::OtherText),
            ocr_source: None,
        }]);
        engine.load_scenes(vec![scene]).await;
        engine.extract_scene(0).await;

        let id = engine.with_elements(|m| m.elements()[0].id.clone()).await;
        engine.set_element_text_mode(&id, true).await;

        // Resize while the element renders text; the surface is left alone.
        let rect = engine
            .with_elements(|m| {
                m.element(&id)
                    .unwrap()
                    .display_rect(ViewportSize::new(1280.0, 720.0))
            })
            .await;
        engine
            .wheel(
                &id,
                WheelInput {
                    x: rect.x,
                    y: rect.y,
                    delta_y: -120.0,
                },
            )
            .await;

        // Returning to raster view must catch the surface up to the new size.
        engine.set_element_text_mode(&id, false).await;
        engine
            .with_elements(|m| {
                let e = m.element(&id).unwrap();
                assert!(e.is_canvas_view);
                let now = e.display_rect(ViewportSize::new(1280.0, 720.0));
                assert_eq!(
                    e.surface.dimensions(),
                    (now.width.round() as u32, now.height.round() as u32)
                );
                assert_eq!(*e.surface.get_pixel(0, 0), Rgba([60, 60, 60, 255]));
            })
            .await;
    }

    #[tokio::test]
    async fn delete_and_clear_tear_down_elements() {
        let (mut engine, _video) = engine().await;
        engine.extract_scene(0).await;
        engine.extract_scene(1).await;
        assert_eq!(engine.element_count().await, 2);

        let id = engine.with_elements(|m| m.elements()[0].id.clone()).await;
        assert!(engine.delete_element(&id).await);
        assert_eq!(engine.element_count().await, 1);

        engine.clear_elements().await;
        assert_eq!(engine.element_count().await, 0);

        // Clearing re-arms extraction.
        assert_eq!(engine.extract_scene(0).await, 1);
    }

    #[tokio::test]
    async fn incremental_updates_rebuild_the_index() {
        let video = Arc::new(ScriptedVideo::new());
        let mut engine = OverlayEngine::new(video.clone(), ViewportSize::new(1280.0, 720.0));
        engine.load_scenes(vec![Scene::new(0, 0.0)]).await;

        assert_eq!(engine.scene_at(45.0).await, Some(0));
        engine.append_scene(Scene::new(1, 40.0)).await;
        assert_eq!(engine.scene_at(45.0).await, Some(1));

        engine
            .apply_scene_update(
                1,
                Some(vec![Detection {
                    class_name: "figure".into(),
                    confidence: 0.5,
                    bbox: BoundingBox::new(0.0, 0.0, 50.0, 50.0),
                    text: None,
                    ocr_class: None,
                    ocr_source: None,
                }]),
                None,
            )
            .await;
        assert_eq!(engine.scenes()[1].detections().len(), 1);
    }

    #[tokio::test]
    async fn transcript_search_reaches_navigator() {
        let (mut engine, _video) = engine().await;
        engine.set_transcript(vec![
            TranscriptLine {
                start: 0.0,
                duration: 5.0,
                text: "gradient descent converges".into(),
            },
            TranscriptLine {
                start: 5.0,
                duration: 5.0,
                text: "unrelated remark".into(),
            },
        ]);

        let mut nav = engine.search_transcript("gradient");
        assert_eq!(nav.result_count(), 1);
        assert_eq!(nav.next().unwrap().line_index, 0);
    }
}
