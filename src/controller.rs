// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Pointer interaction state machine.
//!
//! The canvas feeds raw pointer events (press, move, release, wheel) in
//! image coordinates; the [`Controller`] turns them into drawing, resizing
//! and selection against the current [`AnnotationStore`].
//!
//! ```text
//! Idle --press on empty area--> Drawing --release--> Idle (commit or discard)
//! Idle --press on a handle----> Resizing --release--> Idle (sync)
//! Idle --press on a box body--> Idle (selection reported to the caller)
//! ```

use crate::models::annotation::{Annotation, Handle, Point, Rect};
use crate::models::session::Session;
use crate::models::store::AnnotationStore;
use anyhow::Result;

/// Scale factor applied per wheel notch towards the user.
pub const ZOOM_IN_FACTOR: f64 = 1.15;
/// Scale factor applied per wheel notch away from the user.
pub const ZOOM_OUT_FACTOR: f64 = 0.85;

/// Where the controller is within a pointer interaction.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Drawing {
        origin: Point,
        draft: Annotation,
    },
    Resizing {
        index: usize,
    },
}

/// What a press did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    StartedDrawing,
    StartedResize { index: usize, handle: Handle },
    /// Pressed inside an existing box, away from its handles.
    Selected(usize),
    /// A press arrived mid-interaction and was ignored.
    Ignored,
}

/// What a release did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    Nothing,
    /// The draft was below the minimum size and was dropped.
    Discarded,
    Committed { index: usize },
    Resized { index: usize },
}

/// What a wheel event did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WheelOutcome {
    Zoomed { factor: f64 },
    /// No zoom modifier held; the caller should scroll as usual.
    PassThrough,
}

/// Mapping between image pixels and canvas-local screen points:
/// `screen = offset + image * scale`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
    pub scale: f64,
    pub offset: Point,
}

impl Default for View {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Point::new(0.0, 0.0),
        }
    }
}

impl View {
    /// Fit the whole image into the viewport, keeping aspect ratio, centered.
    pub fn fit(image_size: (u32, u32), viewport: (f64, f64)) -> Self {
        let (iw, ih) = (image_size.0.max(1) as f64, image_size.1.max(1) as f64);
        let scale = (viewport.0 / iw).min(viewport.1 / ih);
        let scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
        Self {
            scale,
            offset: Point::new(
                (viewport.0 - iw * scale) / 2.0,
                (viewport.1 - ih * scale) / 2.0,
            ),
        }
    }

    pub fn image_to_screen(&self, p: Point) -> Point {
        Point::new(
            self.offset.x + p.x * self.scale,
            self.offset.y + p.y * self.scale,
        )
    }

    pub fn screen_to_image(&self, p: Point) -> Point {
        Point::new(
            (p.x - self.offset.x) / self.scale,
            (p.y - self.offset.y) / self.scale,
        )
    }

    /// Scale by `factor` keeping the image point under `anchor` fixed.
    pub fn zoom_at(&mut self, anchor: Point, factor: f64) {
        self.offset = Point::new(
            anchor.x - (anchor.x - self.offset.x) * factor,
            anchor.y - (anchor.y - self.offset.y) * factor,
        );
        self.scale *= factor;
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.offset = Point::new(self.offset.x + dx, self.offset.y + dy);
    }
}

/// Zoom on a modified wheel event, anchored at the pointer (screen space).
pub fn handle_wheel(
    view: &mut View,
    delta_y: f64,
    zoom_modifier: bool,
    anchor: Point,
) -> WheelOutcome {
    if !zoom_modifier || delta_y == 0.0 {
        return WheelOutcome::PassThrough;
    }
    let factor = if delta_y > 0.0 {
        ZOOM_IN_FACTOR
    } else {
        ZOOM_OUT_FACTOR
    };
    view.zoom_at(anchor, factor);
    log::debug!("Zoom x{} -> scale {:.3}", factor, view.scale);
    WheelOutcome::Zoomed { factor }
}

/// Drives one pointer interaction at a time against the current store.
#[derive(Debug, Default)]
pub struct Controller {
    state: InteractionState,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    /// The box being drawn, for preview rendering.
    pub fn draft(&self) -> Option<&Annotation> {
        match &self.state {
            InteractionState::Drawing { draft, .. } => Some(draft),
            _ => None,
        }
    }

    /// Drop any interaction in progress. Used when the image changes.
    pub fn reset(&mut self) {
        self.state = InteractionState::Idle;
    }

    /// Primary button pressed at `point` (image coordinates).
    ///
    /// Handles win over bodies, and later boxes over earlier ones, matching
    /// draw order.
    pub fn press(
        &mut self,
        point: Point,
        store: &mut AnnotationStore,
        session: &mut Session,
    ) -> PressOutcome {
        if self.state != InteractionState::Idle {
            return PressOutcome::Ignored;
        }

        let handle_hit = store
            .annotations()
            .iter()
            .enumerate()
            .rev()
            .find_map(|(i, a)| a.hit_test_handle(point).map(|h| (i, h)));
        if let Some((index, handle)) = handle_hit {
            if let Some(annotation) = store.get_mut(index) {
                annotation.begin_resize(handle, point);
                self.state = InteractionState::Resizing { index };
                log::debug!("Resizing annotation {} by {:?}", index, handle);
                return PressOutcome::StartedResize { index, handle };
            }
        }

        let body_hit = store
            .annotations()
            .iter()
            .rposition(|a| a.rect().contains(point));
        if let Some(index) = body_hit {
            log::debug!("Selected annotation {}", index);
            return PressOutcome::Selected(index);
        }

        let draft = Annotation::new(Rect::at(point), "", session.next_color());
        self.state = InteractionState::Drawing {
            origin: point,
            draft,
        };
        log::debug!("Started drawing at ({:.1}, {:.1})", point.x, point.y);
        PressOutcome::StartedDrawing
    }

    /// Pointer moved to `point` with the button held.
    pub fn drag_to(&mut self, point: Point, store: &mut AnnotationStore) {
        match &mut self.state {
            InteractionState::Idle => {}
            InteractionState::Drawing { origin, draft } => {
                draft.set_rect(Rect::from_corners(*origin, point));
            }
            InteractionState::Resizing { index } => {
                if let Some(annotation) = store.get_mut(*index) {
                    annotation.apply_resize(point);
                }
            }
        }
    }

    /// Primary button released at `point`.
    ///
    /// A finished draft is committed through the store (which applies the
    /// sticky label) unless it is under the minimum size. A finished resize
    /// is synced to the label file. A write failure is returned after the
    /// in-memory change has been made.
    pub fn release(
        &mut self,
        point: Point,
        store: &mut AnnotationStore,
        session: &mut Session,
    ) -> Result<ReleaseOutcome> {
        self.drag_to(point, store);
        match std::mem::take(&mut self.state) {
            InteractionState::Idle => Ok(ReleaseOutcome::Nothing),
            InteractionState::Drawing { draft, .. } => {
                if !draft.rect().meets_minimum() {
                    log::debug!("Discarded undersized draft {:?}", draft.rect());
                    return Ok(ReleaseOutcome::Discarded);
                }
                store.add(draft, session)?;
                Ok(ReleaseOutcome::Committed {
                    index: store.len() - 1,
                })
            }
            InteractionState::Resizing { index } => {
                if let Some(annotation) = store.get_mut(index) {
                    annotation.end_resize();
                }
                store.sync_to_file()?;
                Ok(ReleaseOutcome::Resized { index })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation::MIN_SIZE;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        store: AnnotationStore,
        session: Session,
        controller: Controller,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let store = AnnotationStore::new(dir.path().join("img.txt"), 800, 600);
            Self {
                _dir: dir,
                store,
                session: Session::new(),
                controller: Controller::new(),
            }
        }

        fn draw(&mut self, from: (f64, f64), to: (f64, f64)) -> ReleaseOutcome {
            self.controller
                .press(Point::new(from.0, from.1), &mut self.store, &mut self.session);
            self.controller
                .drag_to(Point::new((from.0 + to.0) / 2.0, to.1), &mut self.store);
            self.controller
                .release(Point::new(to.0, to.1), &mut self.store, &mut self.session)
                .unwrap()
        }

        fn file(&self) -> String {
            std::fs::read_to_string(self.store.label_path()).unwrap()
        }
    }

    #[test]
    fn test_draw_and_commit_writes_line() {
        let mut f = Fixture::new();
        f.session.set_sticky_label("cat");
        assert_eq!(f.draw((100.0, 100.0), (300.0, 300.0)), ReleaseOutcome::Committed { index: 0 });
        assert_eq!(f.file(), "cat 0.25 0.3333333333333333 0.25 0.3333333333333333\n");
        assert_eq!(f.controller.state(), &InteractionState::Idle);
    }

    #[test]
    fn test_drawing_backwards_normalizes() {
        let mut f = Fixture::new();
        f.draw((300.0, 300.0), (100.0, 100.0));
        assert_eq!(f.store.annotations()[0].rect(), Rect::new(100.0, 100.0, 200.0, 200.0));
    }

    #[test]
    fn test_undersized_draft_is_discarded() {
        let mut f = Fixture::new();
        f.draw((10.0, 10.0), (60.0, 60.0));
        let before = f.file();

        assert_eq!(f.draw((100.0, 100.0), (102.0, 101.0)), ReleaseOutcome::Discarded);
        assert_eq!(f.store.len(), 1);
        assert_eq!(f.file(), before);
    }

    #[test]
    fn test_draft_visible_while_drawing() {
        let mut f = Fixture::new();
        f.controller
            .press(Point::new(50.0, 50.0), &mut f.store, &mut f.session);
        f.controller.drag_to(Point::new(20.0, 90.0), &mut f.store);
        let draft = f.controller.draft().unwrap();
        assert_eq!(draft.rect(), Rect::new(20.0, 50.0, 30.0, 40.0));
        assert_eq!(draft.label, "");
        assert!(f.store.is_empty());
    }

    #[test]
    fn test_sticky_label_carries_to_new_boxes() {
        let mut f = Fixture::new();
        f.draw((10.0, 10.0), (60.0, 60.0));
        assert_eq!(f.store.annotations()[0].label, "");

        f.store.update(0, "cat", &mut f.session).unwrap();
        f.draw((100.0, 100.0), (160.0, 160.0));
        f.draw((200.0, 200.0), (260.0, 260.0));

        let labels: Vec<&str> = f
            .store
            .annotations()
            .iter()
            .map(|a| a.label.as_str())
            .collect();
        assert_eq!(labels, ["cat", "cat", "cat"]);
    }

    #[test]
    fn test_each_press_on_empty_area_consumes_a_color() {
        let mut f = Fixture::new();
        f.draw((10.0, 10.0), (60.0, 60.0));
        f.draw((100.0, 100.0), (101.0, 101.0));
        f.draw((200.0, 200.0), (260.0, 260.0));

        let colors: Vec<usize> = f.store.annotations().iter().map(|a| a.color).collect();
        assert_eq!(colors, [0, 2]);
    }

    #[test]
    fn test_press_on_handle_resizes_and_syncs() {
        let mut f = Fixture::new();
        f.draw((100.0, 100.0), (300.0, 300.0));

        let outcome = f
            .controller
            .press(Point::new(301.0, 299.0), &mut f.store, &mut f.session);
        assert_eq!(
            outcome,
            PressOutcome::StartedResize {
                index: 0,
                handle: Handle::BottomRight
            }
        );
        f.controller.drag_to(Point::new(380.0, 320.0), &mut f.store);
        let released = f
            .controller
            .release(Point::new(501.0, 299.0), &mut f.store, &mut f.session)
            .unwrap();
        assert_eq!(released, ReleaseOutcome::Resized { index: 0 });

        let rect = f.store.annotations()[0].rect();
        assert_eq!(rect, Rect::new(100.0, 100.0, 400.0, 200.0));
        assert!(!f.store.annotations()[0].is_resizing());
        assert!(f.file().starts_with(" 0.375 "));
    }

    #[test]
    fn test_resize_past_opposite_edge_keeps_minimum() {
        let mut f = Fixture::new();
        f.draw((100.0, 100.0), (300.0, 300.0));
        f.controller
            .press(Point::new(100.0, 200.0), &mut f.store, &mut f.session);
        f.controller
            .release(Point::new(900.0, 200.0), &mut f.store, &mut f.session)
            .unwrap();
        let rect = f.store.annotations()[0].rect();
        assert_eq!(rect.left, 900.0);
        assert_eq!(rect.width, MIN_SIZE);
    }

    #[test]
    fn test_press_on_body_selects() {
        let mut f = Fixture::new();
        f.draw((100.0, 100.0), (300.0, 300.0));
        // Drawn from outside the first box, overlapping it
        f.draw((350.0, 350.0), (200.0, 200.0));
        assert_eq!(f.store.len(), 2);

        assert_eq!(
            f.controller
                .press(Point::new(260.0, 260.0), &mut f.store, &mut f.session),
            PressOutcome::Selected(1)
        );
        assert_eq!(
            f.controller
                .press(Point::new(120.0, 280.0), &mut f.store, &mut f.session),
            PressOutcome::Selected(0)
        );
        assert_eq!(f.controller.state(), &InteractionState::Idle);
    }

    #[test]
    fn test_release_when_idle_is_nothing() {
        let mut f = Fixture::new();
        let outcome = f
            .controller
            .release(Point::new(5.0, 5.0), &mut f.store, &mut f.session)
            .unwrap();
        assert_eq!(outcome, ReleaseOutcome::Nothing);
    }

    #[test]
    fn test_wheel_zoom_requires_modifier() {
        let mut view = View::default();
        assert_eq!(
            handle_wheel(&mut view, 1.0, false, Point::new(0.0, 0.0)),
            WheelOutcome::PassThrough
        );
        assert_eq!(view, View::default());

        handle_wheel(&mut view, 1.0, true, Point::new(0.0, 0.0));
        assert!((view.scale - 1.15).abs() < 1e-12);
        handle_wheel(&mut view, -3.0, true, Point::new(0.0, 0.0));
        assert!((view.scale - 1.15 * 0.85).abs() < 1e-12);
    }

    #[test]
    fn test_zoom_keeps_point_under_pointer() {
        let mut view = View::fit((800, 600), (400.0, 400.0));
        let anchor = Point::new(123.0, 77.0);
        let before = view.screen_to_image(anchor);
        view.zoom_at(anchor, ZOOM_IN_FACTOR);
        let after = view.screen_to_image(anchor);
        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
    }

    #[test]
    fn test_fit_centers_image() {
        let view = View::fit((800, 600), (400.0, 400.0));
        assert_eq!(view.scale, 0.5);
        assert_eq!(view.offset, Point::new(0.0, 50.0));
        let p = view.screen_to_image(Point::new(200.0, 200.0));
        assert_eq!(p, Point::new(400.0, 300.0));
    }
}
