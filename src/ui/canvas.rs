// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing canvas for image display and box annotation.
//!
//! The canvas paints the current image, the committed boxes with their
//! labels and the in-progress draft. It does not change any state itself:
//! raw pointer input is translated into [`CanvasEvent`]s for the app to feed
//! into the controller.

use crate::controller::View;
use crate::models::annotation::{Annotation, Point, Rect};
use crate::models::session::palette_color;
use std::collections::BTreeSet;

/// Pixels scrolled per wheel "line".
const LINE_SCROLL_PIXELS: f32 = 40.0;
const LABEL_FONT_SIZE: f32 = 13.0;

/// Pointer input on the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasEvent {
    /// Primary button pressed, image coordinates.
    Press(Point),
    /// Pointer moved with the primary button held, image coordinates.
    Drag(Point),
    /// Primary button released, image coordinates.
    Release(Point),
    /// Wheel turned. `anchor` is canvas-local; `scroll` is in screen pixels.
    Wheel {
        notch: f64,
        zoom_modifier: bool,
        anchor: Point,
        scroll: (f64, f64),
    },
    /// Middle-button drag, screen pixels.
    Pan(f64, f64),
}

/// Everything the canvas needs to paint one frame.
pub struct CanvasContent<'a> {
    pub texture: &'a egui::TextureHandle,
    pub image_size: (u32, u32),
    pub annotations: &'a [Annotation],
    pub draft: Option<&'a Annotation>,
    pub selected: &'a BTreeSet<usize>,
}

fn color32(index: usize) -> egui::Color32 {
    let [r, g, b] = palette_color(index);
    egui::Color32::from_rgb(r, g, b)
}

/// Display the canvas and collect this frame's pointer input.
///
/// When `fit_pending` is set the view is first fit to the canvas size.
pub fn show(
    ui: &mut egui::Ui,
    content: &CanvasContent<'_>,
    view: &mut View,
    fit_pending: &mut bool,
) -> Vec<CanvasEvent> {
    let canvas_rect = ui.available_rect_before_wrap();
    let response = ui.allocate_rect(canvas_rect, egui::Sense::click_and_drag());
    let origin = canvas_rect.min;

    if *fit_pending && canvas_rect.width() > 0.0 && canvas_rect.height() > 0.0 {
        *view = View::fit(
            content.image_size,
            (canvas_rect.width() as f64, canvas_rect.height() as f64),
        );
        *fit_pending = false;
    }

    let map = ScreenMap { origin, view };

    let painter = ui.painter_at(canvas_rect);
    painter.rect_filled(canvas_rect, 0.0, egui::Color32::from_gray(40));

    let (w, h) = content.image_size;
    painter.image(
        content.texture.id(),
        map.rect(&Rect::new(0.0, 0.0, w as f64, h as f64)),
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        egui::Color32::WHITE,
    );

    let font = egui::FontId::proportional(LABEL_FONT_SIZE);
    let text_height = ui.fonts(|f| f.row_height(&font)) as f64;

    for (index, annotation) in content.annotations.iter().enumerate() {
        let width = if content.selected.contains(&index) { 4.0 } else { 2.0 };
        draw_annotation(&painter, &map, annotation, width, &font, text_height);
    }
    if let Some(draft) = content.draft {
        draw_annotation(&painter, &map, draft, 1.5, &font, text_height);
    }

    let mut events = Vec::new();
    ui.input(|i| {
        if response.hovered() {
            for event in &i.events {
                if let egui::Event::MouseWheel {
                    unit,
                    delta,
                    modifiers,
                } = event
                {
                    let pixels = match unit {
                        egui::MouseWheelUnit::Point => *delta,
                        egui::MouseWheelUnit::Line => *delta * LINE_SCROLL_PIXELS,
                        egui::MouseWheelUnit::Page => *delta * canvas_rect.height(),
                    };
                    let anchor = i.pointer.hover_pos().unwrap_or(canvas_rect.center());
                    events.push(CanvasEvent::Wheel {
                        notch: delta.y as f64,
                        zoom_modifier: modifiers.ctrl || modifiers.shift || modifiers.command,
                        anchor: Point::new(
                            (anchor.x - origin.x) as f64,
                            (anchor.y - origin.y) as f64,
                        ),
                        scroll: (pixels.x as f64, pixels.y as f64),
                    });
                }
            }
        }

        if i.pointer.primary_pressed() && response.hovered() {
            if let Some(pos) = i.pointer.interact_pos() {
                events.push(CanvasEvent::Press(map.to_image(pos)));
            }
        } else if i.pointer.primary_down() && i.pointer.delta() != egui::Vec2::ZERO {
            if let Some(pos) = i.pointer.latest_pos() {
                events.push(CanvasEvent::Drag(map.to_image(pos)));
            }
        }
        if i.pointer.primary_released() {
            if let Some(pos) = i.pointer.latest_pos() {
                events.push(CanvasEvent::Release(map.to_image(pos)));
            }
        }

        if i.pointer.middle_down() && response.hovered() {
            let d = i.pointer.delta();
            if d != egui::Vec2::ZERO {
                events.push(CanvasEvent::Pan(d.x as f64, d.y as f64));
            }
        }
    });

    events
}

/// Canvas-local view mapping anchored at the canvas origin.
struct ScreenMap<'a> {
    origin: egui::Pos2,
    view: &'a View,
}

impl ScreenMap<'_> {
    fn to_screen(&self, p: Point) -> egui::Pos2 {
        let s = self.view.image_to_screen(p);
        egui::pos2(self.origin.x + s.x as f32, self.origin.y + s.y as f32)
    }

    fn to_image(&self, p: egui::Pos2) -> Point {
        self.view.screen_to_image(Point::new(
            (p.x - self.origin.x) as f64,
            (p.y - self.origin.y) as f64,
        ))
    }

    fn rect(&self, r: &Rect) -> egui::Rect {
        egui::Rect::from_min_max(
            self.to_screen(Point::new(r.left, r.top)),
            self.to_screen(Point::new(r.right(), r.bottom())),
        )
    }
}

/// Paint one box with its label just above the top-left corner.
fn draw_annotation(
    painter: &egui::Painter,
    map: &ScreenMap<'_>,
    annotation: &Annotation,
    stroke_width: f32,
    font: &egui::FontId,
    text_height: f64,
) {
    let color = color32(annotation.color);
    painter.rect_stroke(
        map.rect(&annotation.rect()),
        0.0,
        egui::Stroke::new(stroke_width, color),
    );

    if annotation.is_labeled() {
        let pos = map.to_screen(annotation.label_position(text_height / map.view.scale));
        let galley = painter.layout_no_wrap(
            annotation.label.clone(),
            font.clone(),
            egui::Color32::WHITE,
        );
        let backing = egui::Rect::from_min_size(pos, galley.size()).expand(1.0);
        painter.rect_filled(backing, 2.0, color.gamma_multiply(0.6));
        painter.galley(pos, galley, egui::Color32::WHITE);
    }
}
