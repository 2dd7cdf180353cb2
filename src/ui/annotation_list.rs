// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation list panel.
//!
//! One row per box in store order, tinted with the box color. Rows support
//! multi-selection (ctrl toggles, shift extends), and a double-click opens
//! the label editor for that row.

use crate::i18n::Strings;
use crate::models::annotation::Annotation;
use crate::models::session::palette_color;
use std::collections::BTreeSet;

/// Result of list panel interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListAction {
    None,
    EditLabel(usize),
    AssignLabelToSelected,
    DeleteSelected,
}

/// Row selection, with the anchor used for shift-click ranges.
#[derive(Debug, Clone, Default)]
pub struct ListSelection {
    pub rows: BTreeSet<usize>,
    anchor: Option<usize>,
}

impl ListSelection {
    pub fn clear(&mut self) {
        self.rows.clear();
        self.anchor = None;
    }

    pub fn select_only(&mut self, index: usize) {
        self.rows.clear();
        self.rows.insert(index);
        self.anchor = Some(index);
    }

    pub fn toggle(&mut self, index: usize) {
        if !self.rows.remove(&index) {
            self.rows.insert(index);
        }
        self.anchor = Some(index);
    }

    pub fn extend_to(&mut self, index: usize) {
        let from = self.anchor.unwrap_or(index);
        self.rows.extend(from.min(index)..=from.max(index));
    }

    pub fn indices(&self) -> Vec<usize> {
        self.rows.iter().copied().collect()
    }
}

/// Display the list and its action buttons.
pub fn show(
    ui: &mut egui::Ui,
    annotations: &[Annotation],
    selection: &mut ListSelection,
    strings: &Strings,
) -> ListAction {
    let mut action = ListAction::None;

    ui.horizontal(|ui| {
        if ui.button(strings.assign_label).clicked() && !selection.rows.is_empty() {
            action = ListAction::AssignLabelToSelected;
        }
        if ui.button(strings.delete_annotation).clicked() && !selection.rows.is_empty() {
            action = ListAction::DeleteSelected;
        }
    });
    ui.separator();

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for (index, annotation) in annotations.iter().enumerate() {
                let [r, g, b] = palette_color(annotation.color);
                let selected = selection.rows.contains(&index);
                let stroke = if selected {
                    egui::Stroke::new(2.0, ui.visuals().selection.stroke.color)
                } else {
                    egui::Stroke::NONE
                };

                let row = egui::Frame::none()
                    .fill(egui::Color32::from_rgb(r, g, b))
                    .stroke(stroke)
                    .inner_margin(egui::Margin::symmetric(4.0, 2.0))
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.add(
                            egui::Label::new(
                                egui::RichText::new(strings.summary(annotation))
                                    .color(egui::Color32::BLACK),
                            )
                            .sense(egui::Sense::click()),
                        )
                    })
                    .inner;

                if row.double_clicked() {
                    selection.select_only(index);
                    action = ListAction::EditLabel(index);
                } else if row.clicked() {
                    let modifiers = ui.input(|i| i.modifiers);
                    if modifiers.shift {
                        selection.extend_to(index);
                    } else if modifiers.command || modifiers.ctrl {
                        selection.toggle(index);
                    } else {
                        selection.select_only(index);
                    }
                }
            }
        });

    action
}
