// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Navigation toolbar.
//!
//! Open / previous / next buttons, the image counter and the current
//! sticky label.

use crate::i18n::Strings;

/// Result of toolbar interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    None,
    OpenImages,
    Previous,
    Next,
}

/// What the toolbar shows about the current position.
pub struct ToolbarStatus<'a> {
    /// (1-based index, count), when images are open
    pub position: Option<(usize, usize)>,
    pub sticky_label: &'a str,
}

/// Display the toolbar.
pub fn show(ui: &mut egui::Ui, status: &ToolbarStatus<'_>, strings: &Strings) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        if ui.button(strings.open_images).clicked() {
            action = ToolbarAction::OpenImages;
        }

        ui.separator();

        let (has_prev, has_next) = match status.position {
            Some((index, count)) => (index > 1, index < count),
            None => (false, false),
        };
        if ui
            .add_enabled(has_prev, egui::Button::new(strings.previous_image))
            .clicked()
        {
            action = ToolbarAction::Previous;
        }
        if let Some((index, count)) = status.position {
            ui.label(format!("{} / {}", index, count));
        }
        if ui
            .add_enabled(has_next, egui::Button::new(strings.next_image))
            .clicked()
        {
            action = ToolbarAction::Next;
        }

        ui.separator();

        let sticky = if status.sticky_label.is_empty() {
            "-"
        } else {
            status.sticky_label
        };
        ui.label(
            egui::RichText::new(format!("{}: {}", strings.sticky_label, sticky))
                .italics()
                .weak(),
        );
    });

    action
}
