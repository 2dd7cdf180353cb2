// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Modal label prompt, used both for editing one box and for labeling the
//! whole selection.

use crate::i18n::Strings;

/// Which boxes the prompt will relabel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelTarget {
    Edit(usize),
    Selected(Vec<usize>),
}

/// An open label prompt.
#[derive(Debug, Clone)]
pub struct LabelPrompt {
    pub target: LabelTarget,
    pub text: String,
    focused: bool,
}

impl LabelPrompt {
    pub fn new(target: LabelTarget, text: impl Into<String>) -> Self {
        Self {
            target,
            text: text.into(),
            focused: false,
        }
    }
}

/// Outcome of one frame of the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResult {
    Pending,
    Confirmed(String),
    Cancelled,
}

/// Display the prompt window.
pub fn show(ctx: &egui::Context, prompt: &mut LabelPrompt, strings: &Strings) -> PromptResult {
    let (title, message) = match prompt.target {
        LabelTarget::Edit(_) => (strings.edit_label_title, strings.edit_label_prompt),
        LabelTarget::Selected(_) => (strings.assign_label_title, strings.assign_label_prompt),
    };

    let mut result = PromptResult::Pending;
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(message);
            let edit = ui.text_edit_singleline(&mut prompt.text);
            if !prompt.focused {
                edit.request_focus();
                prompt.focused = true;
            }

            let enter = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            let escape = ui.input(|i| i.key_pressed(egui::Key::Escape));

            ui.horizontal(|ui| {
                if ui.button(strings.ok).clicked() || enter {
                    result = PromptResult::Confirmed(prompt.text.clone());
                }
                if ui.button(strings.cancel).clicked() || escape {
                    result = PromptResult::Cancelled;
                }
            });
        });
    result
}
