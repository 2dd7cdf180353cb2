// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation set for the currently loaded image.
//!
//! The store is write-through: every mutation rewrites the whole label file
//! before returning. When a write fails the in-memory change is kept and the
//! error is returned, so the caller can notify the user; the next mutation
//! retries the full rewrite.

use super::annotation::Annotation;
use super::session::Session;
use crate::io::label_file::{self, SkippedLine};
use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

/// Ordered boxes of one image, kept in sync with its label file.
#[derive(Debug)]
pub struct AnnotationStore {
    label_path: PathBuf,
    image_width: u32,
    image_height: u32,
    annotations: Vec<Annotation>,
    skipped: Vec<SkippedLine>,
    sync_warning: Option<String>,
}

impl AnnotationStore {
    /// Empty store bound to `label_path`. Does not touch the file.
    pub fn new(label_path: impl Into<PathBuf>, image_width: u32, image_height: u32) -> Self {
        Self {
            label_path: label_path.into(),
            image_width,
            image_height,
            annotations: Vec::new(),
            skipped: Vec::new(),
            sync_warning: None,
        }
    }

    /// Build the store for an image from its label file.
    ///
    /// Every box read from the file takes the next palette color. The sticky
    /// label is left alone whatever the file contains. A missing file means
    /// no boxes, and an empty file is created in its place.
    pub fn load_from(
        label_path: &Path,
        image_width: u32,
        image_height: u32,
        session: &mut Session,
    ) -> Result<Self> {
        let mut store = Self::new(label_path, image_width, image_height);

        let Some(text) = label_file::read_label_file(label_path)? else {
            match store.sync_to_file() {
                Ok(()) => log::info!("No label file yet, created {}", label_path.display()),
                Err(e) => {
                    log::warn!("Could not create empty label file: {:#}", e);
                    store.sync_warning = Some(format!("{:#}", e));
                }
            }
            return Ok(store);
        };

        let decoded = label_file::decode(&text, image_width, image_height);
        store.annotations = decoded
            .boxes
            .into_iter()
            .map(|b| Annotation::new(b.rect, b.label, session.next_color()))
            .collect();
        store.skipped = decoded.skipped;

        log::info!(
            "Loaded {} annotations from {} ({} lines skipped)",
            store.annotations.len(),
            label_path.display(),
            store.skipped.len()
        );
        Ok(store)
    }

    pub fn label_path(&self) -> &Path {
        &self.label_path
    }

    pub fn image_size(&self) -> (u32, u32) {
        (self.image_width, self.image_height)
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn get(&self, index: usize) -> Option<&Annotation> {
        self.annotations.get(index)
    }

    /// Mutable access for in-place geometry edits. Call
    /// [`Self::sync_to_file`] once the edit is finished.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Annotation> {
        self.annotations.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Malformed lines dropped by the last load.
    pub fn skipped_lines(&self) -> &[SkippedLine] {
        &self.skipped
    }

    /// Why the empty label file could not be created on load, if it failed.
    pub fn sync_warning(&self) -> Option<&str> {
        self.sync_warning.as_deref()
    }

    /// Commit a finished box.
    ///
    /// An unlabeled box takes the sticky label. A box that ends up labeled
    /// makes its label the new sticky label.
    pub fn add(&mut self, mut annotation: Annotation, session: &mut Session) -> Result<()> {
        if !annotation.is_labeled() && !session.sticky_label().is_empty() {
            annotation.label = session.sticky_label().to_string();
        }
        if annotation.is_labeled() {
            session.set_sticky_label(annotation.label.clone());
        }

        log::info!(
            "Added annotation {:?} at {:?}, total: {}",
            annotation.label,
            annotation.rect(),
            self.annotations.len() + 1
        );
        self.annotations.push(annotation);
        self.sync_to_file()
    }

    /// Rename one box. A non-empty label becomes the sticky label.
    pub fn update(&mut self, index: usize, label: &str, session: &mut Session) -> Result<()> {
        let Some(annotation) = self.annotations.get_mut(index) else {
            bail!("No annotation at index {}", index);
        };
        annotation.label = label.to_string();
        if !label.is_empty() {
            session.set_sticky_label(label);
        }
        log::info!("Renamed annotation {} to {:?}", index, label);
        self.sync_to_file()
    }

    /// Give every listed box the same label, even an empty one, and make it
    /// the sticky label.
    pub fn batch_update(
        &mut self,
        indices: &[usize],
        label: &str,
        session: &mut Session,
    ) -> Result<()> {
        for &index in indices {
            match self.annotations.get_mut(index) {
                Some(annotation) => annotation.label = label.to_string(),
                None => log::warn!("Ignoring batch label for missing index {}", index),
            }
        }
        session.set_sticky_label(label);
        log::info!("Labeled {} annotations as {:?}", indices.len(), label);
        self.sync_to_file()
    }

    /// Delete the listed boxes. Order and duplicates in `indices` don't matter.
    pub fn remove(&mut self, indices: &[usize]) -> Result<()> {
        let mut doomed = indices.to_vec();
        doomed.sort_unstable();
        doomed.dedup();
        for &index in doomed.iter().rev() {
            if index < self.annotations.len() {
                self.annotations.remove(index);
            }
        }
        log::info!("Deleted annotations, total: {}", self.annotations.len());
        self.sync_to_file()
    }

    /// Rewrite the label file from the current boxes, even when empty.
    pub fn sync_to_file(&self) -> Result<()> {
        let text = label_file::encode(&self.annotations, self.image_width, self.image_height);
        label_file::write_label_file(&self.label_path, &text)
    }
}
