// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Image sequence and navigation state.
//!
//! The project only tracks which images were opened and which one is
//! current. Annotations are never cached here: each image's boxes live in
//! its label file and are reloaded whenever that image becomes current.

use std::path::{Path, PathBuf};

/// The opened images and the navigation cursor.
#[derive(Debug, Clone, Default)]
pub struct Project {
    images: Vec<PathBuf>,
    current: usize,
}

impl Project {
    /// Create a project positioned on the first image.
    pub fn new(images: Vec<PathBuf>) -> Self {
        Self { images, current: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_image(&self) -> Option<&Path> {
        self.images.get(self.current).map(PathBuf::as_path)
    }

    pub fn image(&self, index: usize) -> Option<&Path> {
        self.images.get(index).map(PathBuf::as_path)
    }

    /// Index of the next image, if any. Does not move the cursor.
    pub fn next_index(&self) -> Option<usize> {
        (self.current + 1 < self.images.len()).then_some(self.current + 1)
    }

    /// Index of the previous image, if any. Does not move the cursor.
    pub fn previous_index(&self) -> Option<usize> {
        self.current.checked_sub(1)
    }

    /// Move the cursor once the image at `index` has loaded.
    pub fn select(&mut self, index: usize) {
        if index < self.images.len() {
            self.current = index;
        }
    }

    /// Window title for the current image, built from a
    /// `"... {index} ... {count} ... {name}"` pattern.
    pub fn title(&self, pattern: &str) -> Option<String> {
        let path = self.current_image()?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Some(
            pattern
                .replace("{index}", &(self.current + 1).to_string())
                .replace("{count}", &self.images.len().to_string())
                .replace("{name}", &name),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three() -> Project {
        Project::new(vec!["a.png".into(), "dir/b.jpg".into(), "c.bmp".into()])
    }

    #[test]
    fn test_navigation_does_not_wrap() {
        let mut project = three();
        assert_eq!(project.previous_index(), None);
        assert_eq!(project.next_index(), Some(1));

        project.select(2);
        assert_eq!(project.next_index(), None);
        assert_eq!(project.previous_index(), Some(1));
    }

    #[test]
    fn test_select_out_of_range_stays_put() {
        let mut project = three();
        project.select(1);
        project.select(7);
        assert_eq!(project.current_index(), 1);
        assert_eq!(project.current_image(), Some(Path::new("dir/b.jpg")));
    }

    #[test]
    fn test_title() {
        let mut project = three();
        project.select(1);
        assert_eq!(
            project.title("Image {index} of {count} - {name}").as_deref(),
            Some("Image 2 of 3 - b.jpg")
        );
        assert_eq!(Project::default().title("{name}"), None);
    }
}
