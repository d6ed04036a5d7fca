/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Upload bridging between page file inputs and the native picker.
//!
//! The controller holds at most one [`FileSelectionCallback`] at a time.
//! Each callback resolves exactly once: either explicitly through
//! [`FileSelectionCallback::resolve`], which consumes it, or with an empty
//! selection when it is dropped unresolved.

use std::path::PathBuf;

/// What the page asked for.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileChooserParams {
    /// Raw `accept` tokens: MIME types (`image/png`, `image/*`) or
    /// extensions (`.pdf`).
    pub accept_types: Vec<String>,
    pub multiple: bool,
    /// The input asked for direct capture (camera) rather than a file.
    pub capture: bool,
}

impl FileChooserParams {
    /// Extensions usable as a native dialog filter, deduplicated, without
    /// leading dots. Empty means "any file".
    pub fn extensions(&self) -> Vec<String> {
        let mut extensions: Vec<String> = Vec::new();
        for token in &self.accept_types {
            let token = token.trim().to_ascii_lowercase();
            let found: Vec<String> = if let Some(extension) = token.strip_prefix('.') {
                vec![extension.to_string()]
            } else {
                mime_guess::get_mime_extensions_str(&token)
                    .map(|known| known.iter().map(|ext| ext.to_string()).collect())
                    .unwrap_or_default()
            };
            for extension in found {
                if !extension.is_empty() && !extensions.contains(&extension) {
                    extensions.push(extension);
                }
            }
        }
        extensions
    }
}

/// Files handed back to the page. Empty on cancel or failure.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileSelection {
    pub files: Vec<PathBuf>,
}

impl FileSelection {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl From<Vec<PathBuf>> for FileSelection {
    fn from(files: Vec<PathBuf>) -> Self {
        Self { files }
    }
}

/// How a native picker flow ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilePickerOutcome {
    Selected(Vec<PathBuf>),
    Cancelled,
    Failed(String),
}

impl FilePickerOutcome {
    pub fn into_selection(self) -> FileSelection {
        match self {
            Self::Selected(files) => FileSelection::from(files),
            Self::Cancelled => FileSelection::empty(),
            Self::Failed(e) => {
                log::warn!("file picker failed: {e}");
                FileSelection::empty()
            },
        }
    }
}

/// Single-use result handle for one page file-chooser request.
pub struct FileSelectionCallback {
    deliver: Option<Box<dyn FnOnce(FileSelection)>>,
}

impl FileSelectionCallback {
    pub fn new<F>(deliver: F) -> Self
    where
        F: FnOnce(FileSelection) + 'static,
    {
        Self {
            deliver: Some(Box::new(deliver)),
        }
    }

    pub fn resolve(mut self, selection: FileSelection) {
        if let Some(deliver) = self.deliver.take() {
            deliver(selection);
        }
    }
}

impl Drop for FileSelectionCallback {
    fn drop(&mut self) {
        if let Some(deliver) = self.deliver.take() {
            deliver(FileSelection::empty());
        }
    }
}

impl std::fmt::Debug for FileSelectionCallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSelectionCallback")
            .field("resolved", &self.deliver.is_none())
            .finish()
    }
}

/// Ties a native picker flow to the request that opened it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PickerRequestId(u64);

impl std::fmt::Display for PickerRequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "picker request {}", self.0)
    }
}

/// The one outstanding file-selection request, if any.
///
/// Every stored callback gets a fresh [`PickerRequestId`]; only a completion
/// carrying the current id can resolve it.
#[derive(Debug, Default)]
pub struct PendingFileSelection {
    slot: Option<(PickerRequestId, FileSelectionCallback)>,
    last_id: u64,
}

impl PendingFileSelection {
    pub fn is_pending(&self) -> bool {
        self.slot.is_some()
    }

    pub fn current(&self) -> Option<PickerRequestId> {
        self.slot.as_ref().map(|(id, _)| *id)
    }

    /// Resolve any stale request with an empty selection, then hold
    /// `callback` under a new id. Returns the id and whether a stale request
    /// was discarded.
    pub fn replace(&mut self, callback: FileSelectionCallback) -> (PickerRequestId, bool) {
        let discarded = self.discard();
        self.last_id += 1;
        let id = PickerRequestId(self.last_id);
        self.slot = Some((id, callback));
        (id, discarded)
    }

    /// Resolve the pending request with `selection` and clear the slot.
    /// Returns `false`, leaving the slot alone, when `id` is not the pending
    /// request.
    pub fn resolve(&mut self, id: PickerRequestId, selection: FileSelection) -> bool {
        if self.current() != Some(id) {
            return false;
        }
        match self.slot.take() {
            Some((_, callback)) => {
                callback.resolve(selection);
                true
            },
            None => false,
        }
    }

    /// Resolve the pending request, whichever it is, with an empty selection.
    pub fn discard(&mut self) -> bool {
        match self.slot.take() {
            Some((_, callback)) => {
                callback.resolve(FileSelection::empty());
                true
            },
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::recording_callback;

    #[test]
    fn dropped_callback_resolves_empty_once() {
        let (callback, results) = recording_callback();
        drop(callback);
        assert_eq!(*results.borrow(), vec![FileSelection::empty()]);
    }

    #[test]
    fn resolved_callback_does_not_resolve_again_on_drop() {
        let (callback, results) = recording_callback();
        callback.resolve(FileSelection::from(vec![PathBuf::from("/tmp/a.png")]));
        assert_eq!(results.borrow().len(), 1);
        assert_eq!(results.borrow()[0].files, vec![PathBuf::from("/tmp/a.png")]);
    }

    #[test]
    fn replace_discards_stale_request_first() {
        let mut pending = PendingFileSelection::default();
        let (first, first_results) = recording_callback();
        let (second, second_results) = recording_callback();

        let (first_id, discarded) = pending.replace(first);
        assert!(!discarded);
        let (second_id, discarded) = pending.replace(second);
        assert!(discarded);
        assert_ne!(first_id, second_id);

        assert_eq!(*first_results.borrow(), vec![FileSelection::empty()]);
        assert!(second_results.borrow().is_empty());
        assert!(pending.is_pending());
    }

    #[test]
    fn resolve_clears_slot() {
        let mut pending = PendingFileSelection::default();
        let (callback, results) = recording_callback();
        let (id, _) = pending.replace(callback);

        assert!(pending.resolve(id, FileSelection::from(vec![PathBuf::from("/tmp/doc.pdf")])));
        assert!(!pending.is_pending());
        assert!(!pending.resolve(id, FileSelection::empty()));
        assert_eq!(results.borrow().len(), 1);
    }

    #[test]
    fn completion_for_replaced_request_is_ignored() {
        let mut pending = PendingFileSelection::default();
        let (first, first_results) = recording_callback();
        let (second, second_results) = recording_callback();
        let (first_id, _) = pending.replace(first);
        let (second_id, _) = pending.replace(second);

        assert!(!pending.resolve(first_id, FileSelection::from(vec![PathBuf::from("/a.jpg")])));
        assert!(second_results.borrow().is_empty());
        assert_eq!(pending.current(), Some(second_id));

        assert!(pending.resolve(second_id, FileSelection::from(vec![PathBuf::from("/b.jpg")])));
        assert_eq!(second_results.borrow()[0].files, vec![PathBuf::from("/b.jpg")]);
        assert_eq!(*first_results.borrow(), vec![FileSelection::empty()]);
    }

    #[test]
    fn outcome_maps_cancel_and_failure_to_empty() {
        assert!(FilePickerOutcome::Cancelled.into_selection().is_empty());
        assert!(FilePickerOutcome::Failed("portal gone".into()).into_selection().is_empty());
        let selected = FilePickerOutcome::Selected(vec![PathBuf::from("/a")]).into_selection();
        assert_eq!(selected.files.len(), 1);
    }

    #[test]
    fn extensions_from_accept_tokens() {
        let params = FileChooserParams {
            accept_types: vec![".PDF".into(), "image/png".into(), " .pdf ".into()],
            ..Default::default()
        };
        let extensions = params.extensions();
        assert_eq!(extensions[0], "pdf");
        assert!(extensions.contains(&"png".to_string()));
        assert_eq!(extensions.iter().filter(|ext| *ext == "pdf").count(), 1);
    }

    #[test]
    fn wildcard_image_accept_expands() {
        let params = FileChooserParams {
            accept_types: vec!["image/*".into()],
            ..Default::default()
        };
        let extensions = params.extensions();
        assert!(extensions.contains(&"jpg".to_string()));
        assert!(extensions.contains(&"png".to_string()));
    }

    #[test]
    fn unknown_accept_means_any_file() {
        let params = FileChooserParams {
            accept_types: vec!["application/x-made-up".into()],
            ..Default::default()
        };
        assert!(params.extensions().is_empty());
        assert!(FileChooserParams::default().extensions().is_empty());
    }
}
