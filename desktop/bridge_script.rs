/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The page-side half of the shell.
//!
//! [`BRIDGE_SCRIPT`] runs before every document. It reports scroll offset and
//! history state, turns pull/reload/back gestures into messages, routes file
//! inputs to the native picker and keeps new-window links in the main frame.
//! Files picked natively travel back through [`deliver_files_script`].

use std::fs;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use log::warn;
use serde::Serialize;

use crate::shell::file_chooser::FileSelection;

pub const BRIDGE_SCRIPT: &str = include_str!("bridge.js");

/// Files larger than this are left out of a delivery.
pub const MAX_DELIVERED_FILE_BYTES: u64 = 64 * 1024 * 1024;

#[derive(Debug, Serialize)]
struct DeliveredFile {
    name: String,
    mime: String,
    data: String,
}

impl DeliveredFile {
    fn read(path: &Path) -> Option<Self> {
        match fs::metadata(path) {
            Ok(metadata) if metadata.len() > MAX_DELIVERED_FILE_BYTES => {
                warn!("upload: skipping {}, {} bytes is too large", path.display(), metadata.len());
                return None;
            },
            Ok(_) => {},
            Err(e) => {
                warn!("upload: skipping {}: {e}", path.display());
                return None;
            },
        }
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("upload: skipping {}: {e}", path.display());
                return None;
            },
        };
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Some(Self {
            name,
            mime: mime_guess::from_path(path)
                .first_or_octet_stream()
                .essence_str()
                .to_string(),
            data: STANDARD.encode(bytes),
        })
    }
}

/// Script handing `selection` to the file input that opened request
/// `request_id`. An empty selection tells the page the chooser was cancelled.
pub fn deliver_files_script(request_id: u64, selection: &FileSelection) -> String {
    let files: Vec<DeliveredFile> = selection
        .files
        .iter()
        .filter_map(|path| DeliveredFile::read(path))
        .collect();
    let payload = serde_json::to_string(&files).unwrap_or_else(|_| "[]".to_string());
    format!("window.__revoshell && window.__revoshell.deliver({request_id}, {payload});")
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn bridge_script_posts_every_message_kind() {
        for kind in [
            "\"scroll\"",
            "\"history\"",
            "\"refresh_gesture\"",
            "\"back_pressed\"",
            "\"back_unavailable\"",
            "\"file_chooser\"",
        ] {
            assert!(BRIDGE_SCRIPT.contains(kind), "bridge never posts {kind}");
        }
    }

    #[test]
    fn history_state_follows_entry_position() {
        assert!(!BRIDGE_SCRIPT.contains("history.length > 1"));
        assert!(BRIDGE_SCRIPT.contains("__revoshellIndex"));
        assert!(BRIDGE_SCRIPT.contains("state.goBack"));
    }

    #[test]
    fn empty_selection_delivers_empty_list() {
        let script = deliver_files_script(4, &FileSelection::empty());
        assert!(script.ends_with("deliver(4, []);"));
    }

    #[test]
    fn delivered_file_is_base64_with_guessed_mime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.png");
        fs::File::create(&path).unwrap().write_all(b"png!").unwrap();

        let script = deliver_files_script(9, &FileSelection::from(vec![path]));

        assert!(script.contains("deliver(9, "));
        assert!(script.contains("\"name\":\"photo.png\""));
        assert!(script.contains("\"mime\":\"image/png\""));
        assert!(script.contains(&format!("\"data\":\"{}\"", STANDARD.encode(b"png!"))));
    }

    #[test]
    fn unreadable_files_are_skipped() {
        let selection = FileSelection::from(vec![PathBuf::from("/definitely/not/here.pdf")]);
        assert!(deliver_files_script(1, &selection).ends_with("deliver(1, []);"));
    }
}
