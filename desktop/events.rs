/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Events delivered to the winit loop from webview callbacks, the page
//! bridge script and picker threads.

use serde::Deserialize;

use crate::shell::file_chooser::{FileChooserParams, FilePickerOutcome, PickerRequestId};

#[derive(Debug)]
pub enum ShellEvent {
    PageLoadStarted(String),
    PageLoadFinished(String),
    Bridge(BridgeMessage),
    FilePickerFinished {
        request: PickerRequestId,
        outcome: FilePickerOutcome,
    },
}

/// Messages posted by the bridge script through `window.ipc.postMessage`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BridgeMessage {
    Scroll {
        offset_y: f64,
    },
    History {
        can_go_back: bool,
    },
    RefreshGesture,
    BackPressed,
    /// A back navigation the shell issued did not move.
    BackUnavailable,
    FileChooser {
        request_id: u64,
        #[serde(default)]
        accept: Vec<String>,
        #[serde(default)]
        multiple: bool,
        #[serde(default)]
        capture: bool,
    },
}

impl BridgeMessage {
    pub fn parse(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }

    /// Picker parameters of a `file_chooser` message.
    pub fn file_chooser_params(&self) -> Option<FileChooserParams> {
        match self {
            Self::FileChooser {
                accept,
                multiple,
                capture,
                ..
            } => Some(FileChooserParams {
                accept_types: accept.clone(),
                multiple: *multiple,
                capture: *capture,
            }),
            _ => None,
        }
    }
}
