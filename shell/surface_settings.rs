/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Engine capabilities requested by the shell.

use std::path::PathBuf;

use crate::prefs::ShellPreferences;

/// Tokens that mark a user agent as an embedded view. Some login providers
/// refuse to run when they see one.
pub const EMBEDDED_USER_AGENT_MARKERS: &[&str] = &["; wv"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MixedContentMode {
    /// Insecure subresources are blocked on secure pages.
    NeverAllow,
    /// Insecure passive content loads, active content is blocked.
    Compatibility,
    /// Both secure and insecure resources load on secure pages.
    AlwaysAllow,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SurfaceSettings {
    pub javascript: bool,
    pub dom_storage: bool,
    pub database: bool,
    /// Lay out as on a desktop-class viewport, then scale to fit.
    pub wide_viewport: bool,
    pub overview_mode: bool,
    /// Let documents read `file:` URLs the engine has access to.
    pub file_access: bool,
    pub mixed_content: MixedContentMode,
    /// `None` keeps the engine's own user agent.
    pub user_agent: Option<String>,
    pub devtools: bool,
    /// Profile directory for cookies and local storage.
    pub data_dir: Option<PathBuf>,
}

impl SurfaceSettings {
    pub fn for_shell(preferences: &ShellPreferences, engine_user_agent: Option<&str>) -> Self {
        let user_agent = preferences
            .user_agent
            .as_deref()
            .or(engine_user_agent)
            .map(|agent| strip_embedded_markers(agent, preferences.user_agent_markers.as_slice()));

        Self {
            javascript: true,
            dom_storage: true,
            database: true,
            wide_viewport: true,
            overview_mode: true,
            file_access: true,
            mixed_content: MixedContentMode::AlwaysAllow,
            user_agent,
            devtools: preferences.devtools,
            data_dir: preferences.data_dir.clone(),
        }
    }
}

/// Remove every occurrence of each marker from `user_agent`.
pub fn strip_embedded_markers<S: AsRef<str>>(user_agent: &str, markers: &[S]) -> String {
    markers
        .iter()
        .map(AsRef::as_ref)
        .filter(|marker| !marker.is_empty())
        .fold(user_agent.to_string(), |agent, marker| agent.replace(marker, ""))
}
