/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The shell controller: one embedded surface pointed at the app, plus the
//! refresh, back, external-link and upload policies wired around it.
//!
//! The host feeds every engine and platform event into the `on_*` entry
//! points, one at a time, on its event-loop thread. Nothing in here blocks or
//! spawns; flows that complete later come back as separate calls.

use std::rc::Rc;
use std::sync::Arc;

use log::{debug, info, warn};

use crate::prefs::ShellPreferences;
use crate::shell::back_navigation::{BackPressInterceptor, BackPressOutcome};
use crate::shell::chrome::AccentColor;
use crate::shell::file_chooser::{
    FileChooserParams, FilePickerOutcome, FileSelectionCallback, PendingFileSelection,
    PickerRequestId,
};
use crate::shell::host_trait::{
    BrowserSurface, FilePicker, PermissionBroker, SurfaceError, SystemChrome,
};
use crate::shell::navigation::{NavigationDecider, NavigationDecision};
use crate::shell::permissions::{Permission, request_startup_permissions};
use crate::shell::refresh::PullToRefresh;
use crate::shell::surface_settings::SurfaceSettings;

pub struct ShellInitOptions {
    pub preferences: ShellPreferences,
    pub surface: Rc<dyn BrowserSurface>,
    pub navigation: Arc<dyn NavigationDecider>,
    pub file_picker: Rc<dyn FilePicker>,
    pub permissions: Rc<dyn PermissionBroker>,
    pub chrome: Rc<dyn SystemChrome>,
}

pub struct ShellController {
    preferences: ShellPreferences,
    surface: Rc<dyn BrowserSurface>,
    navigation: Arc<dyn NavigationDecider>,
    file_picker: Rc<dyn FilePicker>,
    permissions: Rc<dyn PermissionBroker>,
    chrome: Rc<dyn SystemChrome>,
    refresh: PullToRefresh,
    back: BackPressInterceptor,
    pending_file_selection: PendingFileSelection,
    initialized: bool,
}

impl ShellController {
    pub fn new(init: ShellInitOptions) -> Self {
        Self {
            preferences: init.preferences,
            surface: init.surface,
            navigation: init.navigation,
            file_picker: init.file_picker,
            permissions: init.permissions,
            chrome: init.chrome,
            refresh: PullToRefresh::new(),
            back: BackPressInterceptor::new(),
            pending_file_selection: PendingFileSelection::default(),
            initialized: false,
        }
    }

    pub fn preferences(&self) -> &ShellPreferences {
        &self.preferences
    }

    /// Configure the surface, style the chrome, prompt for permissions and
    /// load the entry URL. Runs once; later calls are ignored.
    ///
    /// Only a surface that cannot be built is an error. Everything else is
    /// best effort.
    pub fn initialize(&mut self) -> Result<(), SurfaceError> {
        if self.initialized {
            warn!("shell: initialize called twice, ignoring");
            return Ok(());
        }

        let engine_user_agent = self.surface.default_user_agent();
        let settings = SurfaceSettings::for_shell(&self.preferences, engine_user_agent.as_deref());
        self.surface.configure(&settings)?;
        self.initialized = true;

        self.apply_accent_color();
        self.chrome.set_refresh_enabled(self.refresh.is_enabled());
        request_startup_permissions(self.permissions.as_ref());

        info!("shell: loading {}", self.preferences.entry_url);
        self.surface.load_url(&self.preferences.entry_url);
        Ok(())
    }

    fn apply_accent_color(&self) {
        let color = match self.preferences.accent_color.parse::<AccentColor>() {
            Ok(color) => color,
            Err(e) => {
                debug!(
                    "shell: keeping default chrome colors, {:?} is not a color: {e}",
                    self.preferences.accent_color
                );
                return;
            },
        };
        if let Err(e) = self.chrome.set_status_bar_color(color) {
            debug!("shell: status bar color not applied: {e}");
        }
        if let Err(e) = self.chrome.set_refresh_indicator_color(color) {
            debug!("shell: refresh indicator color not applied: {e}");
        }
    }

    /// Decide a top-level navigation before the surface commits to it.
    pub fn on_navigation_requested(&self, url: &str) -> NavigationDecision {
        self.navigation.decide(url)
    }

    pub fn on_page_finished(&mut self, url: &str) {
        if self.refresh.finish() {
            debug!("shell: refresh finished at {url}");
            self.chrome.set_refreshing(false);
        }
    }

    pub fn on_scroll_changed(&mut self, offset_y: f64) {
        if self.refresh.on_scroll(offset_y) {
            self.chrome.set_refresh_enabled(self.refresh.is_enabled());
        }
    }

    /// Manual pull-down gesture. Returns whether a reload was issued.
    pub fn on_refresh_gesture(&mut self) -> bool {
        if !self.refresh.begin() {
            return false;
        }
        self.chrome.set_refreshing(true);
        self.surface.reload();
        true
    }

    pub fn on_back_pressed(&mut self) -> BackPressOutcome {
        let outcome = self.back.handle(self.surface.as_ref());
        if outcome == BackPressOutcome::Forwarded {
            debug!("shell: no page history left, back goes to the platform");
        }
        outcome
    }

    /// The page wants files for an upload input. Returns `false` when no
    /// native picker could be shown; the callback has then already been
    /// resolved with an empty selection.
    pub fn on_file_chooser_requested(
        &mut self,
        params: FileChooserParams,
        callback: FileSelectionCallback,
    ) -> bool {
        let (request, discarded) = self.pending_file_selection.replace(callback);
        if discarded {
            debug!("shell: discarded a stale file chooser request");
        }
        match self.file_picker.launch(request, &params) {
            Ok(()) => true,
            Err(e) => {
                warn!("shell: {e}");
                self.pending_file_selection.discard();
                false
            },
        }
    }

    /// Completion of the picker flow started for `request`. Completions of
    /// replaced or already resolved requests are ignored.
    pub fn on_file_picker_finished(
        &mut self,
        request: PickerRequestId,
        outcome: FilePickerOutcome,
    ) {
        if !self.pending_file_selection.resolve(request, outcome.into_selection()) {
            debug!("shell: ignoring {request}, it is no longer pending");
        }
    }

    /// Answer to the startup permission prompt. Not acted upon.
    pub fn on_permissions_result(&self, results: &[(Permission, bool)]) {
        for (permission, granted) in results {
            debug!("shell: permission {permission:?} granted={granted}");
        }
    }

    pub fn is_refresh_enabled(&self) -> bool {
        self.refresh.is_enabled()
    }

    pub fn is_refreshing(&self) -> bool {
        self.refresh.is_refreshing()
    }

    pub fn is_back_interception_enabled(&self) -> bool {
        self.back.is_enabled()
    }

    pub fn has_pending_file_selection(&self) -> bool {
        self.pending_file_selection.is_pending()
    }
}
