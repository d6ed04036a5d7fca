/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! In-memory stand-ins for every capability the controller drives, and a
//! harness wiring them to a [`ShellController`].

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use url::Url;

use crate::prefs::ShellPreferences;
use crate::shell::chrome::AccentColor;
use crate::shell::controller::{ShellController, ShellInitOptions};
use crate::shell::file_chooser::{
    FileChooserParams, FileSelection, FileSelectionCallback, PickerRequestId,
};
use crate::shell::host_trait::{
    BrowserSurface, ChromeError, ExternalUrlLauncher, FilePicker, LaunchError, PermissionBroker,
    PickerError, SurfaceError, SystemChrome,
};
use crate::shell::navigation::{ExternalLinkDelegate, NavigationPolicy};
use crate::shell::permissions::Permission;
use crate::shell::surface_settings::SurfaceSettings;

/// User agent of an Android system webview, embedded marker included.
pub const EMBEDDED_ENGINE_USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8; wv) \
    AppleWebKit/537.36 (KHTML, like Gecko) Version/4.0 Chrome/126.0.0.0 Mobile Safari/537.36";

/// Surface with a linear history stack. `load_url` pushes, `go_back` pops.
#[derive(Default)]
pub struct FakeSurface {
    history: RefCell<Vec<String>>,
    loaded_urls: RefCell<Vec<String>>,
    settings: RefCell<Option<SurfaceSettings>>,
    reloads: Cell<usize>,
    back_navigations: Cell<usize>,
    fail_configure: Cell<bool>,
    reported_can_go_back: Cell<Option<bool>>,
}

impl FakeSurface {
    pub fn with_history(urls: &[&str]) -> Self {
        let surface = Self::default();
        surface
            .history
            .replace(urls.iter().map(|url| url.to_string()).collect());
        surface
    }

    pub fn push_history(&self, url: &str) {
        self.history.borrow_mut().push(url.to_string());
    }

    /// Entries behind the current one.
    pub fn history_depth(&self) -> usize {
        self.history.borrow().len().saturating_sub(1)
    }

    pub fn current_url(&self) -> Option<String> {
        self.history.borrow().last().cloned()
    }

    pub fn loaded_urls(&self) -> Vec<String> {
        self.loaded_urls.borrow().clone()
    }

    pub fn settings(&self) -> Option<SurfaceSettings> {
        self.settings.borrow().clone()
    }

    pub fn reloads(&self) -> usize {
        self.reloads.get()
    }

    pub fn back_navigations(&self) -> usize {
        self.back_navigations.get()
    }

    pub fn fail_configure(&self) {
        self.fail_configure.set(true);
    }

    /// Answer `can_go_back` with `report` instead of the real history, like a
    /// page whose last history report is out of date. `None` goes back to
    /// the real history.
    pub fn report_can_go_back(&self, report: Option<bool>) {
        self.reported_can_go_back.set(report);
    }
}

impl BrowserSurface for FakeSurface {
    fn default_user_agent(&self) -> Option<String> {
        Some(EMBEDDED_ENGINE_USER_AGENT.to_string())
    }

    fn configure(&self, settings: &SurfaceSettings) -> Result<(), SurfaceError> {
        if self.fail_configure.get() {
            return Err(SurfaceError::Build("fake surface refused".into()));
        }
        self.settings.replace(Some(settings.clone()));
        Ok(())
    }

    fn load_url(&self, url: &Url) {
        self.loaded_urls.borrow_mut().push(url.to_string());
        self.push_history(url.as_str());
    }

    fn reload(&self) {
        self.reloads.set(self.reloads.get() + 1);
    }

    fn can_go_back(&self) -> bool {
        self.reported_can_go_back
            .get()
            .unwrap_or_else(|| self.history_depth() > 0)
    }

    /// Does not move at the first entry, like `history.back()`.
    fn go_back(&self) {
        self.back_navigations.set(self.back_navigations.get() + 1);
        if self.history_depth() > 0 {
            self.history.borrow_mut().pop();
        }
    }
}

/// Launcher recording every URL it is handed. Clones share the record.
#[derive(Clone, Default)]
pub struct RecordingLauncher {
    launched: Arc<Mutex<Vec<String>>>,
    unavailable: Arc<Mutex<bool>>,
}

impl RecordingLauncher {
    pub fn launched(&self) -> Vec<String> {
        self.launched.lock().map(|urls| urls.clone()).unwrap_or_default()
    }

    /// Every later launch fails as if no handler were installed.
    pub fn remove_handlers(&self) {
        if let Ok(mut unavailable) = self.unavailable.lock() {
            *unavailable = true;
        }
    }
}

impl ExternalUrlLauncher for RecordingLauncher {
    fn launch(&self, url: &str) -> Result<(), LaunchError> {
        if self.unavailable.lock().map(|flag| *flag).unwrap_or(false) {
            return Err(LaunchError::NoHandler(url.to_string()));
        }
        if let Ok(mut launched) = self.launched.lock() {
            launched.push(url.to_string());
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct FakePicker {
    launches: RefCell<Vec<(PickerRequestId, FileChooserParams)>>,
    fail: Cell<bool>,
}

impl FakePicker {
    pub fn launches(&self) -> Vec<FileChooserParams> {
        self.launches.borrow().iter().map(|(_, params)| params.clone()).collect()
    }

    /// Request id of the most recent successful launch.
    pub fn last_request(&self) -> Option<PickerRequestId> {
        self.launches.borrow().last().map(|(request, _)| *request)
    }

    pub fn fail_launches(&self) {
        self.fail.set(true);
    }
}

impl FilePicker for FakePicker {
    fn launch(
        &self,
        request: PickerRequestId,
        params: &FileChooserParams,
    ) -> Result<(), PickerError> {
        if self.fail.get() {
            return Err(PickerError::Unavailable("no picker activity".into()));
        }
        self.launches.borrow_mut().push((request, params.clone()));
        Ok(())
    }
}

#[derive(Default)]
pub struct FakePermissions {
    granted: RefCell<HashSet<Permission>>,
    requests: RefCell<Vec<Vec<Permission>>>,
}

impl FakePermissions {
    pub fn granting(permissions: &[Permission]) -> Self {
        let broker = Self::default();
        broker.granted.borrow_mut().extend(permissions.iter().copied());
        broker
    }

    pub fn requests(&self) -> Vec<Vec<Permission>> {
        self.requests.borrow().clone()
    }
}

impl PermissionBroker for FakePermissions {
    fn is_granted(&self, permission: Permission) -> bool {
        self.granted.borrow().contains(&permission)
    }

    fn request(&self, permissions: &[Permission]) {
        self.requests.borrow_mut().push(permissions.to_vec());
    }
}

#[derive(Default)]
pub struct FakeChrome {
    status_bar_color: Cell<Option<AccentColor>>,
    indicator_color: Cell<Option<AccentColor>>,
    refresh_enabled: Cell<bool>,
    refreshing: Cell<bool>,
    refreshing_changes: RefCell<Vec<bool>>,
    refuse_colors: Cell<bool>,
}

impl FakeChrome {
    pub fn status_bar_color(&self) -> Option<AccentColor> {
        self.status_bar_color.get()
    }

    pub fn indicator_color(&self) -> Option<AccentColor> {
        self.indicator_color.get()
    }

    pub fn is_refresh_enabled(&self) -> bool {
        self.refresh_enabled.get()
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing.get()
    }

    pub fn refreshing_changes(&self) -> Vec<bool> {
        self.refreshing_changes.borrow().clone()
    }

    /// Behave like a platform without colorable chrome.
    pub fn refuse_colors(&self) {
        self.refuse_colors.set(true);
    }
}

impl SystemChrome for FakeChrome {
    fn set_status_bar_color(&self, color: AccentColor) -> Result<(), ChromeError> {
        if self.refuse_colors.get() {
            return Err(ChromeError::Unsupported("status bar color"));
        }
        self.status_bar_color.set(Some(color));
        Ok(())
    }

    fn set_refresh_indicator_color(&self, color: AccentColor) -> Result<(), ChromeError> {
        if self.refuse_colors.get() {
            return Err(ChromeError::Unsupported("refresh indicator color"));
        }
        self.indicator_color.set(Some(color));
        Ok(())
    }

    fn set_refresh_enabled(&self, enabled: bool) {
        self.refresh_enabled.set(enabled);
    }

    fn set_refreshing(&self, refreshing: bool) {
        self.refreshing.set(refreshing);
        self.refreshing_changes.borrow_mut().push(refreshing);
    }
}

/// A callback that records every resolution it receives.
pub fn recording_callback() -> (FileSelectionCallback, Rc<RefCell<Vec<FileSelection>>>) {
    let results = Rc::new(RefCell::new(Vec::new()));
    let sink = results.clone();
    let callback = FileSelectionCallback::new(move |selection| sink.borrow_mut().push(selection));
    (callback, results)
}

/// A controller wired to fakes, with handles on every fake.
pub struct TestHarness {
    pub controller: ShellController,
    pub surface: Rc<FakeSurface>,
    pub launcher: RecordingLauncher,
    pub file_picker: Rc<FakePicker>,
    pub permissions: Rc<FakePermissions>,
    pub chrome: Rc<FakeChrome>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_preferences(ShellPreferences::default())
    }

    pub fn with_preferences(preferences: ShellPreferences) -> Self {
        let surface = Rc::new(FakeSurface::default());
        let launcher = RecordingLauncher::default();
        let file_picker = Rc::new(FakePicker::default());
        let permissions = Rc::new(FakePermissions::default());
        let chrome = Rc::new(FakeChrome::default());
        let navigation = Arc::new(ExternalLinkDelegate::new(
            NavigationPolicy::new(preferences.internal_markers.clone()),
            launcher.clone(),
        ));

        let controller = ShellController::new(ShellInitOptions {
            preferences,
            surface: surface.clone(),
            navigation,
            file_picker: file_picker.clone(),
            permissions: permissions.clone(),
            chrome: chrome.clone(),
        });

        Self {
            controller,
            surface,
            launcher,
            file_picker,
            permissions,
            chrome,
        }
    }

    /// Harness whose controller already ran `initialize`.
    pub fn initialized() -> Self {
        let mut harness = Self::new();
        if let Err(e) = harness.controller.initialize() {
            panic!("fake surface should configure: {e}");
        }
        harness
    }

    /// Route a navigation the way an engine would: ask the controller, and
    /// load only when it allows.
    pub fn navigate(&mut self, url: &str) -> bool {
        let allowed = self.controller.on_navigation_requested(url).allows_surface_load();
        if allowed {
            self.surface.push_history(url);
            self.controller.on_page_finished(url);
        }
        allowed
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
