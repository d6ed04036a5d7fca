/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Capabilities the [`ShellController`] drives.
//!
//! Every platform object the shell touches sits behind one of these traits:
//! the embedded browser surface, the system URL handler, the file picker, the
//! permission facility and the window chrome. The desktop host implements
//! them over wry/winit; tests implement them with in-memory fakes.
//!
//! All methods are called on the host's event-loop thread. Flows that finish
//! later (file picker, permission prompt) report back through a separate
//! controller entry point, never through a return value.
//!
//! [`ShellController`]: crate::shell::controller::ShellController

use url::Url;

use crate::shell::chrome::AccentColor;
use crate::shell::file_chooser::{FileChooserParams, PickerRequestId};
use crate::shell::permissions::Permission;
use crate::shell::surface_settings::SurfaceSettings;

/// The embedded browser surface hosting the remote app.
pub trait BrowserSurface {
    /// User agent the engine would report before any rewrite, when known.
    fn default_user_agent(&self) -> Option<String>;

    /// Instantiate the engine with `settings`. Called once, before the first
    /// navigation.
    fn configure(&self, settings: &SurfaceSettings) -> Result<(), SurfaceError>;

    /// Start a top-level navigation.
    fn load_url(&self, url: &Url);

    /// Reload the current document.
    fn reload(&self);

    /// Whether in-page history has an entry behind the current one.
    fn can_go_back(&self) -> bool;

    /// Step one entry back in in-page history.
    fn go_back(&self);
}

/// Hands a URL to whatever the system registered for it.
///
/// Called synchronously from inside the engine's navigation hook, which may
/// live on an engine-owned thread on some platforms.
pub trait ExternalUrlLauncher: Send + Sync {
    fn launch(&self, url: &str) -> Result<(), LaunchError>;
}

impl<F> ExternalUrlLauncher for F
where
    F: Fn(&str) -> Result<(), LaunchError> + Send + Sync,
{
    fn launch(&self, url: &str) -> Result<(), LaunchError> {
        self(url)
    }
}

/// Starts the native file (or camera) selection flow.
///
/// Completion is reported later, tagged with the same `request`, through
/// [`ShellController::on_file_picker_finished`].
///
/// [`ShellController::on_file_picker_finished`]:
///     crate::shell::controller::ShellController::on_file_picker_finished
pub trait FilePicker {
    fn launch(
        &self,
        request: PickerRequestId,
        params: &FileChooserParams,
    ) -> Result<(), PickerError>;
}

/// Runtime permission facility.
pub trait PermissionBroker {
    fn is_granted(&self, permission: Permission) -> bool;

    /// Fire-and-forget prompt. Any answer arrives through
    /// [`ShellController::on_permissions_result`].
    ///
    /// [`ShellController::on_permissions_result`]:
    ///     crate::shell::controller::ShellController::on_permissions_result
    fn request(&self, permissions: &[Permission]);
}

/// Status bar and pull-to-refresh container.
pub trait SystemChrome {
    fn set_status_bar_color(&self, color: AccentColor) -> Result<(), ChromeError>;
    fn set_refresh_indicator_color(&self, color: AccentColor) -> Result<(), ChromeError>;
    /// Whether the pull gesture is currently recognized.
    fn set_refresh_enabled(&self, enabled: bool);
    /// Show or hide the refresh indicator.
    fn set_refreshing(&self, refreshing: bool);
}

#[derive(Debug)]
pub enum SurfaceError {
    /// The engine could not be created on this window.
    Build(String),
    /// The surface was used before [`BrowserSurface::configure`].
    NotConfigured,
    Script(String),
}

impl std::fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Build(e) => write!(f, "failed to build browser surface: {e}"),
            Self::NotConfigured => write!(f, "browser surface is not configured yet"),
            Self::Script(e) => write!(f, "script evaluation failed: {e}"),
        }
    }
}

impl std::error::Error for SurfaceError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchError {
    /// Nothing on the system accepts this URL.
    NoHandler(String),
    Io(String),
}

impl std::fmt::Display for LaunchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoHandler(url) => write!(f, "no external handler for {url}"),
            Self::Io(e) => write!(f, "external launch failed: {e}"),
        }
    }
}

impl std::error::Error for LaunchError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerError {
    Unavailable(String),
}

impl std::fmt::Display for PickerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(e) => write!(f, "file picker unavailable: {e}"),
        }
    }
}

impl std::error::Error for PickerError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChromeError {
    Unsupported(&'static str),
    Platform(String),
}

impl std::fmt::Display for ChromeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unsupported(what) => write!(f, "{what} is not supported on this platform"),
            Self::Platform(e) => write!(f, "platform chrome error: {e}"),
        }
    }
}

impl std::error::Error for ChromeError {}
