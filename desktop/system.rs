/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Desktop implementations of the launcher, picker, permission and chrome
//! capabilities.

use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;
use std::thread;

use log::{debug, info, trace};
use winit::event_loop::EventLoopProxy;
use winit::window::Window;

use crate::desktop::events::ShellEvent;
use crate::desktop::wry_surface::WrySurface;
use crate::shell::chrome::AccentColor;
use crate::shell::file_chooser::{FileChooserParams, FilePickerOutcome, PickerRequestId};
use crate::shell::host_trait::{
    ChromeError, ExternalUrlLauncher, FilePicker, LaunchError, PermissionBroker, PickerError,
    SystemChrome,
};
use crate::shell::permissions::Permission;

/// Opens URLs in the user's default browser.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemUrlLauncher;

impl ExternalUrlLauncher for SystemUrlLauncher {
    fn launch(&self, url: &str) -> Result<(), LaunchError> {
        webbrowser::open(url).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => LaunchError::NoHandler(url.to_string()),
            _ => LaunchError::Io(e.to_string()),
        })
    }
}

/// Native file dialog run on a helper thread. The result comes back to the
/// event loop as [`ShellEvent::FilePickerFinished`].
pub struct RfdFilePicker {
    proxy: EventLoopProxy<ShellEvent>,
}

impl RfdFilePicker {
    pub fn new(proxy: EventLoopProxy<ShellEvent>) -> Self {
        Self { proxy }
    }
}

impl FilePicker for RfdFilePicker {
    fn launch(
        &self,
        request: PickerRequestId,
        params: &FileChooserParams,
    ) -> Result<(), PickerError> {
        if params.capture {
            debug!("picker: no camera capture on desktop, offering files instead");
        }
        let extensions = params.extensions();
        let multiple = params.multiple;
        let proxy = self.proxy.clone();

        thread::Builder::new()
            .name("file-picker".into())
            .spawn(move || {
                let outcome = pollster::block_on(pick(extensions, multiple));
                let _ = proxy.send_event(ShellEvent::FilePickerFinished { request, outcome });
            })
            .map(|_| ())
            .map_err(|e| PickerError::Unavailable(e.to_string()))
    }
}

async fn pick(extensions: Vec<String>, multiple: bool) -> FilePickerOutcome {
    let mut dialog = rfd::AsyncFileDialog::new().set_title("Choose files to upload");
    if !extensions.is_empty() {
        dialog = dialog
            .add_filter("Accepted files", extensions.as_slice())
            .add_filter("All files", &["*"]);
    }

    let files: Option<Vec<PathBuf>> = if multiple {
        dialog
            .pick_files()
            .await
            .map(|handles| handles.iter().map(|f| f.path().to_path_buf()).collect())
    } else {
        dialog
            .pick_file()
            .await
            .map(|handle| vec![handle.path().to_path_buf()])
    };

    match files {
        Some(files) if !files.is_empty() => FilePickerOutcome::Selected(files),
        _ => FilePickerOutcome::Cancelled,
    }
}

/// Desktop platforms grant camera and file access per use, through the
/// engine and the file dialog. Nothing needs an upfront prompt.
#[derive(Clone, Copy, Debug, Default)]
pub struct DesktopPermissionBroker;

impl PermissionBroker for DesktopPermissionBroker {
    fn is_granted(&self, _permission: Permission) -> bool {
        true
    }

    fn request(&self, permissions: &[Permission]) {
        info!("permissions: {permissions:?} are granted per use on desktop");
    }
}

/// Window title bar and webview backdrop stand in for the status bar. The
/// refresh indicator is a title suffix.
pub struct WindowChrome {
    window: Rc<Window>,
    surface: Rc<WrySurface>,
    title: String,
    refresh_enabled: Cell<bool>,
}

impl WindowChrome {
    pub fn new(window: Rc<Window>, surface: Rc<WrySurface>, title: String) -> Self {
        Self {
            window,
            surface,
            title,
            refresh_enabled: Cell::new(true),
        }
    }
}

impl SystemChrome for WindowChrome {
    fn set_status_bar_color(&self, color: AccentColor) -> Result<(), ChromeError> {
        #[cfg(target_os = "windows")]
        {
            use winit::platform::windows::{Color, WindowExtWindows};
            self.window
                .set_title_background_color(Some(Color::from_rgb(color.red, color.green, color.blue)));
        }
        self.surface
            .set_background_color(color)
            .map_err(|e| ChromeError::Platform(e.to_string()))
    }

    fn set_refresh_indicator_color(&self, _color: AccentColor) -> Result<(), ChromeError> {
        Err(ChromeError::Unsupported("refresh indicator color"))
    }

    fn set_refresh_enabled(&self, enabled: bool) {
        if self.refresh_enabled.replace(enabled) != enabled {
            trace!("chrome: pull to refresh enabled={enabled}");
        }
    }

    fn set_refreshing(&self, refreshing: bool) {
        let title = match refreshing {
            true => format!("{} (refreshing)", self.title),
            false => self.title.clone(),
        };
        self.window.set_title(&title);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn desktop_broker_reports_everything_granted() {
        let broker = DesktopPermissionBroker;
        assert!(broker.is_granted(Permission::Camera));
        assert!(broker.is_granted(Permission::ReadStorage));
    }

    #[test]
    fn startup_bootstrap_skips_prompt_on_desktop() {
        let broker = DesktopPermissionBroker;
        assert!(!crate::shell::permissions::request_startup_permissions(&broker));
    }
}
