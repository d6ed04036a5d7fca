/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Application entry point, runs the event loop.

use std::rc::Rc;
use std::sync::Arc;
#[cfg(target_os = "linux")]
use std::time::{Duration, Instant};

use log::{debug, error, info, trace};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoopProxy};
use winit::keyboard::{Key, ModifiersState, NamedKey};
use winit::window::{Window, WindowId};

use crate::desktop::events::{BridgeMessage, ShellEvent};
use crate::desktop::system::{
    DesktopPermissionBroker, RfdFilePicker, SystemUrlLauncher, WindowChrome,
};
use crate::desktop::wry_surface::WrySurface;
use crate::prefs::ShellPreferences;
use crate::shell::file_chooser::FileSelectionCallback;
use crate::shell::host_trait::SurfaceError;
use crate::shell::{
    BackPressOutcome, ExternalLinkDelegate, NavigationDecider, NavigationPolicy, ShellController,
    ShellInitOptions,
};

/// How often GTK gets pumped while winit would otherwise sleep.
#[cfg(target_os = "linux")]
const GTK_PUMP_INTERVAL: Duration = Duration::from_millis(8);

pub(crate) enum AppState {
    Initializing,
    Running(RunningShell),
    ShuttingDown,
}

pub(crate) struct RunningShell {
    controller: ShellController,
    surface: Rc<WrySurface>,
    // Dropped after the surface.
    window: Rc<Window>,
}

#[derive(Debug)]
pub enum HostError {
    Gtk(String),
    Window(String),
    Surface(SurfaceError),
}

impl std::fmt::Display for HostError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gtk(e) => write!(f, "failed to initialize GTK: {e}"),
            Self::Window(e) => write!(f, "failed to create window: {e}"),
            Self::Surface(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for HostError {}

impl From<SurfaceError> for HostError {
    fn from(error: SurfaceError) -> Self {
        Self::Surface(error)
    }
}

pub struct App {
    preferences: ShellPreferences,
    proxy: EventLoopProxy<ShellEvent>,
    modifiers: ModifiersState,
    failure: Option<HostError>,
    state: AppState,
}

impl App {
    pub fn new(preferences: ShellPreferences, proxy: EventLoopProxy<ShellEvent>) -> Self {
        App {
            preferences,
            proxy,
            modifiers: ModifiersState::empty(),
            failure: None,
            state: AppState::Initializing,
        }
    }

    /// Why the shell stopped early, if it did.
    pub fn failure(&self) -> Option<&HostError> {
        self.failure.as_ref()
    }

    /// Create the window, the surface and the controller, then load the app.
    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<RunningShell, HostError> {
        #[cfg(target_os = "linux")]
        gtk::init().map_err(|e| HostError::Gtk(e.to_string()))?;

        let attributes = Window::default_attributes()
            .with_title(self.preferences.window_title.as_str())
            .with_inner_size(LogicalSize::new(
                self.preferences.window_width,
                self.preferences.window_height,
            ));
        let window = Rc::new(
            event_loop
                .create_window(attributes)
                .map_err(|e| HostError::Window(e.to_string()))?,
        );

        let navigation: Arc<dyn NavigationDecider> = Arc::new(ExternalLinkDelegate::new(
            NavigationPolicy::new(self.preferences.internal_markers.clone()),
            SystemUrlLauncher,
        ));
        let surface = Rc::new(WrySurface::new(
            window.clone(),
            self.proxy.clone(),
            navigation.clone(),
        ));
        let chrome = Rc::new(WindowChrome::new(
            window.clone(),
            surface.clone(),
            self.preferences.window_title.clone(),
        ));

        let mut controller = ShellController::new(ShellInitOptions {
            preferences: self.preferences.clone(),
            surface: surface.clone(),
            navigation,
            file_picker: Rc::new(RfdFilePicker::new(self.proxy.clone())),
            permissions: Rc::new(DesktopPermissionBroker),
            chrome,
        });
        controller.initialize()?;

        Ok(RunningShell {
            controller,
            surface,
            window,
        })
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if !matches!(self.state, AppState::ShuttingDown) {
            info!("shutting down");
        }
        self.state = AppState::ShuttingDown;
        event_loop.exit();
    }

    fn handle_back(&mut self, event_loop: &ActiveEventLoop) {
        let AppState::Running(shell) = &mut self.state else {
            return;
        };
        // With no page history left, the platform default for "back" on a
        // single-window app is leaving it.
        if shell.controller.on_back_pressed() == BackPressOutcome::Forwarded {
            self.shutdown(event_loop);
        }
    }

    fn handle_refresh(&mut self) {
        if let AppState::Running(shell) = &mut self.state
            && !shell.controller.on_refresh_gesture()
        {
            debug!("refresh ignored, page is scrolled or already refreshing");
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }
        let command = self.modifiers.control_key() || self.modifiers.super_key();
        match &event.logical_key {
            Key::Named(NamedKey::F5 | NamedKey::BrowserRefresh) => self.handle_refresh(),
            Key::Character(c) if command && c.eq_ignore_ascii_case("r") => self.handle_refresh(),
            Key::Named(NamedKey::BrowserBack) => self.handle_back(event_loop),
            Key::Named(NamedKey::ArrowLeft) if self.modifiers.alt_key() => {
                self.handle_back(event_loop)
            },
            _ => {},
        }
    }

    fn handle_bridge_message(&mut self, event_loop: &ActiveEventLoop, message: BridgeMessage) {
        if matches!(message, BridgeMessage::BackPressed) {
            return self.handle_back(event_loop);
        }
        if matches!(message, BridgeMessage::RefreshGesture) {
            return self.handle_refresh();
        }
        if matches!(message, BridgeMessage::BackUnavailable) {
            // The last back press hit the first entry. Replay it against the
            // corrected history state so it falls through to the platform.
            if let AppState::Running(shell) = &self.state {
                shell.surface.set_can_go_back(false);
            }
            return self.handle_back(event_loop);
        }

        let AppState::Running(shell) = &mut self.state else {
            return;
        };
        match message {
            BridgeMessage::Scroll { offset_y } => shell.controller.on_scroll_changed(offset_y),
            BridgeMessage::History { can_go_back } => shell.surface.set_can_go_back(can_go_back),
            BridgeMessage::FileChooser { request_id, .. } => {
                let params = message.file_chooser_params().unwrap_or_default();
                let surface = shell.surface.clone();
                let callback = FileSelectionCallback::new(move |selection| {
                    surface.deliver_files(request_id, &selection)
                });
                shell.controller.on_file_chooser_requested(params, callback);
            },
            BridgeMessage::RefreshGesture
            | BridgeMessage::BackPressed
            | BridgeMessage::BackUnavailable => {},
        }
    }
}

impl ApplicationHandler<ShellEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if !matches!(self.state, AppState::Initializing) {
            return;
        }
        match self.init(event_loop) {
            Ok(shell) => self.state = AppState::Running(shell),
            Err(e) => {
                error!("{e}");
                self.failure = Some(e);
                self.shutdown(event_loop);
            },
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        window_event: WindowEvent,
    ) {
        trace!("{window_event:?}");

        let AppState::Running(shell) = &self.state else {
            return;
        };
        if shell.window.id() != window_id {
            return;
        }

        match window_event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::Resized(size) => shell.surface.resize(size.width, size.height),
            WindowEvent::ModifiersChanged(modifiers) => self.modifiers = modifiers.state(),
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(event_loop, &event),
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Back,
                ..
            } => self.handle_back(event_loop),
            _ => {},
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: ShellEvent) {
        trace!("{event:?}");
        match event {
            ShellEvent::Bridge(message) => self.handle_bridge_message(event_loop, message),
            ShellEvent::PageLoadStarted(url) => debug!("loading {url}"),
            ShellEvent::PageLoadFinished(url) => {
                if let AppState::Running(shell) = &mut self.state {
                    shell.controller.on_page_finished(&url);
                }
            },
            ShellEvent::FilePickerFinished { request, outcome } => {
                if let AppState::Running(shell) = &mut self.state {
                    shell.controller.on_file_picker_finished(request, outcome);
                }
            },
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if matches!(self.state, AppState::ShuttingDown) {
            return;
        }

        #[cfg(target_os = "linux")]
        {
            while gtk::events_pending() {
                gtk::main_iteration_do(false);
            }
            event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + GTK_PUMP_INTERVAL));
        }
        #[cfg(not(target_os = "linux"))]
        event_loop.set_control_flow(ControlFlow::Wait);
    }
}
