/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! [`BrowserSurface`] over a wry webview filling the main winit window.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use log::{debug, trace, warn};
use url::Url;
use winit::event_loop::EventLoopProxy;
use winit::window::Window;
use wry::{PageLoadEvent, Rect, WebContext, WebView, WebViewBuilder};

use crate::desktop::bridge_script::{BRIDGE_SCRIPT, deliver_files_script};
use crate::desktop::events::{BridgeMessage, ShellEvent};
use crate::shell::chrome::AccentColor;
use crate::shell::file_chooser::FileSelection;
use crate::shell::host_trait::{BrowserSurface, SurfaceError};
use crate::shell::navigation::NavigationDecider;
use crate::shell::surface_settings::{MixedContentMode, SurfaceSettings};

/// WebView2 flags wry passes by default. Extra flags replace them, so they
/// are repeated.
#[cfg(target_os = "windows")]
const WEBVIEW2_DEFAULT_ARGS: &str =
    "--disable-features=msWebOOUI,msPdfOOUI,msSmartScreenProtection";

pub struct WrySurface {
    window: Rc<Window>,
    proxy: EventLoopProxy<ShellEvent>,
    navigation: Arc<dyn NavigationDecider>,
    /// Kept alive for as long as the webview.
    context: RefCell<Option<WebContext>>,
    webview: RefCell<Option<WebView>>,
    can_go_back: Cell<bool>,
}

impl WrySurface {
    pub fn new(
        window: Rc<Window>,
        proxy: EventLoopProxy<ShellEvent>,
        navigation: Arc<dyn NavigationDecider>,
    ) -> Self {
        Self {
            window,
            proxy,
            navigation,
            context: RefCell::new(None),
            webview: RefCell::new(None),
            can_go_back: Cell::new(false),
        }
    }

    /// Latest history state reported by the page.
    pub fn set_can_go_back(&self, can_go_back: bool) {
        self.can_go_back.set(can_go_back);
    }

    pub fn set_background_color(&self, color: AccentColor) -> Result<(), SurfaceError> {
        self.with_webview(|webview| {
            webview
                .set_background_color(color.rgba())
                .map_err(|e| SurfaceError::Script(e.to_string()))
        })
    }

    pub fn resize(&self, width: u32, height: u32) {
        let bounds = Rect {
            position: wry::dpi::LogicalPosition::new(0, 0).into(),
            size: wry::dpi::PhysicalSize::new(width, height).into(),
        };
        let result = self.with_webview(|webview| {
            webview
                .set_bounds(bounds)
                .map_err(|e| SurfaceError::Script(e.to_string()))
        });
        if let Err(e) = result {
            trace!("surface: resize ignored: {e}");
        }
    }

    /// Hand a native picker result to the page input behind `request_id`.
    pub fn deliver_files(&self, request_id: u64, selection: &FileSelection) {
        let script = deliver_files_script(request_id, selection);
        if let Err(e) = self.evaluate(&script) {
            warn!("surface: could not deliver files for request {request_id}: {e}");
        }
    }

    fn evaluate(&self, script: &str) -> Result<(), SurfaceError> {
        self.with_webview(|webview| {
            webview
                .evaluate_script(script)
                .map_err(|e| SurfaceError::Script(e.to_string()))
        })
    }

    fn with_webview<T>(
        &self,
        f: impl FnOnce(&WebView) -> Result<T, SurfaceError>,
    ) -> Result<T, SurfaceError> {
        match self.webview.borrow().as_ref() {
            Some(webview) => f(webview),
            None => Err(SurfaceError::NotConfigured),
        }
    }
}

impl BrowserSurface for WrySurface {
    /// The platform engines do not expose their default agent before a
    /// webview exists, and none of them carry the embedded marker.
    fn default_user_agent(&self) -> Option<String> {
        None
    }

    fn configure(&self, settings: &SurfaceSettings) -> Result<(), SurfaceError> {
        if self.webview.borrow().is_some() {
            return Ok(());
        }
        debug!("surface: building webview with {settings:?}");

        let mut context = WebContext::new(settings.data_dir.clone());

        let navigation = self.navigation.clone();
        let load_proxy = self.proxy.clone();
        let ipc_proxy = self.proxy.clone();

        let mut builder = WebViewBuilder::new_with_web_context(&mut context)
            .with_devtools(settings.devtools)
            .with_initialization_script(BRIDGE_SCRIPT)
            .with_navigation_handler(move |url| navigation.decide(&url).allows_surface_load())
            .with_on_page_load_handler(move |event, url| {
                let event = match event {
                    PageLoadEvent::Started => ShellEvent::PageLoadStarted(url),
                    PageLoadEvent::Finished => ShellEvent::PageLoadFinished(url),
                };
                let _ = load_proxy.send_event(event);
            })
            .with_ipc_handler(move |request| match BridgeMessage::parse(request.body()) {
                Ok(message) => {
                    let _ = ipc_proxy.send_event(ShellEvent::Bridge(message));
                },
                Err(e) => debug!("surface: ignoring bridge message: {e}"),
            });

        if let Some(user_agent) = &settings.user_agent {
            builder = builder.with_user_agent(user_agent.as_str());
        }

        #[cfg(target_os = "windows")]
        {
            use wry::WebViewBuilderExtWindows;
            if settings.mixed_content == MixedContentMode::AlwaysAllow {
                builder = builder.with_additional_browser_args(format!(
                    "{WEBVIEW2_DEFAULT_ARGS} --allow-running-insecure-content"
                ));
            }
        }
        #[cfg(not(target_os = "windows"))]
        {
            if settings.mixed_content != MixedContentMode::NeverAllow {
                trace!("surface: mixed content follows the engine default on this platform");
            }
        }

        let webview = builder
            .build(self.window.as_ref())
            .map_err(|e| SurfaceError::Build(e.to_string()))?;

        self.webview.replace(Some(webview));
        self.context.replace(Some(context));
        Ok(())
    }

    fn load_url(&self, url: &Url) {
        let result = self.with_webview(|webview| {
            webview
                .load_url(url.as_str())
                .map_err(|e| SurfaceError::Script(e.to_string()))
        });
        if let Err(e) = result {
            warn!("surface: could not load {url}: {e}");
        }
    }

    fn reload(&self) {
        if let Err(e) = self.evaluate("location.reload();") {
            warn!("surface: reload failed: {e}");
        }
    }

    fn can_go_back(&self) -> bool {
        self.can_go_back.get()
    }

    fn go_back(&self) {
        let script = "window.__revoshell ? window.__revoshell.goBack() : history.back();";
        if let Err(e) = self.evaluate(script) {
            warn!("surface: back navigation failed: {e}");
        }
    }
}
