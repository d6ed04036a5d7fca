/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::{env, panic, process};

use log::error;
use winit::event_loop::EventLoop;

use crate::desktop::app::App;
use crate::desktop::events::ShellEvent;
use crate::panic_hook;
use crate::prefs::{ArgumentParsingResult, parse_command_line_arguments};

pub fn main() {
    panic::set_hook(Box::new(panic_hook::panic_hook));

    // Skip the first argument, which is the binary name.
    let args: Vec<String> = env::args().skip(1).collect();
    let preferences = match parse_command_line_arguments(&args) {
        ArgumentParsingResult::Run(preferences) => preferences,
        ArgumentParsingResult::Exit => process::exit(0),
        ArgumentParsingResult::ErrorParsing => process::exit(1),
    };

    crate::init_tracing(Some(preferences.tracing_filter_or_default()));
    log::info!("revoshell {} starting at {}", crate::VERSION, preferences.entry_url);

    #[cfg_attr(not(target_os = "linux"), allow(unused_mut))]
    let mut builder = EventLoop::<ShellEvent>::with_user_event();
    // wry attaches to X11 windows only; Wayland sessions go through XWayland.
    #[cfg(target_os = "linux")]
    {
        use winit::platform::x11::EventLoopBuilderExtX11;
        builder.with_x11();
    }
    let event_loop = match builder.build() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            error!("failed to create event loop: {e}");
            process::exit(1);
        },
    };

    let mut app = App::new(preferences, event_loop.create_proxy());
    if let Err(e) = event_loop.run_app(&mut app) {
        error!("event loop stopped: {e}");
        process::exit(1);
    }
    if app.failure().is_some() {
        process::exit(1);
    }
}
