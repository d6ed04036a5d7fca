/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The desktop host: a winit window carrying a wry webview.

pub(crate) mod app;
pub mod bridge_script;
pub mod cli;
pub mod events;
pub(crate) mod system;
pub(crate) mod wry_surface;
