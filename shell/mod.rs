/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Platform-independent shell: the controller and the policies it applies.
//! Nothing in here knows about wry or winit.

pub mod back_navigation;
pub mod chrome;
pub mod controller;
pub mod file_chooser;
pub mod host_trait;
pub mod navigation;
pub mod permissions;
pub mod refresh;
pub mod surface_settings;

pub use back_navigation::BackPressOutcome;
pub use controller::{ShellController, ShellInitOptions};
pub use navigation::{ExternalLinkDelegate, NavigationDecider, NavigationDecision, NavigationPolicy};
