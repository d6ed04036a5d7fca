/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

/// Pull-to-refresh state.
///
/// The gesture is only recognized while the content sits exactly at the top.
/// A refresh stays "in flight" from the gesture until the surface reports a
/// finished page load, so multi-redirect reloads keep the indicator up.
#[derive(Debug)]
pub struct PullToRefresh {
    enabled: bool,
    refreshing: bool,
}

impl PullToRefresh {
    pub fn new() -> Self {
        // Content starts at offset zero.
        Self {
            enabled: true,
            refreshing: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    /// Recompute enablement from the latest vertical scroll offset. Returns
    /// whether it changed.
    pub fn on_scroll(&mut self, offset_y: f64) -> bool {
        let enabled = offset_y == 0.0;
        let changed = enabled != self.enabled;
        self.enabled = enabled;
        changed
    }

    /// Returns `true` when the gesture should issue a reload.
    pub fn begin(&mut self) -> bool {
        if !self.enabled || self.refreshing {
            return false;
        }
        self.refreshing = true;
        true
    }

    /// Page load finished. Returns whether a refresh was in flight.
    pub fn finish(&mut self) -> bool {
        std::mem::replace(&mut self.refreshing, false)
    }
}

impl Default for PullToRefresh {
    fn default() -> Self {
        Self::new()
    }
}
