/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use crate::shell::host_trait::BrowserSurface;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackPressOutcome {
    /// The surface stepped back in its history.
    Consumed,
    /// The host should run its default back handling (close the shell).
    Forwarded,
}

impl BackPressOutcome {
    pub fn is_consumed(self) -> bool {
        matches!(self, Self::Consumed)
    }
}

/// Routes the platform back signal into in-page history.
///
/// Once history runs out the interceptor disables itself, so the signal that
/// fell through and every later one go straight to the platform.
#[derive(Debug)]
pub struct BackPressInterceptor {
    enabled: bool,
}

impl BackPressInterceptor {
    pub fn new() -> Self {
        Self { enabled: true }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn handle(&mut self, surface: &dyn BrowserSurface) -> BackPressOutcome {
        if !self.enabled {
            return BackPressOutcome::Forwarded;
        }
        if surface.can_go_back() {
            surface.go_back();
            return BackPressOutcome::Consumed;
        }
        self.enabled = false;
        BackPressOutcome::Forwarded
    }
}

impl Default for BackPressInterceptor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeSurface;

    #[test]
    fn consumes_while_history_remains() {
        let surface = FakeSurface::with_history(&["https://revolib.fr/a", "https://revolib.fr/b"]);
        let mut back = BackPressInterceptor::new();

        assert_eq!(back.handle(&surface), BackPressOutcome::Consumed);
        assert_eq!(surface.history_depth(), 0);
        assert!(back.is_enabled());
    }

    #[test]
    fn disables_itself_when_history_is_empty() {
        let surface = FakeSurface::with_history(&["https://revolib.fr/a"]);
        let mut back = BackPressInterceptor::new();

        assert_eq!(back.handle(&surface), BackPressOutcome::Forwarded);
        assert!(!back.is_enabled());
        assert_eq!(surface.back_navigations(), 0);
    }

    #[test]
    fn disabled_interceptor_never_touches_surface() {
        let surface = FakeSurface::with_history(&["https://revolib.fr/a"]);
        let mut back = BackPressInterceptor::new();
        back.handle(&surface);

        surface.push_history("https://revolib.fr/b");
        assert_eq!(back.handle(&surface), BackPressOutcome::Forwarded);
        assert_eq!(surface.history_depth(), 1);
    }

    #[test]
    fn back_that_did_not_move_falls_through_once_corrected() {
        let surface = FakeSurface::with_history(&["https://revolib.fr/a"]);
        surface.report_can_go_back(Some(true));
        let mut back = BackPressInterceptor::new();

        assert_eq!(back.handle(&surface), BackPressOutcome::Consumed);
        assert_eq!(surface.history_depth(), 0);

        // The page reports that nothing moved; the press is replayed.
        surface.report_can_go_back(None);
        assert_eq!(back.handle(&surface), BackPressOutcome::Forwarded);
        assert!(!back.is_enabled());
        assert_eq!(surface.back_navigations(), 1);
    }
}
