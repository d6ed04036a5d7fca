/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Top-level navigation policy.
//!
//! A candidate URL stays in the embedded surface when its text contains one
//! of the internal markers (the app's own domain, the login provider). Every
//! other URL goes to the system handler. Matching is plain substring
//! containment on the whole URL text; no host parsing happens here.

use crate::shell::host_trait::ExternalUrlLauncher;

/// Marker for the app's own domain.
pub const APP_DOMAIN_MARKER: &str = "revolib";
/// Marker for the identity provider used by the login flow.
pub const IDENTITY_PROVIDER_MARKER: &str = "accounts.google.com";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavigationTarget {
    Internal,
    External,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavigationDecision {
    /// The surface loads the URL itself.
    LoadInternally,
    /// The system handler took the URL; the surface stays where it is.
    HandledExternally,
    /// No handler accepted the URL. The navigation is cancelled, not loaded.
    Dropped,
}

impl NavigationDecision {
    /// Answer for the engine's "may this navigation proceed" hook.
    pub fn allows_surface_load(self) -> bool {
        matches!(self, Self::LoadInternally)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationPolicy {
    internal_markers: Vec<String>,
}

impl NavigationPolicy {
    pub fn new<I, S>(internal_markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            internal_markers: internal_markers
                .into_iter()
                .map(Into::into)
                .filter(|marker: &String| !marker.is_empty())
                .collect(),
        }
    }

    pub fn internal_markers(&self) -> &[String] {
        &self.internal_markers
    }

    pub fn classify(&self, url: &str) -> NavigationTarget {
        if self
            .internal_markers
            .iter()
            .any(|marker| url.contains(marker.as_str()))
        {
            NavigationTarget::Internal
        } else {
            NavigationTarget::External
        }
    }
}

impl Default for NavigationPolicy {
    fn default() -> Self {
        Self::new([APP_DOMAIN_MARKER, IDENTITY_PROVIDER_MARKER])
    }
}

/// Decides every top-level navigation of the surface.
///
/// Must answer synchronously: the engine blocks the navigation until it
/// returns.
pub trait NavigationDecider: Send + Sync {
    fn decide(&self, url: &str) -> NavigationDecision;
}

/// Keeps internal URLs in the surface and hands the rest to the system.
pub struct ExternalLinkDelegate<L> {
    policy: NavigationPolicy,
    launcher: L,
}

impl<L: ExternalUrlLauncher> ExternalLinkDelegate<L> {
    pub fn new(policy: NavigationPolicy, launcher: L) -> Self {
        Self { policy, launcher }
    }

    pub fn policy(&self) -> &NavigationPolicy {
        &self.policy
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }
}

impl<L: ExternalUrlLauncher> NavigationDecider for ExternalLinkDelegate<L> {
    fn decide(&self, url: &str) -> NavigationDecision {
        match self.policy.classify(url) {
            NavigationTarget::Internal => NavigationDecision::LoadInternally,
            NavigationTarget::External => match self.launcher.launch(url) {
                Ok(()) => {
                    log::debug!("navigation: {url} handed to system handler");
                    NavigationDecision::HandledExternally
                },
                Err(e) => {
                    log::warn!("navigation: dropping {url}: {e}");
                    NavigationDecision::Dropped
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use proptest::prelude::*;
    use rstest::rstest;

    use super::*;
    use crate::shell::host_trait::LaunchError;

    #[derive(Default)]
    struct Launches {
        urls: Mutex<Vec<String>>,
    }

    impl ExternalUrlLauncher for Launches {
        fn launch(&self, url: &str) -> Result<(), LaunchError> {
            self.urls.lock().unwrap().push(url.to_string());
            Ok(())
        }
    }

    fn no_handler(url: &str) -> Result<(), LaunchError> {
        Err(LaunchError::NoHandler(url.to_string()))
    }

    #[rstest]
    #[case("https://revolib.fr/accueil-app/login", NavigationTarget::Internal)]
    #[case("https://accounts.google.com/o/oauth2/v2/auth?client_id=x", NavigationTarget::Internal)]
    #[case("https://shop.revolib.fr/", NavigationTarget::Internal)]
    #[case("https://example.com/?next=revolib", NavigationTarget::Internal)]
    #[case("https://maps.apple.com/?q=paris", NavigationTarget::External)]
    #[case("mailto:contact@example.org", NavigationTarget::External)]
    #[case("https://REVOLIB.fr/", NavigationTarget::External)]
    #[case("https://google.com/", NavigationTarget::External)]
    fn classifies_by_substring(#[case] url: &str, #[case] expected: NavigationTarget) {
        assert_eq!(NavigationPolicy::default().classify(url), expected);
    }

    #[test]
    fn empty_markers_are_ignored() {
        let policy = NavigationPolicy::new(["", "revolib"]);
        assert_eq!(policy.internal_markers(), ["revolib".to_string()]);
        assert_eq!(policy.classify("https://example.com"), NavigationTarget::External);
    }

    #[test]
    fn internal_url_never_reaches_launcher() {
        let delegate = ExternalLinkDelegate::new(NavigationPolicy::default(), Launches::default());
        let decision = delegate.decide("https://revolib.fr/accueil-app/");
        assert_eq!(decision, NavigationDecision::LoadInternally);
        assert!(decision.allows_surface_load());
        assert!(delegate.launcher().urls.lock().unwrap().is_empty());
    }

    #[test]
    fn external_url_is_launched_and_not_loaded() {
        let delegate = ExternalLinkDelegate::new(NavigationPolicy::default(), Launches::default());
        let decision = delegate.decide("https://maps.apple.com/?q=paris");
        assert_eq!(decision, NavigationDecision::HandledExternally);
        assert!(!decision.allows_surface_load());
        assert_eq!(
            *delegate.launcher().urls.lock().unwrap(),
            vec!["https://maps.apple.com/?q=paris".to_string()]
        );
    }

    #[test]
    fn launch_failure_drops_navigation() {
        let delegate = ExternalLinkDelegate::new(NavigationPolicy::default(), no_handler);
        let decision = delegate.decide("weird-scheme://nothing");
        assert_eq!(decision, NavigationDecision::Dropped);
        assert!(!decision.allows_surface_load());
    }

    proptest! {
        #[test]
        fn urls_with_a_marker_stay_internal(
            prefix in ".{0,40}",
            suffix in ".{0,40}",
            marker in prop_oneof![Just(APP_DOMAIN_MARKER), Just(IDENTITY_PROVIDER_MARKER)],
        ) {
            let url = format!("{prefix}{marker}{suffix}");
            let delegate =
                ExternalLinkDelegate::new(NavigationPolicy::default(), Launches::default());
            prop_assert_eq!(delegate.decide(&url), NavigationDecision::LoadInternally);
            prop_assert!(delegate.launcher().urls.lock().unwrap().is_empty());
        }

        #[test]
        fn urls_without_a_marker_go_external(url in "[a-z:/.?=&0-9]{0,60}") {
            prop_assume!(!url.contains(APP_DOMAIN_MARKER));
            prop_assume!(!url.contains(IDENTITY_PROVIDER_MARKER));
            let delegate =
                ExternalLinkDelegate::new(NavigationPolicy::default(), Launches::default());
            prop_assert_eq!(delegate.decide(&url), NavigationDecision::HandledExternally);
            prop_assert_eq!(delegate.launcher().urls.lock().unwrap().len(), 1);
        }
    }
}
