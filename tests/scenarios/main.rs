/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::path::PathBuf;

use revoshell::VERSION;
use revoshell::shell::BackPressOutcome;
use revoshell::shell::NavigationDecision;
use revoshell::shell::file_chooser::{FileChooserParams, FilePickerOutcome, FileSelection};
use revoshell::test_utils::{TestHarness, recording_callback};

const ENTRY: &str = "https://revolib.fr/accueil-app/";

#[test]
fn scenarios_binary_smoke_runs() {
    assert!(!VERSION.is_empty());
}

#[test]
fn login_page_stays_in_the_shell() {
    let mut harness = TestHarness::initialized();

    let url = "https://revolib.fr/accueil-app/login";
    assert!(harness.navigate(url));
    assert_eq!(harness.surface.current_url().as_deref(), Some(url));
    assert!(harness.launcher.launched().is_empty());
}

#[test]
fn google_sign_in_stays_in_the_shell() {
    let mut harness = TestHarness::initialized();

    let url = "https://accounts.google.com/o/oauth2/v2/auth?client_id=revolib";
    assert!(harness.navigate(url));
    assert_eq!(harness.surface.current_url().as_deref(), Some(url));
    assert!(harness.launcher.launched().is_empty());
}

#[test]
fn maps_link_opens_in_system_browser_and_surface_stays_put() {
    let harness = TestHarness::initialized();

    let url = "https://maps.apple.com/?q=paris";
    assert_eq!(
        harness.controller.on_navigation_requested(url),
        NavigationDecision::HandledExternally
    );
    assert_eq!(harness.launcher.launched(), vec![url]);
    assert_eq!(harness.surface.current_url().as_deref(), Some(ENTRY));
    assert_eq!(harness.surface.loaded_urls(), vec![ENTRY]);
}

#[test]
fn external_link_without_handler_is_dropped() {
    let mut harness = TestHarness::initialized();
    harness.launcher.remove_handlers();

    assert!(!harness.navigate("mailto:contact@example.com"));
    assert_eq!(harness.surface.current_url().as_deref(), Some(ENTRY));
    assert!(harness.launcher.launched().is_empty());
}

#[test]
fn scrolling_down_then_back_to_top_rearms_pull_to_refresh() {
    let mut harness = TestHarness::initialized();

    harness.controller.on_scroll_changed(120.0);
    assert!(!harness.controller.is_refresh_enabled());
    assert!(!harness.controller.on_refresh_gesture());

    harness.controller.on_scroll_changed(0.0);
    assert!(harness.controller.is_refresh_enabled());
    assert!(harness.controller.on_refresh_gesture());
    assert_eq!(harness.surface.reloads(), 1);
    assert!(harness.chrome.is_refreshing());

    harness.controller.on_page_finished(ENTRY);
    assert!(!harness.chrome.is_refreshing());
    assert_eq!(harness.chrome.refreshing_changes(), vec![true, false]);
}

#[test]
fn back_walks_history_then_falls_through_once() {
    let mut harness = TestHarness::initialized();
    harness.navigate("https://revolib.fr/a");
    harness.navigate("https://revolib.fr/b");
    harness.navigate("https://revolib.fr/c");
    assert_eq!(harness.surface.history_depth(), 3);

    for _ in 0..3 {
        assert_eq!(harness.controller.on_back_pressed(), BackPressOutcome::Consumed);
    }
    assert_eq!(harness.surface.history_depth(), 0);
    assert_eq!(harness.surface.current_url().as_deref(), Some(ENTRY));

    assert_eq!(harness.controller.on_back_pressed(), BackPressOutcome::Forwarded);
    assert!(!harness.controller.is_back_interception_enabled());
    assert_eq!(harness.surface.back_navigations(), 3);
}

#[test]
fn second_file_request_resolves_first_with_nothing() {
    let mut harness = TestHarness::initialized();
    let (first, first_results) = recording_callback();
    let (second, second_results) = recording_callback();
    let params = FileChooserParams {
        accept_types: vec!["image/*".into()],
        ..Default::default()
    };

    harness.controller.on_file_chooser_requested(params.clone(), first);
    let first_request = harness.file_picker.last_request().unwrap();
    harness.controller.on_file_chooser_requested(params, second);
    let second_request = harness.file_picker.last_request().unwrap();
    assert_eq!(*first_results.borrow(), vec![FileSelection::empty()]);

    // The abandoned first dialog closing late must not feed the second input.
    harness.controller.on_file_picker_finished(
        first_request,
        FilePickerOutcome::Selected(vec![PathBuf::from("/home/user/old.jpg")]),
    );
    assert!(second_results.borrow().is_empty());

    let picked = vec![PathBuf::from("/home/user/receipt.jpg")];
    harness
        .controller
        .on_file_picker_finished(second_request, FilePickerOutcome::Selected(picked.clone()));

    assert_eq!(*second_results.borrow(), vec![FileSelection::from(picked)]);
    assert_eq!(first_results.borrow().len(), 1);
    assert_eq!(harness.file_picker.launches().len(), 2);
}

#[test]
fn startup_asks_for_camera_and_storage_once() {
    let harness = TestHarness::initialized();
    assert_eq!(harness.permissions.requests().len(), 1);
    assert_eq!(harness.permissions.requests()[0].len(), 2);
}
