/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Revolib app shell: a single window hosting the Revolib web app in an
//! embedded browser, with pull-to-refresh, back navigation into page history,
//! external-link hand-off and upload bridging.

pub mod desktop;
mod panic_hook;
pub mod prefs;
pub mod shell;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Install the global `tracing` subscriber. `log` records are bridged into it.
///
/// An invalid `filter` falls back to [`prefs::DEFAULT_TRACING_FILTER`]. Calling
/// this twice is harmless; the second call keeps the first subscriber.
pub fn init_tracing(filter: Option<&str>) {
    use tracing_subscriber::EnvFilter;

    let filter = filter.unwrap_or(prefs::DEFAULT_TRACING_FILTER);
    let env_filter = match EnvFilter::try_new(filter) {
        Ok(env_filter) => env_filter,
        Err(e) => {
            eprintln!("ignoring tracing filter {filter:?}: {e}");
            EnvFilter::new(prefs::DEFAULT_TRACING_FILTER)
        },
    };

    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .try_init()
    {
        log::debug!("tracing already initialized: {e}");
    }
}
