/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::io::Write;
use std::panic::PanicHookInfo;
use std::thread;

use log::error;

pub(crate) fn panic_hook(info: &PanicHookInfo) {
    let msg = payload_message(info);
    let current_thread = thread::current();
    let name = current_thread.name().unwrap_or("<unnamed>");

    let stderr = std::io::stderr();
    let mut stderr = stderr.lock();
    match info.location() {
        Some(location) => {
            let _ = writeln!(
                &mut stderr,
                "{msg} (thread {name}, at {}:{})",
                location.file(),
                location.line()
            );
        },
        None => {
            let _ = writeln!(&mut stderr, "{msg} (thread {name})");
        },
    }
    let _ = writeln!(&mut stderr, "{:?}", backtrace::Backtrace::new());
    drop(stderr);

    error!("{msg}");
}

fn payload_message<'a>(info: &'a PanicHookInfo) -> &'a str {
    match info.payload().downcast_ref::<&'static str>() {
        Some(s) => s,
        None => match info.payload().downcast_ref::<String>() {
            Some(s) => s.as_str(),
            None => "Box<Any>",
        },
    }
}
