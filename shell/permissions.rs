/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use crate::shell::host_trait::PermissionBroker;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Permission {
    Camera,
    ReadStorage,
}

/// Requested together at startup when the camera is not granted yet.
pub const STARTUP_PERMISSIONS: [Permission; 2] = [Permission::Camera, Permission::ReadStorage];

/// One-shot startup prompt for upload capture.
///
/// Best effort: the answer is not awaited, and the engine asks again when an
/// upload input actually needs the capability. Returns whether a request was
/// issued.
pub fn request_startup_permissions(broker: &dyn PermissionBroker) -> bool {
    if broker.is_granted(Permission::Camera) {
        return false;
    }
    log::debug!("permissions: requesting {STARTUP_PERMISSIONS:?}");
    broker.request(&STARTUP_PERMISSIONS);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakePermissions;

    #[test]
    fn requests_camera_and_storage_when_camera_missing() {
        let broker = FakePermissions::default();
        assert!(request_startup_permissions(&broker));
        assert_eq!(broker.requests(), vec![STARTUP_PERMISSIONS.to_vec()]);
    }

    #[test]
    fn skips_prompt_when_camera_granted() {
        let broker = FakePermissions::granting(&[Permission::Camera]);
        assert!(!request_startup_permissions(&broker));
        assert!(broker.requests().is_empty());
    }

    #[test]
    fn storage_alone_does_not_suppress_prompt() {
        let broker = FakePermissions::granting(&[Permission::ReadStorage]);
        assert!(request_startup_permissions(&broker));
    }
}
