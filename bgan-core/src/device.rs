//! Process-wide device visibility.

use crate::config::DeviceConfig;

/// Environment variable read by the CUDA runtime when it initialises.
pub const VISIBLE_DEVICES_VAR: &str = "CUDA_VISIBLE_DEVICES";

/// Restrict the devices visible to this process.
///
/// Has no effect on a CUDA context that already exists, so call this first
/// thing at startup, before any threads or device-aware resources are created.
pub fn apply_visibility(device: &DeviceConfig) {
    let previous = current_visibility();
    // SAFETY: called once during single-threaded startup, before anything
    // else reads the environment. Tests hold `figment::Jail`'s lock.
    unsafe { std::env::set_var(VISIBLE_DEVICES_VAR, &device.visible_devices) };
    tracing::info!(
        devices = %device.visible_devices,
        previous = previous.as_deref().unwrap_or("<unset>"),
        allow_growth = device.allow_growth,
        "Applied device visibility"
    );
}

/// Current value of the visible-device list, if set.
pub fn current_visibility() -> Option<String> {
    std::env::var(VISIBLE_DEVICES_VAR).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    use figment::Jail;

    #[test]
    fn test_apply_visibility_sets_env() {
        // The jail serialises environment access with the settings-loading
        // tests and restores the variable afterwards.
        Jail::expect_with(|jail| {
            jail.set_env(VISIBLE_DEVICES_VAR, "0");
            assert_eq!(current_visibility().as_deref(), Some("0"));

            let device = DeviceConfig {
                visible_devices: "1,3".into(),
                allow_growth: true,
            };
            apply_visibility(&device);
            assert_eq!(current_visibility().as_deref(), Some("1,3"));
            Ok(())
        });
    }
}
