use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::PaintError;

/// Shared device-loss flag.
///
/// Cloned into every component that submits work. The flag is set from the
/// wgpu device-lost callback and never cleared; a lost device ends the session.
#[derive(Debug, Clone, Default)]
pub struct DeviceHealth {
    lost: Arc<AtomicBool>,
}

impl DeviceHealth {
    /// Installs the device-lost callback that flips this flag.
    pub(crate) fn watch(&self, device: &wgpu::Device) {
        let lost = Arc::clone(&self.lost);
        device.set_device_lost_callback(move |reason, message| {
            lost.store(true, Ordering::Release);
            match reason {
                wgpu::DeviceLostReason::Destroyed => {
                    log::debug!("gpu device destroyed: {message}");
                }
                _ => log::error!("gpu device lost ({reason:?}): {message}"),
            }
        });
    }

    #[inline]
    pub fn is_lost(&self) -> bool {
        self.lost.load(Ordering::Acquire)
    }

    /// Fails with `PaintError::DeviceLost` once the device is gone.
    #[inline]
    pub fn check(&self) -> Result<(), PaintError> {
        if self.is_lost() {
            Err(PaintError::DeviceLost)
        } else {
            Ok(())
        }
    }

    /// Marks the device as lost without waiting for the driver callback.
    pub fn mark_lost(&self) {
        self.lost.store(true, Ordering::Release);
    }
}
