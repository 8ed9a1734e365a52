use crate::PaintError;

/// Row pitch alignment required by texture-to-buffer copies.
pub(crate) const COPY_BYTES_PER_ROW_ALIGNMENT: u32 = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;

/// Rounds `value` up to the next multiple of `alignment` (a power of two).
#[inline]
pub(crate) fn align_to(value: u32, alignment: u32) -> u32 {
    let mask = alignment - 1;
    (value + mask) & !mask
}

/// Maps `slice` for reading and blocks until the map completes.
///
/// The poll waits for every submission queued so far, so earlier paint passes
/// are complete when this returns.
pub(crate) fn wait_for_map(
    device: &wgpu::Device,
    slice: wgpu::BufferSlice<'_>,
) -> Result<(), PaintError> {
    let (tx, rx) = std::sync::mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |res| {
        let _ = tx.send(res);
    });

    device
        .poll(wgpu::PollType::wait_indefinitely())
        .map_err(PaintError::Poll)?;

    rx.recv()
        .map_err(|_| PaintError::ReadbackChannel)?
        .map_err(PaintError::Map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_keeps_aligned_values() {
        assert_eq!(align_to(16384, COPY_BYTES_PER_ROW_ALIGNMENT), 16384);
    }

    #[test]
    fn align_rounds_up() {
        // 20 texels of Rgba32Float = 320 bytes.
        assert_eq!(align_to(320, COPY_BYTES_PER_ROW_ALIGNMENT), 512);
        assert_eq!(align_to(1, 4), 4);
    }
}
