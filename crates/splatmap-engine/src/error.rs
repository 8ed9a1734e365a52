/// Errors returned by paint and coverage operations.
///
/// Synchronization failures (`DeviceLost`, `Poll`, `Map`, `ReadbackChannel`)
/// leave the GPU state unknown. They are fatal for the session and are never
/// retried internally.
#[derive(Debug, thiserror::Error)]
pub enum PaintError {
    /// The surface or engine was disposed; no further GPU work is accepted.
    #[error("paint resources have been disposed")]
    Disposed,

    /// A coverage query was issued before any texture was bound.
    #[error("color reduction engine has no bound texture")]
    NotBound,

    /// The device-lost callback fired.
    #[error("gpu device was lost")]
    DeviceLost,

    #[error("gpu poll failed: {0:?}")]
    Poll(wgpu::PollError),

    #[error("readback buffer map failed: {0:?}")]
    Map(wgpu::BufferAsyncError),

    /// The map callback was dropped without reporting a result.
    #[error("readback callback did not complete")]
    ReadbackChannel,

    #[error("brush coordinate ({u}, {v}) is not finite")]
    InvalidCoordinate { u: f32, v: f32 },

    #[error("splat map size {size} is outside 1..={max}")]
    InvalidTextureSize { size: u32, max: u32 },

    #[error("full texture is {got}x{got}, splat map is {expected}x{expected}")]
    FullTextureSize { got: u32, expected: u32 },

    #[error("expected {expected} texels, got {got}")]
    PixelCount { got: usize, expected: usize },
}

impl PaintError {
    /// Returns `true` for errors after which the session must be torn down.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            PaintError::DeviceLost
                | PaintError::Poll(_)
                | PaintError::Map(_)
                | PaintError::ReadbackChannel
        )
    }
}
