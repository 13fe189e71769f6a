//! Decode-time resource limits.

use crate::error::{BmpError, Result};

/// Caps checked against the header before any pixel allocation.
///
/// All fields are optional; `None` means no limit for that resource.
///
/// ```
/// use bmpxform::Limits;
///
/// let limits = Limits::none()
///     .with_max_pixels(100_000_000)
///     .with_max_memory(512 * 1024 * 1024);
/// assert!(limits.has_any());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct Limits {
    /// Maximum image width in pixels.
    pub max_width: Option<u32>,
    /// Maximum image height in pixels (sign ignored).
    pub max_height: Option<u32>,
    /// Maximum total pixels (width × height).
    pub max_pixels: Option<u64>,
    /// Maximum pixel array allocation in bytes.
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    /// No limits (all fields `None`).
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_max_width(mut self, width: u32) -> Self {
        self.max_width = Some(width);
        self
    }

    pub fn with_max_height(mut self, height: u32) -> Self {
        self.max_height = Some(height);
        self
    }

    pub fn with_max_pixels(mut self, max: u64) -> Self {
        self.max_pixels = Some(max);
        self
    }

    pub fn with_max_memory(mut self, bytes: u64) -> Self {
        self.max_memory_bytes = Some(bytes);
        self
    }

    /// Whether any limits are set.
    pub fn has_any(&self) -> bool {
        self.max_width.is_some()
            || self.max_height.is_some()
            || self.max_pixels.is_some()
            || self.max_memory_bytes.is_some()
    }

    /// Reject a `width` × `height` image whose pixel array takes `bytes`.
    pub fn check(&self, width: u32, height: u32, bytes: u64) -> Result<()> {
        if self.max_width.is_some_and(|max| width > max) {
            return Err(BmpError::LimitExceeded("image width"));
        }
        if self.max_height.is_some_and(|max| height > max) {
            return Err(BmpError::LimitExceeded("image height"));
        }
        if self
            .max_pixels
            .is_some_and(|max| u64::from(width) * u64::from(height) > max)
        {
            return Err(BmpError::LimitExceeded("pixel count"));
        }
        if self.max_memory_bytes.is_some_and(|max| bytes > max) {
            return Err(BmpError::LimitExceeded("pixel array size"));
        }
        Ok(())
    }
}
