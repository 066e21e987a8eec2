use crate::constants::RESIZE_DEBOUNCE_MS;

/// Drawing-surface size in physical pixels for a CSS box, with the device
/// pixel ratio capped at `max_pixel_ratio`. Never returns a zero dimension.
pub fn backing_size(css_width: f64, css_height: f64, device_pixel_ratio: f64, max_pixel_ratio: f64) -> (u32, u32) {
    let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
        device_pixel_ratio.min(max_pixel_ratio)
    } else {
        1.0
    };
    let w = (css_width.max(0.0) * dpr) as u32;
    let h = (css_height.max(0.0) * dpr) as u32;
    (w.max(1), h.max(1))
}

/// Trailing-edge debounce for continuous resize events.
///
/// Only the latest requested size is kept; it is released once no new request
/// has arrived for `delay_ms`.
#[derive(Clone, Debug)]
pub struct ResizeDebouncer {
    delay_ms: f64,
    pending: Option<(u32, u32)>,
    last_request_ms: f64,
}

impl Default for ResizeDebouncer {
    fn default() -> Self {
        Self::new(RESIZE_DEBOUNCE_MS)
    }
}

impl ResizeDebouncer {
    pub fn new(delay_ms: f64) -> Self {
        Self {
            delay_ms,
            pending: None,
            last_request_ms: 0.0,
        }
    }

    pub fn request(&mut self, width: u32, height: u32, now_ms: f64) {
        self.pending = Some((width, height));
        self.last_request_ms = now_ms;
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn poll(&mut self, now_ms: f64) -> Option<(u32, u32)> {
        if self.pending.is_some() && now_ms - self.last_request_ms >= self.delay_ms {
            self.pending.take()
        } else {
            None
        }
    }
}
