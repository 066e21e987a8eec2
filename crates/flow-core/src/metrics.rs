/// Counts executed frames and reports a rate once per elapsed second.
#[derive(Clone, Debug, Default)]
pub struct FpsMeter {
    window_start_ms: Option<f64>,
    frames: u32,
}

impl FpsMeter {
    pub fn record(&mut self, now_ms: f64) -> Option<u32> {
        let start = *self.window_start_ms.get_or_insert(now_ms);
        self.frames += 1;
        let span = now_ms - start;
        if span >= 1000.0 {
            let fps = (self.frames as f64 * 1000.0 / span).round() as u32;
            self.frames = 0;
            self.window_start_ms = Some(now_ms);
            Some(fps)
        } else {
            None
        }
    }
}
