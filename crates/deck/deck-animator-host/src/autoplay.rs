/// One-shot countdown used to leave an idle slide during autoplay.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IdleTimer {
    remaining_ms: Option<f64>,
}

impl IdleTimer {
    pub fn arm(&mut self, ms: u32) {
        self.remaining_ms = Some(f64::from(ms));
    }

    pub fn cancel(&mut self) {
        self.remaining_ms = None;
    }

    pub fn is_armed(&self) -> bool {
        self.remaining_ms.is_some()
    }

    /// Count down by `dt_ms`; true exactly once, when the timer runs out.
    pub fn tick(&mut self, dt_ms: f64) -> bool {
        match self.remaining_ms {
            Some(left) if left - dt_ms.max(0.0) <= 0.0 => {
                self.remaining_ms = None;
                true
            }
            Some(left) => {
                self.remaining_ms = Some(left - dt_ms.max(0.0));
                false
            }
            None => false,
        }
    }
}
