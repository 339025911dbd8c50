use std::time::Duration;

/// Linear glide between two points over a fixed duration, advanced by
/// explicit time deltas rather than wall-clock reads.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    from: (f32, f32),
    to: (f32, f32),
    duration: Duration,
    elapsed: Duration,
}

impl Tween {
    pub fn new(from: (f32, f32), to: (f32, f32), duration: Duration) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: Duration::ZERO,
        }
    }

    /// Advances by `dt` and returns the new position. Overshoot clamps to the
    /// endpoint, so the final position is exact.
    pub fn advance(&mut self, dt: Duration) -> (f32, f32) {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        self.position()
    }

    pub fn position(&self) -> (f32, f32) {
        let t = if self.duration.is_zero() {
            1.0
        } else {
            self.elapsed.as_secs_f32() / self.duration.as_secs_f32()
        };
        (
            self.from.0 + (self.to.0 - self.from.0) * t,
            self.from.1 + (self.to.1 - self.from.1) * t,
        )
    }

    pub fn target(&self) -> (f32, f32) {
        self.to
    }

    pub fn finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_linearly() {
        let mut tween = Tween::new((0.0, 0.0), (20.0, -10.0), Duration::from_millis(200));
        assert_eq!(tween.advance(Duration::from_millis(100)), (10.0, -5.0));
        assert!(!tween.finished());
    }

    #[test]
    fn lands_exactly_on_the_target() {
        let mut tween = Tween::new((100.0, 100.0), (120.0, 100.0), Duration::from_millis(200));
        tween.advance(Duration::from_millis(150));
        let (x, y) = tween.advance(Duration::from_millis(50));
        assert_eq!((x, y), (120.0, 100.0));
        assert!(tween.finished());
    }

    #[test]
    fn overshoot_clamps_to_the_endpoint() {
        let mut tween = Tween::new((0.0, 0.0), (20.0, 0.0), Duration::from_millis(200));
        assert_eq!(tween.advance(Duration::from_secs(5)), (20.0, 0.0));
        assert!(tween.finished());
    }

    #[test]
    fn zero_duration_completes_immediately() {
        let tween = Tween::new((1.0, 2.0), (3.0, 4.0), Duration::ZERO);
        assert_eq!(tween.position(), (3.0, 4.0));
        assert!(tween.finished());
    }
}
