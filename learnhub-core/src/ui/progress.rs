use std::f64::consts::PI;
use std::time::Duration;

pub const DEFAULT_ANIMATION: Duration = Duration::from_millis(1000);

/// Stroke geometry of a circular progress indicator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressRing {
    pub radius: f64,
}

impl ProgressRing {
    pub fn new(radius: f64) -> Self {
        Self { radius }
    }

    pub fn circumference(&self) -> f64 {
        2.0 * PI * self.radius
    }

    /// `stroke-dashoffset` for `percent`, clamped to `0..=100`.
    pub fn dash_offset(&self, percent: f64) -> f64 {
        let percent = if percent.is_nan() { 0.0 } else { percent.clamp(0.0, 100.0) };
        let circumference = self.circumference();
        circumference - percent / 100.0 * circumference
    }

    pub fn label(percent: u8) -> String {
        format!("{percent}%")
    }
}

/// Linear interpolation between two progress values over a duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressAnimation {
    pub from: u8,
    pub to: u8,
    pub duration: Duration,
}

impl ProgressAnimation {
    pub fn new(from: u8, to: u8) -> Self {
        Self {
            from,
            to,
            duration: DEFAULT_ANIMATION,
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Rounded value to display after `elapsed`.
    pub fn value_at(&self, elapsed: Duration) -> u8 {
        let fraction = if self.duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
        };
        let from = f64::from(self.from);
        let value = from + (f64::from(self.to) - from) * fraction;
        value.round().clamp(0.0, 255.0) as u8
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_offsets() {
        let ring = ProgressRing::new(50.0);
        let c = ring.circumference();
        assert!((ring.dash_offset(0.0) - c).abs() < 1e-9);
        assert!(ring.dash_offset(100.0).abs() < 1e-9);
        assert!((ring.dash_offset(25.0) - 0.75 * c).abs() < 1e-9);
        assert!(ring.dash_offset(140.0).abs() < 1e-9);
        assert_eq!(ProgressRing::label(40), "40%");
    }

    #[test]
    fn animation_interpolates_and_settles() {
        let anim = ProgressAnimation::new(20, 80);
        assert_eq!(anim.value_at(Duration::ZERO), 20);
        assert_eq!(anim.value_at(Duration::from_millis(500)), 50);
        assert_eq!(anim.value_at(Duration::from_secs(5)), 80);
        assert!(anim.is_finished(Duration::from_millis(1000)));

        let down = ProgressAnimation::new(90, 10).with_duration(Duration::ZERO);
        assert_eq!(down.value_at(Duration::ZERO), 10);
    }
}
