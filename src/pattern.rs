use std::f32::consts::{FRAC_PI_4, PI, TAU};

use serde::Deserialize;

use crate::rng::RandomSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    Circle,
    Star,
    Ring,
    Scatter,
    Spiral,
}

/// How the [`Pattern::Ring`] burst is shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeartPattern {
    #[default]
    Ring,
    Curve,
}

impl HeartPattern {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "ring" => Some(HeartPattern::Ring),
            "curve" => Some(HeartPattern::Curve),
            _ => None,
        }
    }
}

pub(crate) const HEART_EXTENT: f32 = 17.0; // max |(x, y)| of the unscaled curve

impl Pattern {
    pub const ALL: [Pattern; 5] = [
        Pattern::Circle,
        Pattern::Star,
        Pattern::Ring,
        Pattern::Scatter,
        Pattern::Spiral,
    ];

    pub fn random<R: RandomSource + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.index(Self::ALL.len())]
    }

    pub fn speed_range(self) -> (f32, f32) {
        match self {
            Pattern::Ring => (1.0, 4.0),
            _ => (2.0, 7.0),
        }
    }

    /// Initial velocity of spark `index` out of `count`.
    pub fn velocity<R: RandomSource + ?Sized>(
        self,
        index: usize,
        count: usize,
        heart: HeartPattern,
        rng: &mut R,
    ) -> (f32, f32) {
        let (min, max) = self.speed_range();
        let speed = rng.range(min, max);
        let base = TAU * index as f32 / count as f32;

        let angle = match self {
            Pattern::Circle => base,
            Pattern::Star => base + PI / 5.0,
            Pattern::Ring if heart == HeartPattern::Curve => {
                let (hx, hy) = heart_curve(base);
                return (hx / HEART_EXTENT * speed, -hy / HEART_EXTENT * speed);
            }
            Pattern::Ring => base,
            Pattern::Scatter => base + rng.range(-FRAC_PI_4, FRAC_PI_4),
            Pattern::Spiral => base + 5.0 * PI / 4.0 * base.sin(),
        };

        (angle.cos() * speed, angle.sin() * speed)
    }
}

/// Point on the classic heart curve at parameter `t`, with `y` pointing up.
pub fn heart_curve(t: f32) -> (f32, f32) {
    let x = 16.0 * t.sin().powi(3);
    let y = 13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos();
    (x, y)
}

/// `count` points evenly spaced along the heart curve in screen space,
/// scaled by `scale * 0.3` and lifted 50 units above `center`.
pub fn heart_points(count: usize, center: (f32, f32), scale: f32) -> Vec<(f32, f32)> {
    if count == 0 {
        return Vec::new();
    }
    let step = TAU / count as f32;
    (0..count)
        .map(|i| {
            let (x, y) = heart_curve(i as f32 * step);
            (
                center.0 + x * scale * 0.3,
                center.1 - 50.0 - y * scale * 0.3,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SequenceRng;

    fn speed((vx, vy): (f32, f32)) -> f32 {
        vx.hypot(vy)
    }

    #[test]
    fn test_random_covers_all_patterns() {
        for (i, expected) in Pattern::ALL.iter().enumerate() {
            let mut rng = SequenceRng::constant((i as f32 + 0.5) / 5.0);
            assert_eq!(Pattern::random(&mut rng), *expected);
        }
    }

    #[test]
    fn test_circle_angles_are_evenly_spaced() {
        let mut rng = SequenceRng::constant(0.0);
        let v = Pattern::Circle.velocity(1, 4, HeartPattern::Ring, &mut rng);
        assert!(v.0.abs() < 1e-5);
        assert!((v.1 - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_star_offsets_by_fifth_of_pi() {
        let mut rng = SequenceRng::constant(0.0);
        let (vx, vy) = Pattern::Star.velocity(0, 10, HeartPattern::Ring, &mut rng);
        assert!((vy.atan2(vx) - PI / 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_spiral_bends_angle() {
        let mut rng = SequenceRng::constant(0.0);
        // base = π/2, bent by 5π/4
        let (vx, vy) = Pattern::Spiral.velocity(1, 4, HeartPattern::Ring, &mut rng);
        let expected = PI / 2.0 + 5.0 * PI / 4.0;
        assert!((vx - expected.cos() * 2.0).abs() < 1e-4);
        assert!((vy - expected.sin() * 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_speeds_respect_pattern_bounds() {
        let mut rng = fastrand::Rng::with_seed(3);
        for pattern in Pattern::ALL {
            let (min, max) = pattern.speed_range();
            for i in 0..500 {
                let s = speed(pattern.velocity(i, 500, HeartPattern::Ring, &mut rng));
                assert!(s >= min - 1e-4 && s < max + 1e-4, "{pattern:?}: {s}");
            }
        }
    }

    #[test]
    fn test_heart_curve_stays_within_speed_budget() {
        let mut rng = fastrand::Rng::with_seed(9);
        for i in 0..720 {
            let s = speed(Pattern::Ring.velocity(i, 720, HeartPattern::Curve, &mut rng));
            assert!(s < 4.0 * 1.05, "{s}");
        }
    }

    #[test]
    fn test_heart_points_layout() {
        let points = heart_points(4, (100.0, 100.0), 10.0);
        assert_eq!(points.len(), 4);
        // t = 0 is the top cleft: x on center, y = 13 - 5 - 2 - 1 = 5
        assert!((points[0].0 - 100.0).abs() < 1e-4);
        assert!((points[0].1 - (100.0 - 50.0 - 5.0 * 3.0)).abs() < 1e-4);
        assert!(heart_points(0, (0.0, 0.0), 1.0).is_empty());
    }

    #[test]
    fn test_parse_heart_pattern() {
        assert_eq!(HeartPattern::parse("ring"), Some(HeartPattern::Ring));
        assert_eq!(HeartPattern::parse("curve"), Some(HeartPattern::Curve));
        assert_eq!(HeartPattern::parse("heart"), None);
    }
}
