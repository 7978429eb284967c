use std::f32::consts::TAU;

use bevy::prelude::Vec2;
use rand::Rng;

use crate::constants::{
    FRAGMENT_OFFSET_MAX, FRAGMENT_OFFSET_MIN, FRAGMENT_RADIUS_MAX, FRAGMENT_RADIUS_MIN,
};

pub const DEFAULT_FRAGMENT_COUNT: usize = 20;
pub const MIN_FRAGMENT_COUNT: usize = 1;
pub const MAX_FRAGMENT_COUNT: usize = 100;
/// Above this many fragments the UI shows a performance advisory.
pub const FRAGMENT_PERF_THRESHOLD: usize = 50;

/// Slowest and fastest outward kick given to fragments, px/s.
pub const MIN_BURST_SPEED: f32 = 300.0;
pub const MAX_BURST_SPEED: f32 = 1500.0;
/// Impact speed at which the kick saturates at MAX_BURST_SPEED.
pub const BURST_REF_SPEED: f32 = 3000.0;

/// Outward kick for a given impact speed: linear between the min and max
/// burst speeds over [0, BURST_REF_SPEED], saturating at both ends.
pub fn burst_speed(impact_speed: f32) -> f32 {
    let normalized = impact_speed.clamp(0.0, BURST_REF_SPEED) / BURST_REF_SPEED;
    MIN_BURST_SPEED + (MAX_BURST_SPEED - MIN_BURST_SPEED) * normalized
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CountWarning {
    /// The request was outside [1, 100] and was clamped.
    OutOfRange { clamped_to: usize },
    /// In range, but large enough to hurt frame times.
    HighCount { count: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FragmentRequest {
    pub count: usize,
    pub warning: Option<CountWarning>,
}

/// Fragment-count policy for the free-text field, read at burst time.
/// Empty, unparsable, or sub-1 input silently resolves to the default;
/// anything above 100 clamps down with an advisory; counts above 50 carry a
/// performance advisory. Fractional input is floored.
pub fn parse_fragment_count(raw: &str) -> FragmentRequest {
    let trimmed = raw.trim();
    let requested = trimmed.parse::<f64>().ok().filter(|v| v.is_finite());

    let count = match requested {
        Some(v) if v >= MIN_FRAGMENT_COUNT as f64 => v.floor() as usize,
        _ => DEFAULT_FRAGMENT_COUNT,
    };

    if count > MAX_FRAGMENT_COUNT {
        return FragmentRequest {
            count: MAX_FRAGMENT_COUNT,
            warning: Some(CountWarning::OutOfRange {
                clamped_to: MAX_FRAGMENT_COUNT,
            }),
        };
    }

    let warning = (count > FRAGMENT_PERF_THRESHOLD).then_some(CountWarning::HighCount { count });
    FragmentRequest { count, warning }
}

/// One fragment's placement: an angle on the ring, its body radius, and the
/// strictly positive outward offset it spawns at before the kick.
#[derive(Clone, Copy, Debug)]
pub struct FragmentSeed {
    pub angle: f32,
    pub radius: f32,
    pub offset: f32,
}

impl FragmentSeed {
    pub fn direction(&self) -> Vec2 {
        Vec2::new(self.angle.cos(), self.angle.sin())
    }
}

/// Lay `count` fragments evenly around the impact point, jittering each
/// fragment's size and ring distance.
pub fn fragment_layout<R: Rng>(count: usize, rng: &mut R) -> Vec<FragmentSeed> {
    (0..count)
        .map(|i| FragmentSeed {
            angle: TAU * i as f32 / count as f32,
            radius: rng.gen_range(FRAGMENT_RADIUS_MIN..FRAGMENT_RADIUS_MAX),
            offset: rng.gen_range(FRAGMENT_OFFSET_MIN..FRAGMENT_OFFSET_MAX),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn burst_speed_hits_both_endpoints() {
        assert_eq!(burst_speed(0.0), MIN_BURST_SPEED);
        assert_eq!(burst_speed(BURST_REF_SPEED), MAX_BURST_SPEED);
        assert_eq!(burst_speed(BURST_REF_SPEED * 10.0), MAX_BURST_SPEED);
        assert_eq!(burst_speed(-50.0), MIN_BURST_SPEED);
    }

    #[test]
    fn burst_speed_is_monotone_and_bounded() {
        let mut prev = burst_speed(0.0);
        for i in 1..=60 {
            let s = burst_speed(i as f32 * 60.0);
            assert!(s >= prev);
            assert!((MIN_BURST_SPEED..=MAX_BURST_SPEED).contains(&s));
            prev = s;
        }
    }

    #[test]
    fn in_range_counts_pass_through_floored() {
        assert_eq!(
            parse_fragment_count("35"),
            FragmentRequest {
                count: 35,
                warning: None
            }
        );
        assert_eq!(parse_fragment_count("35.9").count, 35);
        assert_eq!(parse_fragment_count(" 100 ").count, 100);
    }

    #[test]
    fn bad_input_defaults_quietly() {
        for raw in ["", "   ", "lots", "0", "-5", "0.4"] {
            assert_eq!(
                parse_fragment_count(raw),
                FragmentRequest {
                    count: DEFAULT_FRAGMENT_COUNT,
                    warning: None
                },
                "input {raw:?}"
            );
        }
    }

    #[test]
    fn oversized_counts_clamp_with_a_warning() {
        let req = parse_fragment_count("250");
        assert_eq!(req.count, MAX_FRAGMENT_COUNT);
        assert_eq!(
            req.warning,
            Some(CountWarning::OutOfRange {
                clamped_to: MAX_FRAGMENT_COUNT
            })
        );
    }

    #[test]
    fn high_counts_carry_a_performance_advisory() {
        let req = parse_fragment_count("80");
        assert_eq!(req.count, 80);
        assert_eq!(req.warning, Some(CountWarning::HighCount { count: 80 }));
        // 50 itself is fine.
        assert_eq!(parse_fragment_count("50").warning, None);
    }

    #[test]
    fn layout_spaces_fragments_evenly() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for count in [1usize, 3, 20, 100] {
            let seeds = fragment_layout(count, &mut rng);
            assert_eq!(seeds.len(), count);
            let spacing = TAU / count as f32;
            for (i, seed) in seeds.iter().enumerate() {
                assert!((seed.angle - spacing * i as f32).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn fragments_never_spawn_at_the_impact_point() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for seed in fragment_layout(100, &mut rng) {
            assert!(seed.offset >= FRAGMENT_OFFSET_MIN);
            assert!(seed.offset < FRAGMENT_OFFSET_MAX);
            assert!(seed.radius >= FRAGMENT_RADIUS_MIN);
            assert!(seed.radius < FRAGMENT_RADIUS_MAX);
        }
    }
}
