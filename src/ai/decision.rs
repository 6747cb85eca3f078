//! Opponent shot selection: weighted outcome, then a power fraction and lateral

use rand::Rng;

use super::profiles::DifficultyProfile;
use crate::calibration::CalibrationResult;
use crate::constants::*;
use crate::helpers::{symmetric_noise, uniform_between};
use crate::trajectory::Outcome;

/// What the opponent decided to attempt
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotDecision {
    pub outcome: Outcome,
    pub fraction: f32,
    pub lateral: f32,
}

/// Turns a difficulty profile and the current bands into shots
#[derive(Debug, Clone, Default)]
pub struct DecisionPolicy {
    pub profile: DifficultyProfile,
}

impl DecisionPolicy {
    pub fn new(profile: DifficultyProfile) -> Self {
        Self { profile }
    }

    /// Weights in draw order: Perfect, Make, Backboard, Miss
    pub fn weights(&self, backboard_bonus: bool) -> [f32; 4] {
        let p = &self.profile;
        let mut backboard = bounded_weight(p.weight_backboard);
        if backboard_bonus && p.adapt_to_backboard_bonus {
            let boost = p.backboard_weight_boost;
            if boost.is_finite() {
                backboard *= boost.clamp(1.0, AI_BACKBOARD_BOOST_MAX);
            }
        }
        [
            bounded_weight(p.weight_perfect),
            bounded_weight(p.weight_make),
            backboard,
            bounded_weight(p.weight_miss),
        ]
    }

    /// Weighted draw; all-zero weights always miss
    pub fn choose_outcome(&self, rng: &mut impl Rng, backboard_bonus: bool) -> Outcome {
        let weights = self.weights(backboard_bonus);
        let sum: f32 = weights.iter().sum();
        if !sum.is_finite() || sum <= 0.0 {
            return Outcome::Miss;
        }

        let mut r = rng.gen_range(0.0..sum);
        for (outcome, weight) in Outcome::ALL.iter().zip(weights) {
            if r < weight {
                return *outcome;
            }
            r -= weight;
        }
        Outcome::Miss
    }

    /// Power fraction aimed at `outcome`, jittered and clamped to [0, 1]
    pub fn pick_fraction(
        &self,
        outcome: Outcome,
        bands: &CalibrationResult,
        rng: &mut impl Rng,
    ) -> f32 {
        let (p, m, b) = (&bands.perfect, &bands.make, &bands.backboard);

        let base = match outcome {
            Outcome::Perfect => {
                if p.valid {
                    if self.profile.snap_inside_perfect {
                        p.mid()
                    } else {
                        uniform_between(rng, p.min, p.max)
                    }
                } else if m.valid {
                    m.mid()
                } else {
                    AI_DEFAULT_FRACTION
                }
            }
            Outcome::Make => {
                if m.valid {
                    let (mut lo, mut hi) = (m.min, m.max);
                    // prefer the wider part of Make that is outside Perfect
                    if p.valid {
                        let left = (p.min - m.min).max(0.0);
                        let right = (m.max - p.max).max(0.0);
                        if left > right && left > AI_MIN_MAKE_SIDE {
                            hi = p.min;
                        } else if right > AI_MIN_MAKE_SIDE {
                            lo = p.max;
                        }
                    }
                    uniform_between(rng, lo, hi)
                } else if p.valid {
                    p.mid() + AI_FALLBACK_STEP
                } else {
                    AI_DEFAULT_FRACTION
                }
            }
            Outcome::Backboard => {
                if b.valid {
                    uniform_between(rng, b.min, b.max)
                } else if m.valid {
                    m.max + AI_FALLBACK_STEP
                } else {
                    AI_DEFAULT_BACKBOARD_FRACTION
                }
            }
            Outcome::Miss => {
                let below = if m.valid {
                    (m.min - AI_MISS_MARGIN).clamp(0.0, 1.0)
                } else {
                    AI_DEFAULT_UNDERSHOOT
                };
                let above = if b.valid {
                    (b.max + AI_MISS_MARGIN).clamp(0.0, 1.0)
                } else if m.valid {
                    (m.max + AI_MISS_MARGIN_NO_BACKBOARD).clamp(0.0, 1.0)
                } else {
                    AI_DEFAULT_OVERSHOOT
                };
                if rng.gen_bool(0.5) { below } else { above }
            }
        };

        (base.clamp(0.0, 1.0) + symmetric_noise(rng, self.profile.power_jitter)).clamp(0.0, 1.0)
    }

    /// Lateral fraction from yaw noise, normalised by the launcher's yaw limit
    pub fn pick_lateral(&self, rng: &mut impl Rng, max_yaw_deg: f32) -> f32 {
        let degrees = symmetric_noise(rng, self.profile.lateral_noise_deg);
        (degrees / max_yaw_deg.max(1.0)).clamp(-1.0, 1.0)
    }

    pub fn decide(
        &self,
        rng: &mut impl Rng,
        bands: &CalibrationResult,
        backboard_bonus: bool,
        max_yaw_deg: f32,
    ) -> ShotDecision {
        let outcome = self.choose_outcome(rng, backboard_bonus);
        ShotDecision {
            outcome,
            fraction: self.pick_fraction(outcome, bands, rng),
            lateral: self.pick_lateral(rng, max_yaw_deg),
        }
    }
}

/// Non-finite weights count as zero
fn bounded_weight(weight: f32) -> f32 {
    if weight.is_finite() {
        weight.clamp(0.0, AI_WEIGHT_MAX)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::{CalibrationStrategy, Range01};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn policy(weights: [f32; 4]) -> DecisionPolicy {
        DecisionPolicy::new(DifficultyProfile {
            weight_perfect: weights[0],
            weight_make: weights[1],
            weight_backboard: weights[2],
            weight_miss: weights[3],
            ..Default::default()
        })
    }

    fn bands() -> CalibrationResult {
        CalibrationResult {
            perfect: Range01::new(0.40, 0.46),
            make: Range01::new(0.34, 0.50),
            backboard: Range01::new(0.55, 0.63),
            strategy: CalibrationStrategy::Runtime,
        }
    }

    #[test]
    fn test_make_only_weights_always_make() {
        let mut rng = StdRng::seed_from_u64(42);
        let policy = policy([0.0, 1.0, 0.0, 0.0]);
        for _ in 0..1000 {
            assert_eq!(policy.choose_outcome(&mut rng, false), Outcome::Make);
        }
    }

    #[test]
    fn test_zero_weights_always_miss() {
        let mut rng = StdRng::seed_from_u64(1);
        let policy = policy([0.0, 0.0, 0.0, 0.0]);
        for _ in 0..100 {
            assert_eq!(policy.choose_outcome(&mut rng, true), Outcome::Miss);
        }
    }

    #[test]
    fn test_huge_weights_never_panic() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut policy = policy([f32::INFINITY, f32::MAX, f32::MAX, f32::NAN]);
        policy.profile.backboard_weight_boost = f32::MAX;
        for _ in 0..100 {
            let _ = policy.choose_outcome(&mut rng, true);
        }
        assert!(policy.weights(true).iter().all(|w| w.is_finite()));
        assert_eq!(policy.weights(false)[0], 0.0);
    }

    #[test]
    fn test_backboard_boost_only_with_bonus() {
        let policy = policy([1.0, 1.0, 0.5, 1.0]);
        assert_eq!(policy.weights(false)[2], 0.5);
        assert_eq!(policy.weights(true)[2], 1.0);

        let mut ignoring = policy.clone();
        ignoring.profile.adapt_to_backboard_bonus = false;
        assert_eq!(ignoring.weights(true)[2], 0.5);
    }

    #[test]
    fn test_weighted_draw_frequencies() {
        let mut rng = StdRng::seed_from_u64(9);
        let policy = policy([3.0, 1.0, 0.0, 0.0]);
        let perfect = (0..4000)
            .filter(|_| policy.choose_outcome(&mut rng, false) == Outcome::Perfect)
            .count();
        assert!((2800..3200).contains(&perfect), "perfect drawn {} times", perfect);
    }

    #[test]
    fn test_fractions_land_in_matching_bands() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut policy = policy([1.0, 1.0, 1.0, 1.0]);
        policy.profile.power_jitter = 0.0;
        let bands = bands();

        let perfect = policy.pick_fraction(Outcome::Perfect, &bands, &mut rng);
        assert!((perfect - bands.perfect.mid()).abs() < 1e-6);

        for _ in 0..200 {
            let make = policy.pick_fraction(Outcome::Make, &bands, &mut rng);
            assert!(bands.make.contains(make));
            // left side of Make (0.34..0.40) is the wider one
            assert!(make <= bands.perfect.min + 1e-6, "make pick {}", make);

            let backboard = policy.pick_fraction(Outcome::Backboard, &bands, &mut rng);
            assert!(bands.backboard.contains(backboard));

            let miss = policy.pick_fraction(Outcome::Miss, &bands, &mut rng);
            assert!(
                (miss - 0.26).abs() < 1e-5 || (miss - 0.71).abs() < 1e-5,
                "miss pick {}",
                miss
            );
        }
    }

    #[test]
    fn test_fallbacks_without_bands() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut policy = policy([1.0, 1.0, 1.0, 1.0]);
        policy.profile.power_jitter = 0.0;
        let none = CalibrationResult::invalid();

        assert_eq!(
            policy.pick_fraction(Outcome::Perfect, &none, &mut rng),
            AI_DEFAULT_FRACTION
        );
        assert_eq!(
            policy.pick_fraction(Outcome::Backboard, &none, &mut rng),
            AI_DEFAULT_BACKBOARD_FRACTION
        );
        let miss = policy.pick_fraction(Outcome::Miss, &none, &mut rng);
        assert!(miss == AI_DEFAULT_UNDERSHOOT || miss == AI_DEFAULT_OVERSHOOT);
    }

    #[test]
    fn test_jitter_stays_in_bar() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut policy = policy([1.0, 0.0, 0.0, 0.0]);
        policy.profile.power_jitter = 0.25;
        let edge = CalibrationResult {
            perfect: Range01::new(0.95, 1.0),
            ..CalibrationResult::invalid()
        };
        for _ in 0..200 {
            let f = policy.pick_fraction(Outcome::Perfect, &edge, &mut rng);
            assert!((0.0..=1.0).contains(&f));
        }
    }

    #[test]
    fn test_lateral_normalised_by_yaw() {
        let mut rng = StdRng::seed_from_u64(2);
        let policy = policy([1.0, 0.0, 0.0, 0.0]);
        for _ in 0..200 {
            let lateral = policy.pick_lateral(&mut rng, 12.0);
            assert!(lateral.abs() <= 0.5 + 1e-6, "lateral {}", lateral);
        }
        // tiny yaw limit is floored at one degree
        assert!(policy.pick_lateral(&mut rng, 0.0).abs() <= 1.0);
    }
}
