//! Conversation scoring heuristic.
//!
//! The base score is a linear combination of message volume and recency:
//! the length component saturates at 1.0 once a conversation accumulates
//! `LENGTH_SATURATION_CHARS` characters, and the recency component halves
//! roughly every `RECENCY_HALF_LIFE_HOURS` hours. A bounded uniform jitter is
//! added on top for feed variety, and a separate shuffle operation
//! re-randomizes a whole user's scores from an id-based ramp plus Gaussian
//! noise.
//!
//! All functions take the RNG as a parameter so callers (and tests) can use a
//! seeded generator.

use rand::Rng;

pub const LENGTH_WEIGHT: f64 = 0.3;
pub const RECENCY_WEIGHT: f64 = 0.7;
pub const LENGTH_SATURATION_CHARS: f64 = 1000.0;
pub const RECENCY_HALF_LIFE_HOURS: f64 = 24.0;

/// Shuffled scores never drop below this, so every conversation keeps a
/// nonzero chance of surfacing in the feed.
pub const SHUFFLE_SCORE_FLOOR: f64 = 0.01;

/// Deterministic part of the score, in `[0.0, 1.0]`.
pub fn base_score(total_chars: i64, age_hours: f64) -> f64 {
    let length = (total_chars as f64 / LENGTH_SATURATION_CHARS).min(1.0);
    let recency = 1.0 / (1.0 + age_hours.max(0.0) / RECENCY_HALF_LIFE_HOURS);
    LENGTH_WEIGHT * length + RECENCY_WEIGHT * recency
}

/// Base score plus uniform noise in `[-randomness_factor, +randomness_factor]`.
pub fn score<R: Rng + ?Sized>(
    total_chars: i64,
    age_hours: f64,
    randomness_factor: f64,
    rng: &mut R,
) -> f64 {
    let jitter = if randomness_factor > 0.0 {
        rng.gen_range(-randomness_factor..=randomness_factor)
    } else {
        0.0
    };
    base_score(total_chars, age_hours) + jitter
}

/// New scores for a bulk shuffle of one user's conversations.
///
/// Each id gets `(1 - volatility) * id / max_id` plus Gaussian noise scaled by
/// `volatility`, floored at [`SHUFFLE_SCORE_FLOOR`]. With volatility 0 this is
/// a pure id ramp; with volatility 1 it is pure noise.
pub fn shuffle_scores<R: Rng + ?Sized>(
    ids: &[i64],
    volatility: f64,
    rng: &mut R,
) -> Vec<(i64, f64)> {
    let max_id = ids.iter().copied().max().unwrap_or(0);
    if max_id <= 0 {
        return Vec::new();
    }

    ids.iter()
        .map(|&id| {
            let ramp = (1.0 - volatility) * id as f64 / max_id as f64;
            let noise = gaussian(rng) * volatility;
            (id, (ramp + noise).max(SHUFFLE_SCORE_FLOOR))
        })
        .collect()
}

/// Standard normal draw via the Box-Muller transform.
fn gaussian<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn base_score_matches_reference_example() {
        // One 500-character message at age 0: 0.3 * 0.5 + 0.7 * 1.0 = 0.85
        let s = base_score(500, 0.0);
        assert!((s - 0.85).abs() < 1e-12);
    }

    #[test]
    fn base_score_length_component_saturates() {
        let capped = base_score(5_000, 0.0);
        assert!((capped - 1.0).abs() < 1e-12);
    }

    #[test]
    fn base_score_halves_recency_at_one_day() {
        // Empty conversation, 24 hours old: 0.7 * 0.5
        let s = base_score(0, 24.0);
        assert!((s - 0.35).abs() < 1e-12);
    }

    #[test]
    fn score_stays_within_jitter_bounds() {
        let rf = 0.05;
        let mut rng = StdRng::seed_from_u64(7);
        for total_chars in [0i64, 100, 1_000, 10_000] {
            for age_hours in [0.0, 1.0, 24.0, 240.0] {
                let s = score(total_chars, age_hours, rf, &mut rng);
                assert!(s >= -rf && s <= 1.0 + rf, "score {} out of bounds", s);
            }
        }
    }

    #[test]
    fn score_is_deterministic_for_a_fixed_seed() {
        let a = score(500, 12.0, 0.1, &mut StdRng::seed_from_u64(42));
        let b = score(500, 12.0, 0.1, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn shuffle_preserves_the_id_set() {
        let ids: Vec<i64> = (1..=50).collect();
        let mut rng = StdRng::seed_from_u64(9);
        let shuffled = shuffle_scores(&ids, 0.9, &mut rng);

        let mut shuffled_ids: Vec<i64> = shuffled.iter().map(|(id, _)| *id).collect();
        shuffled_ids.sort_unstable();
        assert_eq!(shuffled_ids, ids);
    }

    #[test]
    fn shuffle_respects_the_floor() {
        let ids: Vec<i64> = (1..=200).collect();
        let mut rng = StdRng::seed_from_u64(11);
        for (_, s) in shuffle_scores(&ids, 1.0, &mut rng) {
            assert!(s >= SHUFFLE_SCORE_FLOOR);
        }
    }

    #[test]
    fn shuffle_with_zero_volatility_is_a_pure_ramp() {
        let ids = vec![1i64, 5, 10];
        let mut rng = StdRng::seed_from_u64(3);
        let shuffled = shuffle_scores(&ids, 0.0, &mut rng);
        assert!((shuffled[0].1 - 0.1).abs() < 1e-12);
        assert!((shuffled[1].1 - 0.5).abs() < 1e-12);
        assert!((shuffled[2].1 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn shuffle_with_positive_volatility_changes_scores() {
        let ids: Vec<i64> = (1..=30).collect();
        let before = shuffle_scores(&ids, 0.0, &mut StdRng::seed_from_u64(1));
        let after = shuffle_scores(&ids, 0.8, &mut StdRng::seed_from_u64(2));
        let unchanged = before
            .iter()
            .zip(after.iter())
            .filter(|((_, a), (_, b))| a == b)
            .count();
        assert_eq!(unchanged, 0);
    }

    #[test]
    fn shuffle_of_nothing_is_nothing() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(shuffle_scores(&[], 0.5, &mut rng).is_empty());
    }
}
