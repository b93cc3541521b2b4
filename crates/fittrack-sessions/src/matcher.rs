//! Nearest-observation lookup for a session start time.

use crate::time::{abs_diff_ms, parse_timestamp};
use crate::types::WeatherObservation;

/// Find the observation whose timestamp is closest to `target`.
///
/// Returns `None` only for an empty slice; callers render that as "weather
/// unknown". Ties go to the earliest observation in input order. Observations
/// with an unparseable timestamp are never preferred over a parseable one; if
/// the target itself, or every observation, is unparseable the first
/// observation is returned.
pub fn nearest_observation<'a>(
    observations: &'a [WeatherObservation],
    target: &str,
) -> Option<&'a WeatherObservation> {
    let first = observations.first()?;

    let Some(target) = parse_timestamp(target) else {
        tracing::debug!("Unparseable target timestamp {:?}, using first observation", target);
        return Some(first);
    };

    let mut best: Option<(&WeatherObservation, i64)> = None;
    for obs in observations {
        let Some(ts) = parse_timestamp(&obs.timestamp) else {
            continue;
        };
        let diff = abs_diff_ms(ts, target);
        match best {
            Some((_, best_diff)) if diff >= best_diff => {}
            _ => best = Some((obs, diff)),
        }
    }

    Some(best.map_or(first, |(obs, _)| obs))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(ts: &str) -> WeatherObservation {
        WeatherObservation {
            timestamp: ts.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_is_no_match() {
        assert!(nearest_observation(&[], "2025-03-01T10:20:00Z").is_none());
    }

    #[test]
    fn test_picks_closest() {
        let observations = vec![obs("2025-03-01T10:00:00Z"), obs("2025-03-01T10:30:00Z")];
        let best = nearest_observation(&observations, "2025-03-01T10:20:00Z").unwrap();
        assert_eq!(best.timestamp, "2025-03-01T10:30:00Z");
    }

    #[test]
    fn test_target_before_all_observations() {
        let observations = vec![
            obs("2025-03-01T11:00:00Z"),
            obs("2025-03-01T10:00:00Z"),
            obs("2025-03-01T12:00:00Z"),
        ];
        let best = nearest_observation(&observations, "2025-03-01T08:00:00Z").unwrap();
        assert_eq!(best.timestamp, "2025-03-01T10:00:00Z");
    }

    #[test]
    fn test_tie_goes_to_first_in_input_order() {
        let observations = vec![
            obs("2025-03-01T10:30:00Z"),
            obs("2025-03-01T10:10:00Z"),
            obs("2025-03-01T10:30:00Z"),
        ];
        let best = nearest_observation(&observations, "2025-03-01T10:20:00Z").unwrap();
        assert!(std::ptr::eq(best, &observations[0]));
    }

    #[test]
    fn test_result_is_never_farther_than_any_candidate() {
        let observations: Vec<_> = (0..24)
            .map(|h| obs(&format!("2025-03-01T{:02}:{:02}:00Z", h, (h * 7) % 60)))
            .collect();

        for target in [
            "2025-03-01T00:00:00Z",
            "2025-03-01T05:31:00Z",
            "2025-03-01T13:59:59Z",
            "2025-03-02T03:00:00Z",
        ] {
            let best = nearest_observation(&observations, target).unwrap();
            let t = parse_timestamp(target).unwrap();
            let best_diff = abs_diff_ms(parse_timestamp(&best.timestamp).unwrap(), t);
            for o in &observations {
                let diff = abs_diff_ms(parse_timestamp(&o.timestamp).unwrap(), t);
                assert!(best_diff <= diff, "{} beat {} for {}", o.timestamp, best.timestamp, target);
            }
        }
    }

    #[test]
    fn test_unparseable_observation_is_skipped() {
        let observations = vec![obs("not a time"), obs("2025-03-01T10:30:00Z")];
        let best = nearest_observation(&observations, "2025-03-01T10:20:00Z").unwrap();
        assert_eq!(best.timestamp, "2025-03-01T10:30:00Z");
    }

    #[test]
    fn test_all_unparseable_returns_first() {
        let observations = vec![obs("later"), obs("much later")];
        let best = nearest_observation(&observations, "2025-03-01T10:20:00Z").unwrap();
        assert_eq!(best.timestamp, "later");
    }

    #[test]
    fn test_unparseable_target_returns_first() {
        let observations = vec![obs("2025-03-01T10:00:00Z"), obs("2025-03-01T10:30:00Z")];
        let best = nearest_observation(&observations, "soon").unwrap();
        assert_eq!(best.timestamp, "2025-03-01T10:00:00Z");
    }

    #[test]
    fn test_mixed_offsets_compare_as_instants() {
        let observations = vec![
            obs("2025-03-01T12:00:00+02:00"),
            obs("2025-03-01T10:25:00Z"),
        ];
        let best = nearest_observation(&observations, "2025-03-01T10:02:00Z").unwrap();
        assert_eq!(best.timestamp, "2025-03-01T12:00:00+02:00");
    }
}
