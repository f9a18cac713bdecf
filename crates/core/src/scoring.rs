//! Pure derivations over session state. No side effects, no clocks.

use chrono::{DateTime, Utc};

use crate::model::{ItemStore, ResponseTracker};

/// Completion percentage for a cursor at `position` within `len` items.
///
/// An empty sequence yields `0.0`; callers are expected to gate on
/// `len > 0`, the guard only keeps the division total.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn progress_percent(position: usize, len: usize) -> f64 {
    if len == 0 {
        return 0.0;
    }
    (position + 1) as f64 / len as f64 * 100.0
}

/// Rounded per-item review accuracy.
///
/// Zero attempts yield zero, never a division error.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn accuracy_percent(correct: u32, attempts: u32) -> u32 {
    if attempts == 0 {
        return 0;
    }
    (f64::from(correct) / f64::from(attempts) * 100.0).round() as u32
}

/// Locally derived quiz score: the fraction of questions whose selection
/// matches the answer key, as an unrounded percentage.
///
/// The remote's grading is authoritative for a submitted quiz; this is the
/// same derivation computed client-side.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn session_score(responses: &ResponseTracker, items: &ItemStore) -> f64 {
    if items.is_empty() {
        return 0.0;
    }

    let correct = items
        .iter()
        .enumerate()
        .filter(|(index, item)| {
            let selected = responses.get(*index).and_then(|r| r.selected_choice());
            selected.is_some() && selected == item.correct_choice()
        })
        .count();

    correct as f64 / items.len() as f64 * 100.0
}

/// Whole seconds elapsed since `started_at`, floored.
#[must_use]
#[allow(clippy::cast_sign_loss)]
pub fn elapsed_seconds(started_at: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    (now - started_at).num_seconds().max(0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Item, ItemId};
    use crate::time::fixed_now;
    use chrono::Duration;

    fn quiz_store(correct: &[usize]) -> ItemStore {
        let items = correct
            .iter()
            .enumerate()
            .map(|(index, &answer)| {
                Item::multiple_choice(
                    ItemId::new(format!("q{index}")),
                    format!("question {index}"),
                    vec!["a".into(), "b".into(), "c".into(), "d".into()],
                    answer,
                    None,
                )
                .unwrap()
            })
            .collect();
        ItemStore::new(items)
    }

    #[test]
    fn progress_counts_the_current_item() {
        assert!((progress_percent(0, 4) - 25.0).abs() < f64::EPSILON);
        assert!((progress_percent(3, 4) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn progress_is_zero_for_empty_sequence() {
        assert!(progress_percent(0, 0).abs() < f64::EPSILON);
    }

    #[test]
    fn accuracy_rounds_to_whole_percent() {
        assert_eq!(accuracy_percent(2, 3), 67);
        assert_eq!(accuracy_percent(1, 3), 33);
        assert_eq!(accuracy_percent(3, 3), 100);
    }

    #[test]
    fn accuracy_with_no_attempts_is_zero() {
        assert_eq!(accuracy_percent(0, 0), 0);
    }

    #[test]
    fn score_counts_matching_selections() {
        let items = quiz_store(&[1, 0, 2]);
        let mut responses = ResponseTracker::new(3);
        responses.record_selection(0, 1).unwrap();
        responses.record_selection(1, 1).unwrap();
        responses.record_selection(2, 2).unwrap();

        let score = session_score(&responses, &items);
        assert!((score - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn unanswered_questions_never_score() {
        let items = quiz_store(&[0, 0]);
        let responses = ResponseTracker::new(2);
        assert!(session_score(&responses, &items).abs() < f64::EPSILON);
    }

    #[test]
    fn elapsed_floors_to_whole_seconds() {
        let started = fixed_now();
        let now = started + Duration::milliseconds(1_999);
        assert_eq!(elapsed_seconds(started, now), 1);
    }

    #[test]
    fn elapsed_never_goes_negative() {
        let started = fixed_now();
        let earlier = started - Duration::seconds(5);
        assert_eq!(elapsed_seconds(started, earlier), 0);
    }
}
