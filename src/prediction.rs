//! Next-cycle forecasting from a user's logged cycle history.

use chrono::Duration;

use crate::models::{CycleRecord, Prediction, PredictionAccuracy};

/// Fallback mean when there are no cycle lengths to average over.
pub const DEFAULT_CYCLE_LENGTH: f64 = 28.0;

/// Days from ovulation to the next period start.
const LUTEAL_PHASE_DAYS: i64 = 14;

/// Forecast the next period start, ovulation date and fertile window.
///
/// `history` must be ordered by `start_date` descending (most recent first);
/// the engine trusts that ordering and never re-sorts. Pure: dates derive
/// entirely from the input, never from the clock.
pub fn predict_next_cycle(history: &[CycleRecord]) -> Prediction {
    if history.is_empty() {
        return Prediction {
            next_period_date: None,
            ovulation_date: None,
            fertile_window_start: None,
            fertile_window_end: None,
            average_cycle_length: None,
            prediction_accuracy: PredictionAccuracy::Low,
            message: "No cycle data available. Please log your periods to get predictions."
                .to_string(),
        };
    }

    let average_cycle_length = mean_cycle_length(history);

    // Round-half-up once; the same day count feeds the date shift and the
    // reported average so the two can never disagree.
    let rounded_length = average_cycle_length.round() as i64;

    let last_period_start = history[0].start_date;
    let next_period_date = last_period_start + Duration::days(rounded_length);
    let ovulation_date = next_period_date - Duration::days(LUTEAL_PHASE_DAYS);
    let fertile_window_start = ovulation_date - Duration::days(5);
    let fertile_window_end = ovulation_date + Duration::days(1);

    let prediction_accuracy = if history.len() < 3 {
        // Too few cycles to judge spread.
        PredictionAccuracy::Medium
    } else {
        match cycle_length_stddev(history, average_cycle_length) {
            s if s < 3.0 => PredictionAccuracy::High,
            s if s < 5.0 => PredictionAccuracy::Medium,
            _ => PredictionAccuracy::Low,
        }
    };

    Prediction {
        next_period_date: Some(next_period_date),
        ovulation_date: Some(ovulation_date),
        fertile_window_start: Some(fertile_window_start),
        fertile_window_end: Some(fertile_window_end),
        average_cycle_length: Some(rounded_length as i32),
        prediction_accuracy,
        message: format!(
            "Your next period is predicted to start on {}",
            next_period_date
        ),
    }
}

fn mean_cycle_length(history: &[CycleRecord]) -> f64 {
    if history.is_empty() {
        return DEFAULT_CYCLE_LENGTH;
    }
    let total: i64 = history.iter().map(|c| i64::from(c.cycle_length)).sum();
    total as f64 / history.len() as f64
}

/// Standard deviation of cycle lengths around `mean` (population form,
/// same mean as the forecast itself).
fn cycle_length_stddev(history: &[CycleRecord], mean: f64) -> f64 {
    let mean_squared_deviation = history
        .iter()
        .map(|c| (f64::from(c.cycle_length) - mean).powi(2))
        .sum::<f64>()
        / history.len() as f64;
    mean_squared_deviation.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn record(start_date: NaiveDate, cycle_length: i32) -> CycleRecord {
        let now = Utc::now();
        CycleRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            start_date,
            cycle_length,
            symptoms: None,
            flow_intensity: None,
            mood: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Build a descending-ordered history from cycle lengths, most recent
    /// first, anchored so consecutive starts actually differ by the lengths.
    fn history(anchor: NaiveDate, lengths: &[i32]) -> Vec<CycleRecord> {
        let mut start = anchor;
        let mut out = Vec::new();
        for (i, &len) in lengths.iter().enumerate() {
            if i > 0 {
                start = start - Duration::days(i64::from(len));
            }
            out.push(record(start, len));
        }
        out
    }

    #[test]
    fn empty_history_yields_low_confidence_placeholder() {
        let prediction = predict_next_cycle(&[]);

        assert_eq!(prediction.next_period_date, None);
        assert_eq!(prediction.ovulation_date, None);
        assert_eq!(prediction.fertile_window_start, None);
        assert_eq!(prediction.fertile_window_end, None);
        assert_eq!(prediction.average_cycle_length, None);
        assert_eq!(prediction.prediction_accuracy, PredictionAccuracy::Low);
        assert_eq!(
            prediction.message,
            "No cycle data available. Please log your periods to get predictions."
        );
    }

    #[test]
    fn single_record_anchors_all_dates() {
        let start = date(2024, 3, 1);
        let prediction = predict_next_cycle(&[record(start, 30)]);

        let next = date(2024, 3, 31);
        let ovulation = date(2024, 3, 17);
        assert_eq!(prediction.average_cycle_length, Some(30));
        assert_eq!(prediction.next_period_date, Some(next));
        assert_eq!(prediction.ovulation_date, Some(ovulation));
        assert_eq!(prediction.fertile_window_start, Some(date(2024, 3, 12)));
        assert_eq!(prediction.fertile_window_end, Some(date(2024, 3, 18)));
        assert_eq!(prediction.prediction_accuracy, PredictionAccuracy::Medium);
        assert_eq!(
            prediction.message,
            "Your next period is predicted to start on 2024-03-31"
        );
    }

    #[test]
    fn fertile_window_spans_seven_days_around_ovulation() {
        let prediction = predict_next_cycle(&history(date(2024, 6, 1), &[28, 27, 29]));

        let ovulation = prediction.ovulation_date.unwrap();
        assert_eq!(
            prediction.fertile_window_start.unwrap(),
            ovulation - Duration::days(5)
        );
        assert_eq!(
            prediction.fertile_window_end.unwrap(),
            ovulation + Duration::days(1)
        );
        assert_eq!(
            prediction.ovulation_date.unwrap(),
            prediction.next_period_date.unwrap() - Duration::days(14)
        );
    }

    #[test]
    fn two_records_are_too_few_to_judge_spread() {
        let prediction = predict_next_cycle(&history(date(2024, 5, 1), &[40, 20]));
        assert_eq!(prediction.prediction_accuracy, PredictionAccuracy::Medium);
    }

    #[test]
    fn steady_lengths_give_high_confidence() {
        let prediction = predict_next_cycle(&history(date(2024, 4, 1), &[28, 28, 28]));
        assert_eq!(prediction.average_cycle_length, Some(28));
        assert_eq!(prediction.prediction_accuracy, PredictionAccuracy::High);
    }

    #[test]
    fn mildly_varying_lengths_still_give_high_confidence() {
        // stddev of [26, 28, 30] is ~1.63, under the high threshold
        let prediction = predict_next_cycle(&history(date(2024, 4, 1), &[26, 28, 30]));
        assert_eq!(prediction.average_cycle_length, Some(28));
        assert_eq!(prediction.prediction_accuracy, PredictionAccuracy::High);
    }

    #[test]
    fn widely_varying_lengths_give_low_confidence() {
        // stddev of [21, 28, 35] is ~5.7, past the low threshold
        let prediction = predict_next_cycle(&history(date(2024, 4, 1), &[21, 28, 35]));
        assert_eq!(prediction.average_cycle_length, Some(28));
        assert_eq!(prediction.prediction_accuracy, PredictionAccuracy::Low);
    }

    #[test]
    fn fractional_mean_rounds_half_up_for_both_average_and_date() {
        // mean of [30, 29] is 29.5; both the reported average and the date
        // shift must use 30, never a truncated 29
        let start = date(2024, 2, 1);
        let prediction = predict_next_cycle(&history(start, &[30, 29]));

        assert_eq!(prediction.average_cycle_length, Some(30));
        assert_eq!(
            prediction.next_period_date,
            Some(start + Duration::days(30))
        );
    }

    #[test]
    fn identical_input_yields_identical_output() {
        let cycles = history(date(2024, 1, 10), &[27, 31, 28, 29]);
        assert_eq!(predict_next_cycle(&cycles), predict_next_cycle(&cycles));
    }

    #[test]
    fn engine_trusts_caller_ordering() {
        // Same records fed oldest-first anchor the forecast to the oldest
        // start; the engine must not re-sort on the caller's behalf.
        let newest = record(date(2024, 5, 1), 28);
        let oldest = record(date(2024, 3, 5), 28);

        let descending = predict_next_cycle(&[newest.clone(), oldest.clone()]);
        let ascending = predict_next_cycle(&[oldest, newest]);

        assert_eq!(
            descending.next_period_date,
            Some(date(2024, 5, 1) + Duration::days(28))
        );
        assert_eq!(
            ascending.next_period_date,
            Some(date(2024, 3, 5) + Duration::days(28))
        );
    }

    #[test]
    fn accuracy_labels_serialize_as_plain_strings() {
        assert_eq!(
            serde_json::to_string(&PredictionAccuracy::High).unwrap(),
            "\"High\""
        );
        assert_eq!(
            serde_json::to_string(&PredictionAccuracy::Medium).unwrap(),
            "\"Medium\""
        );
        assert_eq!(
            serde_json::to_string(&PredictionAccuracy::Low).unwrap(),
            "\"Low\""
        );
    }
}
