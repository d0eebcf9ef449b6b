use chrono::{DateTime, Duration, Utc};

/// Predictions close this many minutes before kickoff
pub const PREDICTION_CUTOFF_MINUTES: i64 = 30;

/// Last instant (exclusive) at which a prediction is accepted
pub fn prediction_deadline(match_date: DateTime<Utc>) -> DateTime<Utc> {
    match_date - Duration::minutes(PREDICTION_CUTOFF_MINUTES)
}

/// True iff `now` lies strictly before the cutoff; the boundary itself is closed
pub fn can_predict(match_date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now < prediction_deadline(match_date)
}
