//! Points awarded for a single prediction once a match is finished.
//!
//! An exact score is worth [`EXACT_SCORE_POINTS`] and also counts as a correct
//! result. Otherwise a matching win/draw/loss call is worth
//! [`CORRECT_RESULT_POINTS`]. Anything else earns nothing.

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::models::common::UnknownVariant;

pub const EXACT_SCORE_POINTS: i32 = 3;
pub const CORRECT_RESULT_POINTS: i32 = 1;

/// Outcome of a match from the home side's perspective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Home,
    Draw,
    Away,
}

impl Outcome {
    pub fn from_score(home: i32, away: i32) -> Self {
        match home.cmp(&away) {
            std::cmp::Ordering::Greater => Outcome::Home,
            std::cmp::Ordering::Less => Outcome::Away,
            std::cmp::Ordering::Equal => Outcome::Draw,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Home => "home",
            Outcome::Draw => "draw",
            Outcome::Away => "away",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Outcome {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "home" => Ok(Outcome::Home),
            "draw" => Ok(Outcome::Draw),
            "away" => Ok(Outcome::Away),
            other => Err(UnknownVariant { kind: "result", value: other.to_string() }),
        }
    }
}

impl TryFrom<String> for Outcome {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Official full-time score of a finished match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalScore {
    pub home: i32,
    pub away: i32,
}

impl FinalScore {
    pub fn new(home: i32, away: i32) -> Self {
        Self { home, away }
    }

    pub fn outcome(&self) -> Outcome {
        Outcome::from_score(self.home, self.away)
    }
}

/// What a user called for a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredictedScore {
    pub home: i32,
    pub away: i32,
    pub result: Outcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PredictionPoints {
    pub points: i32,
    pub correct_result: bool,
    pub exact_score: bool,
}

/// Score one prediction against the official result.
///
/// The exact-score check looks only at the score pair, so a prediction whose
/// stored result disagrees with its own scores still earns the exact-score
/// award when the scores match.
pub fn score_prediction(predicted: PredictedScore, actual: FinalScore) -> PredictionPoints {
    if predicted.home == actual.home && predicted.away == actual.away {
        PredictionPoints {
            points: EXACT_SCORE_POINTS,
            correct_result: true,
            exact_score: true,
        }
    } else if predicted.result == actual.outcome() {
        PredictionPoints {
            points: CORRECT_RESULT_POINTS,
            correct_result: true,
            exact_score: false,
        }
    } else {
        PredictionPoints::default()
    }
}
