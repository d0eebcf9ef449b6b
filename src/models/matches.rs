use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;
use crate::scoring::rules::FinalScore;
use crate::scoring::window::{can_predict, prediction_deadline};

pub const TEAM_NAME_MAX_LEN: usize = 100;
pub const DAY_MAX_LEN: usize = 50;
pub const FORM_LENGTH: usize = 5;

/// A fixture between two named teams
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Match {
    pub id: Uuid,
    pub home_team: String,
    pub away_team: String,
    pub match_date: DateTime<Utc>,
    pub week: i32,
    pub day: String,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub is_finished: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Match {
    /// Official result, only once the match is finished and both scores are in
    pub fn final_score(&self) -> Option<FinalScore> {
        if !self.is_finished {
            return None;
        }
        match (self.home_score, self.away_score) {
            (Some(home), Some(away)) => Some(FinalScore::new(home, away)),
            _ => None,
        }
    }

    /// Open for predictions: not finished and still before the cutoff
    pub fn accepts_predictions(&self, now: DateTime<Utc>) -> bool {
        !self.is_finished && can_predict(self.match_date, now)
    }
}

/// Last-five form of one team going into a match
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TeamStat {
    pub id: Uuid,
    pub match_id: Uuid,
    pub team_name: String,
    pub last_five_form: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
pub struct MatchWithFormRow {
    #[sqlx(flatten)]
    pub fixture: Match,
    pub home_form: Option<String>,
    pub away_form: Option<String>,
}

/// Match as listed to clients: forms joined in, prediction window evaluated
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchListing {
    #[serde(flatten)]
    pub fixture: Match,
    pub home_form: Option<String>,
    pub away_form: Option<String>,
    pub prediction_deadline: DateTime<Utc>,
    pub predictions_open: bool,
}

impl MatchListing {
    pub fn from_row(row: MatchWithFormRow, now: DateTime<Utc>) -> Self {
        let prediction_deadline = prediction_deadline(row.fixture.match_date);
        let predictions_open = row.fixture.accepts_predictions(now);
        Self {
            fixture: row.fixture,
            home_form: row.home_form,
            away_form: row.away_form,
            prediction_deadline,
            predictions_open,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MatchDetail {
    #[serde(rename = "match")]
    pub fixture: Match,
    pub stats: Vec<TeamStat>,
    pub prediction_deadline: DateTime<Utc>,
    pub predictions_open: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateMatchRequest {
    pub home_team: String,
    pub away_team: String,
    pub match_date: DateTime<Utc>,
    pub week: i32,
    pub day: String,
    pub home_team_form: Option<String>,
    pub away_team_form: Option<String>,
}

/// Validated form strings for the home and away side
#[derive(Debug, Default, PartialEq)]
pub struct FormUpdate {
    pub home: Option<String>,
    pub away: Option<String>,
}

impl FormUpdate {
    fn parse(home: Option<&str>, away: Option<&str>) -> Result<Self, AppError> {
        Ok(Self {
            home: home.map(parse_form).transpose()?,
            away: away.map(parse_form).transpose()?,
        })
    }
}

impl CreateMatchRequest {
    pub fn validate(&self) -> Result<FormUpdate, AppError> {
        validate_team_name(&self.home_team)?;
        validate_team_name(&self.away_team)?;
        validate_distinct_teams(&self.home_team, &self.away_team)?;
        validate_day(&self.day)?;
        validate_week(self.week)?;
        FormUpdate::parse(self.home_team_form.as_deref(), self.away_team_form.as_deref())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateMatchRequest {
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    pub match_date: Option<DateTime<Utc>>,
    pub week: Option<i32>,
    pub day: Option<String>,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub is_finished: Option<bool>,
    pub home_team_form: Option<String>,
    pub away_team_form: Option<String>,
}

/// Full field set of a match after a partial update has been applied
#[derive(Debug, Clone, PartialEq)]
pub struct MatchChanges {
    pub home_team: String,
    pub away_team: String,
    pub match_date: DateTime<Utc>,
    pub week: i32,
    pub day: String,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub is_finished: bool,
}

impl UpdateMatchRequest {
    /// Merge the request into `current`, rejecting combinations that would break
    /// the score invariants.
    pub fn apply(&self, current: &Match) -> Result<(MatchChanges, FormUpdate), AppError> {
        let changes = MatchChanges {
            home_team: self.home_team.clone().unwrap_or_else(|| current.home_team.clone()),
            away_team: self.away_team.clone().unwrap_or_else(|| current.away_team.clone()),
            match_date: self.match_date.unwrap_or(current.match_date),
            week: self.week.unwrap_or(current.week),
            day: self.day.clone().unwrap_or_else(|| current.day.clone()),
            home_score: self.home_score.or(current.home_score),
            away_score: self.away_score.or(current.away_score),
            is_finished: self.is_finished.unwrap_or(current.is_finished),
        };

        validate_team_name(&changes.home_team)?;
        validate_team_name(&changes.away_team)?;
        validate_distinct_teams(&changes.home_team, &changes.away_team)?;
        validate_day(&changes.day)?;
        validate_week(changes.week)?;

        match (changes.home_score, changes.away_score) {
            (Some(home), Some(away)) if home < 0 || away < 0 => {
                return Err(AppError::validation("Scores must be non-negative"));
            }
            (Some(_), None) | (None, Some(_)) => {
                return Err(AppError::validation("Home and away score must be set together"));
            }
            (None, None) if changes.is_finished => {
                return Err(AppError::validation("A finished match needs both scores"));
            }
            _ => {}
        }

        let forms = FormUpdate::parse(self.home_team_form.as_deref(), self.away_team_form.as_deref())?;
        Ok((changes, forms))
    }
}

/// Normalise a last-five form string: exactly five of G (win), B (draw), M (loss)
pub fn parse_form(raw: &str) -> Result<String, AppError> {
    let form = raw.trim().to_uppercase();
    if form.chars().count() != FORM_LENGTH {
        return Err(AppError::validation(format!(
            "Form must be exactly {} characters",
            FORM_LENGTH
        )));
    }
    if !form.chars().all(|c| matches!(c, 'G' | 'B' | 'M')) {
        return Err(AppError::validation("Form may only contain G, B or M"));
    }
    Ok(form)
}

fn validate_team_name(name: &str) -> Result<(), AppError> {
    let len = name.trim().chars().count();
    if len == 0 || len > TEAM_NAME_MAX_LEN {
        return Err(AppError::validation(format!(
            "Team name must be between 1 and {} characters",
            TEAM_NAME_MAX_LEN
        )));
    }
    Ok(())
}

fn validate_distinct_teams(home: &str, away: &str) -> Result<(), AppError> {
    if home.trim().to_lowercase() == away.trim().to_lowercase() {
        return Err(AppError::validation("A team cannot play itself"));
    }
    Ok(())
}

fn validate_day(day: &str) -> Result<(), AppError> {
    let len = day.trim().chars().count();
    if len == 0 || len > DAY_MAX_LEN {
        return Err(AppError::validation(format!(
            "Day must be between 1 and {} characters",
            DAY_MAX_LEN
        )));
    }
    Ok(())
}

fn validate_week(week: i32) -> Result<(), AppError> {
    if week < 1 {
        return Err(AppError::validation("Week must be at least 1"));
    }
    Ok(())
}
