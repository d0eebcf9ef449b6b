use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::matches::{CreateMatchRequest, FormUpdate, Match, MatchChanges, MatchWithFormRow, TeamStat};

const MATCH_COLUMNS: &str = "id, home_team, away_team, match_date, week, day, home_score, away_score, is_finished, created_at, updated_at";

const LISTING_SELECT: &str = r#"
    SELECT
        m.id, m.home_team, m.away_team, m.match_date, m.week, m.day,
        m.home_score, m.away_score, m.is_finished, m.created_at, m.updated_at,
        hs.last_five_form AS home_form,
        aws.last_five_form AS away_form
    FROM matches m
    LEFT JOIN team_stats hs ON hs.match_id = m.id AND hs.team_name = m.home_team
    LEFT JOIN team_stats aws ON aws.match_id = m.id AND aws.team_name = m.away_team
"#;

/// All fixtures, latest kickoff first
pub async fn list_matches(pool: &PgPool) -> Result<Vec<MatchWithFormRow>, sqlx::Error> {
    sqlx::query_as::<_, MatchWithFormRow>(&format!("{LISTING_SELECT} ORDER BY m.match_date DESC, m.id"))
        .fetch_all(pool)
        .await
}

/// Fixtures of one gameweek in kickoff order
pub async fn list_matches_by_week(pool: &PgPool, week: i32) -> Result<Vec<MatchWithFormRow>, sqlx::Error> {
    sqlx::query_as::<_, MatchWithFormRow>(&format!(
        "{LISTING_SELECT} WHERE m.week = $1 ORDER BY m.match_date ASC, m.id"
    ))
    .bind(week)
    .fetch_all(pool)
    .await
}

pub async fn find_match(pool: &PgPool, match_id: Uuid) -> Result<Option<Match>, sqlx::Error> {
    sqlx::query_as::<_, Match>(&format!("SELECT {MATCH_COLUMNS} FROM matches WHERE id = $1"))
        .bind(match_id)
        .fetch_optional(pool)
        .await
}

/// Row-locking read used before an update in the same transaction
pub async fn find_match_for_update(
    tx: &mut Transaction<'_, Postgres>,
    match_id: Uuid,
) -> Result<Option<Match>, sqlx::Error> {
    sqlx::query_as::<_, Match>(&format!(
        "SELECT {MATCH_COLUMNS} FROM matches WHERE id = $1 FOR UPDATE"
    ))
    .bind(match_id)
    .fetch_optional(&mut **tx)
    .await
}

pub async fn team_stats_for_match(pool: &PgPool, match_id: Uuid) -> Result<Vec<TeamStat>, sqlx::Error> {
    sqlx::query_as::<_, TeamStat>(
        r#"
        SELECT id, match_id, team_name, last_five_form, created_at, updated_at
        FROM team_stats
        WHERE match_id = $1
        ORDER BY team_name
        "#,
    )
    .bind(match_id)
    .fetch_all(pool)
    .await
}

pub async fn insert_match(
    tx: &mut Transaction<'_, Postgres>,
    request: &CreateMatchRequest,
) -> Result<Match, sqlx::Error> {
    sqlx::query_as::<_, Match>(&format!(
        r#"
        INSERT INTO matches (id, home_team, away_team, match_date, week, day, is_finished)
        VALUES ($1, $2, $3, $4, $5, $6, FALSE)
        RETURNING {MATCH_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(request.home_team.trim())
    .bind(request.away_team.trim())
    .bind(request.match_date)
    .bind(request.week)
    .bind(request.day.trim())
    .fetch_one(&mut **tx)
    .await
}

pub async fn update_match(
    tx: &mut Transaction<'_, Postgres>,
    match_id: Uuid,
    changes: &MatchChanges,
) -> Result<Match, sqlx::Error> {
    sqlx::query_as::<_, Match>(&format!(
        r#"
        UPDATE matches SET
            home_team = $2,
            away_team = $3,
            match_date = $4,
            week = $5,
            day = $6,
            home_score = $7,
            away_score = $8,
            is_finished = $9,
            updated_at = NOW()
        WHERE id = $1
        RETURNING {MATCH_COLUMNS}
        "#
    ))
    .bind(match_id)
    .bind(changes.home_team.trim())
    .bind(changes.away_team.trim())
    .bind(changes.match_date)
    .bind(changes.week)
    .bind(changes.day.trim())
    .bind(changes.home_score)
    .bind(changes.away_score)
    .bind(changes.is_finished)
    .fetch_one(&mut **tx)
    .await
}

/// Write whichever forms are present, keyed by the match's current team names
pub async fn upsert_team_forms(
    tx: &mut Transaction<'_, Postgres>,
    fixture: &Match,
    forms: &FormUpdate,
) -> Result<(), sqlx::Error> {
    let pairs = [
        (&fixture.home_team, forms.home.as_deref()),
        (&fixture.away_team, forms.away.as_deref()),
    ];

    for (team_name, form) in pairs {
        let Some(form) = form else { continue };
        sqlx::query(
            r#"
            INSERT INTO team_stats (id, match_id, team_name, last_five_form)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (match_id, team_name)
            DO UPDATE SET last_five_form = EXCLUDED.last_five_form, updated_at = NOW()
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(fixture.id)
        .bind(team_name)
        .bind(form)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

/// Team stats, predictions, comments and awarded points go with it (FK cascade)
pub async fn delete_match(tx: &mut Transaction<'_, Postgres>, match_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM matches WHERE id = $1")
        .bind(match_id)
        .execute(&mut **tx)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Finished matches carrying an official score, oldest first
pub async fn finished_matches(tx: &mut Transaction<'_, Postgres>) -> Result<Vec<Match>, sqlx::Error> {
    sqlx::query_as::<_, Match>(&format!(
        r#"
        SELECT {MATCH_COLUMNS} FROM matches
        WHERE is_finished AND home_score IS NOT NULL AND away_score IS NOT NULL
        ORDER BY match_date ASC
        "#
    ))
    .fetch_all(&mut **tx)
    .await
}

/// Carry the stored forms over when the admin renames or swaps the teams.
///
/// The rows are taken out and written back under their new names, so a swap
/// never collides with the `(match_id, team_name)` unique key halfway through.
pub async fn carry_team_stats(
    tx: &mut Transaction<'_, Postgres>,
    previous: &Match,
    current: &Match,
) -> Result<(), sqlx::Error> {
    if previous.home_team == current.home_team && previous.away_team == current.away_team {
        return Ok(());
    }

    let carried = sqlx::query_as::<_, (String, String, DateTime<Utc>)>(
        "DELETE FROM team_stats WHERE match_id = $1 RETURNING team_name, last_five_form, created_at",
    )
    .bind(previous.id)
    .fetch_all(&mut **tx)
    .await?;

    for (team_name, form, created_at) in carried {
        let renamed = if team_name == previous.home_team {
            &current.home_team
        } else if team_name == previous.away_team {
            &current.away_team
        } else {
            continue;
        };

        sqlx::query(
            r#"
            INSERT INTO team_stats (id, match_id, team_name, last_five_form, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, NOW())
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(current.id)
        .bind(renamed)
        .bind(form)
        .bind(created_at)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}
