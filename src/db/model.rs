use chrono::Utc;
use sqlx::{query, query_as, SqlitePool};
use tokio_stream::StreamExt;

use crate::db::schema::{Response, Survey, SurveyOption, User};
use crate::error::Result;

pub async fn add_user(conn: &SqlitePool, email: &str, password_hash: &str) -> Result<User> {
    let user = query_as::<_, User>(
        "INSERT INTO users (email, password_hash, created_at)
         VALUES (?, ?, ?)
         RETURNING id, email, password_hash, created_at;")
        .bind(email)
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_one(conn)
        .await?;

    Ok(user)
}

pub async fn find_user_by_email(conn: &SqlitePool, email: &str) -> Result<Option<User>> {
    let user = query_as::<_, User>("SELECT id, email, password_hash, created_at FROM users WHERE email=?;")
        .bind(email)
        .fetch_optional(conn)
        .await?;

    Ok(user)
}

pub async fn get_user(conn: &SqlitePool, id_user: i64) -> Result<Option<User>> {
    let user = query_as::<_, User>("SELECT id, email, password_hash, created_at FROM users WHERE id=?;")
        .bind(id_user)
        .fetch_optional(conn)
        .await?;

    Ok(user)
}

async fn list_survey_options(conn: &SqlitePool, id_survey: i64) -> Result<Vec<SurveyOption>> {
    let mut stream = query_as::<_, SurveyOption>("SELECT id, survey_id, text FROM survey_options WHERE survey_id=? ORDER BY id;")
        .bind(id_survey)
        .fetch(conn);

    let mut result = Vec::new();
    while let Some(opt) = stream.try_next().await? {
        result.push(opt);
    }

    Ok(result)
}

pub async fn get_survey(conn: &SqlitePool, id_survey: i64) -> Result<Option<Survey>> {
    let r = query_as::<_, Survey>(
        "SELECT id, title, description, creator_id, created_at, updated_at FROM surveys WHERE id=?;")
        .bind(id_survey)
        .fetch_optional(conn)
        .await?;

    let mut survey = match r {
        None => return Ok(None),
        Some(v) => v,
    };

    survey.options = list_survey_options(conn, survey.id).await?;

    Ok(Some(survey))
}

pub async fn list_surveys_by_creator(conn: &SqlitePool, id_creator: i64) -> Result<Vec<Survey>> {
    let surveys = query_as::<_, Survey>(
        "SELECT id, title, description, creator_id, created_at, updated_at
         FROM surveys WHERE creator_id=? ORDER BY id;")
        .bind(id_creator)
        .fetch_all(conn)
        .await?;

    let mut result = Vec::with_capacity(surveys.len());
    for mut survey in surveys {
        survey.options = list_survey_options(conn, survey.id).await?;
        result.push(survey);
    }

    Ok(result)
}

/// Inserts the survey and all of its options in one transaction.
pub async fn add_survey(
    conn: &SqlitePool,
    id_creator: i64,
    title: &str,
    description: Option<&str>,
    options: &[String],
) -> Result<Survey> {
    let mut tx = conn.begin().await?;

    let mut survey = query_as::<_, Survey>(
        "INSERT INTO surveys (title, description, creator_id, created_at)
         VALUES (?, ?, ?, ?)
         RETURNING id, title, description, creator_id, created_at, updated_at;")
        .bind(title)
        .bind(description)
        .bind(id_creator)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

    for option in options {
        let option_r = query_as::<_, SurveyOption>(
            "INSERT INTO survey_options (survey_id, text)
             VALUES (?, ?)
             RETURNING id, survey_id, text;")
            .bind(survey.id)
            .bind(option)
            .fetch_one(&mut *tx)
            .await?;

        survey.options.push(option_r);
    }

    tx.commit().await?;

    Ok(survey)
}

/// Removes the survey's responses, options and the survey row. Returns false when the survey
/// did not exist.
pub async fn delete_survey(conn: &SqlitePool, id_survey: i64) -> Result<bool> {
    let mut tx = conn.begin().await?;

    query("DELETE FROM responses WHERE survey_id=?;").bind(id_survey).execute(&mut *tx).await?;
    query("DELETE FROM survey_options WHERE survey_id=?;").bind(id_survey).execute(&mut *tx).await?;
    let r = query("DELETE FROM surveys WHERE id=?;").bind(id_survey).execute(&mut *tx).await?;

    tx.commit().await?;

    Ok(r.rows_affected() > 0)
}

/// Appends a response only when the option belongs to the survey. The membership check and the
/// insert are one statement. Returns `None` without writing when the option is foreign.
pub async fn add_response(
    conn: &SqlitePool,
    id_survey: i64,
    id_option: i64,
    respondent_email: Option<&str>,
    comment: Option<&str>,
) -> Result<Option<Response>> {
    let response = query_as::<_, Response>(
        "INSERT INTO responses (survey_id, option_id, respondent_email, comment, created_at)
         SELECT ?, ?, ?, ?, ?
         WHERE EXISTS (SELECT 1 FROM survey_options WHERE id=? AND survey_id=?)
         RETURNING id, survey_id, option_id, respondent_email, comment, created_at;")
        .bind(id_survey)
        .bind(id_option)
        .bind(respondent_email)
        .bind(comment)
        .bind(Utc::now())
        .bind(id_option)
        .bind(id_survey)
        .fetch_optional(conn)
        .await?;

    Ok(response)
}

pub async fn list_responses(conn: &SqlitePool, id_survey: i64) -> Result<Vec<Response>> {
    let mut stream = query_as::<_, Response>(
        "SELECT id, survey_id, option_id, respondent_email, comment, created_at
         FROM responses WHERE survey_id=? ORDER BY id;")
        .bind(id_survey)
        .fetch(conn);

    let mut result = Vec::new();
    while let Some(row) = stream.try_next().await? {
        result.push(row);
    }

    Ok(result)
}
