use evlog::meta;
use sqlx::SqlitePool;

use crate::db;
use crate::db::schema::Response;
use crate::error::{Result, SurveyError};
use crate::runtime::get_logger;
use crate::support::sanitize::{self, check_len, escape_markup, non_blank};
use crate::survey::catalog;

pub const COMMENT_MAX_LEN: usize = 500;

/// Records one respondent's choice. Respondents are not deduplicated; every call appends.
pub async fn submit_response(
    conn: &SqlitePool,
    id_survey: i64,
    id_option: i64,
    email: Option<&str>,
    comment: Option<&str>,
) -> Result<Response> {
    let survey = catalog::get_survey(conn, id_survey).await?;

    let email = match email.and_then(non_blank) {
        None => None,
        Some(v) => Some(escape_markup(&sanitize::clean_email("email", v)?)),
    };

    let comment = match comment.and_then(non_blank) {
        None => None,
        Some(v) => {
            check_len("comment", v, COMMENT_MAX_LEN)?;
            Some(escape_markup(v))
        }
    };

    let response = db::model::add_response(conn, survey.id, id_option, email.as_deref(), comment.as_deref()).await?;

    match response {
        Some(v) => {
            get_logger().info("Response recorded.", meta! {
                "SurveyID" => v.survey_id,
                "OptionID" => v.option_id,
                "ResponseID" => v.id,
            });
            Ok(v)
        }
        None => {
            get_logger().info("Rejected response with an option outside the survey.", meta! {
                "SurveyID" => id_survey,
                "OptionID" => id_option,
            });
            Err(SurveyError::InvalidOption { survey_id: id_survey, option_id: id_option })
        }
    }
}

/// Every response recorded for the survey, oldest first.
pub async fn list_responses(conn: &SqlitePool, id_survey: i64) -> Result<Vec<Response>> {
    db::model::list_responses(conn, id_survey).await
}
