//! CSV export of a survey's responses.

use std::io;

use once_cell::sync::Lazy;
use regex::Regex;
use sqlx::SqlitePool;

use crate::db::schema::{Response, Survey};
use crate::error::{Result, SurveyError};
use crate::survey::{catalog, ledger};

pub const CONTENT_TYPE: &str = "text/csv";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Label for a response whose option is no longer part of the survey.
pub const REMOVED_OPTION: &str = "(option removed)";

static UNSAFE_FILENAME_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9 _.\-]").unwrap());

/// A complete, in-memory download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    pub filename: String,
    pub content_type: &'static str,
    pub body: String,
}

/// `<title>_results.csv`, restricted to characters that are safe in a `Content-Disposition`
/// filename and on common filesystems.
pub fn export_filename(title: &str) -> String {
    let safe = UNSAFE_FILENAME_CHARS.replace_all(title, "_");
    let safe = safe.trim_matches(|c: char| c == '.' || c == ' ');
    let safe = if safe.is_empty() { "survey" } else { safe };

    format!("{}_results.csv", safe)
}

pub fn export_csv(survey: &Survey, responses: &[Response], include_email: bool) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = vec!["Timestamp", "Selected Option"];
    if include_email {
        header.push("Email");
    }
    header.push("Comment");
    writer.write_record(&header)?;

    for response in responses {
        let timestamp = response.created_at.format(TIMESTAMP_FORMAT).to_string();
        let option = survey.option(response.option_id)
            .map(|opt| opt.text.as_str())
            .unwrap_or(REMOVED_OPTION);

        let mut row = vec![timestamp.as_str(), option];
        if include_email {
            row.push(response.respondent_email.as_deref().unwrap_or(""));
        }
        row.push(response.comment.as_deref().unwrap_or(""));
        writer.write_record(&row)?;
    }

    let bytes = writer.into_inner()
        .map_err(|e| SurveyError::Export(e.into_error().into()))?;

    String::from_utf8(bytes)
        .map_err(|e| SurveyError::Export(io::Error::new(io::ErrorKind::InvalidData, e).into()))
}

/// Owner-only CSV download of every response to the survey.
pub async fn export_results(
    conn: &SqlitePool,
    caller: Option<i64>,
    id_survey: i64,
    include_email: bool,
) -> Result<ExportDocument> {
    let survey = catalog::owned_survey(conn, caller, id_survey).await?;
    let responses = ledger::list_responses(conn, survey.id).await?;

    Ok(ExportDocument {
        filename: export_filename(&survey.title),
        content_type: CONTENT_TYPE,
        body: export_csv(&survey, &responses, include_email)?,
    })
}
