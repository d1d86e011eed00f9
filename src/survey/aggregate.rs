//! Per-option tallies derived from a survey's response ledger.
//!
//! Results are recomputed from the responses on every call; nothing is cached or stored.

use sqlx::SqlitePool;

use crate::db::schema::{Response, Survey};
use crate::error::Result;
use crate::survey::{catalog, ledger};

#[derive(Debug, Clone, PartialEq)]
pub struct OptionResult {
    pub option_id: i64,
    pub text: String,
    pub count: usize,
    /// Share of all responses, rounded to one decimal place.
    pub percentage: f64,
    /// Non-empty comments left with this option, oldest first.
    pub comments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SurveyResults {
    pub survey_id: i64,
    pub title: String,
    pub total_responses: usize,
    /// One entry per survey option, in the survey's option order.
    pub options: Vec<OptionResult>,
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }

    let pct = count as f64 / total as f64 * 100.0;
    (pct * 10.0).round() / 10.0
}

pub fn aggregate(survey: &Survey, responses: &[Response]) -> SurveyResults {
    let total = responses.len();

    let options = survey.options.iter()
        .map(|opt| {
            let chosen = responses.iter()
                .filter(|r| r.option_id == opt.id)
                .collect::<Vec<_>>();

            let comments = chosen.iter()
                .filter_map(|r| r.comment.as_deref())
                .filter(|c| !c.is_empty())
                .map(str::to_owned)
                .collect();

            OptionResult {
                option_id: opt.id,
                text: opt.text.clone(),
                count: chosen.len(),
                percentage: percentage(chosen.len(), total),
                comments,
            }
        })
        .collect();

    SurveyResults {
        survey_id: survey.id,
        title: survey.title.clone(),
        total_responses: total,
        options,
    }
}

/// Results view for the survey's owner.
pub async fn survey_results(conn: &SqlitePool, caller: Option<i64>, id_survey: i64) -> Result<SurveyResults> {
    let survey = catalog::owned_survey(conn, caller, id_survey).await?;
    let responses = ledger::list_responses(conn, survey.id).await?;

    Ok(aggregate(&survey, &responses))
}
