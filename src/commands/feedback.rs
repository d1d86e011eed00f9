use std::sync::Arc;

use evlog::meta;

use crate::error::{Result, SurveyError};
use crate::handler::AppData;
use crate::helpers::command_opt::{self, CommandOpt};
use crate::helpers::command_resp;
use crate::runtime::get_logger;

pub const SUBMIT: &str = "submit";
pub const RESULTS: &str = "results";
pub const EXPORT: &str = "export";

pub async fn submit(data: Arc<AppData>, opts: Vec<CommandOpt>) -> Result<String> {
    let id_survey = command_opt::find_required(&opts, command_opt::find_integer_opt, "survey")?;
    let id_option = command_opt::find_required(&opts, command_opt::find_integer_opt, "option")?;
    let respondent = command_opt::find_string_opt(&opts, "respondent");
    let comment = command_opt::find_string_opt(&opts, "comment");

    crate::survey::submit_response(
        data.db_client.conn(),
        id_survey,
        id_option,
        respondent.as_deref(),
        comment.as_deref(),
    ).await?;

    Ok("Thank you for your feedback!".to_owned())
}

pub async fn results(data: Arc<AppData>, opts: Vec<CommandOpt>) -> Result<String> {
    let id_caller = super::login(&data, &opts).await?;
    let id_survey = command_opt::find_required(&opts, command_opt::find_integer_opt, "survey")?;

    let results = crate::survey::survey_results(data.db_client.conn(), Some(id_caller), id_survey).await?;

    Ok(command_resp::survey_results(&results))
}

pub async fn export(data: Arc<AppData>, opts: Vec<CommandOpt>) -> Result<String> {
    let id_caller = super::login(&data, &opts).await?;
    let id_survey = command_opt::find_required(&opts, command_opt::find_integer_opt, "survey")?;
    let include_email = command_opt::find_flag(&opts, "include-email");

    let document = crate::survey::export_results(data.db_client.conn(), Some(id_caller), id_survey, include_email).await?;

    let path = data.config.export_dir.join(&document.filename);
    tokio::fs::write(&path, document.body.as_bytes())
        .await
        .map_err(|e| SurveyError::Export(e.into()))?;

    get_logger().info("Survey results exported.", meta! {
        "SurveyID" => id_survey,
        "Path" => path.display(),
        "IncludeEmail" => include_email,
    });

    Ok(format!("Exported {} ({}) to {}", document.filename, document.content_type, path.display()))
}
