use std::sync::Arc;

use crate::error::Result;
use crate::handler::AppData;
use crate::helpers::command_opt::{self, CommandOpt};
use crate::helpers::command_resp;

pub const CREATE: &str = "create";
pub const LIST: &str = "list";
pub const SHOW: &str = "show";
pub const DELETE: &str = "delete";

pub async fn create(data: Arc<AppData>, opts: Vec<CommandOpt>) -> Result<String> {
    let id_owner = super::login(&data, &opts).await?;

    let title = command_opt::find_required(&opts, command_opt::find_string_opt, "title")?;
    let description = command_opt::find_string_opt(&opts, "description");
    let options = command_opt::find_string_opts(&opts, "option");

    let survey = crate::survey::create_survey(
        data.db_client.conn(),
        Some(id_owner),
        &title,
        description.as_deref(),
        &options,
    ).await?;

    Ok(format!("Your survey has been created!\n{}", command_resp::survey_summary(&survey)))
}

pub async fn list(data: Arc<AppData>, opts: Vec<CommandOpt>) -> Result<String> {
    let id_owner = super::login(&data, &opts).await?;

    let surveys = crate::survey::list_surveys_owned_by(data.db_client.conn(), Some(id_owner)).await?;

    Ok(command_resp::survey_list(&surveys))
}

pub async fn show(data: Arc<AppData>, opts: Vec<CommandOpt>) -> Result<String> {
    let id_survey = command_opt::find_required(&opts, command_opt::find_integer_opt, "survey")?;

    let survey = crate::survey::get_survey(data.db_client.conn(), id_survey).await?;

    Ok(command_resp::survey_summary(&survey))
}

pub async fn delete(data: Arc<AppData>, opts: Vec<CommandOpt>) -> Result<String> {
    let id_owner = super::login(&data, &opts).await?;
    let id_survey = command_opt::find_required(&opts, command_opt::find_integer_opt, "survey")?;

    crate::survey::delete_survey(data.db_client.conn(), Some(id_owner), id_survey).await?;

    Ok(format!("Survey {} and all of its responses were deleted.", id_survey))
}
