use std::sync::Arc;

use crate::error::Result;
use crate::handler::AppData;
use crate::helpers::command_opt::{self, CommandOpt};

pub const REGISTER: &str = "register";

pub async fn register(data: Arc<AppData>, opts: Vec<CommandOpt>) -> Result<String> {
    let email = command_opt::find_required(&opts, command_opt::find_string_opt, "email")?;
    let password = command_opt::find_required(&opts, command_opt::find_string_opt, "password")?;

    let user = crate::survey::register_user(data.db_client.conn(), &email, &password).await?;

    Ok(format!("Congratulations, you are now a registered user! (user {}, {})", user.id, user.email))
}
