use std::sync::Arc;

use futures::future::BoxFuture;

use crate::error::Result;
use crate::handler::AppData;
use crate::helpers::command_opt::CommandOpt;

/// Runs one command and produces the text to show the user.
pub type CommandHandler = fn(Arc<AppData>, Vec<CommandOpt>) -> BoxFuture<'static, Result<String>>;

pub struct CommandDef {
    pub name: &'static str,
    pub usage: &'static str,
    pub description: &'static str,
    pub handler: CommandHandler,
}
