mod account;
mod feedback;
mod survey;

use dashmap::DashMap;
use itertools::Itertools;
use once_cell::sync::Lazy;

use crate::error::Result;
use crate::handler::AppData;
use crate::helpers::command_def::{CommandDef, CommandHandler};
use crate::helpers::command_opt::{self, CommandOpt};

pub const COMMANDS: &[CommandDef] = &[
    CommandDef {
        name: account::REGISTER,
        usage: "--email <email> --password <password>",
        description: "Register a new account",
        handler: |d, o| Box::pin(async move { account::register(d, o).await }),
    },
    CommandDef {
        name: survey::CREATE,
        usage: "--email <email> --password <password> --title <title> [--description <text>] --option <text>...",
        description: "Create a survey with 2 to 10 options",
        handler: |d, o| Box::pin(async move { survey::create(d, o).await }),
    },
    CommandDef {
        name: survey::LIST,
        usage: "--email <email> --password <password>",
        description: "List the surveys you own",
        handler: |d, o| Box::pin(async move { survey::list(d, o).await }),
    },
    CommandDef {
        name: survey::SHOW,
        usage: "--survey <id>",
        description: "Show a survey and its options",
        handler: |d, o| Box::pin(async move { survey::show(d, o).await }),
    },
    CommandDef {
        name: survey::DELETE,
        usage: "--email <email> --password <password> --survey <id>",
        description: "Delete a survey you own, with all of its responses",
        handler: |d, o| Box::pin(async move { survey::delete(d, o).await }),
    },
    CommandDef {
        name: feedback::SUBMIT,
        usage: "--survey <id> --option <option id> [--respondent <email>] [--comment <text>]",
        description: "Submit a response to a survey",
        handler: |d, o| Box::pin(async move { feedback::submit(d, o).await }),
    },
    CommandDef {
        name: feedback::RESULTS,
        usage: "--email <email> --password <password> --survey <id>",
        description: "Show aggregated results for a survey you own",
        handler: |d, o| Box::pin(async move { feedback::results(d, o).await }),
    },
    CommandDef {
        name: feedback::EXPORT,
        usage: "--email <email> --password <password> --survey <id> [--include-email]",
        description: "Export the responses of a survey you own as CSV",
        handler: |d, o| Box::pin(async move { feedback::export(d, o).await }),
    },
    CommandDef {
        name: HELP,
        usage: "",
        description: "Show this message",
        handler: |_, _| Box::pin(async move { Ok(usage()) }),
    },
];

const HELP: &str = "help";

static COMMAND_MAP: Lazy<DashMap<String, CommandHandler>> = Lazy::new(|| {
    let map = DashMap::new();

    for cmd in COMMANDS {
        map.insert(cmd.name.to_string(), cmd.handler);
    }

    map
});

pub fn get_handler(command_name: &str) -> Option<CommandHandler> {
    COMMAND_MAP
        .get(command_name)
        .as_ref()
        .map(|entry| *entry.value())
}

pub fn usage() -> String {
    let commands = COMMANDS.iter()
        .map(|cmd| format!("  {:<9} {}\n            {}", cmd.name, cmd.description, cmd.usage))
        .join("\n");

    format!(
        "Usage: easysurvey <command> [options]\n\nCommands:\n{}\n\nValues starting with -- must be given as --name=value.",
        commands,
    )
}

/// Authenticates `--email`/`--password` and returns the caller's user id.
async fn login(data: &AppData, opts: &[CommandOpt]) -> Result<i64> {
    let email = command_opt::find_required(opts, command_opt::find_string_opt, "email")?;
    let password = command_opt::find_required(opts, command_opt::find_string_opt, "password")?;

    let user = crate::survey::authenticate(data.db_client.conn(), &email, &password).await?;

    Ok(user.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_command_is_registered_once() {
        let names = COMMANDS.iter().map(|cmd| cmd.name).collect::<Vec<_>>();
        assert_eq!(names.iter().unique().count(), names.len());

        for name in names {
            assert!(get_handler(name).is_some(), "{}", name);
        }
        assert!(get_handler("vote").is_none());
    }

    #[test]
    fn usage_lists_every_command() {
        let text = usage();
        for cmd in COMMANDS {
            assert!(text.contains(cmd.name));
        }
        assert!(text.contains("--name=value"));
    }
}
