use std::sync::Arc;

use evlog::meta;

use crate::commands;
use crate::config::Config;
use crate::db::dbclient::DBClient;
use crate::helpers::command_opt;
use crate::runtime::get_logger;

pub struct AppData {
    pub db_client: Arc<DBClient>,
    pub config: Config,
}

impl AppData {
    pub fn new(db_client: DBClient, config: Config) -> Self {
        let db_client = Arc::new(db_client);

        Self {
            db_client,
            config,
        }
    }
}

/// Runs the command named by `args[0]` and returns the text to show the user. Requests the
/// store rejects (bad input, not found, not permitted) are answered with the reason; store
/// failures are returned as errors.
pub async fn dispatch(data: Arc<AppData>, args: &[String]) -> anyhow::Result<String> {
    let (command_name, rest) = match args.split_first() {
        None => ("help", &[][..]),
        Some((name, rest)) => (name.as_str(), rest),
    };

    let handler = match commands::get_handler(command_name) {
        None => {
            get_logger().info("Unknown command.", meta! {
                "CommandName" => command_name,
            });
            return Ok(format!("Unknown command '{}'.\n\n{}", command_name, commands::usage()));
        }
        Some(v) => v,
    };

    let opts = match command_opt::parse_opts(rest) {
        Ok(v) => v,
        Err(e) => return Ok(e.to_string()),
    };

    get_logger().debug("Running command.", meta! {
        "CommandName" => command_name,
        "Options" => opts.len(),
    });

    match handler(data, opts).await {
        Ok(reply) => Ok(reply),
        Err(e) if e.is_rejection() => {
            get_logger().info("Command rejected.", meta! {
                "CommandName" => command_name,
                "Reason" => e,
            });
            Ok(e.to_string())
        }
        Err(e) => {
            get_logger().error("Error occurred in command processor.", meta! {
                "CommandName" => command_name,
                "Error" => e,
            });
            Err(e.into())
        }
    }
}
