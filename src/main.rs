use std::env;
use std::sync::Arc;

use anyhow::Context;
use evlog::{LogEventConsolePrinter, Logger};

use easysurvey::config::Config;
use easysurvey::db::dbclient::DBClient;
use easysurvey::handler::{self, AppData};
use easysurvey::runtime::set_logger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut logger = Logger::default();
    logger.register(LogEventConsolePrinter::default());
    set_logger(logger);

    let config = Config::load()?;

    let db_client = DBClient::new(&config.database_url, config.db_max_connections).await
        .context("failed to connect to database")?;

    let data = Arc::new(AppData::new(db_client, config));

    let args = env::args().skip(1).collect::<Vec<String>>();
    let reply = handler::dispatch(data, &args).await?;

    println!("{}", reply);

    Ok(())
}
