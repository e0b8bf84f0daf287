use crate::db::MySqlDatabase;
use crate::{Config, Database};
use anyhow::Result;

pub async fn run(config: &Config) -> Result<()> {
    let db = MySqlDatabase::connect_lazy(&config.database);
    let target = format!(
        "{}@{}:{}/{}",
        config.database.user, config.database.host, config.database.port, config.database.name
    );

    let result = db.ping().await;
    db.close().await;

    match result {
        Ok(()) => {
            println!("\x1b[32m✓ OK\x1b[0m    Database reachable ({})", target);
            Ok(())
        }
        Err(e) => {
            println!("\x1b[31m✗ FAIL\x1b[0m  Database unreachable ({}): {:#}", target, e);
            anyhow::bail!("database check failed")
        }
    }
}
