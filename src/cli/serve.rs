use crate::db::MySqlDatabase;
use crate::{web, Config, Database};
use anyhow::Result;
use std::sync::Arc;

pub async fn run(mut config: Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    config.validate()?;

    let db: Arc<dyn Database> = Arc::new(MySqlDatabase::connect_lazy(&config.database));

    let addr = config.bind_addr();
    tracing::info!("Starting {} at http://{}", config.site.name, addr);

    web::serve(config, db, &addr).await?;

    Ok(())
}
