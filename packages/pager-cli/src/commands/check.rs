use pager_database::PagerConnectionPool;
use pager_lib::{
    config::{PagerArgs, PagerConfig},
    defaults,
    utils::{init_logging, ServiceStatus},
};
use tracing::{error, info};

pub async fn exec(args: PagerArgs) -> anyhow::Result<()> {
    let config = PagerConfig::from_args(args)?;
    init_logging(&config)?;

    info!("Configuration: {:?}", config);

    let pool = PagerConnectionPool::connect(
        config.database.connection_url()?.as_str(),
        defaults::POSTGRES_MAX_CONNECTIONS,
    )
    .await?;

    match pool.is_connected().await? {
        ServiceStatus::OK => {
            info!("Database is reachable.");
            Ok(())
        }
        ServiceStatus::NotOk => {
            error!("Database did not answer the health check.");
            anyhow::bail!("Database health check failed")
        }
    }
}
