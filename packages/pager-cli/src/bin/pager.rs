#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pager_cli::cli::run_cli().await
}
