use anyhow::Context as _;

mod args;

const THREAD_NAME: &str = "remote-mocks-server";

fn main() -> anyhow::Result<()> {
    let args = self::args::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name(THREAD_NAME)
        .build()?;

    runtime.block_on(async move {
        let filter = tracing_subscriber::filter::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::filter::EnvFilter::new("info"));
        tracing_subscriber::fmt().with_env_filter(filter).init();

        tracing::info!("remote-mocks-server {}", env!("CARGO_PKG_VERSION"));

        let listener = tokio::net::TcpListener::bind(args.listen_address)
            .await
            .with_context(|| format!("binding {}", args.listen_address))?;
        tracing::info!("listening on {}", args.listen_address);

        axum::serve(listener, remote_mocks::router()).await?;

        Ok::<(), anyhow::Error>(())
    })?;

    Ok(())
}
