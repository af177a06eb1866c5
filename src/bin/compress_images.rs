use portfolio_site::compress::{check_capabilities, run, CompressSettings};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() {
    init_tracing();

    let settings = CompressSettings::default();
    if let Err(err) = check_capabilities(&settings) {
        error!("{err}");
        std::process::exit(1);
    }
    info!(
        root = %settings.root.display(),
        quality = settings.quality,
        max_width = settings.max_width,
        batch_size = settings.batch_size,
        "Compressing images"
    );

    match run(settings).await {
        Ok(summary) => println!("{summary}"),
        Err(err) => {
            error!("{err}");
            std::process::exit(1);
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_filter(env_filter))
        .init();
}
