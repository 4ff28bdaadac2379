use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "cinefav-server")]
#[command(about = "Movie catalog proxy and favourites server", long_about = None)]
struct Args {
    #[arg(short, long, default_value = "cinefav.yaml")]
    config: String,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let default_filter = if args.debug {
        "cinefav=debug,tower_http=debug"
    } else {
        "cinefav=info,tower_http=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = cinefav::run(&args.config).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
