use itemvault::{app, state::AppState};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "itemvault=debug,axum=info,tower_http=info";

/// `RUST_LOG` picks the filter; `LOG_FORMAT=json` switches to one JSON object per line.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => builder
            .json()
            .with_target(false)
            .with_current_span(true)
            .init(),
        _ => builder.init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let state = AppState::init()?;
    app::serve(app::build_app(state.clone()), &state).await
}
