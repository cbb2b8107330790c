use anyhow::Context as _;

const DEFAULT_FILTER: &str = "warn,comictrack=info";

/// Logs go to stderr; stdout carries command output. `RUST_LOG` overrides
/// [`DEFAULT_FILTER`].
pub fn init() -> anyhow::Result<()> {
    let filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => tracing_subscriber::EnvFilter::try_new(DEFAULT_FILTER)
            .context("build default log filter")?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("install log subscriber: {err}"))?;

    tracing::debug!(default = DEFAULT_FILTER, "logging ready");
    Ok(())
}
