use std::{io, sync::OnceLock};

use application::{repl, Args, Config, JsonMap, Service, TerminalList};
use service::{command::OpenSession, filter, infra::Files, Command as _};
use tracing as log;
use tracing_subscriber::{
    filter::filter_fn,
    layer::{Layer as _, SubscriberExt as _},
    util::SubscriberInitExt as _,
};

const STDERR_LEVELS: &[log::Level] = &[log::Level::WARN, log::Level::ERROR];

static LOG_LEVEL: OnceLock<log::Level> = OnceLock::new();

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_thread_names(true)
                .with_writer(io::stdout)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || (!STDERR_LEVELS.contains(meta.level()))
                            && LOG_LEVEL
                                .get()
                                .copied()
                                .unwrap_or(log::Level::INFO)
                                >= *meta.level()
                })),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_thread_names(true)
                .with_writer(io::stderr)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || (STDERR_LEVELS.contains(meta.level()))
                            && LOG_LEVEL
                                .get()
                                .copied()
                                .unwrap_or(log::Level::INFO)
                                >= *meta.level()
                })),
        )
        .init();

    _ = start().await;
}

async fn start() -> Result<(), ()> {
    let Args { config, share, new } = Args::parse().map_err(|e| {
        log::error!("failed to parse command line arguments: {e}");
    })?;

    let config = Config::new(config).map_err(|e| {
        log::error!("failed to load `Config`: {e}");
    })?;

    LOG_LEVEL
        .set(config.log.level.into())
        .unwrap_or_else(|_| unreachable!("first initialization"));

    let service_config = config.service().map_err(|e| {
        log::error!("invalid `Config`: {e}");
    })?;

    log::info!("reading data from `{}`", config.data.dir.display());
    let service = Service::new(service_config, Files::new(config.data.dir.clone()));

    let mut controller = service
        .execute(OpenSession {
            list: TerminalList::new(io::stdout()),
            map: JsonMap::new(io::stdout()),
            viewport_width: config.search.viewport_width,
            shared: share.as_deref().map(filter::share::from_query),
            fresh: new,
        })
        .await
        .unwrap_or_else(|e| match e {});

    repl::run(
        &service,
        &mut controller,
        tokio::io::BufReader::new(tokio::io::stdin()),
        io::stdout(),
    )
    .await
    .map_err(|e| {
        log::error!("terminal session failed: {e}");
    })
}
