//! web-larek terminal storefront.
//!
//! Loads the catalog from the web-larek API and runs a line-oriented shop on
//! stdin/stdout. Logs go to stderr.
//!
//! # Architecture
//!
//! - Current-thread Tokio runtime with a `LocalSet` (the engine is `Rc`-based)
//! - `reqwest` transport behind [`ShopApi`], catalog cached with `moka`
//! - Synchronous event bus; the checkout orchestrator reacts to commands
//! - Sentry error reporting when `SENTRY_DSN` is set

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;
use std::process::ExitCode;

use larek_storefront::api::{HttpTransport, ShopApi};
use larek_storefront::checkout::View;
use larek_storefront::config::StorefrontConfig;
use larek_storefront::error::{self, AppError};
use larek_storefront::events::Event;
use larek_storefront::state::Storefront;
use larek_storefront::terminal::{Action, Command, HELP, TerminalView};
use sentry::integrations::tracing as sentry_tracing;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type Shop = Storefront<ShopApi<HttpTransport>>;

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        tracing::Level::TRACE => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "larek_storefront=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            let _ = writeln!(std::io::stderr(), "Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    let local = tokio::task::LocalSet::new();
    match local.run_until(run(config)).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            e.report();
            ExitCode::FAILURE
        }
    }
}

async fn run(config: StorefrontConfig) -> error::Result<()> {
    let transport = HttpTransport::new(config.api_base_url.clone(), config.request_timeout)?;
    tracing::info!(api = %transport.base_url(), "storefront starting");
    let api = ShopApi::new(transport, config.catalog_cache_ttl);

    let products = api.get_product_list().await?;
    tracing::info!(products = products.len(), "catalog loaded");

    let shop: Shop = Storefront::new(api);
    shop.bus()
        .on_all(|event| error::add_breadcrumb("event", event.name()));
    shop.catalog().set_products(products);

    let view = TerminalView::new(config.cdn_base_url);
    let mut stdout = std::io::stdout();
    writeln!(stdout, "{HELP}\n")?;
    write!(stdout, "{}", view.render(&shop.checkout().screens()))?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let action = line
            .parse::<Command>()
            .and_then(|command| command.resolve(&shop));
        match action {
            Ok(Action::Quit) => break,
            Ok(Action::Help) => writeln!(stdout, "{HELP}")?,
            Ok(Action::List) => write!(
                stdout,
                "{}",
                TerminalView::render_gallery(&shop.checkout().screens().gallery)
            )?,
            Ok(Action::Emit(event)) => {
                dispatch(&shop, event).await;
                write!(stdout, "{}", view.render(&shop.checkout().screens()))?;
            }
            Err(e) => {
                let e = AppError::from(e);
                e.report();
                writeln!(stdout, "{e}")?;
            }
        }
    }

    tracing::info!("storefront stopped");
    Ok(())
}

/// Emit the event and let a triggered order request finish before returning.
async fn dispatch(shop: &Shop, event: Event) {
    let submits = matches!(event, Event::ContactsSubmit);
    shop.emit(event);
    if submits {
        shop.checkout().wait_for_submission().await;
    }
}
