//! cyrtype application binary - composition root.
//!
//! 1. Load configuration from TOML
//! 2. Load the autocorrection dictionary
//! 3. Build the session and hand it to the session actor
//! 4. Install the global keyboard hook and feed it into the actor
//!
//! Pressing Escape ends the session.

mod cli;

use clap::Parser;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{reload, EnvFilter};

use cyrtype_core::config::CyrtypeConfig;
use cyrtype_core::types::Disposition;
use cyrtype_engine::{
    actor, Dictionary, EventSource, InjectionGuard, KeyEventRouter, KeyHook, Session, TextInjector,
};

use cli::CliArgs;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Tracing. RUST_LOG wins; otherwise the level is settled once the
    // config file has been read.
    let env_filter = EnvFilter::try_from_default_env().ok();
    let from_env = env_filter.is_some();
    let initial = env_filter.unwrap_or_else(|| {
        EnvFilter::new(args.log_level.as_deref().unwrap_or("info"))
    });
    let (filter, filter_handle) = reload::Layer::new(initial);
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting cyrtype v{}", env!("CARGO_PKG_VERSION"));

    // Config.
    let config_file = args.resolve_config_path();
    let config = CyrtypeConfig::load_or_default(&config_file);

    if !from_env {
        let level = args.resolve_log_level(&config.general.log_level);
        if let Err(e) = filter_handle.reload(EnvFilter::new(&level)) {
            tracing::warn!(error = %e, level = %level, "Failed to apply configured log level");
        }
    }

    if args.write_config {
        config.save(&config_file)?;
        return Ok(());
    }

    // Dictionary.
    let dictionary_path = args.resolve_dictionary_path(&config.dictionary.path);
    let dictionary = match Dictionary::load(&dictionary_path) {
        Ok(d) => d,
        Err(e) => {
            tracing::error!(
                path = %dictionary_path.display(),
                error = %e,
                "Cannot start without a dictionary"
            );
            return Err(e.into());
        }
    };

    // Session, owned by the actor task from here on.
    let session = Session::from_config(&config, dictionary)?;
    let guard = InjectionGuard::new();
    let router = KeyEventRouter::new(session, TextInjector::with_guard(guard.clone()));
    let (handle, session_task) = actor::spawn(router);

    tracing::info!("cyrtype is running. Type in Latin letters; press ESC to exit.");

    // The hook blocks its thread for the lifetime of the session.
    let hook_result = tokio::task::spawn_blocking(move || {
        let mut hook = KeyHook::new(guard);
        hook.run(Box::new(move |event| {
            handle
                .blocking_dispatch(event.clone())
                .unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "Session unavailable, passing key through");
                    Disposition::Pass
                })
        }))
    })
    .await?;

    if let Err(ref e) = hook_result {
        tracing::error!(error = %e, "Keyboard hook failed");
    }

    let stats = session_task.await?;
    tracing::info!(
        words = stats.words_finalized,
        corrected = stats.words_corrected,
        "cyrtype stopped"
    );

    hook_result?;
    Ok(())
}
