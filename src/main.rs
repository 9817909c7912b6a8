use janatonese_server::cli::CliArgs;
use janatonese_server::server::{self, AppState, ReadyGate};
use janatonese_server::util::logging::parse_level;
use janatonese_server::{init_logging, LoggingConfig, Orchestrator, ServerConfig, VERSION};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{debug, error};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    let config = load_config(&args);

    init_logging(LoggingConfig {
        level: parse_level(&config.log_level),
        use_json: config.log_json,
        ..Default::default()
    });

    debug!("janatonese-server v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match run(config).await {
        Ok(()) => 0,
        Err(e) => {
            error!("{:#}", e);
            1
        }
    };

    std::process::exit(exit_code);
}

fn load_config(args: &CliArgs) -> ServerConfig {
    let mut config = ServerConfig::from_env();
    if let Some(root) = &args.frontend_root {
        config.frontend_root = root.clone();
    }
    if let Some(level) = args.level_override() {
        config.log_level = level.to_lowercase();
    }
    if args.log_json {
        config.log_json = true;
    }
    config
}

async fn run(config: ServerConfig) -> Result<()> {
    config.validate()?;
    debug!("{}", config);

    let orchestrator =
        Orchestrator::from_config(&config).context("Failed to prepare placeholder page")?;
    let gate = config.wait_for_content.then(|| ReadyGate {
        ready: orchestrator.content_ready(),
        timeout: config.ready_timeout,
    });

    // The listener does not wait for this task.
    let orchestration = tokio::spawn(async move { orchestrator.run().await });

    let listener = server::bind(config.bind_addr()).await?;
    let router = server::build_router(AppState::from_config(&config).with_gate(gate));
    let mut serving = tokio::spawn(server::serve(
        listener,
        router,
        server::shutdown_signal(),
    ));

    tokio::select! {
        served = &mut serving => {
            served.context("Server task panicked")??;
            return Ok(());
        }
        report = orchestration => {
            let report = report.context("Orchestration task panicked")?;
            if let Some(report) = report {
                if config.strict_fs && report.fallback_failed() {
                    bail!(
                        "Placeholder page could not be written to {} (JANATONESE_STRICT_FS is set)",
                        config.output_dir().display()
                    );
                }
            }
        }
    }

    serving.await.context("Server task panicked")??;
    Ok(())
}
