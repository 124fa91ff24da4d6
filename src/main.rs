use anyhow::{bail, Context};
use clap::Parser;
use heartai::cli::{Cli, Commands, PredictArgs};
use heartai::config::AppConfig;
use heartai::logging::{init_logging, init_logging_simple};
use heartai::prediction::InferencePipeline;
use std::path::Path;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    match cli.command {
        None => run_server(config, None).await,
        Some(Commands::Serve { port }) => run_server(config, port).await,
        Some(Commands::Predict(args)) => {
            init_logging_simple();
            run_predict(&config, args)
        }
        Some(Commands::Inspect) => {
            init_logging_simple();
            run_inspect(&config)
        }
    }
}

fn load_config(dir: &Path) -> anyhow::Result<AppConfig> {
    let config = AppConfig::load_from(dir)
        .with_context(|| format!("loading configuration from {}", dir.display()))?;
    if let Err(errors) = config.validate() {
        bail!("invalid configuration:\n  {}", errors.join("\n  "));
    }
    Ok(config)
}

async fn run_server(mut config: AppConfig, port: Option<u16>) -> anyhow::Result<()> {
    if let Some(port) = port {
        config.server.port = port;
    }
    let _guard = init_logging(&config.logging);
    heartai::server::serve(config).await?;
    Ok(())
}

fn run_predict(config: &AppConfig, args: PredictArgs) -> anyhow::Result<()> {
    let Some(input) = args.into_input() else {
        bail!("provide --features or all of --age, --ap-hi, --ap-lo, --cholesterol, --active");
    };
    let pipeline = InferencePipeline::load(&config.artifacts)?;
    let result = pipeline.predict(input)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn run_inspect(config: &AppConfig) -> anyhow::Result<()> {
    let pipeline = InferencePipeline::load(&config.artifacts)?;
    let schema = pipeline.schema();
    let artifacts = pipeline.artifacts();

    println!("schema:      {}", schema.id);
    println!("features:    {}", schema.names.join(", "));
    println!("scaled:      {}", schema.scaled_names().join(", "));
    println!(
        "classifier:  {} ({:?}, {} inputs)",
        config.artifacts.classifier_path().display(),
        config.artifacts.classifier_format,
        artifacts.classifier().n_features()
    );
    println!(
        "scaler:      {} ({} inputs)",
        config.artifacts.scaler_path().display(),
        artifacts.scaler().n_features()
    );
    println!(
        "threshold:   {} ({})",
        artifacts.threshold().value(),
        config.artifacts.threshold_path().display()
    );
    println!("dataset:     {}", config.dataset.path.display());
    Ok(())
}
