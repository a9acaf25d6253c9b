use anyhow::Context;
use tollgate::cli::commands::{
    config_command, generate_secret_command, hash_password_command, issue_token_command, serve,
};
use tollgate::cli::output::Output;
use tollgate::cli::{Cli, Commands};
use tollgate::utils::toml_config::{LogFormat, ServerConfig};
use tollgate::TollgateConfig;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before anything reads the environment
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let output = Output::from_flag(cli.no_color);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let config = TollgateConfig::load_unchecked(&cli.config)
                .with_context(|| format!("Failed to load {}", cli.config.display()))?;
            init_tracing(&config.server, cli.verbose);
            serve(config, &output).await
        }
        Commands::HashPassword {
            password,
            memory_kib,
            iterations,
            parallelism,
        } => hash_password_command(
            &cli.config,
            &password,
            memory_kib,
            iterations,
            parallelism,
            cli.verbose,
            &output,
        ),
        Commands::GenerateSecret { bytes } => {
            let config = TollgateConfig::load_unchecked(&cli.config).unwrap_or_default();
            generate_secret_command(bytes, &config, cli.verbose, &output);
            Ok(())
        }
        Commands::IssueToken {
            subject,
            authorities,
        } => issue_token_command(&cli.config, &subject, &authorities, cli.verbose, &output),
        Commands::Config { validate } => config_command(&cli.config, validate, &output),
    }
}

/// `RUST_LOG` wins over `server.log_level`; `--verbose` raises the default to debug.
fn init_tracing(server: &ServerConfig, verbose: bool) {
    let default_level = if verbose {
        "debug"
    } else {
        server.log_level.as_str()
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(filter);
    match server.log_format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(fmt::layer()).init(),
    }
}
