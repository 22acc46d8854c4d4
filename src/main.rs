// src/main.rs — pension-chat entry point

use clap::Parser;

use pension_chat::cli::{commands, Cli, Clients, Commands};
use pension_chat::infra::config::Config;
use pension_chat::infra::logger;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging (respects RUST_LOG)
    logger::init_for_cli(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Load config (falls back to defaults if no config.toml)
    let mut config = if let Some(ref path) = cli.config {
        let mut c = Config::load_from(std::path::Path::new(path))?;
        c.apply_env_overrides();
        c
    } else {
        Config::load()?
    };
    if let Some(url) = cli.base_url {
        config.backend.base_url = url;
    }

    let clients = Clients::from_config(&config)?;
    tracing::debug!("Backend {} | state {}", clients.base_url, clients.state_file.display());

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => pension_chat::cli::chat::run_chat(&clients).await,
        Commands::History => commands::run_history(&clients).await,
        Commands::Send { text } => commands::run_send(&clients, &text.join(" ")).await,
        Commands::Approve { email, password } => {
            commands::run_confirmation(&clients, true, email.as_deref(), password.as_deref())
                .await
        }
        Commands::Reject => commands::run_confirmation(&clients, false, None, None).await,
        Commands::Abort => commands::run_abort(&clients).await,
        Commands::Conversations { all } => commands::run_conversations(&clients, all).await,
        Commands::New => commands::run_new(&clients).await,
        Commands::Switch { id } => commands::run_switch(&clients, &id),
        Commands::Status => commands::run_status(&clients),
        Commands::Reset => commands::run_reset(&clients),
    }
}
