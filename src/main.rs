mod bootstrap;
mod cli;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Commands, ConfigCommand};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Run);

    // 配置子命令只输出到终端，不需要日志系统
    if let Commands::Config { action } = command {
        return run_config_command(action).await;
    }

    bootstrap::tracing::init_tracing_subscriber()?;
    let runtime = bootstrap::wiring::build_runtime().await?;

    match command {
        Commands::Run => bootstrap::daemon::run_daemon(runtime).await,
        Commands::Once { delay_ms } => bootstrap::daemon::run_single(runtime, delay_ms).await,
        Commands::Config { .. } => Ok(()),
    }
}

async fn run_config_command(action: ConfigCommand) -> Result<()> {
    use hp_core::ports::SettingsPort;

    let paths = bootstrap::wiring::resolve_paths()?;
    let repo = hp_infra::settings::FileSettingsRepository::new(&paths.settings_path);

    match action {
        ConfigCommand::Path => println!("{}", paths.settings_path.display()),
        ConfigCommand::Show => {
            let settings = repo.load().await?;
            print!("{}", settings.to_toml()?);
        }
        ConfigCommand::Init => {
            if repo.init_default_if_missing().await? {
                println!("created {}", paths.settings_path.display());
            } else {
                println!("already exists: {}", paths.settings_path.display());
            }
        }
    }
    Ok(())
}
