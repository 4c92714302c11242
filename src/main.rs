use clap::Parser;
use fortress::cli::commands::edit::EditArgs;
use fortress::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    // Diagnostics go to stderr, quiet unless FORTRESS_LOG asks for more.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("FORTRESS_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => fortress::cli::commands::init::execute(&cli),
        Commands::Add {
            ref service,
            ref login,
            ref comment,
            generate,
        } => fortress::cli::commands::add::execute(&cli, service, login, comment, generate),
        Commands::Edit {
            ref service,
            ref rename,
            ref login,
            ref comment,
            new_password,
            generate,
        } => {
            let args = EditArgs {
                rename: rename.as_deref(),
                login: login.as_deref(),
                comment: comment.as_deref(),
                new_password,
                generate,
            };
            fortress::cli::commands::edit::execute(&cli, service, &args)
        }
        Commands::Get { ref service, copy } => {
            fortress::cli::commands::get::execute(&cli, service, copy)
        }
        Commands::List { ref search, json } => {
            fortress::cli::commands::list::execute(&cli, search.as_deref(), json)
        }
        Commands::Delete { ref service, force } => {
            fortress::cli::commands::delete::execute(&cli, service, force)
        }
        Commands::Exists { ref service } => fortress::cli::commands::exists::execute(&cli, service),
        Commands::Generate { length } => fortress::cli::commands::generate::execute(&cli, length),
        Commands::Completions { shell } => fortress::cli::commands::completions::execute(shell),
    };

    if let Err(e) = result {
        fortress::cli::output::error(e);
        std::process::exit(1);
    }
}
