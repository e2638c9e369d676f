//! Point d'entrée CLI pour dashboard-agricole

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

use dashboard_agricole::cli::{self, Commands, ServeArgs};

// Charger .env au démarrage
fn load_env() {
    // Chercher .env dans le répertoire courant ou parent
    if dotenvy::dotenv().is_err() {
        // Essayer depuis le répertoire du binaire
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                let _ = dotenvy::from_path(dir.join(".env"));
            }
        }
    }
}

/// Tableau de bord SIG des parcelles agricoles de Kindia et Mamou
#[derive(Parser)]
#[command(name = "dashboard-agricole")]
#[command(author, version)]
#[command(about = "Tableau de bord SIG des parcelles agricoles (serveur par défaut, ou export CSV)")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Augmenter la verbosité (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Mode silencieux
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Sous-commande (défaut: serveur)
    #[command(subcommand)]
    command: Option<Commands>,

    /// Options du serveur (commande par défaut)
    #[command(flatten)]
    serve: ServeArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Charger .env avant tout
    load_env();

    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Some(Commands::Export {
            data,
            output,
            region,
            culture,
        }) => {
            info!(output = %output.display(), "Export CSV");
            cli::cmd_export(data, &output, region, culture)?;
        }
        Some(Commands::Serve(args)) => cli::cmd_serve(args).await?,
        None => cli::cmd_serve(cli.serve).await?,
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (_, 0) => Level::INFO,
        (_, 1) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .init();
}
