//! Définition et implémentation des commandes CLI
//!
//! - `serve` (défaut): serveur HTTP du tableau de bord
//! - `export`: CSV d'une vue filtrée, sans serveur

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use parcelles::{filtrer, ParcelStore, Resume, Selection};
use tokio::net::TcpListener;
use tracing::{debug, info};

use crate::config::DashboardConfig;
use crate::rendu::export::export_csv;
use crate::serveur::{create_router, AppState};

#[derive(Subcommand)]
pub enum Commands {
    /// Start the dashboard web server
    Serve(ServeArgs),

    /// Export the filtered parcels to CSV (no server)
    Export {
        /// Path to the parcels GeoJSON file
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Output CSV file
        #[arg(short, long)]
        output: PathBuf,

        /// Region to keep (repeatable, default: all regions)
        #[arg(long)]
        region: Vec<String>,

        /// Crop to keep (repeatable, default: all crops)
        #[arg(long)]
        culture: Vec<String>,
    },
}

/// Options du serveur (commande par défaut)
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Path to the parcels GeoJSON file (défaut : env DASHBOARD_DATA)
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Bind address IP:PORT (défaut : env DASHBOARD_BIND / 127.0.0.1:8501)
    #[arg(long)]
    pub bind: Option<String>,

    /// Logo shown in the sidebar (défaut : env DASHBOARD_LOGO)
    #[arg(long)]
    pub logo: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Construit la configuration: fichier, puis environnement, puis options
pub fn resolve_config(args: &ServeArgs) -> Result<DashboardConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let mut config = DashboardConfig::load(path)?;
            config.apply_env();
            config
        }
        None => DashboardConfig::from_env(),
    };
    config.apply_overrides(args.data.clone(), args.bind.clone(), args.logo.clone());
    Ok(config)
}

/// Exécute la commande serve
pub async fn cmd_serve(args: ServeArgs) -> Result<()> {
    let config = resolve_config(&args)?;
    debug!(config = ?config, "Configuration");

    // Données indisponibles = erreur fatale, avant même d'écouter
    let store = ParcelStore::load(&config.data_path).context(format!(
        "Failed to load parcels from {}",
        config.data_path.display()
    ))?;
    info!(
        path = %config.data_path.display(),
        parcelles = store.len(),
        "Données vérifiées"
    );
    if !config.logo_path.exists() {
        tracing::warn!(path = %config.logo_path.display(), "Logo introuvable");
    }

    let bind_address = config.bind_address.clone();
    let app = create_router(AppState::new(config));

    let listener = TcpListener::bind(&bind_address)
        .await
        .context(format!("Failed to bind {}", bind_address))?;
    info!("Dashboard disponible sur http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Arrêt du serveur");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
    }
}

/// Exécute la commande export et renvoie le résumé affiché
pub fn cmd_export(
    data: Option<PathBuf>,
    output: &Path,
    regions: Vec<String>,
    cultures: Vec<String>,
) -> Result<Resume> {
    let data = data.unwrap_or_else(|| DashboardConfig::from_env().data_path);
    let store = ParcelStore::load(&data)
        .context(format!("Failed to load parcels from {}", data.display()))?;

    let selection = selection_cli(&store, regions, cultures);
    let vue = filtrer(store.parcelles(), &selection);
    let colonnes = store.collection().colonnes();

    let csv = export_csv(&vue, &colonnes)?;
    std::fs::write(output, csv)
        .context(format!("Failed to write {}", output.display()))?;

    let resume = Resume::calculer(&vue);
    println!("=== Export CSV ===");
    println!("Source: {}", data.display());
    println!("Output: {}", output.display());
    println!("Parcelles: {}", resume.nombre);
    println!("Superficie totale: {:.2} ha", resume.superficie_totale);

    Ok(resume)
}

/// Option absente = toutes les valeurs courantes de la dimension
fn selection_cli(store: &ParcelStore, regions: Vec<String>, cultures: Vec<String>) -> Selection {
    let toutes = Selection::toutes(store.collection());
    Selection {
        regions: if regions.is_empty() {
            toutes.regions
        } else {
            regions.into_iter().collect()
        },
        cultures: if cultures.is_empty() {
            toutes.cultures
        } else {
            cultures.into_iter().collect()
        },
    }
}
