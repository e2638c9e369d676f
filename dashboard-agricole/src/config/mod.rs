//! Configuration du tableau de bord
//!
//! Ordre de priorité: valeurs par défaut < fichier JSON (`--config`) <
//! variables d'environnement (`.env` inclus) < options de la ligne de commande.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Configuration principale
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Fichier GeoJSON des parcelles (lu par chaque session, réécrit à chaque ajout)
    pub data_path: PathBuf,

    /// Logo affiché dans la barre latérale
    pub logo_path: PathBuf,

    /// Adresse d'écoute HTTP (IP:PORT)
    pub bind_address: String,

    /// Durée d'inactivité avant abandon d'une session (secondes)
    pub session_ttl_secs: u64,

    /// Nombre maximal de sessions gardées en mémoire
    pub max_sessions: u64,

    /// Vue initiale de la carte
    pub carte: CarteConfig,
}

/// Vue fixe de la carte (pas de recentrage sur les données filtrées)
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CarteConfig {
    pub center_lat: f64,
    pub center_lon: f64,
    pub zoom: u8,
    pub height_px: u32,
    pub layer_name: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/parcelles_multiculture.geojson"),
            logo_path: PathBuf::from("images/logo.svg"),
            bind_address: "127.0.0.1:8501".into(),
            session_ttl_secs: 30 * 60,
            max_sessions: 256,
            carte: CarteConfig::default(),
        }
    }
}

impl Default for CarteConfig {
    fn default() -> Self {
        Self {
            center_lat: 9.5,
            center_lon: -13.7,
            zoom: 7,
            height_px: 500,
            layer_name: "Parcelles filtrées".into(),
        }
    }
}

impl DashboardConfig {
    /// Charge une configuration depuis un fichier JSON (champs absents = défauts)
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Défauts surchargés par l'environnement
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Applique DASHBOARD_DATA, DASHBOARD_LOGO, DASHBOARD_BIND, DASHBOARD_SESSION_TTL
    pub fn apply_env(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok());
    }

    fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(data) = var("DASHBOARD_DATA") {
            self.data_path = data.into();
        }
        if let Some(logo) = var("DASHBOARD_LOGO") {
            self.logo_path = logo.into();
        }
        if let Some(bind) = var("DASHBOARD_BIND") {
            self.bind_address = bind;
        }
        if let Some(ttl) = var("DASHBOARD_SESSION_TTL").and_then(|s| s.parse().ok()) {
            self.session_ttl_secs = ttl;
        }
    }

    /// Applique les options de la ligne de commande
    pub fn apply_overrides(
        &mut self,
        data: Option<PathBuf>,
        bind: Option<String>,
        logo: Option<PathBuf>,
    ) {
        if let Some(data) = data {
            self.data_path = data;
        }
        if let Some(bind) = bind {
            self.bind_address = bind;
        }
        if let Some(logo) = logo {
            self.logo_path = logo;
        }
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}
