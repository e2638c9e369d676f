//! # dashboard-agricole
//!
//! Tableau de bord SIG des parcelles agricoles (Kindia, Mamou).
//!
//! ## Features
//!
//! - Carte Leaflet, statistiques, histogramme et table des parcelles filtrées
//! - Filtres région / culture calculés sur les données courantes
//! - Formulaire d'ajout (géométrie de démonstration) avec réécriture du GeoJSON
//! - Export CSV de la vue filtrée
//! - Une session indépendante par visiteur
//!
//! ## Usage CLI
//!
//! ```bash
//! # Serveur (défaut)
//! dashboard-agricole --data data/parcelles_multiculture.geojson --bind 127.0.0.1:8501
//!
//! # Export CSV sans serveur
//! dashboard-agricole export --data data/parcelles_multiculture.geojson \
//!     --output parcelles_filtrees.csv --region Kindia
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod rendu;
pub mod serveur;
pub mod session;

pub use config::DashboardConfig;
pub use error::ErreurServeur;
pub use serveur::{create_router, AppState};
pub use session::{Session, SessionRegistry};
