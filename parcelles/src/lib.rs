//! # parcelles
//!
//! Collection de parcelles agricoles (culture, région, superficie, rendement)
//! stockée dans un fichier GeoJSON.
//!
//! ## Features
//!
//! - Chargement complet du fichier, une fois par session
//! - Filtrage région ET culture, valeurs distinctes calculées sur les données
//! - Statistiques: nombre, superficie totale, rendement moyen par culture
//! - Ajout d'une parcelle saisie puis réécriture intégrale du fichier
//! - Types `geo` pour l'interopérabilité avec l'écosystème Rust géospatial
//!
//! ## Usage
//!
//! ```rust,ignore
//! use parcelles::{filtrer, ParcelStore, Resume, Selection};
//!
//! let store = ParcelStore::load("data/parcelles_multiculture.geojson")?;
//! let selection = Selection::toutes(store.collection());
//! let vue = filtrer(store.parcelles(), &selection);
//! println!("{} parcelles", Resume::calculer(&vue).nombre);
//! ```

pub mod error;
pub mod filtre;
pub mod resume;
pub mod saisie;
pub mod store;
pub mod types;

pub use error::ParcelleError;
pub use filtre::{cultures_distinctes, filtrer, regions_distinctes, Selection};
pub use resume::{rendement_moyen_par_culture, RendementMoyen, Resume};
pub use saisie::{geometrie_demo, Saisie};
pub use store::ParcelStore;
pub use types::{Collection, Parcelle, Proprietes, COLONNES};
