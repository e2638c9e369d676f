//! Types d'erreurs pour le crate parcelles

use std::path::PathBuf;

use thiserror::Error;

/// Erreurs pouvant survenir lors du chargement ou de la sauvegarde des parcelles
#[derive(Debug, Error)]
pub enum ParcelleError {
    /// Fichier absent, illisible ou mal formé au chargement (fatal pour la session)
    #[error("Données indisponibles ({path}): {reason}")]
    DataUnavailable { path: PathBuf, reason: String },

    /// Erreur d'I/O lors de la réécriture du fichier
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Erreur d'encodage JSON des propriétés
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Erreur d'encodage de la géométrie
    #[error("Geometry encoding error: {0}")]
    GeometryEncoding(#[from] geozero::error::GeozeroError),

    /// Propriété obligatoire absente ou de mauvais type
    #[error("Missing or invalid property '{name}' for feature {index}")]
    MissingProperty { index: usize, name: &'static str },

    /// Géométrie absente ou non polygonale
    #[error("Invalid geometry for feature {index}: {reason}")]
    InvalidGeometry { index: usize, reason: String },

    /// Saisie refusée (minimums numériques du formulaire)
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },
}

impl ParcelleError {
    /// Crée une erreur de données indisponibles avec contexte
    pub fn data_unavailable(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::DataUnavailable {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Crée une erreur de géométrie invalide
    pub fn invalid_geometry(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            index,
            reason: reason.into(),
        }
    }

    /// Crée une erreur de saisie invalide
    pub fn invalid_input(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// Vrai si l'erreur rend la session inutilisable
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::DataUnavailable { .. })
    }
}
