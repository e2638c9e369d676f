//! Erreurs du serveur et leur traduction en réponses HTTP

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use parcelles::ParcelleError;
use thiserror::Error;
use tracing::{error, warn};

use crate::rendu::escape_html;

/// Erreur d'un gestionnaire HTTP
#[derive(Debug, Error)]
pub enum ErreurServeur {
    /// Chargement, saisie ou réécriture des parcelles
    #[error(transparent)]
    Donnees(#[from] ParcelleError),

    /// Échec de génération de la page, du graphique ou de l'export
    #[error("Rendering failed: {0:#}")]
    Rendu(anyhow::Error),
}

impl From<anyhow::Error> for ErreurServeur {
    fn from(err: anyhow::Error) -> Self {
        Self::Rendu(err)
    }
}

impl IntoResponse for ErreurServeur {
    fn into_response(self) -> Response {
        match &self {
            ErreurServeur::Donnees(err) if err.is_fatal() => {
                error!(error = %err, "Session impossible: données indisponibles");
                let body = format!(
                    "<!DOCTYPE html><html lang=\"fr\"><head><meta charset=\"utf-8\">\
                     <title>Données indisponibles</title></head><body>\
                     <h1>Données indisponibles</h1><p>{}</p></body></html>",
                    escape_html(&err.to_string())
                );
                (StatusCode::INTERNAL_SERVER_ERROR, Html(body)).into_response()
            }
            ErreurServeur::Donnees(err @ ParcelleError::InvalidInput { .. }) => {
                warn!(error = %err, "Saisie refusée");
                (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()).into_response()
            }
            other => {
                error!(error = %other, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()).into_response()
            }
        }
    }
}
