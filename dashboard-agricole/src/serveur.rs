//! Serveur HTTP du tableau de bord
//!
//! Chaque requête identifie sa session (cookie), applique l'action demandée
//! puis recalcule la vue de façon synchrone.

use std::sync::Arc;

use axum::extract::{Form, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{Html, IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use parcelles::{Saisie, Selection};
use serde::Serialize;
use tower_http::services::ServeFile;
use tower_http::trace::TraceLayer;

use crate::config::DashboardConfig;
use crate::error::ErreurServeur;
use crate::rendu::export::{export_csv, NOM_EXPORT};
use crate::rendu::page::rendre_page;
use crate::session::{verrouiller, SessionRegistry};

/// Nom du cookie de session
pub const COOKIE_SESSION: &str = "session";

/// État partagé par les gestionnaires
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<DashboardConfig>,
    pub sessions: SessionRegistry,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        let sessions = SessionRegistry::new(
            config.data_path.clone(),
            config.session_ttl(),
            config.max_sessions,
        );
        Self {
            config: Arc::new(config),
            sessions,
        }
    }
}

/// Réponse du contrôle de santé
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

pub fn create_router(state: AppState) -> Router {
    let logo = ServeFile::new(&state.config.logo_path);

    Router::new()
        .route("/", get(page_handler))
        .route("/parcelles", post(ajout_handler))
        .route("/export.csv", get(export_handler))
        .route("/health", get(health_handler))
        .route_service("/logo", logo)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn page_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, ErreurServeur> {
    let (session, nouvelle) = state.sessions.obtenir(cookie_session(&headers).as_deref())?;

    let (id, html) = {
        let mut session = verrouiller(&session);
        if let Some(selection) = selection_depuis_requete(&params) {
            session.choisir(selection);
        }
        (
            session.id().to_string(),
            rendre_page(&session, &state.config, None)?,
        )
    };

    Ok(avec_cookie(Html(html).into_response(), &id, nouvelle))
}

async fn ajout_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(saisie): Form<Saisie>,
) -> Result<Response, ErreurServeur> {
    let (session, nouvelle) = state.sessions.obtenir(cookie_session(&headers).as_deref())?;

    let (id, html) = {
        let mut session = verrouiller(&session);
        session.ajouter(&saisie)?;
        let message = saisie.message_succes();
        (
            session.id().to_string(),
            rendre_page(&session, &state.config, Some(&message))?,
        )
    };

    Ok(avec_cookie(Html(html).into_response(), &id, nouvelle))
}

async fn export_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ErreurServeur> {
    let (session, nouvelle) = state.sessions.obtenir(cookie_session(&headers).as_deref())?;

    let (id, csv) = {
        let session = verrouiller(&session);
        let colonnes = session.store().collection().colonnes();
        let vue = session.vue();
        (session.id().to_string(), export_csv(&vue, &colonnes)?)
    };

    let disposition = format!("attachment; filename=\"{NOM_EXPORT}\"");
    let response = (
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response();

    Ok(avec_cookie(response, &id, nouvelle))
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Sélection soumise par le formulaire de filtre (`filtre=1`), sinon `None`.
///
/// Une liste absente de la requête soumise est une sélection vide.
pub fn selection_depuis_requete(params: &[(String, String)]) -> Option<Selection> {
    if !params.iter().any(|(k, _)| k == "filtre") {
        return None;
    }
    let valeurs = |cle: &str| {
        params
            .iter()
            .filter(|(k, _)| k == cle)
            .map(|(_, v)| v.clone())
            .collect::<Vec<_>>()
    };
    Some(Selection::new(valeurs("region"), valeurs("culture")))
}

/// Identifiant de session lu dans l'en-tête `Cookie`
pub fn cookie_session(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|paire| paire.trim().split_once('='))
        .find(|(nom, _)| *nom == COOKIE_SESSION)
        .map(|(_, valeur)| valeur.to_string())
}

fn avec_cookie(mut response: Response, id: &str, nouvelle: bool) -> Response {
    if nouvelle {
        let cookie = format!("{COOKIE_SESSION}={id}; Path=/; HttpOnly; SameSite=Lax");
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(SET_COOKIE, value);
        }
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_selection_absent_without_filter_flag() {
        assert_eq!(selection_depuis_requete(&params(&[("region", "Kindia")])), None);
    }

    #[test]
    fn test_selection_repeated_keys() {
        let selection = selection_depuis_requete(&params(&[
            ("filtre", "1"),
            ("region", "Kindia"),
            ("culture", "maïs"),
            ("culture", "riz"),
        ]))
        .unwrap();
        assert_eq!(selection, Selection::new(["Kindia"], ["maïs", "riz"]));
    }

    #[test]
    fn test_selection_cleared() {
        let selection = selection_depuis_requete(&params(&[("filtre", "1")])).unwrap();
        assert!(selection.regions.is_empty());
        assert!(selection.cultures.is_empty());
    }

    #[test]
    fn test_cookie_session() {
        let mut headers = HeaderMap::new();
        assert_eq!(cookie_session(&headers), None);

        headers.insert(COOKIE, HeaderValue::from_static("theme=clair; session=abc-123"));
        assert_eq!(cookie_session(&headers), Some("abc-123".to_string()));
    }
}
