//! Sessions: une copie indépendante de la collection par visiteur
//!
//! Chaque session charge le fichier à sa création et garde sa propre
//! sélection de filtres. Les sessions inactives sont abandonnées après
//! `session_ttl`. Aucune coordination entre sessions: la dernière à écrire
//! écrase le fichier.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use moka::sync::Cache;
use parcelles::{filtrer, Parcelle, ParcelStore, ParcelleError, Saisie, Selection};
use tracing::{debug, info};
use uuid::Uuid;

/// État d'une session
#[derive(Debug)]
pub struct Session {
    id: String,
    store: ParcelStore,
    /// `None` tant que le visiteur n'a pas soumis le filtre: toutes les valeurs courantes
    selection: Option<Selection>,
}

impl Session {
    /// Ouvre une session en chargeant le fichier (erreur fatale si indisponible)
    pub fn ouvrir(id: String, data_path: &Path) -> Result<Self, ParcelleError> {
        let store = ParcelStore::load(data_path)?;
        Ok(Self {
            id,
            store,
            selection: None,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn store(&self) -> &ParcelStore {
        &self.store
    }

    /// Sélection effective, recalculée sur les données courantes par défaut
    pub fn selection(&self) -> Selection {
        self.selection
            .clone()
            .unwrap_or_else(|| Selection::toutes(self.store.collection()))
    }

    pub fn choisir(&mut self, selection: Selection) {
        debug!(
            session = %self.id,
            regions = selection.regions.len(),
            cultures = selection.cultures.len(),
            "Filtre modifié"
        );
        self.selection = Some(selection);
    }

    /// Vue filtrée courante
    pub fn vue(&self) -> Vec<&Parcelle> {
        let selection = self.selection();
        filtrer(self.store.parcelles(), &selection)
    }

    /// Ajoute la parcelle saisie et réécrit le fichier
    pub fn ajouter(&mut self, saisie: &Saisie) -> Result<(), ParcelleError> {
        let parcelle = saisie.en_parcelle()?;
        self.store.append(parcelle)?;
        info!(
            session = %self.id,
            culture = %saisie.culture,
            region = %saisie.region,
            superficie = saisie.superficie,
            rendement_kg_ha = saisie.rendement_kg_ha,
            parcelles = self.store.len(),
            "Parcelle ajoutée"
        );
        Ok(())
    }
}

/// Session partagée entre les requêtes d'un même visiteur
pub type SessionHandle = Arc<Mutex<Session>>;

/// Verrouille une session; un verrou empoisonné ne bloque pas le visiteur
pub fn verrouiller(handle: &SessionHandle) -> MutexGuard<'_, Session> {
    handle.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Registre des sessions actives
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Cache<String, SessionHandle>,
    data_path: PathBuf,
}

impl SessionRegistry {
    pub fn new(data_path: impl Into<PathBuf>, ttl: Duration, max_sessions: u64) -> Self {
        Self {
            sessions: Cache::builder()
                .max_capacity(max_sessions)
                .time_to_idle(ttl)
                .build(),
            data_path: data_path.into(),
        }
    }

    pub fn get(&self, id: &str) -> Option<SessionHandle> {
        self.sessions.get(id)
    }

    /// Crée une nouvelle session; elle n'est enregistrée que si le chargement réussit
    pub fn ouvrir(&self) -> Result<SessionHandle, ParcelleError> {
        let id = Uuid::new_v4().to_string();
        let session = Session::ouvrir(id.clone(), &self.data_path)?;
        let handle = Arc::new(Mutex::new(session));
        self.sessions.insert(id.clone(), handle.clone());
        info!(session = %id, "Nouvelle session");
        Ok(handle)
    }

    /// Retrouve la session du cookie ou en ouvre une nouvelle.
    ///
    /// Le booléen indique une session nouvellement créée (cookie à poser).
    pub fn obtenir(&self, id: Option<&str>) -> Result<(SessionHandle, bool), ParcelleError> {
        if let Some(handle) = id.and_then(|id| self.get(id)) {
            return Ok((handle, false));
        }
        Ok((self.ouvrir()?, true))
    }
}
