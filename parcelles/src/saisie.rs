//! Saisie d'une nouvelle parcelle (formulaire de démonstration)

use geo::{Geometry, LineString, Polygon};
use serde::Deserialize;

use crate::types::{texte_superficie, Parcelle, Proprietes};
use crate::ParcelleError;

/// Polygone fixe attribué à toute parcelle saisie (lon, lat)
pub const GEOMETRIE_DEMO: [(f64, f64); 5] = [
    (-13.7, 9.5),
    (-13.6, 9.5),
    (-13.6, 9.6),
    (-13.7, 9.6),
    (-13.7, 9.5),
];

/// Superficie minimale acceptée par le formulaire (ha)
pub const SUPERFICIE_MIN: f64 = 0.1;

/// Pas de saisie de la superficie (ha)
pub const SUPERFICIE_PAS: f64 = 0.1;

/// Valeurs du formulaire d'ajout
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Saisie {
    #[serde(default)]
    pub culture: String,
    #[serde(default)]
    pub region: String,
    pub superficie: f64,
    pub rendement_kg_ha: u32,
}

impl Saisie {
    /// Vérifie les minimums numériques; les champs texte vides sont acceptés
    pub fn valider(&self) -> Result<(), ParcelleError> {
        if !self.superficie.is_finite() || self.superficie < SUPERFICIE_MIN {
            return Err(ParcelleError::invalid_input(
                "superficie",
                format!("must be >= {SUPERFICIE_MIN}, got {}", self.superficie),
            ));
        }
        Ok(())
    }

    /// Construit la parcelle avec le polygone de démonstration
    pub fn en_parcelle(&self) -> Result<Parcelle, ParcelleError> {
        self.valider()?;
        Ok(Parcelle {
            culture: self.culture.clone(),
            region: self.region.clone(),
            superficie: self.superficie,
            rendement_kg_ha: f64::from(self.rendement_kg_ha),
            geometry: geometrie_demo(),
            extras: Proprietes::new(),
            membres: Proprietes::new(),
        })
    }

    /// Message de confirmation reprenant les valeurs saisies
    pub fn message_succes(&self) -> String {
        format!(
            "✅ Parcelle ajoutée : {} à {}, {} ha, {} kg/ha",
            self.culture,
            self.region,
            texte_superficie(self.superficie),
            self.rendement_kg_ha
        )
    }
}

pub fn geometrie_demo() -> Geometry {
    Geometry::Polygon(Polygon::new(
        LineString::from(GEOMETRIE_DEMO.to_vec()),
        vec![],
    ))
}
