//! Filtrage des parcelles par région et par culture

use std::collections::{BTreeSet, HashSet};

use crate::types::{Collection, Parcelle};

/// Valeurs sélectionnées pour chaque dimension du filtre
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub regions: BTreeSet<String>,
    pub cultures: BTreeSet<String>,
}

impl Selection {
    pub fn new<R, C>(regions: R, cultures: C) -> Self
    where
        R: IntoIterator,
        R::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            regions: regions.into_iter().map(Into::into).collect(),
            cultures: cultures.into_iter().map(Into::into).collect(),
        }
    }

    /// Sélection par défaut: toutes les valeurs présentes dans les données
    pub fn toutes(collection: &Collection) -> Self {
        Self::new(
            regions_distinctes(&collection.parcelles),
            cultures_distinctes(&collection.parcelles),
        )
    }

    /// Conjonction région ET culture
    pub fn accepte(&self, parcelle: &Parcelle) -> bool {
        self.regions.contains(&parcelle.region) && self.cultures.contains(&parcelle.culture)
    }
}

/// Sous-séquence des parcelles acceptées par la sélection (ordre conservé).
///
/// Une dimension vide donne une vue vide.
pub fn filtrer<'a>(parcelles: &'a [Parcelle], selection: &Selection) -> Vec<&'a Parcelle> {
    parcelles.iter().filter(|p| selection.accepte(p)).collect()
}

/// Régions distinctes, dans l'ordre de première apparition
pub fn regions_distinctes(parcelles: &[Parcelle]) -> Vec<String> {
    distinctes(parcelles.iter().map(|p| p.region.as_str()))
}

/// Cultures distinctes, dans l'ordre de première apparition
pub fn cultures_distinctes(parcelles: &[Parcelle]) -> Vec<String> {
    distinctes(parcelles.iter().map(|p| p.culture.as_str()))
}

fn distinctes<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}
