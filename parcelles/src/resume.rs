//! Statistiques sur une vue filtrée

use std::collections::BTreeMap;

use crate::types::Parcelle;

/// Rendement moyen d'une culture
#[derive(Debug, Clone, PartialEq)]
pub struct RendementMoyen {
    pub culture: String,
    /// Moyenne arithmétique de `rendement_kg_ha`
    pub rendement_kg_ha: f64,
    /// Nombre de parcelles du groupe
    pub parcelles: usize,
}

/// Indicateurs généraux d'une vue
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resume {
    pub nombre: usize,
    /// Superficie totale (ha), arrondie à 2 décimales
    pub superficie_totale: f64,
}

impl Resume {
    pub fn calculer(vue: &[&Parcelle]) -> Self {
        Self {
            nombre: nombre(vue),
            superficie_totale: superficie_totale(vue),
        }
    }
}

pub fn nombre(vue: &[&Parcelle]) -> usize {
    vue.len()
}

/// Somme des superficies arrondie à 2 décimales (0.00 sur une vue vide)
pub fn superficie_totale(vue: &[&Parcelle]) -> f64 {
    // `Sum` pour f64 part de -0.0
    arrondir(vue.iter().fold(0.0, |total, p| total + p.superficie), 2)
}

/// Rendement moyen par culture, groupes triés par nom de culture.
///
/// `None` signale l'absence de données (vue vide).
pub fn rendement_moyen_par_culture(vue: &[&Parcelle]) -> Option<Vec<RendementMoyen>> {
    if vue.is_empty() {
        return None;
    }

    let mut groupes: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for parcelle in vue {
        let entry = groupes.entry(parcelle.culture.as_str()).or_insert((0.0, 0));
        entry.0 += parcelle.rendement_kg_ha;
        entry.1 += 1;
    }

    Some(
        groupes
            .into_iter()
            .map(|(culture, (somme, n))| RendementMoyen {
                culture: culture.to_string(),
                rendement_kg_ha: somme / n as f64,
                parcelles: n,
            })
            .collect(),
    )
}

fn arrondir(value: f64, decimales: i32) -> f64 {
    let facteur = 10f64.powi(decimales);
    (value * facteur).round() / facteur
}
