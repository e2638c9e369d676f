//! Export CSV de la vue filtrée (sans la géométrie), régénéré à chaque demande

use anyhow::{Context, Result};
use parcelles::Parcelle;

/// Nom du fichier proposé au téléchargement
pub const NOM_EXPORT: &str = "parcelles_filtrees.csv";

pub fn export_csv(vue: &[&Parcelle], colonnes: &[String]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(colonnes)
        .context("Failed to write CSV header")?;

    for parcelle in vue {
        writer
            .write_record(colonnes.iter().map(|c| parcelle.valeur(c)))
            .context("Failed to write CSV row")?;
    }

    writer
        .into_inner()
        .map_err(|e| e.into_error())
        .context("Failed to flush CSV export")
}

#[cfg(test)]
mod tests {
    use super::*;
    use parcelles::{geometrie_demo, Proprietes, COLONNES};

    fn colonnes() -> Vec<String> {
        COLONNES.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_export_rows() {
        let parcelle = Parcelle {
            culture: "pomme de terre, variété locale".into(),
            region: "Mamou".into(),
            superficie: 0.8,
            rendement_kg_ha: 14500.0,
            geometry: geometrie_demo(),
            extras: Proprietes::new(),
            membres: Proprietes::new(),
        };
        let csv = String::from_utf8(export_csv(&[&parcelle], &colonnes()).unwrap()).unwrap();
        assert_eq!(
            csv,
            "culture,region,superficie,rendement_kg_ha\n\"pomme de terre, variété locale\",Mamou,0.8,14500\n"
        );
    }

    #[test]
    fn test_export_empty_view() {
        let csv = String::from_utf8(export_csv(&[], &colonnes()).unwrap()).unwrap();
        assert_eq!(csv, "culture,region,superficie,rendement_kg_ha\n");
    }
}
