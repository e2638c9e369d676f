//! Histogramme du rendement moyen par culture (SVG généré côté serveur)

use anyhow::Result;
use parcelles::RendementMoyen;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::escape_html;

/// Message affiché à la place du graphique quand la vue est vide
pub const AVERTISSEMENT_VIDE: &str = "Aucune donnée à afficher. Vérifiez les filtres.";

const TITRE: &str = "Rendement moyen (kg/ha)";
const LARGEUR: u32 = 900;
const HAUTEUR: u32 = 420;
const BARRE: RGBColor = RGBColor(99, 110, 250);

/// Section graphique: SVG si des données existent, avertissement sinon
pub fn section_graphique(moyennes: Option<&[RendementMoyen]>) -> Result<String> {
    match moyennes {
        Some(moyennes) if !moyennes.is_empty() => graphique_svg(moyennes),
        _ => Ok(format!(
            r#"<div class="avertissement">⚠️ {}</div>"#,
            escape_html(AVERTISSEMENT_VIDE)
        )),
    }
}

/// Barres verticales avec la valeur affichée au-dessus de chaque barre
pub fn graphique_svg(moyennes: &[RendementMoyen]) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (LARGEUR, HAUTEUR)).into_drawing_area();
        root.fill(&WHITE)?;

        let n = moyennes.len() as u32;
        let y_max = moyennes
            .iter()
            .map(|m| m.rendement_kg_ha)
            .fold(0.0, f64::max)
            .max(1.0)
            * 1.15;

        let mut chart = ChartBuilder::on(&root)
            .caption(TITRE, ("sans-serif", 22.0))
            .margin(12)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d((0u32..n).into_segmented(), 0f64..y_max)?;

        let etiquette = |v: &SegmentValue<u32>| match v {
            SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => moyennes
                .get(*i as usize)
                .map(|m| m.culture.clone())
                .unwrap_or_default(),
            SegmentValue::Last => String::new(),
        };

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("culture")
            .y_desc("rendement_kg_ha")
            .x_label_formatter(&etiquette)
            .draw()?;

        chart.draw_series(
            Histogram::vertical(&chart)
                .style(BARRE.filled())
                .margin(16)
                .data(
                    moyennes
                        .iter()
                        .enumerate()
                        .map(|(i, m)| (i as u32, m.rendement_kg_ha)),
                ),
        )?;

        let style = TextStyle::from(("sans-serif", 14.0).into_font())
            .pos(Pos::new(HPos::Center, VPos::Bottom));
        chart.draw_series(moyennes.iter().enumerate().map(|(i, m)| {
            Text::new(
                format_valeur(m.rendement_kg_ha),
                (SegmentValue::CenterOf(i as u32), m.rendement_kg_ha),
                style.clone(),
            )
        }))?;

        root.present()?;
    }
    Ok(svg)
}

/// Étiquette de barre: entier si possible, sinon une décimale
fn format_valeur(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moyenne(culture: &str, rendement: f64) -> RendementMoyen {
        RendementMoyen {
            culture: culture.into(),
            rendement_kg_ha: rendement,
            parcelles: 1,
        }
    }

    #[test]
    fn test_warning_when_no_data() {
        let html = section_graphique(None).unwrap();
        assert!(html.contains(AVERTISSEMENT_VIDE));
        assert!(!html.contains("<svg"));
    }

    #[test]
    fn test_svg_with_labels() {
        let moyennes = vec![moyenne("maïs", 1000.0), moyenne("riz", 2250.5)];
        let html = section_graphique(Some(&moyennes)).unwrap();

        assert!(html.contains("<svg"));
        assert!(html.contains(TITRE));
        assert!(html.contains("2250.5"));
        assert!(html.contains("maïs"));
    }

    #[test]
    fn test_format_valeur() {
        assert_eq!(format_valeur(800.0), "800");
        assert_eq!(format_valeur(1333.3333), "1333.3");
    }
}
