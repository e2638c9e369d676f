//! Carte Leaflet des parcelles filtrées
//!
//! Centre et zoom fixes: la carte n'est jamais recadrée sur les données.

use parcelles::store::write_collection;
use parcelles::{Parcelle, ParcelleError, Proprietes};

use super::escape_html;
use crate::config::CarteConfig;

/// Feuilles de style et script Leaflet à inclure dans `<head>`
pub const LEAFLET_HEAD: &str = r#"<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>"#;

/// FeatureCollection des parcelles de la vue, prêt à être inclus dans un `<script>`
pub fn geojson_vue(vue: &[&Parcelle], membres: &Proprietes) -> Result<String, ParcelleError> {
    let mut buffer = Vec::new();
    write_collection(&mut buffer, membres, vue.iter().copied())?;
    Ok(String::from_utf8_lossy(&buffer).replace("</", "<\\/"))
}

pub fn carte_html(
    vue: &[&Parcelle],
    membres: &Proprietes,
    config: &CarteConfig,
) -> Result<String, ParcelleError> {
    let data = geojson_vue(vue, membres)?;
    let layer_name = serde_json::to_string(&config.layer_name)?;

    Ok(format!(
        r##"<div id="carte" style="height: {height}px;" data-layer="{layer_attr}"></div>
<script>
(function () {{
  const parcelles = {data};
  const carte = L.map("carte").setView([{lat}, {lon}], {zoom});
  L.tileLayer("https://{{s}}.tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png", {{
    maxZoom: 19,
    attribution: "&copy; OpenStreetMap"
  }}).addTo(carte);
  const echapper = (v) => String(v).replace(/[&<>"']/g, (c) => "&#" + c.charCodeAt(0) + ";");
  const couche = L.geoJSON(parcelles, {{
    style: {{ color: "#2e7d32", weight: 1, fillOpacity: 0.4 }},
    onEachFeature: (feature, layer) => {{
      const lignes = Object.entries(feature.properties || {{}})
        .map(([k, v]) => "<b>" + echapper(k) + "</b>: " + echapper(v));
      layer.bindPopup(lignes.join("<br>"));
    }}
  }}).addTo(carte);
  L.control.layers(null, {{ [{layer_name}]: couche }}).addTo(carte);
}})();
</script>"##,
        height = config.height_px,
        layer_attr = escape_html(&config.layer_name),
        data = data,
        lat = config.center_lat,
        lon = config.center_lon,
        zoom = config.zoom,
        layer_name = layer_name,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use parcelles::geometrie_demo;

    fn parcelle(culture: &str) -> Parcelle {
        Parcelle {
            culture: culture.into(),
            region: "Kindia".into(),
            superficie: 1.0,
            rendement_kg_ha: 100.0,
            geometry: geometrie_demo(),
            extras: Proprietes::new(),
            membres: Proprietes::new(),
        }
    }

    #[test]
    fn test_static_viewport() {
        let html = carte_html(&[&parcelle("riz")], &Proprietes::new(), &CarteConfig::default())
            .unwrap();
        assert!(html.contains("setView([9.5, -13.7], 7)"));
        assert!(html.contains("height: 500px"));
        assert!(!html.contains("fitBounds"));
        assert!(html.contains(r#"["Parcelles filtrées"]: couche"#));
        assert!(html.contains(r#""culture":"riz""#));
    }

    #[test]
    fn test_geojson_vue_is_script_safe() {
        let data = geojson_vue(&[&parcelle("</script><b>")], &Proprietes::new()).unwrap();
        assert!(!data.contains("</script>"));
        assert!(data.contains(r#"<\/script>"#));
    }

    #[test]
    fn test_empty_view_is_empty_collection() {
        let data = geojson_vue(&[], &Proprietes::new()).unwrap();
        assert_eq!(data, r#"{"type":"FeatureCollection","features":[]}"#);
    }
}
