//! Types de données pour le crate parcelles

use geo::Geometry;
use serde_json::{Map, Value};

/// Propriétés JSON (ordre d'origine conservé)
pub type Proprietes = Map<String, Value>;

/// Colonnes attributaires toujours présentes, dans l'ordre d'affichage
pub const COLONNES: [&str; 4] = ["culture", "region", "superficie", "rendement_kg_ha"];

/// Une parcelle agricole avec sa géométrie et ses attributs
#[derive(Debug, Clone, PartialEq)]
pub struct Parcelle {
    /// Culture (texte libre)
    pub culture: String,

    /// Région (texte libre)
    pub region: String,

    /// Superficie en hectares
    pub superficie: f64,

    /// Rendement en kg/ha
    pub rendement_kg_ha: f64,

    /// Géométrie (Polygon ou MultiPolygon), dans le CRS de la collection
    pub geometry: Geometry,

    /// Autres propriétés du fichier, réécrites telles quelles
    pub extras: Proprietes,

    /// Autres membres de la Feature (`id`, `bbox`, membres étrangers)
    pub membres: Proprietes,
}

impl Parcelle {
    /// Propriétés GeoJSON de la parcelle (colonnes fixes puis extras)
    pub fn proprietes(&self) -> Proprietes {
        let mut props = Proprietes::new();
        props.insert("culture".into(), Value::from(self.culture.as_str()));
        props.insert("region".into(), Value::from(self.region.as_str()));
        props.insert("superficie".into(), Value::from(self.superficie));
        props.insert("rendement_kg_ha".into(), nombre_json(self.rendement_kg_ha));
        for (key, value) in &self.extras {
            props.insert(key.clone(), value.clone());
        }
        props
    }

    /// Valeur textuelle d'une colonne (table et export CSV)
    pub fn valeur(&self, colonne: &str) -> String {
        match colonne {
            "culture" => self.culture.clone(),
            "region" => self.region.clone(),
            "superficie" => texte_superficie(self.superficie),
            "rendement_kg_ha" => self.rendement_kg_ha.to_string(),
            other => match self.extras.get(other) {
                None | Some(Value::Null) => String::new(),
                Some(Value::String(s)) => s.clone(),
                Some(v) => v.to_string(),
            },
        }
    }
}

/// Superficie affichée avec au moins une décimale (`2.0`, `1.25`)
pub fn texte_superficie(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1.0e16 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// Les rendements entiers restent des entiers dans le fichier
fn nombre_json(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < 9.0e15 {
        Value::from(value as i64)
    } else {
        Value::from(value)
    }
}

/// Collection ordonnée de parcelles partageant un même CRS
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collection {
    /// Parcelles dans l'ordre du fichier
    pub parcelles: Vec<Parcelle>,

    /// Membres de premier niveau du FeatureCollection (`name`, `crs`, ...)
    pub membres: Proprietes,
}

impl Collection {
    pub fn new(parcelles: Vec<Parcelle>, membres: Proprietes) -> Self {
        Self { parcelles, membres }
    }

    pub fn len(&self) -> usize {
        self.parcelles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parcelles.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Parcelle> {
        self.parcelles.iter()
    }

    /// Nom du CRS déclaré (`crs.properties.name`), absent = CRS84 implicite
    pub fn crs_name(&self) -> Option<&str> {
        self.membres
            .get("crs")?
            .get("properties")?
            .get("name")?
            .as_str()
    }

    /// Colonnes d'affichage: colonnes fixes puis extras dans l'ordre de première apparition
    pub fn colonnes(&self) -> Vec<String> {
        let mut colonnes: Vec<String> = COLONNES.iter().map(|c| c.to_string()).collect();
        for parcelle in &self.parcelles {
            for key in parcelle.extras.keys() {
                if !colonnes.iter().any(|c| c == key) {
                    colonnes.push(key.clone());
                }
            }
        }
        colonnes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, Geometry};
    use serde_json::json;

    fn parcelle() -> Parcelle {
        let mut extras = Proprietes::new();
        extras.insert("id_parcelle".into(), json!("K-001"));
        extras.insert("campagne".into(), json!(2023));
        Parcelle {
            culture: "riz".into(),
            region: "Kindia".into(),
            superficie: 1.5,
            rendement_kg_ha: 2000.0,
            geometry: Geometry::Polygon(polygon![
                (x: -13.0, y: 10.0),
                (x: -12.9, y: 10.0),
                (x: -12.9, y: 10.1),
            ]),
            extras,
            membres: Proprietes::new(),
        }
    }

    #[test]
    fn test_proprietes_order_and_types() {
        let props = parcelle().proprietes();
        let keys: Vec<&str> = props.keys().map(|k| k.as_str()).collect();
        assert_eq!(
            keys,
            vec!["culture", "region", "superficie", "rendement_kg_ha", "id_parcelle", "campagne"]
        );
        assert_eq!(props["rendement_kg_ha"], json!(2000));
        assert_eq!(props["superficie"], json!(1.5));
    }

    #[test]
    fn test_valeur() {
        let p = parcelle();
        assert_eq!(p.valeur("culture"), "riz");
        assert_eq!(p.valeur("superficie"), "1.5");
        assert_eq!(p.valeur("rendement_kg_ha"), "2000");
        assert_eq!(p.valeur("id_parcelle"), "K-001");
        assert_eq!(p.valeur("campagne"), "2023");
        assert_eq!(p.valeur("inconnue"), "");
    }

    #[test]
    fn test_texte_superficie() {
        assert_eq!(texte_superficie(1.0), "1.0");
        assert_eq!(texte_superficie(2.25), "2.25");
        assert_eq!(texte_superficie(0.1), "0.1");
        assert_eq!(texte_superficie(12.0), "12.0");
    }

    #[test]
    fn test_colonnes_and_crs() {
        let mut membres = Proprietes::new();
        membres.insert(
            "crs".into(),
            json!({"type": "name", "properties": {"name": "urn:ogc:def:crs:OGC:1.3:CRS84"}}),
        );
        let collection = Collection::new(vec![parcelle()], membres);
        assert_eq!(
            collection.colonnes(),
            vec!["culture", "region", "superficie", "rendement_kg_ha", "id_parcelle", "campagne"]
        );
        assert_eq!(collection.crs_name(), Some("urn:ogc:def:crs:OGC:1.3:CRS84"));
        assert_eq!(Collection::default().crs_name(), None);
    }
}
