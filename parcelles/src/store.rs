//! Stockage des parcelles: lecture GeoJSON et réécriture complète du fichier
//!
//! Le fichier est lu une seule fois par session. Chaque ajout est suivi d'une
//! réécriture intégrale (pas d'écriture incrémentale, pas de transaction).

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use geo::Geometry;
use geojson::feature::Id;
use geojson::{Feature, FeatureCollection, GeoJson};
use geozero::geojson::GeoJsonWriter;
use geozero::GeozeroGeometry;
use serde_json::Value;
use tracing::{debug, info};

use crate::types::{Collection, Parcelle, Proprietes};
use crate::ParcelleError;

/// Collection en mémoire associée à son fichier d'origine
#[derive(Debug, Clone)]
pub struct ParcelStore {
    path: PathBuf,
    collection: Collection,
}

impl ParcelStore {
    /// Charge l'intégralité du fichier.
    ///
    /// # Errors
    ///
    /// `ParcelleError::DataUnavailable` si le fichier est absent ou mal formé.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ParcelleError> {
        let path = path.as_ref();
        let collection = read_collection(path)?;
        info!(
            path = %path.display(),
            parcelles = collection.len(),
            crs = collection.crs_name().unwrap_or("CRS84"),
            "Parcelles chargées"
        );
        Ok(Self {
            path: path.to_path_buf(),
            collection,
        })
    }

    /// Ajoute une parcelle en fin de collection puis réécrit tout le fichier.
    ///
    /// La parcelle reste en mémoire même si l'écriture échoue: le fichier
    /// peut alors être incomplet.
    pub fn append(&mut self, parcelle: Parcelle) -> Result<(), ParcelleError> {
        self.collection.parcelles.push(parcelle);
        write_collection_file(&self.collection, &self.path)?;
        debug!(
            path = %self.path.display(),
            parcelles = self.collection.len(),
            "Fichier réécrit"
        );
        Ok(())
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    pub fn parcelles(&self) -> &[Parcelle] {
        &self.collection.parcelles
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.collection.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }
}

/// Lit un FeatureCollection de parcelles
pub fn read_collection(path: &Path) -> Result<Collection, ParcelleError> {
    let file =
        File::open(path).map_err(|e| ParcelleError::data_unavailable(path, e.to_string()))?;

    let geojson = GeoJson::from_reader(BufReader::new(file))
        .map_err(|e| ParcelleError::data_unavailable(path, e.to_string()))?;

    let fc = match geojson {
        GeoJson::FeatureCollection(fc) => fc,
        _ => {
            return Err(ParcelleError::data_unavailable(
                path,
                "expected a GeoJSON FeatureCollection",
            ))
        }
    };

    collection_from_geojson(fc).map_err(|e| ParcelleError::data_unavailable(path, e.to_string()))
}

/// Convertit un FeatureCollection en collection de parcelles
pub fn collection_from_geojson(fc: FeatureCollection) -> Result<Collection, ParcelleError> {
    let parcelles = fc
        .features
        .into_iter()
        .enumerate()
        .map(|(index, feature)| parcelle_from_feature(index, feature))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Collection::new(parcelles, fc.foreign_members.unwrap_or_default()))
}

fn parcelle_from_feature(index: usize, feature: Feature) -> Result<Parcelle, ParcelleError> {
    let geometry = feature
        .geometry
        .ok_or_else(|| ParcelleError::invalid_geometry(index, "missing geometry"))?;
    let geometry = Geometry::<f64>::try_from(geometry)
        .map_err(|e| ParcelleError::invalid_geometry(index, e.to_string()))?;
    if !matches!(geometry, Geometry::Polygon(_) | Geometry::MultiPolygon(_)) {
        return Err(ParcelleError::invalid_geometry(
            index,
            "expected Polygon or MultiPolygon",
        ));
    }

    let mut membres = Proprietes::new();
    if let Some(id) = feature.id {
        let id = match id {
            Id::String(s) => Value::String(s),
            Id::Number(n) => Value::Number(n),
        };
        membres.insert("id".into(), id);
    }
    if let Some(bbox) = feature.bbox {
        membres.insert("bbox".into(), Value::from(bbox));
    }
    membres.extend(feature.foreign_members.unwrap_or_default());

    let mut props = feature.properties.unwrap_or_default();
    let culture = take_text(&mut props, index, "culture")?;
    let region = take_text(&mut props, index, "region")?;
    let superficie = take_number(&mut props, index, "superficie")?;
    let rendement_kg_ha = take_number(&mut props, index, "rendement_kg_ha")?;

    Ok(Parcelle {
        culture,
        region,
        superficie,
        rendement_kg_ha,
        geometry,
        extras: props,
        membres,
    })
}

fn take_text(
    props: &mut Proprietes,
    index: usize,
    name: &'static str,
) -> Result<String, ParcelleError> {
    match props.remove(name) {
        Some(Value::String(s)) => Ok(s),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(ParcelleError::MissingProperty { index, name }),
    }
}

fn take_number(
    props: &mut Proprietes,
    index: usize,
    name: &'static str,
) -> Result<f64, ParcelleError> {
    props
        .remove(name)
        .and_then(|v| v.as_f64())
        .ok_or(ParcelleError::MissingProperty { index, name })
}

/// Réécrit intégralement le fichier (pas d'atomicité)
pub fn write_collection_file(collection: &Collection, output_path: &Path) -> Result<(), ParcelleError> {
    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);
    write_collection(&mut writer, &collection.membres, collection.iter())?;
    writer.flush()?;
    Ok(())
}

/// Écrit un FeatureCollection (membres de premier niveau conservés)
pub fn write_collection<'a, W: Write>(
    writer: &mut W,
    membres: &Proprietes,
    parcelles: impl IntoIterator<Item = &'a Parcelle>,
) -> Result<(), ParcelleError> {
    write!(writer, r#"{{"type":"FeatureCollection""#)?;
    for (key, value) in membres {
        // bbox serait faux après un ajout
        if matches!(key.as_str(), "type" | "features" | "bbox") {
            continue;
        }
        write!(writer, ",")?;
        serde_json::to_writer(&mut *writer, key)?;
        write!(writer, ":")?;
        serde_json::to_writer(&mut *writer, value)?;
    }
    write!(writer, r#","features":["#)?;

    for (i, parcelle) in parcelles.into_iter().enumerate() {
        if i > 0 {
            write!(writer, ",")?;
        }
        write_feature(writer, parcelle)?;
    }

    write!(writer, "]}}")?;
    Ok(())
}

/// Écrit une parcelle en Feature GeoJSON
fn write_feature<W: Write>(writer: &mut W, parcelle: &Parcelle) -> Result<(), ParcelleError> {
    write!(writer, r#"{{"type":"Feature""#)?;
    for (key, value) in &parcelle.membres {
        if matches!(key.as_str(), "type" | "properties" | "geometry") {
            continue;
        }
        write!(writer, ",")?;
        serde_json::to_writer(&mut *writer, key)?;
        write!(writer, ":")?;
        serde_json::to_writer(&mut *writer, value)?;
    }

    write!(writer, r#","properties":"#)?;
    serde_json::to_writer(&mut *writer, &parcelle.proprietes())?;

    write!(writer, r#","geometry":"#)?;
    let mut geom_buf = Vec::new();
    let mut geom_writer = GeoJsonWriter::new(&mut geom_buf);
    parcelle.geometry.process_geom(&mut geom_writer)?;
    writer.write_all(&geom_buf)?;

    write!(writer, "}}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::saisie::{geometrie_demo, Saisie};
    use serde_json::json;
    use std::io::Cursor;

    const FIXTURE: &str = r#"{
        "type": "FeatureCollection",
        "name": "parcelles_multiculture",
        "crs": {"type": "name", "properties": {"name": "urn:ogc:def:crs:OGC:1.3:CRS84"}},
        "features": [
            {"type": "Feature", "id": "K1", "bbox": [-12.9, 10.0, -12.8, 10.1], "source": "terrain",
             "properties": {"culture": "maïs", "region": "Kindia", "superficie": 2.0, "rendement_kg_ha": 1000, "code": "K1"},
             "geometry": {"type": "Polygon", "coordinates": [[[-12.9, 10.0], [-12.8, 10.0], [-12.8, 10.1], [-12.9, 10.0]]]}},
            {"type": "Feature",
             "properties": {"culture": "riz", "region": "Mamou", "superficie": 1.5, "rendement_kg_ha": 2000, "code": "M1"},
             "geometry": {"type": "MultiPolygon", "coordinates": [[[[-12.1, 10.4], [-12.0, 10.4], [-12.0, 10.5], [-12.1, 10.4]]]]}}
        ]
    }"#;

    fn temp_file(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "parcelles_store_{}_{}.geojson",
            std::process::id(),
            name
        ));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_fixture() {
        let path = temp_file("load", FIXTURE);
        let store = ParcelStore::load(&path).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.path(), path.as_path());
        let first = &store.parcelles()[0];
        assert_eq!(first.culture, "maïs");
        assert_eq!(first.region, "Kindia");
        assert_eq!(first.superficie, 2.0);
        assert_eq!(first.rendement_kg_ha, 1000.0);
        assert_eq!(first.extras["code"], json!("K1"));
        assert!(matches!(store.parcelles()[1].geometry, Geometry::MultiPolygon(_)));
        assert_eq!(
            store.collection().crs_name(),
            Some("urn:ogc:def:crs:OGC:1.3:CRS84")
        );

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_missing_file() {
        let path = std::env::temp_dir().join("parcelles_store_absent.geojson");
        let err = ParcelStore::load(&path).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_load_malformed() {
        let cases = [
            ("not_json", "{ pas du json"),
            ("not_fc", r#"{"type": "Point", "coordinates": [1.0, 2.0]}"#),
            (
                "point_geom",
                r#"{"type": "FeatureCollection", "features": [{"type": "Feature",
                    "properties": {"culture": "riz", "region": "Kindia", "superficie": 1.0, "rendement_kg_ha": 5},
                    "geometry": {"type": "Point", "coordinates": [1.0, 2.0]}}]}"#,
            ),
            (
                "missing_prop",
                r#"{"type": "FeatureCollection", "features": [{"type": "Feature",
                    "properties": {"culture": "riz", "region": "Kindia"},
                    "geometry": {"type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]}}]}"#,
            ),
        ];

        for (name, content) in cases {
            let path = temp_file(name, content);
            match ParcelStore::load(&path) {
                Err(ParcelleError::DataUnavailable { .. }) => {}
                other => panic!("{name}: expected DataUnavailable, got {other:?}"),
            }
            std::fs::remove_file(path).ok();
        }
    }

    #[test]
    fn test_append_rewrites_file() {
        let path = temp_file("append", FIXTURE);
        let mut store = ParcelStore::load(&path).unwrap();

        let saisie = Saisie {
            culture: "sorgho".into(),
            region: "Kindia".into(),
            superficie: 3.5,
            rendement_kg_ha: 800,
        };
        store.append(saisie.en_parcelle().unwrap()).unwrap();
        assert_eq!(store.len(), 3);

        let reloaded = ParcelStore::load(&path).unwrap();
        assert_eq!(reloaded.len(), 3);
        let last = &reloaded.parcelles()[2];
        assert_eq!(last.culture, "sorgho");
        assert_eq!(last.region, "Kindia");
        assert_eq!(last.superficie, 3.5);
        assert_eq!(last.rendement_kg_ha, 800.0);
        assert_eq!(last.geometry, geometrie_demo());

        // Membres et extras conservés
        assert_eq!(reloaded.collection().membres["name"], json!("parcelles_multiculture"));
        assert_eq!(reloaded.collection().crs_name(), store.collection().crs_name());
        assert_eq!(reloaded.parcelles()[0].extras["code"], json!("K1"));
        let premier = &reloaded.parcelles()[0];
        assert_eq!(premier.membres["id"], json!("K1"));
        assert_eq!(premier.membres["bbox"], json!([-12.9, 10.0, -12.8, 10.1]));
        assert_eq!(premier.membres["source"], json!("terrain"));
        assert!(reloaded.parcelles()[1].membres.is_empty());
        assert_eq!(&reloaded.parcelles()[..2], &store.parcelles()[..2]);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_write_collection_skips_bbox() {
        let mut membres = Proprietes::new();
        membres.insert("bbox".into(), json!([0.0, 0.0, 1.0, 1.0]));
        membres.insert("name".into(), json!("vide"));

        let mut buffer = Cursor::new(Vec::new());
        write_collection(&mut buffer, &membres, std::iter::empty()).unwrap();

        let json = String::from_utf8(buffer.into_inner()).unwrap();
        assert_eq!(json, r#"{"type":"FeatureCollection","name":"vide","features":[]}"#);
    }
}
