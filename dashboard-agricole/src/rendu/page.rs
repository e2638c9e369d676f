//! Page complète du tableau de bord

use anyhow::Result;
use parcelles::{cultures_distinctes, regions_distinctes, rendement_moyen_par_culture, Resume};
use parcelles::saisie::{SUPERFICIE_MIN, SUPERFICIE_PAS};

use super::carte::{carte_html, LEAFLET_HEAD};
use super::escape_html;
use super::export::NOM_EXPORT;
use super::graphique::section_graphique;
use super::table::table_html;
use crate::config::DashboardConfig;
use crate::session::Session;

pub const TITRE: &str =
    "Dispositif SIG du Projet d’Appui à la Gestion Intégrée des Ressources";
const INTRO: &str = "Ce tableau de bord permet de visualiser les données agricoles sur Kindia et Mamou.";

const STYLE: &str = r#"<style>
body { margin: 0; font-family: sans-serif; display: flex; }
aside { width: 300px; min-height: 100vh; padding: 0 1rem 1rem; background: #f0f2f6; box-sizing: border-box; }
aside select, aside input { width: 100%; box-sizing: border-box; margin-bottom: 0.5rem; }
main { flex: 1; padding: 2rem 2rem; overflow-x: auto; }
.metriques { display: flex; gap: 4rem; }
.metrique .valeur { font-size: 2rem; }
.succes { background: #e8f5e9; color: #1b5e20; padding: 0.75rem; border-radius: 4px; }
.avertissement { background: #fff8e1; color: #8d6e00; padding: 0.75rem; border-radius: 4px; }
table.parcelles { border-collapse: collapse; }
table.parcelles th, table.parcelles td { border: 1px solid #ddd; padding: 0.25rem 0.75rem; }
footer { text-align: center; font-size: 1em; color: gray; margin-top: 2rem; }
</style>"#;

/// Recalcule toute la page pour l'état courant de la session
pub fn rendre_page(
    session: &Session,
    config: &DashboardConfig,
    message: Option<&str>,
) -> Result<String> {
    let collection = session.store().collection();
    let selection = session.selection();
    let vue = session.vue();

    let resume = Resume::calculer(&vue);
    let moyennes = rendement_moyen_par_culture(&vue);
    let colonnes = collection.colonnes();

    let carte = carte_html(&vue, &collection.membres, &config.carte)?;
    let graphique = section_graphique(moyennes.as_deref())?;
    let table = table_html(&vue, &colonnes);

    let filtres = format!(
        r#"<h2>🎛️ Filtres</h2>
<form method="get" action="/">
<input type="hidden" name="filtre" value="1">
<label for="region">Région</label>
{regions}
<label for="culture">Culture</label>
{cultures}
<button type="submit">Appliquer</button>
</form>"#,
        regions = multiselect(
            "region",
            &regions_distinctes(&collection.parcelles),
            |v| selection.regions.contains(v)
        ),
        cultures = multiselect(
            "culture",
            &cultures_distinctes(&collection.parcelles),
            |v| selection.cultures.contains(v)
        ),
    );

    let formulaire = format!(
        r#"<hr>
<h3>➕ Ajouter une entrée (démo)</h3>
<form method="post" action="/parcelles">
<label for="culture_new">Culture</label>
<input id="culture_new" type="text" name="culture">
<label for="region_new">Région</label>
<input id="region_new" type="text" name="region">
<label for="superficie_new">Superficie (ha)</label>
<input id="superficie_new" type="number" name="superficie" min="{min}" step="{pas}" value="{min}" required>
<label for="rendement_new">Rendement (kg/ha)</label>
<input id="rendement_new" type="number" name="rendement_kg_ha" min="0" step="1" value="0" required>
<button type="submit">Ajouter</button>
</form>"#,
        min = SUPERFICIE_MIN,
        pas = SUPERFICIE_PAS,
    );

    let message = message
        .map(|m| format!(r#"<div class="succes">{}</div>"#, escape_html(m)))
        .unwrap_or_default();

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="fr">
<head>
<meta charset="utf-8">
<title>Dashboard Agricole</title>
{leaflet}
{style}
</head>
<body>
<aside>
<img src="/logo" alt="logo" width="120">
{filtres}
{formulaire}
{message}
</aside>
<main>
<h1>{titre}</h1>
<p>{intro}</p>
<h2>🗺️ Carte des parcelles agricoles</h2>
{carte}
<h2>📊 Statistiques générales</h2>
<div class="metriques">
<div class="metrique"><div>📍 Nombre de parcelles</div><div class="valeur" id="nombre">{nombre}</div></div>
<div class="metrique"><div>📐 Superficie totale (ha)</div><div class="valeur" id="superficie">{superficie:.2}</div></div>
</div>
<h2>📈 Rendement moyen par culture</h2>
{graphique}
<h2>📋 Détail des parcelles filtrées</h2>
{table}
<p><a href="/export.csv" download="{nom_export}">📥 Télécharger les données filtrées (.csv)</a></p>
<hr>
<footer>Plateforme demo développée par <strong>Ibrahima Sory Youla</strong>, Data Scientist,<br>
Consultant indépendant dans le développement des applications web géospatiales.<br>
E-mail: isyoula8@gmail.com</footer>
</main>
</body>
</html>"#,
        leaflet = LEAFLET_HEAD,
        style = STYLE,
        filtres = filtres,
        formulaire = formulaire,
        message = message,
        titre = escape_html(TITRE),
        intro = escape_html(INTRO),
        carte = carte,
        nombre = resume.nombre,
        superficie = resume.superficie_totale,
        graphique = graphique,
        table = table,
        nom_export = NOM_EXPORT,
    ))
}

/// Liste à choix multiples, options dans l'ordre des données
fn multiselect(name: &str, options: &[String], selected: impl Fn(&str) -> bool) -> String {
    let mut html = format!(
        r#"<select id="{name}" name="{name}" multiple size="{size}">"#,
        size = options.len().clamp(2, 8)
    );
    for option in options {
        let value = escape_html(option);
        let attr = if selected(option.as_str()) { " selected" } else { "" };
        html.push_str(&format!(r#"<option value="{value}"{attr}>{value}</option>"#));
    }
    html.push_str("</select>");
    html
}
