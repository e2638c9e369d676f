//! Table des parcelles filtrées (sans la géométrie)

use parcelles::Parcelle;

use super::escape_html;

pub fn table_html(vue: &[&Parcelle], colonnes: &[String]) -> String {
    let mut html = String::from("<table class=\"parcelles\"><thead><tr>");
    for colonne in colonnes {
        html.push_str(&format!("<th>{}</th>", escape_html(colonne)));
    }
    html.push_str("</tr></thead><tbody>");

    for parcelle in vue {
        html.push_str("<tr>");
        for colonne in colonnes {
            html.push_str(&format!("<td>{}</td>", escape_html(&parcelle.valeur(colonne))));
        }
        html.push_str("</tr>");
    }

    html.push_str("</tbody></table>");
    html
}
