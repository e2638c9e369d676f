//! Rendu du tableau de bord: carte, graphique, table, export et page complète
//!
//! Chaque interaction recalcule entièrement la vue: filtre → statistiques → rendu.

pub mod carte;
pub mod export;
pub mod graphique;
pub mod page;
pub mod table;

/// Échappe une chaîne pour l'insérer dans du HTML (texte ou attribut)
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            c => result.push(c),
        }
    }
    result
}
