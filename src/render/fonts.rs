use std::{path::Path, sync::Arc};

use usvg::fontdb::{Database, Family, Query, Stretch, Style, Weight};

/// System fonts, plus every font file under `extra_dir` (searched recursively).
pub fn build_fontdb(extra_dir: Option<&Path>) -> Arc<Database> {
    let mut db = Database::new();
    db.load_system_fonts();

    if let Some(dir) = extra_dir {
        let before = db.len();
        if dir.is_dir() {
            db.load_fonts_dir(dir);
        }
        if db.len() == before {
            tracing::warn!(dir = %dir.display(), "no fonts loaded from font_dir");
        }
    }

    tracing::debug!(faces = db.len(), "font database ready");
    Arc::new(db)
}

/// Named families from a CSS-style list such as `"DejaVu Sans, Arial, sans-serif"`.
///
/// Generic keywords are dropped; the resolver always ends with sans-serif anyway.
pub fn family_names(list: &str) -> Vec<String> {
    list.split(',')
        .map(|f| f.trim().trim_matches(|c| c == '"' || c == '\''))
        .filter(|f| {
            !f.is_empty()
                && !matches!(
                    f.to_ascii_lowercase().as_str(),
                    "sans-serif" | "serif" | "monospace" | "cursive" | "fantasy"
                )
        })
        .map(str::to_string)
        .collect()
}

/// Resolver for the overlay label: the configured families, then sans-serif, then any face.
///
/// The label only ever asks for one family list, so the query is built from `families`
/// rather than from whatever the SVG text node names.
pub fn font_resolver(families: Vec<String>) -> usvg::FontResolver<'static> {
    usvg::FontResolver {
        select_font: Box::new(move |font, db| {
            let mut query_families: Vec<Family<'_>> =
                families.iter().map(|f| Family::Name(f.as_str())).collect();
            query_families.push(Family::SansSerif);

            let query = Query {
                families: &query_families,
                weight: Weight(font.weight()),
                stretch: Stretch::Normal,
                style: Style::Normal,
            };
            db.query(&query).or_else(|| db.faces().next().map(|f| f.id))
        }),
        select_fallback: usvg::FontResolver::default_fallback_selector(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/fonts.rs"]
mod tests;
