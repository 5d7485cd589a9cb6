use super::selection::NONE_CARD;
use super::table::{BenefitRecord, BenefitTable};
use serde::Serialize;
use tracing::warn;

/// Winning selected card for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBest {
    pub category: String,
    pub best_card: String,
    pub max_benefit: f64,
    /// Other selected cards matching `max_benefit` exactly, in table order.
    pub tie_cards: Vec<String>,
}

/// Best selected card per category, in table column order.
///
/// Returns `None` when every selected entry is the `"None"` placeholder. Names that match
/// no card are skipped; if nothing matches, the result is an empty list.
pub fn best_by_category<S: AsRef<str>>(
    table: &BenefitTable,
    selected_cards: &[S],
) -> Option<Vec<CategoryBest>> {
    let selected: Vec<&str> = selected_cards.iter().map(|card| card.as_ref()).collect();
    if selected.iter().all(|card| *card == NONE_CARD) {
        return None;
    }

    for name in &selected {
        if *name != NONE_CARD && table.get(name).is_none() {
            warn!(card = *name, "selected card not present in benefit table");
        }
    }

    let rows: Vec<&BenefitRecord> = table
        .records()
        .iter()
        .filter(|record| selected.contains(&record.card.as_str()))
        .collect();

    if rows.is_empty() {
        return Some(Vec::new());
    }

    let results = table
        .categories()
        .iter()
        .filter_map(|category| category_best(category, &rows))
        .collect();

    Some(results)
}

fn category_best(category: &str, rows: &[&BenefitRecord]) -> Option<CategoryBest> {
    let mut best: Option<(&BenefitRecord, f64)> = None;
    for &record in rows {
        let rate = record.rate(category);
        match best {
            Some((_, max)) if rate <= max => {}
            _ => best = Some((record, rate)),
        }
    }

    let (winner, max_benefit) = best?;
    let tie_cards = rows
        .iter()
        .filter(|record| record.card != winner.card && record.rate(category) == max_benefit)
        .map(|record| record.card.clone())
        .collect();

    Some(CategoryBest {
        category: category.to_string(),
        best_card: winner.card.clone(),
        max_benefit,
        tie_cards,
    })
}
