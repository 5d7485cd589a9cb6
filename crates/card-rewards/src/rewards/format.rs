//! Display strings for result tables.
//!
//! Views are built from finished results; the numeric fields they carry are the ones
//! used for sorting, the string fields are for presentation only.

use super::best::CategoryBest;
use super::optimizer::OptimizedCard;
use super::table::{BenefitRecord, BenefitTable};
use serde::Serialize;
use std::collections::BTreeMap;

/// `$#,##0`: whole dollars with thousands separators.
pub fn format_as_dollars(value: f64) -> String {
    let rounded = value.round();
    let grouped = group_thousands(&format!("{:.0}", rounded.abs()));
    if rounded < 0.0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// `#.##%`: the value is already a percentage.
pub fn format_as_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

/// Reward rate with at most two decimals and no trailing zeros (`5%`, `1.5%`).
pub fn format_rate(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    let number = match fixed.split_once('.') {
        Some((whole, fraction)) => {
            let fraction = fraction.trim_end_matches('0');
            if fraction.is_empty() {
                whole.to_string()
            } else {
                format!("{whole}.{fraction}")
            }
        }
        None => fixed.clone(),
    };
    if number == "-0" {
        return "0%".to_string();
    }
    format!("{number}%")
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[derive(Debug, Clone, Serialize)]
pub struct BenefitRowView {
    pub card: String,
    pub bank: String,
    pub default_rate: String,
    pub rates: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_benefit: Option<String>,
}

impl BenefitRowView {
    pub fn from_record(record: &BenefitRecord) -> Self {
        Self {
            card: record.card.clone(),
            bank: record.bank.clone(),
            default_rate: format_rate(record.default_rate),
            rates: record
                .rates
                .iter()
                .map(|(category, rate)| (category.clone(), format_rate(*rate)))
                .collect(),
            avg_benefit: record.average_rate().map(format_as_percent),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BenefitTableView {
    pub categories: Vec<String>,
    pub cards: Vec<BenefitRowView>,
}

impl BenefitTableView {
    pub fn from_table(table: &BenefitTable) -> Self {
        Self {
            categories: table.categories().to_vec(),
            cards: table
                .records()
                .iter()
                .map(BenefitRowView::from_record)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryBestView {
    pub category: String,
    pub best_card: String,
    pub max_benefit: f64,
    pub max_benefit_label: String,
    pub tie_cards: Vec<String>,
}

impl From<&CategoryBest> for CategoryBestView {
    fn from(best: &CategoryBest) -> Self {
        Self {
            category: best.category.clone(),
            best_card: best.best_card.clone(),
            max_benefit: best.max_benefit,
            max_benefit_label: format_rate(best.max_benefit),
            tie_cards: best.tie_cards.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OptimizedCardView {
    pub card: String,
    pub bank: String,
    pub monthly_value: f64,
    pub annual_value: f64,
    pub pct_savings: f64,
    pub monthly_value_label: String,
    pub annual_value_label: String,
    pub pct_savings_label: String,
}

impl From<&OptimizedCard> for OptimizedCardView {
    fn from(card: &OptimizedCard) -> Self {
        Self {
            card: card.card.clone(),
            bank: card.bank.clone(),
            monthly_value: card.monthly_value,
            annual_value: card.annual_value,
            pct_savings: card.pct_savings,
            monthly_value_label: format_as_dollars(card.monthly_value),
            annual_value_label: format_as_dollars(card.annual_value),
            pct_savings_label: format_as_percent(card.pct_savings),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dollars_group_thousands_and_drop_cents() {
        assert_eq!(format_as_dollars(0.0), "$0");
        assert_eq!(format_as_dollars(5.0), "$5");
        assert_eq!(format_as_dollars(999.4), "$999");
        assert_eq!(format_as_dollars(1234.6), "$1,235");
        assert_eq!(format_as_dollars(1_234_567.0), "$1,234,567");
        assert_eq!(format_as_dollars(-2500.0), "-$2,500");
        assert_eq!(format_as_dollars(-0.2), "$0");
    }

    #[test]
    fn percent_keeps_two_decimals() {
        assert_eq!(format_as_percent(5.0), "5.00%");
        assert_eq!(format_as_percent(1.83333), "1.83%");
        assert_eq!(format_as_percent(0.0), "0.00%");
    }

    #[test]
    fn rates_trim_trailing_zeros() {
        assert_eq!(format_rate(5.0), "5%");
        assert_eq!(format_rate(1.5), "1.5%");
        assert_eq!(format_rate(1.25), "1.25%");
        assert_eq!(format_rate(10.0), "10%");
        assert_eq!(format_rate(0.0), "0%");
    }

    #[test]
    fn optimized_view_keeps_raw_values_next_to_labels() {
        let card = OptimizedCard {
            card: "Gas Card".to_string(),
            bank: "Y".to_string(),
            monthly_value: 105.5,
            annual_value: 1266.0,
            pct_savings: 3.25,
        };
        let view = OptimizedCardView::from(&card);
        assert_eq!(view.monthly_value, 105.5);
        assert_eq!(view.monthly_value_label, "$106");
        assert_eq!(view.annual_value_label, "$1,266");
        assert_eq!(view.pct_savings_label, "3.25%");
    }
}
