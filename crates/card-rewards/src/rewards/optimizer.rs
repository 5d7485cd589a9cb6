use super::table::{BenefitRecord, BenefitTable};
use crate::config::DEFAULT_OTHER_CATEGORY;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

const MONTHS_PER_YEAR: f64 = 12.0;

/// Dollars spent per month in each category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonthlySpendingProfile(BTreeMap<String, f64>);

impl MonthlySpendingProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: impl Into<String>, amount: f64) {
        self.0.insert(category.into(), amount);
    }

    pub fn amount(&self, category: &str) -> Option<f64> {
        self.0.get(category).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(category, amount)| (category.as_str(), *amount))
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for MonthlySpendingProfile {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(category, amount)| (category.into(), amount))
                .collect(),
        )
    }
}

/// Which spending key means "everything else", and the profile used when none is given.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizerConfig {
    /// Spending key priced at each card's `Default` rate.
    pub other_category: String,
    pub default_spending: MonthlySpendingProfile,
}

impl OptimizerConfig {
    pub fn with_other_category(other_category: impl Into<String>) -> Self {
        Self {
            other_category: other_category.into(),
            ..Self::default()
        }
    }

    pub fn default_spending(&self) -> &MonthlySpendingProfile {
        &self.default_spending
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        let default_spending = [
            ("Dining", 400.0),
            ("Groceries", 600.0),
            ("Gas", 150.0),
            ("Travel", 200.0),
            ("Streaming", 50.0),
            (DEFAULT_OTHER_CATEGORY, 1000.0),
        ]
        .into_iter()
        .collect();

        Self {
            other_category: DEFAULT_OTHER_CATEGORY.to_string(),
            default_spending,
        }
    }
}

/// Expected reward value of one card for a spending profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizedCard {
    pub card: String,
    pub bank: String,
    pub monthly_value: f64,
    pub annual_value: f64,
    /// Monthly value as a percent of total monthly spend; 0 when nothing is spent.
    pub pct_savings: f64,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum OptimizeError {
    #[error("spending for '{category}' must be a non-negative amount, got {amount}")]
    InvalidAmount { category: String, amount: f64 },
}

/// Values every card in `table` against `spending`, best monthly value first.
pub fn optimize(
    table: &BenefitTable,
    spending: &MonthlySpendingProfile,
    config: &OptimizerConfig,
) -> Result<Vec<OptimizedCard>, OptimizeError> {
    for (category, amount) in spending.iter() {
        if !amount.is_finite() || amount < 0.0 {
            return Err(OptimizeError::InvalidAmount {
                category: category.to_string(),
                amount,
            });
        }
    }

    let total_spend = spending.total();
    let mut ranked: Vec<OptimizedCard> = table
        .records()
        .iter()
        .map(|record| value_card(record, spending, total_spend, config))
        .collect();

    ranked.sort_by(|a, b| b.monthly_value.total_cmp(&a.monthly_value));

    debug!(
        cards = ranked.len(),
        total_spend,
        top = ranked.first().map(|card| card.card.as_str()),
        "spending profile optimized"
    );

    Ok(ranked)
}

fn value_card(
    record: &BenefitRecord,
    spending: &MonthlySpendingProfile,
    total_spend: f64,
    config: &OptimizerConfig,
) -> OptimizedCard {
    let monthly_value: f64 = spending
        .iter()
        .map(|(category, amount)| amount * spending_rate(record, category, config) * 0.01)
        .sum();

    let pct_savings = if total_spend > 0.0 {
        100.0 * monthly_value / total_spend
    } else {
        0.0
    };

    OptimizedCard {
        card: record.card.clone(),
        bank: record.bank.clone(),
        monthly_value,
        annual_value: monthly_value * MONTHS_PER_YEAR,
        pct_savings,
    }
}

fn spending_rate(record: &BenefitRecord, category: &str, config: &OptimizerConfig) -> f64 {
    if category == config.other_category {
        record.default_rate
    } else {
        record.rate(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewards::table::TableLayout;

    fn table() -> BenefitTable {
        BenefitTable::from_json_str(
            r#"[
                {"Card": "Flat", "Bank": "X", "Default": 2, "Gas": 2},
                {"Card": "Gas Card", "Bank": "Y", "Default": 1, "Gas": 5},
                {"Card": "Also Flat", "Bank": "Z", "Default": 2, "Gas": 2}
            ]"#,
            &TableLayout::default(),
        )
        .expect("table loads")
    }

    fn profile(entries: &[(&str, f64)]) -> MonthlySpendingProfile {
        entries.iter().map(|(k, v)| (*k, *v)).collect()
    }

    #[test]
    fn values_a_single_category() {
        let results = optimize(&table(), &profile(&[("Gas", 100.0)]), &OptimizerConfig::default())
            .expect("optimizes");

        let top = &results[0];
        assert_eq!(top.card, "Gas Card");
        assert_eq!(top.monthly_value, 5.0);
        assert_eq!(top.annual_value, 60.0);
        assert_eq!(top.pct_savings, 5.0);
    }

    #[test]
    fn other_maps_to_the_default_rate_and_unknown_categories_fall_back() {
        let spending = profile(&[("Other", 100.0), ("Streaming", 100.0)]);
        let results =
            optimize(&table(), &spending, &OptimizerConfig::default()).expect("optimizes");

        let flat = results.iter().find(|card| card.card == "Flat").expect("flat");
        assert_eq!(flat.monthly_value, 4.0);
        let gas = results.iter().find(|card| card.card == "Gas Card").expect("gas");
        assert_eq!(gas.monthly_value, 2.0);
    }

    #[test]
    fn custom_other_category_is_honored() {
        let config = OptimizerConfig::with_other_category("Everything Else");
        let spending = profile(&[("Everything Else", 100.0)]);
        let results = optimize(&table(), &spending, &config).expect("optimizes");
        let gas = results.iter().find(|card| card.card == "Gas Card").expect("gas");
        assert_eq!(gas.monthly_value, 1.0);
    }

    #[test]
    fn ranking_is_descending_and_stable_for_ties() {
        let spending = profile(&[("Other", 500.0), ("Gas", 10.0)]);
        let results =
            optimize(&table(), &spending, &OptimizerConfig::default()).expect("optimizes");

        let names: Vec<&str> = results.iter().map(|card| card.card.as_str()).collect();
        assert_eq!(names, ["Flat", "Also Flat", "Gas Card"]);
        assert!(results
            .windows(2)
            .all(|pair| pair[0].monthly_value >= pair[1].monthly_value));
    }

    #[test]
    fn zero_spend_reports_zero_savings() {
        let results = optimize(
            &table(),
            &profile(&[("Gas", 0.0)]),
            &OptimizerConfig::default(),
        )
        .expect("optimizes");
        assert!(results
            .iter()
            .all(|card| card.monthly_value == 0.0 && card.pct_savings == 0.0));

        let results = optimize(&table(), &MonthlySpendingProfile::new(), &OptimizerConfig::default())
            .expect("empty profile optimizes");
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn negative_amounts_are_rejected() {
        let error = optimize(
            &table(),
            &profile(&[("Gas", -5.0)]),
            &OptimizerConfig::default(),
        )
        .expect_err("negative rejected");
        assert_eq!(
            error,
            OptimizeError::InvalidAmount {
                category: "Gas".to_string(),
                amount: -5.0
            }
        );
    }

    #[test]
    fn default_profile_includes_other() {
        let config = OptimizerConfig::default();
        assert!(config.default_spending().amount("Other").is_some());
        assert!(config.default_spending().total() > 0.0);
    }
}
