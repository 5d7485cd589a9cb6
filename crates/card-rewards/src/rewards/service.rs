use std::sync::Arc;

use super::best::{best_by_category, CategoryBest};
use super::format::BenefitTableView;
use super::optimizer::{
    optimize, MonthlySpendingProfile, OptimizeError, OptimizedCard, OptimizerConfig,
};
use super::selection::{remaining_selectable, NonePolicy, SelectionInput, NONE_CARD};
use super::table::BenefitTable;
use crate::config::RewardsConfig;

/// Per-explorer knobs for selection and spending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExplorerSettings {
    pub none_policy: NonePolicy,
    pub optimizer: OptimizerConfig,
}

impl From<&RewardsConfig> for ExplorerSettings {
    fn from(config: &RewardsConfig) -> Self {
        Self {
            none_policy: config.none_policy,
            optimizer: OptimizerConfig::with_other_category(config.other_category.clone()),
        }
    }
}

/// Read-only facade over a loaded table; cheap to share across sessions.
pub struct RewardsExplorer {
    table: Arc<BenefitTable>,
    settings: ExplorerSettings,
}

impl RewardsExplorer {
    pub fn new(table: Arc<BenefitTable>, settings: ExplorerSettings) -> Self {
        Self { table, settings }
    }

    pub fn table(&self) -> &BenefitTable {
        &self.table
    }

    pub fn settings(&self) -> &ExplorerSettings {
        &self.settings
    }

    /// Every option for the first slot: the placeholder followed by cards in table order.
    pub fn card_options(&self) -> Vec<String> {
        std::iter::once(NONE_CARD.to_string())
            .chain(self.table.card_names())
            .collect()
    }

    pub fn selectable(&self, chosen: impl Into<SelectionInput>) -> Vec<String> {
        remaining_selectable(&self.card_options(), chosen, self.settings.none_policy)
    }

    pub fn best_by_category(
        &self,
        selected: impl Into<SelectionInput>,
    ) -> Option<Vec<CategoryBest>> {
        let selected = selected.into().into_vec();
        best_by_category(&self.table, &selected)
    }

    /// Ranks every card; `None` uses the configured default profile.
    pub fn optimize(
        &self,
        spending: Option<&MonthlySpendingProfile>,
    ) -> Result<Vec<OptimizedCard>, OptimizeError> {
        let spending = spending.unwrap_or_else(|| self.settings.optimizer.default_spending());
        optimize(&self.table, spending, &self.settings.optimizer)
    }

    pub fn table_view(&self) -> BenefitTableView {
        BenefitTableView::from_table(&self.table)
    }
}
