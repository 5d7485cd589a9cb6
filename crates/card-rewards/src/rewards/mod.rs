pub mod best;
pub mod export;
pub mod format;
pub mod optimizer;
pub mod router;
pub mod selection;
pub mod service;
pub mod table;

pub use best::{best_by_category, CategoryBest};
pub use format::{
    format_as_dollars, format_as_percent, format_rate, BenefitRowView, BenefitTableView,
    CategoryBestView, OptimizedCardView,
};
pub use optimizer::{
    optimize, MonthlySpendingProfile, OptimizeError, OptimizedCard, OptimizerConfig,
};
pub use router::rewards_router;
pub use selection::{
    remaining_selectable, NonePolicy, SelectionError, SelectionInput, SelectionState, NONE_CARD,
};
pub use service::{ExplorerSettings, RewardsExplorer};
pub use table::{
    load_table, prepare_benefits, rank_by_average, BenefitRecord, BenefitTable, DataLoadError,
    TableLayout,
};
