use crate::cli::{BestArgs, CardsArgs, OptimizeArgs};
use crate::infra::load_explorer;
use card_rewards::config::AppConfig;
use card_rewards::error::AppError;
use card_rewards::rewards::export::{
    write_benefit_table_csv, write_category_best_csv, write_optimized_csv,
};
use card_rewards::rewards::{
    format_as_dollars, BenefitTableView, CategoryBestView, MonthlySpendingProfile,
    OptimizedCardView, SelectionState,
};

pub(crate) fn run_cards(config: &AppConfig, args: CardsArgs) -> Result<(), AppError> {
    let explorer = load_explorer(&config.rewards)?;

    if args.csv {
        write_benefit_table_csv(std::io::stdout().lock(), explorer.table())?;
        return Ok(());
    }

    render_benefit_table(&explorer.table_view());
    Ok(())
}

pub(crate) fn run_best(config: &AppConfig, args: BestArgs) -> Result<(), AppError> {
    let state = SelectionState::new(args.cards)?;
    let explorer = load_explorer(&config.rewards)?;

    let Some(results) = explorer.best_by_category(state.selected().to_vec()) else {
        println!("No cards selected.");
        return Ok(());
    };

    if args.csv {
        write_category_best_csv(std::io::stdout().lock(), &results)?;
        return Ok(());
    }

    let views: Vec<CategoryBestView> = results.iter().map(CategoryBestView::from).collect();
    render_category_best(state.selected(), &views);
    Ok(())
}

pub(crate) fn run_optimize(config: &AppConfig, args: OptimizeArgs) -> Result<(), AppError> {
    let explorer = load_explorer(&config.rewards)?;

    let spending: MonthlySpendingProfile = if args.spend.is_empty() {
        explorer.settings().optimizer.default_spending().clone()
    } else {
        args.spend.into_iter().collect()
    };
    let ranked = explorer.optimize(Some(&spending))?;

    if args.csv {
        write_optimized_csv(std::io::stdout().lock(), &ranked)?;
        return Ok(());
    }

    let views: Vec<OptimizedCardView> = ranked.iter().map(OptimizedCardView::from).collect();
    render_optimized(&spending, &views);
    Ok(())
}

pub(crate) fn render_benefit_table(view: &BenefitTableView) {
    println!("All credit card rewards");
    println!("Categories: {}", view.categories.join(", "));

    for row in &view.cards {
        let average = row.avg_benefit.as_deref().unwrap_or("n/a");
        println!(
            "- {} ({}) | avg {} | default {}",
            row.card, row.bank, average, row.default_rate
        );
        let rates: Vec<String> = row
            .rates
            .iter()
            .map(|(category, rate)| format!("{category} {rate}"))
            .collect();
        if !rates.is_empty() {
            println!("  {}", rates.join(" | "));
        }
    }
}

pub(crate) fn render_category_best(selected: &[String], views: &[CategoryBestView]) {
    println!("Selected credit card rewards");
    println!("Cards: {}", selected.join(", "));

    if views.is_empty() {
        println!("\nNone of the selected cards are in the benefit table.");
        return;
    }

    println!();
    for view in views {
        if view.tie_cards.is_empty() {
            println!(
                "- {}: {} ({})",
                view.category, view.best_card, view.max_benefit_label
            );
        } else {
            println!(
                "- {}: {} ({}), tied with {}",
                view.category,
                view.best_card,
                view.max_benefit_label,
                view.tie_cards.join(", ")
            );
        }
    }
}

pub(crate) fn render_optimized(spending: &MonthlySpendingProfile, views: &[OptimizedCardView]) {
    println!("Spending optimizer");
    let profile: Vec<String> = spending
        .iter()
        .map(|(category, amount)| format!("{category} {}", format_as_dollars(amount)))
        .collect();
    println!(
        "Monthly spend: {} ({})",
        format_as_dollars(spending.total()),
        profile.join(", ")
    );

    println!();
    for (rank, view) in views.iter().enumerate() {
        println!(
            "{}. {} ({}) | {}/mo | {}/yr | {} of spend",
            rank + 1,
            view.card,
            view.bank,
            view.monthly_value_label,
            view.annual_value_label,
            view.pct_savings_label
        );
    }
}
