use std::io::Write;

use super::best::CategoryBest;
use super::optimizer::OptimizedCard;
use super::table::BenefitTable;

const TIE_SEPARATOR: &str = "; ";

pub fn write_benefit_table_csv<W: Write>(
    writer: W,
    table: &BenefitTable,
) -> Result<(), csv::Error> {
    let layout = table.layout();
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header = vec![
        layout.card_column.as_str(),
        layout.bank_column.as_str(),
        layout.default_column.as_str(),
    ];
    header.extend(table.categories().iter().map(String::as_str));
    header.push(layout.average_column.as_str());
    csv_writer.write_record(&header)?;

    for record in table.records() {
        let mut row = vec![
            record.card.clone(),
            record.bank.clone(),
            record.default_rate.to_string(),
        ];
        row.extend(
            table
                .categories()
                .iter()
                .map(|category| record.rate(category).to_string()),
        );
        row.push(
            record
                .average_rate()
                .map(|average| average.to_string())
                .unwrap_or_default(),
        );
        csv_writer.write_record(&row)?;
    }

    csv_writer.flush()?;
    Ok(())
}

pub fn write_category_best_csv<W: Write>(
    writer: W,
    rows: &[CategoryBest],
) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["Category", "Best_Card", "Max_Benefit", "Tie_Cards"])?;

    for row in rows {
        let max_benefit = row.max_benefit.to_string();
        let tie_cards = row.tie_cards.join(TIE_SEPARATOR);
        csv_writer.write_record([
            row.category.as_str(),
            row.best_card.as_str(),
            max_benefit.as_str(),
            tie_cards.as_str(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

pub fn write_optimized_csv<W: Write>(
    writer: W,
    rows: &[OptimizedCard],
) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record([
        "Card",
        "Bank",
        "Monthly_Value",
        "Annual_Value",
        "Pct_Savings",
    ])?;

    for row in rows {
        csv_writer.write_record([
            row.card.clone(),
            row.bank.clone(),
            row.monthly_value.to_string(),
            row.annual_value.to_string(),
            row.pct_savings.to_string(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}
