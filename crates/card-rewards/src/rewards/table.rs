use crate::config::RewardsConfig;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Column names that carry card metadata rather than category rates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLayout {
    pub card_column: String,
    pub bank_column: String,
    pub default_column: String,
    /// Derived column; ignored when present in the source.
    pub average_column: String,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            card_column: "Card".to_string(),
            bank_column: "Bank".to_string(),
            default_column: "Default".to_string(),
            average_column: "Avg_Benefit".to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    #[error("failed to read benefit data: {0}")]
    Io(#[from] std::io::Error),
    #[error("benefit data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("benefit data must be an array of records or an object keyed by card name")]
    UnsupportedShape,
    #[error("record {row} is missing required column '{column}'")]
    MissingColumn { row: usize, column: String },
    #[error("record {row} has an invalid value for '{column}': expected {expected}")]
    InvalidValue {
        row: usize,
        column: String,
        expected: &'static str,
    },
    #[error("card '{card}' appears more than once")]
    DuplicateCard { card: String },
}

/// One card with a resolved rate for every category column of its table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenefitRecord {
    pub card: String,
    pub bank: String,
    pub default_rate: f64,
    pub rates: BTreeMap<String, f64>,
}

impl BenefitRecord {
    /// Rate for `category`, or the card's default when the category is not a column.
    pub fn rate(&self, category: &str) -> f64 {
        self.rates
            .get(category)
            .copied()
            .unwrap_or(self.default_rate)
    }

    /// Mean of the category rates; `None` when the table has no category columns.
    pub fn average_rate(&self) -> Option<f64> {
        if self.rates.is_empty() {
            return None;
        }
        let total: f64 = self.rates.values().sum();
        Some(total / self.rates.len() as f64)
    }
}

/// Prepared benefit table. Every record holds a rate for every entry of `categories`.
#[derive(Debug, Clone, PartialEq)]
pub struct BenefitTable {
    layout: TableLayout,
    categories: Vec<String>,
    records: Vec<BenefitRecord>,
}

impl BenefitTable {
    pub fn from_path<P: AsRef<Path>>(path: P, layout: &TableLayout) -> Result<Self, DataLoadError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file), layout)
    }

    pub fn from_reader<R: Read>(reader: R, layout: &TableLayout) -> Result<Self, DataLoadError> {
        let value: Value = serde_json::from_reader(reader)?;
        Self::from_value(value, layout)
    }

    pub fn from_json_str(json: &str, layout: &TableLayout) -> Result<Self, DataLoadError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value, layout)
    }

    pub fn from_value(value: Value, layout: &TableLayout) -> Result<Self, DataLoadError> {
        let rows = record_objects(value, layout)?;
        let mut seen = HashSet::new();
        let mut parsed = Vec::with_capacity(rows.len());

        for (row, map) in rows.into_iter().enumerate() {
            let record = parse_row(row, map, layout)?;
            if !seen.insert(record.card.clone()) {
                return Err(DataLoadError::DuplicateCard { card: record.card });
            }
            parsed.push(record);
        }

        let categories: Vec<String> = parsed
            .iter()
            .flat_map(|row| row.values.keys().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let records = parsed
            .into_iter()
            .map(|row| fill_defaults(row, &categories))
            .collect();

        Ok(Self {
            layout: layout.clone(),
            categories,
            records,
        })
    }

    pub fn layout(&self) -> &TableLayout {
        &self.layout
    }

    /// Category columns in table order (sorted by name).
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn records(&self) -> &[BenefitRecord] {
        &self.records
    }

    pub fn card_names(&self) -> Vec<String> {
        self.records.iter().map(|record| record.card.clone()).collect()
    }

    pub fn get(&self, card: &str) -> Option<&BenefitRecord> {
        self.records.iter().find(|record| record.card == card)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Reads the benefit table at `path`, filling absent category values with each card's default.
pub fn load_table<P: AsRef<Path>>(
    path: P,
    layout: &TableLayout,
) -> Result<BenefitTable, DataLoadError> {
    let path = path.as_ref();
    let table = BenefitTable::from_path(path, layout)?;
    debug!(path = %path.display(), cards = table.len(), "benefit table loaded");
    Ok(table)
}

/// Returns a copy of `table` ordered by average category rate, highest first.
///
/// The sort is stable, so cards with equal averages keep their load order.
pub fn rank_by_average(table: &BenefitTable) -> BenefitTable {
    let mut ranked = table.clone();
    ranked.records.sort_by(|a, b| {
        let a = a.average_rate().unwrap_or(f64::NEG_INFINITY);
        let b = b.average_rate().unwrap_or(f64::NEG_INFINITY);
        b.total_cmp(&a)
    });
    ranked
}

/// Startup path: load the configured data file and rank it by average benefit.
pub fn prepare_benefits(config: &RewardsConfig) -> Result<BenefitTable, DataLoadError> {
    let table = load_table(&config.data_path, &TableLayout::default())?;
    let ranked = rank_by_average(&table);
    info!(
        cards = ranked.len(),
        categories = ranked.categories().len(),
        path = %config.data_path.display(),
        "benefit table prepared"
    );
    Ok(ranked)
}

#[derive(Debug)]
struct ParsedRow {
    card: String,
    bank: String,
    default_rate: f64,
    values: BTreeMap<String, Option<f64>>,
}

fn record_objects(
    value: Value,
    layout: &TableLayout,
) -> Result<Vec<Map<String, Value>>, DataLoadError> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(row, item)| match item {
                Value::Object(map) => Ok(map),
                _ => Err(DataLoadError::InvalidValue {
                    row,
                    column: "<record>".to_string(),
                    expected: "an object",
                }),
            })
            .collect(),
        Value::Object(by_card) => by_card
            .into_iter()
            .enumerate()
            .map(|(row, (card, item))| match item {
                Value::Object(mut map) => {
                    map.entry(layout.card_column.clone())
                        .or_insert(Value::String(card));
                    Ok(map)
                }
                _ => Err(DataLoadError::InvalidValue {
                    row,
                    column: card,
                    expected: "an object",
                }),
            })
            .collect(),
        _ => Err(DataLoadError::UnsupportedShape),
    }
}

fn parse_row(
    row: usize,
    mut map: Map<String, Value>,
    layout: &TableLayout,
) -> Result<ParsedRow, DataLoadError> {
    let card = take_string(&mut map, row, &layout.card_column)?;
    let bank = take_string(&mut map, row, &layout.bank_column)?;
    let default_rate = match map.remove(&layout.default_column) {
        Some(value) => number(&value).ok_or_else(|| DataLoadError::InvalidValue {
            row,
            column: layout.default_column.clone(),
            expected: "a number",
        })?,
        None => {
            return Err(DataLoadError::MissingColumn {
                row,
                column: layout.default_column.clone(),
            })
        }
    };
    map.remove(&layout.average_column);

    let mut values = BTreeMap::new();
    for (column, value) in map {
        let rate = match value {
            Value::Null => None,
            other => match number(&other) {
                Some(rate) => Some(rate),
                None => {
                    return Err(DataLoadError::InvalidValue {
                        row,
                        column,
                        expected: "a number or null",
                    })
                }
            },
        };
        values.insert(column, rate);
    }

    Ok(ParsedRow {
        card,
        bank,
        default_rate,
        values,
    })
}

fn take_string(
    map: &mut Map<String, Value>,
    row: usize,
    column: &str,
) -> Result<String, DataLoadError> {
    match map.remove(column) {
        Some(Value::String(value)) => Ok(value),
        Some(_) => Err(DataLoadError::InvalidValue {
            row,
            column: column.to_string(),
            expected: "a string",
        }),
        None => Err(DataLoadError::MissingColumn {
            row,
            column: column.to_string(),
        }),
    }
}

fn number(value: &Value) -> Option<f64> {
    value.as_f64().filter(|rate| rate.is_finite())
}

fn fill_defaults(row: ParsedRow, categories: &[String]) -> BenefitRecord {
    let rates = categories
        .iter()
        .map(|category| {
            let rate = row
                .values
                .get(category)
                .copied()
                .flatten()
                .unwrap_or(row.default_rate);
            (category.clone(), rate)
        })
        .collect();

    BenefitRecord {
        card: row.card,
        bank: row.bank,
        default_rate: row.default_rate,
        rates,
    }
}
