use card_rewards::config::RewardsConfig;
use card_rewards::error::AppError;
use card_rewards::rewards::{prepare_benefits, ExplorerSettings, RewardsExplorer};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Loads and ranks the configured benefit table once; the explorer is shared read-only.
pub(crate) fn load_explorer(config: &RewardsConfig) -> Result<Arc<RewardsExplorer>, AppError> {
    let table = prepare_benefits(config)?;
    Ok(Arc::new(RewardsExplorer::new(
        Arc::new(table),
        ExplorerSettings::from(config),
    )))
}

/// Parses `Category=amount` pairs such as `Gas=150` or `Online Shopping=75.5`.
pub(crate) fn parse_spend(raw: &str) -> Result<(String, f64), String> {
    let (category, amount) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected CATEGORY=AMOUNT, got '{raw}'"))?;

    let category = category.trim();
    if category.is_empty() {
        return Err(format!("missing category in '{raw}'"));
    }

    let amount = amount
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("failed to parse amount in '{raw}' ({err})"))?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(format!("amount in '{raw}' must be a non-negative number"));
    }

    Ok((category.to_string(), amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_spend_accepts_category_amount_pairs() {
        assert_eq!(parse_spend("Gas=150"), Ok(("Gas".to_string(), 150.0)));
        assert_eq!(
            parse_spend(" Online Shopping = 75.5 "),
            Ok(("Online Shopping".to_string(), 75.5))
        );
    }

    #[test]
    fn parse_spend_rejects_malformed_input() {
        assert!(parse_spend("Gas").is_err());
        assert!(parse_spend("=100").is_err());
        assert!(parse_spend("Gas=lots").is_err());
        assert!(parse_spend("Gas=-10").is_err());
    }

    #[test]
    fn load_explorer_propagates_missing_file() {
        let config = RewardsConfig {
            data_path: "./does-not-exist.json".into(),
            ..RewardsConfig::default()
        };
        match load_explorer(&config) {
            Err(AppError::Data(_)) => {}
            Err(other) => panic!("expected data error, got {other:?}"),
            Ok(_) => panic!("expected data error"),
        }
    }
}
