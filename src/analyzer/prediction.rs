use crate::model::{Company, Horizon, PerHorizon, Prediction, RelationBounds, StorageError};
use crate::storage::SqliteStorage;

/// Weights at or above this mark a company as "mainly related".
const RELATED_WEIGHT_FLOOR: f64 = 0.5;

/// Synthesizes the target's prediction for both horizons from its own latest
/// move plus relation-weighted influence from every other company whose move
/// was classified significant for that horizon.
///
/// Pure reads: no record is mutated. A horizon is `None` when the target is
/// not classified yet or has no usable price history for it.
pub fn predict(
    companies: &[Company],
    target: usize,
    storage: &SqliteStorage,
    bounds: RelationBounds,
) -> Result<PerHorizon<Option<Prediction>>, StorageError> {
    let mut result = PerHorizon::default();
    for horizon in Horizon::ALL {
        result[horizon] = predict_horizon(companies, target, storage, bounds, horizon)?;
    }
    Ok(result)
}

fn predict_horizon(
    companies: &[Company],
    target: usize,
    storage: &SqliteStorage,
    bounds: RelationBounds,
    horizon: Horizon,
) -> Result<Option<Prediction>, StorageError> {
    let current = &companies[target];
    if current.significant[horizon].is_none() {
        return Ok(None);
    }
    let (Some(own_delta), Some(price)) = (
        current.latest_delta(horizon),
        current.latest_price(horizon),
    ) else {
        return Ok(None);
    };

    // (name, weight, latest delta) of every significantly moving other company
    let mut weighted: Vec<(String, f64, f64)> = Vec::new();
    for (idx, other) in companies.iter().enumerate() {
        if idx == target || other.significant[horizon] != Some(true) {
            continue;
        }
        let Some(delta) = other.latest_delta(horizon) else {
            continue;
        };
        let Some(value) = storage.relation_value(&current.name, &other.name)? else {
            continue;
        };
        weighted.push((other.name.clone(), bounds.weight(value), delta));
    }

    let influence: f64 = weighted.iter().map(|(_, weight, delta)| delta * weight).sum();

    weighted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    let related = weighted
        .into_iter()
        .filter(|(_, weight, _)| *weight >= RELATED_WEIGHT_FLOOR)
        .map(|(name, weight, _)| (name, weight))
        .collect();

    let delta = own_delta + influence;
    Ok(Some(Prediction {
        delta,
        percent: delta / price * 100.0,
        related,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Stage;

    fn classified_company(name: &str, short_prices: Vec<f64>, significant: bool) -> Company {
        let mut company = Company::new(name, name);
        company.set_prices(Horizon::Short, short_prices);
        company.significant[Horizon::Short] = Some(significant);
        company.stage = Stage::SignificanceClassified;
        company
    }

    fn bounds_0_100() -> RelationBounds {
        RelationBounds { max: 100.0, min: 0.0 }
    }

    #[test]
    fn combines_own_delta_with_weighted_influence() {
        let storage = SqliteStorage::in_memory().unwrap();
        storage.save_relation("Acme", "Globex", &[], 50.0).unwrap();

        let companies = vec![
            classified_company("Acme", vec![100.0, 102.0], false),
            // latest delta 4
            classified_company("Globex", vec![50.0, 54.0], true),
        ];

        let result = predict(&companies, 0, &storage, bounds_0_100()).unwrap();
        let short = result[Horizon::Short].as_ref().unwrap();

        // own delta 2 plus 4 * 0.5
        assert!((short.delta - 4.0).abs() < 1e-12);
        assert!((short.percent - (4.0 / 102.0 * 100.0)).abs() < 1e-12);
        assert_eq!(short.related, vec![("Globex".to_string(), 0.5)]);
    }

    #[test]
    fn related_floor_is_inclusive_at_exactly_half() {
        let storage = SqliteStorage::in_memory().unwrap();
        storage.save_relation("Acme", "Globex", &[], 50.0).unwrap();
        storage.save_relation("Acme", "Initech", &[], 49.999).unwrap();

        let companies = vec![
            classified_company("Acme", vec![100.0, 101.0], false),
            classified_company("Globex", vec![10.0, 11.0], true),
            classified_company("Initech", vec![10.0, 11.0], true),
        ];

        let result = predict(&companies, 0, &storage, bounds_0_100()).unwrap();
        let short = result[Horizon::Short].as_ref().unwrap();

        let names: Vec<&str> = short.related.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Globex"]);
        // the excluded company still contributes influence
        let expected = 1.0 + 1.0 * 0.5 + 1.0 * 0.49999;
        assert!((short.delta - expected).abs() < 1e-9);
    }

    #[test]
    fn related_list_is_sorted_by_descending_weight() {
        let storage = SqliteStorage::in_memory().unwrap();
        storage.save_relation("Acme", "Globex", &[], 60.0).unwrap();
        storage.save_relation("Acme", "Initech", &[], 90.0).unwrap();

        let companies = vec![
            classified_company("Acme", vec![100.0, 101.0], false),
            classified_company("Globex", vec![10.0, 11.0], true),
            classified_company("Initech", vec![10.0, 11.0], true),
        ];

        let result = predict(&companies, 0, &storage, bounds_0_100()).unwrap();
        let short = result[Horizon::Short].as_ref().unwrap();

        let names: Vec<&str> = short.related.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Initech", "Globex"]);
    }

    #[test]
    fn quiet_companies_contribute_nothing() {
        let storage = SqliteStorage::in_memory().unwrap();
        storage.save_relation("Acme", "Globex", &[], 100.0).unwrap();

        let companies = vec![
            classified_company("Acme", vec![100.0, 102.0], false),
            classified_company("Globex", vec![50.0, 54.0], false),
        ];

        let result = predict(&companies, 0, &storage, bounds_0_100()).unwrap();
        let short = result[Horizon::Short].as_ref().unwrap();

        assert!((short.delta - 2.0).abs() < 1e-12);
        assert!(short.related.is_empty());
    }

    #[test]
    fn degenerate_bounds_fall_back_to_own_movement() {
        let storage = SqliteStorage::in_memory().unwrap();
        storage.save_relation("Acme", "Globex", &[], 7.0).unwrap();

        let companies = vec![
            classified_company("Acme", vec![100.0, 102.0], false),
            classified_company("Globex", vec![50.0, 54.0], true),
        ];
        let degenerate = RelationBounds { max: 7.0, min: 7.0 };

        let result = predict(&companies, 0, &storage, degenerate).unwrap();
        let short = result[Horizon::Short].as_ref().unwrap();

        assert!((short.delta - 2.0).abs() < 1e-12);
        assert!(short.related.is_empty());
    }

    #[test]
    fn horizons_resolve_independently() {
        let storage = SqliteStorage::in_memory().unwrap();
        let mut company = classified_company("Acme", vec![100.0, 102.0], false);
        // long horizon was never classified
        company.significant[Horizon::Long] = None;
        let companies = vec![company];

        let result = predict(&companies, 0, &storage, bounds_0_100()).unwrap();
        assert!(result[Horizon::Short].is_some());
        assert!(result[Horizon::Long].is_none());
    }

    #[test]
    fn unclassified_target_predicts_nothing() {
        let storage = SqliteStorage::in_memory().unwrap();
        let mut company = Company::new("ACME", "Acme");
        company.set_prices(Horizon::Short, vec![100.0, 102.0]);
        let companies = vec![company];

        let result = predict(&companies, 0, &storage, bounds_0_100()).unwrap();
        assert!(result[Horizon::Short].is_none());
        assert!(result[Horizon::Long].is_none());
    }
}
