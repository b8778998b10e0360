use crate::model::{Company, Horizon, Stage};

/// Whether the latest delta falls outside one standard deviation of its
/// history's mean. History is every delta but the last; fewer than two
/// history samples cannot measure spread, so the result is `None`.
pub fn classify(deltas: &[f64]) -> Option<bool> {
    if deltas.len() < 3 {
        return None;
    }
    let (history, last) = deltas.split_at(deltas.len() - 1);
    let last = last[0];

    let avg = mean(history);
    let spread = sample_std_dev(history);
    Some(!(avg - spread <= last && last <= avg + spread))
}

/// Classifies both horizons of a company that has price history.
/// Returns false when the company was already classified or has no prices.
pub fn classify_company(company: &mut Company) -> bool {
    if company.stage >= Stage::SignificanceClassified || company.stage < Stage::PriceRetrieved {
        return false;
    }
    for horizon in Horizon::ALL {
        company.significant[horizon] = classify(&company.deltas[horizon]);
    }
    company.stage = Stage::SignificanceClassified;
    true
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator).
pub(crate) fn sample_std_dev(values: &[f64]) -> f64 {
    let avg = mean(values);
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}
