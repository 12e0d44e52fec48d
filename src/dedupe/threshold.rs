/// Weight given to recall over precision by the keyword driver.
pub const RECALL_WEIGHT: f64 = 1.5;

/// Score cut-off maximising a recall-weighted F-score.
///
/// Probabilities are treated as expected true duplicates: after sorting them
/// descending, the running sum up to cut `i` estimates the true positives
/// kept, so recall is `sum / total` and precision is `sum / (i + 1)`.
pub fn threshold(scores: &[f64], recall_weight: f64) -> f64 {
    if scores.is_empty() {
        return 0.5;
    }

    let mut sorted = scores.to_vec();
    sorted.sort_by(|a, b| b.total_cmp(a));

    let total: f64 = sorted.iter().sum();
    if total <= 0.0 {
        return sorted[0];
    }

    let weight_sq = recall_weight * recall_weight;
    let mut cumulative = 0.0;
    let mut best = (f64::NEG_INFINITY, sorted[0]);

    for (i, &score) in sorted.iter().enumerate() {
        cumulative += score;
        let recall = cumulative / total;
        let precision = cumulative / (i + 1) as f64;
        let denom = recall + weight_sq * precision;
        let f_score = if denom > 0.0 { recall * precision / denom } else { 0.0 };
        if f_score > best.0 {
            best = (f_score, score);
        }
    }

    best.1
}
