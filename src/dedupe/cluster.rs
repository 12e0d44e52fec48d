use super::blocking::candidate_pairs;
use super::model::DedupeModel;
use super::types::{Cluster, PairId, RecordMap, ScoredPair};

use std::collections::{BTreeMap, HashMap};

/// Union-find over record ids with path compression.
#[derive(Debug, Default)]
struct DisjointSet {
    parent: HashMap<i64, i64>,
}

impl DisjointSet {
    fn find(&mut self, id: i64) -> i64 {
        let parent = *self.parent.entry(id).or_insert(id);
        if parent == id {
            return id;
        }
        let root = self.find(parent);
        self.parent.insert(id, root);
        root
    }

    fn union(&mut self, a: i64, b: i64) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            // Smaller id becomes the root.
            let (root, child) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent.insert(child, root);
        }
    }
}

pub fn score_pairs(records: &RecordMap, model: &DedupeModel, pairs: &[PairId]) -> Vec<ScoredPair> {
    pairs
        .iter()
        .filter_map(|&(left, right)| {
            let a = records.get(&left)?;
            let b = records.get(&right)?;
            Some(ScoredPair {
                left,
                right,
                score: model.score(a, b),
            })
        })
        .collect()
}

/// Connected components of the pairs scoring at least `threshold`.
///
/// Each member's score is the mean of its retained edges. Clusters are
/// ordered by their smallest id.
pub fn cluster_pairs(scored: &[ScoredPair], threshold: f64) -> Vec<Cluster> {
    let mut set = DisjointSet::default();
    let mut edge_scores: HashMap<i64, (f64, usize)> = HashMap::new();

    for pair in scored.iter().filter(|p| p.score >= threshold) {
        set.union(pair.left, pair.right);
        for id in [pair.left, pair.right] {
            let entry = edge_scores.entry(id).or_insert((0.0, 0));
            entry.0 += pair.score;
            entry.1 += 1;
        }
    }

    let mut components: BTreeMap<i64, Vec<i64>> = BTreeMap::new();
    let ids: Vec<i64> = edge_scores.keys().copied().collect();
    for id in ids {
        let root = set.find(id);
        components.entry(root).or_default().push(id);
    }

    components
        .into_values()
        .filter(|members| members.len() >= 2)
        .map(|mut ids| {
            ids.sort_unstable();
            let scores = ids
                .iter()
                .map(|id| {
                    let (sum, count) = edge_scores[id];
                    sum / count as f64
                })
                .collect();
            Cluster { ids, scores }
        })
        .collect()
}

/// Scores every blocked pair and clusters those at or above `threshold`.
pub fn match_records(records: &RecordMap, model: &DedupeModel, threshold: f64) -> Vec<Cluster> {
    let scored = score_pairs(records, model, &candidate_pairs(records));
    cluster_pairs(&scored, threshold)
}
