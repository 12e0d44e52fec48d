use super::blocking::candidate_pairs;
use super::error::DedupeError;
use super::model::DedupeModel;
use super::training::TrainingPairs;
use super::types::{KeywordRecord, Label, PairId, RecordMap, pair_id};

use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;
use std::io::{BufRead, Write};

pub const DEFAULT_SAMPLE_SIZE: usize = 15000;

/// Up to `n` distinct pairs: half from blocked candidates, the rest drawn uniformly.
pub fn sample_pairs<R: Rng>(records: &RecordMap, n: usize, rng: &mut R) -> Vec<PairId> {
    let mut seen = HashSet::new();
    let mut sample = Vec::with_capacity(n);

    let candidates = candidate_pairs(records);
    for &pair in candidates.choose_multiple(rng, n / 2) {
        if seen.insert(pair) {
            sample.push(pair);
        }
    }

    let ids: Vec<i64> = records.keys().copied().collect();
    if ids.len() < 2 {
        return sample;
    }
    let max_pairs = ids.len() * (ids.len() - 1) / 2;
    let mut attempts = 0;
    while sample.len() < n && seen.len() < max_pairs && attempts < n.saturating_mul(10) {
        attempts += 1;
        let a = ids[rng.gen_range(0..ids.len())];
        let b = ids[rng.gen_range(0..ids.len())];
        if a == b {
            continue;
        }
        let pair = pair_id(a, b);
        if seen.insert(pair) {
            sample.push(pair);
        }
    }

    tracing::info!("Sampled {} record pairs", sample.len());
    sample
}

/// Tally of one labeling session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelStats {
    pub matches: usize,
    pub distinct: usize,
    pub unsure: usize,
}

fn describe<W: Write>(output: &mut W, record: &KeywordRecord) -> std::io::Result<()> {
    writeln!(output, "keyword : {}", record.keyword)?;
    for (idx, value) in record.columns.iter().enumerate() {
        if !value.is_empty() {
            writeln!(output, "col_{:<4}: {}", idx + 1, value)?;
        }
    }
    Ok(())
}

/// Next unlabeled pair whose score is closest to 0.5.
fn most_uncertain(model: &DedupeModel, pending: &[(&KeywordRecord, &KeywordRecord)]) -> Option<usize> {
    pending
        .iter()
        .enumerate()
        .map(|(idx, (a, b))| (idx, (model.score(a, b) - 0.5).abs()))
        .min_by(|x, y| x.1.total_cmp(&y.1))
        .map(|(idx, _)| idx)
}

/// Interactive labeling loop.
///
/// Shows the most uncertain pair, reads `y`/`n`/`u`/`f` from `input` and
/// refits `model` once both classes have examples. Pairs loaded from an
/// earlier session are fitted before the first pick. Stops on `f`, end of
/// input or when every sampled pair has been shown.
pub fn console_label<R: BufRead, W: Write>(
    model: &mut DedupeModel,
    records: &RecordMap,
    sample: &[PairId],
    training: &mut TrainingPairs,
    mut input: R,
    mut output: W,
) -> Result<LabelStats, DedupeError> {
    let mut pending: Vec<(&KeywordRecord, &KeywordRecord)> = sample
        .iter()
        .filter(|(a, b)| !training.contains(*a, *b))
        .filter_map(|(a, b)| Some((records.get(a)?, records.get(b)?)))
        .collect();
    let mut stats = LabelStats::default();

    if training.has_both_classes() {
        model.train(training)?;
    }

    while let Some(idx) = most_uncertain(model, &pending) {
        let (left, right) = pending.swap_remove(idx);

        writeln!(output)?;
        describe(&mut output, left)?;
        writeln!(output)?;
        describe(&mut output, right)?;
        writeln!(
            output,
            "\n{} positive, {} negative",
            training.matches.len(),
            training.distinct.len()
        )?;

        let label = loop {
            writeln!(output, "Do these records refer to the same thing?")?;
            writeln!(output, "(y)es / (n)o / (u)nsure / (f)inished")?;
            output.flush()?;
            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                break Label::Finished;
            }
            match Label::parse(&line) {
                Some(label) => break label,
                None => writeln!(output, "Please answer y, n, u or f")?,
            }
        };

        match label {
            Label::Match => {
                training.matches.push((left.clone(), right.clone()));
                stats.matches += 1;
            }
            Label::Distinct => {
                training.distinct.push((left.clone(), right.clone()));
                stats.distinct += 1;
            }
            Label::Unsure => {
                stats.unsure += 1;
                continue;
            }
            Label::Finished => {
                writeln!(output, "Finished labeling")?;
                break;
            }
        }

        if training.has_both_classes() {
            model.train(training)?;
        }
    }

    Ok(stats)
}
