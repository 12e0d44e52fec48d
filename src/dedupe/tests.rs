//! Keyword Dedupe Tests
//!
//! ## Test Scopes
//! - **Records**: CSV parsing and field access.
//! - **Model**: Comparators, training and settings persistence.
//! - **Blocking / Sampling**: Candidate pairs and pair samples.
//! - **Labeling**: The console loop driven from in-memory input.
//! - **Threshold / Clustering / Output**: The matching tail of the pipeline.

#[cfg(test)]
mod tests {
    use crate::dedupe::blocking::{MAX_BLOCK_SIZE, candidate_pairs};
    use crate::dedupe::cluster::{cluster_pairs, match_records};
    use crate::dedupe::labeling::{LabelStats, console_label, sample_pairs};
    use crate::dedupe::model::Comparator;
    use crate::dedupe::output::write_mappings;
    use crate::dedupe::records::read_records;
    use crate::dedupe::threshold::{RECALL_WEIGHT, threshold};
    use crate::dedupe::training::save_and_train;
    use crate::dedupe::types::{Label, NUM_HASH_COLUMNS, ScoredPair};
    use crate::dedupe::{
        Cluster, DedupeError, DedupeModel, KeywordRecord, RecordMap, TrainingPairs,
    };

    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn rec(id: i64, keyword: &str, cols: &[&str]) -> KeywordRecord {
        let mut columns: Vec<String> = cols.iter().map(|c| c.to_string()).collect();
        columns.resize(NUM_HASH_COLUMNS, String::new());
        KeywordRecord {
            id,
            keyword: keyword.to_string(),
            columns,
        }
    }

    fn record_map(records: Vec<KeywordRecord>) -> RecordMap {
        records.into_iter().map(|r| (r.id, r)).collect()
    }

    fn sample_training() -> TrainingPairs {
        TrainingPairs {
            matches: vec![
                (rec(1, "neural network", &["h1"]), rec(2, "neural networks", &["h1"])),
                (rec(3, "svm", &["h9"]), rec(4, "svms", &["h9"])),
            ],
            distinct: vec![
                (rec(5, "graph kernel", &["h2"]), rec(6, "bayes net", &["h3"])),
                (rec(7, "lasso", &["h4"]), rec(8, "boosting", &["h5"])),
            ],
        }
    }

    // ============================================================
    // RECORDS
    // ============================================================

    #[test]
    fn test_read_records() {
        let csv = "id,keyword,col_1,col_2\n1,Support Vector Machine,a,b\n2,SVM,a,\n";
        let records = read_records(csv.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        let first = &records[&1];
        assert_eq!(first.keyword, "Support Vector Machine");
        assert_eq!(first.columns.len(), NUM_HASH_COLUMNS);
        assert_eq!(first.field("col_2"), "b");
        assert_eq!(records[&2].field("col_2"), "");
        assert_eq!(records[&2].field("col_25"), "");
    }

    #[test]
    fn test_read_records_short_row() {
        let csv = "id,keyword,col_1,col_2\n1,svm\n2,lasso,h1\n";
        let records = read_records(csv.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[&1].keyword, "svm");
        assert_eq!(records[&1].field("col_1"), "");
        assert_eq!(records[&2].field("col_1"), "h1");
        assert_eq!(records[&2].field("col_2"), "");
    }

    #[test]
    fn test_read_records_duplicate_id() {
        let csv = "id,keyword\n1,svm\n1,svms\nx,lasso\n";
        let err = read_records(csv.as_bytes()).unwrap_err();

        // the bad id is on line 4 even though line 3 replaced record 1
        assert!(matches!(err, DedupeError::InvalidRecord { line: 4, .. }));

        let records = read_records("id,keyword\n1,svm\n1,svms\n".as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[&1].keyword, "svms");
    }

    #[test]
    fn test_read_records_bad_id() {
        let csv = "id,keyword\nabc,svm\n";
        let err = read_records(csv.as_bytes()).unwrap_err();

        assert!(matches!(err, DedupeError::InvalidRecord { line: 2, .. }));
    }

    #[test]
    fn test_record_field_names() {
        let record = rec(1, "lasso", &["x", "y"]);

        assert_eq!(record.field("keyword"), "lasso");
        assert_eq!(record.field("col_1"), "x");
        assert_eq!(record.field("col_0"), "");
        assert_eq!(record.field("title"), "");
    }

    // ============================================================
    // MODEL
    // ============================================================

    #[test]
    fn test_comparators() {
        assert_eq!(Comparator::Exact.compare("a", "a"), 1.0);
        assert_eq!(Comparator::Exact.compare("a", "b"), 0.0);
        assert_eq!(Comparator::Exact.compare("", ""), 0.0);
        assert_eq!(Comparator::String.compare("SVM", "svm"), 1.0);
        assert_eq!(Comparator::String.compare("svm", ""), 0.0);
        assert!(Comparator::String.compare("svm", "svms") > 0.5);
    }

    #[test]
    fn test_untrained_model_follows_keyword() {
        let model = DedupeModel::for_keywords();

        assert_eq!(model.fields.len(), NUM_HASH_COLUMNS + 1);
        assert!(model.score(&rec(1, "svm", &[]), &rec(2, "svm", &[])) > 0.5);
        assert!(model.score(&rec(1, "svm", &[]), &rec(2, "kernel", &[])) < 0.5);
    }

    #[test]
    fn test_train_separates_classes() {
        let mut model = DedupeModel::for_keywords();
        model.train(&sample_training()).unwrap();

        let same = model.score(&rec(10, "deep network", &["h7"]), &rec(11, "deep networks", &["h7"]));
        let different = model.score(&rec(12, "lasso", &["h8"]), &rec(13, "kernel", &["h6"]));
        assert!(same > 0.5, "same scored {}", same);
        assert!(different < 0.5, "different scored {}", different);
    }

    #[test]
    fn test_train_needs_both_classes() {
        let mut model = DedupeModel::for_keywords();
        let mut training = sample_training();
        training.distinct.clear();

        let err = model.train(&training).unwrap_err();
        assert!(matches!(
            err,
            DedupeError::NotEnoughTraining {
                matches: 2,
                distinct: 0
            }
        ));
    }

    #[test]
    fn test_settings_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings");
        let mut model = DedupeModel::for_keywords();
        model.train(&sample_training()).unwrap();

        model.save(&path).unwrap();
        assert_eq!(DedupeModel::load(&path).unwrap(), model);
    }

    // ============================================================
    // TRAINING FILE
    // ============================================================

    #[test]
    fn test_read_training_merges() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("training.json");
        sample_training().write_training(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"match\""));

        let mut training = TrainingPairs {
            matches: vec![],
            distinct: vec![(rec(20, "a", &[]), rec(21, "b", &[]))],
        };
        training.read_training(&path).unwrap();

        assert_eq!(training.matches.len(), 2);
        assert_eq!(training.distinct.len(), 3);
        assert!(training.contains(4, 3));
        assert!(!training.contains(1, 3));
    }

    #[test]
    fn test_save_and_train_keeps_pairs_when_training_fails() {
        let dir = tempfile::tempdir().unwrap();
        let training_file = dir.path().join("models").join("training.json");
        let settings_file = dir.path().join("models").join("settings");
        let training = TrainingPairs {
            matches: sample_training().matches,
            distinct: vec![],
        };
        let mut model = DedupeModel::for_keywords();

        let err = save_and_train(&mut model, &training, &training_file, &settings_file).unwrap_err();

        assert!(matches!(err, DedupeError::NotEnoughTraining { .. }));
        assert!(!settings_file.exists());
        let mut reloaded = TrainingPairs::default();
        reloaded.read_training(&training_file).unwrap();
        assert_eq!(reloaded, training);
    }

    #[test]
    fn test_save_and_train_writes_settings() {
        let dir = tempfile::tempdir().unwrap();
        let training_file = dir.path().join("training.json");
        let settings_file = dir.path().join("settings");
        let mut model = DedupeModel::for_keywords();

        save_and_train(&mut model, &sample_training(), &training_file, &settings_file).unwrap();

        assert!(training_file.exists());
        assert_eq!(DedupeModel::load(&settings_file).unwrap(), model);
    }

    // ============================================================
    // BLOCKING & SAMPLING
    // ============================================================

    #[test]
    fn test_candidate_pairs() {
        let records = record_map(vec![
            rec(1, "support vector machine", &["h1"]),
            rec(2, "Support Vector Machines", &["h2"]),
            rec(3, "graph kernel", &["h1"]),
            rec(4, "bayes", &[]),
        ]);

        assert_eq!(candidate_pairs(&records), vec![(1, 2), (1, 3)]);
    }

    #[test]
    fn test_oversized_blocks_skipped() {
        let records = record_map(
            (0..=MAX_BLOCK_SIZE as i64)
                .map(|id| rec(id, "net", &[]))
                .collect(),
        );

        assert!(candidate_pairs(&records).is_empty());
    }

    #[test]
    fn test_sample_pairs() {
        let records = record_map((1..=10).map(|id| rec(id, "net", &[])).collect());
        let mut rng = StdRng::seed_from_u64(7);

        let sample = sample_pairs(&records, 6, &mut rng);

        assert_eq!(sample.len(), 6);
        assert!(sample.iter().all(|(a, b)| a < b));
        let unique: HashSet<_> = sample.iter().collect();
        assert_eq!(unique.len(), 6);
    }

    #[test]
    fn test_sample_pairs_too_few_records() {
        let records = record_map(vec![rec(1, "net", &[])]);
        let mut rng = StdRng::seed_from_u64(7);

        assert!(sample_pairs(&records, 10, &mut rng).is_empty());
    }

    // ============================================================
    // CONSOLE LABELING
    // ============================================================

    #[test]
    fn test_label_parse() {
        assert_eq!(Label::parse("Y\n"), Some(Label::Match));
        assert_eq!(Label::parse(" n "), Some(Label::Distinct));
        assert_eq!(Label::parse("u"), Some(Label::Unsure));
        assert_eq!(Label::parse("f"), Some(Label::Finished));
        assert_eq!(Label::parse("maybe"), None);
    }

    #[test]
    fn test_console_label_session() {
        let records = record_map(vec![
            rec(1, "svm", &["h1"]),
            rec(2, "svms", &["h1"]),
            rec(3, "graph", &["h2"]),
            rec(4, "lasso", &["h3"]),
        ]);
        let mut model = DedupeModel::for_keywords();
        let mut training = TrainingPairs::default();
        let mut output = Vec::new();

        // the svm pair is the less certain one, so it is shown first
        let stats = console_label(
            &mut model,
            &records,
            &[(1, 2), (3, 4)],
            &mut training,
            "x\ny\nn\n".as_bytes(),
            &mut output,
        )
        .unwrap();

        assert_eq!(
            stats,
            LabelStats {
                matches: 1,
                distinct: 1,
                unsure: 0
            }
        );
        assert_eq!((training.matches[0].0.id, training.matches[0].1.id), (1, 2));
        assert_eq!((training.distinct[0].0.id, training.distinct[0].1.id), (3, 4));

        let shown = String::from_utf8(output).unwrap();
        assert!(shown.contains("keyword : svm"));
        assert!(shown.contains("col_1   : h1"));
        assert!(shown.contains("Please answer"));
    }

    #[test]
    fn test_console_label_finish_and_eof() {
        let records = record_map(vec![rec(1, "svm", &[]), rec(2, "svms", &[])]);
        let mut model = DedupeModel::for_keywords();
        let mut training = TrainingPairs::default();

        let stats = console_label(
            &mut model,
            &records,
            &[(1, 2)],
            &mut training,
            "f\n".as_bytes(),
            Vec::new(),
        )
        .unwrap();
        assert_eq!(stats, LabelStats::default());

        let stats = console_label(
            &mut model,
            &records,
            &[(1, 2)],
            &mut training,
            "".as_bytes(),
            Vec::new(),
        )
        .unwrap();
        assert_eq!(stats, LabelStats::default());
        assert!(training.is_empty());
    }

    #[test]
    fn test_console_label_skips_labeled_pairs() {
        let records = record_map(vec![rec(1, "svm", &[]), rec(2, "svms", &[])]);
        let mut model = DedupeModel::for_keywords();
        let mut training = TrainingPairs {
            matches: vec![(records[&2].clone(), records[&1].clone())],
            distinct: vec![],
        };
        let mut output = Vec::new();

        console_label(
            &mut model,
            &records,
            &[(1, 2)],
            &mut training,
            "y\n".as_bytes(),
            &mut output,
        )
        .unwrap();

        assert!(output.is_empty());
        assert_eq!(training.len(), 1);
    }

    #[test]
    fn test_console_label_fits_loaded_training() {
        let records = record_map(vec![rec(1, "svm", &[]), rec(2, "svms", &[])]);
        let mut model = DedupeModel::for_keywords();
        let mut training = sample_training();

        console_label(
            &mut model,
            &records,
            &[],
            &mut training,
            "".as_bytes(),
            Vec::new(),
        )
        .unwrap();

        let mut expected = DedupeModel::for_keywords();
        expected.train(&sample_training()).unwrap();
        assert_eq!(model, expected);
    }

    // ============================================================
    // THRESHOLD
    // ============================================================

    #[test]
    fn test_threshold_recall_weighted() {
        assert_eq!(threshold(&[0.1, 0.9, 0.8], RECALL_WEIGHT), 0.8);
    }

    #[test]
    fn test_threshold_empty() {
        assert_eq!(threshold(&[], RECALL_WEIGHT), 0.5);
    }

    // ============================================================
    // CLUSTERING
    // ============================================================

    #[test]
    fn test_cluster_pairs() {
        let scored = vec![
            ScoredPair { left: 1, right: 2, score: 0.9 },
            ScoredPair { left: 2, right: 3, score: 0.7 },
            ScoredPair { left: 4, right: 5, score: 0.4 },
            ScoredPair { left: 6, right: 7, score: 0.95 },
        ];

        let clusters = cluster_pairs(&scored, 0.5);

        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].ids, vec![1, 2, 3]);
        let expected = [0.9, 0.8, 0.7];
        for (got, want) in clusters[0].scores.iter().zip(expected) {
            assert!((got - want).abs() < 1e-9);
        }
        assert_eq!(clusters[1].ids, vec![6, 7]);
    }

    #[test]
    fn test_match_records() {
        let records = record_map(vec![
            rec(1, "svm", &["h1"]),
            rec(2, "svm", &["h1"]),
            rec(3, "kernel", &["h2"]),
        ]);

        let clusters = match_records(&records, &DedupeModel::for_keywords(), 0.5);

        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].ids, vec![1, 2]);
    }

    // ============================================================
    // OUTPUT
    // ============================================================

    #[test]
    fn test_write_mappings() {
        let records = record_map(vec![
            rec(1, "svm", &[]),
            rec(2, "support vector machine", &[]),
            rec(3, "svms", &[]),
            rec(4, "ab", &[]),
            rec(5, "cd", &[]),
        ]);
        let clusters = vec![
            Cluster {
                ids: vec![1, 2, 3],
                scores: vec![0.91234, 0.8, 0.7],
            },
            Cluster {
                ids: vec![4, 5],
                scores: vec![0.6, 0.6],
            },
        ];
        let mut out = Vec::new();

        let written = write_mappings(&mut out, &records, &clusters).unwrap();

        assert_eq!(written, 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "support vector machine\tsvms\t0.912\nab\tcd\t0.600\n"
        );
    }
}
