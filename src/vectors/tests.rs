//! Vector Module Tests
//!
//! ## Test Scopes
//! - **SimilarityMatrix**: Row ranking, tie order, unknown documents and shape checks.
//! - **DocEmbeddings**: Cosine ranking with self-exclusion.
//! - **Loading**: Optional artifacts and bincode files on disk.

#[cfg(test)]
mod tests {
    use crate::vectors::similarity::{DOC2VEC_FILE, TOPIC_SIMS_FILE};
    use crate::vectors::types::cosine;
    use crate::vectors::{DocEmbeddings, SimilarityKind, SimilarityMatrix, VectorResources};

    fn sample_matrix() -> SimilarityMatrix {
        // doc ids at corpus positions 0..4
        let doc_ids = vec![101, 205, 307, 412];
        #[rustfmt::skip]
        let scores = vec![
            1.0, 0.2, 0.9, 0.5,
            0.2, 1.0, 0.3, 0.3,
            0.9, 0.3, 1.0, 0.1,
            0.5, 0.3, 0.1, 1.0,
        ];
        SimilarityMatrix::new(doc_ids, scores).unwrap()
    }

    // ============================================================
    // SIMILARITY MATRIX
    // ============================================================

    #[test]
    fn test_top_matches_sorted_by_score() {
        let matrix = sample_matrix();

        assert_eq!(matrix.top_matches(101, 6), vec![101, 307, 412, 205]);
    }

    #[test]
    fn test_top_matches_truncates() {
        let matrix = sample_matrix();

        assert_eq!(matrix.top_matches(307, 2), vec![307, 101]);
    }

    #[test]
    fn test_top_matches_ties_keep_corpus_order() {
        let matrix = sample_matrix();

        // 307 and 412 both score 0.3 against 205
        assert_eq!(matrix.top_matches(205, 3), vec![205, 307, 412]);
    }

    #[test]
    fn test_top_matches_unknown_doc() {
        assert!(sample_matrix().top_matches(999, 5).is_empty());
    }

    #[test]
    fn test_matrix_rejects_wrong_shape() {
        assert!(SimilarityMatrix::new(vec![1, 2], vec![1.0, 0.5, 0.5]).is_err());
    }

    #[test]
    fn test_similarity_kind_parse() {
        assert_eq!("topic".parse::<SimilarityKind>().unwrap(), SimilarityKind::Topic);
        assert_eq!("w2v".parse::<SimilarityKind>().unwrap(), SimilarityKind::W2v);
        assert!("lsa".parse::<SimilarityKind>().is_err());
    }

    // ============================================================
    // DOC EMBEDDINGS
    // ============================================================

    #[test]
    fn test_cosine_zero_vector() {
        assert_eq!(cosine(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
        assert!((cosine(&[1.0, 0.0], &[2.0, 0.0]) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_most_similar_excludes_self() {
        let embeddings = DocEmbeddings::new(
            vec![1, 2, 3, 4],
            2,
            vec![
                1.0, 0.0, // 1
                0.9, 0.1, // 2: almost parallel to 1
                0.0, 1.0, // 3: orthogonal
                -1.0, 0.0, // 4: opposite
            ],
        )
        .unwrap();

        let similar = embeddings.most_similar(1, 5);
        let ids: Vec<i64> = similar.iter().map(|(id, _)| *id).collect();

        assert_eq!(ids, vec![2, 3, 4]);
        assert!(similar[0].1 > 0.9);
        assert!(similar[2].1 < 0.0);
    }

    #[test]
    fn test_most_similar_topn_and_unknown() {
        let embeddings =
            DocEmbeddings::new(vec![1, 2, 3], 1, vec![1.0, 2.0, -1.0]).unwrap();

        assert_eq!(embeddings.most_similar(1, 1).len(), 1);
        assert!(embeddings.most_similar(42, 3).is_empty());
    }

    #[test]
    fn test_embeddings_reject_wrong_shape() {
        assert!(DocEmbeddings::new(vec![1, 2], 3, vec![0.0; 5]).is_err());
    }

    // ============================================================
    // LOADING
    // ============================================================

    #[test]
    fn test_load_resources_from_disk() {
        let data = tempfile::tempdir().unwrap();
        let models = tempfile::tempdir().unwrap();
        sample_matrix().save(&data.path().join(TOPIC_SIMS_FILE)).unwrap();
        DocEmbeddings::new(vec![7, 8], 2, vec![1.0, 0.0, 0.0, 1.0])
            .unwrap()
            .save(&models.path().join(DOC2VEC_FILE))
            .unwrap();

        let resources = VectorResources::load(data.path(), models.path()).unwrap();

        let topic = resources.matrix(SimilarityKind::Topic).unwrap();
        assert_eq!(topic.len(), 4);
        // the position index is rebuilt after decoding
        assert_eq!(topic.top_matches(412, 2), vec![412, 101]);
        assert!(resources.matrix(SimilarityKind::W2v).is_none());
        assert_eq!(resources.doc2vec.unwrap().most_similar(7, 1)[0].0, 8);
    }

    #[test]
    fn test_load_corrupt_file_is_error() {
        let data = tempfile::tempdir().unwrap();
        let models = tempfile::tempdir().unwrap();
        std::fs::write(data.path().join(TOPIC_SIMS_FILE), b"not bincode").unwrap();

        assert!(VectorResources::load(data.path(), models.path()).is_err());
    }
}
