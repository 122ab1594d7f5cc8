use exemplar::dataset::{karate_layout, parse_embeddings};
use exemplar::{AffinityPropagation, Error, NegEuclidean, SimilarityMatrix};

fn three_blobs() -> Vec<Vec<f32>> {
    vec![
        vec![0.0, 0.0],
        vec![0.3, 0.1],
        vec![0.1, 0.4],
        vec![-0.2, 0.2],
        vec![5.0, 5.0],
        vec![5.2, 4.9],
        vec![4.8, 5.3],
        vec![5.1, 5.2],
        vec![10.0, 0.0],
        vec![10.3, 0.2],
        vec![9.8, -0.1],
        vec![10.1, -0.3],
    ]
}

#[test]
fn higher_preference_never_gives_fewer_exemplars() {
    let data = three_blobs();
    let counts: Vec<usize> = [-500.0, -100.0, -20.0, -5.0, -1.0, -0.01]
        .into_iter()
        .map(|p| {
            AffinityPropagation::new()
                .with_preference(p)
                .with_max_iterations(500)
                .fit(&data)
                .unwrap()
                .n_clusters()
        })
        .collect();

    assert!(counts.windows(2).all(|w| w[0] <= w[1]), "{counts:?}");
    assert!(counts[0] < counts[counts.len() - 1], "{counts:?}");
}

#[test]
fn karate_with_small_negative_preference_keeps_every_node() {
    // Nearest neighbours are much further apart than sqrt(50), so no node
    // gives up being its own exemplar.
    let data = karate_layout();
    let fit = AffinityPropagation::new()
        .with_preference(-50.0)
        .fit(&data)
        .unwrap();

    assert!(fit.converged);
    assert_eq!(fit.n_clusters(), data.len());
    assert_eq!(fit.labels, (0..data.len()).collect::<Vec<_>>());
}

#[test]
fn karate_with_median_preference_groups_nodes() {
    let data = karate_layout();
    let fit = AffinityPropagation::new().fit(&data).unwrap();

    assert!(fit.converged);
    assert!(fit.n_clusters() > 1 && fit.n_clusters() < data.len());
    for &l in &fit.labels {
        assert!(fit.exemplars.contains(&l));
    }
    let linked = fit.links().count();
    assert_eq!(linked + fit.n_clusters(), data.len());
}

#[test]
fn embedding_file_to_clusters() {
    let text = "\
6 2
n1 0.0 0.0
n2 0.2 0.1
n3 0.1 0.3
n4 8.0 8.0
n5 8.1 8.2
n6 7.9 8.1
";
    let emb = parse_embeddings(text, 2).unwrap();
    assert_eq!(emb.len(), 6);

    let fit = AffinityPropagation::new().fit(&emb.points).unwrap();
    assert_eq!(fit.n_clusters(), 2);
    assert_eq!(fit.cluster_ids().unwrap(), vec![0, 0, 0, 1, 1, 1]);
}

#[test]
fn custom_similarity_and_precomputed_agree() {
    let data = three_blobs();
    let ap = AffinityPropagation::new()
        .with_preference(-3.0)
        .with_similarity(NegEuclidean);
    let m = SimilarityMatrix::from_points(&data, &NegEuclidean).unwrap();

    let direct = ap.fit(&data).unwrap();
    assert_eq!(direct, ap.fit_precomputed(&m).unwrap());
    assert_eq!(direct.n_clusters(), 3);
}

#[test]
fn invalid_input_is_reported() {
    let empty: Vec<Vec<f32>> = Vec::new();
    let ap = AffinityPropagation::new();
    assert!(ap.fit(&empty).unwrap_err().is_invalid_input());

    let ragged = vec![vec![0.0, 0.0], vec![1.0]];
    assert!(matches!(
        ap.fit(&ragged),
        Err(Error::DimensionMismatch { .. })
    ));

    for damping in [0.0, 1.0] {
        let err = AffinityPropagation::new()
            .with_damping(damping)
            .fit(&three_blobs())
            .unwrap_err();
        assert!(err.is_invalid_input());
    }
}

#[cfg(feature = "serde")]
#[test]
fn params_and_fit_serialize() {
    use exemplar::{AffinityFit, AffinityParams};

    let params: AffinityParams = serde_json::from_str(r#"{"preference": -50.0}"#).unwrap();
    assert_eq!(params.preference, Some(-50.0));
    assert_eq!(params.damping, AffinityParams::default().damping);

    let fit = AffinityPropagation::from_params(params)
        .fit(&karate_layout())
        .unwrap();
    let json = serde_json::to_string(&fit).unwrap();
    let back: AffinityFit = serde_json::from_str(&json).unwrap();
    assert_eq!(back, fit);
}
