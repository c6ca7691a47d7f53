use approx::assert_abs_diff_eq;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use parlloyd::engine::{
    assign_partition, broadcast, reduce_partials, seed_centroids, update_centroids,
};
use parlloyd::{
    elbow_sweep, gaussian_blobs, KMeans, KMeansConfig, PointStore, SerialExecutor, Termination,
    ThreadPoolExecutor,
};

fn four_blob_store(std: f64, partitions: usize, data_seed: u64) -> PointStore {
    let centers = vec![
        vec![0.0, 0.0],
        vec![10.0, 0.0],
        vec![0.0, 10.0],
        vec![10.0, 10.0],
    ];
    let mut rng = ChaCha8Rng::seed_from_u64(data_seed);
    gaussian_blobs(&centers, 75, std, partitions, &mut rng).unwrap()
}

#[test]
fn heterogeneity_is_non_increasing() {
    let store = four_blob_store(1.0, 4, 1);
    let config = KMeansConfig::new(4).with_seed(9).with_tolerance(1e-6);
    let fit = KMeans::new(config).fit(&store, &SerialExecutor).unwrap();

    for pair in fit.metrics.windows(2) {
        let slack = 1e-9 * pair[0].heterogeneity.max(1.0);
        assert!(
            pair[1].heterogeneity <= pair[0].heterogeneity + slack,
            "heterogeneity rose from {} to {} at iteration {}",
            pair[0].heterogeneity,
            pair[1].heterogeneity,
            pair[1].iteration
        );
    }
}

#[test]
fn four_well_separated_blobs_converge_quickly() {
    let store = four_blob_store(0.6, 4, 2);
    let config = KMeansConfig::new(4)
        .with_max_iterations(50)
        .with_tolerance(1e-4)
        .with_seed(42);
    let fit = KMeans::new(config).fit(&store, &SerialExecutor).unwrap();

    assert_eq!(fit.termination, Termination::Converged);
    assert!(
        fit.iterations < 20,
        "took {} iterations to converge",
        fit.iterations
    );

    // Each true center must be matched by its own centroid within 0.5.
    let centers = [[0.0, 0.0], [10.0, 0.0], [0.0, 10.0], [10.0, 10.0]];
    let mut matched = Vec::new();
    for center in &centers {
        let (best_id, best_d2) = fit
            .centroids
            .iter()
            .enumerate()
            .map(|(id, v)| {
                let d2: f64 = v
                    .iter()
                    .zip(center)
                    .map(|(a, b)| (a - b) * (a - b))
                    .sum();
                (id, d2)
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .unwrap();
        assert!(
            best_d2.sqrt() < 0.5,
            "no centroid within 0.5 of {center:?}"
        );
        matched.push(best_id);
    }
    matched.sort_unstable();
    matched.dedup();
    assert_eq!(matched.len(), 4, "two centers shared a centroid");
}

#[test]
fn partition_count_does_not_change_the_result() {
    let single = four_blob_store(0.6, 1, 3);
    let split = PointStore::new(single.points().to_vec(), 8).unwrap();

    let config = KMeansConfig::new(4)
        .with_max_iterations(50)
        .with_tolerance(1e-4)
        .with_seed(42);
    let a = KMeans::new(config.clone())
        .fit(&single, &SerialExecutor)
        .unwrap();
    let b = KMeans::new(config).fit(&split, &SerialExecutor).unwrap();

    assert_eq!(a.iterations, b.iterations);
    assert_eq!(a.termination, b.termination);
    assert_eq!(a.cluster_sizes, b.cluster_sizes);
    for id in 0..4 {
        for (x, y) in a.centroids.vector(id).iter().zip(b.centroids.vector(id)) {
            assert_abs_diff_eq!(*x, *y, epsilon = 1e-8);
        }
    }
}

#[test]
fn serial_and_thread_pool_backends_agree() {
    let store = four_blob_store(0.6, 8, 4);
    let config = KMeansConfig::new(4).with_seed(7);
    let serial = KMeans::new(config.clone())
        .fit(&store, &SerialExecutor)
        .unwrap();
    let pooled = KMeans::new(config)
        .fit(&store, &ThreadPoolExecutor::new())
        .unwrap();

    assert_eq!(serial.iterations, pooled.iterations);
    assert_eq!(serial.cluster_sizes, pooled.cluster_sizes);
    for id in 0..4 {
        for (x, y) in serial
            .centroids
            .vector(id)
            .iter()
            .zip(pooled.centroids.vector(id))
        {
            assert_abs_diff_eq!(*x, *y, epsilon = 1e-12);
        }
    }
}

#[test]
fn one_more_lloyd_round_at_the_fixed_point_moves_nothing() {
    let store = four_blob_store(0.6, 4, 5);
    let config = KMeansConfig::new(4).with_seed(13);
    let tolerance = config.tolerance;
    let fit = KMeans::new(config).fit(&store, &SerialExecutor).unwrap();
    assert_eq!(fit.termination, Termination::Converged);

    // Re-run a full assignment/reduce/update round against the converged
    // centroids: the cluster sizes must match the reported fit and the
    // centroids must stay within tolerance of where they already are.
    let snapshot = broadcast(&fit.centroids);
    let partials: Vec<_> = (0..store.partition_count())
        .map(|i| assign_partition(store.partition(i), &snapshot))
        .collect();
    let aggregate = reduce_partials(partials, snapshot.k(), snapshot.dim());
    assert_eq!(aggregate.counts(), fit.cluster_sizes.as_slice());

    let outcome = update_centroids(&fit.centroids, &aggregate, &store, &SerialExecutor);
    assert!(outcome.recovered.is_empty());
    let max_displacement = outcome
        .displacements
        .iter()
        .copied()
        .fold(0.0_f64, f64::max);
    assert!(
        max_displacement <= tolerance,
        "fixed point moved by {max_displacement}"
    );
}

#[test]
fn second_centroid_is_drawn_proportionally_to_squared_distance() {
    // Three collinear points. Conditioned on the first centroid landing on
    // p0, the squared distances to p1 and p2 are 1 and 9, so p2 must be
    // chosen as the second centroid about 90% of the time.
    let store =
        PointStore::from_vecs(vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![3.0, 0.0]], 1).unwrap();
    let config = KMeansConfig::new(2);

    let mut first_on_p0 = 0u32;
    let mut picked_p2 = 0u32;
    for seed in 0..3000u64 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let set = seed_centroids(&store, &config, &mut rng, &SerialExecutor).unwrap();
        if set.vector(0) == [0.0, 0.0] {
            first_on_p0 += 1;
            if set.vector(1) == [3.0, 0.0] {
                picked_p2 += 1;
            }
        }
    }

    assert!(first_on_p0 > 800, "uniform first draw looks broken");
    let freq = f64::from(picked_p2) / f64::from(first_on_p0);
    assert!(
        (freq - 0.9).abs() < 0.05,
        "second-centroid frequency {freq} strays from d\u{00b2} weighting"
    );
}

#[test]
fn k_exceeding_natural_clusters_ends_non_degenerate() {
    // 3 well-separated blobs, k = 4: whatever happens mid-run, the final
    // centroid set must have no empty cluster.
    let centers = vec![vec![0.0, 0.0], vec![10.0, 0.0], vec![0.0, 10.0]];
    let mut rng = ChaCha8Rng::seed_from_u64(6);
    let store = gaussian_blobs(&centers, 100, 0.5, 4, &mut rng).unwrap();

    let config = KMeansConfig::new(4)
        .with_max_iterations(50)
        .with_tolerance(1e-4)
        .with_seed(21);
    let fit = KMeans::new(config).fit(&store, &SerialExecutor).unwrap();

    assert_eq!(fit.cluster_sizes.len(), 4);
    assert!(
        fit.cluster_sizes.iter().all(|&c| c > 0),
        "degenerate cluster survived recovery: {:?}",
        fit.cluster_sizes
    );
    assert_eq!(fit.cluster_sizes.iter().sum::<u64>(), 300);
}

#[test]
fn elbow_sweep_rewards_the_true_cluster_count() {
    let store = four_blob_store(0.6, 4, 7);
    let config = KMeansConfig::new(1).with_seed(17);
    let sweep = elbow_sweep(&store, &[1, 2, 4], &config, &SerialExecutor).unwrap();

    assert_eq!(sweep.len(), 3);
    let h: Vec<f64> = sweep.iter().map(|&(_, h)| h).collect();
    assert!(h[0] > h[1], "k=2 should beat k=1");
    assert!(h[1] > h[2], "k=4 should beat k=2");
    assert!(h[2] >= 0.0);
}
