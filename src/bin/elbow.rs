use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use parlloyd::{elbow_sweep, gaussian_blobs, KMeansConfig, ThreadPoolExecutor};

/// Prints an elbow curve for a synthetic 4-blob dataset. Pipe the output
/// into a plotting tool to eyeball the knee.
fn main() -> parlloyd::Result<()> {
    let centers = vec![
        vec![0.0, 0.0],
        vec![10.0, 0.0],
        vec![0.0, 10.0],
        vec![10.0, 10.0],
    ];
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let store = gaussian_blobs(&centers, 100, 0.8, 8, &mut rng)?;

    let config = KMeansConfig::new(1).with_seed(42);
    let ks: Vec<usize> = (1..=8).collect();
    for (k, heterogeneity) in elbow_sweep(&store, &ks, &config, &ThreadPoolExecutor::new())? {
        println!("{k}\t{heterogeneity:.4}");
    }
    Ok(())
}
