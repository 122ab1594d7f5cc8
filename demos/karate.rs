//! Affinity propagation on the karate-club layout.
//!
//! Usage: `cargo run --example karate [--features plot] [EMBEDDING_FILE]`
//!
//! Without a file argument the bundled 34-node layout is used. With the `plot`
//! feature, `karate.svg` is written next to the working directory.

use exemplar::dataset::{karate_layout, read_embeddings};
use exemplar::AffinityPropagation;
use tracing_subscriber::FmtSubscriber;

fn main() -> exemplar::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();

    let data = match std::env::args().nth(1) {
        Some(path) => read_embeddings(path, 2)?.points,
        None => karate_layout(),
    };

    let fit = AffinityPropagation::new()
        .with_preference(-50.0)
        .fit(&data)?;

    println!(
        "Estimated number of clusters: {} (converged: {}, rounds: {})",
        fit.n_clusters(),
        fit.converged,
        fit.n_iter
    );
    for &exemplar in &fit.exemplars {
        let p = &data[exemplar];
        println!(
            "  exemplar {:2} ({:7.1}, {:7.1}) <= {:?}",
            exemplar,
            p[0],
            p[1],
            fit.members(exemplar)
        );
    }

    #[cfg(feature = "plot")]
    {
        let svg = exemplar::render::report_svg(&data, &fit, "Karate dataset")?;
        std::fs::write("karate.svg", svg)?;
        println!("wrote karate.svg");
    }

    Ok(())
}
