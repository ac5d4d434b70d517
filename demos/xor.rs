use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use swarmnet::{network_sse, ActivationFunction, Dataset, NetworkSpec, PsoConfig, PsoTrainer};

fn main() -> swarmnet::Result<()> {
    let mut spec = NetworkSpec::new();
    spec.add_layer(2, ActivationFunction::Identity, true)
        .add_layer(2, ActivationFunction::Sigmoid, true)
        .add_layer(1, ActivationFunction::Sigmoid, false);
    let mut network = spec.finalize()?;

    let data = Dataset::from_rows(
        &[
            vec![1.0, 0.0],
            vec![1.0, 1.0],
            vec![0.0, 1.0],
            vec![0.0, 0.0],
        ],
        &[
            vec![1.0],
            vec![0.0],
            vec![1.0],
            vec![0.0],
        ],
    )?;

    let rng = ChaCha8Rng::seed_from_u64(42);
    let mut trainer = PsoTrainer::new(&network, data, PsoConfig::default(), rng)?;
    let iterations = 2000;

    for iteration in 0..iterations {
        let error = trainer.iterate();
        if iteration % 200 == 0 {
            println!("Iteration {iteration}: SSE = {error:.6}");
        }
        if error < 0.01 {
            println!("Iteration {iteration}: SSE = {error:.6} (target reached)");
            break;
        }
    }

    trainer.import_best(&mut network)?;
    for (input, _) in trainer.data().iter() {
        println!("Input: {:?} -> Output: {:.4}", input, network.forward(input)?[0]);
    }
    println!("Final SSE: {:.6}", network_sse(&mut network, trainer.data())?);
    Ok(())
}
