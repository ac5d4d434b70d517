use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use swarmnet::train::{StopReason, TrainConfig};
use swarmnet::{
    network_sse, parse_architecture, train_loop, Dataset, Network, NetError, PsoConfig, PsoTrainer,
};

fn xor_data() -> Dataset {
    Dataset::from_text_rows(2, 1, &["0,0,  0", "1,0,  1", "0,1,  1", "1,1,  0"]).unwrap()
}

fn xor_net() -> Network {
    parse_architecture("2:B->SIGMOID->2:B->SIGMOID->1", None, None).unwrap()
}

#[test]
fn xor_error_strictly_decreases_and_best_is_reproducible() {
    let mut net = xor_net();
    let mut trainer =
        PsoTrainer::new(&net, xor_data(), PsoConfig::default(), ChaCha8Rng::seed_from_u64(2024)).unwrap();
    let initial = trainer.best_error();
    assert!(initial.is_finite());

    let mut best = initial;
    for _ in 0..500 {
        best = trainer.iterate();
        if best < initial {
            break;
        }
    }
    assert!(best < initial, "no improvement over {}", initial);

    trainer.import_best(&mut net).unwrap();
    assert_eq!(network_sse(&mut net, trainer.data()).unwrap(), best);
}

#[test]
fn pseudo_asynchronous_swarm_also_learns() {
    let config = PsoConfig { pseudo_asynchronous_update: true, ..Default::default() };
    let mut trainer = PsoTrainer::new(&xor_net(), xor_data(), config, ChaCha8Rng::seed_from_u64(7)).unwrap();
    let initial = trainer.best_error();
    let summary = train_loop(&mut trainer, &TrainConfig::new(300, 0.0));
    assert_eq!(summary.stop_reason, StopReason::IterationLimit);
    assert!(summary.best_error < initial);
}

#[test]
fn parallel_and_sequential_training_agree() {
    let run = |threads: usize| {
        let config = PsoConfig { threads, max_position: Some(5.0), ..Default::default() };
        let mut trainer =
            PsoTrainer::new(&xor_net(), xor_data(), config, ChaCha8Rng::seed_from_u64(99)).unwrap();
        train_loop(&mut trainer, &TrainConfig::new(25, 0.0));
        (trainer.best_error(), trainer.best_vector().to_vec())
    };
    assert_eq!(run(1), run(3));
}

#[test]
fn mismatched_network_is_rejected_before_training() {
    let wide = parse_architecture("3:B->SIGMOID->1", None, None).unwrap();
    let result = PsoTrainer::new(&wide, xor_data(), PsoConfig::default(), ChaCha8Rng::seed_from_u64(1));
    assert!(matches!(result, Err(NetError::InputCountMismatch { network: 3, dataset: 2 })));
}
