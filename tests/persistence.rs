use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use swarmnet::data::{csv, egb};
use swarmnet::{parse_architecture, Dataset, Network, NetworkSpec, PsoConfig};

fn bits(v: &[f64]) -> Vec<u64> {
    v.iter().map(|x| x.to_bits()).collect()
}

#[test]
fn network_save_then_load_is_exact() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("net.json");

    let mut rng = ChaCha8Rng::seed_from_u64(10);
    let mut net = parse_architecture("?:B->TANH->7:B->SIGMOID->3->TANH->?", Some(4), Some(2)).unwrap();
    net.randomize_range(&mut rng, -1.0, 1.0).unwrap();
    net.save_json(&path).unwrap();

    let mut loaded = Network::load_json(&path).unwrap();
    assert_eq!(loaded.layer_specs(), net.layer_specs());
    assert_eq!(loaded.activations(), net.activations());
    assert_eq!(loaded.layer_counts(), net.layer_counts());
    assert_eq!(loaded.layer_feed_counts(), net.layer_feed_counts());
    assert_eq!(loaded.layer_index(), net.layer_index());
    assert_eq!(loaded.weight_index(), net.weight_index());
    assert_eq!(bits(loaded.weights()), bits(net.weights()));

    let input = [0.1, -0.4, 0.9, 0.0];
    assert_eq!(loaded.forward(&input).unwrap(), net.forward(&input).unwrap());
}

#[test]
fn tampered_weight_vector_fails_to_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("net.json");
    std::fs::write(
        &path,
        r#"{ "layers": [
              { "count": 2, "activation": "Identity", "bias": true },
              { "count": 1, "activation": "Sigmoid", "bias": false } ],
            "weights": [0.5, 0.5] }"#,
    )
    .unwrap();
    assert!(Network::load_json(&path).is_err());
}

#[test]
fn spec_and_config_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let spec_path = dir.path().join("spec.json");
    let config_path = dir.path().join("pso.json");

    let mut spec = NetworkSpec::new();
    spec.add_layer(3, swarmnet::ActivationFunction::Identity, true)
        .add_layer(2, swarmnet::ActivationFunction::Tanh, false);
    spec.save_json(spec_path.to_str().unwrap()).unwrap();
    assert_eq!(NetworkSpec::load_json(spec_path.to_str().unwrap()).unwrap(), spec);

    let config = PsoConfig { population_size: 12, max_position: Some(4.0), threads: 2, ..Default::default() };
    config.save_json(config_path.to_str().unwrap()).unwrap();
    assert_eq!(PsoConfig::load_json(config_path.to_str().unwrap()).unwrap(), config);
}

#[test]
fn egb_and_csv_files_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let egb_path = dir.path().join("data.egb");
    let csv_path = dir.path().join("data.csv");

    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let data = Dataset::generate_random(5, 2, 40, -1.0, 1.0, &mut rng).unwrap();

    egb::save(&egb_path, &data).unwrap();
    let from_egb = egb::load(&egb_path).unwrap();
    assert_eq!(from_egb, data);

    csv::save(&csv_path, &data, 10).unwrap();
    let from_csv = csv::load(&csv_path, 5, 2).unwrap();
    assert_eq!(from_csv.record_count(), 40);
    for (a, b) in from_csv.as_flat().iter().zip(data.as_flat()) {
        assert!((a - b).abs() <= 1e-10);
    }
}
