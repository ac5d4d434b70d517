use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use anyhow::{anyhow, bail, Context, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use swarmnet::data::{csv, egb};
use swarmnet::train::{IterationStats, TrainConfig, TrainSummary};
use swarmnet::{
    network_sse, parse_architecture, train_loop, Dataset, Network, PsoConfig, PsoTrainer,
};

use crate::args::{Cli, Command, Options};

const XOR_ARCHITECTURE: &str = "2:B->SIGMOID->2:B->SIGMOID->1";
const CSV_DECIMALS: usize = 10;

pub fn run(cli: &Cli) -> Result<()> {
    let opts = &cli.options;
    info!(
        cores = thread::available_parallelism().map(|n| n.get()).unwrap_or(1),
        "swarmnet {}",
        env!("CARGO_PKG_VERSION")
    );

    match &cli.command {
        Command::Xor => xor(opts),
        Command::Benchmark => benchmark(opts),
        Command::Train { network, data } => train(opts, network, data),
        Command::Egb2csv { egb, csv } => egb_to_csv(egb, csv),
        Command::Csv2egb { csv, egb } => csv_to_egb(opts, csv, egb),
        Command::Create { network, method, architecture } => create(opts, network, method, architecture),
        Command::Randomize { network } => randomize(opts, network),
        Command::Error { network, data } => evaluate(network, data),
    }
}

// ---------------------------------------------------------------------------
// Subcommands
// ---------------------------------------------------------------------------

fn xor(opts: &Options) -> Result<()> {
    let data = Dataset::from_text_rows(2, 1, &["0,0,  0", "1,0,  1", "0,1,  1", "1,1,  0"])?;
    let mut net = parse_architecture(XOR_ARCHITECTURE, None, None)?;

    let mut trainer = PsoTrainer::new(&net, data, pso_config(opts)?, rng(opts))?;
    train_with_progress(&mut trainer, opts.iterations.unwrap_or(5_000), opts.target_error, false)?;
    trainer.import_best(&mut net)?;

    println!("\nResults:");
    for (input, _) in trainer.data().iter() {
        let output = net.forward(input)?;
        println!("[{:.8} {:.8}] = {:.8}", input[0], input[1], output[0]);
    }
    println!("Error: {:.4}", network_sse(&mut net, trainer.data())?);
    Ok(())
}

fn benchmark(opts: &Options) -> Result<()> {
    let input_count = opts.input.unwrap_or(10);
    let ideal_count = opts.ideal.unwrap_or(1);
    let records = opts.records.unwrap_or(10_000);
    let iterations = opts.iterations.unwrap_or(100);

    println!("\nPerforming benchmark");
    println!("Input Count: {}", input_count);
    println!("Ideal Count: {}", ideal_count);
    println!("Records: {}", records);
    println!("Iterations: {}", iterations);

    let mut rng = rng(opts);
    let data = Dataset::generate_random(input_count, ideal_count, records, -1.0, 1.0, &mut rng)?;
    let mut net = parse_architecture("?:B->TANH->50:B->TANH->?", Some(input_count), Some(ideal_count))?;
    net.randomize_range(&mut rng, -1.0, 1.0)?;

    let start = Instant::now();
    let mut trainer = PsoTrainer::new(&net, data, pso_config(opts)?, rng)?;
    for _ in 0..iterations {
        trainer.iterate();
    }
    println!("Benchmark time(seconds): {:.2}", start.elapsed().as_secs_f64());
    Ok(())
}

fn train(opts: &Options, network_path: &str, data_path: &str) -> Result<()> {
    let data = egb::load(data_path).with_context(|| format!("loading {}", data_path))?;
    println!("Training");
    print_counts(&data);

    let mut net = Network::load_json(network_path).with_context(|| format!("loading {}", network_path))?;
    check_shape(&net, &data)?;

    println!("Please wait...creating particles.");
    let mut trainer = PsoTrainer::new(&net, data, pso_config(opts)?, rng(opts))?;
    let summary = train_with_progress(
        &mut trainer,
        opts.iterations.unwrap_or(usize::MAX),
        opts.target_error,
        true,
    )?;

    trainer.import_best(&mut net)?;
    net.save_json(network_path)?;
    println!(
        "Training done: {} iterations, {:.2}s, final SSE {:.6}",
        summary.iterations,
        summary.elapsed_ms as f64 / 1000.0,
        summary.best_error
    );
    Ok(())
}

fn egb_to_csv(egb_path: &str, csv_path: &str) -> Result<()> {
    let data = egb::load(egb_path).with_context(|| format!("loading {}", egb_path))?;
    println!("Converting EGB to CSV");
    print_counts(&data);
    println!("Source File: {}", egb_path);
    println!("Target File: {}", csv_path);
    csv::save(csv_path, &data, CSV_DECIMALS)?;
    println!("Conversion done.");
    Ok(())
}

fn csv_to_egb(opts: &Options, csv_path: &str, egb_path: &str) -> Result<()> {
    let (Some(input_count), Some(ideal_count)) = (opts.input, opts.ideal) else {
        bail!("You must specify both input and ideal counts (--input and --ideal).");
    };
    let data = csv::load(csv_path, input_count, ideal_count)
        .with_context(|| format!("loading {}", csv_path))?;
    println!("Converting CSV to EGB");
    print_counts(&data);
    println!("Source File: {}", csv_path);
    println!("Target File: {}", egb_path);
    egb::save(egb_path, &data)?;
    println!("Conversion done.");
    Ok(())
}

fn create(opts: &Options, network_path: &str, method: &str, architecture: &str) -> Result<()> {
    if !method.eq_ignore_ascii_case("basic") {
        bail!("unsupported network method '{}', expected 'basic'", method);
    }
    println!("Creating neural network");
    println!("Method: {}", method);
    println!("Architecture: {}", architecture);

    let mut net = parse_architecture(architecture, opts.input, opts.ideal)?;
    net.randomize_range(&mut rng(opts), -1.0, 1.0)?;
    println!("Input Count: {}", net.input_count());
    println!("Output Count: {}", net.output_count());

    net.save_json(network_path)?;
    println!("Network Saved");
    Ok(())
}

fn randomize(opts: &Options, network_path: &str) -> Result<()> {
    let mut net = Network::load_json(network_path).with_context(|| format!("loading {}", network_path))?;
    net.randomize_range(&mut rng(opts), -1.0, 1.0)?;
    net.save_json(network_path)?;
    println!("Network randomized and saved.");
    Ok(())
}

fn evaluate(network_path: &str, data_path: &str) -> Result<()> {
    let data = egb::load(data_path).with_context(|| format!("loading {}", data_path))?;
    println!("Evaluate Error");
    print_counts(&data);

    let mut net = Network::load_json(network_path).with_context(|| format!("loading {}", network_path))?;
    check_shape(&net, &data)?;
    println!("SSE Error: {:.6}", network_sse(&mut net, &data)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Runs `train_loop`, printing progress from a reporter thread.
///
/// With `every_iteration` unset only every 100th generation is printed.
fn train_with_progress(
    trainer: &mut PsoTrainer,
    max_iterations: usize,
    target_error: f64,
    every_iteration: bool,
) -> Result<TrainSummary> {
    let (tx, rx) = mpsc::channel::<IterationStats>();
    let reporter = thread::spawn(move || {
        for stats in rx {
            if every_iteration || stats.iteration % 100 == 1 {
                println!("Iteration #{}, Error: {:.6}", stats.iteration, stats.best_error);
            }
        }
    });

    let mut config = TrainConfig::new(max_iterations, target_error);
    config.progress_tx = Some(tx);
    let summary = train_loop(trainer, &config);
    drop(config);
    join_reporter(reporter)?;
    Ok(summary)
}

fn join_reporter(reporter: thread::JoinHandle<()>) -> Result<()> {
    reporter
        .join()
        .map_err(|_| anyhow!("progress reporter thread panicked"))
}

fn pso_config(opts: &Options) -> Result<PsoConfig> {
    let mut config = match &opts.config {
        Some(path) => PsoConfig::load_json(path).with_context(|| format!("loading {}", path))?,
        None => PsoConfig::default(),
    };
    if let Some(threads) = opts.threads {
        config.threads = threads;
    }
    Ok(config)
}

fn rng(opts: &Options) -> ChaCha8Rng {
    match opts.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn print_counts(data: &Dataset) {
    println!("Input Count: {}", data.input_count());
    println!("Ideal Count: {}", data.ideal_count());
    println!("Record Count: {}", data.record_count());
}

fn check_shape(net: &Network, data: &Dataset) -> Result<()> {
    if data.input_count() != net.input_count() {
        bail!("The network has a different input count than the training data.");
    }
    if data.ideal_count() != net.output_count() {
        bail!("The network has a different output count than the training data.");
    }
    Ok(())
}
