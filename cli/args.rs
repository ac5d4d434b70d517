use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "swarmnet")]
#[command(about = "Train feedforward networks with particle swarm optimization", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub options: Options,
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct Options {
    /// Number of input columns
    #[arg(long, global = true)]
    pub input: Option<usize>,

    /// Number of ideal (target) columns
    #[arg(long, global = true)]
    pub ideal: Option<usize>,

    /// Number of records to generate
    #[arg(long, global = true)]
    pub records: Option<usize>,

    /// Generation cap for training
    #[arg(long, global = true)]
    pub iterations: Option<usize>,

    /// Worker threads for fitness evaluation (0 = one per core)
    #[arg(long, global = true)]
    pub threads: Option<usize>,

    /// Seed for a reproducible run
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// JSON file with particle swarm settings
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Stop once the SSE reaches this value
    #[arg(long, global = true, default_value_t = 0.01)]
    pub target_error: f64,

    /// Log filter (e.g. "info", "swarmnet=debug")
    #[arg(short, long, global = true, default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand)]
pub enum Command {
    /// Train a 2-2-1 network on XOR and print its answers
    Xor,

    /// Time training on random data
    Benchmark,

    /// Train a saved network on a binary dataset and save it back
    Train {
        /// Network JSON file
        network: String,
        /// Binary dataset file
        data: String,
    },

    /// Convert a binary dataset to CSV
    Egb2csv {
        egb: String,
        csv: String,
    },

    /// Convert a CSV dataset to binary (needs --input and --ideal)
    Csv2egb {
        csv: String,
        egb: String,
    },

    /// Build a network from an architecture string and save it
    Create {
        /// Network JSON file to write
        network: String,
        /// Network type; only "basic" is supported
        method: String,
        /// Architecture, e.g. "?:B->SIGMOID->5:B->SIGMOID->?" (quote it in the shell)
        architecture: String,
    },

    /// Randomize a saved network's weights in [-1, 1]
    Randomize {
        network: String,
    },

    /// Report a saved network's SSE on a binary dataset
    Error {
        network: String,
        data: String,
    },
}
