use clap::Parser;
use lattice_pimc::{read_config, run_and_report, write_results, ActionKind, PotentialKind};

#[derive(Parser, Debug)]
#[command(version, about = "Energy gaps from lattice path integral Monte Carlo", long_about = None)]
struct Args {
    #[arg(short, long, default_value = "config.yml")]
    config: String,

    /// Override the master seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Override the potential (harmonic | quartic | anharmonic)
    #[arg(short, long)]
    potential: Option<PotentialKind>,

    /// Override the action (standard | improved)
    #[arg(short, long)]
    action: Option<ActionKind>,

    /// Override the ensemble sizes, e.g. --n-cf 25,100,1000
    #[arg(long, value_delimiter = ',')]
    n_cf: Vec<usize>,

    #[arg(short, long)]
    bootstrap_samples: Option<usize>,

    /// Keep the raw correlator tables in the output file
    #[arg(long)]
    keep_ensemble: bool,

    /// Write results as YAML to this file
    #[arg(short, long)]
    output: Option<String>,
}

fn run(args: Args) -> lattice_pimc::Result<()> {
    let mut config = read_config(&args.config)?;
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(potential) = args.potential {
        config.potential = potential;
    }
    if let Some(action) = args.action {
        config.action = action;
    }
    if !args.n_cf.is_empty() {
        config.n_cf = args.n_cf;
    }
    if let Some(n) = args.bootstrap_samples {
        config.bootstrap_samples = n;
    }
    config.keep_ensemble |= args.keep_ensemble;

    let results = run_and_report(config)?;

    if let Some(path) = args.output {
        write_results(&path, &results)?;
        println!("Results written to {}", path);
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    if let Err(err) = run(args) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
