//! Evaluate two-level predictors against a synthetic workload.

use clap::Parser;
use log::info;

use twolevel::*;
use twolevel::stats::*;
use twolevel::workload::*;

#[derive(Clone, Parser)]
#[command(
    name = "evaluate",
    about = "Run two-level adaptive branch predictors over a synthetic workload"
)]
struct Args {
    /// Predictor organizations to evaluate (default: all)
    #[arg(short, long)]
    variant: Vec<Variant>,

    /// Width of each branch history register
    #[arg(long, default_value_t = 4)]
    history_bits: usize,

    /// Width of each saturating counter
    #[arg(long, default_value_t = 2)]
    counter_bits: usize,

    /// Width of a branch address
    #[arg(long, default_value_t = 8)]
    address_bits: usize,

    /// Width of the set index
    #[arg(long, default_value_t = 4)]
    set_bits: usize,

    /// Number of dynamic branches to simulate
    #[arg(short, long, default_value_t = 10_000)]
    steps: usize,

    /// Seed for the random branches in the workload
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Print a snapshot of each predictor's final state
    #[arg(long)]
    monitor: bool,
}

fn run_test(p: &mut impl BranchPredictor, workload: Workload, steps: usize)
    -> Result<BranchStats, PredictorError>
{
    let mut stat = BranchStats::new();
    for (inst, outcome) in workload.take(steps) {
        let prediction = p.predict(&inst)?;
        p.update(&inst, outcome)?;
        stat.record(&inst, prediction, outcome);
    }
    Ok(stat)
}

fn main() -> Result<(), PredictorError> {
    env_logger::init();
    let args = Args::parse();

    let cfg = PredictorConfig {
        history_bits: args.history_bits,
        counter_bits: args.counter_bits,
        address_bits: args.address_bits,
        set_bits: args.set_bits,
        ..Default::default()
    };
    cfg.validate()?;
    info!("{:?}", cfg);

    let variants = if args.variant.is_empty() {
        Variant::ALL.to_vec()
    } else {
        args.variant.clone()
    };

    for variant in variants {
        let mut p = cfg.build(variant)?;
        let workload = Workload::mixed(cfg.address_bits, args.seed);
        let stat = run_test(&mut p, workload, args.steps)?;

        println!("  {:4} Global hit rate: {}/{} ({:.2}% correct) ({} misses)",
            p.name(),
            stat.global_hits(),
            stat.global_brns(),
            stat.hit_rate() * 100.0,
            stat.global_miss()
        );
        for (addr, data) in stat.get_low_rate_branches(2) {
            println!("       {} {:6}/{:6} {:.4}",
                render(addr), data.hits, data.occ, data.hit_rate()
            );
        }
        if args.monitor {
            println!("{}", p.monitor());
        }
    }
    Ok(())
}
