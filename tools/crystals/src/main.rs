use std::io::stdout;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::Parser;
use clap::ValueEnum;
use log::LevelFilter;

use crystal_graph::Lattice;
use crystal_graph::UniformNeighborhood;
use crystal_search::dump_to_directory;
use crystal_search::dump_to_writer;
use crystal_search::search;
use crystal_search::DumpFlags;
use crystal_search::Report;
use crystal_search::SearchConfig;
use crystal_search::Subset;
use crystal_utilities::CrystalError;
use crystal_utilities::Timing;

/// One of the lattices the crate ships built-in bases for. A custom basis can be
/// supplied instead with repeated `--basis` flags.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum BuiltinLattice {
    Square,
    Cubic,
    Triangular,
    Fcc,
}

impl BuiltinLattice {
    fn neighborhood(self) -> UniformNeighborhood {
        match self {
            BuiltinLattice::Square => UniformNeighborhood::square(),
            BuiltinLattice::Cubic => UniformNeighborhood::cubic(),
            BuiltinLattice::Triangular => UniformNeighborhood::triangular(),
            BuiltinLattice::Fcc => UniformNeighborhood::fcc(),
        }
    }
}

/// A quiet/verbose/debug verbosity flag, with `verbose` (the default) left implicit so
/// the tool is quiet-by-default in terms of argument noise but still reports progress at
/// the search's own `verbosity >= 1` level.
#[derive(Args, Debug)]
struct VerbosityFlag {
    #[arg(short, long, default_value_t = false, help = "Suppress progress logging")]
    quiet: bool,

    #[arg(short, long, default_value_t = false, help = "Log one line per completed search level (default)")]
    verbose: bool,

    #[arg(short, long, default_value_t = false, help = "Also log one line per popped crystal")]
    debug: bool,
}

impl VerbosityFlag {
    fn log_level_filter(&self) -> LevelFilter {
        if self.quiet {
            LevelFilter::Warn
        } else if self.debug {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }

    /// The `0..2` scale `SearchConfig::verbosity` expects.
    fn search_verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else if self.debug {
            2
        } else {
            1
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Enumerates and evaluates crystal configurations reachable by a local surface-energy-minimizing growth/shrink process", arg_required_else_help = true)]
struct Cli {
    /// A built-in lattice. Mutually exclusive with `--basis`.
    #[arg(long, value_enum)]
    lattice: Option<BuiltinLattice>,

    /// A custom neighborhood basis vector, comma-separated integers (e.g.
    /// `--basis 1,0,0`); repeat for each basis direction. Negations are added
    /// automatically. Mutually exclusive with `--lattice`.
    #[arg(long = "basis", value_parser = parse_vector)]
    basis: Vec<Vec<i64>>,

    /// Overrides/checks the dimension inferred from `--lattice`/`--basis`.
    #[arg(long)]
    dimension: Option<usize>,

    /// The target population size the search grows (or shrinks) towards.
    #[arg(long)]
    goal: usize,

    /// A seed vertex, comma-separated integers; repeat for each vertex in the initial
    /// crystal. Defaults to the empty crystal.
    #[arg(long = "seed", value_parser = parse_vector)]
    seed: Vec<Vec<i64>>,

    /// Allow shrink moves back towards the seed size during the search, not just
    /// growth moves towards `--goal`.
    #[arg(long)]
    bidi: bool,

    /// Deduplicate visited crystals up to lattice translation instead of by identity.
    #[arg(long = "ti")]
    translation_invariant: bool,

    /// Prune a popped crystal whose energy exceeds its level's current minimum by more
    /// than this, without expanding its children.
    #[arg(long = "require-energy")]
    require_energy: Option<u64>,

    /// Retain every visited crystal at each level, not just its statistics.
    #[arg(long)]
    collect: bool,

    /// Where to write the per-size crystal dumps: a directory, or `-` for stdout.
    /// Requires `--collect`.
    #[arg(long)]
    dump: Option<String>,

    #[command(flatten)]
    verbosity: VerbosityFlag,

    /// Print a summary of elapsed time per phase at the end of the run.
    #[arg(long)]
    timings: bool,
}

fn parse_vector(s: &str) -> Result<Vec<i64>, String> {
    s.split(',')
        .map(|part| part.trim().parse::<i64>().map_err(|e| format!("invalid integer component '{part}': {e}")))
        .collect()
}

fn build_neighborhood(cli: &Cli) -> Result<UniformNeighborhood, CrystalError> {
    let neighborhood = match (cli.lattice, cli.basis.is_empty()) {
        (Some(_), false) => {
            return Err(CrystalError::InvalidConfiguration("--lattice and --basis are mutually exclusive".to_string()));
        }
        (Some(name), true) => name.neighborhood(),
        (None, false) => UniformNeighborhood::from_basis(cli.basis.clone())?,
        (None, true) => {
            return Err(CrystalError::InvalidConfiguration("one of --lattice or --basis must be given".to_string()));
        }
    };

    if let Some(dimension) = cli.dimension {
        if neighborhood.dimension() != dimension {
            return Err(CrystalError::InvalidConfiguration(format!(
                "--dimension {dimension} does not match the inferred lattice dimension {}",
                neighborhood.dimension()
            )));
        }
    }

    Ok(neighborhood)
}

fn build_seed(lattice: &mut Lattice, cli: &Cli) -> Result<Subset, CrystalError> {
    let mut keys = Vec::with_capacity(cli.seed.len());
    for vertex in &cli.seed {
        keys.push(lattice.checked_intern(vertex.clone())?);
    }
    Ok(Subset::of(keys))
}

fn dump_flags(cli: &Cli, seed_size: usize) -> DumpFlags {
    DumpFlags {
        bidi: cli.bidi,
        translation_invariant: cli.translation_invariant,
        require_energy: cli.require_energy,
        seed_size,
    }
}

fn run(cli: Cli, timing: &mut Timing) -> Result<(), CrystalError> {
    let mut build_timer = timing.start("lattice construction");
    let neighborhood = build_neighborhood(&cli)?;
    let dimension = neighborhood.dimension();
    let mut lattice = Lattice::new(neighborhood);
    let seed = build_seed(&mut lattice, &cli)?;
    let seed_size = seed.size();
    build_timer.finish();

    let config = SearchConfig {
        seed,
        goal: cli.goal,
        bidi: cli.bidi,
        translation_invariant: cli.translation_invariant,
        collect: cli.collect,
        require_energy: cli.require_energy,
        verbosity: cli.verbosity.search_verbosity(),
    };

    let mut search_timer = timing.start("search");
    let result = search(lattice, &config)?;
    search_timer.finish();

    print!("{}", Report(&result));

    match (&cli.dump, &result.crystals) {
        (Some(_), None) => {
            log::warn!("--dump was given without --collect; no crystals were collected to dump");
        }
        (Some(dest), Some(crystals)) => {
            let mut dump_timer = timing.start("dump");
            let flags = dump_flags(&cli, seed_size);
            if dest == "-" {
                dump_to_writer(&mut stdout(), dimension, &result.lattice, result.seed_size, result.growing, crystals)?;
            } else {
                dump_to_directory(
                    &PathBuf::from(dest),
                    dimension,
                    &result.lattice,
                    result.seed_size,
                    result.growing,
                    crystals,
                    &flags,
                )?;
            }
            dump_timer.finish();
        }
        (None, _) => {}
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.verbosity.log_level_filter())
        .parse_default_env()
        .init();

    let mut timing = Timing::new();
    let print_timings = cli.timings;

    match run(cli, &mut timing) {
        Ok(()) => {
            if print_timings {
                timing.print();
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
