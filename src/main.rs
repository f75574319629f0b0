use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{info, warn};

use pairalign::align::{align_pair, AlignConfig, FillOrder, SemiGlobalStart, Strategy};
use pairalign::io::fasta::FastaReader;
use pairalign::io::report;
use pairalign::scoring::{MatrixKind, MatrixMeta, ScoringModel, SubstitutionMatrix};
use pairalign::sequence::Sequence;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "pairalign", author, version, about = "Pairwise protein alignment by dynamic programming", arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Align the first two sequences of a FASTA file
    Align(AlignArgs),
    /// Write a built-in substitution matrix to a binary file usable with --matrix-file
    ExportMatrix {
        /// Matrix name: pam250, blosum62 or identity
        name: MatrixKind,
        /// Output path (defaults to <name>.bin)
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[derive(Args, Debug)]
struct AlignArgs {
    /// Input FASTA file; the first two records are aligned
    #[arg(short = 'f', long = "fasta")]
    fasta: String,
    /// Substitution matrix: pam250, blosum62 or identity
    #[arg(short = 'e', long = "exchange-matrix", default_value = "pam250")]
    exchange_matrix: MatrixKind,
    /// Substitution matrix file written by `export-matrix` (overrides -e)
    #[arg(long = "matrix-file")]
    matrix_file: Option<String>,
    /// Global alignment
    #[arg(short = 'g', long = "global")]
    global: bool,
    /// Local alignment
    #[arg(short = 'l', long = "local")]
    local: bool,
    /// Semi-global alignment
    #[arg(short = 's', long = "semi-global")]
    semi_global: bool,
    /// Gap penalty per gap column
    #[arg(short = 'p', long = "penalty", default_value_t = 2, allow_negative_numbers = true)]
    penalty: i32,
    /// File to store the alignment
    #[arg(short = 'o', long = "output", default_value = "output.align")]
    output: String,
    /// File to store the score matrix
    #[arg(short = 'm', long = "score-matrix", default_value = "output.matrix")]
    score_matrix: String,
    /// Also print the alignment and score matrix on the screen
    #[arg(short = 'v', long = "print")]
    print_on_screen: bool,
    /// Semi-global only: trace back from the best end cell instead of (n, m)
    #[arg(long = "trace-from-best")]
    trace_from_best: bool,
    /// Threads for the anti-diagonal matrix fill (1 = sequential fill)
    #[arg(short = 't', long = "threads", default_value_t = 1)]
    threads: usize,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Align(args) => run_align(args),
        Commands::ExportMatrix { name, output } => run_export_matrix(name, output),
    }
}

fn read_fasta(path: &str) -> Result<Vec<Sequence>> {
    let fh = std::fs::File::open(path).with_context(|| format!("cannot open FASTA '{}'", path))?;
    let mut reader = FastaReader::new(std::io::BufReader::new(fh));
    reader
        .read_sequences()
        .with_context(|| format!("cannot read FASTA '{}'", path))
}

fn run_align(args: AlignArgs) -> Result<()> {
    let strategy = Strategy::from_flags(args.global, args.local, args.semi_global)?;

    let matrix = match &args.matrix_file {
        Some(p) => SubstitutionMatrix::load_from_file(p)
            .with_context(|| format!("cannot load substitution matrix '{}'", p))?,
        None => SubstitutionMatrix::builtin(args.exchange_matrix),
    };
    info!("substitution matrix: {} (gap penalty {})", matrix.name, args.penalty);
    let scoring = ScoringModel::new(matrix, args.penalty)?;

    let sequences = read_fasta(&args.fasta)?;
    if sequences.len() < 2 {
        bail!("FASTA file '{}' contains {} sequence(s), need two", args.fasta, sequences.len());
    }
    if sequences.len() > 2 {
        warn!("FASTA file '{}' contains {} sequences, aligning the first two", args.fasta, sequences.len());
    }
    let (first, second) = (&sequences[0], &sequences[1]);
    info!("{}", first);
    info!("{}", second);

    let fill = if args.threads > 1 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(args.threads)
            .build_global()
            .context("cannot build thread pool")?;
        FillOrder::AntiDiagonal
    } else {
        FillOrder::RowMajor
    };

    let semi_global_start = if args.trace_from_best {
        if strategy != Strategy::SemiGlobal {
            warn!("--trace-from-best only applies to semi-global alignment, ignoring");
        }
        SemiGlobalStart::BestCell
    } else {
        SemiGlobalStart::SequenceEnd
    };

    let config = AlignConfig { strategy, semi_global_start, fill };
    let out = align_pair(first, second, &scoring, &config)?;

    let res = &out.result;
    info!(
        "{} alignment: score={} length={} identity={:.1}% gaps={} cigar={}",
        strategy,
        res.score,
        res.len(),
        res.identity() * 100.0,
        res.gaps(),
        res.cigar()
    );
    if strategy == Strategy::SemiGlobal && out.trace_start != out.optimum {
        info!("best end cell {} differs from traceback start {}", out.optimum, out.trace_start);
    }

    report::save_alignment(&args.output, res)?;
    info!("alignment saved: {}", args.output);
    report::save_score_matrix(&args.score_matrix, &out.matrix, first, second)?;
    info!("score matrix saved: {}", args.score_matrix);

    if args.print_on_screen {
        println!("\n<-------------ALIGNMENT-------------->\n");
        print!("{}", report::render_alignment(res, report::SCREEN_WIDTH));
        println!("\n<-------------SCORE MATRIX-------------->\n");
        print!("{}", report::render_matrix(&out.matrix, first, second, report::SCREEN_WIDTH));
    }
    Ok(())
}

fn run_export_matrix(name: MatrixKind, output: Option<String>) -> Result<()> {
    let mut matrix = SubstitutionMatrix::builtin(name);
    matrix.set_meta(MatrixMeta {
        source: Some(format!("builtin:{}", name)),
        created: Some(chrono::Utc::now().to_rfc3339()),
    });

    let out_path = output.unwrap_or_else(|| format!("{}.bin", name));
    matrix
        .save_to_file(&out_path)
        .with_context(|| format!("cannot write substitution matrix to '{}'", out_path))?;
    info!("substitution matrix saved: {}", out_path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_align_defaults() {
        let cli = Cli::try_parse_from(["pairalign", "align", "-f", "in.fa", "-g"]).unwrap();
        let Commands::Align(args) = cli.command else { panic!("expected align") };
        assert_eq!(args.exchange_matrix, MatrixKind::Pam250);
        assert_eq!(args.penalty, 2);
        assert_eq!(args.output, "output.align");
        assert_eq!(args.score_matrix, "output.matrix");
        assert_eq!(args.threads, 1);
        assert!(Strategy::from_flags(args.global, args.local, args.semi_global).is_ok());
    }

    #[test]
    fn rejects_unknown_exchange_matrix() {
        let res = Cli::try_parse_from(["pairalign", "align", "-f", "in.fa", "-l", "-e", "blosum45"]);
        assert!(res.is_err());
    }

    #[test]
    fn multiple_strategies_are_a_config_error() {
        let cli = Cli::try_parse_from(["pairalign", "align", "-f", "in.fa", "-g", "-s"]).unwrap();
        let Commands::Align(args) = cli.command else { panic!("expected align") };
        assert!(Strategy::from_flags(args.global, args.local, args.semi_global).is_err());
    }

    #[test]
    fn negative_penalty_parses_then_fails_validation() {
        let cli = Cli::try_parse_from(["pairalign", "align", "-f", "in.fa", "-g", "-p", "-3"]).unwrap();
        let Commands::Align(args) = cli.command else { panic!("expected align") };
        assert_eq!(args.penalty, -3);
        assert!(ScoringModel::builtin(args.exchange_matrix, args.penalty).is_err());
    }
}
