//! CLI entry point for markmatch.
//!
//! `match` locates markers in a reference, `annotate` adds feature
//! annotations to a match table, and `run` does both in one pass.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use markmatch::annotator::{
    annotate_matches, load_cpg, load_genes, load_repeats, load_tss, FeatureIndex,
};
use markmatch::config::{Config, DEFAULT_CHROMOSOME};
use markmatch::matcher::match_references;
use markmatch::output::{write_annotated, write_matches};
use markmatch::parser::{read_markers, read_matches, read_references, read_rows};
use markmatch::types::Match;

/// Marker location and genomic feature annotation tool.
///
/// Finds every occurrence of marker sequences in a reference and annotates
/// them with nearby TSSs, genes, CpG islands and repeats.
#[derive(Parser, Debug)]
#[command(name = "markmatch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Locate markers and their reverse complements in a reference
    Match(MatchArgs),
    /// Annotate a match table with genomic features
    Annotate(AnnotateArgs),
    /// Locate markers and annotate the matches in one pass
    Run(RunArgs),
}

#[derive(Args, Debug)]
struct SearchInput {
    /// Reference FASTA file (required)
    #[arg(short = 'r', long = "reference")]
    reference: PathBuf,

    /// Marker FASTA file (required)
    #[arg(short = 'm', long = "markers")]
    markers: PathBuf,

    /// Upstream/downstream context length in bp
    #[arg(short = 'c', long = "context", default_value = "20")]
    context: usize,

    /// Ignore case when comparing markers to the reference
    #[arg(long = "ignore-case")]
    ignore_case: bool,
}

#[derive(Args, Debug)]
struct FeatureInput {
    /// Gene annotation in GFF3 format (required)
    #[arg(short = 'g', long = "genes")]
    genes: PathBuf,

    /// TSS table, 7 columns (required)
    #[arg(short = 't', long = "tss")]
    tss: PathBuf,

    /// CpG island table, UCSC cpgIslandExt layout (required)
    #[arg(long = "cpg")]
    cpg: PathBuf,

    /// Repeat table: chrom, start, end, name, class, strand (required)
    #[arg(long = "repeats")]
    repeats: PathBuf,

    /// GFF feature types loaded as genes (comma-separated)
    #[arg(long = "gene-types", default_value = "gene,ncRNA_gene")]
    gene_types: String,

    /// The TSS table has no header row
    #[arg(long = "no-tss-header")]
    no_tss_header: bool,
}

#[derive(Args, Debug)]
struct MatchArgs {
    #[command(flatten)]
    search: SearchInput,

    /// Output match table (required)
    #[arg(short = 'o', long = "output")]
    output: PathBuf,

    /// Number of worker threads (0 = auto-detect, 1 = sequential)
    #[arg(long = "threads", short = 'j', default_value = "0")]
    threads: usize,
}

#[derive(Args, Debug)]
struct AnnotateArgs {
    /// Match table written by `markmatch match` (required)
    #[arg(short = 'i', long = "matches")]
    matches: PathBuf,

    #[command(flatten)]
    features: FeatureInput,

    /// Chromosome assigned to every match in the table
    #[arg(long = "chromosome", default_value = DEFAULT_CHROMOSOME)]
    chromosome: String,

    /// Output annotation table (required)
    #[arg(short = 'o', long = "output")]
    output: PathBuf,

    /// Number of worker threads (0 = auto-detect, 1 = sequential)
    #[arg(long = "threads", short = 'j', default_value = "0")]
    threads: usize,
}

#[derive(Args, Debug)]
struct RunArgs {
    #[command(flatten)]
    search: SearchInput,

    #[command(flatten)]
    features: FeatureInput,

    /// Output annotation table (required)
    #[arg(short = 'o', long = "output")]
    output: PathBuf,

    /// Also write the intermediate match table here
    #[arg(long = "matches-out")]
    matches_out: Option<PathBuf>,

    /// Number of worker threads (0 = auto-detect, 1 = sequential)
    #[arg(long = "threads", short = 'j', default_value = "0")]
    threads: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Match(args) => run_match(&args)?,
        Commands::Annotate(args) => run_annotate(&args)?,
        Commands::Run(args) => run_pipeline(&args)?,
    }

    info!("Done!");
    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("markmatch=debug,info")
        } else {
            EnvFilter::new("markmatch=info,warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

fn ensure_exists(path: &Path, what: &str) -> Result<()> {
    if !path.exists() {
        bail!("{} file not found: {}", what, path.display());
    }
    Ok(())
}

fn search_config(search: &SearchInput, threads: usize) -> Config {
    let mut config = Config::new();
    config.context_size = search.context;
    config.ignore_case = search.ignore_case;
    config.threads = threads;
    config
}

fn apply_feature_options(config: &mut Config, features: &FeatureInput) -> Result<()> {
    if !config.parse_gene_types(&features.gene_types) {
        bail!("At least one gene feature type must be given.");
    }
    config.tss_has_header = !features.no_tss_header;
    Ok(())
}

/// Create `path` and fill it through a buffered writer.
fn write_table<F>(path: &Path, fill: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    fill(&mut writer)?;
    writer.flush()?;
    Ok(())
}

fn find_matches(search: &SearchInput, config: &Config) -> Result<Vec<Match>> {
    ensure_exists(&search.reference, "Reference")?;
    ensure_exists(&search.markers, "Marker")?;

    info!("Reading reference: {}", search.reference.display());
    let references = read_references(&search.reference)?;
    if references.is_empty() {
        bail!("Reference {} contains no sequences", search.reference.display());
    }

    info!("Reading markers: {}", search.markers.display());
    let markers = read_markers(&search.markers)?;

    info!(
        "Searching {} markers in {} reference sequence(s) with {} worker(s)",
        markers.len(),
        references.len(),
        config.worker_count()
    );
    let matches = match_references(&markers, &references, config)?;
    Ok(matches)
}

fn load_features(features: &FeatureInput, config: &Config) -> Result<FeatureIndex> {
    ensure_exists(&features.genes, "Gene")?;
    ensure_exists(&features.tss, "TSS")?;
    ensure_exists(&features.cpg, "CpG")?;
    ensure_exists(&features.repeats, "Repeat")?;

    info!("Loading genes: {}", features.genes.display());
    let genes = load_genes(read_rows(&features.genes)?, config);
    info!("Loading TSS table: {}", features.tss.display());
    let tss = load_tss(read_rows(&features.tss)?, config);
    info!("Loading CpG islands: {}", features.cpg.display());
    let cpg = load_cpg(read_rows(&features.cpg)?);
    info!("Loading repeats: {}", features.repeats.display());
    let repeats = load_repeats(read_rows(&features.repeats)?);

    info!(
        "Loaded {} genes, {} TSSs, {} CpG islands, {} repeats",
        genes.len(),
        tss.len(),
        cpg.len(),
        repeats.len()
    );

    Ok(FeatureIndex {
        genes,
        tss,
        cpg,
        repeats,
    })
}

fn run_match(args: &MatchArgs) -> Result<()> {
    let config = search_config(&args.search, args.threads);
    let matches = find_matches(&args.search, &config)?;

    info!("Writing {} matches to: {}", matches.len(), args.output.display());
    write_table(&args.output, |w| write_matches(w, &matches))
}

fn run_annotate(args: &AnnotateArgs) -> Result<()> {
    let mut config = Config::new();
    config.threads = args.threads;
    config.chromosome = args.chromosome.clone();
    apply_feature_options(&mut config, &args.features)?;

    ensure_exists(&args.matches, "Match")?;
    let features = load_features(&args.features, &config)?;

    info!("Reading matches: {}", args.matches.display());
    let matches = read_matches(&args.matches, &config.chromosome)?;

    let annotated = annotate_matches(&matches, &features, &config)?;

    info!("Writing {} annotated matches to: {}", annotated.len(), args.output.display());
    write_table(&args.output, |w| write_annotated(w, &annotated))
}

fn run_pipeline(args: &RunArgs) -> Result<()> {
    let mut config = search_config(&args.search, args.threads);
    apply_feature_options(&mut config, &args.features)?;

    let features = load_features(&args.features, &config)?;
    let matches = find_matches(&args.search, &config)?;

    if let Some(path) = &args.matches_out {
        info!("Writing {} matches to: {}", matches.len(), path.display());
        write_table(path, |w| write_matches(w, &matches))?;
    }

    let annotated = annotate_matches(&matches, &features, &config)?;

    info!("Writing {} annotated matches to: {}", annotated.len(), args.output.display());
    write_table(&args.output, |w| write_annotated(w, &annotated))
}
