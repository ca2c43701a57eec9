use std::fs::File;
use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use pairsweep::layer_layout::{self, LayerLayout};
use pairsweep::mapping::Strand;
use pairsweep::pair_classify::MatePairClassifier;
use pairsweep::pair_types::{ClassifiedPair, PairConfig, PairOrientation, PairStatistics};
use pairsweep::track_io;

/// Parse a number that may have metric suffix (k/K=1000, m/M=1e6, g/G=1e9)
fn parse_metric_number(s: &str) -> Result<u64, String> {
    if s.is_empty() {
        return Err("Empty string".to_string());
    }

    let (num_part, suffix) = if s.ends_with(|c: char| c.is_ascii_alphabetic()) {
        let last_char = s.chars().last().unwrap();
        (&s[..s.len() - last_char.len_utf8()], Some(last_char))
    } else {
        (s, None)
    };

    let base: f64 = num_part
        .parse()
        .map_err(|e| format!("Invalid number: {e}"))?;

    let multiplier = match suffix {
        Some('k') | Some('K') => 1000.0,
        Some('m') | Some('M') => 1_000_000.0,
        Some('g') | Some('G') => 1_000_000_000.0,
        Some(c) => {
            return Err(format!(
                "Unknown suffix '{c}'. Use k/K (1000), m/M (1e6), or g/G (1e9)"
            ))
        }
        None => 1.0,
    };

    let result = base * multiplier;

    if result > u64::MAX as f64 {
        return Err(format!("Value {result} too large for u64"));
    }

    Ok(result as u64)
}

fn parse_orientation(s: &str) -> Result<PairOrientation, String> {
    match s.to_lowercase().as_str() {
        "fr" => Ok(PairOrientation::ForwardReverse),
        "rf" => Ok(PairOrientation::ReverseForward),
        "ff" | "rr" | "ff_rr" => Ok(PairOrientation::SameStrand),
        other => Err(format!("unknown orientation '{other}' (use fr, rf, or ff)")),
    }
}

/// pairsweep - classify mate pairs across two mapping tracks and stack
/// them into non-overlapping display rows
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Track file for the first mates (read_name start stop strand cigar num_hits)
    #[clap(value_name = "TRACK1")]
    track_1: String,

    /// Track file for the second mates
    #[clap(value_name = "TRACK2")]
    track_2: String,

    /// Expected pair distance in reference bases
    #[clap(short = 'd', long = "distance", value_parser = parse_metric_number)]
    distance: u64,

    /// Allowed deviation from the expected distance, percent
    #[clap(short = 'p', long = "deviation", default_value = "10")]
    deviation: u8,

    /// Expected pair orientation: fr, rf, or ff
    #[clap(short = 'r', long = "orientation", default_value = "fr", value_parser = parse_orientation)]
    orientation: PairOrientation,

    /// Output file for classified pairs (stdout if not specified)
    #[clap(short = 'o', long = "output")]
    output: Option<String>,

    /// Output file for unpaired mappings
    #[clap(short = 'u', long = "unpaired")]
    unpaired: Option<String>,

    /// Output file for layer-stacked pairs (pair ids, footprint, signed row)
    #[clap(short = 's', long = "stack")]
    stack: Option<String>,

    /// Consider at most N ranked mappings per read and track
    #[clap(short = 'n', long = "max-ranked")]
    max_ranked: Option<usize>,

    /// Number of threads for parallel classification
    #[clap(short = 't', long = "threads", default_value = "8")]
    threads: usize,
}

fn write_stack<W: Write>(mut out: W, pairs: &[ClassifiedPair]) -> Result<()> {
    let stacked = layer_layout::layout(pairs);
    writeln!(out, "#id_1\tid_2\tstart\tstop\trow")?;
    for (strand_layers, strand) in [
        (&stacked.forward, Strand::Forward),
        (&stacked.reverse, Strand::Reverse),
    ] {
        for (layer_index, layer) in strand_layers.iter().enumerate() {
            let row = LayerLayout::signed_row(strand, layer_index);
            for &item in layer.items() {
                let pair = &pairs[item];
                writeln!(
                    out,
                    "{}\t{}\t{}\t{}\t{}",
                    pair.mapping_id_1,
                    pair.mapping_id_2,
                    pair.footprint_start(),
                    pair.footprint_stop(),
                    row,
                )?;
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    rayon::ThreadPoolBuilder::new()
        .num_threads(args.threads)
        .build_global()?;

    let config = PairConfig::new(args.distance, args.deviation, args.orientation)
        .context("invalid pair configuration")?;

    let track_1 = track_io::read_track(&args.track_1, 0)?;
    let track_2 = track_io::read_track(&args.track_2, track_1.len() as u64)?;

    let stats_1 = track_1.stats();
    let stats_2 = track_2.stats();
    info!(
        "track 1: {} mappings over {} reads ({} multi-mapped)",
        stats_1.num_mappings, stats_1.num_reads, stats_1.multi_mapped
    );
    info!(
        "track 2: {} mappings over {} reads ({} multi-mapped)",
        stats_2.num_mappings, stats_2.num_reads, stats_2.multi_mapped
    );

    let mut classifier = MatePairClassifier::new(config);
    if let Some(cap) = args.max_ranked {
        classifier = classifier.with_candidate_cap(cap);
    }
    let result = classifier.classify(&track_1, &track_2);

    let mut stats = PairStatistics::default();
    for pair in result.pairs.values() {
        stats.record(pair);
    }
    stats.unpaired = result.unpaired.len() as u64;
    info!(
        "{} pairs: {} perfect, {} dist_large, {} dist_small, {} orient_wrong, \
         {} orient+large, {} orient+small; {} replicates merged, {} unpaired",
        stats.total_pairs(),
        stats.perfect,
        stats.distance_too_large,
        stats.distance_too_small,
        stats.orientation_wrong,
        stats.orientation_wrong_distance_too_large,
        stats.orientation_wrong_distance_too_small,
        stats.replicates,
        stats.unpaired
    );

    match &args.output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("creating {path}"))?;
            track_io::write_pairs(BufWriter::new(file), &result)?;
        }
        None => {
            let stdout = io::stdout();
            track_io::write_pairs(stdout.lock(), &result)?;
        }
    }

    if let Some(path) = &args.unpaired {
        let file = File::create(path).with_context(|| format!("creating {path}"))?;
        track_io::write_unpaired(BufWriter::new(file), &result)?;
    }

    if let Some(path) = &args.stack {
        let pairs: Vec<ClassifiedPair> = result.pairs.values().cloned().collect();
        let file = File::create(path).with_context(|| format!("creating {path}"))?;
        write_stack(BufWriter::new(file), &pairs)?;
    }

    Ok(())
}
