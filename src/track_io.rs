//! Line-oriented track ingestion and result export for the binary
//! front end. The core never touches files; everything here is a thin
//! caller feeding it typed records.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::cigar::parse_cigar;
use crate::mapping::{Mapping, Strand};
use crate::mapping_index::MappingIndex;
use crate::pair_classify::ClassificationResult;

/// Read one track file into an index.
///
/// Expected columns, tab separated:
/// `read_name  start  stop  strand  cigar  num_hits`
/// with `*` for a missing operator string. Lines starting with `#` and
/// blank lines are skipped. Mapping ids are assigned sequentially from
/// `id_offset` in file order.
pub fn read_track<P: AsRef<Path>>(path: P, id_offset: u64) -> Result<MappingIndex> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening track {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut index = MappingIndex::new();
    let mut next_id = id_offset;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("reading {}", path.display()))?;
        let trimmed = line.trim_end();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = trimmed.split('\t').collect();
        if fields.len() < 6 {
            bail!(
                "{}:{}: expected 6 tab-separated fields, got {}",
                path.display(),
                line_no + 1,
                fields.len()
            );
        }

        let read_name = fields[0];
        let start: u64 = fields[1]
            .parse()
            .with_context(|| format!("{}:{}: bad start", path.display(), line_no + 1))?;
        let stop: u64 = fields[2]
            .parse()
            .with_context(|| format!("{}:{}: bad stop", path.display(), line_no + 1))?;
        let strand_field = fields[3];
        let strand_symbol = match strand_field.chars().next() {
            Some(c) if strand_field.len() == 1 => c,
            _ => bail!(
                "{}:{}: bad strand '{}'",
                path.display(),
                line_no + 1,
                strand_field
            ),
        };
        let strand = Strand::from_symbol(strand_symbol)
            .with_context(|| format!("{}:{}", path.display(), line_no + 1))?;
        let ops = parse_cigar(fields[4])
            .with_context(|| format!("{}:{}: bad operator string", path.display(), line_no + 1))?;
        let num_hits: u32 = fields[5]
            .parse()
            .with_context(|| format!("{}:{}: bad num_hits", path.display(), line_no + 1))?;

        let mapping = Mapping::new(next_id, start, stop, strand, ops, num_hits, read_name)
            .with_context(|| format!("{}:{}", path.display(), line_no + 1))?;
        next_id += 1;
        index.insert(mapping);
    }

    Ok(index)
}

/// Write classified pairs, one line per distinct coordinate signature.
pub fn write_pairs<W: Write>(mut out: W, result: &ClassificationResult) -> Result<()> {
    writeln!(
        out,
        "#id_1\tid_2\tclass\treplicates\tstart_1\tstop_1\tstart_2\tstop_2\tstrand_1\tstrand_2"
    )?;
    for pair in result.pairs.values() {
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            pair.mapping_id_1,
            pair.mapping_id_2,
            pair.class,
            pair.replicate_count,
            pair.start_1,
            pair.stop_1,
            pair.start_2,
            pair.stop_2,
            pair.strand_1,
            pair.strand_2,
        )?;
    }
    Ok(())
}

/// Write the mappings that found no partner in the opposite track.
pub fn write_unpaired<W: Write>(mut out: W, result: &ClassificationResult) -> Result<()> {
    writeln!(out, "#mapping_id\tread_name")?;
    for unpaired in &result.unpaired {
        writeln!(out, "{}\t{}", unpaired.mapping_id, unpaired.read_name)?;
    }
    Ok(())
}
