use std::fmt;

use crate::cigar::{self, CigarOp};
use crate::error::ContractViolation;

/// Reference strand of a mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strand {
    Forward,
    Reverse,
}

impl Strand {
    pub fn symbol(self) -> char {
        match self {
            Strand::Forward => '+',
            Strand::Reverse => '-',
        }
    }

    pub fn from_symbol(symbol: char) -> Result<Strand, ContractViolation> {
        match symbol {
            '+' => Ok(Strand::Forward),
            '-' => Ok(Strand::Reverse),
            other => Err(ContractViolation::UnknownStrand(other)),
        }
    }

    pub fn is_reverse(self) -> bool {
        self == Strand::Reverse
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// One alignment of one read against the reference.
///
/// Coordinates are 1-based and inclusive. Records are immutable once
/// constructed; every consumer works on shared references or ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    id: u64,
    start: u64,
    stop: u64,
    strand: Strand,
    ops: Vec<CigarOp>,
    num_hits: u32,
    read_name: String,
}

impl Mapping {
    /// Build a validated mapping. Fails on an inverted range, or on an
    /// operator string whose reference footprint disagrees with
    /// `[start, stop]`.
    pub fn new(
        id: u64,
        start: u64,
        stop: u64,
        strand: Strand,
        ops: Vec<CigarOp>,
        num_hits: u32,
        read_name: impl Into<String>,
    ) -> Result<Mapping, ContractViolation> {
        if start > stop {
            return Err(ContractViolation::InvertedRange { start, stop });
        }
        if !ops.is_empty() {
            let operator_span = cigar::reference_span(&ops);
            let mapping_span = stop - start + 1;
            if operator_span != mapping_span {
                return Err(ContractViolation::OperatorSpanMismatch {
                    operator_span,
                    mapping_span,
                });
            }
        }
        Ok(Mapping {
            id,
            start,
            stop,
            strand,
            ops,
            num_hits,
            read_name: read_name.into(),
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn stop(&self) -> u64 {
        self.stop
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }

    pub fn ops(&self) -> &[CigarOp] {
        &self.ops
    }

    /// Count of equally ranked best mapping locations reported for the
    /// read. 0 means no rank data, 1 means the read mapped uniquely.
    pub fn num_hits(&self) -> u32 {
        self.num_hits
    }

    pub fn read_name(&self) -> &str {
        &self.read_name
    }

    pub fn span(&self) -> u64 {
        self.stop - self.start + 1
    }
}
