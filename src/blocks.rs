//! Decomposition of a mapping's operator string into the contiguous
//! reference runs a viewer actually draws.

use crate::cigar::CigarOp;
use crate::mapping::Mapping;

/// One maximal contiguous reference-covering run of a mapping.
/// Coordinates are 1-based and inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentBlock {
    pub start: u64,
    pub stop: u64,
}

impl AlignmentBlock {
    pub fn len(&self) -> u64 {
        self.stop - self.start + 1
    }

    pub fn is_empty(&self) -> bool {
        false // blocks are only ever emitted with nonzero length
    }
}

/// Walk an operator string left to right and emit the covered blocks.
///
/// Match, mismatch and deletion operators extend the current block and
/// advance the cursor. A reference skip closes the current block (if it
/// accumulated anything), jumps the cursor past the gap and lets the
/// next consuming operator open a fresh block. Insertions, clips and
/// padding touch neither the cursor nor the block.
///
/// An empty operator string, a leading skip, or back-to-back skips all
/// produce no empty blocks.
pub fn extract_blocks(ops: &[CigarOp], reference_start: u64) -> Vec<AlignmentBlock> {
    let mut blocks = Vec::new();
    let mut cursor = reference_start;
    let mut block_start = reference_start;
    let mut block_len: u64 = 0;

    for op in ops {
        match op {
            CigarOp::Match(n) | CigarOp::Equal(n) | CigarOp::Diff(n) | CigarOp::Del(n) => {
                if block_len == 0 {
                    block_start = cursor;
                }
                block_len += *n as u64;
                cursor += *n as u64;
            }
            CigarOp::RefSkip(n) => {
                if block_len > 0 {
                    blocks.push(AlignmentBlock {
                        start: block_start,
                        stop: cursor - 1,
                    });
                    block_len = 0;
                }
                cursor += *n as u64;
            }
            CigarOp::Ins(_) | CigarOp::SoftClip(_) | CigarOp::HardClip(_) | CigarOp::Pad(_) => {}
        }
    }

    if block_len > 0 {
        blocks.push(AlignmentBlock {
            start: block_start,
            stop: cursor - 1,
        });
    }

    blocks
}

/// Blocks of a whole mapping. A mapping without an operator string is
/// drawn as its full `[start, stop]` range.
pub fn mapping_blocks(mapping: &Mapping) -> Vec<AlignmentBlock> {
    if mapping.ops().is_empty() {
        return vec![AlignmentBlock {
            start: mapping.start(),
            stop: mapping.stop(),
        }];
    }
    extract_blocks(mapping.ops(), mapping.start())
}
