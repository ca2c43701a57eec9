//! Mate-pair formation and classification across the two tracks of a
//! pair experiment.

use std::collections::HashMap;

use indexmap::IndexMap;
use log::debug;
use rayon::prelude::*;

use crate::mapping::{Mapping, Strand};
use crate::mapping_index::MappingIndex;
use crate::pair_types::{ClassifiedPair, PairClass, PairConfig, PairOrientation, UnpairedMapping};

/// Output of one classification run.
///
/// `pairs` is keyed by the representative `(id_1, id_2)` combination of
/// each distinct coordinate signature; iteration order is deterministic.
#[derive(Debug, Default)]
pub struct ClassificationResult {
    pub pairs: IndexMap<(u64, u64), ClassifiedPair>,
    pub unpaired: Vec<UnpairedMapping>,
}

/// Span covering both mates: widest minus narrowest covered coordinate,
/// inclusive.
pub fn pair_span(a: &Mapping, b: &Mapping) -> u64 {
    let low = a.start().min(b.start()).min(a.stop()).min(b.stop());
    let high = a.start().max(b.start()).max(a.stop()).max(b.stop());
    high - low + 1
}

fn orientation_ok(a: &Mapping, b: &Mapping, orientation: PairOrientation) -> bool {
    match orientation {
        PairOrientation::SameStrand => a.strand() == b.strand(),
        PairOrientation::ForwardReverse | PairOrientation::ReverseForward => {
            if a.strand() == b.strand() {
                return false;
            }
            let (fwd, rev) = if a.strand() == Strand::Forward {
                (a, b)
            } else {
                (b, a)
            };
            if orientation == PairOrientation::ForwardReverse {
                fwd.start() <= rev.start()
            } else {
                rev.start() <= fwd.start()
            }
        }
    }
}

/// Classify one candidate combination. Orientation is checked first,
/// then the span against the inclusive distance window; exactly one of
/// the six classes comes out.
pub fn classify_pair(a: &Mapping, b: &Mapping, config: &PairConfig) -> PairClass {
    let span = pair_span(a, b);
    let (low, high) = config.distance_window();
    let orientation = orientation_ok(a, b, config.orientation());

    match (orientation, span) {
        (true, s) if s > high => PairClass::DistanceTooLarge,
        (true, s) if s < low => PairClass::DistanceTooSmall,
        (true, _) => PairClass::Perfect,
        (false, s) if s > high => PairClass::OrientationWrongAndDistanceTooLarge,
        (false, s) if s < low => PairClass::OrientationWrongAndDistanceTooSmall,
        (false, _) => PairClass::OrientationWrong,
    }
}

/// Classifies mate pairs across two mapping indices.
pub struct MatePairClassifier {
    config: PairConfig,
    candidate_cap: Option<usize>,
}

impl MatePairClassifier {
    pub fn new(config: PairConfig) -> Self {
        MatePairClassifier {
            config,
            candidate_cap: None,
        }
    }

    /// Consider at most `cap` ranked mappings per read and track. Bounds
    /// the cross-product cost for reads with many mapping positions.
    pub fn with_candidate_cap(mut self, cap: usize) -> Self {
        self.candidate_cap = Some(cap);
        self
    }

    pub fn config(&self) -> &PairConfig {
        &self.config
    }

    fn capped<'a>(&self, group: &'a [usize]) -> &'a [usize] {
        match self.candidate_cap {
            Some(cap) if group.len() > cap => &group[..cap],
            _ => group,
        }
    }

    /// Form, score and merge mate pairs.
    ///
    /// Read names present in both tracks contribute the full cross
    /// product of their mapping combinations; names present in only one
    /// track come back as unpaired mappings. Candidate scoring runs in
    /// parallel per read name, the merge pass is sequential so the
    /// output is identical for any thread count.
    pub fn classify(
        &self,
        track_1: &MappingIndex,
        track_2: &MappingIndex,
    ) -> ClassificationResult {
        let shared_names: Vec<&str> = track_1
            .read_names()
            .filter(|name| track_2.contains_read(name))
            .collect();

        let per_read: Vec<Vec<ClassifiedPair>> = shared_names
            .par_iter()
            .map(|name| self.candidates_for_read(name, track_1, track_2))
            .collect();

        let mut pairs: IndexMap<(u64, u64), ClassifiedPair> = IndexMap::new();
        let mut representative: HashMap<(u64, u64, u64, u64), (u64, u64)> = HashMap::new();

        for candidate in per_read.into_iter().flatten() {
            let signature = candidate.signature();
            match representative.get(&signature) {
                Some(key) => {
                    if let Some(existing) = pairs.get_mut(key) {
                        existing.replicate_count += 1;
                    }
                }
                None => {
                    let key = (candidate.mapping_id_1, candidate.mapping_id_2);
                    representative.insert(signature, key);
                    pairs.insert(key, candidate);
                }
            }
        }

        let unpaired = collect_unpaired(track_1, track_2);
        debug!(
            "classified {} distinct pairs from {} shared reads, {} unpaired mappings",
            pairs.len(),
            shared_names.len(),
            unpaired.len()
        );

        ClassificationResult { pairs, unpaired }
    }

    /// Cross product of one read's mappings, narrowed to the
    /// best-supported combinations: if any combination is perfect, all
    /// perfect ones survive and the distorted ones are dropped;
    /// otherwise every distorted combination survives.
    fn candidates_for_read(
        &self,
        read_name: &str,
        track_1: &MappingIndex,
        track_2: &MappingIndex,
    ) -> Vec<ClassifiedPair> {
        let group_1 = self.capped(track_1.group(read_name).unwrap_or(&[]));
        let group_2 = self.capped(track_2.group(read_name).unwrap_or(&[]));

        let mut candidates = Vec::with_capacity(group_1.len() * group_2.len());
        for &pos_1 in group_1 {
            for &pos_2 in group_2 {
                let a = track_1.get(pos_1);
                let b = track_2.get(pos_2);
                let class = classify_pair(a, b, &self.config);
                candidates.push(ClassifiedPair {
                    mapping_id_1: a.id(),
                    mapping_id_2: b.id(),
                    class,
                    replicate_count: 0,
                    start_1: a.start(),
                    stop_1: a.stop(),
                    start_2: b.start(),
                    stop_2: b.stop(),
                    strand_1: a.strand(),
                    strand_2: b.strand(),
                });
            }
        }

        let total = candidates.len();
        if candidates.iter().any(|c| c.class.is_perfect()) {
            candidates.retain(|c| c.class.is_perfect());
        }
        if candidates.len() != total {
            debug!(
                "read {read_name}: kept {} perfect of {total} candidate combinations",
                candidates.len()
            );
        }

        candidates
    }
}

fn collect_unpaired(track_1: &MappingIndex, track_2: &MappingIndex) -> Vec<UnpairedMapping> {
    let mut unpaired = Vec::new();

    for (name, positions) in track_1.iter_groups() {
        if !track_2.contains_read(name) {
            for &pos in positions {
                let m = track_1.get(pos);
                unpaired.push(UnpairedMapping {
                    mapping_id: m.id(),
                    read_name: m.read_name().to_string(),
                });
            }
        }
    }
    for (name, positions) in track_2.iter_groups() {
        if !track_1.contains_read(name) {
            for &pos in positions {
                let m = track_2.get(pos);
                unpaired.push(UnpairedMapping {
                    mapping_id: m.id(),
                    read_name: m.read_name().to_string(),
                });
            }
        }
    }

    unpaired
}
