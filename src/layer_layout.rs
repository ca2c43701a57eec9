//! Greedy stacking of overlapping mappings or pairs into
//! non-overlapping visual rows, one set of rows per strand.

use crate::blocks::AlignmentBlock;
use crate::mapping::{Mapping, Strand};
use crate::pair_types::ClassifiedPair;

/// Anything the layout engine can stack: a closed reference interval on
/// one strand.
pub trait LayoutSpan {
    fn start(&self) -> u64;
    fn stop(&self) -> u64;
    fn strand(&self) -> Strand;
}

impl LayoutSpan for Mapping {
    fn start(&self) -> u64 {
        Mapping::start(self)
    }

    fn stop(&self) -> u64 {
        Mapping::stop(self)
    }

    fn strand(&self) -> Strand {
        Mapping::strand(self)
    }
}

/// Pairs occupy their combined footprint and stack on the strand of the
/// first mate.
impl LayoutSpan for ClassifiedPair {
    fn start(&self) -> u64 {
        self.footprint_start()
    }

    fn stop(&self) -> u64 {
        self.footprint_stop()
    }

    fn strand(&self) -> Strand {
        self.strand_1
    }
}

impl LayoutSpan for AlignmentBlock {
    fn start(&self) -> u64 {
        self.start
    }

    fn stop(&self) -> u64 {
        self.stop
    }

    fn strand(&self) -> Strand {
        Strand::Forward
    }
}

/// One visual row. Holds indices into the caller's item slice, sorted
/// by start and pairwise non-overlapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layer {
    items: Vec<usize>,
    last_stop: u64,
}

impl Layer {
    pub fn items(&self) -> &[usize] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Layer assignment for one window, forward rows separated from reverse
/// rows so a renderer can fan them out from a center line.
#[derive(Debug, Default)]
pub struct LayerLayout {
    pub forward: Vec<Layer>,
    pub reverse: Vec<Layer>,
}

impl LayerLayout {
    /// Signed row for rendering: forward layer `i` sits at `i`, reverse
    /// layer `i` at `-(i + 1)`.
    pub fn signed_row(strand: Strand, layer_index: usize) -> i64 {
        match strand {
            Strand::Forward => layer_index as i64,
            Strand::Reverse => -(layer_index as i64) - 1,
        }
    }

    /// Layer index assigned to `item_index`, with its strand.
    pub fn layer_of(&self, item_index: usize) -> Option<(Strand, usize)> {
        for (i, layer) in self.forward.iter().enumerate() {
            if layer.items.contains(&item_index) {
                return Some((Strand::Forward, i));
            }
        }
        for (i, layer) in self.reverse.iter().enumerate() {
            if layer.items.contains(&item_index) {
                return Some((Strand::Reverse, i));
            }
        }
        None
    }

    pub fn num_layers(&self) -> usize {
        self.forward.len() + self.reverse.len()
    }
}

/// Assign every item of one window to a layer.
///
/// Items are taken per strand in start order (stable, so ties keep
/// their input order) and dropped into the first layer whose last
/// placed stop lies strictly left of the item's start; when no layer
/// fits, a new one is opened. The layer count per strand ends up equal
/// to that strand's maximum interval depth.
pub fn layout<T: LayoutSpan>(items: &[T]) -> LayerLayout {
    LayerLayout {
        forward: layout_strand(items, Strand::Forward),
        reverse: layout_strand(items, Strand::Reverse),
    }
}

fn layout_strand<T: LayoutSpan>(items: &[T], strand: Strand) -> Vec<Layer> {
    let mut order: Vec<usize> = (0..items.len())
        .filter(|&i| items[i].strand() == strand)
        .collect();
    order.sort_by_key(|&i| items[i].start());

    let mut layers: Vec<Layer> = Vec::new();
    for idx in order {
        let start = items[idx].start();
        let stop = items[idx].stop();

        let slot = layers.iter().position(|layer| layer.last_stop < start);
        match slot {
            Some(i) => {
                layers[i].items.push(idx);
                layers[i].last_stop = stop;
            }
            None => layers.push(Layer {
                items: vec![idx],
                last_stop: stop,
            }),
        }
    }

    layers
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Span {
        start: u64,
        stop: u64,
        strand: Strand,
    }

    impl LayoutSpan for Span {
        fn start(&self) -> u64 {
            self.start
        }

        fn stop(&self) -> u64 {
            self.stop
        }

        fn strand(&self) -> Strand {
            self.strand
        }
    }

    fn fwd(start: u64, stop: u64) -> Span {
        Span {
            start,
            stop,
            strand: Strand::Forward,
        }
    }

    fn rev(start: u64, stop: u64) -> Span {
        Span {
            start,
            stop,
            strand: Strand::Reverse,
        }
    }

    #[test]
    fn test_empty_input() {
        let layout = layout::<Span>(&[]);
        assert!(layout.forward.is_empty());
        assert!(layout.reverse.is_empty());
    }

    #[test]
    fn test_non_overlapping_items_share_one_layer() {
        let items = vec![fwd(1, 50), fwd(60, 90), fwd(100, 130)];
        let result = layout(&items);
        assert_eq!(result.forward.len(), 1);
        assert_eq!(result.forward[0].items(), &[0, 1, 2]);
    }

    #[test]
    fn test_overlap_opens_second_layer() {
        let items = vec![fwd(1, 50), fwd(30, 80), fwd(60, 90)];
        let result = layout(&items);
        assert_eq!(result.forward.len(), 2);
        assert_eq!(result.forward[0].items(), &[0, 2]);
        assert_eq!(result.forward[1].items(), &[1]);
    }

    #[test]
    fn test_adjacent_items_overlap_on_shared_coordinate() {
        // inclusive coordinates: stop 50 and start 50 collide
        let items = vec![fwd(1, 50), fwd(50, 80)];
        let result = layout(&items);
        assert_eq!(result.forward.len(), 2);
    }

    #[test]
    fn test_strands_are_laid_out_independently() {
        let items = vec![fwd(1, 50), rev(1, 50), rev(30, 80)];
        let result = layout(&items);
        assert_eq!(result.forward.len(), 1);
        assert_eq!(result.reverse.len(), 2);
        assert_eq!(result.forward[0].items(), &[0]);
        assert_eq!(result.reverse[0].items(), &[1]);
        assert_eq!(result.reverse[1].items(), &[2]);
    }

    #[test]
    fn test_unsorted_input_is_sorted_by_start() {
        let items = vec![fwd(100, 130), fwd(1, 50), fwd(60, 90)];
        let result = layout(&items);
        assert_eq!(result.forward.len(), 1);
        assert_eq!(result.forward[0].items(), &[1, 2, 0]);
    }

    #[test]
    fn test_every_item_assigned_exactly_once() {
        let items = vec![
            fwd(1, 100),
            fwd(2, 99),
            fwd(3, 98),
            fwd(150, 200),
            rev(1, 100),
        ];
        let result = layout(&items);
        let mut seen: Vec<usize> = result
            .forward
            .iter()
            .chain(result.reverse.iter())
            .flat_map(|l| l.items().iter().copied())
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_layer_count_equals_max_depth() {
        // depth 3 at coordinate 3..=50
        let items = vec![fwd(1, 100), fwd(2, 99), fwd(3, 98), fwd(150, 200)];
        let result = layout(&items);
        assert_eq!(result.forward.len(), 3);
    }

    #[test]
    fn test_signed_rows() {
        assert_eq!(LayerLayout::signed_row(Strand::Forward, 0), 0);
        assert_eq!(LayerLayout::signed_row(Strand::Forward, 2), 2);
        assert_eq!(LayerLayout::signed_row(Strand::Reverse, 0), -1);
        assert_eq!(LayerLayout::signed_row(Strand::Reverse, 2), -3);
    }

    #[test]
    fn test_layer_of() {
        let items = vec![fwd(1, 50), fwd(30, 80), rev(10, 20)];
        let result = layout(&items);
        assert_eq!(result.layer_of(0), Some((Strand::Forward, 0)));
        assert_eq!(result.layer_of(1), Some((Strand::Forward, 1)));
        assert_eq!(result.layer_of(2), Some((Strand::Reverse, 0)));
        assert_eq!(result.layer_of(99), None);
    }
}
