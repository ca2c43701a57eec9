// Library exports for pairsweep
pub mod blocks;
pub mod cigar;
pub mod error;
pub mod layer_layout;
pub mod mapping;
pub mod mapping_index;
pub mod pair_classify;
pub mod pair_types;
pub mod track_io;
