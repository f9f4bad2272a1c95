//! Dense-grid primitives: packed cell keys and the rasterized output volume.

pub use self::cell_key::{CellKey, MAX_RESOLUTION};
pub use self::distance_volume::{AuxData, DistanceVolume, FAR_DISTANCE};

mod cell_key;
pub(crate) mod distance_volume;
