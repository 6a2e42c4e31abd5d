//! Serialization surfaces for grid snapshots.
//!
//! This module defines a postcard encoding for a single `Grid`, so a
//! snapshot can be handed to another process or worker and rebuilt there.
//! Decoding goes through the grid's validated wire shape: bytes that
//! describe a non-square layout or a tile that is not a power of two are
//! rejected rather than producing an invalid grid.

mod snapshot;

pub use snapshot::{
    SerializationError,
    to_postcard_bytes,
    from_postcard_bytes,
};
