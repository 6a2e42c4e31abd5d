use crate::engine::{EngineError, Grid, GridRepr};

#[derive(thiserror::Error, Debug)]
pub enum SerializationError {
    #[error("postcard error: {0}")]
    Postcard(#[from] postcard::Error),
    #[error("invalid grid: {0}")]
    Engine(#[from] EngineError),
}

/// Encode a grid snapshot to postcard bytes.
///
/// ```
/// use grid_2048::engine::Grid;
/// use grid_2048::serialization::{from_postcard_bytes, to_postcard_bytes};
/// let g = Grid::from_values([[2, 0], [4, 8]], 12).unwrap();
/// let bytes = to_postcard_bytes(&g).unwrap();
/// assert_eq!(from_postcard_bytes(&bytes).unwrap(), g);
/// ```
pub fn to_postcard_bytes(grid: &Grid) -> Result<Vec<u8>, SerializationError> {
    Ok(postcard::to_allocvec(grid)?)
}

/// Decode a grid snapshot from postcard bytes.
///
/// Malformed bytes are `Postcard`; a well-formed layout that breaks a grid
/// invariant is `Engine`.
pub fn from_postcard_bytes(bytes: &[u8]) -> Result<Grid, SerializationError> {
    let repr: GridRepr = postcard::from_bytes(bytes)?;
    Ok(Grid::try_from(repr)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Move;
    use rand::{rngs::StdRng, SeedableRng};
    use serde::Serialize;

    // Same field order as the grid's wire shape.
    #[derive(Serialize)]
    struct RawGrid {
        size: usize,
        cells: Vec<u64>,
        score: u64,
    }

    fn raw(size: usize, cells: Vec<u64>) -> Vec<u8> {
        postcard::to_allocvec(&RawGrid { size, cells, score: 0 }).unwrap()
    }

    #[test]
    fn test_decoded_grid_keeps_playing_identically() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut g = Grid::new(4, &mut rng).unwrap();
        for m in [Move::Left, Move::Down, Move::Right, Move::Up].iter().cycle().take(12) {
            g = g.get_moved(*m, &mut rng).0;
        }
        let copy = from_postcard_bytes(&to_postcard_bytes(&g).unwrap()).unwrap();
        assert_eq!(copy, g);

        let mut rng_a = StdRng::seed_from_u64(99);
        let mut rng_b = StdRng::seed_from_u64(99);
        assert_eq!(g.get_moved(Move::Left, &mut rng_a), copy.get_moved(Move::Left, &mut rng_b));
    }

    #[test]
    fn test_rejects_invalid_tiles() {
        let bytes = raw(2, vec![2, 3, 0, 0]);
        assert!(matches!(
            from_postcard_bytes(&bytes),
            Err(SerializationError::Engine(EngineError::InvalidTile { value: 3 }))
        ));
    }

    #[test]
    fn test_rejects_wrong_cell_count() {
        assert!(matches!(
            from_postcard_bytes(&raw(2, vec![2, 0, 0])),
            Err(SerializationError::Engine(EngineError::NotSquare { expected: 4, found: 3 }))
        ));
        assert!(matches!(
            from_postcard_bytes(&raw(0, vec![])),
            Err(SerializationError::Engine(EngineError::ZeroSize))
        ));
    }

    #[test]
    fn test_rejects_truncated_bytes() {
        let g = Grid::from_values([[2, 4], [8, 16]], 0).unwrap();
        let bytes = to_postcard_bytes(&g).unwrap();
        assert!(matches!(
            from_postcard_bytes(&bytes[..bytes.len() - 1]),
            Err(SerializationError::Postcard(_))
        ));
    }
}
