//! Fixed-size cyclic sequence of the integers `0..limit`.
//!
//! The ring is built once and never changes shape; callers move around it
//! with [`Position`] handles. Wraparound happens in both directions.

use heapless::Vec;

use crate::error::RingError;

/// Largest ring the clock needs (seconds and minutes).
pub const MAX_LIMIT: usize = 60;

/// A handle to one element of a [`CircularCounter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub struct Position(u8);

impl Position {
    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

#[derive(Debug, Clone)]
pub struct CircularCounter {
    values: Vec<u8, MAX_LIMIT>,
}

impl CircularCounter {
    pub fn new(limit: usize) -> Result<Self, RingError> {
        if limit == 0 {
            return Err(RingError::Empty);
        }
        if limit > MAX_LIMIT {
            return Err(RingError::TooLarge {
                limit,
                max: MAX_LIMIT,
            });
        }

        let mut values = Vec::new();
        for value in 0..limit {
            // limit <= MAX_LIMIT, so both the cast and the push are in bounds
            let _ = values.push(value as u8);
        }
        Ok(Self { values })
    }

    pub fn limit(&self) -> usize {
        self.values.len()
    }

    /// The element holding 0.
    pub fn start(&self) -> Position {
        Position(0)
    }

    pub fn next(&self, pos: Position) -> Position {
        self.walk(pos, 1)
    }

    pub fn prev(&self, pos: Position) -> Position {
        let limit = self.limit();
        Position(((pos.index() % limit + limit - 1) % limit) as u8)
    }

    /// Moves `steps` elements forward from `from`.
    ///
    /// Equivalent to calling [`next`](Self::next) `steps` times.
    pub fn walk(&self, from: Position, steps: usize) -> Position {
        let limit = self.limit();
        Position(((from.index() + steps % limit) % limit) as u8)
    }

    pub fn value(&self, pos: Position) -> u8 {
        self.values[pos.index() % self.limit()]
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.values.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_and_oversized() {
        assert_eq!(CircularCounter::new(0).unwrap_err(), RingError::Empty);
        assert_eq!(
            CircularCounter::new(61).unwrap_err(),
            RingError::TooLarge { limit: 61, max: 60 }
        );
    }

    #[test]
    fn test_values_are_in_order() {
        let ring = CircularCounter::new(12).unwrap();
        assert_eq!(ring.limit(), 12);
        assert!(ring.iter().eq(0..12));
        assert_eq!(ring.value(ring.start()), 0);
    }

    #[test]
    fn test_next_wraps_to_start() {
        let ring = CircularCounter::new(60).unwrap();
        let last = ring.walk(ring.start(), 59);
        assert_eq!(ring.value(last), 59);
        assert_eq!(ring.next(last), ring.start());
    }

    #[test]
    fn test_prev_wraps_to_end() {
        let ring = CircularCounter::new(12).unwrap();
        assert_eq!(ring.value(ring.prev(ring.start())), 11);
    }

    #[test]
    fn test_cycle_closes_for_every_limit_and_start() {
        for limit in 1..=MAX_LIMIT {
            let ring = CircularCounter::new(limit).unwrap();
            for offset in 0..limit {
                let origin = ring.walk(ring.start(), offset);

                let mut forward = origin;
                let mut backward = origin;
                for _ in 0..limit {
                    forward = ring.next(forward);
                    backward = ring.prev(backward);
                }
                assert_eq!(forward, origin, "forward limit={limit} offset={offset}");
                assert_eq!(backward, origin, "backward limit={limit} offset={offset}");
            }
        }
    }

    #[test]
    fn test_walk_matches_repeated_next() {
        let ring = CircularCounter::new(60).unwrap();
        let mut stepped = ring.start();
        for steps in 0..150 {
            assert_eq!(ring.walk(ring.start(), steps), stepped);
            stepped = ring.next(stepped);
        }
    }

    #[test]
    fn test_single_element_ring() {
        let ring = CircularCounter::new(1).unwrap();
        assert_eq!(ring.next(ring.start()), ring.start());
        assert_eq!(ring.prev(ring.start()), ring.start());
    }
}
