//! 7-bag randomizer for piece generation
//!
//! All 7 pieces are shuffled, then dealt out before reshuffling. This
//! prevents long droughts. The upcoming pieces are kept as two explicit
//! sequences, the current queue and the next bag, so previews can look past
//! the end of the current bag without consuming anything.

use crate::tetromino::PieceKind;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

/// Shuffle all 7 kinds into a fresh bag (Fisher-Yates)
pub fn new_bag<R: Rng + ?Sized>(rng: &mut R) -> [PieceKind; 7] {
    let mut bag = PieceKind::all();
    bag.shuffle(rng);
    bag
}

/// The 7-bag piece randomizer
#[derive(Debug, Clone)]
pub struct Bag {
    /// Pieces still to be dealt from the current bag
    queue: VecDeque<PieceKind>,
    /// The bag that replaces `queue` once it runs dry
    next_bag: [PieceKind; 7],
    rng: ChaCha8Rng,
}

impl Bag {
    /// Create a new bag randomizer with a random seed
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    /// Create a reproducible bag randomizer
    pub fn with_seed(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let queue = new_bag(&mut rng).into_iter().collect();
        let next_bag = new_bag(&mut rng);
        Self {
            queue,
            next_bag,
            rng,
        }
    }

    /// Take the next piece
    pub fn next(&mut self) -> PieceKind {
        let Some(piece) = self.queue.pop_front() else {
            self.promote_next_bag();
            return self.next();
        };
        // Keep the queue non-empty so previews always see at least 8 pieces
        if self.queue.is_empty() {
            self.promote_next_bag();
        }
        piece
    }

    /// Preview the next N pieces without removing them
    pub fn preview(&self, count: usize) -> Vec<PieceKind> {
        self.queue
            .iter()
            .chain(self.next_bag.iter())
            .take(count)
            .copied()
            .collect()
    }

    fn promote_next_bag(&mut self) {
        self.queue.extend(self.next_bag);
        self.next_bag = new_bag(&mut self.rng);
    }
}

impl Default for Bag {
    fn default() -> Self {
        Self::new()
    }
}
