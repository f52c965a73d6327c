//! Polyhedral dice rolled on any `rand` generator.

use rand::Rng;

/// Dice rolls for any random number generator.
pub trait Dice: Rng + Sized {
    /// Rolls a single die with `sides` faces, returning `1..=sides`.
    ///
    /// A die with zero or one side always rolls 1.
    fn die(&mut self, sides: u32) -> u32 {
        if sides <= 1 {
            return 1;
        }
        self.random_range(1..=sides)
    }

    /// Rolls `count` dice with `sides` faces and sums them.
    fn dice(&mut self, sides: u32, count: u32) -> u32 {
        (0..count).map(|_| self.die(sides)).sum()
    }

    /// Signed variance: one positive and one negative roll of the same die.
    ///
    /// Returns a value in `-(sides-1)..=(sides-1)`, zero when `sides` is 0.
    fn die_v(&mut self, sides: u32) -> i32 {
        if sides == 0 {
            return 0;
        }
        self.die(sides) as i32 - self.die(sides) as i32
    }

    /// Zero-based roll in `0..size`. Returns 0 for an empty range.
    fn roll_zero(&mut self, size: usize) -> usize {
        if size == 0 {
            return 0;
        }
        self.random_range(0..size)
    }

    fn d2(&mut self) -> u32 {
        self.die(2)
    }

    fn d3(&mut self) -> u32 {
        self.die(3)
    }

    fn d4(&mut self) -> u32 {
        self.die(4)
    }

    fn d6(&mut self) -> u32 {
        self.die(6)
    }

    fn d20(&mut self) -> u32 {
        self.die(20)
    }

    fn d100(&mut self) -> u32 {
        self.die(100)
    }
}

impl<R: Rng> Dice for R {}
