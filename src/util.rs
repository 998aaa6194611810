//! Miscellaneous utility structs and functions.

use std::fmt::Debug;

use cgmath::num_traits::Float;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An interval on the real number line.
#[derive(Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Interval<T> {
    pub min: T,
    pub max: T,
}

impl<T> Interval<T> {
    /// Creates a new interval.
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

impl<T: std::cmp::PartialOrd> Interval<T> {
    /// Returns true if this interval contains the value.
    pub fn contains(&self, value: T) -> bool {
        value >= self.min && value <= self.max
    }

    /// Returns true if the value lies strictly between the two ends.
    pub fn interior_contains(&self, value: T) -> bool {
        value > self.min && value < self.max
    }
}

impl<T: std::ops::Sub<T, Output = T> + Copy> Interval<T> {
    /// Gets the magnitude of the interval.
    pub fn length(&self) -> T {
        self.max - self.min
    }
}

impl<T: Float> Interval<T> {
    /// Creates an interval with the given centre and radius.
    pub fn disc(centre: T, radius: T) -> Self {
        Self {
            min: centre - radius,
            max: centre + radius,
        }
    }

    /// Returns the centre/mid-point of the interval.
    pub fn midpoint(&self) -> T {
        T::from(0.5).expect("0.5 is representable") * (self.min + self.max)
    }

    /// Whether both ends are finite and `min < max`.
    pub fn is_proper(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min < self.max
    }
}

impl<T: Debug> Debug for Interval<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Interval({:?}, {:?})", &self.min, &self.max)
    }
}

#[cfg(test)]
mod test {
    use super::Interval;

    #[test]
    fn interior_excludes_ends() {
        let int = Interval::new(10.0, 20.0);
        assert!(int.contains(10.0));
        assert!(!int.interior_contains(10.0));
        assert!(!int.interior_contains(20.0));
        assert!(int.interior_contains(10.5));
    }

    #[test]
    fn disc_and_midpoint() {
        let int = Interval::disc(200.0, 60.0);
        assert_eq!(int, Interval::new(140.0, 260.0));
        assert_eq!(int.midpoint(), 200.0);
        assert_eq!(int.length(), 120.0);
    }

    #[test]
    fn proper_intervals() {
        assert!(Interval::new(2.0, 3.5).is_proper());
        assert!(!Interval::new(3.0, 3.0).is_proper());
        assert!(!Interval::new(4.0, 3.0).is_proper());
        assert!(!Interval::new(f64::NAN, 3.0).is_proper());
    }
}
