//! Predicates used as the matching criterion of every counter.
//!
//! A [`Predicate`] is a pure, side-effect-free test over a single element.
//! It must be [`Sync`], since parallel counters call it from every worker
//! at once without any synchronization.
//!
//! Any `Fn(&T) -> bool + Sync` closure is a predicate:
//!
//! ```rust
//! use ripartitori::predicates::Predicate;
//!
//! let even = |x: &u32| x % 2 == 0;
//! assert!(even.test(&4));
//! assert!(!even.test(&5));
//! ```
//!
//! [`DivisibleBy`] covers the common "multiple of N" case for any primitive
//! integer type:
//!
//! ```rust
//! use ripartitori::predicates::{DivisibleBy, Predicate};
//!
//! let every_2000 = DivisibleBy::new(2_000i64).unwrap();
//! assert!(every_2000.test(&4_000));
//! assert!(!every_2000.test(&4_001));
//! ```

use num_traits::{CheckedRem, PrimInt};

use crate::error::{CountError, Result};

/// A pure boolean test over one element.
pub trait Predicate<T: ?Sized>: Sync {
    /// Returns `true` if `item` matches.
    fn test(&self, item: &T) -> bool;
}

impl<T: ?Sized, F> Predicate<T> for F
where
    F: Fn(&T) -> bool + Sync,
{
    #[inline]
    fn test(&self, item: &T) -> bool {
        self(item)
    }
}

/// Matches integers that are exact multiples of a non-zero divisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DivisibleBy<T> {
    divisor: T,
}

impl<T: PrimInt + CheckedRem> DivisibleBy<T> {
    /// Creates the predicate, rejecting a zero divisor.
    pub fn new(divisor: T) -> Result<Self> {
        if divisor.is_zero() {
            return Err(CountError::ZeroDivisor);
        }
        Ok(Self { divisor })
    }

    /// Returns the divisor.
    pub fn divisor(&self) -> T {
        self.divisor
    }
}

impl<T: PrimInt + CheckedRem + Sync> Predicate<T> for DivisibleBy<T> {
    #[inline]
    fn test(&self, item: &T) -> bool {
        // `MIN % -1` overflows; it is still an exact multiple.
        item.checked_rem(&self.divisor).is_none_or(|rem| rem.is_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_divisor_rejected() {
        let err = DivisibleBy::new(0u64).unwrap_err();
        assert!(matches!(err, CountError::ZeroDivisor));
    }

    #[test]
    fn test_divisible_by_unsigned() {
        let p = DivisibleBy::new(20u32).unwrap();
        assert!(p.test(&0));
        assert!(p.test(&20));
        assert!(p.test(&400));
        assert!(!p.test(&19));
        assert!(!p.test(&21));
        assert_eq!(p.divisor(), 20);
    }

    #[test]
    fn test_divisible_by_signed() {
        let p = DivisibleBy::new(200i64).unwrap();
        assert!(p.test(&-400));
        assert!(p.test(&200));
        assert!(!p.test(&-199));
    }

    #[test]
    fn test_negative_divisor() {
        let p = DivisibleBy::new(-3i32).unwrap();
        assert!(p.test(&9));
        assert!(p.test(&-9));
        assert!(!p.test(&10));
    }

    #[test]
    fn test_min_by_minus_one() {
        let p = DivisibleBy::new(-1i64).unwrap();
        assert!(p.test(&i64::MIN));
    }

    #[test]
    fn test_closure_predicate() {
        fn count_with<P: Predicate<i32>>(p: &P, items: &[i32]) -> usize {
            items.iter().filter(|x| p.test(x)).count()
        }
        assert_eq!(count_with(&|x: &i32| *x > 2, &[1, 2, 3, 4]), 2);
    }
}
