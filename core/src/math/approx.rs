//! Testing and asserting approximate equality.

use core::iter::zip;

/// Trait for testing approximate equality.
///
/// Two values are approximately equal if their absolute difference is at
/// most an epsilon *relative* to the magnitude of the values, or to one for
/// values smaller than one. Rasterized depths and back-projected heights
/// carry rounding error, so tests compare them with this trait instead of
/// `==`.
pub trait ApproxEq<Other: ?Sized = Self, Epsilon = Self> {
    /// Returns whether `self` and `other` are approximately equal.
    /// Uses the epsilon returned by [`Self::relative_epsilon`].
    fn approx_eq(&self, other: &Other) -> bool {
        self.approx_eq_eps(other, &Self::relative_epsilon())
    }

    /// Returns whether `self` and `other` are approximately equal,
    /// using the relative epsilon `rel_eps`.
    fn approx_eq_eps(&self, other: &Other, rel_eps: &Epsilon) -> bool;

    /// Returns the default relative epsilon of type `E`.
    fn relative_epsilon() -> Epsilon;
}

impl ApproxEq for f64 {
    fn approx_eq_eps(&self, other: &Self, rel_eps: &Self) -> bool {
        use super::float::f64 as fp;
        let diff = fp::abs(self - other);
        diff <= *rel_eps * fp::abs(*self).max(1.0)
    }

    fn relative_epsilon() -> Self {
        1e-9
    }
}

impl<E, T: Sized + ApproxEq<T, E>> ApproxEq<Self, E> for [T] {
    fn approx_eq_eps(&self, other: &Self, rel_eps: &E) -> bool {
        self.len() == other.len()
            && zip(self, other).all(|(s, o)| s.approx_eq_eps(o, rel_eps))
    }
    fn relative_epsilon() -> E {
        T::relative_epsilon()
    }
}

impl<E, T: Sized + ApproxEq<T, E>, const N: usize> ApproxEq<Self, E>
    for [T; N]
{
    fn approx_eq_eps(&self, other: &Self, rel_eps: &E) -> bool {
        self.as_slice().approx_eq_eps(other, rel_eps)
    }
    fn relative_epsilon() -> E {
        T::relative_epsilon()
    }
}

impl<E, T: ApproxEq<T, E>> ApproxEq<Self, E> for Option<T> {
    fn approx_eq_eps(&self, other: &Self, rel_eps: &E) -> bool {
        match (self, other) {
            (Some(s), Some(o)) => s.approx_eq_eps(o, rel_eps),
            (Some(_), None) | (None, Some(_)) => false,
            (None, None) => true,
        }
    }

    fn relative_epsilon() -> E {
        T::relative_epsilon()
    }
}

/// Asserts that two values are approximately equal.
/// Requires that the left operand has an applicable [`ApproxEq`] impl
/// and that both operands impl `Debug` unless a custom message is given.
///
/// # Panics
///
/// If the given values are not approximately equal.
///
/// # Examples
/// `assert_eq` would fail, but `assert_approx_eq` passes:
/// ```
/// # use meshcast_core::assert_approx_eq;
/// assert_ne!(0.1 + 0.2, 0.3);
/// assert_approx_eq!(0.1 + 0.2, 0.3);
/// ```
/// A custom epsilon can be given:
/// ```
/// # use meshcast_core::assert_approx_eq;
/// assert_approx_eq!(100.0, 101.0, eps = 0.01);
/// ```
/// Like `assert_eq`, this macro supports custom panic messages.
/// The epsilon, if present, must come before the format string.
#[macro_export]
macro_rules! assert_approx_eq {
    ($a:expr, $b:expr) => {
        match (&$a, &$b) {
            (a, b) => $crate::assert_approx_eq!(
                *a, *b,
                "assertion failed: `{a:?} ≅ {b:?}`"
            )
        }
    };
    ($a:expr, $b:expr, eps = $eps:literal) => {
        match (&$a, &$b) {
            (a, b) => $crate::assert_approx_eq!(
                *a, *b, eps = $eps,
                "assertion failed: `{a:?} ≅ {b:?}`"
            )
        }
    };
    ($a:expr, $b:expr, $fmt:literal $(, $args:expr)*) => {{
        use $crate::math::approx::ApproxEq;
        match (&$a, &$b) {
            (a, b) => assert!(ApproxEq::approx_eq(a, b), $fmt $(, $args)*)
        }
    }};
    ($a:expr, $b:expr, eps = $eps:literal, $fmt:literal $(, $args:expr)*) => {{
        use $crate::math::approx::ApproxEq;
        match (&$a, &$b) {
            (a, b) => assert!(
                ApproxEq::approx_eq_eps(a, b, &$eps),
                $fmt $(, $args)*
            )
        }
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn approx_eq_zero() {
        assert_approx_eq!(0.0, 0.0);
        assert_approx_eq!(-0.0, 0.0);
        assert_approx_eq!(0.0, -0.0);
    }

    #[test]
    fn approx_eq_positive() {
        assert_approx_eq!(0.0, 1e-10);
        assert_approx_eq!(1.0, 1.0 + 1e-10);
        assert_approx_eq!(1.0e10, 1.0000000001e10);
    }

    #[test]
    fn approx_eq_negative() {
        assert_approx_eq!(0.0, -1e-10);
        assert_approx_eq!(-1.0, -1.0 - 1e-10);
        assert_approx_eq!(-1.0e10, -1.0000000001e10);
    }

    #[test]
    fn approx_eq_custom_epsilon() {
        assert_approx_eq!(0.0, 0.001, eps = 0.01);
        assert_approx_eq!(100.0, 99.9, eps = 0.01);
    }

    #[test]
    fn approx_eq_arrays_and_options() {
        assert_approx_eq!([1.0, 2.0], [1.0, 2.0 + 1e-12]);
        assert_approx_eq!(Some(0.3), Some(0.1 + 0.2));
        assert_approx_eq!(None::<f64>, None);
    }

    #[test]
    #[should_panic]
    fn zero_not_approx_eq_to_one() {
        assert_approx_eq!(0.0, 1.0);
    }
    #[test]
    #[should_panic]
    fn one_not_approx_eq_to_1_000001() {
        assert_approx_eq!(1.0, 1.000001);
    }
    #[test]
    #[should_panic]
    fn inf_not_approx_eq_to_inf() {
        assert_approx_eq!(f64::INFINITY, f64::INFINITY);
    }
    #[test]
    #[should_panic]
    fn nan_not_approx_eq_to_nan() {
        assert_approx_eq!(f64::NAN, f64::NAN);
    }
}
