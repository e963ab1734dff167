/* ************************************************************************ **
** This file is part of portmat, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Small macros shared by the portmat crates and their tests.

/// Zip two or three exact-size iterables, asserting that they have equal length.
///
/// Produces tuples, so `zip_eq!(a, b, c)` yields `(a, b, c)` rather than `((a, b), c)`.
#[macro_export]
macro_rules! zip_eq {
    ($a:expr $(,)*) => {
        $a.into_iter().map(|a| (a,))
    };
    ($a:expr, $b:expr $(,)*) => {
        $crate::zip_eq($a, $b)
    };
    ($a:expr, $b:expr, $c:expr $(,)*) => {
        $crate::zip_eq($crate::zip_eq($a, $b), $c)
            .map(|((a, b), c)| (a, b, c))
    };
}

#[doc(hidden)]
pub fn zip_eq<As, Bs>(a: As, b: Bs) -> ::std::iter::Zip<As::IntoIter, Bs::IntoIter>
where
    As: IntoIterator, As::IntoIter: ExactSizeIterator,
    Bs: IntoIterator, Bs::IntoIter: ExactSizeIterator,
{
    let (a, b) = (a.into_iter(), b.into_iter());
    assert_eq!(a.len(), b.len());
    a.zip(b)
}

/// Does `::serde_json::from_value(json!($($arg)*)).unwrap()`
///
/// Why? Because if you're writing a json literal, then you're probably
/// already quite certain that it is valid!
///
/// The calling crate must depend on `serde_json`.
#[macro_export]
macro_rules! from_json {
    ($($arg:tt)*) => { ::serde_json::from_value(::serde_json::json!($($arg)*)).unwrap() };
}
