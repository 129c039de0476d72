//! Value object trait: equality by value, not identity.
//!
//! Value objects have **no identity**: they are defined entirely by their
//! attribute values (a price, a stock level). To "modify" one, build a new one.

/// Marker trait for value objects.
///
/// - **Clone**: value objects are cheap to copy
/// - **PartialEq**: compared by their attribute values
/// - **Debug**: debuggable in logs and test output
///
/// ```ignore
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// struct Price(f64);
///
/// impl ValueObject for Price {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
