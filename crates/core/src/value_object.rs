//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Two value objects holding the same attributes are interchangeable. Rows of a
/// quotation and money amounts are values; a generated quotation is not (it
/// carries a [`QuotationId`](crate::QuotationId)).
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
