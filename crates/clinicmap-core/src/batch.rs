//! Splitting destinations into request-sized groups.

/// Per-request destination limit of the Google Distance Matrix API when a
/// single origin is used.
pub const MAX_DESTINATIONS_PER_REQUEST: usize = 25;

/// Splits `items` into contiguous batches of at most `size` elements.
///
/// Batches cover the input exactly once and keep its order; only the last
/// batch may be shorter. A `size` of zero is treated as one.
#[must_use]
pub fn partition<T>(items: &[T], size: usize) -> Vec<&[T]> {
    items.chunks(size.max(1)).collect()
}
