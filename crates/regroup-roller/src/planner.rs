//! Batch planner — how many instances one page may touch.

/// Effective page size for a pass.
///
/// A requested size of zero or less, or one larger than the group itself,
/// means "the whole group". Otherwise the minimum-in-service floor is carved
/// out of the request, clamped to 1 so the pass always makes progress.
///
/// The floor only shrinks the page size; it does not verify the group's
/// actual in-service count while replacements happen. Keeping capacity up
/// is left to the group's own scaling behavior.
pub fn effective_batch_size(requested: i64, min_in_service: u32, desired_capacity: u32) -> u32 {
    if requested < 1 || requested > i64::from(desired_capacity) {
        return desired_capacity;
    }
    let available = requested - i64::from(min_in_service);
    if available < 1 { 1 } else { available as u32 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_or_negative_request_uses_desired_capacity() {
        assert_eq!(effective_batch_size(0, 0, 10), 10);
        assert_eq!(effective_batch_size(-3, 2, 10), 10);
    }

    #[test]
    fn request_above_desired_capacity_uses_desired_capacity() {
        assert_eq!(effective_batch_size(11, 0, 10), 10);
        assert_eq!(effective_batch_size(100, 5, 10), 10);
    }

    #[test]
    fn floor_leaves_the_difference() {
        assert_eq!(effective_batch_size(4, 2, 10), 2);
        assert_eq!(effective_batch_size(10, 3, 10), 7);
        assert_eq!(effective_batch_size(5, 0, 10), 5);
    }

    #[test]
    fn floor_larger_than_request_clamps_to_one() {
        assert_eq!(effective_batch_size(2, 2, 10), 1);
        assert_eq!(effective_batch_size(3, 7, 10), 1);
        assert_eq!(effective_batch_size(1, 0, 10), 1);
    }
}
