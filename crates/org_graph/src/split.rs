//! Round-robin split of a region's members across its managers.
//!
//! Edge generation and the layout seeder both call [`split_round_robin`], so
//! the line drawn from a manager always ends at a member placed under it.
//! The split is a drawing heuristic only; it says nothing about who actually
//! reports to whom.

/// Bucket member indices by manager index, round-robin in manager order.
///
/// Returns one bucket per manager. With no managers every bucket list is
/// empty, and callers lay the members out flat instead.
pub fn split_round_robin(manager_count: usize, member_count: usize) -> Vec<Vec<usize>> {
    let mut buckets = vec![Vec::new(); manager_count];
    if manager_count == 0 {
        return buckets;
    }
    for member in 0..member_count {
        buckets[member % manager_count].push(member);
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_managers_three_members() {
        let buckets = split_round_robin(2, 3);
        assert_eq!(buckets, vec![vec![0, 2], vec![1]]);
    }

    #[test]
    fn test_single_manager_takes_everyone() {
        assert_eq!(split_round_robin(1, 4), vec![vec![0, 1, 2, 3]]);
    }

    #[test]
    fn test_no_managers() {
        assert!(split_round_robin(0, 5).is_empty());
    }

    #[test]
    fn test_every_member_lands_once() {
        let buckets = split_round_robin(3, 10);
        let mut all: Vec<_> = buckets.concat();
        all.sort();
        assert_eq!(all, (0..10).collect::<Vec<_>>());
        assert_eq!(buckets[0], vec![0, 3, 6, 9]);
    }
}
