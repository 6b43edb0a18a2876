//! The three query engines. Each is a pure function over the read-only
//! structures built at index time.

pub mod boolean;
pub mod phrase;
pub mod ranked;

/// Merge-intersect two ascending slices.
pub(crate) fn intersect_sorted<T: Ord + Copy>(a: &[T], b: &[T]) -> Vec<T> {
    let (mut i, mut j) = (0, 0);
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersects_ascending_lists() {
        assert_eq!(intersect_sorted(&[1u32, 3, 5, 9], &[0, 3, 4, 9, 10]), vec![3, 9]);
        assert!(intersect_sorted::<u32>(&[], &[1, 2]).is_empty());
    }
}
