//! Fixed-size page slicing
//!
//! Pages are 1-indexed. Asking for a page past the end yields an empty slice
//! rather than an error, and an empty result still has exactly one (empty) page.

/// Countries shown per page.
pub const PAGE_SIZE: usize = 12;

/// Calculate pagination bounds for a given page
///
/// Returns `(start_index, end_index)` for slicing, or `None` when the page lies
/// outside the items (including page 0 and a zero page size).
pub fn page_bounds(total_items: usize, page_size: usize, page_number: usize) -> Option<(usize, usize)> {
    if page_size == 0 || page_number == 0 {
        return None;
    }

    let start = (page_number - 1).checked_mul(page_size)?;
    if start >= total_items {
        return None;
    }

    let end = start.saturating_add(page_size).min(total_items);
    Some((start, end))
}

/// Slice `items` down to the requested page.
pub fn page<T>(items: &[T], page_size: usize, page_number: usize) -> &[T] {
    match page_bounds(items.len(), page_size, page_number) {
        Some((start, end)) => &items[start..end],
        None => &[],
    }
}

/// Number of pages needed for `total_items`; never less than 1.
pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    total_items.div_ceil(page_size).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(count: usize) -> Vec<usize> {
        (0..count).collect()
    }

    #[test]
    fn test_page_bounds_basic() {
        assert_eq!(page_bounds(100, 10, 2), Some((10, 20)));
    }

    #[test]
    fn test_page_bounds_first_page() {
        assert_eq!(page_bounds(100, 10, 1), Some((0, 10)));
    }

    #[test]
    fn test_page_bounds_last_partial_page() {
        assert_eq!(page_bounds(95, 10, 10), Some((90, 95)));
    }

    #[test]
    fn test_page_bounds_exact_boundary() {
        assert_eq!(page_bounds(100, 10, 10), Some((90, 100)));
    }

    #[test]
    fn test_page_bounds_out_of_range() {
        assert_eq!(page_bounds(100, 10, 11), None);
        assert_eq!(page_bounds(100, 10, 0), None);
        assert_eq!(page_bounds(100, 0, 1), None);
        assert_eq!(page_bounds(100, 10, usize::MAX), None);
    }

    #[test]
    fn test_page_slices() {
        let items = items(30);

        assert_eq!(page(&items, PAGE_SIZE, 1), &items[0..12]);
        assert_eq!(page(&items, PAGE_SIZE, 2), &items[12..24]);
        assert_eq!(page(&items, PAGE_SIZE, 3), &items[24..30]);
        assert!(page(&items, PAGE_SIZE, 4).is_empty());
    }

    #[test]
    fn test_page_of_empty_items_is_empty() {
        let items: Vec<usize> = vec![];
        assert!(page(&items, PAGE_SIZE, 1).is_empty());
    }

    #[test]
    fn test_total_pages_minimum_one() {
        assert_eq!(total_pages(0, PAGE_SIZE), 1);
        assert_eq!(total_pages(1, PAGE_SIZE), 1);
        assert_eq!(total_pages(12, PAGE_SIZE), 1);
        assert_eq!(total_pages(13, PAGE_SIZE), 2);
        assert_eq!(total_pages(195, PAGE_SIZE), 17);
    }

    #[test]
    fn test_last_page_is_never_empty_for_non_empty_items() {
        for count in 1..=50 {
            let items = items(count);
            let last = total_pages(items.len(), PAGE_SIZE);
            assert!(
                !page(&items, PAGE_SIZE, last).is_empty(),
                "last page empty for {count} items"
            );
        }
    }
}
