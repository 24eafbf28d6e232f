//! Random-access paging over materialised result lists (schedules, rate listings).

/// Items on a 0-based `page` of `per_page` items. Empty past the end or when
/// `per_page` is zero.
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> &[T] {
    if per_page == 0 {
        return &[];
    }
    let start = page.saturating_mul(per_page);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(per_page).min(items.len());
    &items[start..end]
}

/// Pages needed to show `len` items at `per_page` each.
pub fn total_pages(len: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    len.div_ceil(per_page)
}
