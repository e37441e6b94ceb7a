/// One page of a sorted sequence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// 1-based index this page was requested with
    pub index: usize,
    pub total_pages: usize,
}

impl<T> Page<'_, T> {
    pub fn has_previous(&self) -> bool {
        self.index > 1
    }

    pub fn has_next(&self) -> bool {
        self.index < self.total_pages
    }
}

/// `ceil(len / page_size)`, never less than 1
pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1)).max(1)
}

/// Slices page `page_index` (1-based) out of `items`
///
/// Out-of-range indexes, including 0, give an empty slice rather than an
/// error. Callers clamp with [`clamp_page_index`] when they want the nearest
/// valid page instead.
pub fn page<T>(items: &[T], page_size: usize, page_index: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let total_pages = total_pages(items.len(), page_size);

    let slice = page_index
        .checked_sub(1)
        .and_then(|previous| previous.checked_mul(page_size))
        .filter(|&start| start < items.len())
        .map(|start| {
            let end = start.saturating_add(page_size).min(items.len());
            &items[start..end]
        })
        .unwrap_or(&[]);

    Page {
        items: slice,
        index: page_index,
        total_pages,
    }
}

/// Brings a requested page index into `[1, total_pages]`
pub fn clamp_page_index(requested: usize, total_pages: usize) -> usize {
    requested.clamp(1, total_pages.max(1))
}
