// Page-window arithmetic for the paginator strip. Pure functions, no DOM.

/// Compute the main-strip page numbers shown around `page_no`.
///
/// The window holds exactly `window_length` contiguous values and attempts to
/// center `page_no`, going flush against either end of the page range instead
/// of truncating. Every value is clamped into `[1, num_pages]`, so a strip
/// wider than the page count repeats the boundary pages.
pub fn page_window(page_no: u32, num_pages: u32, window_length: u32) -> Vec<u32> {
    if window_length == 0 {
        return Vec::new();
    }

    let default_left = (window_length - 1) / 2;
    let default_right = window_length - 1 - default_left;

    let left = if page_no <= default_left {
        page_no.saturating_sub(1)
    } else if num_pages.saturating_sub(page_no) < default_right {
        window_length - 1 - num_pages.saturating_sub(page_no)
    } else {
        default_left
    };

    // The run may start below 1 when the window is wider than the page range;
    // the per-value clamp pins those entries to the first page.
    let start = page_no as i64 - left as i64;
    (0..window_length as i64)
        .map(|offset| (start + offset).clamp(1, num_pages as i64) as u32)
        .collect()
}

/// Visibility flags for the strip's edge blocks and their gap ellipses.
///
/// The first/last page blocks disappear when the window already reaches that
/// edge; an ellipsis disappears when there is no gap left for it to stand in
/// for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeBlocks {
    pub first_block: bool,
    pub last_block: bool,
    pub leading_ellipsis: bool,
    pub trailing_ellipsis: bool,
}

impl EdgeBlocks {
    pub fn for_window(window: &[u32], num_pages: u32) -> Self {
        let start = window.first().copied().unwrap_or(1);
        let end = window.last().copied().unwrap_or(num_pages);
        EdgeBlocks {
            first_block: start > 1,
            last_block: end < num_pages,
            leading_ellipsis: start > 2,
            trailing_ellipsis: end < num_pages.saturating_sub(1),
        }
    }
}

/// Pages the previous/next buttons should navigate to from `current_page`.
pub fn incremental_targets(current_page: u32, num_pages: u32) -> (u32, u32) {
    let prev = current_page.saturating_sub(1).max(1);
    let next = current_page.saturating_add(1).min(num_pages);
    (prev, next)
}

/// Disabled state for the previous/next buttons at `current_page`.
pub fn incremental_disabled(current_page: u32, num_pages: u32) -> (bool, bool) {
    (current_page <= 1, current_page >= num_pages)
}
