use super::ValidationError;

/// Page numbers for the pagination controls: at most `width` pages, with
/// `current` in the middle unless it is close to either end.
pub fn page_window(current: u32, total_pages: u32, width: u32) -> Vec<u32> {
    if total_pages == 0 || width == 0 {
        return Vec::new();
    }
    let current = current.clamp(1, total_pages);

    let mut start = current.saturating_sub(width / 2).max(1);
    let end = (start + width - 1).min(total_pages);
    if end - start + 1 < width {
        start = (end + 1).saturating_sub(width).max(1);
    }

    (start..=end).collect()
}

/// An unknown total only enforces the lower bound.
pub fn check_page(page: u32, total_pages: Option<u32>) -> Result<(), ValidationError> {
    if page == 0 {
        return Err(ValidationError::PageZero);
    }
    match total_pages {
        Some(total) if page > total => Err(ValidationError::PageOutOfRange {
            page,
            total_pages: total,
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_centered() {
        assert_eq!(page_window(10, 20, 5), vec![8, 9, 10, 11, 12]);
    }

    #[test]
    fn test_window_at_edges() {
        assert_eq!(page_window(1, 20, 5), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_window(2, 20, 5), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_window(20, 20, 5), vec![16, 17, 18, 19, 20]);
        assert_eq!(page_window(19, 20, 5), vec![16, 17, 18, 19, 20]);
    }

    #[test]
    fn test_window_fewer_pages_than_width() {
        assert_eq!(page_window(2, 3, 5), vec![1, 2, 3]);
        assert_eq!(page_window(1, 1, 5), vec![1]);
        assert!(page_window(1, 0, 5).is_empty());
    }

    #[test]
    fn test_window_even_width() {
        assert_eq!(page_window(10, 20, 4), vec![8, 9, 10, 11]);
    }

    #[test]
    fn test_check_page() {
        assert_eq!(check_page(0, None), Err(ValidationError::PageZero));
        assert_eq!(check_page(7, None), Ok(()));
        assert_eq!(check_page(3, Some(3)), Ok(()));
        assert_eq!(
            check_page(4, Some(3)),
            Err(ValidationError::PageOutOfRange {
                page: 4,
                total_pages: 3
            })
        );
    }
}
