//! Dense page/subpage order numbers

use crate::document::Page;

/// Assign orders 1..=N in document order: each page, then its subpages.
///
/// Returns a new tree; the input is left untouched.
pub fn recalculate(pages: &[Page]) -> Vec<Page> {
    let mut next = 1u32;
    pages
        .iter()
        .map(|page| {
            let mut page = page.clone();
            page.order = next;
            next += 1;
            for sub in &mut page.sub_pages {
                sub.order = next;
                next += 1;
            }
            page
        })
        .collect()
}

/// Check that orders are exactly 1..=N in document order
pub fn is_dense(pages: &[Page]) -> bool {
    let orders = pages
        .iter()
        .flat_map(|p| std::iter::once(p.order).chain(p.sub_pages.iter().map(|s| s.order)));
    orders.zip(1u32..).all(|(order, expected)| order == expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Content;

    fn page_with_subs(id: &str, subs: usize) -> Page {
        let mut page = Page::new(id, Content::new());
        for _ in 0..subs {
            let sub = page.continuation(Content::new());
            page.sub_pages.push(sub);
        }
        page
    }

    #[test]
    fn test_dense_after_recalculate() {
        let mut pages = vec![page_with_subs("a", 2), page_with_subs("b", 0), page_with_subs("c", 3)];
        pages[0].order = 7;
        pages[2].sub_pages[1].order = 7;

        let pages = recalculate(&pages);
        assert!(is_dense(&pages));
        assert_eq!(pages[1].order, 4);
        assert_eq!(pages[2].sub_pages[2].order, 8);
    }

    #[test]
    fn test_input_untouched() {
        let pages = vec![page_with_subs("a", 1)];
        let _ = recalculate(&pages);
        assert_eq!(pages[0].order, 0);
        assert!(!is_dense(&pages));
    }

    #[test]
    fn test_dense_after_every_mutation() {
        let mut pages = recalculate(&[page_with_subs("a", 1), page_with_subs("b", 2)]);

        let extra = pages[0].continuation(Content::new());
        pages[0].sub_pages.insert(0, extra);
        pages = recalculate(&pages);
        assert!(is_dense(&pages));

        pages[1].sub_pages.remove(1);
        pages = recalculate(&pages);
        assert!(is_dense(&pages));

        pages.swap(0, 1);
        pages = recalculate(&pages);
        assert!(is_dense(&pages));
        assert_eq!(pages[1].order, 3);
    }
}
