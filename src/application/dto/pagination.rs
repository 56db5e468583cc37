#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: usize,
    pub offset: usize,
}

impl Page {
    /// Missing limit falls back to `default_limit`; any limit is clamped to
    /// `1..=max_limit`.
    pub fn from_params(
        limit: Option<i64>,
        offset: Option<i64>,
        default_limit: usize,
        max_limit: usize,
    ) -> Self {
        let max_limit = max_limit.max(1);
        let limit = match limit {
            Some(l) if l > 0 => (l as usize).min(max_limit),
            Some(_) => 1,
            None => default_limit.clamp(1, max_limit),
        };
        let offset = offset.filter(|o| *o > 0).map(|o| o as usize).unwrap_or(0);
        Self { limit, offset }
    }

    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.offset)
            .take(self.limit)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_params_missing() {
        let page = Page::from_params(None, None, 20, 100);
        assert_eq!(page, Page { limit: 20, offset: 0 });
    }

    #[test]
    fn clamps_limit_and_ignores_negative_offset() {
        assert_eq!(Page::from_params(Some(500), Some(-3), 20, 100).limit, 100);
        assert_eq!(Page::from_params(Some(0), None, 20, 100).limit, 1);
        assert_eq!(Page::from_params(Some(5), Some(-3), 20, 100).offset, 0);
    }

    #[test]
    fn apply_skips_then_takes() {
        let page = Page { limit: 2, offset: 1 };
        assert_eq!(page.apply(vec![1, 2, 3, 4]), vec![2, 3]);
        let past_end = Page { limit: 2, offset: 10 };
        assert!(past_end.apply(vec![1, 2, 3]).is_empty());
    }
}
