/// Last viewed page of a chapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadingProgress {
    pub page: usize,
    pub total: Option<usize>,
}

impl ReadingProgress {
    /// Page is clamped to `[0, total - 1]` when the total is known
    pub fn new(page: usize, total: Option<usize>) -> Self {
        let page = match total {
            Some(0) => 0,
            Some(total) => page.min(total - 1),
            None => page,
        };

        Self { page, total }
    }

    pub fn is_last_page(&self) -> bool {
        self.total.is_some_and(|total| self.page + 1 >= total)
    }
}
