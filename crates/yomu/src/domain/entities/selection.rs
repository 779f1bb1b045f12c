use serde::{Deserialize, Serialize};

/// Chapter ids in reading order, captured when the reader is entered from a
/// chapter list, plus the position of the chapter currently open.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChapterOrder {
    pub chapter_ids: Vec<String>,
    pub current: Option<usize>,
}

impl ChapterOrder {
    pub fn new(chapter_ids: Vec<String>, current: Option<usize>) -> Self {
        Self {
            chapter_ids,
            current,
        }
    }

    /// Position of `chapter_id`. The stored index is only trusted when it
    /// still points at that chapter.
    pub fn position_of(&self, chapter_id: &str) -> Option<usize> {
        self.current
            .filter(|&i| self.chapter_ids.get(i).is_some_and(|id| id == chapter_id))
            .or_else(|| self.chapter_ids.iter().position(|id| id == chapter_id))
    }

    /// The chapter following `chapter_id`, with its position
    pub fn next_after(&self, chapter_id: &str) -> Option<(usize, &str)> {
        let next = self.position_of(chapter_id)? + 1;
        self.chapter_ids
            .get(next)
            .map(|id| (next, id.as_str()))
    }
}
