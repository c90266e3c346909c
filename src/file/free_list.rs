use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

use super::PageNumber;
use super::config::ContractMode;
use super::error::{FileError, FileResult};

/// Hands out page numbers, preferring reuse of freed numbers over growth
///
/// Only a high-water mark and a reuse pool are kept, there is no per-page
/// status map. Reuse is last-in-first-out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeList {
    /// Highest page number ever allocated (0 = none yet)
    max_page: PageNumber,
    /// Freed numbers available for reuse, most recent last
    freed_pages: Vec<PageNumber>,
}

impl FreeList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next page number: the most recently freed one, or `max_page + 1`
    pub fn get_next_page(&mut self) -> PageNumber {
        if let Some(page) = self.freed_pages.pop() {
            debug!(page, "reusing freed page");
            return page;
        }

        self.max_page += 1;
        debug!(page = self.max_page, "allocated new page");
        self.max_page
    }

    /// Make `page` eligible for reuse
    ///
    /// In `Permissive` mode nothing is rejected, so a duplicate or
    /// never-allocated number will later be handed out again.
    ///
    /// The double-free check scans the reuse pool, so a free costs
    /// O(freed pages).
    pub fn free_page(&mut self, page: PageNumber, mode: ContractMode) -> FileResult<()> {
        let checked = mode == ContractMode::Checked;

        if page == 0 || page > self.max_page {
            warn!(page, max_page = self.max_page, checked, "free of unallocated page");
            if checked {
                return Err(FileError::PageNotAllocated(page));
            }
        } else if self.freed_pages.contains(&page) {
            warn!(page, checked, "double free");
            if checked {
                return Err(FileError::DoubleFree(page));
            }
        }

        debug!(page, "freed page");
        self.freed_pages.push(page);
        Ok(())
    }

    /// Check that every freed number is in `1..=max_page` and appears once
    pub fn validate(&self) -> FileResult<()> {
        let mut seen = HashSet::with_capacity(self.freed_pages.len());
        for &page in &self.freed_pages {
            if page == 0 || page > self.max_page {
                return Err(FileError::PageNotAllocated(page));
            }
            if !seen.insert(page) {
                return Err(FileError::DoubleFree(page));
            }
        }
        Ok(())
    }

    pub fn max_page(&self) -> PageNumber {
        self.max_page
    }

    pub fn freed_pages(&self) -> &[PageNumber] {
        &self.freed_pages
    }

    pub fn len_free(&self) -> usize {
        self.freed_pages.len()
    }
}
