use std::ops::Range;

/// Lines of menu shown at once.
pub const PAGE_SIZE: usize = 20;

/// Selection cursor over a list of menu entries.
///
/// The menu doesn't own its entries, every call gets the current entry
/// count so the cursor stays valid when the underlying list changes.
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq)]
pub struct Menu {
    selection: usize,
    scroll: usize,
}

impl Menu {
    pub fn selection(&self) -> usize {
        self.selection
    }

    /// Selected index if the list isn't empty.
    pub fn selected(&self, len: usize) -> Option<usize> {
        (self.selection < len).then_some(self.selection)
    }

    /// Move up, wrapping from top to bottom.
    pub fn up(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.selection = (self.selection.min(len - 1) + len - 1) % len;
        self.fit(len);
    }

    /// Move down, wrapping from bottom to top.
    pub fn down(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.selection = (self.selection.min(len - 1) + 1) % len;
        self.fit(len);
    }

    pub fn page_up(&mut self, len: usize) {
        self.selection = self.selection.saturating_sub(PAGE_SIZE);
        self.scroll = self.scroll.saturating_sub(PAGE_SIZE);
        self.fit(len);
    }

    pub fn page_down(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.selection = (self.selection + PAGE_SIZE).min(len - 1);
        self.scroll += PAGE_SIZE;
        self.fit(len);
    }

    /// Range of entries to draw.
    pub fn visible(&self, len: usize) -> Range<usize> {
        let start = self.scroll.min(len);
        start..(start + PAGE_SIZE).min(len)
    }

    /// Clamp cursor and scroll into a list of `len` entries.
    pub fn fit(&mut self, len: usize) {
        if len == 0 {
            *self = Default::default();
            return;
        }
        self.selection = self.selection.min(len - 1);
        self.scroll = self.scroll.min(len.saturating_sub(PAGE_SIZE));
        if self.selection < self.scroll {
            self.scroll = self.selection;
        } else if self.selection >= self.scroll + PAGE_SIZE {
            self.scroll = self.selection + 1 - PAGE_SIZE;
        }
    }
}
