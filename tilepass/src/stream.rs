// Copyright 2026 the Tilepass Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use tilepass_encoding::{StreamConfig, LINK_BIT};

/// A fixed-capacity word stream, optionally split into linked pages.
///
/// In a paged stream no record straddles a page boundary. The last word of
/// every page is kept free so that a link to the next page always fits after
/// the final record of a page.
#[derive(Clone, Debug)]
pub struct ParameterStream {
    words: Vec<u32>,
    cursor: u32,
    page_words: Option<u32>,
    page_transitions: u32,
}

impl ParameterStream {
    pub fn new(config: StreamConfig) -> Self {
        Self {
            words: vec![0; config.capacity_words as usize],
            cursor: 0,
            page_words: config.page_words,
            page_transitions: 0,
        }
    }

    fn limit(&self) -> u32 {
        self.words.len() as u32
    }

    /// Word offset of the next write.
    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    pub fn capacity(&self) -> u32 {
        self.limit()
    }

    pub fn page_words(&self) -> Option<u32> {
        self.page_words
    }

    /// Words left before the end of the stream.
    pub fn remaining(&self) -> u32 {
        self.limit() - self.cursor
    }

    /// Number of page links written since the last reset.
    pub fn page_transitions(&self) -> u32 {
        self.page_transitions
    }

    /// Writable words before the current page's reserved link word.
    pub fn space_to_boundary(&self) -> u32 {
        let end = match self.page_words {
            Some(page) => {
                let page_end = (self.cursor / page + 1) * page;
                (page_end - 1).min(self.limit())
            }
            None => self.limit(),
        };
        end.saturating_sub(self.cursor)
    }

    /// Number of `record_words`-sized records that still fit, counting the
    /// words lost to page links and page tails.
    pub fn records_that_fit(&self, record_words: u32) -> u32 {
        if record_words == 0 {
            return 0;
        }
        let Some(page) = self.page_words else {
            return self.remaining() / record_words;
        };
        let here = self.space_to_boundary() / record_words;
        let next = (self.cursor / page + 1) * page;
        if next >= self.limit() {
            return here;
        }
        let rest = self.limit() - next;
        let per_page = (page - 1) / record_words;
        here + (rest / page) * per_page + (rest % page) / record_words
    }

    /// Appends `words`, which must fit before the page boundary.
    pub fn write(&mut self, words: &[u32]) {
        debug_assert!(words.len() as u32 <= self.space_to_boundary());
        let start = self.cursor as usize;
        self.words[start..start + words.len()].copy_from_slice(words);
        self.cursor += words.len() as u32;
    }

    /// Writes a link at the cursor and moves to the start of the next page.
    ///
    /// Returns `false` if the stream is unpaged or has no further page.
    pub fn next_page(&mut self) -> bool {
        let Some(page) = self.page_words else {
            return false;
        };
        let next = (self.cursor / page + 1) * page;
        if next >= self.limit() {
            return false;
        }
        self.words[self.cursor as usize] = LINK_BIT | next;
        self.cursor = next;
        self.page_transitions += 1;
        true
    }

    /// Everything written since the last reset.
    pub fn words(&self) -> &[u32] {
        &self.words[..self.cursor as usize]
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.words())
    }

    /// Empties the stream for a new frame.
    pub fn reset(&mut self) {
        self.words[..self.cursor as usize].fill(0);
        self.cursor = 0;
        self.page_transitions = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::ParameterStream;
    use tilepass_encoding::{StreamConfig, LINK_BIT};

    #[test]
    fn unpaged_capacity() {
        let mut stream = ParameterStream::new(StreamConfig::unpaged(100));
        assert_eq!(7, stream.records_that_fit(13));
        stream.write(&[1; 13]);
        assert_eq!(87, stream.remaining());
        assert_eq!(6, stream.records_that_fit(13));
        assert!(!stream.next_page());
    }

    #[test]
    fn paged_capacity_skips_link_words() {
        // Three pages of 32 words, 31 usable each.
        let stream = ParameterStream::new(StreamConfig::paged(96, 32));
        assert_eq!(31, stream.space_to_boundary());
        assert_eq!(3, stream.records_that_fit(16));
        assert_eq!(6, stream.records_that_fit(13));
        // A short final page holds one more record.
        let stream = ParameterStream::new(StreamConfig::paged(80, 32));
        assert_eq!(5, stream.records_that_fit(13));
    }

    #[test]
    fn link_points_at_next_page() {
        let mut stream = ParameterStream::new(StreamConfig::paged(64, 32));
        stream.write(&[7; 16]);
        assert_eq!(15, stream.space_to_boundary());
        assert!(stream.next_page());
        assert_eq!(32, stream.cursor());
        assert_eq!(LINK_BIT | 32, stream.words()[16]);
        assert_eq!(1, stream.page_transitions());
        stream.write(&[9; 16]);
        assert!(!stream.next_page());
        assert_eq!(48 * 4, stream.as_bytes().len());

        stream.reset();
        assert_eq!(0, stream.cursor());
        assert_eq!(31, stream.space_to_boundary());
        assert_eq!(0, stream.page_transitions());
    }
}
