//! Reading time estimation

use lazy_static::lazy_static;
use regex::Regex;

/// Average reading speed used when none is configured
pub const DEFAULT_WORDS_PER_MINUTE: usize = 225;

lazy_static! {
    // Runs of ASCII word characters, so `don't` counts as two words
    static ref WORD_RE: Regex = Regex::new(r"[0-9A-Za-z_]+").unwrap();
}

/// Count contiguous runs of word characters
pub fn count_words(text: &str) -> usize {
    WORD_RE.find_iter(text).count()
}

/// Minutes needed to read `text`, rounded up; an empty text takes zero minutes
pub fn reading_time(text: &str, words_per_minute: usize) -> u64 {
    count_words(text).div_ceil(words_per_minute.max(1)) as u64
}
