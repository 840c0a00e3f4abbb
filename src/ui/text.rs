//! Text layout for track metadata.
//!
//! Everything here is a pure function from borrowed text to a new
//! fixed-capacity string: cleanup of the raw AVRCP title/artist, the
//! placeholder rules, and the two-line word wrap used by the renderer.

use core::iter;

use heapless::String;

use crate::config::{CHARS_PER_LINE, LINE_CAPACITY, METADATA_CAPACITY, WRAP_SEARCH_WINDOW};

/// Stored metadata text (title, artist).
pub type MetaText = String<METADATA_CAPACITY>;

/// One rendered line of text.
pub type Line = String<LINE_CAPACITY>;

/// Appended to any text cut short by a layout budget.
pub const ELLIPSIS: &str = "...";

/// Separator between channel and song name in streamed video titles.
const CHANNEL_SEPARATOR: &str = " - ";

/// Decorations stripped from titles wherever they occur.
const TITLE_NOISE: [&str; 10] = [
    "(Official Video)",
    "(Official Music Video)",
    "(Official Audio)",
    "(Lyric Video)",
    "(Lyrics)",
    "[Official Video]",
    "[Official Music Video]",
    "[Official Audio]",
    "[Lyric Video]",
    "[Lyrics]",
];

/// Label suffixes stripped from artist names.
const ARTIST_NOISE: [&str; 4] = ["VEVO", "Records", "Music", " - Topic"];

/// Titles that mean "nothing useful yet".
const TITLE_PLACEHOLDERS: [&str; 2] = ["No Track", "Playing Music"];

/// Artists that mean "nothing useful yet".
const ARTIST_PLACEHOLDERS: [&str; 2] = ["Unknown Artist", "From Phone"];

/// Shown instead of a placeholder title.
pub const LOADING_TEXT: &str = "Loading...";

/// Shown instead of a placeholder artist.
pub const NO_ARTIST_TEXT: &str = "No artist info";

/// Copy `text` into a fixed-capacity string, dropping whatever does not
/// fit. Never splits a character.
pub fn bounded<const N: usize>(text: &str) -> String<N> {
    let mut out = String::new();
    push_bounded(&mut out, text);
    out
}

fn push_bounded<const N: usize>(out: &mut String<N>, text: &str) -> bool {
    if out.push_str(text).is_ok() {
        return true;
    }
    for c in text.chars() {
        if out.push(c).is_err() {
            return false;
        }
    }
    true
}

/// Remove every non-overlapping occurrence of `pattern`, left to right.
fn remove_all<const N: usize>(text: &str, pattern: &str) -> String<N> {
    let mut out = String::new();
    for piece in text.split(pattern) {
        if !push_bounded(&mut out, piece) {
            break;
        }
    }
    out
}

/// Keep only the song part of a "Channel - Song" title.
///
/// Applies when the separator appears after the first character and
/// something follows its last occurrence.
fn after_channel_prefix(raw: &str) -> &str {
    match (raw.find(CHANNEL_SEPARATOR), raw.rfind(CHANNEL_SEPARATOR)) {
        (Some(first), Some(last)) if first > 0 && last + CHANNEL_SEPARATOR.len() < raw.len() => {
            &raw[last + CHANNEL_SEPARATOR.len()..]
        }
        _ => raw,
    }
}

/// Clean a raw title as delivered by the phone.
pub fn clean_title(raw: &str) -> MetaText {
    let mut title: MetaText = bounded(after_channel_prefix(raw));
    for noise in TITLE_NOISE {
        title = remove_all(&title, noise);
    }
    bounded(title.trim())
}

/// Clean a raw artist name as delivered by the phone.
pub fn clean_artist(raw: &str) -> MetaText {
    let mut artist: MetaText = bounded(raw);
    for noise in ARTIST_NOISE {
        artist = remove_all(&artist, noise);
    }
    bounded(artist.trim())
}

/// Title to render, with placeholders replaced.
pub fn display_title(title: &str) -> &str {
    if title.is_empty() || TITLE_PLACEHOLDERS.contains(&title) {
        LOADING_TEXT
    } else {
        title
    }
}

/// Artist to render, with placeholders replaced.
pub fn display_artist(artist: &str) -> &str {
    if artist.is_empty() || ARTIST_PLACEHOLDERS.contains(&artist) {
        NO_ARTIST_TEXT
    } else {
        artist
    }
}

fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map_or(text.len(), |(offset, _)| offset)
}

/// Limit `text` to `max` characters, replacing the tail with
/// [`ELLIPSIS`] when it is longer.
pub fn ellipsize(text: &str, max: usize) -> Line {
    if text.chars().count() <= max {
        return bounded(text);
    }
    let keep = max.saturating_sub(ELLIPSIS.len());
    let mut line: Line = bounded(&text[..byte_offset(text, keep)]);
    push_bounded(&mut line, ELLIPSIS);
    line
}

/// Output of [`wrap`]: one line, or two when the text exceeded the budget.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayLines {
    pub first: Line,
    pub second: Option<Line>,
}

impl DisplayLines {
    /// Lines in top-to-bottom order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        iter::once(self.first.as_str()).chain(self.second.as_deref())
    }

    /// Number of display rows this text occupies.
    pub fn line_count(&self) -> usize {
        1 + usize::from(self.second.is_some())
    }
}

/// Word-wrap `text` into at most two lines of `budget` characters.
///
/// The break point is the first space found scanning back from `budget`
/// over [`WRAP_SEARCH_WINDOW`] characters, or `budget` itself. The second
/// line is trimmed and ellipsized if it still does not fit.
pub fn wrap(text: &str, budget: usize) -> DisplayLines {
    if text.chars().count() <= budget {
        return DisplayLines {
            first: bounded(text),
            second: None,
        };
    }

    let break_at = (budget.saturating_sub(WRAP_SEARCH_WINDOW)..=budget)
        .rev()
        .find(|&i| text.chars().nth(i) == Some(' '))
        .unwrap_or(budget);

    let (head, tail) = text.split_at(byte_offset(text, break_at));

    DisplayLines {
        first: bounded(head),
        second: Some(ellipsize(tail.trim(), budget)),
    }
}

/// [`wrap`] with the panel's line budget.
pub fn wrap_line(text: &str) -> DisplayLines {
    wrap(text, CHARS_PER_LINE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_keeps_song_after_channel() {
        let title = clean_title("SomeChannel - Amazing Song (Official Video)");
        assert_eq!(title.as_str(), "Amazing Song");
        assert_eq!(wrap_line(&title).line_count(), 1);
    }

    #[test]
    fn title_uses_last_separator() {
        assert_eq!(clean_title("Label - Artist - Song").as_str(), "Song");
    }

    #[test]
    fn title_separator_at_start_is_ignored() {
        assert_eq!(clean_title(" - Intro - Song").as_str(), "- Intro - Song");
    }

    #[test]
    fn title_trailing_separator_is_kept() {
        assert_eq!(clean_title("Song - ").as_str(), "Song -");
    }

    #[test]
    fn title_strips_every_bracketed_suffix() {
        assert_eq!(clean_title("Song [Lyrics] (Lyric Video)").as_str(), "Song");
        assert_eq!(
            clean_title("Song (Official Music Video)(Official Audio)").as_str(),
            "Song"
        );
        assert_eq!(clean_title("Song [Official Video]").as_str(), "Song");
    }

    #[test]
    fn title_cleanup_is_idempotent() {
        for raw in [
            "SomeChannel - Amazing Song (Official Video)",
            "Plain Title",
            "A - B - C [Lyrics]",
            "   padded   ",
        ] {
            let once = clean_title(raw);
            assert_eq!(clean_title(&once), once, "raw: {raw}");
        }
    }

    #[test]
    fn artist_strips_label_noise() {
        assert_eq!(clean_artist("TaylorSwiftVEVO").as_str(), "TaylorSwift");
        assert_eq!(clean_artist("Big Records").as_str(), "Big");
        assert_eq!(clean_artist("Band - Topic").as_str(), "Band");
        assert_eq!(clean_artist(" Music ").as_str(), "");
    }

    #[test]
    fn overlong_metadata_is_bounded() {
        let raw: std::string::String = "x".repeat(400);
        assert_eq!(clean_artist(&raw).len(), METADATA_CAPACITY);
    }

    #[test]
    fn placeholders_are_replaced() {
        assert_eq!(display_title(""), LOADING_TEXT);
        assert_eq!(display_title("No Track"), LOADING_TEXT);
        assert_eq!(display_title("Playing Music"), LOADING_TEXT);
        assert_eq!(display_title("Song"), "Song");
        assert_eq!(display_artist(""), NO_ARTIST_TEXT);
        assert_eq!(display_artist("Unknown Artist"), NO_ARTIST_TEXT);
        assert_eq!(display_artist("From Phone"), NO_ARTIST_TEXT);
        assert_eq!(display_artist("Band"), "Band");
    }

    #[test]
    fn short_text_is_one_line() {
        let lines = wrap_line("exactly twenty-one ch");
        assert_eq!(lines.first.as_str(), "exactly twenty-one ch");
        assert!(lines.second.is_none());
    }

    #[test]
    fn long_title_breaks_at_budget_without_nearby_space() {
        let lines = wrap_line("A Really Very Extremely Long Song Title Indeed");
        assert_eq!(lines.first.as_str(), "A Really Very Extreme");
        assert_eq!(lines.second.as_deref(), Some("ly Long Song Title..."));
    }

    #[test]
    fn wrap_prefers_space_inside_window() {
        let lines = wrap_line("The Quick Brown Foxes Jump");
        assert_eq!(lines.first.as_str(), "The Quick Brown Foxes");
        assert_eq!(lines.second.as_deref(), Some("Jump"));

        let lines = wrap_line("Somewhere Over The Rainbow");
        assert_eq!(lines.first.as_str(), "Somewhere Over The");
        assert_eq!(lines.second.as_deref(), Some("Rainbow"));
    }

    #[test]
    fn wrapped_lines_respect_budget() {
        for text in [
            "A Really Very Extremely Long Song Title Indeed",
            "Supercalifragilisticexpialidocious and more words here",
            "ab cd ef gh ij kl mn op qr st uv wx yz ab cd ef gh",
        ] {
            let lines = wrap_line(text);
            assert_eq!(lines.line_count(), 2);
            for line in lines.iter() {
                assert!(line.chars().count() <= CHARS_PER_LINE, "{line:?}");
            }
        }
    }

    #[test]
    fn untruncated_wrap_reconstructs_text() {
        let text = "Somewhere Over The Rainbow Way Up";
        let lines = wrap_line(text);
        let second = lines.second.clone().unwrap();
        assert!(!second.ends_with(ELLIPSIS));
        assert_eq!(std::format!("{} {}", lines.first, second), text);
    }

    #[test]
    fn wrap_counts_characters_not_bytes() {
        let text = "Für Elise und die Schöne Müllerin";
        let lines = wrap_line(text);
        assert!(lines.first.chars().count() <= CHARS_PER_LINE);
        assert_eq!(lines.first.as_str(), "Für Elise und die");
    }

    #[test]
    fn ellipsize_matches_label_rule() {
        assert_eq!(ellipsize("Phone Connected", 18).as_str(), "Phone Connected");
        assert_eq!(
            ellipsize("A Very Long Phone Name Indeed", 18).as_str(),
            "A Very Long Pho..."
        );
    }
}
