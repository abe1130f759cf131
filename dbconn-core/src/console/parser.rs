//! Line parser: splits an input line into phrases.
//!
//! Phrases are separated by whitespace. A pair of matching quote characters
//! (`"` or `'`) groups text, whitespace included, into the current phrase;
//! the quotes themselves are dropped. An opening quote without a partner
//! extends the current phrase to the end of the line.

/// A phrase and the byte offset in the line where it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phrase {
    pub text: String,
    pub offset: usize,
}

/// Splits a line into phrases with their starting offsets.
///
/// # Example
/// ```rust
/// use dbconn_core::console::parser::tokenize;
///
/// let phrases = tokenize(r#"export data "order lines""#);
/// assert_eq!(phrases[2].text, "order lines");
/// assert_eq!(phrases[2].offset, 12);
/// ```
pub fn tokenize(line: &str) -> Vec<Phrase> {
    let mut phrases = Vec::new();
    let mut current = String::new();
    let mut start: Option<usize> = None;
    let mut quote: Option<char> = None;

    for (offset, ch) in line.char_indices() {
        match quote {
            Some(open) if ch == open => quote = None,
            Some(_) => current.push(ch),
            None if ch == '"' || ch == '\'' => {
                start.get_or_insert(offset);
                quote = Some(ch);
            }
            None if ch.is_whitespace() => {
                if let Some(offset) = start.take() {
                    phrases.push(Phrase {
                        text: std::mem::take(&mut current),
                        offset,
                    });
                }
            }
            None => {
                start.get_or_insert(offset);
                current.push(ch);
            }
        }
    }

    if let Some(offset) = start {
        phrases.push(Phrase {
            text: current,
            offset,
        });
    }

    phrases
}

/// Splits a line into phrase texts.
///
/// # Example
/// ```rust
/// use dbconn_core::console::parser::parse_phrases;
///
/// assert_eq!(parse_phrases("  describe   table orders "), ["describe", "table", "orders"]);
/// assert_eq!(parse_phrases("connect 'sqlite:my db.db' alice"), ["connect", "sqlite:my db.db", "alice"]);
/// assert!(parse_phrases("   ").is_empty());
/// ```
pub fn parse_phrases(line: &str) -> Vec<String> {
    tokenize(line).into_iter().map(|phrase| phrase.text).collect()
}
