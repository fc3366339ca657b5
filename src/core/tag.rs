/// Escape-tag tokenizer — decomposes a page into atomic reveal steps.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TagError {
    #[error("unterminated format tag starting at character {0}")]
    UnterminatedTag(usize),
}

/// One reveal step of a page: either a single plain character or a whole
/// formatting tag that must never appear partially revealed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A single plain character.
    Char(char),
    /// A formatting tag, rewritten from `<<...>>` to `<...>`.
    Tag(String),
}

impl Token {
    /// Append this step's text to a display buffer.
    pub fn push_onto(&self, buf: &mut String) {
        match self {
            Token::Char(c) => buf.push(*c),
            Token::Tag(tag) => buf.push_str(tag),
        }
    }
}

/// What to do with a `<<` that has no matching `>>` before the page ends.
///
/// The original behavior read past the string; both policies here are
/// bounds-safe and deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TagPolicy {
    /// Reject the page with [`TagError::UnterminatedTag`].
    #[default]
    Strict,
    /// Emit the unterminated remainder as plain characters.
    Lenient,
}

/// Tokenize one page.
///
/// Syntax:
/// - `<<contents>>` → `Token::Tag("<contents>")`, one atomic step
/// - everything else → one `Token::Char` per character
///
/// Tags do not nest: interior `<` is literal content and only `>>`
/// terminates a tag. Lookahead at the end of the page is bounds-guarded,
/// so a trailing `<` or an unterminated tag never reads past the string.
pub fn tokenize(page: &str, policy: TagPolicy) -> Result<Vec<Token>, TagError> {
    let chars: Vec<char> = page.chars().collect();
    let len = chars.len();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < len {
        if chars[i] == '<' && i + 1 < len && chars[i + 1] == '<' {
            let start = i;
            i += 2;

            let mut contents = String::new();
            let mut closed = false;
            while i < len {
                if chars[i] == '>' && i + 1 < len && chars[i + 1] == '>' {
                    i += 2;
                    closed = true;
                    break;
                }
                contents.push(chars[i]);
                i += 1;
            }

            if closed {
                tokens.push(Token::Tag(format!("<{}>", contents)));
                continue;
            }

            match policy {
                TagPolicy::Strict => return Err(TagError::UnterminatedTag(start)),
                TagPolicy::Lenient => {
                    for &c in &chars[start..] {
                        tokens.push(Token::Char(c));
                    }
                    break;
                }
            }
        } else {
            tokens.push(Token::Char(chars[i]));
            i += 1;
        }
    }

    Ok(tokens)
}
