//! Tokenizer for the intercept directive language.
//!
//! Words are separated by blanks; `{` and `}` always stand alone; a
//! double-quoted string is one word and may contain blanks, `\"` and `\\`;
//! `#` starts a comment running to end of line. Line breaks are kept as
//! tokens because each policy occupies exactly one line.

use crate::config::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Word { text: String, quoted: bool },
    OpenBrace,
    CloseBrace,
    Newline,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub line: usize,
}

pub(crate) fn tokenize(input: &str) -> Result<Vec<Token>, ConfigError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();
    let mut line = 1;

    while let Some(&c) = chars.peek() {
        match c {
            '\n' => {
                chars.next();
                tokens.push(Token {
                    kind: TokenKind::Newline,
                    line,
                });
                line += 1;
            }
            c if c.is_whitespace() => {
                chars.next();
            }
            '#' => {
                while let Some(&c) = chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    chars.next();
                }
            }
            '{' => {
                chars.next();
                tokens.push(Token {
                    kind: TokenKind::OpenBrace,
                    line,
                });
            }
            '}' => {
                chars.next();
                tokens.push(Token {
                    kind: TokenKind::CloseBrace,
                    line,
                });
            }
            '"' => {
                let start_line = line;
                chars.next();
                let mut text = String::new();
                let mut closed = false;
                while let Some(c) = chars.next() {
                    match c {
                        '"' => {
                            closed = true;
                            break;
                        }
                        '\\' => match chars.next() {
                            Some(escaped @ ('"' | '\\')) => text.push(escaped),
                            Some(other) => {
                                text.push('\\');
                                text.push(other);
                            }
                            None => break,
                        },
                        '\n' => {
                            line += 1;
                            text.push(c);
                        }
                        _ => text.push(c),
                    }
                }
                if !closed {
                    return Err(ConfigError::Directive {
                        line: start_line,
                        message: format!("unterminated quoted string \"{}", text),
                    });
                }
                tokens.push(Token {
                    kind: TokenKind::Word { text, quoted: true },
                    line: start_line,
                });
            }
            _ => {
                let mut text = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() || matches!(c, '{' | '}' | '"' | '#') {
                        break;
                    }
                    text.push(c);
                    chars.next();
                }
                tokens.push(Token {
                    kind: TokenKind::Word {
                        text,
                        quoted: false,
                    },
                    line,
                });
            }
        }
    }

    Ok(tokens)
}
