use crate::error::{Location, ParseError};

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Quoted string (content without quotes, escapes resolved)
    Str(String),
    /// Number literal, kept as text so integers and decimals survive unchanged
    Number(String),
    True,
    False,
    Null,
    // Punctuation
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Colon,
    Comma,
    // End of input
    Eof,
}

impl Token {
    /// Short human-readable description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Token::Str(s) => format!("string \"{}\"", s),
            Token::Number(n) => format!("number {}", n),
            Token::True => "'true'".to_owned(),
            Token::False => "'false'".to_owned(),
            Token::Null => "'null'".to_owned(),
            Token::LBrace => "'{'".to_owned(),
            Token::RBrace => "'}'".to_owned(),
            Token::LBracket => "'['".to_owned(),
            Token::RBracket => "']'".to_owned(),
            Token::Colon => "':'".to_owned(),
            Token::Comma => "','".to_owned(),
            Token::Eof => "end of input".to_owned(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Spanned {
    pub token: Token,
    pub location: Location,
}

struct Cursor {
    chars: Vec<char>,
    pos: usize,
    line: u32,
    column: u32,
}

impl Cursor {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos).copied()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn location(&self) -> Location {
        Location::new(self.line, self.column)
    }
}

pub fn lex(src: &str) -> Result<Vec<Spanned>, ParseError> {
    let mut tokens = Vec::new();
    let mut cur = Cursor {
        chars: src.chars().collect(),
        pos: 0,
        line: 1,
        column: 1,
    };

    while let Some(c) = cur.peek() {
        // JSON whitespace only; other Unicode spaces are errors.
        if matches!(c, ' ' | '\t' | '\n' | '\r') {
            cur.bump();
            continue;
        }

        let start = cur.location();

        let token = match c {
            '{' => punct(&mut cur, Token::LBrace),
            '}' => punct(&mut cur, Token::RBrace),
            '[' => punct(&mut cur, Token::LBracket),
            ']' => punct(&mut cur, Token::RBracket),
            ':' => punct(&mut cur, Token::Colon),
            ',' => punct(&mut cur, Token::Comma),
            '"' => Token::Str(lex_string(&mut cur, start)?),
            '-' | '0'..='9' => Token::Number(lex_number(&mut cur, start)?),
            c if c.is_ascii_alphabetic() => lex_keyword(&mut cur, start)?,
            other => {
                return Err(ParseError::syntax(
                    start,
                    format!("unexpected character '{}'", other),
                ));
            }
        };

        tokens.push(Spanned {
            token,
            location: start,
        });
    }

    tokens.push(Spanned {
        token: Token::Eof,
        location: cur.location(),
    });
    Ok(tokens)
}

fn punct(cur: &mut Cursor, token: Token) -> Token {
    cur.bump();
    token
}

fn lex_string(cur: &mut Cursor, start: Location) -> Result<String, ParseError> {
    cur.bump(); // opening quote
    let mut s = String::new();
    loop {
        let Some(sc) = cur.bump() else {
            return Err(ParseError::syntax(start, "unterminated string literal"));
        };
        match sc {
            '"' => return Ok(s),
            '\n' => return Err(ParseError::syntax(start, "unterminated string literal")),
            '\\' => {
                let esc_at = cur.location();
                let Some(e) = cur.bump() else {
                    return Err(ParseError::syntax(start, "unterminated escape in string"));
                };
                match e {
                    '"' => s.push('"'),
                    '\\' => s.push('\\'),
                    '/' => s.push('/'),
                    'b' => s.push('\u{0008}'),
                    'f' => s.push('\u{000C}'),
                    'n' => s.push('\n'),
                    'r' => s.push('\r'),
                    't' => s.push('\t'),
                    'u' => s.push(lex_unicode_escape(cur, esc_at)?),
                    other => {
                        return Err(ParseError::syntax(
                            esc_at,
                            format!("invalid escape '\\{}' in string", other),
                        ));
                    }
                }
            }
            c if (c as u32) < 0x20 => {
                return Err(ParseError::syntax(
                    start,
                    "control character in string literal",
                ));
            }
            c => s.push(c),
        }
    }
}

fn read_hex4(cur: &mut Cursor, at: Location) -> Result<u32, ParseError> {
    let mut value = 0u32;
    for _ in 0..4 {
        let digit = cur
            .bump()
            .and_then(|h| h.to_digit(16))
            .ok_or_else(|| ParseError::syntax(at, "invalid \\u escape in string"))?;
        value = value * 16 + digit;
    }
    Ok(value)
}

fn lex_unicode_escape(cur: &mut Cursor, at: Location) -> Result<char, ParseError> {
    let high = read_hex4(cur, at)?;
    if (0xD800..0xDC00).contains(&high) {
        // Surrogate pair: a low surrogate escape must follow immediately
        if cur.peek() == Some('\\') && cur.peek_at(1) == Some('u') {
            cur.bump();
            cur.bump();
            let low = read_hex4(cur, at)?;
            if (0xDC00..0xE000).contains(&low) {
                let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                return char::from_u32(code)
                    .ok_or_else(|| ParseError::syntax(at, "invalid surrogate pair in string"));
            }
        }
        return Err(ParseError::syntax(at, "unpaired surrogate in string"));
    }
    char::from_u32(high).ok_or_else(|| ParseError::syntax(at, "invalid \\u escape in string"))
}

fn take_digits(cur: &mut Cursor, out: &mut String) -> usize {
    let mut n = 0;
    while let Some(d) = cur.peek().filter(char::is_ascii_digit) {
        out.push(d);
        cur.bump();
        n += 1;
    }
    n
}

fn lex_number(cur: &mut Cursor, start: Location) -> Result<String, ParseError> {
    let mut s = String::new();
    if cur.peek() == Some('-') {
        s.push('-');
        cur.bump();
    }

    let int_digits = take_digits(cur, &mut s);
    if int_digits == 0 {
        return Err(ParseError::syntax(start, format!("invalid number '{}'", s)));
    }
    if int_digits > 1 && s.trim_start_matches('-').starts_with('0') {
        return Err(ParseError::syntax(
            start,
            format!("invalid number '{}': leading zeros are not allowed", s),
        ));
    }

    if cur.peek() == Some('.') {
        s.push('.');
        cur.bump();
        if take_digits(cur, &mut s) == 0 {
            return Err(ParseError::syntax(start, format!("invalid number '{}'", s)));
        }
    }

    if let Some(e @ ('e' | 'E')) = cur.peek() {
        s.push(e);
        cur.bump();
        if let Some(sign @ ('+' | '-')) = cur.peek() {
            s.push(sign);
            cur.bump();
        }
        if take_digits(cur, &mut s) == 0 {
            return Err(ParseError::syntax(start, format!("invalid number '{}'", s)));
        }
    }

    Ok(s)
}

fn lex_keyword(cur: &mut Cursor, start: Location) -> Result<Token, ParseError> {
    let mut word = String::new();
    while let Some(c) = cur.peek().filter(char::is_ascii_alphanumeric) {
        word.push(c);
        cur.bump();
    }
    match word.as_str() {
        "true" => Ok(Token::True),
        "false" => Ok(Token::False),
        "null" => Ok(Token::Null),
        _ => Err(ParseError::syntax(
            start,
            format!("unexpected literal '{}'", word),
        )),
    }
}
