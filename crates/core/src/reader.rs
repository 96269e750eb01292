//! Pull-style token reader over a lexed JSON document.
//!
//! [`TokenReader`] hands out one structural token at a time and enforces the
//! JSON grammar as it goes (colons after names, commas between members,
//! balanced brackets), so consumers can walk a request body in a single
//! forward pass without lookahead.

use serde_json::{Map, Number, Value};

use crate::error::{Location, ParseError};
use crate::lexer::{self, Spanned, Token};

/// Default cap on object/array nesting.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Highest nesting cap a reader accepts. Materialized values are built and
/// dropped recursively, so deeper documents would exhaust the stack.
pub const MAX_DEPTH_LIMIT: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    StartObject,
    EndObject,
    StartArray,
    EndArray,
    FieldName,
    ValueString,
    ValueNumber,
    ValueBoolean,
    ValueNull,
}

impl TokenKind {
    pub fn is_value(self) -> bool {
        matches!(
            self,
            TokenKind::ValueString
                | TokenKind::ValueNumber
                | TokenKind::ValueBoolean
                | TokenKind::ValueNull
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Just after `{`: a field name or `}` follows.
    ObjectStart,
    /// After `"name":`: a value follows.
    ObjectValue,
    /// After a member value: `,` or `}` follows.
    ObjectNext,
    /// Just after `[`: a value or `]` follows.
    ArrayStart,
    /// After an element: `,` or `]` follows.
    ArrayNext,
}

#[derive(Debug)]
struct Frame {
    state: State,
    /// Last field name seen in this object; always `None` for arrays.
    name: Option<String>,
}

#[derive(Debug)]
pub struct TokenReader {
    tokens: Vec<Spanned>,
    pos: usize,
    stack: Vec<Frame>,
    root_done: bool,
    current: Option<TokenKind>,
    text: Option<String>,
    location: Location,
    max_depth: usize,
}

impl TokenReader {
    pub fn new(tokens: Vec<Spanned>) -> Self {
        TokenReader {
            tokens,
            pos: 0,
            stack: Vec::new(),
            root_done: false,
            current: None,
            text: None,
            location: Location::new(1, 1),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Lex `src` and position a reader before its first token.
    pub fn from_source(src: &str) -> Result<Self, ParseError> {
        Ok(TokenReader::new(lexer::lex(src)?))
    }

    /// Set the nesting cap, clamped to [`MAX_DEPTH_LIMIT`].
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.min(MAX_DEPTH_LIMIT);
        self
    }

    /// The token most recently returned by [`next_token`](Self::next_token).
    pub fn current(&self) -> Option<TokenKind> {
        self.current
    }

    /// Source position of the current token.
    pub fn location(&self) -> Location {
        self.location
    }

    /// Current nesting depth (0 outside the root value).
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Name of the field the current token belongs to.
    ///
    /// For a `FieldName` token this is the name itself; for a value or a
    /// container start it is the name of the member holding it; for a
    /// container end it is the name the container was stored under.
    /// Elements of an array have no name.
    pub fn current_name(&self) -> Option<&str> {
        let skip = match self.current {
            Some(TokenKind::StartObject | TokenKind::StartArray) => 1,
            _ => 0,
        };
        self.stack
            .iter()
            .rev()
            .nth(skip)
            .and_then(|frame| frame.name.as_deref())
    }

    /// Text of the current scalar or field-name token.
    pub fn text(&self) -> Result<&str, ParseError> {
        match (&self.current, &self.text) {
            (Some(kind), Some(text)) if *kind == TokenKind::FieldName || kind.is_value() => {
                Ok(text.as_str())
            }
            _ => Err(self.err(format!(
                "expected a scalar value, got {}",
                self.describe_current()
            ))),
        }
    }

    /// Advance to the next structural token.
    pub fn next_token(&mut self) -> Result<TokenKind, ParseError> {
        let kind = self.advance()?;
        self.current = Some(kind);
        Ok(kind)
    }

    /// Materialize the array starting at the current `StartArray` token,
    /// leaving the reader on its `EndArray`.
    pub fn list(&mut self) -> Result<Value, ParseError> {
        if self.current != Some(TokenKind::StartArray) {
            return Err(self.err(format!(
                "expected an array, got {}",
                self.describe_current()
            )));
        }
        self.object_value()
    }

    /// Materialize the value at the current token. Containers are consumed
    /// through their closing token.
    pub fn object_value(&mut self) -> Result<Value, ParseError> {
        match self.current {
            Some(TokenKind::ValueString) => Ok(Value::String(self.text()?.to_owned())),
            Some(TokenKind::ValueNumber) => {
                let text = self.text()?;
                match serde_json::from_str::<Number>(text) {
                    Ok(number) => Ok(Value::Number(number)),
                    // Lexically valid but beyond f64: keep the source text.
                    Err(_) => {
                        tracing::debug!(number = text, "number out of f64 range kept as text");
                        Ok(Value::String(text.to_owned()))
                    }
                }
            }
            Some(TokenKind::ValueBoolean) => Ok(Value::Bool(self.text()? == "true")),
            Some(TokenKind::ValueNull) => Ok(Value::Null),
            Some(TokenKind::StartArray) => {
                let mut items = Vec::new();
                while self.next_token()? != TokenKind::EndArray {
                    items.push(self.object_value()?);
                }
                Ok(Value::Array(items))
            }
            Some(TokenKind::StartObject) => {
                let mut map = Map::new();
                loop {
                    match self.next_token()? {
                        TokenKind::EndObject => break,
                        TokenKind::FieldName => {
                            let name = self.text()?.to_owned();
                            self.next_token()?;
                            let value = self.object_value()?;
                            map.insert(name, value);
                        }
                        // The grammar guarantees a name before every member value.
                        _ => return Err(self.err("expected a field name")),
                    }
                }
                Ok(Value::Object(map))
            }
            _ => Err(self.err(format!(
                "expected a value, got {}",
                self.describe_current()
            ))),
        }
    }

    /// Check that the root value is complete and nothing follows it.
    pub fn finish(&mut self) -> Result<(), ParseError> {
        if !self.root_done {
            return Err(self.err("document ended before the root value was closed"));
        }
        let tok = self.bump();
        if tok.token != Token::Eof {
            return Err(ParseError::syntax(
                tok.location,
                format!("unexpected {} after end of document", tok.token.describe()),
            ));
        }
        Ok(())
    }

    // ── internals ────────────────────────────────────────────────────

    fn err(&self, message: impl Into<String>) -> ParseError {
        ParseError::syntax(self.location, message)
    }

    fn describe_current(&self) -> String {
        match self.current {
            None => "nothing (no token read yet)".to_owned(),
            Some(kind) => format!("{:?}", kind),
        }
    }

    fn bump(&mut self) -> Spanned {
        let last = self.tokens.len().saturating_sub(1);
        let tok = self.tokens.get(self.pos.min(last)).cloned().unwrap_or(Spanned {
            token: Token::Eof,
            location: self.location,
        });
        if self.pos < last {
            self.pos += 1;
        }
        self.location = tok.location;
        tok
    }

    fn set_state(&mut self, state: State) {
        if let Some(frame) = self.stack.last_mut() {
            frame.state = state;
        }
    }

    fn unexpected(&self, tok: &Spanned, expected: &str) -> ParseError {
        let message = if tok.token == Token::Eof {
            format!("unexpected end of input, expected {}", expected)
        } else {
            format!("expected {}, got {}", expected, tok.token.describe())
        };
        ParseError::syntax(tok.location, message)
    }

    fn advance(&mut self) -> Result<TokenKind, ParseError> {
        self.text = None;
        let state = self.stack.last().map(|f| f.state);
        match state {
            None => {
                if self.root_done {
                    let tok = self.bump();
                    return Err(self.unexpected(&tok, "nothing after the end of the document"));
                }
                let tok = self.bump();
                self.begin_value(tok)
            }
            Some(State::ObjectStart) => {
                let tok = self.bump();
                match tok.token {
                    Token::RBrace => Ok(self.close()),
                    Token::Str(_) => self.field_name(tok),
                    _ => Err(self.unexpected(&tok, "a field name or '}'")),
                }
            }
            Some(State::ObjectValue) => {
                let tok = self.bump();
                self.set_state(State::ObjectNext);
                self.begin_value(tok)
            }
            Some(State::ObjectNext) => {
                let tok = self.bump();
                match tok.token {
                    Token::RBrace => Ok(self.close()),
                    Token::Comma => {
                        let tok = self.bump();
                        if matches!(tok.token, Token::Str(_)) {
                            self.field_name(tok)
                        } else {
                            Err(self.unexpected(&tok, "a field name"))
                        }
                    }
                    _ => Err(self.unexpected(&tok, "',' or '}'")),
                }
            }
            Some(State::ArrayStart) => {
                let tok = self.bump();
                if tok.token == Token::RBracket {
                    return Ok(self.close());
                }
                self.set_state(State::ArrayNext);
                self.begin_value(tok)
            }
            Some(State::ArrayNext) => {
                let tok = self.bump();
                match tok.token {
                    Token::RBracket => Ok(self.close()),
                    Token::Comma => {
                        let tok = self.bump();
                        self.begin_value(tok)
                    }
                    _ => Err(self.unexpected(&tok, "',' or ']'")),
                }
            }
        }
    }

    fn field_name(&mut self, tok: Spanned) -> Result<TokenKind, ParseError> {
        let Token::Str(name) = tok.token else {
            return Err(self.unexpected(&tok, "a field name"));
        };
        let colon = self.bump();
        if colon.token != Token::Colon {
            return Err(self.unexpected(&colon, "':' after field name"));
        }
        // Report the name's own position, not the colon's.
        self.location = tok.location;
        if let Some(frame) = self.stack.last_mut() {
            frame.state = State::ObjectValue;
            frame.name = Some(name.clone());
        }
        self.text = Some(name);
        Ok(TokenKind::FieldName)
    }

    fn begin_value(&mut self, tok: Spanned) -> Result<TokenKind, ParseError> {
        let kind = match tok.token {
            Token::LBrace => return self.open(State::ObjectStart, TokenKind::StartObject),
            Token::LBracket => return self.open(State::ArrayStart, TokenKind::StartArray),
            Token::Str(s) => {
                self.text = Some(s);
                TokenKind::ValueString
            }
            Token::Number(n) => {
                self.text = Some(n);
                TokenKind::ValueNumber
            }
            Token::True => {
                self.text = Some("true".to_owned());
                TokenKind::ValueBoolean
            }
            Token::False => {
                self.text = Some("false".to_owned());
                TokenKind::ValueBoolean
            }
            Token::Null => {
                self.text = Some("null".to_owned());
                TokenKind::ValueNull
            }
            _ => return Err(self.unexpected(&tok, "a value")),
        };
        if self.stack.is_empty() {
            self.root_done = true;
        }
        Ok(kind)
    }

    fn open(&mut self, state: State, kind: TokenKind) -> Result<TokenKind, ParseError> {
        if self.stack.len() >= self.max_depth {
            return Err(self.err(format!(
                "nesting depth exceeds the limit of {}",
                self.max_depth
            )));
        }
        self.stack.push(Frame { state, name: None });
        Ok(kind)
    }

    fn close(&mut self) -> TokenKind {
        let kind = match self.stack.pop().map(|f| f.state) {
            Some(State::ArrayStart | State::ArrayNext) => TokenKind::EndArray,
            _ => TokenKind::EndObject,
        };
        if self.stack.is_empty() {
            self.root_done = true;
        }
        kind
    }
}
