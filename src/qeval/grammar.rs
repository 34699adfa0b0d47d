//! Recursive-descent parser for `vm/qeval` values.
//!
//! ```text
//! value   := typed | record | list | ref | pointer | string | word
//! typed   := '(' value type? ')'
//! record  := 'struct' '{' items? '}'
//! list    := word? '[' items? ']'
//! ref     := 'ref' '(' <opaque> ')'
//! pointer := '&' value
//! items   := value (',' value)*
//! word    := integer | number | 'true' | 'false' | 'nil' | identifier
//! ```
//!
//! Type annotations are kept verbatim; nothing here interprets them.

use crate::core::error::GooError;
use crate::qeval::fields;

/// Nesting limit; response text is untrusted.
pub const MAX_DEPTH: usize = 128;

#[derive(Debug, Clone, PartialEq)]
pub enum QValue {
    Str(String),
    Int(i64),
    /// Numeric literal outside `i64` (large `uint64`, floats), kept raw.
    Number(String),
    Bool(bool),
    Nil,
    /// Bare word such as an address or an enum name.
    Ident(String),
    /// Opaque back-reference to a value emitted elsewhere.
    Ref(String),
    Pointer(Box<QValue>),
    List { tag: String, items: Vec<QValue> },
    Record(Vec<QValue>),
    Typed { value: Box<QValue>, type_name: String },
}

impl QValue {
    /// Strip type annotations and pointer indirections.
    pub fn inner(&self) -> &QValue {
        match self {
            QValue::Typed { value, .. } | QValue::Pointer(value) => value.inner(),
            other => other,
        }
    }

    /// Outermost type annotation, if any.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            QValue::Typed { type_name, .. } => Some(type_name),
            QValue::Pointer(value) => value.type_name(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self.inner() {
            QValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self.inner() {
            QValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.inner() {
            QValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_ref(&self) -> bool {
        matches!(self.inner(), QValue::Ref(_))
    }
}

/// Parse exactly one value; only whitespace may follow it.
pub fn parse(input: &str) -> Result<QValue, GooError> {
    let mut parser = Parser::new(input);
    let value = parser.value()?;
    parser.skip_ws();
    if parser.pos < input.len() {
        return Err(parser.error("trailing input after value"));
    }
    Ok(value)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

fn is_word_byte(b: u8) -> bool {
    !b.is_ascii_whitespace() && !matches!(b, b'(' | b')' | b'[' | b']' | b'{' | b'}' | b',' | b'"' | b'&')
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Parser { src, pos: 0, depth: 0 }
    }

    fn error(&self, msg: &str) -> GooError {
        GooError::MalformedRecord(format!("{} at byte {}", msg, self.pos))
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, b: u8) -> Result<(), GooError> {
        if self.peek() == Some(b) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(&format!("expected '{}'", b as char)))
        }
    }

    fn value(&mut self) -> Result<QValue, GooError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.error("nesting too deep"));
        }
        let result = self.value_inner();
        self.depth -= 1;
        result
    }

    fn value_inner(&mut self) -> Result<QValue, GooError> {
        self.skip_ws();
        match self.peek() {
            None => Err(self.error("unexpected end of input")),
            Some(b'(') => self.typed(),
            Some(b'"') => self.string().map(QValue::Str),
            Some(b'&') => {
                self.pos += 1;
                Ok(QValue::Pointer(Box::new(self.value()?)))
            }
            Some(b'[') => self.list(String::new()),
            Some(b) if is_word_byte(b) => {
                let word = self.word();
                match self.peek() {
                    Some(b'{') if word == "struct" => self.record(),
                    Some(b'(') if word == "ref" => self.reference(),
                    Some(b'[') => self.list(word.to_string()),
                    _ => Ok(classify_word(word)),
                }
            }
            Some(_) => Err(self.error("unexpected character")),
        }
    }

    fn word(&mut self) -> &'a str {
        let src = self.src;
        let start = self.pos;
        while self.peek().is_some_and(is_word_byte) {
            self.pos += 1;
        }
        &src[start..self.pos]
    }

    fn typed(&mut self) -> Result<QValue, GooError> {
        let close = fields::matching_close(self.src, self.pos)?;
        self.expect(b'(')?;
        let value = self.value()?;
        self.skip_ws();
        if self.pos > close {
            return Err(self.error("value overruns its parentheses"));
        }
        let type_name = self.src[self.pos..close].trim().to_string();
        self.pos = close + 1;
        if type_name.is_empty() {
            return Ok(value);
        }
        Ok(QValue::Typed {
            value: Box::new(value),
            type_name,
        })
    }

    fn items(&mut self, close: u8) -> Result<Vec<QValue>, GooError> {
        let mut items = Vec::new();
        self.skip_ws();
        if self.peek() == Some(close) {
            self.pos += 1;
            return Ok(items);
        }
        loop {
            items.push(self.value()?);
            self.skip_ws();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b) if b == close => {
                    self.pos += 1;
                    return Ok(items);
                }
                _ => return Err(self.error(&format!("expected ',' or '{}'", close as char))),
            }
        }
    }

    fn record(&mut self) -> Result<QValue, GooError> {
        self.expect(b'{')?;
        Ok(QValue::Record(self.items(b'}')?))
    }

    fn list(&mut self, tag: String) -> Result<QValue, GooError> {
        self.expect(b'[')?;
        let items = self.items(b']')?;
        Ok(QValue::List { tag, items })
    }

    fn reference(&mut self) -> Result<QValue, GooError> {
        let close = fields::matching_close(self.src, self.pos)?;
        let body = self.src[self.pos + 1..close].trim().to_string();
        self.pos = close + 1;
        Ok(QValue::Ref(body))
    }

    fn string(&mut self) -> Result<String, GooError> {
        self.expect(b'"')?;
        let src = self.src;
        let mut out = String::new();
        let mut chars = src[self.pos..].char_indices();
        while let Some((offset, c)) = chars.next() {
            match c {
                '"' => {
                    self.pos += offset + 1;
                    return Ok(out);
                }
                '\\' => {
                    let Some((_, esc)) = chars.next() else {
                        break;
                    };
                    match esc {
                        'n' => out.push('\n'),
                        't' => out.push('\t'),
                        'r' => out.push('\r'),
                        '0' => out.push('\0'),
                        'x' => {
                            let hex: String = chars.by_ref().take(2).map(|(_, h)| h).collect();
                            match u8::from_str_radix(&hex, 16) {
                                Ok(byte) => out.push(byte as char),
                                Err(_) => return Err(self.error("invalid \\x escape")),
                            }
                        }
                        'u' => {
                            let hex: String = chars.by_ref().take(4).map(|(_, h)| h).collect();
                            match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                                Some(ch) => out.push(ch),
                                None => return Err(self.error("invalid \\u escape")),
                            }
                        }
                        other => out.push(other),
                    }
                }
                other => out.push(other),
            }
        }
        Err(self.error("unterminated string literal"))
    }
}

fn classify_word(word: &str) -> QValue {
    match word {
        "true" => return QValue::Bool(true),
        "false" => return QValue::Bool(false),
        "nil" => return QValue::Nil,
        _ => {}
    }
    if let Ok(i) = word.parse::<i64>() {
        return QValue::Int(i);
    }
    let numeric_start = word
        .trim_start_matches('-')
        .starts_with(|c: char| c.is_ascii_digit());
    if numeric_start && word.parse::<f64>().is_ok() {
        return QValue::Number(word.to_string());
    }
    QValue::Ident(word.to_string())
}
