//! Tokenizer for condition expressions.

use super::ExprError;
use std::iter::Peekable;
use std::str::CharIndices;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Int(i64),
    Float(f64),
    Str(String),
    Ident(String),
    True,
    False,
    Nil,
    And,
    Or,
    Not,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    LParen,
    RParen,
    Comma,
    Eof,
}

impl TokenKind {
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Int(n) => n.to_string(),
            Self::Float(x) => x.to_string(),
            Self::Str(s) => format!("{s:?}"),
            Self::Ident(name) => name.clone(),
            Self::True => "true".into(),
            Self::False => "false".into(),
            Self::Nil => "nil".into(),
            Self::And => "&&".into(),
            Self::Or => "||".into(),
            Self::Not => "!".into(),
            Self::Eq => "==".into(),
            Self::Ne => "!=".into(),
            Self::Lt => "<".into(),
            Self::Le => "<=".into(),
            Self::Gt => ">".into(),
            Self::Ge => ">=".into(),
            Self::Plus => "+".into(),
            Self::Minus => "-".into(),
            Self::Star => "*".into(),
            Self::Slash => "/".into(),
            Self::Percent => "%".into(),
            Self::LParen => "(".into(),
            Self::RParen => ")".into(),
            Self::Comma => ",".into(),
            Self::Eof => "end of input".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    /// Byte offset of the first character.
    pub offset: usize,
}

/// Split an expression into tokens, ending with [`TokenKind::Eof`].
pub(crate) fn tokenize(input: &str) -> Result<Vec<Token>, ExprError> {
    let mut chars = input.char_indices().peekable();
    let mut tokens = Vec::new();

    while let Some(&(offset, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let kind = match c {
            '0'..='9' => number(&mut chars)?,
            '"' | '\'' => string(&mut chars)?,
            c if c.is_ascii_alphabetic() || c == '_' => word(&mut chars),
            _ => {
                chars.next();
                symbol(c, offset, &mut chars)?
            }
        };
        tokens.push(Token { kind, offset });
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        offset: input.len(),
    });
    Ok(tokens)
}

fn symbol(
    c: char,
    offset: usize,
    chars: &mut Peekable<CharIndices<'_>>,
) -> Result<TokenKind, ExprError> {
    let mut followed_by = |next: char| {
        if chars.peek().map(|&(_, c)| c) == Some(next) {
            chars.next();
            true
        } else {
            false
        }
    };

    let kind = match c {
        '(' => TokenKind::LParen,
        ')' => TokenKind::RParen,
        ',' => TokenKind::Comma,
        '+' => TokenKind::Plus,
        '-' => TokenKind::Minus,
        '*' => TokenKind::Star,
        '/' => TokenKind::Slash,
        '%' => TokenKind::Percent,
        '!' if followed_by('=') => TokenKind::Ne,
        '!' => TokenKind::Not,
        '=' if followed_by('=') => TokenKind::Eq,
        '<' if followed_by('=') => TokenKind::Le,
        '<' => TokenKind::Lt,
        '>' if followed_by('=') => TokenKind::Ge,
        '>' => TokenKind::Gt,
        '&' if followed_by('&') => TokenKind::And,
        '|' if followed_by('|') => TokenKind::Or,
        '=' => return Err(ExprError::new(offset, "expected '==', found '='")),
        '&' => return Err(ExprError::new(offset, "expected '&&', found '&'")),
        '|' => return Err(ExprError::new(offset, "expected '||', found '|'")),
        other => return Err(ExprError::new(offset, format!("unexpected character '{other}'"))),
    };
    Ok(kind)
}

fn number(chars: &mut Peekable<CharIndices<'_>>) -> Result<TokenKind, ExprError> {
    let mut text = String::new();
    let mut start = None;
    let mut is_float = false;

    while let Some(&(offset, c)) = chars.peek() {
        start.get_or_insert(offset);
        match c {
            '0'..='9' => text.push(c),
            '.' if !is_float => {
                is_float = true;
                text.push(c);
            }
            _ => break,
        }
        chars.next();
    }

    let offset = start.unwrap_or_default();
    if text.ends_with('.') {
        return Err(ExprError::new(offset, "expected digits after decimal point"));
    }
    if is_float {
        text.parse()
            .map(TokenKind::Float)
            .map_err(|_| ExprError::new(offset, format!("invalid number '{text}'")))
    } else {
        text.parse()
            .map(TokenKind::Int)
            .map_err(|_| ExprError::new(offset, format!("integer literal '{text}' is out of range")))
    }
}

fn string(chars: &mut Peekable<CharIndices<'_>>) -> Result<TokenKind, ExprError> {
    let Some((start, quote)) = chars.next() else {
        return Err(ExprError::new(0, "expected string literal"));
    };
    let mut text = String::new();

    loop {
        match chars.next() {
            None => return Err(ExprError::new(start, "unterminated string literal")),
            Some((_, c)) if c == quote => return Ok(TokenKind::Str(text)),
            Some((offset, '\\')) => match chars.next() {
                Some((_, 'n')) => text.push('\n'),
                Some((_, 't')) => text.push('\t'),
                Some((_, 'r')) => text.push('\r'),
                Some((_, c @ ('\\' | '"' | '\''))) => text.push(c),
                Some((_, other)) => {
                    return Err(ExprError::new(offset, format!("unknown escape '\\{other}'")))
                }
                None => return Err(ExprError::new(start, "unterminated string literal")),
            },
            Some((_, c)) => text.push(c),
        }
    }
}

fn word(chars: &mut Peekable<CharIndices<'_>>) -> TokenKind {
    let mut text = String::new();
    while let Some(&(_, c)) = chars.peek() {
        if c.is_ascii_alphanumeric() || c == '_' {
            text.push(c);
            chars.next();
        } else {
            break;
        }
    }

    match text.as_str() {
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "nil" | "null" => TokenKind::Nil,
        "and" => TokenKind::And,
        "or" => TokenKind::Or,
        "not" => TokenKind::Not,
        _ => TokenKind::Ident(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn tokenizes_operators_and_keywords() {
        assert_eq!(
            kinds("a >= 1 and not b != 'x' || c"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::Ge,
                TokenKind::Int(1),
                TokenKind::And,
                TokenKind::Not,
                TokenKind::Ident("b".into()),
                TokenKind::Ne,
                TokenKind::Str("x".into()),
                TokenKind::Or,
                TokenKind::Ident("c".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn numbers_keep_their_kind() {
        assert_eq!(kinds("42 2.5"), vec![TokenKind::Int(42), TokenKind::Float(2.5), TokenKind::Eof]);
    }

    #[test]
    fn strings_support_escapes() {
        assert_eq!(
            kinds(r#""a\"b\n" 'it\'s'"#),
            vec![
                TokenKind::Str("a\"b\n".into()),
                TokenKind::Str("it's".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn offsets_point_at_token_start() {
        let tokens = tokenize("x  == 10").unwrap();

        assert_eq!(tokens[1].offset, 3);
        assert_eq!(tokens[2].offset, 6);
        assert_eq!(tokens[3].offset, 8);
    }

    #[test]
    fn single_equals_is_rejected() {
        let err = tokenize("a = 1").unwrap_err();

        assert_eq!(err.offset, 2);
    }

    #[test]
    fn unterminated_string_is_rejected() {
        assert!(tokenize("'open").is_err());
    }

    #[test]
    fn trailing_decimal_point_is_rejected() {
        assert!(tokenize("1.").is_err());
    }

    #[test]
    fn huge_integer_is_rejected() {
        assert!(tokenize("99999999999999999999").is_err());
    }
}
