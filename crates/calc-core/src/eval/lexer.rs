use crate::errors::ExpressionError;
use crate::number::Number;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(Number),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    LParen,
    RParen,
    Comma,
}

impl TokenKind {
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Number(n) => format!("number {}", n),
            TokenKind::Ident(name) => format!("identifier '{}'", name),
            TokenKind::Plus => "'+'".to_string(),
            TokenKind::Minus => "'-'".to_string(),
            TokenKind::Star => "'*'".to_string(),
            TokenKind::Slash => "'/'".to_string(),
            TokenKind::Percent => "'%'".to_string(),
            TokenKind::Caret => "'^'".to_string(),
            TokenKind::LParen => "'('".to_string(),
            TokenKind::RParen => "')'".to_string(),
            TokenKind::Comma => "','".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset into the source
    pub pos: usize,
}

/// Splits an expression into tokens. Anything outside the token set is an
/// error here, before the parser ever sees it.
pub fn tokenize(src: &str) -> Result<Vec<Token>, ExpressionError> {
    let bytes = src.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        let start = i;

        if c.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        if c.is_ascii_digit() || (c == b'.' && bytes.get(i + 1).is_some_and(u8::is_ascii_digit)) {
            let (number, end) = lex_number(src, start)?;
            tokens.push(Token { kind: TokenKind::Number(number), pos: start });
            i = end;
            continue;
        }

        if c.is_ascii_alphabetic() || c == b'_' {
            while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                i += 1;
            }
            tokens.push(Token {
                kind: TokenKind::Ident(src[start..i].to_string()),
                pos: start,
            });
            continue;
        }

        let kind = match c {
            b'+' => TokenKind::Plus,
            b'-' => TokenKind::Minus,
            b'*' if bytes.get(i + 1) == Some(&b'*') => {
                i += 1;
                TokenKind::Caret
            }
            b'*' => TokenKind::Star,
            b'/' => TokenKind::Slash,
            b'%' => TokenKind::Percent,
            b'^' => TokenKind::Caret,
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b',' => TokenKind::Comma,
            _ => {
                let ch = src[start..].chars().next().unwrap_or('?');
                return Err(ExpressionError::UnexpectedChar { ch, pos: start });
            }
        };
        tokens.push(Token { kind, pos: start });
        i += 1;
    }

    Ok(tokens)
}

fn lex_number(src: &str, start: usize) -> Result<(Number, usize), ExpressionError> {
    let bytes = src.as_bytes();
    let mut i = start;
    let mut is_float = false;

    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        is_float = true;
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
    }
    // Exponent only when digits follow, otherwise the 'e' is left for the identifier rule
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        if j < bytes.len() && bytes[j].is_ascii_digit() {
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            is_float = true;
            i = j;
        }
    }

    let text = &src[start..i];
    let malformed = || ExpressionError::MalformedNumber {
        text: text.to_string(),
        pos: start,
    };
    let number = if is_float {
        let value: f64 = text.parse().map_err(|_| malformed())?;
        if !value.is_finite() {
            return Err(malformed());
        }
        Number::Float(value)
    } else {
        Number::Int(text.parse().map_err(|_| malformed())?)
    };
    Ok((number, i))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_tokenize_arithmetic() {
        assert_eq!(
            kinds("2 + 3 * 4"),
            vec![
                TokenKind::Number(Number::Int(2)),
                TokenKind::Plus,
                TokenKind::Number(Number::Int(3)),
                TokenKind::Star,
                TokenKind::Number(Number::Int(4)),
            ]
        );
    }

    #[test]
    fn test_tokenize_numbers() {
        assert_eq!(kinds(".5"), vec![TokenKind::Number(Number::Float(0.5))]);
        assert_eq!(kinds("1.5e3"), vec![TokenKind::Number(Number::Float(1500.0))]);
        assert_eq!(kinds("3."), vec![TokenKind::Number(Number::Float(3.0))]);
    }

    #[test]
    fn test_double_star_is_power() {
        assert_eq!(
            kinds("2**3"),
            vec![
                TokenKind::Number(Number::Int(2)),
                TokenKind::Caret,
                TokenKind::Number(Number::Int(3)),
            ]
        );
    }

    #[test]
    fn test_rejects_foreign_characters() {
        let err = tokenize("__import__('os')").unwrap_err();
        assert_eq!(err, ExpressionError::UnexpectedChar { ch: '\'', pos: 11 });
        assert!(matches!(tokenize("1 ; 2"), Err(ExpressionError::UnexpectedChar { ch: ';', .. })));
    }

    #[test]
    fn test_integer_literal_too_large() {
        assert!(matches!(
            tokenize("99999999999999999999"),
            Err(ExpressionError::MalformedNumber { .. })
        ));
    }
}
