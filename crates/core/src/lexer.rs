use crate::error::GenError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Dimension names and option names, distinguished in the parser
    Word(String),
    // Punctuation
    Pipe,
    Eq,
    LParen,
    RParen,
    // Logical operators
    And, // &&
    Or,  // ||
    Not, // !
    // End of input
    Eof,
}

#[derive(Debug, Clone)]
pub struct Spanned {
    pub token: Token,
    /// Byte offset of the token in the lexed text.
    pub offset: usize,
}

/// Tokenize a block condition such as `int|long key && !(obj value)`.
pub fn lex(src: &str) -> Result<Vec<Spanned>, GenError> {
    let mut tokens = Vec::new();
    let mut chars = src.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        if c.is_whitespace() {
            continue;
        }

        let token = match c {
            '|' => {
                if chars.next_if(|&(_, n)| n == '|').is_some() {
                    Token::Or
                } else {
                    Token::Pipe
                }
            }
            '&' => {
                if chars.next_if(|&(_, n)| n == '&').is_some() {
                    Token::And
                } else {
                    return Err(GenError::malformed(
                        src,
                        offset,
                        "expected `&&` in condition",
                    ));
                }
            }
            '=' => Token::Eq,
            '!' => Token::Not,
            '(' => Token::LParen,
            ')' => Token::RParen,
            c if c.is_alphanumeric() || c == '_' => {
                let mut end = offset + c.len_utf8();
                while let Some((i, n)) = chars.next_if(|&(_, n)| n.is_alphanumeric() || n == '_')
                {
                    end = i + n.len_utf8();
                }
                Token::Word(src[offset..end].to_owned())
            }
            other => {
                return Err(GenError::malformed(
                    src,
                    offset,
                    format!("unexpected character '{}' in condition", other),
                ));
            }
        };
        tokens.push(Spanned { token, offset });
    }

    tokens.push(Spanned {
        token: Token::Eof,
        offset: src.len(),
    });
    Ok(tokens)
}
