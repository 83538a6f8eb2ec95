use super::EvalError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    /// Function or constant name; resolved against the whitelist at evaluation
    Ident(String),

    Plus,
    Minus,
    Star,
    Slash,
    /// `^` or `**`
    Caret,

    LParen,
    RParen,
    Comma,
}

/// Split an expression into tokens.
///
/// Accepts:
/// - decimal numbers with an optional exponent (`12`, `0.5`, `.5`, `1.5e3`)
/// - operators `+ - * / ^` and `**` as a synonym of `^`
/// - parentheses and commas
/// - identifiers `[A-Za-z_][A-Za-z0-9_]*`
pub fn tokenize(input: &str) -> Result<Vec<Token>, EvalError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let single = match c {
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '/' => Some(Token::Slash),
            '^' => Some(Token::Caret),
            '(' => Some(Token::LParen),
            ')' => Some(Token::RParen),
            ',' => Some(Token::Comma),
            _ => None,
        };
        if let Some(token) = single {
            tokens.push(token);
            i += 1;
            continue;
        }

        if c == '*' {
            if chars.get(i + 1) == Some(&'*') {
                tokens.push(Token::Caret);
                i += 2;
            } else {
                tokens.push(Token::Star);
                i += 1;
            }
            continue;
        }

        if c.is_ascii_digit() || c == '.' {
            let (number, next) = read_number(&chars, i)?;
            tokens.push(Token::Number(number));
            i = next;
            continue;
        }

        if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            tokens.push(Token::Ident(chars[start..i].iter().collect()));
            continue;
        }

        return Err(EvalError::Invalid(format!("unexpected character '{c}'")));
    }

    Ok(tokens)
}

fn read_number(chars: &[char], start: usize) -> Result<(f64, usize), EvalError> {
    let mut i = start;
    let mut digits = 0;

    while i < chars.len() && chars[i].is_ascii_digit() {
        i += 1;
        digits += 1;
    }
    if i < chars.len() && chars[i] == '.' {
        i += 1;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return Err(EvalError::Invalid("lone decimal point".to_string()));
    }

    // Exponent only counts when digits follow, so "2e" stays a syntax error later
    if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
        let mut j = i + 1;
        if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
            j += 1;
        }
        if j < chars.len() && chars[j].is_ascii_digit() {
            while j < chars.len() && chars[j].is_ascii_digit() {
                j += 1;
            }
            i = j;
        }
    }

    let text: String = chars[start..i].iter().collect();
    text.parse::<f64>()
        .map(|n| (n, i))
        .map_err(|e| EvalError::Invalid(format!("bad number '{text}': {e}")))
}
