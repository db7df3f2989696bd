const QUOTE: char = '"';

/// Trims the input and collapses every run of whitespace into a single space.
pub fn normalize(input: &str) -> String {
    input.split_ascii_whitespace().collect::<Vec<_>>().join(" ")
}

/// Splits a normalized string into tokens.
///
/// Spaces separate tokens unless they sit inside a double-quoted span, in
/// which case they are kept and the whole span becomes one token. The quote
/// characters themselves are never part of a token. An unterminated quote
/// simply runs to the end of the input.
pub fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = vec![];
    let mut buf = String::new();
    let mut open_quote: Option<char> = None;

    for c in input.chars() {
        match c {
            ' ' if open_quote.is_none() => tokens.push(std::mem::take(&mut buf)),
            QUOTE => match open_quote {
                Some(q) if q == c => {
                    tokens.push(std::mem::take(&mut buf));
                    open_quote = None;
                }
                Some(_) => buf.push(c),
                None => open_quote = Some(c),
            },
            _ => buf.push(c),
        }
    }

    if !buf.is_empty() {
        tokens.push(buf);
    }

    tokens
}
