//! Postgres array literals (`{1,2,"a b",NULL}`).

use super::element::ArrayElement;
use super::error::DecodeError;
use std::iter::Peekable;
use std::str::Chars;

/// Render `values` as a one-dimensional array literal.
pub(crate) fn write_literal<T: ArrayElement>(values: &[T]) -> String {
    let mut out = String::from("{");
    let mut item = String::new();
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        item.clear();
        value.write_text(&mut item);
        if needs_quoting(&item) {
            out.push('"');
            for c in item.chars() {
                if c == '"' || c == '\\' {
                    out.push('\\');
                }
                out.push(c);
            }
            out.push('"');
        } else {
            out.push_str(&item);
        }
    }
    out.push('}');
    out
}

fn needs_quoting(item: &str) -> bool {
    item.is_empty()
        || item.eq_ignore_ascii_case("NULL")
        || item
            .chars()
            .any(|c| matches!(c, '{' | '}' | ',' | '"' | '\\') || is_array_space(c))
}

/// The only characters Postgres skips around array elements.
fn is_array_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c')
}

/// Split a one-dimensional array literal into its elements.
///
/// Quoted elements are unescaped; an unquoted `NULL` yields `None`. A leading
/// dimension decoration such as `[0:2]=` is skipped.
pub(crate) fn parse_literal(literal: &str) -> Result<Vec<Option<String>>, DecodeError> {
    let mut s = literal.trim_matches(is_array_space);
    if s.starts_with('[') {
        let Some(eq) = s.find('=') else {
            return Err(DecodeError::malformed("dimension decoration without '='"));
        };
        if s[..eq].matches('[').count() > 1 {
            return Err(DecodeError::UnsupportedDimensions(
                s[..eq].matches('[').count() as i32,
            ));
        }
        s = s[eq + 1..].trim_start_matches(is_array_space);
    }

    let body = s
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .ok_or_else(|| DecodeError::malformed(format!("{literal:?} is not an array literal")))?;

    if body.trim_matches(is_array_space).is_empty() {
        return Ok(Vec::new());
    }

    let mut chars = body.chars().peekable();
    let mut items = Vec::new();
    loop {
        skip_whitespace(&mut chars);
        let item = match chars.peek() {
            Some('"') => {
                chars.next();
                let quoted = read_quoted(&mut chars)?;
                skip_whitespace(&mut chars);
                Some(quoted)
            }
            Some('{') => return Err(DecodeError::UnsupportedDimensions(2)),
            Some(',') | None => return Err(DecodeError::malformed("empty array element")),
            Some(_) => read_unquoted(&mut chars)?,
        };
        items.push(item);

        match chars.next() {
            Some(',') => continue,
            None => break,
            Some(c) => {
                return Err(DecodeError::malformed(format!(
                    "unexpected character {c:?} after element {}",
                    items.len() - 1
                )));
            }
        }
    }
    Ok(items)
}

fn skip_whitespace(chars: &mut Peekable<Chars<'_>>) {
    while chars.next_if(|&c| is_array_space(c)).is_some() {}
}

fn read_quoted(chars: &mut Peekable<Chars<'_>>) -> Result<String, DecodeError> {
    let mut out = String::new();
    loop {
        match chars.next() {
            Some('\\') => match chars.next() {
                Some(c) => out.push(c),
                None => return Err(DecodeError::malformed("unterminated escape")),
            },
            Some('"') => return Ok(out),
            Some(c) => out.push(c),
            None => return Err(DecodeError::malformed("unterminated quoted element")),
        }
    }
}

fn read_unquoted(chars: &mut Peekable<Chars<'_>>) -> Result<Option<String>, DecodeError> {
    let mut out = String::new();
    let mut escaped = false;
    while let Some(&c) = chars.peek() {
        if c == ',' {
            break;
        }
        chars.next();
        match c {
            '\\' => match chars.next() {
                Some(next) => {
                    out.push(next);
                    escaped = true;
                }
                None => return Err(DecodeError::malformed("unterminated escape")),
            },
            '{' | '}' | '"' => {
                return Err(DecodeError::malformed(format!(
                    "unexpected {c:?} in unquoted element"
                )));
            }
            _ => out.push(c),
        }
    }

    let trimmed = out.trim_end_matches(is_array_space);
    if !escaped && trimmed.eq_ignore_ascii_case("NULL") {
        return Ok(None);
    }
    Ok(Some(trimmed.to_owned()))
}
