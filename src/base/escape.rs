use super::super::error::{PolicyError, PolicyResult};
use std::convert::TryFrom;

/// Decodes backslash escapes following the `unicode_escape` codec rules.
///
/// Bytes outside of escape sequences are read as Latin-1.
pub(crate) fn unescape(input: &[u8]) -> PolicyResult<String> {
    let mut output = String::with_capacity(input.len());
    let mut pos = 0;

    while pos < input.len() {
        let byte = input[pos];
        if byte != b'\\' {
            output.push(char::from(byte));
            pos += 1;
            continue;
        }

        let start = pos;
        let escaped = *input.get(pos + 1).ok_or(PolicyError::InvalidEscape {
            position: start,
            reason: "\\ at end of string",
        })?;
        pos += 2;

        match escaped {
            b'\n' => {}
            b'\\' => output.push('\\'),
            b'\'' => output.push('\''),
            b'"' => output.push('"'),
            b'a' => output.push('\x07'),
            b'b' => output.push('\x08'),
            b'f' => output.push('\x0c'),
            b'n' => output.push('\n'),
            b'r' => output.push('\r'),
            b't' => output.push('\t'),
            b'v' => output.push('\x0b'),
            b'0'..=b'7' => {
                let mut code = u32::from(escaped - b'0');
                let mut digits = 1;
                while digits < 3 {
                    match input.get(pos) {
                        Some(&d) if (b'0'..=b'7').contains(&d) => {
                            code = code * 8 + u32::from(d - b'0');
                            pos += 1;
                            digits += 1;
                        }
                        _ => break,
                    }
                }
                output.push(to_char(code, start)?);
            }
            b'x' => {
                output.push(read_hex(input, &mut pos, 2, start, "truncated \\xXX escape")?);
            }
            b'u' => {
                output.push(read_hex(input, &mut pos, 4, start, "truncated \\uXXXX escape")?);
            }
            b'U' => {
                output.push(read_hex(
                    input,
                    &mut pos,
                    8,
                    start,
                    "truncated \\UXXXXXXXX escape",
                )?);
            }
            b'N' => {
                return Err(PolicyError::InvalidEscape {
                    position: start,
                    reason: "named unicode escapes are not supported",
                })
            }
            other => {
                output.push('\\');
                output.push(char::from(other));
            }
        }
    }

    Ok(output)
}

fn read_hex(
    input: &[u8],
    pos: &mut usize,
    len: usize,
    start: usize,
    reason: &'static str,
) -> PolicyResult<char> {
    let digits = input
        .get(*pos..*pos + len)
        .filter(|digits| digits.iter().all(u8::is_ascii_hexdigit))
        .ok_or(PolicyError::InvalidEscape {
            position: start,
            reason,
        })?;
    let code = digits.iter().fold(0u32, |code, &d| {
        // all digits were checked above
        code * 16 + char::from(d).to_digit(16).unwrap_or_default()
    });
    *pos += len;
    to_char(code, start)
}

#[inline]
fn to_char(code: u32, position: usize) -> PolicyResult<char> {
    char::try_from(code).map_err(|_| PolicyError::InvalidEscape {
        position,
        reason: "illegal Unicode character",
    })
}
