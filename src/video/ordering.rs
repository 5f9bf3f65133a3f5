//! Natural ("alphanumeric") ordering of file names.
//!
//! Names are split into runs of digits and runs of everything else, so that
//! `img2.png` sorts before `img10.png`.

use std::cmp::Ordering;

/// One run of a name split for natural comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chunk<'a> {
    Text(&'a str),
    /// Digit run with leading zeros stripped; compared by length then lexically
    Number(&'a str),
}

impl Ord for Chunk<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Chunk::Number(a), Chunk::Number(b)) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
            (Chunk::Text(a), Chunk::Text(b)) => a.cmp(b),
            // Numbers sort before text at the same position
            (Chunk::Number(_), Chunk::Text(_)) => Ordering::Less,
            (Chunk::Text(_), Chunk::Number(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Chunk<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Split a name into alternating text and number chunks.
///
/// `"z23a"` becomes `[Text("z"), Number("23"), Text("a")]`.
pub fn chunks(name: &str) -> Vec<Chunk<'_>> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_digits: Option<bool> = None;

    for (i, c) in name.char_indices() {
        let digit = c.is_ascii_digit();
        match in_digits {
            Some(prev) if prev != digit => {
                out.push(make_chunk(&name[start..i], prev));
                start = i;
            }
            _ => {}
        }
        in_digits = Some(digit);
    }

    if let Some(digit) = in_digits {
        out.push(make_chunk(&name[start..], digit));
    }

    out
}

fn make_chunk(run: &str, digit: bool) -> Chunk<'_> {
    if digit {
        let trimmed = run.trim_start_matches('0');
        Chunk::Number(if trimmed.is_empty() { "0" } else { trimmed })
    } else {
        Chunk::Text(run)
    }
}

/// Compare two names in natural order.
///
/// Names that compare equal chunk-wise (`a01` and `a1`) fall back to plain
/// string order so sorting stays deterministic.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    chunks(a).cmp(&chunks(b)).then_with(|| a.cmp(b))
}

/// Sort names in place in natural order
pub fn natural_sort<S: AsRef<str>>(names: &mut [S]) {
    names.sort_by(|a, b| natural_cmp(a.as_ref(), b.as_ref()));
}
