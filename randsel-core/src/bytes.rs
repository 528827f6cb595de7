//! Random byte strings inside a lexicographic range.
//!
//! [`sample_between`] returns `b` with `start <= b <= end` under byte-wise
//! ordering, where a proper prefix sorts before any of its extensions. Output
//! length varies: the bytes past the shared prefix of the bounds are drawn as
//! if from a 257-symbol alphabet whose extra symbol means "end of string".

use tracing::trace;

use crate::source::RandomSource;

/// Number of outcomes per position when choosing the output length: 256 byte
/// values plus one end-of-string marker.
const LENGTH_ALPHABET: u32 = 257;
const END_OF_STRING: u32 = 256;

/// Draw a byte string in `[start, end]`.
///
/// Empty bounds are valid; `start == end` returns a copy of `start`. Runs in
/// `O(max(start.len(), end.len()))`.
///
/// # Panics
///
/// Panics if `start` compares greater than `end`.
///
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use randsel_core::bytes::sample_between;
///
/// let mut rng = StdRng::seed_from_u64(3);
/// let key = sample_between(b"apple", b"apricot", &mut rng);
/// assert!(b"apple".as_slice() <= key.as_slice() && key.as_slice() <= b"apricot".as_slice());
/// ```
pub fn sample_between<S: RandomSource + ?Sized>(start: &[u8], end: &[u8], source: &mut S) -> Vec<u8> {
    let shared = start.len().min(end.len());
    let longest = start.len().max(end.len());

    let mut out = Vec::with_capacity(longest);
    let mut i = 0;
    while i < shared && start[i] == end[i] {
        out.push(start[i]);
        i += 1;
    }

    if i < shared {
        if start[i] > end[i] {
            inverted(start, end, i);
        }
    } else if start.len() > end.len() {
        inverted(start, end, i);
    }

    if i == longest {
        return out;
    }

    // From here `end` has a byte at `i`: either the bounds diverge inside the
    // shared length, or `start` is a proper prefix of `end`.
    let mut floor = start.get(i).copied().unwrap_or(0);
    let mut ceiling = end[i];
    let mut prefix_of_start = i < start.len();
    let mut prefix_of_end = true;

    let mut target = longest;
    for _ in shared..longest {
        if source.below(LENGTH_ALPHABET) != END_OF_STRING {
            break;
        }
        target -= 1;
    }
    trace!(prefix = i, longest, target, "byte range sample");

    // A strict prefix of `start` sorts below `start`, so generation keeps
    // going past `target` until that is no longer the case.
    while i < target || prefix_of_start {
        let span = u32::from(ceiling) - u32::from(floor) + 1;
        let byte = (u32::from(floor) + source.below(span)) as u8;
        out.push(byte);

        if prefix_of_start && byte == floor && i + 1 < start.len() {
            floor = start[i + 1];
        } else {
            floor = 0;
            prefix_of_start = false;
        }

        if prefix_of_end && byte == ceiling {
            match end.get(i + 1) {
                Some(&next) => ceiling = next,
                // Output equals `end`; any further byte would exceed it.
                None => return out,
            }
        } else {
            ceiling = 255;
            prefix_of_end = false;
        }

        i += 1;
    }

    debug_assert!(in_range(start, end, &out));
    out
}

/// Whether `candidate` lies in `[start, end]` lexicographically.
pub fn in_range(start: &[u8], end: &[u8], candidate: &[u8]) -> bool {
    start <= candidate && candidate <= end
}

#[cold]
fn inverted(start: &[u8], end: &[u8], position: usize) -> ! {
    panic!(
        "start {} compares lexicographically greater than end {} at position {position}",
        to_hex(start),
        to_hex(end)
    )
}

/// Lowercase hex, two digits per byte. Used for bounds in panic messages
/// and by the CLI for output.
pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
