//! Restaurant id generation strategies.

use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

use crate::{IdGenerator, RestaurantId};

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Encode an unsigned integer in lowercase base36. Zero encodes to "0".
pub fn encode_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    // u64::MAX needs 13 base36 digits
    let mut buf = [0u8; 13];
    let mut i = buf.len();
    while n > 0 {
        i -= 1;
        buf[i] = ALPHABET[(n % 36) as usize];
        n /= 36;
    }
    buf[i..].iter().map(|&b| b as char).collect()
}

/// Parse lowercase base36 as written by [`encode_base36`]. `None` when the
/// text is not base36 or does not fit in a `u64`.
pub fn decode_base36(s: &str) -> Option<u64> {
    if s.is_empty() {
        return None;
    }
    s.bytes().try_fold(0u64, |acc, b| {
        let digit = ALPHABET.iter().position(|&c| c == b)? as u64;
        acc.checked_mul(36)?.checked_add(digit)
    })
}

/// First counter value past every stored id that decodes as base36.
/// Ids from other strategies are ignored.
pub fn next_sequence_after<'a, I>(ids: I) -> u64
where
    I: IntoIterator<Item = &'a RestaurantId>,
{
    ids.into_iter()
        .filter_map(|id| decode_base36(id.as_str()))
        .max()
        .map_or(0, |max| max.saturating_add(1))
}

/// Random v4 UUIDs in simple (unhyphenated) form.
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self) -> RestaurantId {
        let raw = Uuid::new_v4().simple().to_string();
        // Hex digits only, never empty.
        RestaurantId(raw)
    }
}

/// Monotonic counter rendered in base36 and left-padded to `min_width`.
/// Ids never repeat within one generator; seed it past existing ids with
/// [`SequentialIdGenerator::starting_at`] and [`next_sequence_after`].
#[derive(Debug)]
pub struct SequentialIdGenerator {
    next: AtomicU64,
    min_width: usize,
}

impl SequentialIdGenerator {
    pub fn new(min_width: usize) -> Self {
        Self::starting_at(0, min_width)
    }

    pub fn starting_at(first: u64, min_width: usize) -> Self {
        Self {
            next: AtomicU64::new(first),
            min_width,
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> RestaurantId {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        RestaurantId(format!("{:0>width$}", encode_base36(n), width = self.min_width))
    }
}
