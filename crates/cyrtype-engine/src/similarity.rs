//! Ratcliff/Obershelp "gestalt" similarity.
//!
//! The ratio is `2 * M / T` where `T` is the combined length of both
//! strings and `M` is the number of characters in the matching blocks
//! found by recursively taking the longest common substring and repeating
//! on the unmatched pieces to its left and right. Ties for the longest
//! block go to the one starting earliest in `a`, then earliest in `b`.
//!
//! The autocorrection cutoff of 0.8 is tuned for exactly this metric; an
//! edit-distance ratio accepts and rejects different words.

use std::collections::HashMap;

/// A common run: `a[a..a + size] == b[b..b + size]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub a: usize,
    pub b: usize,
    pub size: usize,
}

/// Similarity ratio in `[0, 1]`; two empty strings are identical.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let matched: usize = matching_blocks(&a, &b).iter().map(|m| m.size).sum();
    scaled(matched, a.len() + b.len())
}

/// Upper bound on [`ratio`] from shared character counts, ignoring order.
pub fn quick_ratio(a: &str, b: &str) -> f64 {
    let mut available: HashMap<char, usize> = HashMap::new();
    let mut b_len = 0;
    for c in b.chars() {
        *available.entry(c).or_insert(0) += 1;
        b_len += 1;
    }

    let mut matched = 0;
    let mut a_len = 0;
    for c in a.chars() {
        a_len += 1;
        if let Some(count) = available.get_mut(&c) {
            if *count > 0 {
                *count -= 1;
                matched += 1;
            }
        }
    }
    scaled(matched, a_len + b_len)
}

/// Upper bound on [`ratio`] from lengths alone.
pub fn real_quick_ratio(a_len: usize, b_len: usize) -> f64 {
    scaled(a_len.min(b_len), a_len + b_len)
}

/// Non-overlapping matching blocks in increasing order, adjacent blocks
/// merged.
pub fn matching_blocks(a: &[char], b: &[char]) -> Vec<Match> {
    let mut pending = vec![(0, a.len(), 0, b.len())];
    let mut blocks = Vec::new();

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let m = longest_match(a, b, alo, ahi, blo, bhi);
        if m.size == 0 {
            continue;
        }
        if alo < m.a && blo < m.b {
            pending.push((alo, m.a, blo, m.b));
        }
        if m.a + m.size < ahi && m.b + m.size < bhi {
            pending.push((m.a + m.size, ahi, m.b + m.size, bhi));
        }
        blocks.push(m);
    }
    blocks.sort_by_key(|m| (m.a, m.b));

    let mut merged: Vec<Match> = Vec::with_capacity(blocks.len());
    for m in blocks {
        match merged.last_mut() {
            Some(prev) if prev.a + prev.size == m.a && prev.b + prev.size == m.b => {
                prev.size += m.size;
            }
            _ => merged.push(m),
        }
    }
    merged
}

/// Longest common run inside `a[alo..ahi]` and `b[blo..bhi]`.
fn longest_match(a: &[char], b: &[char], alo: usize, ahi: usize, blo: usize, bhi: usize) -> Match {
    let mut best = Match {
        a: alo,
        b: blo,
        size: 0,
    };
    // run[j + 1] = length of the common run ending at a[i - 1], b[j].
    let mut prev = vec![0usize; b.len() + 1];
    let mut cur = vec![0usize; b.len() + 1];

    for i in alo..ahi {
        for j in blo..bhi {
            let k = if a[i] == b[j] { prev[j] + 1 } else { 0 };
            cur[j + 1] = k;
            if k > best.size {
                best = Match {
                    a: i + 1 - k,
                    b: j + 1 - k,
                    size: k,
                };
            }
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    best
}

fn scaled(matched: usize, total: usize) -> f64 {
    if total == 0 {
        1.0
    } else {
        2.0 * matched as f64 / total as f64
    }
}
