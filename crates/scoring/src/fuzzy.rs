//! Keyword matching against page fields.
//!
//! `partial_ratio` slides the shorter string over the longer one, aligning on
//! the matching blocks of a longest-common-substring matcher, and keeps the best
//! `2·M / T` similarity. A substring hit therefore scores 100, unless the
//! longer side reaches 200 characters and the keyword has no unpopular
//! character to anchor on.

use std::collections::HashMap;

/// Sequences at least this long drop "popular" characters from the index
const AUTOJUNK_MIN_LEN: usize = 200;

/// Ratios above this are reported as a perfect match
const PERFECT_RATIO: f64 = 0.995;

/// Case-insensitive fuzzy partial ratio in `0..=100`.
///
/// Returns 0 when either side is empty.
#[must_use]
pub fn partial_ratio(left: &str, right: &str) -> u8 {
    let left: Vec<char> = left.to_lowercase().chars().collect();
    let right: Vec<char> = right.to_lowercase().chars().collect();
    if left.is_empty() || right.is_empty() {
        return 0;
    }
    if left == right {
        return 100;
    }

    let (shorter, longer) = if left.len() <= right.len() {
        (&left, &right)
    } else {
        (&right, &left)
    };

    let mut best = 0.0_f64;
    for block in SequenceMatcher::new(shorter, longer).matching_blocks() {
        let start = block.b.saturating_sub(block.a);
        let end = (start + shorter.len()).min(longer.len());
        let similarity = ratio(shorter, &longer[start..end]);
        if similarity > PERFECT_RATIO {
            return 100;
        }
        best = best.max(similarity);
    }

    (best * 100.0).round_ties_even() as u8
}

/// Case-insensitive count of non-overlapping literal occurrences of `needle`.
///
/// An empty needle never matches.
#[must_use]
pub fn count_occurrences(haystack: &str, needle: &str) -> u64 {
    let needle = needle.to_lowercase();
    if needle.is_empty() {
        return 0;
    }
    haystack.to_lowercase().matches(needle.as_str()).count() as u64
}

fn ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matched: usize = SequenceMatcher::new(a, b)
        .matching_blocks()
        .iter()
        .map(|block| block.size)
        .sum();
    2.0 * matched as f64 / total as f64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Block {
    a: usize,
    b: usize,
    size: usize,
}

struct SequenceMatcher<'a> {
    a: &'a [char],
    b: &'a [char],
    b2j: HashMap<char, Vec<usize>>,
}

impl<'a> SequenceMatcher<'a> {
    fn new(a: &'a [char], b: &'a [char]) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &c) in b.iter().enumerate() {
            b2j.entry(c).or_default().push(j);
        }
        if b.len() >= AUTOJUNK_MIN_LEN {
            let limit = b.len() / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= limit);
        }
        Self { a, b, b2j }
    }

    fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> Block {
        let (mut besti, mut bestj, mut bestsize) = (alo, blo, 0);

        // run length of the match ending at b[j], for the previous a[i]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next.insert(j, k);
                    if k > bestsize {
                        besti = i + 1 - k;
                        bestj = j + 1 - k;
                        bestsize = k;
                    }
                }
            }
            j2len = next;
        }

        // popular characters are missing from b2j; grow the match over them
        while besti > alo && bestj > blo && self.a[besti - 1] == self.b[bestj - 1] {
            besti -= 1;
            bestj -= 1;
            bestsize += 1;
        }
        while besti + bestsize < ahi
            && bestj + bestsize < bhi
            && self.a[besti + bestsize] == self.b[bestj + bestsize]
        {
            bestsize += 1;
        }

        Block {
            a: besti,
            b: bestj,
            size: bestsize,
        }
    }

    /// Non-adjacent matching blocks in order, terminated by a zero-size sentinel
    fn matching_blocks(&self) -> Vec<Block> {
        let (la, lb) = (self.a.len(), self.b.len());
        let mut queue = vec![(0, la, 0, lb)];
        let mut found = Vec::new();
        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let block = self.find_longest_match(alo, ahi, blo, bhi);
            if block.size == 0 {
                continue;
            }
            found.push(block);
            if alo < block.a && blo < block.b {
                queue.push((alo, block.a, blo, block.b));
            }
            if block.a + block.size < ahi && block.b + block.size < bhi {
                queue.push((block.a + block.size, ahi, block.b + block.size, bhi));
            }
        }
        found.sort_unstable();

        let mut merged: Vec<Block> = Vec::with_capacity(found.len() + 1);
        for block in found {
            match merged.last_mut() {
                Some(last) if last.a + last.size == block.a && last.b + last.size == block.b => {
                    last.size += block.size;
                }
                _ => merged.push(block),
            }
        }
        merged.push(Block {
            a: la,
            b: lb,
            size: 0,
        });
        merged
    }
}
