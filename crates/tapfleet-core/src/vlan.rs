// ── VLAN range expressions ──
//
// Trunk ports carry an `allowedVlans` expression such as `1,10-20,30`:
// comma-separated VLAN ids or inclusive ranges. Whitespace around tokens
// is ignored; an empty expression allows nothing.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use thiserror::Error;

pub const VLAN_MIN: u32 = 1;
pub const VLAN_MAX: u32 = 4094;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VlanRangeError {
    #[error("'{token}' is not a VLAN id")]
    NotANumber { token: String },

    #[error("VLAN {vlan} is outside [1, 4094]")]
    OutOfRange { vlan: u32 },

    #[error("range {start}-{end} is reversed")]
    Reversed { start: u32, end: u32 },

    #[error("empty entry in VLAN list")]
    EmptyEntry,
}

/// Parsed, validated VLAN range expression.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VlanRanges {
    ranges: Vec<RangeInclusive<u32>>,
}

impl VlanRanges {
    pub fn parse(expr: &str) -> Result<Self, VlanRangeError> {
        let expr = expr.trim();
        if expr.is_empty() {
            return Ok(Self::default());
        }

        let mut ranges = Vec::new();
        for token in expr.split(',') {
            let token = token.trim();
            if token.is_empty() {
                return Err(VlanRangeError::EmptyEntry);
            }
            let range = match token.split_once('-') {
                Some((start, end)) => {
                    let start = parse_vlan(start)?;
                    let end = parse_vlan(end)?;
                    if start > end {
                        return Err(VlanRangeError::Reversed { start, end });
                    }
                    start..=end
                }
                None => {
                    let vlan = parse_vlan(token)?;
                    vlan..=vlan
                }
            };
            ranges.push(range);
        }

        ranges.sort_by_key(|r| *r.start());
        Ok(Self {
            ranges: coalesce(ranges),
        })
    }

    pub fn contains(&self, vlan: u32) -> bool {
        self.ranges.iter().any(|r| r.contains(&vlan))
    }

    /// Number of distinct VLAN ids allowed.
    pub fn len(&self) -> usize {
        self.ranges
            .iter()
            .map(|r| usize::try_from(r.end() - r.start() + 1).unwrap_or(usize::MAX))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn ranges(&self) -> &[RangeInclusive<u32>] {
        &self.ranges
    }
}

impl FromStr for VlanRanges {
    type Err = VlanRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Normalized form: sorted, overlapping and adjacent ranges merged.
impl fmt::Display for VlanRanges {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, r) in self.ranges.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            if r.start() == r.end() {
                write!(f, "{}", r.start())?;
            } else {
                write!(f, "{}-{}", r.start(), r.end())?;
            }
        }
        Ok(())
    }
}

fn parse_vlan(token: &str) -> Result<u32, VlanRangeError> {
    let token = token.trim();
    let vlan: u32 = token.parse().map_err(|_| VlanRangeError::NotANumber {
        token: token.to_owned(),
    })?;
    if (VLAN_MIN..=VLAN_MAX).contains(&vlan) {
        Ok(vlan)
    } else {
        Err(VlanRangeError::OutOfRange { vlan })
    }
}

// Input must be sorted by start.
fn coalesce(sorted: Vec<RangeInclusive<u32>>) -> Vec<RangeInclusive<u32>> {
    let mut out: Vec<RangeInclusive<u32>> = Vec::with_capacity(sorted.len());
    for r in sorted {
        if let Some(last) = out.last_mut() {
            if *r.start() <= last.end().saturating_add(1) {
                if r.end() > last.end() {
                    *last = *last.start()..=*r.end();
                }
                continue;
            }
        }
        out.push(r);
    }
    out
}
