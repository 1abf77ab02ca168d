//! Canonical ordering of marker sets
//!
//! Markers are ordered by `start`, then `end`, then by RSID. The RSID
//! comparison ranks `rs` ids before `i` ids and, within one prefix, compares
//! the numeric suffix according to a [`SuffixOrder`] policy.
//!
//! The published marker artifacts were produced with the suffix compared in
//! *descending* order, which is at odds with every other key being
//! ascending. Writing with [`SuffixOrder::Descending`] is what makes freshly
//! downloaded files match the checksum table, so it is the default; switch to
//! [`SuffixOrder::Ascending`] only together with a regenerated table.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::app::models::Marker;

/// Direction of the numeric-suffix tie-break between same-prefix RSIDs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuffixOrder {
    /// `rs20` before `rs10`; matches the published artifacts
    #[default]
    Descending,
    /// `rs10` before `rs20`
    Ascending,
}

impl fmt::Display for SuffixOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuffixOrder::Descending => write!(f, "descending"),
            SuffixOrder::Ascending => write!(f, "ascending"),
        }
    }
}

impl FromStr for SuffixOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "descending" | "desc" => Ok(SuffixOrder::Descending),
            "ascending" | "asc" => Ok(SuffixOrder::Ascending),
            other => Err(format!(
                "Unknown suffix order '{}'. Expected 'ascending' or 'descending'",
                other
            )),
        }
    }
}

/// An RSID split into prefix and numeric suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rsid<'a> {
    pub prefix: &'a str,
    /// `None` when the id has no trailing digits or they overflow
    pub suffix: Option<u64>,
    raw: &'a str,
}

impl<'a> Rsid<'a> {
    pub fn parse(id: &'a str) -> Self {
        let split = id
            .char_indices()
            .rev()
            .take_while(|(_, c)| c.is_ascii_digit())
            .last()
            .map(|(i, _)| i)
            .unwrap_or(id.len());

        let (prefix, digits) = id.split_at(split);
        Self {
            prefix,
            suffix: digits.parse().ok(),
            raw: id,
        }
    }

    fn prefix_rank(&self) -> u8 {
        match self.prefix {
            "rs" => 0,
            "i" => 1,
            _ => 2,
        }
    }

    /// Compare two RSIDs under the given suffix policy
    pub fn compare(&self, other: &Rsid<'_>, suffix_order: SuffixOrder) -> Ordering {
        self.prefix_rank()
            .cmp(&other.prefix_rank())
            .then_with(|| self.prefix.cmp(other.prefix))
            .then_with(|| match (self.suffix, other.suffix) {
                (Some(a), Some(b)) => match suffix_order {
                    SuffixOrder::Ascending => a.cmp(&b),
                    SuffixOrder::Descending => b.cmp(&a),
                },
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
            .then_with(|| self.raw.cmp(other.raw))
    }
}

/// Sorts marker sets into canonical order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkerOrderer {
    suffix_order: SuffixOrder,
}

impl MarkerOrderer {
    pub fn new(suffix_order: SuffixOrder) -> Self {
        Self { suffix_order }
    }

    pub fn suffix_order(&self) -> SuffixOrder {
        self.suffix_order
    }

    /// Total order over markers
    pub fn compare(&self, a: &Marker, b: &Marker) -> Ordering {
        a.start()
            .cmp(&b.start())
            .then_with(|| a.end().cmp(&b.end()))
            .then_with(|| Rsid::parse(a.id()).compare(&Rsid::parse(b.id()), self.suffix_order))
    }

    /// Sort in place; stable, so duplicate ids keep their download order
    pub fn sort(&self, markers: &mut [Marker]) {
        markers.sort_by(|a, b| self.compare(a, b));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn marker(id: &str, start: i64, end: i64) -> Marker {
        Marker::from_record(json!({
            "id": id,
            "accession_id": "NC_000001.10",
            "start": start,
            "end": end,
            "variants": []
        }))
        .unwrap()
    }

    fn ids(markers: &[Marker]) -> Vec<&str> {
        markers.iter().map(Marker::id).collect()
    }

    #[test]
    fn test_rsid_parse() {
        let rsid = Rsid::parse("rs3094315");
        assert_eq!(rsid.prefix, "rs");
        assert_eq!(rsid.suffix, Some(3094315));

        let rsid = Rsid::parse("i713426");
        assert_eq!(rsid.prefix, "i");
        assert_eq!(rsid.suffix, Some(713426));

        let rsid = Rsid::parse("VG01S123");
        assert_eq!(rsid.prefix, "VG01S");
        assert_eq!(rsid.suffix, Some(123));

        let rsid = Rsid::parse("rs");
        assert_eq!(rsid.prefix, "rs");
        assert_eq!(rsid.suffix, None);
    }

    #[test]
    fn test_sorts_by_start_then_end() {
        let orderer = MarkerOrderer::default();
        let mut markers = vec![
            marker("rs3", 15, 15),
            marker("rs2", 10, 30),
            marker("rs1", 10, 20),
        ];

        orderer.sort(&mut markers);
        assert_eq!(ids(&markers), vec!["rs1", "rs2", "rs3"]);
    }

    #[test]
    fn test_rs_prefix_before_i_prefix() {
        for policy in [SuffixOrder::Descending, SuffixOrder::Ascending] {
            let orderer = MarkerOrderer::new(policy);
            let mut markers = vec![marker("i50", 10, 10), marker("rs100", 10, 10)];

            orderer.sort(&mut markers);
            assert_eq!(ids(&markers), vec!["rs100", "i50"], "{}", policy);
        }
    }

    #[test]
    fn test_suffix_policy() {
        let mut markers = vec![
            marker("rs10", 5, 5),
            marker("rs200", 5, 5),
            marker("rs30", 5, 5),
        ];

        MarkerOrderer::new(SuffixOrder::Descending).sort(&mut markers);
        assert_eq!(ids(&markers), vec!["rs200", "rs30", "rs10"]);

        MarkerOrderer::new(SuffixOrder::Ascending).sort(&mut markers);
        assert_eq!(ids(&markers), vec!["rs10", "rs30", "rs200"]);
    }

    #[test]
    fn test_duplicates_pass_through() {
        let orderer = MarkerOrderer::default();
        let first = Marker::from_record(json!({"id": "rs7", "start": 1, "end": 1, "tag": "first"}))
            .unwrap();
        let mut markers = vec![first, marker("rs7", 1, 1), marker("rs6", 0, 0)];

        orderer.sort(&mut markers);
        assert_eq!(ids(&markers), vec!["rs6", "rs7", "rs7"]);
        assert_eq!(markers[1].record()["tag"], json!("first"));
    }

    #[test]
    fn test_order_is_consistent_for_unusual_ids() {
        let orderer = MarkerOrderer::default();
        let all = [
            marker("rs1", 0, 0),
            marker("i1", 0, 0),
            marker("x9", 0, 0),
            marker("abc", 0, 0),
            marker("rs", 0, 0),
            marker("i99999999999999999999999", 0, 0),
        ];

        for a in &all {
            assert_eq!(orderer.compare(a, a), Ordering::Equal);
            for b in &all {
                assert_eq!(orderer.compare(a, b), orderer.compare(b, a).reverse());
                for c in &all {
                    if orderer.compare(a, b) == Ordering::Less
                        && orderer.compare(b, c) == Ordering::Less
                    {
                        assert_eq!(orderer.compare(a, c), Ordering::Less);
                    }
                }
            }
        }
    }

    #[test]
    fn test_suffix_order_parsing() {
        assert_eq!("ascending".parse::<SuffixOrder>(), Ok(SuffixOrder::Ascending));
        assert_eq!("DESC".parse::<SuffixOrder>(), Ok(SuffixOrder::Descending));
        assert!("sideways".parse::<SuffixOrder>().is_err());
        assert_eq!(SuffixOrder::default(), SuffixOrder::Descending);
    }
}
