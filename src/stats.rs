use std::ops::Add;

use serde::{Deserialize, Serialize};

/// Counters summed over an inclusive date range plus the distinct author count.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[i64; 9]", into = "[i64; 9]")]
pub struct RangeTotals {
    pub loaded: i64,
    pub doubles: i64,
    pub for_creation: i64,
    pub for_expand: i64,
    pub handle_over: i64,
    pub returned: i64,
    pub sent_for_handle: i64,
    pub packages: i64,
    pub users: i64,
}

impl From<RangeTotals> for [i64; 9] {
    fn from(t: RangeTotals) -> Self {
        [
            t.loaded,
            t.doubles,
            t.for_creation,
            t.for_expand,
            t.handle_over,
            t.returned,
            t.sent_for_handle,
            t.packages,
            t.users,
        ]
    }
}

impl From<[i64; 9]> for RangeTotals {
    fn from(v: [i64; 9]) -> Self {
        RangeTotals {
            loaded: v[0],
            doubles: v[1],
            for_creation: v[2],
            for_expand: v[3],
            handle_over: v[4],
            returned: v[5],
            sent_for_handle: v[6],
            packages: v[7],
            users: v[8],
        }
    }
}

/// Field-wise sum. The `users` field is only additive when the two ranges
/// share no authors.
impl Add for RangeTotals {
    type Output = RangeTotals;

    fn add(self, rhs: RangeTotals) -> RangeTotals {
        let (a, b): ([i64; 9], [i64; 9]) = (self.into(), rhs.into());
        let sum: [i64; 9] = std::array::from_fn(|i| a[i] + b[i]);
        sum.into()
    }
}

/// Answer to the `["meta"]` request, serialized as `[min, max, totals]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata(pub String, pub String, pub RangeTotals);

/// Answer to a range request, serialized as `[totals | null, error | null]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeAnswer(pub Option<RangeTotals>, pub Option<String>);

impl RangeAnswer {
    pub fn ok(totals: RangeTotals) -> Self {
        RangeAnswer(Some(totals), None)
    }

    pub fn error(message: impl Into<String>) -> Self {
        RangeAnswer(None, Some(message.into()))
    }
}
