use crate::aggregate::DailyAggregates;
use crate::date_code::{self, DateCode};

/// One persisted `(date, author)` pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct UserVisit {
    pub date: DateCode,
    pub author: String,
}

/// One persisted row of daily counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestCounters {
    pub date: DateCode,
    pub loaded: i64,
    pub doubles: i64,
    pub for_creation: i64,
    pub for_expand: i64,
    pub handle_over: i64,
    pub returned: i64,
    pub sent_for_handle: i64,
    pub packages: i64,
}

/// Flat, storage-ready result of ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestedData {
    pub min_date: DateCode,
    pub max_date: DateCode,
    pub users: Vec<UserVisit>,
    pub requests: Vec<RequestCounters>,
}

pub fn transform(days: DailyAggregates) -> IngestedData {
    let mut min_date: Option<DateCode> = None;
    let mut max_date: Option<DateCode> = None;
    let mut users = Vec::new();
    let mut requests = Vec::with_capacity(days.len());

    for (date, day) in days {
        let code = date_code::encode(date);
        min_date = Some(min_date.map_or(code, |m| m.min(code)));
        max_date = Some(max_date.map_or(code, |m| m.max(code)));

        requests.push(RequestCounters {
            date: code,
            loaded: day.loaded,
            doubles: day.doubles,
            for_creation: day.for_creation,
            for_expand: day.for_expand,
            handle_over: day.handle_over,
            returned: day.returned,
            sent_for_handle: day.sent_for_handle,
            packages: day.packages.len() as i64,
        });
        users.extend(day.users.into_iter().map(|author| UserVisit { date: code, author }));
    }

    IngestedData {
        min_date: min_date.unwrap_or_default(),
        max_date: max_date.unwrap_or_default(),
        users,
        requests,
    }
}
