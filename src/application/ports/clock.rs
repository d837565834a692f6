use chrono::{DateTime, NaiveDate, Utc};

/// Time source injected into the services so time-based eligibility is
/// deterministic under test.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}
