use chrono::{Local, NaiveDateTime, TimeDelta};

/// The span of time, ending at `end`, searched for newsletters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookbackWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub hours_back: u32,
}

impl LookbackWindow {
    pub fn ending_at(end: NaiveDateTime, hours_back: u32) -> Self {
        let start = end
            .checked_sub_signed(TimeDelta::hours(i64::from(hours_back)))
            .unwrap_or(NaiveDateTime::MIN);
        Self {
            start,
            end,
            hours_back,
        }
    }

    /// Window ending at the local wall clock.
    pub fn now(hours_back: u32) -> Self {
        Self::ending_at(Local::now().naive_local(), hours_back)
    }

    /// Date of `start` in the form Gmail's `after:` operator takes.
    pub fn gmail_date_filter(&self) -> String {
        self.start.format("%Y/%m/%d").to_string()
    }

    pub fn label(&self) -> String {
        format!(
            "{} to {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }

    pub fn query_for(&self, sender: &str) -> String {
        format!("from:{} after:{}", sender, self.gmail_date_filter())
    }
}
