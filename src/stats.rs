use crate::index::SeriesIndex;
use crate::models::{Totals, WindowReport, WindowRow};
use chrono::{Days, Duration, NaiveDate};

/// Days covered by a report, ending the day before the reference date.
pub const WINDOW_DAYS: i64 = 7;

/// First day of the window, or `None` when the calendar runs out before it.
pub fn window_start(reference_date: NaiveDate) -> Option<NaiveDate> {
    reference_date.checked_sub_days(Days::new(WINDOW_DAYS as u64))
}

/// `reference_date` must pass [`window_start`]; the earliest dates have no window.
pub fn aggregate(visits: &SeriesIndex, clones: &SeriesIndex, reference_date: NaiveDate) -> WindowReport {
    let mut rows = Vec::with_capacity(WINDOW_DAYS as usize);
    for offset in (1..=WINDOW_DAYS).rev() {
        let key = date_key(reference_date - Duration::days(offset));
        let views = visits.get(&key).unwrap_or_default();
        let cloned = clones.get(&key).unwrap_or_default();
        rows.push(WindowRow {
            date_key: key,
            visits: views.count,
            unique_visits: views.uniques,
            clones: cloned.count,
            unique_clones: cloned.uniques,
        });
    }

    let mut totals = Totals::default();
    for row in &rows {
        totals.add_row(row);
    }

    WindowReport { rows, totals }
}

/// Window days are keyed at hour `00`, the hour the daily series reports.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%dT00").to_string()
}
