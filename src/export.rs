//! Turns fetched event rows into tabular form: the reports page, the
//! time-window filter, and the two-sheet XLSX download. Everything here is
//! pure over in-memory rows; blanks come out as blanks.

use rust_xlsxwriter::{Workbook, XlsxError};
use time::{format_description::BorrowedFormatItem, macros::format_description, Duration, OffsetDateTime, Time};

use crate::store::{CleaningLogRow, ProblemReportRow};

pub const CLEANING_HEADERS: [&str; 6] = ["Date", "Time", "Building", "Room", "Staff", "Status"];
pub const REPORT_HEADERS: [&str; 7] =
    ["Date", "Time", "Building", "Room", "Client", "Description", "Status"];

const DATE_FMT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const TIME_FMT: &[BorrowedFormatItem<'static>] = format_description!("[hour]:[minute]:[second]");

pub fn date_string(ts: OffsetDateTime) -> String {
    ts.format(&DATE_FMT).unwrap_or_default()
}

pub fn time_string(ts: OffsetDateTime) -> String {
    ts.format(&TIME_FMT).unwrap_or_default()
}

fn blank(field: &Option<String>) -> String {
    field.clone().unwrap_or_default()
}

pub fn cleaning_row(log: &CleaningLogRow) -> [String; 6] {
    [
        date_string(log.timestamp),
        time_string(log.timestamp),
        blank(&log.building_name),
        blank(&log.room_number),
        blank(&log.staff_email),
        log.status.clone(),
    ]
}

pub fn report_row(report: &ProblemReportRow) -> [String; 7] {
    [
        date_string(report.timestamp),
        time_string(report.timestamp),
        blank(&report.building_name),
        blank(&report.room_number),
        blank(&report.client_email),
        report.description.clone(),
        report.status.clone(),
    ]
}

/// Filter over the already-fetched collection; nothing goes back to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeWindow {
    All,
    Today,
    Week,
    Month,
}

impl TimeWindow {
    pub fn parse(s: &str) -> TimeWindow {
        match s {
            "today" => TimeWindow::Today,
            "week" => TimeWindow::Week,
            "month" => TimeWindow::Month,
            _ => TimeWindow::All,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimeWindow::All => "all",
            TimeWindow::Today => "today",
            TimeWindow::Week => "week",
            TimeWindow::Month => "month",
        }
    }

    pub fn cutoff(self, now: OffsetDateTime) -> Option<OffsetDateTime> {
        let midnight = now.replace_time(Time::MIDNIGHT);
        match self {
            TimeWindow::All => None,
            TimeWindow::Today => Some(midnight),
            TimeWindow::Week => Some(now - Duration::days(7)),
            // day 1 always exists, but don't panic on time's Result
            TimeWindow::Month => Some(midnight.replace_day(1).unwrap_or(midnight)),
        }
    }

    pub fn contains(self, now: OffsetDateTime, ts: OffsetDateTime) -> bool {
        match self.cutoff(now) {
            None => true,
            Some(cutoff) => ts >= cutoff,
        }
    }
}

/// One sheet per entity kind, headers always present, total over empty input.
pub fn build_workbook(
    logs: &[CleaningLogRow],
    reports: &[ProblemReportRow],
) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    sheet.set_name("Cleaning Logs")?;
    sheet.write_row(0, 0, CLEANING_HEADERS)?;
    for (i, log) in logs.iter().enumerate() {
        sheet.write_row(i as u32 + 1, 0, cleaning_row(log))?;
    }

    let sheet = workbook.add_worksheet();
    sheet.set_name("Problem Reports")?;
    sheet.write_row(0, 0, REPORT_HEADERS)?;
    for (i, report) in reports.iter().enumerate() {
        sheet.write_row(i as u32 + 1, 0, report_row(report))?;
    }

    workbook.save_to_buffer()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn log_at(ts: OffsetDateTime) -> CleaningLogRow {
        CleaningLogRow {
            id: "cl-1".to_owned(),
            timestamp: ts,
            status: "cleaned".to_owned(),
            building_name: Some("North Hall".to_owned()),
            room_number: Some("204".to_owned()),
            staff_email: Some("staff@example.com".to_owned()),
        }
    }

    #[test]
    fn row_renders_joined_fields() {
        let row = cleaning_row(&log_at(datetime!(2025-03-04 09:30:00 UTC)));
        assert_eq!(row, [
            "2025-03-04".to_owned(),
            "09:30:00".to_owned(),
            "North Hall".to_owned(),
            "204".to_owned(),
            "staff@example.com".to_owned(),
            "cleaned".to_owned(),
        ]);
    }

    #[test]
    fn missing_joins_render_blank() {
        let mut log = log_at(datetime!(2025-03-04 09:30:00 UTC));
        log.building_name = None;
        log.room_number = None;
        log.staff_email = None;
        let row = cleaning_row(&log);
        assert_eq!(&row[2..5], ["", "", ""]);

        let report = ProblemReportRow {
            id: "pr-1".to_owned(),
            timestamp: datetime!(2025-03-04 09:30:00 UTC),
            status: "open".to_owned(),
            description: "sink leaks".to_owned(),
            building_name: None,
            room_number: None,
            client_email: None,
        };
        let row = report_row(&report);
        assert_eq!(&row[2..5], ["", "", ""]);
        assert_eq!(row[5], "sink leaks");
    }

    #[test]
    fn today_window_is_calendar_day() {
        let now = datetime!(2025-03-04 10:00:00 UTC);
        let w = TimeWindow::Today;
        assert!(w.contains(now, now - Duration::minutes(1)));
        assert!(!w.contains(now, now - Duration::hours(25)));
        // 9h old is yesterday relative to 08:00, same day relative to 10:00
        assert!(w.contains(now, datetime!(2025-03-04 00:00:00 UTC)));
        assert!(!w.contains(now, datetime!(2025-03-03 23:59:59 UTC)));
    }

    #[test]
    fn week_and_month_windows() {
        let now = datetime!(2025-03-20 12:00:00 UTC);
        assert!(TimeWindow::Week.contains(now, now - Duration::days(6)));
        assert!(!TimeWindow::Week.contains(now, now - Duration::days(8)));
        assert!(TimeWindow::Month.contains(now, datetime!(2025-03-01 00:00:00 UTC)));
        assert!(!TimeWindow::Month.contains(now, datetime!(2025-02-28 23:00:00 UTC)));
        assert!(TimeWindow::All.contains(now, datetime!(1999-01-01 00:00:00 UTC)));
    }

    #[test]
    fn window_parse_defaults_to_all() {
        assert_eq!(TimeWindow::parse("today"), TimeWindow::Today);
        assert_eq!(TimeWindow::parse("fortnight"), TimeWindow::All);
        assert_eq!(TimeWindow::parse(""), TimeWindow::All);
    }

    #[test]
    fn workbook_over_empty_input() {
        let bytes = build_workbook(&[], &[]).unwrap();
        assert!(!bytes.is_empty());
        // xlsx is a zip
        assert_eq!(&bytes[..2], b"PK");
    }
}
