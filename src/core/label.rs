use crate::domain::model::CalendarSnapshot;

pub const DEFAULT_ICON: &str = "📅";

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// English month name for a 1-based month number.
pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES[(month as usize + 11) % 12]
}

/// `"<icon> <MonthName> <Year>"`, the year printed as a plain signed integer.
pub fn format_label(snapshot: &CalendarSnapshot, icon: &str) -> String {
    format!("{} {} {}", icon, month_name(snapshot.month), snapshot.year)
}
