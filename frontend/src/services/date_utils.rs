use chrono::NaiveDate;
use js_sys::Date;

/// Today's date according to the browser's local clock
pub fn today() -> NaiveDate {
    let now = Date::new_0();
    let year = now.get_full_year() as i32;
    let month = now.get_month() + 1; // JavaScript months are 0-indexed
    let day = now.get_date();

    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

/// Format a date for display (e.g., "Wednesday, October 14")
pub fn format_date_for_display(date: NaiveDate) -> String {
    date.format("%A, %B %-d").to_string()
}

/// Short column header (e.g., "Wed 14.10.")
pub fn format_column_header(date: NaiveDate) -> String {
    date.format("%a %d.%m.").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_today_is_a_real_date() {
        assert!(today() > NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
    }

    #[wasm_bindgen_test]
    fn test_display_formats() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 14).unwrap();
        assert_eq!(format_date_for_display(date), "Wednesday, October 14");
        assert_eq!(format_column_header(date), "Wed 14.10.");
    }
}
