//! Holiday countdown card.
//!
//! A small built-in table per supported country; no calendar service. The
//! card honors the user's holiday preferences blob and the dismissal
//! store: dismissing hides it for the rest of the day.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::prefs::{dismiss_until, is_dismissed, HolidayPrefs, KvStore};
use crate::types::HolidayCard;

pub const WIDGET: &str = "holiday";

enum Rule {
    Fixed { month: u32, day: u32 },
    NthWeekday { month: u32, weekday: Weekday, nth: u8 },
    LastWeekday { month: u32, weekday: Weekday },
}

struct Holiday {
    name: &'static str,
    rule: Rule,
}

const US_HOLIDAYS: &[Holiday] = &[
    Holiday { name: "New Year's Day", rule: Rule::Fixed { month: 1, day: 1 } },
    Holiday { name: "Martin Luther King Jr. Day", rule: Rule::NthWeekday { month: 1, weekday: Weekday::Mon, nth: 3 } },
    Holiday { name: "Memorial Day", rule: Rule::LastWeekday { month: 5, weekday: Weekday::Mon } },
    Holiday { name: "Juneteenth", rule: Rule::Fixed { month: 6, day: 19 } },
    Holiday { name: "Independence Day", rule: Rule::Fixed { month: 7, day: 4 } },
    Holiday { name: "Labor Day", rule: Rule::NthWeekday { month: 9, weekday: Weekday::Mon, nth: 1 } },
    Holiday { name: "Veterans Day", rule: Rule::Fixed { month: 11, day: 11 } },
    Holiday { name: "Thanksgiving", rule: Rule::NthWeekday { month: 11, weekday: Weekday::Thu, nth: 4 } },
    Holiday { name: "Christmas Day", rule: Rule::Fixed { month: 12, day: 25 } },
];

const CA_HOLIDAYS: &[Holiday] = &[
    Holiday { name: "New Year's Day", rule: Rule::Fixed { month: 1, day: 1 } },
    Holiday { name: "Canada Day", rule: Rule::Fixed { month: 7, day: 1 } },
    Holiday { name: "Labour Day", rule: Rule::NthWeekday { month: 9, weekday: Weekday::Mon, nth: 1 } },
    Holiday { name: "Thanksgiving", rule: Rule::NthWeekday { month: 10, weekday: Weekday::Mon, nth: 2 } },
    Holiday { name: "Christmas Day", rule: Rule::Fixed { month: 12, day: 25 } },
    Holiday { name: "Boxing Day", rule: Rule::Fixed { month: 12, day: 26 } },
];

fn table_for(country: &str) -> &'static [Holiday] {
    match country.to_ascii_uppercase().as_str() {
        "CA" => CA_HOLIDAYS,
        _ => US_HOLIDAYS,
    }
}

impl Rule {
    fn date_in(&self, year: i32) -> Option<NaiveDate> {
        match *self {
            Rule::Fixed { month, day } => NaiveDate::from_ymd_opt(year, month, day),
            Rule::NthWeekday { month, weekday, nth } => {
                NaiveDate::from_weekday_of_month_opt(year, month, weekday, nth)
            }
            Rule::LastWeekday { month, weekday } => {
                NaiveDate::from_weekday_of_month_opt(year, month, weekday, 5)
                    .or_else(|| NaiveDate::from_weekday_of_month_opt(year, month, weekday, 4))
            }
        }
    }
}

/// The nearest holiday on or after `today` for the given country.
fn next_holiday(country: &str, today: NaiveDate) -> Option<(&'static str, NaiveDate)> {
    let table = table_for(country);
    let mut best: Option<(&'static str, NaiveDate)> = None;
    for year in [today.year(), today.year() + 1] {
        for holiday in table {
            let Some(date) = holiday.rule.date_in(year) else {
                continue;
            };
            if date < today {
                continue;
            }
            match best {
                Some((_, current)) if current <= date => {}
                _ => best = Some((holiday.name, date)),
            }
        }
    }
    best
}

/// Build the card, or `None` when disabled or dismissed for today.
pub fn load(prefs: &HolidayPrefs, store: &dyn KvStore, today: NaiveDate) -> Option<HolidayCard> {
    if !prefs.enabled {
        return None;
    }
    if is_dismissed(store, WIDGET, today) {
        return None;
    }
    let (name, date) = next_holiday(&prefs.country, today)?;
    Some(HolidayCard {
        name: name.to_string(),
        date,
        days_until: (date - today).num_days(),
        show_countdown: prefs.show_countdown,
    })
}

/// Hide the card for the rest of the day.
pub fn dismiss(store: &dyn KvStore, today: NaiveDate) {
    dismiss_until(store, WIDGET, today);
}
