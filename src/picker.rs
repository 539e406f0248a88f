use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, Timelike};

/// Display format for a committed deadline: combined date and time.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerField {
    Year,
    Month,
    Day,
    Hour,
    Minute,
}

/// Modal date/time picker. Holds its own field state while shown and is
/// dropped once it resolves, so every invocation starts fresh.
#[derive(Debug, Clone)]
pub struct DateTimePicker {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub field: PickerField,
}

impl DateTimePicker {
    pub fn new() -> Self {
        Self::from_date_time(Local::now().naive_local())
    }

    pub fn from_date_time(value: NaiveDateTime) -> Self {
        DateTimePicker {
            year: value.year(),
            month: value.month(),
            day: value.day(),
            hour: value.hour(),
            minute: value.minute(),
            field: PickerField::Year,
        }
    }

    /// Seed the picker from an already formatted deadline, so reopening it
    /// starts from the value on screen rather than from the clock.
    pub fn from_display(text: &str) -> Option<Self> {
        NaiveDateTime::parse_from_str(text.trim(), DISPLAY_FORMAT)
            .ok()
            .map(Self::from_date_time)
    }

    pub fn next_field(&mut self) {
        self.field = match self.field {
            PickerField::Year => PickerField::Month,
            PickerField::Month => PickerField::Day,
            PickerField::Day => PickerField::Hour,
            PickerField::Hour => PickerField::Minute,
            PickerField::Minute => PickerField::Minute,
        };
    }

    pub fn previous_field(&mut self) {
        self.field = match self.field {
            PickerField::Year => PickerField::Year,
            PickerField::Month => PickerField::Year,
            PickerField::Day => PickerField::Month,
            PickerField::Hour => PickerField::Day,
            PickerField::Minute => PickerField::Hour,
        };
    }

    pub fn step_up(&mut self) {
        self.step(1);
    }

    pub fn step_down(&mut self) {
        self.step(-1);
    }

    fn step(&mut self, delta: i32) {
        match self.field {
            PickerField::Year => self.year += delta,
            PickerField::Month => self.month = wrap(self.month, 1, 12, delta),
            PickerField::Day => {
                let max = days_in_month(self.year, self.month);
                self.day = wrap(self.day, 1, max, delta);
            }
            PickerField::Hour => self.hour = wrap(self.hour, 0, 23, delta),
            PickerField::Minute => self.minute = wrap(self.minute, 0, 59, delta),
        }
        // Changing year or month can shorten the month under the selected day.
        let max = days_in_month(self.year, self.month);
        if self.day > max {
            self.day = max;
        }
    }

    pub fn date_time(&self) -> NaiveDateTime {
        let date = NaiveDate::from_ymd_opt(self.year, self.month, self.day)
            .unwrap_or_default();
        date.and_hms_opt(self.hour, self.minute, 0).unwrap_or_default()
    }

    pub fn display(&self) -> String {
        format_deadline(self.date_time())
    }
}

impl Default for DateTimePicker {
    fn default() -> Self {
        Self::new()
    }
}

pub fn format_deadline(value: NaiveDateTime) -> String {
    value.format(DISPLAY_FORMAT).to_string()
}

fn wrap(value: u32, min: u32, max: u32, delta: i32) -> u32 {
    if delta > 0 {
        if value >= max {
            min
        } else {
            value + 1
        }
    } else if value <= min {
        max
    } else {
        value - 1
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28)
}
