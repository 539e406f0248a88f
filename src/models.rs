use chrono::NaiveDateTime;

#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: u64,
    pub description: String,
    pub deadline: String, // empty = no deadline set
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditSession {
    None,
    Editing(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormState {
    #[default]
    Closed,
    Open(EditSession),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormFocus {
    #[default]
    Description,
    Deadline,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PickerOutcome {
    Confirmed(NaiveDateTime),
    Cancelled,
}
