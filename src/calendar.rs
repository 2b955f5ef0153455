// Date range selection for the trip dates picker
use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CalendarState {
    pub selected_start: Option<NaiveDate>,
    pub selected_end: Option<NaiveDate>,
}

impl CalendarState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one tap on `date`.
    ///
    /// An empty or complete range starts over at `date`. With only one end
    /// chosen, `date` becomes the other end on whichever side it falls;
    /// tapping the same day again is ignored.
    pub fn select_day(&mut self, date: NaiveDate) {
        *self = match (self.selected_start, self.selected_end) {
            (None, None) | (Some(_), Some(_)) => Self::range(date, None),
            (Some(start), None) => self.extend_from(start, date),
            (None, Some(end)) => self.extend_from(end, date),
        };
    }

    fn extend_from(&self, anchor: NaiveDate, date: NaiveDate) -> Self {
        if date < anchor {
            Self::range(date, Some(anchor))
        } else if date > anchor {
            Self::range(anchor, Some(date))
        } else {
            *self
        }
    }

    fn range(start: NaiveDate, end: Option<NaiveDate>) -> Self {
        Self {
            selected_start: Some(start),
            selected_end: end,
        }
    }

    pub fn has_selected_dates(&self) -> bool {
        self.selected_start.is_some() || self.selected_end.is_some()
    }

    pub fn is_selected(&self, date: NaiveDate) -> bool {
        match (self.selected_start, self.selected_end) {
            (Some(start), Some(end)) => start <= date && date <= end,
            (Some(start), None) => start == date,
            (None, Some(end)) => end == date,
            (None, None) => false,
        }
    }

    pub fn nights(&self) -> Option<i64> {
        match (self.selected_start, self.selected_end) {
            (Some(start), Some(end)) => Some((end - start).num_days()),
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl fmt::Display for CalendarState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(start) = self.selected_start else {
            return write!(f, "Select Dates");
        };
        write!(f, "{}", start.format("%b %-d"))?;
        if let Some(end) = self.selected_end {
            write!(f, " - {}", end.format("%b %-d"))?;
        }
        Ok(())
    }
}
