// Grid module
// Day and hour axes of the weekly planner grid

use std::fmt;

/// Number of day columns, Monday first.
pub const DAYS_PER_WEEK: u8 = 7;

/// First hour row shown on the grid
pub const FIRST_GRID_HOUR: u32 = 7;

/// Last hour row shown on the grid
pub const LAST_GRID_HOUR: u32 = 17;

/// Column headers
pub const DAY_SHORT_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Day names used by the plan form's day chooser
pub const DAY_LONG_LABELS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

pub fn is_valid_day(day: u8) -> bool {
    day < DAYS_PER_WEEK
}

pub fn short_day_label(day: u8) -> Option<&'static str> {
    DAY_SHORT_LABELS.get(day as usize).copied()
}

pub fn long_day_label(day: u8) -> Option<&'static str> {
    DAY_LONG_LABELS.get(day as usize).copied()
}

/// An hour row label such as `9:00`. Only the hour is significant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HourLabel(u32);

impl HourLabel {
    pub fn from_hour(hour: u32) -> Option<Self> {
        (hour < 24).then_some(Self(hour))
    }

    /// Parse a label by its numeric prefix: `"9:00"`, `"09:30"` and `"9"` all
    /// name hour 9.
    pub fn parse(label: &str) -> Option<Self> {
        let prefix = label.trim().split(':').next()?;
        let hour = prefix.parse::<u32>().ok()?;
        Self::from_hour(hour)
    }

    /// The fixed rows of the grid, 7:00 through 17:00.
    pub fn grid_rows() -> impl Iterator<Item = HourLabel> {
        (FIRST_GRID_HOUR..=LAST_GRID_HOUR).map(HourLabel)
    }

    pub fn hour(self) -> u32 {
        self.0
    }

    pub fn is_on_grid(self) -> bool {
        (FIRST_GRID_HOUR..=LAST_GRID_HOUR).contains(&self.0)
    }
}

impl fmt::Display for HourLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:00", self.0)
    }
}

/// A (day, hour) slot on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    pub day: u8,
    pub hour: HourLabel,
}

impl GridCell {
    pub fn new(day: u8, hour: HourLabel) -> Option<Self> {
        is_valid_day(day).then_some(Self { day, hour })
    }
}

impl Default for GridCell {
    fn default() -> Self {
        Self {
            day: 0,
            hour: HourLabel(9),
        }
    }
}
