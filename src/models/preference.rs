use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-user working-hours preferences.
///
/// The base window applies to every day; `day_overrides` replaces it for
/// specific weekdays. A day whose override has start >= end is treated as a
/// non-working day and yields no availability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulingPreferences {
    pub work_start: NaiveTime,
    pub work_end: NaiveTime,
    #[serde(default)]
    pub day_overrides: HashMap<Weekday, (NaiveTime, NaiveTime)>,
}

impl SchedulingPreferences {
    /// Working hours for a given weekday, `None` for non-working days.
    pub fn hours_for(&self, day: Weekday) -> Option<(NaiveTime, NaiveTime)> {
        let (start, end) = self
            .day_overrides
            .get(&day)
            .copied()
            .unwrap_or((self.work_start, self.work_end));
        if start < end {
            Some((start, end))
        } else {
            None
        }
    }
}

impl Default for SchedulingPreferences {
    /// 09:00-17:00 every day, matching the default productivity settings.
    fn default() -> Self {
        Self {
            work_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            work_end: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            day_overrides: HashMap::new(),
        }
    }
}
