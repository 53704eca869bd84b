//! Time-slot mapping: which plans occupy a (day, hour) cell.
//!
//! A plan sits in the cell whose day equals `plan.day` and whose hour equals
//! the hour of `plan.start_time` in the display zone. Plans starting outside
//! the grid's 7:00-17:00 rows never match a cell and are simply not shown.

use crate::models::grid::{GridCell, HourLabel, DAYS_PER_WEEK};
use crate::models::plan::DailyPlan;
use crate::utils::date::DisplayZone;

/// Plans in one cell, in input order.
pub fn plans_for_slot<'a>(
    plans: &'a [DailyPlan],
    day: u8,
    hour: HourLabel,
    zone: &DisplayZone,
) -> Vec<&'a DailyPlan> {
    plans
        .iter()
        .filter(|plan| plan.day == day && zone.hour_of(plan.start_time) == hour.hour())
        .collect()
}

/// Plans that no grid cell will ever show.
pub fn hidden_plans<'a>(plans: &'a [DailyPlan], zone: &DisplayZone) -> Vec<&'a DailyPlan> {
    plans
        .iter()
        .filter(|plan| {
            plan.day >= DAYS_PER_WEEK
                || !HourLabel::from_hour(zone.hour_of(plan.start_time))
                    .is_some_and(HourLabel::is_on_grid)
        })
        .collect()
}

/// One hour row of the week grid; `cells[d]` holds the plans for day `d`.
#[derive(Debug)]
pub struct GridRow<'a> {
    pub hour: HourLabel,
    pub cells: Vec<Vec<&'a DailyPlan>>,
}

impl<'a> GridRow<'a> {
    pub fn cell(&self, day: u8) -> Option<(GridCell, &[&'a DailyPlan])> {
        let plans = self.cells.get(day as usize)?;
        Some((GridCell { day, hour: self.hour }, plans.as_slice()))
    }
}

/// Build every row of the week grid, 7:00 first.
pub fn week_grid<'a>(plans: &'a [DailyPlan], zone: &DisplayZone) -> Vec<GridRow<'a>> {
    HourLabel::grid_rows()
        .map(|hour| GridRow {
            hour,
            cells: (0..DAYS_PER_WEEK)
                .map(|day| plans_for_slot(plans, day, hour, zone))
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::plan::PlanId;
    use crate::models::task::TaskId;
    use crate::models::user::UserId;
    use chrono::{Duration, TimeZone, Utc};

    fn utc() -> DisplayZone {
        DisplayZone::Named(chrono_tz::UTC)
    }

    fn hour(label: &str) -> HourLabel {
        HourLabel::parse(label).unwrap()
    }

    fn plan(id: &str, day: u8, start_hour: u32) -> DailyPlan {
        let start = Utc.with_ymd_and_hms(2024, 1, 3, start_hour, 0, 0).unwrap();
        DailyPlan {
            id: PlanId::from(id),
            day,
            start_time: start,
            end_time: start + Duration::hours(1),
            note: None,
            user_id: UserId::from("u1"),
            task_id: TaskId::from("t1"),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_wednesday_nine_scenario() {
        let plans = vec![plan("p1", 2, 9)];

        let hits = plans_for_slot(&plans, 2, hour("9:00"), &utc());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, PlanId::from("p1"));

        assert!(plans_for_slot(&plans, 2, hour("10:00"), &utc()).is_empty());
        assert!(plans_for_slot(&plans, 1, hour("9:00"), &utc()).is_empty());
    }

    #[test]
    fn test_slot_keeps_input_order() {
        let plans = vec![plan("b", 0, 8), plan("x", 1, 8), plan("a", 0, 8)];
        let ids: Vec<&str> = plans_for_slot(&plans, 0, hour("8:00"), &utc())
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_slot_uses_display_zone_hour() {
        let plans = vec![plan("p1", 2, 9)];
        let madrid = DisplayZone::Named(chrono_tz::Europe::Madrid);
        assert!(plans_for_slot(&plans, 2, hour("9:00"), &madrid).is_empty());
        assert_eq!(plans_for_slot(&plans, 2, hour("10:00"), &madrid).len(), 1);
    }

    #[test]
    fn test_out_of_range_hours_are_hidden() {
        let plans = vec![plan("early", 3, 6), plan("late", 3, 18), plan("ok", 3, 17)];
        let grid = week_grid(&plans, &utc());

        let shown: usize = grid
            .iter()
            .flat_map(|row| row.cells.iter())
            .map(|cell| cell.len())
            .sum();
        assert_eq!(shown, 1);

        let hidden: Vec<&str> = hidden_plans(&plans, &utc())
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(hidden, vec!["early", "late"]);
    }

    #[test]
    fn test_week_grid_dimensions() {
        let plans = vec![plan("p1", 6, 7)];
        let grid = week_grid(&plans, &utc());

        assert_eq!(grid.len(), 11);
        assert!(grid.iter().all(|row| row.cells.len() == 7));

        let (cell, hits) = grid[0].cell(6).unwrap();
        assert_eq!(cell.day, 6);
        assert_eq!(cell.hour.to_string(), "7:00");
        assert_eq!(hits.len(), 1);
        assert!(grid[0].cell(7).is_none());
    }
}
