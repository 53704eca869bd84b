// Property-based tests for the time-slot mapper
// Random plans must land in exactly the cell named by their day and start hour

use chrono::{Duration, TimeZone, Timelike, Utc};
use proptest::prelude::*;

use pomodoro_planner::models::grid::{HourLabel, DAYS_PER_WEEK};
use pomodoro_planner::models::plan::{DailyPlan, PlanId};
use pomodoro_planner::models::task::TaskId;
use pomodoro_planner::models::user::UserId;
use pomodoro_planner::services::slots::{hidden_plans, plans_for_slot, week_grid};
use pomodoro_planner::utils::date::DisplayZone;

fn utc() -> DisplayZone {
    DisplayZone::Named(chrono_tz::UTC)
}

fn plan(index: usize, day: u8, hour: u32, minute: u32) -> DailyPlan {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, hour, minute, 0).unwrap();
    DailyPlan {
        id: PlanId(format!("p{}", index)),
        day,
        start_time: start,
        end_time: start + Duration::minutes(25),
        note: None,
        user_id: UserId::from("u1"),
        task_id: TaskId::from("t1"),
        created_at: None,
        updated_at: None,
    }
}

fn plans_strategy() -> impl Strategy<Value = Vec<DailyPlan>> {
    prop::collection::vec((0..DAYS_PER_WEEK, 0..24u32, 0..60u32), 0..40).prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(index, (day, hour, minute))| plan(index, day, hour, minute))
            .collect()
    })
}

proptest! {
    /// Property: a plan is in slot (d, h) iff its day is d and it starts in hour h
    #[test]
    fn prop_slot_membership_matches_day_and_hour(plans in plans_strategy()) {
        let zone = utc();
        for hour in HourLabel::grid_rows() {
            for day in 0..DAYS_PER_WEEK {
                let slot = plans_for_slot(&plans, day, hour, &zone);
                for plan in &plans {
                    let expected = plan.day == day && plan.start_time.hour() == hour.hour();
                    prop_assert_eq!(slot.iter().any(|p| p.id == plan.id), expected);
                }
            }
        }
    }

    /// Property: every plan is either on the grid exactly once or hidden
    #[test]
    fn prop_week_grid_partitions_plans(plans in plans_strategy()) {
        let zone = utc();
        let shown: usize = week_grid(&plans, &zone)
            .iter()
            .map(|row| row.cells.iter().map(Vec::len).sum::<usize>())
            .sum();
        prop_assert_eq!(shown + hidden_plans(&plans, &zone).len(), plans.len());
    }

    /// Property: slot order follows input order
    #[test]
    fn prop_slot_preserves_input_order(day in 0..DAYS_PER_WEEK, minutes in prop::collection::vec(0..60u32, 1..10)) {
        let plans: Vec<DailyPlan> = minutes
            .iter()
            .enumerate()
            .map(|(index, minute)| plan(index, day, 9, *minute))
            .collect();
        let slot = plans_for_slot(&plans, day, HourLabel::parse("9:00").unwrap(), &utc());
        let ids: Vec<&PlanId> = slot.iter().map(|p| &p.id).collect();
        let expected: Vec<&PlanId> = plans.iter().map(|p| &p.id).collect();
        prop_assert_eq!(ids, expected);
    }
}
