#[cfg(test)]
mod tests {
    use crate::availability::SlotPolicy;
    use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
    use courtbook_common::{Booking, BookingStatus};
    use courtbook_config::ScheduleConfig;
    use proptest::prelude::*;

    fn policy() -> SlotPolicy {
        SlotPolicy::from_config(&ScheduleConfig::default()).unwrap()
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 6).unwrap()
    }

    // Local start at `minutes` past midnight of `day()`.
    fn local(policy: &SlotPolicy, minutes: u32) -> DateTime<Utc> {
        let time = NaiveTime::from_num_seconds_from_midnight_opt(minutes * 60, 0).unwrap();
        policy.local_instant(day(), time).unwrap()
    }

    fn booking_at(court: &str, start: DateTime<Utc>, minutes: i64) -> Booking {
        Booking {
            id: "existing".to_string(),
            court_id: court.to_string(),
            title: "Reserva".to_string(),
            status: BookingStatus::Confirmed,
            start_time: start,
            end_time: start + Duration::minutes(minutes),
        }
    }

    proptest! {
        #[test]
        fn test_starts_off_the_grid_are_never_selectable(minutes in 0u32..1440) {
            let policy = policy();
            let start = local(&policy, minutes);
            let on_grid = policy
                .allowed()
                .iter()
                .any(|t| policy.local_instant(day(), *t) == Some(start));
            if !on_grid {
                prop_assert!(!policy.is_selectable(start, "c1", &[], day()));
            }
        }

        #[test]
        fn test_slots_ending_after_closing_are_never_selectable(index in 0usize..32) {
            let policy = policy();
            let time = policy.allowed()[index % policy.allowed().len()];
            let start = policy.local_instant(day(), time).unwrap();
            let closing = policy.local_instant(day(), policy.closing()).unwrap();
            if start + policy.duration() > closing {
                prop_assert!(!policy.is_selectable(start, "c1", &[], day()));
            } else {
                prop_assert!(policy.is_selectable(start, "c1", &[], day()));
            }
        }

        #[test]
        fn test_overlap_decides_selectability(
            index in 0usize..32,
            offset in 0u32..1020,
            length in 15i64..240,
        ) {
            let policy = policy();
            let time = policy.allowed()[index % policy.allowed().len()];
            let start = policy.local_instant(day(), time).unwrap();
            let end = start + policy.duration();
            let closing = policy.local_instant(day(), policy.closing()).unwrap();
            prop_assume!(end <= closing);

            let existing_start = local(&policy, 360 + offset);
            let existing = vec![booking_at("c1", existing_start, length)];
            let overlaps = existing_start < end && start < existing_start + Duration::minutes(length);

            prop_assert_eq!(policy.is_selectable(start, "c1", &existing, day()), !overlaps);
            prop_assert!(policy.is_selectable(start, "c2", &existing, day()));
        }
    }
}
