#[cfg(test)]
mod tests {
    use crate::aggregator::{assemble_view, DayAggregator};
    use crate::test_support::{booking_at, courts, ScriptedApi};
    use chrono::{Duration as ChronoDuration, NaiveDate};
    use courtbook_common::CalendarDay;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;
    use std::time::Duration;

    fn d1() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 5).unwrap()
    }

    fn d2() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 6).unwrap()
    }

    #[test]
    fn test_courts_are_truncated_and_clamped() {
        let day = CalendarDay {
            courts: courts(14),
            bookings: vec![
                booking_at("b1", "c2", d1(), 18, 0),
                booking_at("b2", "c12", d1(), 18, 0),
            ],
        };
        let view = assemble_view(day.clone(), 50);
        assert_eq!(view.courts.len(), 10);
        assert_eq!(view.events.len(), 1);

        let view = assemble_view(day, 1);
        assert_eq!(view.courts.len(), 1);
        assert!(view.events.is_empty());
    }

    #[tokio::test]
    async fn test_slow_earlier_day_never_overwrites_newer_one() {
        let api = Arc::new(ScriptedApi::with_courts(3));
        api.set_day(d1(), vec![booking_at("old", "c1", d1(), 18, 0)]);
        api.set_day(d2(), vec![booking_at("new", "c1", d2(), 18, 0)]);
        api.delay_day(d1(), Duration::from_millis(80));

        let aggregator = DayAggregator::new(api.clone(), 10, chrono_tz::America::Santiago);
        let (stale, fresh) = tokio::join!(aggregator.load_day(d1()), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            aggregator.load_day(d2()).await
        });

        assert_eq!(fresh.date, Some(d2()));
        // The D1 response arrived last and was discarded.
        assert_eq!(stale.date, Some(d2()));
        let final_state = aggregator.state();
        assert_eq!(final_state.date, Some(d2()));
        assert_eq!(final_state.view.events.len(), 1);
        assert_eq!(final_state.view.events[0].id, "new");
        assert!(!final_state.loading);
        assert_eq!(final_state.generation, 2);
    }

    #[tokio::test]
    async fn test_failure_degrades_to_empty_view_with_error() {
        let api = Arc::new(ScriptedApi::with_courts(3));
        api.set_day(d1(), vec![booking_at("b1", "c1", d1(), 18, 0)]);
        let aggregator = DayAggregator::new(api.clone(), 10, chrono_tz::America::Santiago);
        assert_eq!(aggregator.load_day(d1()).await.view.events.len(), 1);

        api.failing_days.lock().unwrap().push(d1());
        let state = aggregator.load_day(d1()).await;
        assert!(state.view.events.is_empty());
        assert!(state.view.courts.is_empty());
        assert!(state.error.unwrap().contains("backend down"));
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_only_day_changes_refetch() {
        let api = Arc::new(ScriptedApi::with_courts(3));
        let aggregator = DayAggregator::new(api.clone(), 10, chrono_tz::America::Santiago);
        let morning = booking_at("t", "c1", d1(), 9, 0).start_time;

        assert!(aggregator.on_date_change(morning).await.is_some());
        assert!(aggregator
            .on_date_change(morning + ChronoDuration::hours(6))
            .await
            .is_none());
        assert!(aggregator
            .on_date_change(morning + ChronoDuration::days(1))
            .await
            .is_some());
        assert_eq!(api.day_calls.load(Ordering::SeqCst), 2);
    }
}
