#[cfg(test)]
mod tests {
    use crate::availability::SlotPolicy;
    use crate::calendar::CourtCalendar;
    use crate::lifecycle::{CreateRequest, Submission};
    use crate::store::ReconciliationStore;
    use crate::test_support::{booking_at, ScriptedApi};
    use chrono::{NaiveDate, TimeZone, Utc};
    use courtbook_config::{CalendarConfig, ScheduleConfig};
    use std::sync::Arc;
    use std::time::Duration;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 5).unwrap()
    }

    fn tuesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 6).unwrap()
    }

    fn calendar(api: Arc<ScriptedApi>) -> CourtCalendar {
        let policy = SlotPolicy::from_config(&ScheduleConfig::default()).unwrap();
        CourtCalendar::new(
            api,
            policy,
            &CalendarConfig::default(),
            ReconciliationStore::in_memory(),
        )
        // Monday at local noon.
        .with_clock(|| Utc.with_ymd_and_hms(2025, 5, 5, 16, 0, 0).unwrap())
    }

    #[tokio::test]
    async fn test_superseded_view_is_labelled_with_the_newer_day() {
        let api = Arc::new(ScriptedApi::with_courts(3));
        api.set_day(monday(), vec![booking_at("mon", "c1", monday(), 9, 0)]);
        api.set_day(
            tuesday(),
            vec![
                booking_at("tue-1", "c1", tuesday(), 9, 0),
                booking_at("tue-2", "c2", tuesday(), 12, 0),
            ],
        );
        api.delay_day(monday(), Duration::from_millis(80));
        let cal = calendar(api);

        let (stale, fresh) = tokio::join!(cal.view(monday()), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            cal.view(tuesday()).await
        });

        assert_eq!(fresh.date, tuesday());
        assert_eq!(stale.date, tuesday());
        let mut ids: Vec<&str> = stale.events.iter().map(|b| b.id.as_str()).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec!["tue-1", "tue-2"]);
        let policy = cal.policy();
        assert!(stale
            .events
            .iter()
            .all(|b| policy.local_date(b.start_time) == stale.date));
    }

    #[tokio::test]
    async fn test_local_booking_is_not_shown_on_other_days() {
        let api = Arc::new(ScriptedApi::with_courts(3));
        let cal = calendar(api);
        let request = CreateRequest {
            court_id: "c1".to_string(),
            start_time: booking_at("x", "c1", monday(), 8, 0).start_time,
            title: None,
            notes: None,
        };

        let Submission::Done(created) = cal.create(request).await.unwrap() else {
            panic!("create was ignored");
        };

        let other_day = cal.view(tuesday()).await;
        assert_eq!(other_day.date, tuesday());
        assert!(other_day.events.iter().all(|b| b.id != created.id));

        let same_day = cal.view(monday()).await;
        assert!(same_day.events.iter().any(|b| b.id == created.id));
    }
}
