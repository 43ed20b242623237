#[cfg(test)]
mod tests {
    use crate::availability::{SlotPolicy, SlotRejection};
    use crate::error::{Action, BookingError, ErrorKind, OVERLAP_MESSAGE};
    use crate::lifecycle::{
        complete_created, BookingLifecycleController, CancelPhase, CreatePhase, CreateRequest,
        Submission,
    };
    use crate::store::ReconciliationStore;
    use crate::test_support::{booking_at, ScriptedApi};
    use chrono::NaiveDate;
    use courtbook_common::{ApiError, BookingStatus, CreatedBooking, NewBooking};
    use courtbook_config::ScheduleConfig;
    use std::sync::atomic::Ordering;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 5).unwrap()
    }

    fn setup(
        api: ScriptedApi,
    ) -> (
        Arc<ScriptedApi>,
        Arc<Mutex<ReconciliationStore>>,
        BookingLifecycleController,
    ) {
        let api = Arc::new(api);
        let store = Arc::new(Mutex::new(ReconciliationStore::in_memory()));
        let policy = Arc::new(SlotPolicy::from_config(&ScheduleConfig::default()).unwrap());
        let controller = BookingLifecycleController::new(api.clone(), store.clone(), policy);
        (api, store, controller)
    }

    fn request_at(hour: u32, minute: u32) -> CreateRequest {
        CreateRequest {
            court_id: "c1".to_string(),
            start_time: booking_at("x", "c1", day(), hour, minute).start_time,
            title: Some("  ".to_string()),
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_create_success_lands_in_store_with_confirmed_fallback() {
        let (api, store, controller) = setup(ScriptedApi::with_courts(3));

        let outcome = controller.create(request_at(18, 30), &[], day()).await.unwrap();
        let Submission::Done(booking) = outcome else {
            panic!("create was ignored");
        };

        assert_eq!(booking.id, "srv-1");
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.title, "Reserva");
        assert_eq!(booking.end_time - booking.start_time, chrono::Duration::minutes(90));
        assert_eq!(store.lock().unwrap().confirmed_local(), &[booking]);
        assert_eq!(api.create_calls.load(Ordering::SeqCst), 1);
        assert_eq!(controller.create_phase(), CreatePhase::Idle);
    }

    #[tokio::test]
    async fn test_overlapping_create_is_rejected_without_a_request() {
        let (api, _store, controller) = setup(ScriptedApi::with_courts(3));
        let existing = vec![booking_at("b1", "c1", day(), 18, 30)];

        let err = controller
            .create(request_at(19, 0), &existing, day())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            BookingError::Validation(SlotRejection::Overlap {
                booking_id: "b1".to_string()
            })
        );
        assert_eq!(api.create_calls.load(Ordering::SeqCst), 0);
        assert_eq!(controller.create_error().unwrap().kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_backend_conflict_maps_to_overlap_message() {
        let api = ScriptedApi::with_courts(3);
        *api.create_response.lock().unwrap() =
            Some(Err(ApiError::Conflict("Slot already taken".to_string())));
        let (_api, store, controller) = setup(api);

        let err = controller.create(request_at(18, 30), &[], day()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        let shown = controller.create_error().unwrap();
        assert_eq!(shown.message, OVERLAP_MESSAGE);
        assert!(store.lock().unwrap().confirmed_local().is_empty());

        controller.reset_error(Action::Create);
        assert!(controller.create_error().is_none());
    }

    #[tokio::test]
    async fn test_request_error_falls_back_to_generic_message() {
        let api = ScriptedApi::with_courts(3);
        *api.create_response.lock().unwrap() = Some(Err(ApiError::request(Some(500), "")));
        let (_api, _store, controller) = setup(api);

        controller.create(request_at(18, 30), &[], day()).await.unwrap_err();
        assert_eq!(
            controller.create_error().unwrap().message,
            "Could not create the booking."
        );
    }

    #[tokio::test]
    async fn test_duplicate_create_in_flight_is_ignored() {
        let api = ScriptedApi {
            action_delay: Some(Duration::from_millis(50)),
            ..ScriptedApi::with_courts(3)
        };
        let (api, _store, controller) = setup(api);

        let (first, second) = tokio::join!(
            controller.create(request_at(18, 30), &[], day()),
            controller.create(request_at(18, 30), &[], day()),
        );

        assert!(matches!(first.unwrap(), Submission::Done(_)));
        assert_eq!(second.unwrap(), Submission::Ignored);
        assert_eq!(api.create_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cancel_confirmed_marks_store() {
        let (api, store, controller) = setup(ScriptedApi::with_courts(3));
        let target = booking_at("b1", "c1", day(), 18, 30);
        store.lock().unwrap().push_confirmed(target.clone());

        let outcome = controller.cancel(&target, None).await.unwrap();
        assert_eq!(outcome, Submission::Done("b1".to_string()));
        assert!(store.lock().unwrap().is_cancelled("b1"));
        assert!(store.lock().unwrap().confirmed_local().is_empty());
        assert_eq!(api.cancel_calls.load(Ordering::SeqCst), 1);
        assert_eq!(controller.cancel_phase(), CancelPhase::Idle);
    }

    #[tokio::test]
    async fn test_duplicate_cancel_in_flight_is_ignored() {
        let api = ScriptedApi {
            action_delay: Some(Duration::from_millis(50)),
            ..ScriptedApi::with_courts(3)
        };
        let (api, store, controller) = setup(api);
        let target = booking_at("b1", "c1", day(), 18, 30);
        store.lock().unwrap().push_confirmed(target.clone());

        let (first, second) = tokio::join!(
            controller.cancel(&target, None),
            controller.cancel(&target, Some("again".to_string())),
        );

        assert_eq!(first.unwrap(), Submission::Done("b1".to_string()));
        assert_eq!(second.unwrap(), Submission::Ignored);
        assert_eq!(api.cancel_calls.load(Ordering::SeqCst), 1);
        assert!(store.lock().unwrap().is_cancelled("b1"));
        assert_eq!(controller.cancel_phase(), CancelPhase::Idle);
    }

    #[tokio::test]
    async fn test_cancel_of_cancelled_booking_makes_no_request() {
        let (api, store, controller) = setup(ScriptedApi::with_courts(3));
        let mut target = booking_at("b1", "c1", day(), 18, 30);
        target.status = BookingStatus::Cancelled;

        let err = controller.cancel(&target, None).await.unwrap_err();
        assert!(matches!(err, BookingError::NotCancellable { .. }));
        assert_eq!(api.cancel_calls.load(Ordering::SeqCst), 0);
        assert!(!store.lock().unwrap().is_cancelled("b1"));
    }

    #[tokio::test]
    async fn test_cancel_not_found_keeps_booking_visible() {
        let api = ScriptedApi::with_courts(3);
        *api.cancel_error.lock().unwrap() = Some(ApiError::NotFound("b1".to_string()));
        let (_api, store, controller) = setup(api);
        let target = booking_at("b1", "c1", day(), 18, 30);

        let err = controller.cancel(&target, Some("rain".into())).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(
            controller.cancel_error().unwrap().message,
            "Booking not found: b1"
        );
        assert!(!store.lock().unwrap().is_cancelled("b1"));
    }

    #[test]
    fn test_created_fields_win_over_request() {
        let sent_booking = booking_at("x", "c1", day(), 18, 30);
        let sent = NewBooking {
            court_id: "c1".to_string(),
            start_time: sent_booking.start_time,
            end_time: sent_booking.end_time,
            title: Some("Partido".to_string()),
            notes: None,
        };
        let created = CreatedBooking {
            id: "77".to_string(),
            status: Some(BookingStatus::Pending),
            ..CreatedBooking::default()
        };
        let booking = complete_created(created, &sent).unwrap();
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.title, "Partido");
        assert_eq!(booking.court_id, "c1");
    }
}
