mod common;

use assert_matches::assert_matches;
use chrono::{Duration, NaiveDate, Timelike, Utc};
use uuid::Uuid;

use scheduling_cell::services::TimeSlotService;
use scheduling_cell::{
    CreateTimeSlotRequest, SchedulingError, TimeSlotStatus, UpdateTimeSlotRequest,
    WorkingDayQuery,
};

use common::{in_days, store, StubIdentity};

fn create_payload(doctor_id: Uuid, start_days: i64, hours: i64) -> CreateTimeSlotRequest {
    let start_at = in_days(start_days);
    CreateTimeSlotRequest {
        doctor_id,
        start_at,
        end_at: start_at + Duration::hours(hours),
        appointment_id: None,
        appointment_request_id: None,
    }
}

#[tokio::test]
async fn new_slot_starts_blocked_and_unavailable() {
    let doctor = Uuid::new_v4();
    let service = TimeSlotService::new(store(), StubIdentity::knowing(vec![], vec![doctor]));

    let slot = service.create_slot(create_payload(doctor, 1, 1)).await.unwrap();

    assert_eq!(slot.status, TimeSlotStatus::Blocked);
    assert!(!slot.is_available);
    assert_eq!(slot.doctor_id, doctor);
}

#[tokio::test]
async fn rejects_inverted_interval() {
    let doctor = Uuid::new_v4();
    let service = TimeSlotService::new(store(), StubIdentity::knowing(vec![], vec![doctor]));

    let mut payload = create_payload(doctor, 1, 1);
    payload.end_at = payload.start_at - Duration::minutes(30);

    let result = service.create_slot(payload).await;
    assert_matches!(result, Err(SchedulingError::InvalidTime(_)));
}

#[tokio::test]
async fn rejects_unknown_doctor() {
    let service = TimeSlotService::new(store(), StubIdentity::knowing(vec![], vec![]));

    let result = service.create_slot(create_payload(Uuid::new_v4(), 1, 1)).await;
    assert_matches!(result, Err(SchedulingError::InvalidDoctor));
}

#[tokio::test]
async fn rejects_overlapping_slot_but_allows_adjacent() {
    let doctor = Uuid::new_v4();
    let service = TimeSlotService::new(store(), StubIdentity::knowing(vec![], vec![doctor]));

    let first = service.create_slot(create_payload(doctor, 1, 2)).await.unwrap();

    // Starts inside the existing interval.
    let overlapping = CreateTimeSlotRequest {
        doctor_id: doctor,
        start_at: first.start_at + Duration::hours(1),
        end_at: first.end_at + Duration::hours(1),
        appointment_id: None,
        appointment_request_id: None,
    };
    assert_matches!(
        service.create_slot(overlapping).await,
        Err(SchedulingError::SlotOverlap)
    );

    // Intervals are half-open, touching at the boundary is fine.
    let adjacent = CreateTimeSlotRequest {
        doctor_id: doctor,
        start_at: first.end_at,
        end_at: first.end_at + Duration::hours(1),
        appointment_id: None,
        appointment_request_id: None,
    };
    assert!(service.create_slot(adjacent).await.is_ok());
}

#[tokio::test]
async fn other_doctors_calendars_do_not_collide() {
    let first_doctor = Uuid::new_v4();
    let second_doctor = Uuid::new_v4();
    let service = TimeSlotService::new(
        store(),
        StubIdentity::knowing(vec![], vec![first_doctor, second_doctor]),
    );

    let slot = service
        .create_slot(create_payload(first_doctor, 1, 1))
        .await
        .unwrap();

    let same_time = CreateTimeSlotRequest {
        doctor_id: second_doctor,
        start_at: slot.start_at,
        end_at: slot.end_at,
        appointment_id: None,
        appointment_request_id: None,
    };
    assert!(service.create_slot(same_time).await.is_ok());
}

#[tokio::test]
async fn working_day_creates_eight_hour_slots() {
    let doctor = Uuid::new_v4();
    let service = TimeSlotService::new(store(), StubIdentity::knowing(vec![], vec![doctor]));
    let date = NaiveDate::from_ymd_opt(2027, 3, 15).unwrap();

    let slots = service
        .create_working_day(WorkingDayQuery {
            doctor_id: doctor,
            date,
        })
        .await
        .unwrap();

    assert_eq!(slots.len(), 8);
    assert_eq!(slots.first().unwrap().start_at.hour(), 9);
    assert_eq!(slots.last().unwrap().end_at.hour(), 17);
    for pair in slots.windows(2) {
        assert_eq!(pair[0].end_at, pair[1].start_at);
    }
}

#[tokio::test]
async fn working_day_rolls_back_when_an_hour_collides() {
    let doctor = Uuid::new_v4();
    let store = store();
    let service = TimeSlotService::new(store.clone(), StubIdentity::knowing(vec![], vec![doctor]));
    let date = NaiveDate::from_ymd_opt(2027, 3, 15).unwrap();

    // Occupy the 12:00 hour before generating the day.
    let noon = date.and_hms_opt(12, 0, 0).unwrap().and_utc();
    let existing = service
        .create_slot(CreateTimeSlotRequest {
            doctor_id: doctor,
            start_at: noon,
            end_at: noon + Duration::hours(1),
            appointment_id: None,
            appointment_request_id: None,
        })
        .await
        .unwrap();

    let result = service
        .create_working_day(WorkingDayQuery {
            doctor_id: doctor,
            date,
        })
        .await;
    assert_matches!(result, Err(SchedulingError::SlotOverlap));

    // None of the morning hours before the collision survived.
    let day_start = date.and_hms_opt(0, 0, 0).unwrap().and_utc();
    let remaining = service
        .find_overlapping(doctor, day_start, day_start + Duration::days(1))
        .await;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, existing.id);
}

#[tokio::test]
async fn update_revalidates_overlap_when_times_move() {
    let doctor = Uuid::new_v4();
    let service = TimeSlotService::new(store(), StubIdentity::knowing(vec![], vec![doctor]));

    let first = service.create_slot(create_payload(doctor, 1, 1)).await.unwrap();
    let second = service
        .create_slot(CreateTimeSlotRequest {
            doctor_id: doctor,
            start_at: first.end_at,
            end_at: first.end_at + Duration::hours(1),
            appointment_id: None,
            appointment_request_id: None,
        })
        .await
        .unwrap();

    // Moving the second slot onto the first must fail and change nothing.
    let result = service
        .update_slot(UpdateTimeSlotRequest {
            time_slot_id: second.id,
            start_at: Some(first.start_at),
            end_at: Some(first.end_at),
            status: None,
            is_available: None,
            appointment_id: None,
            appointment_request_id: None,
        })
        .await;
    assert_matches!(result, Err(SchedulingError::SlotOverlap));

    let unchanged = service.get_slot(second.id).await.unwrap();
    assert_eq!(unchanged.start_at, second.start_at);
}

#[tokio::test]
async fn update_without_time_change_skips_overlap_check() {
    let doctor = Uuid::new_v4();
    let service = TimeSlotService::new(store(), StubIdentity::knowing(vec![], vec![doctor]));

    let slot = service.create_slot(create_payload(doctor, 1, 1)).await.unwrap();

    let updated = service
        .update_slot(UpdateTimeSlotRequest {
            time_slot_id: slot.id,
            start_at: None,
            end_at: None,
            status: Some(TimeSlotStatus::Open),
            is_available: Some(true),
            appointment_id: None,
            appointment_request_id: None,
        })
        .await
        .unwrap();

    assert_eq!(updated.status, TimeSlotStatus::Open);
    assert!(updated.is_available);
}

#[tokio::test]
async fn available_listing_filters_status_and_time() {
    let doctor = Uuid::new_v4();
    let service = TimeSlotService::new(store(), StubIdentity::knowing(vec![], vec![doctor]));

    let blocked = service.create_slot(create_payload(doctor, 1, 1)).await.unwrap();
    let opened = service.create_slot(create_payload(doctor, 2, 1)).await.unwrap();
    service
        .update_slot(UpdateTimeSlotRequest {
            time_slot_id: opened.id,
            start_at: None,
            end_at: None,
            status: Some(TimeSlotStatus::Open),
            is_available: Some(true),
            appointment_id: None,
            appointment_request_id: None,
        })
        .await
        .unwrap();

    let available = service.list_upcoming_available(doctor).await;
    assert_eq!(available.len(), 1);
    assert_eq!(available[0].id, opened.id);

    let upcoming = service.list_upcoming(doctor).await;
    assert_eq!(upcoming.len(), 2);
    assert_eq!(upcoming[0].id, blocked.id);
}

#[tokio::test]
async fn period_listing_requires_start_inside_the_period() {
    let doctor = Uuid::new_v4();
    let service = TimeSlotService::new(store(), StubIdentity::knowing(vec![], vec![doctor]));

    // Two-hour slot; the queried period begins halfway through it.
    let slot = service.create_slot(create_payload(doctor, 1, 2)).await.unwrap();
    let from = slot.start_at + Duration::hours(1);
    let to = slot.start_at + Duration::hours(3);

    let by_period = service.list_by_period(doctor, from, to).await;
    assert!(by_period.is_empty());

    let overlapping = service.find_overlapping(doctor, from, to).await;
    assert_eq!(overlapping.len(), 1);
    assert_eq!(overlapping[0].id, slot.id);

    // A slot starting exactly at the period boundary is included.
    let at_boundary = service
        .create_slot(CreateTimeSlotRequest {
            doctor_id: doctor,
            start_at: to,
            end_at: to + Duration::hours(1),
            appointment_id: None,
            appointment_request_id: None,
        })
        .await
        .unwrap();
    let by_period = service.list_by_period(doctor, from, to).await;
    assert_eq!(by_period.len(), 1);
    assert_eq!(by_period[0].id, at_boundary.id);
}

#[tokio::test]
async fn delete_is_not_idempotent() {
    let doctor = Uuid::new_v4();
    let service = TimeSlotService::new(store(), StubIdentity::knowing(vec![], vec![doctor]));

    let slot = service.create_slot(create_payload(doctor, 1, 1)).await.unwrap();

    assert!(service.delete_slot(slot.id).await.is_ok());
    assert_matches!(
        service.delete_slot(slot.id).await,
        Err(SchedulingError::SlotNotFound)
    );
    assert_matches!(
        service.get_slot(slot.id).await,
        Err(SchedulingError::SlotNotFound)
    );
}

#[tokio::test]
async fn detailed_view_joins_linked_request() {
    let doctor = Uuid::new_v4();
    let service = TimeSlotService::new(store(), StubIdentity::knowing(vec![], vec![doctor]));

    let slot = service.create_slot(create_payload(doctor, 1, 1)).await.unwrap();
    let details = service.get_slot_detailed(slot.id).await.unwrap();

    assert_eq!(details.slot.id, slot.id);
    assert!(details.appointment.is_none());
    assert!(details.appointment_request.is_none());
}

#[tokio::test]
async fn slots_start_in_the_future_for_upcoming_listings() {
    let doctor = Uuid::new_v4();
    let service = TimeSlotService::new(store(), StubIdentity::knowing(vec![], vec![doctor]));

    // A slot an hour from now still counts as upcoming.
    let start_at = Utc::now() + Duration::hours(1);
    service
        .create_slot(CreateTimeSlotRequest {
            doctor_id: doctor,
            start_at,
            end_at: start_at + Duration::hours(1),
            appointment_id: None,
            appointment_request_id: None,
        })
        .await
        .unwrap();

    assert_eq!(service.list_upcoming(doctor).await.len(), 1);
}
