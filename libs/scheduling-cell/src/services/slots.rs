use chrono::{Duration, Utc};
use tracing::debug;
use uuid::Uuid;

use shared_models::records::AvailabilityWindow;
use shared_models::records::TimeSlot;
use shared_store::ClinicStore;

/// Walks the window with a cursor stepping by the slot duration and inserts
/// one slot per full interval. A candidate whose end would pass the window
/// end is dropped, so partial trailing slots are never created. Existing
/// slots with the same (doctor, start, end) are left untouched, which makes
/// repeated generation a no-op.
pub async fn generate_slots_for_window(store: &ClinicStore, window: &AvailabilityWindow) -> usize {
    let start = window.date.and_time(window.start_time).and_utc();
    let end = window.date.and_time(window.end_time).and_utc();
    let step = Duration::minutes(window.slot_duration_minutes);

    let mut created = 0;
    let mut cursor = start;
    while cursor < end {
        let next = cursor + step;
        if next > end {
            break;
        }
        let inserted = store
            .insert_slot_if_absent(TimeSlot {
                id: Uuid::new_v4(),
                doctor_id: window.doctor_id,
                clinic_id: window.clinic_id,
                start: cursor,
                end: next,
                is_booked: false,
                created_at: Utc::now(),
            })
            .await;
        if inserted {
            created += 1;
        }
        cursor = next;
    }

    debug!(
        "generated {} slots for doctor {} on {} ({} - {})",
        created, window.doctor_id, window.date, window.start_time, window.end_time
    );
    created
}
