// Storage collaborator for the scheduling core. All tables live behind one
// RwLock so that the operations the core depends on — compare-and-set slot
// reservation, unique-constraint checks, the leave cascade, and revenue
// reconciliation — each run inside a single critical section and are either
// fully applied or not applied at all.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use shared_models::records::{
    Affiliation, AppointmentStatus, ApprovalStatus, AvailabilityWindow, Appointment, Clinic,
    Doctor, FeePolicy, Notification, Patient, Payment, PaymentStatus, RevenueRecord, TimeSlot,
};

use crate::error::StoreError;

#[derive(Default)]
struct Tables {
    doctors: HashMap<Uuid, Doctor>,
    clinics: HashMap<Uuid, Clinic>,
    patients: HashMap<Uuid, Patient>,
    affiliations: HashMap<Uuid, Affiliation>,
    windows: HashMap<Uuid, AvailabilityWindow>,
    slots: HashMap<Uuid, TimeSlot>,
    appointments: HashMap<Uuid, Appointment>,
    payments: HashMap<Uuid, Payment>,
    fee_policies: HashMap<Uuid, FeePolicy>,
    revenue: HashMap<Uuid, RevenueRecord>,
    notifications: HashMap<Uuid, Notification>,
}

#[derive(Clone, Default)]
pub struct ClinicStore {
    inner: Arc<RwLock<Tables>>,
}

impl ClinicStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Registry: doctors, clinics, patients
    // ------------------------------------------------------------------

    pub async fn insert_doctor(&self, doctor: Doctor) -> Doctor {
        let mut t = self.inner.write().await;
        t.doctors.insert(doctor.id, doctor.clone());
        doctor
    }

    pub async fn get_doctor(&self, id: Uuid) -> Result<Doctor, StoreError> {
        let t = self.inner.read().await;
        t.doctors.get(&id).cloned().ok_or(StoreError::NotFound("doctor"))
    }

    pub async fn doctor_for_user(&self, user_id: Uuid) -> Result<Doctor, StoreError> {
        let t = self.inner.read().await;
        t.doctors
            .values()
            .find(|d| d.user_id == user_id)
            .cloned()
            .ok_or(StoreError::NotFound("doctor"))
    }

    pub async fn set_doctor_fee(&self, doctor_id: Uuid, fee: f64) -> Result<(), StoreError> {
        let mut t = self.inner.write().await;
        let doctor = t.doctors.get_mut(&doctor_id).ok_or(StoreError::NotFound("doctor"))?;
        doctor.fee = fee;
        Ok(())
    }

    pub async fn set_doctor_verified(&self, doctor_id: Uuid) -> Result<Doctor, StoreError> {
        let mut t = self.inner.write().await;
        let doctor = t.doctors.get_mut(&doctor_id).ok_or(StoreError::NotFound("doctor"))?;
        doctor.is_verified = true;
        Ok(doctor.clone())
    }

    pub async fn insert_clinic(&self, clinic: Clinic) -> Clinic {
        let mut t = self.inner.write().await;
        t.clinics.insert(clinic.id, clinic.clone());
        clinic
    }

    pub async fn get_clinic(&self, id: Uuid) -> Result<Clinic, StoreError> {
        let t = self.inner.read().await;
        t.clinics.get(&id).cloned().ok_or(StoreError::NotFound("clinic"))
    }

    pub async fn clinics_owned_by(&self, owner_id: Uuid) -> Vec<Clinic> {
        let t = self.inner.read().await;
        let mut clinics: Vec<Clinic> =
            t.clinics.values().filter(|c| c.owner_id == owner_id).cloned().collect();
        clinics.sort_by(|a, b| a.name.cmp(&b.name));
        clinics
    }

    pub async fn insert_patient(&self, patient: Patient) -> Patient {
        let mut t = self.inner.write().await;
        t.patients.insert(patient.id, patient.clone());
        patient
    }

    pub async fn get_patient(&self, id: Uuid) -> Result<Patient, StoreError> {
        let t = self.inner.read().await;
        t.patients.get(&id).cloned().ok_or(StoreError::NotFound("patient"))
    }

    /// Used by walk-in booking: guest identities are keyed by contact email
    /// so repeat walk-ins reuse the same patient row.
    pub async fn find_or_create_patient(&self, email: &str, full_name: &str) -> Patient {
        let mut t = self.inner.write().await;
        if let Some(existing) = t.patients.values().find(|p| p.email == email) {
            return existing.clone();
        }
        let patient = Patient {
            id: Uuid::new_v4(),
            full_name: full_name.to_string(),
            email: email.to_string(),
        };
        t.patients.insert(patient.id, patient.clone());
        patient
    }

    // ------------------------------------------------------------------
    // Affiliations
    // ------------------------------------------------------------------

    pub async fn insert_affiliation(&self, affiliation: Affiliation) -> Result<Affiliation, StoreError> {
        let mut t = self.inner.write().await;
        if t.affiliations
            .values()
            .any(|a| a.doctor_id == affiliation.doctor_id && a.clinic_id == affiliation.clinic_id)
        {
            return Err(StoreError::Duplicate("affiliation(doctor, clinic)"));
        }
        t.affiliations.insert(affiliation.id, affiliation.clone());
        Ok(affiliation)
    }

    pub async fn get_affiliation(&self, id: Uuid) -> Result<Affiliation, StoreError> {
        let t = self.inner.read().await;
        t.affiliations.get(&id).cloned().ok_or(StoreError::NotFound("affiliation"))
    }

    pub async fn set_affiliation_status(
        &self,
        id: Uuid,
        status: ApprovalStatus,
    ) -> Result<Affiliation, StoreError> {
        let mut t = self.inner.write().await;
        let affiliation = t.affiliations.get_mut(&id).ok_or(StoreError::NotFound("affiliation"))?;
        affiliation.status = status;
        Ok(affiliation.clone())
    }

    pub async fn is_affiliation_approved(&self, doctor_id: Uuid, clinic_id: Uuid) -> bool {
        let t = self.inner.read().await;
        t.affiliations.values().any(|a| {
            a.doctor_id == doctor_id
                && a.clinic_id == clinic_id
                && a.status == ApprovalStatus::Approved
        })
    }

    pub async fn affiliations_for_clinic(&self, clinic_id: Uuid) -> Vec<Affiliation> {
        let t = self.inner.read().await;
        let mut list: Vec<Affiliation> =
            t.affiliations.values().filter(|a| a.clinic_id == clinic_id).cloned().collect();
        list.sort_by_key(|a| a.created_at);
        list
    }

    pub async fn affiliations_for_doctor(&self, doctor_id: Uuid) -> Vec<Affiliation> {
        let t = self.inner.read().await;
        let mut list: Vec<Affiliation> =
            t.affiliations.values().filter(|a| a.doctor_id == doctor_id).cloned().collect();
        list.sort_by_key(|a| a.created_at);
        list
    }

    // ------------------------------------------------------------------
    // Availability windows
    // ------------------------------------------------------------------

    /// Inserts a window, enforcing uniqueness on
    /// (doctor, clinic, date, start_time, end_time).
    pub async fn insert_window(
        &self,
        window: AvailabilityWindow,
    ) -> Result<AvailabilityWindow, StoreError> {
        let mut t = self.inner.write().await;
        if t.windows.values().any(|w| {
            w.doctor_id == window.doctor_id
                && w.clinic_id == window.clinic_id
                && w.date == window.date
                && w.start_time == window.start_time
                && w.end_time == window.end_time
        }) {
            return Err(StoreError::Duplicate("window(doctor, clinic, date, start, end)"));
        }
        t.windows.insert(window.id, window.clone());
        Ok(window)
    }

    pub async fn get_window(&self, id: Uuid) -> Result<AvailabilityWindow, StoreError> {
        let t = self.inner.read().await;
        t.windows.get(&id).cloned().ok_or(StoreError::NotFound("availability window"))
    }

    pub async fn set_window_status(
        &self,
        id: Uuid,
        status: ApprovalStatus,
    ) -> Result<AvailabilityWindow, StoreError> {
        let mut t = self.inner.write().await;
        let window = t.windows.get_mut(&id).ok_or(StoreError::NotFound("availability window"))?;
        window.status = status;
        Ok(window.clone())
    }

    pub async fn delete_window(&self, doctor_id: Uuid, window_id: Uuid) -> Result<(), StoreError> {
        let mut t = self.inner.write().await;
        match t.windows.get(&window_id) {
            Some(w) if w.doctor_id == doctor_id => {
                t.windows.remove(&window_id);
                Ok(())
            }
            _ => Err(StoreError::NotFound("availability window")),
        }
    }

    pub async fn delete_windows_by_group(&self, doctor_id: Uuid, group: Uuid) -> usize {
        let mut t = self.inner.write().await;
        let ids: Vec<Uuid> = t
            .windows
            .values()
            .filter(|w| w.doctor_id == doctor_id && w.recurrence_group == Some(group))
            .map(|w| w.id)
            .collect();
        for id in &ids {
            t.windows.remove(id);
        }
        ids.len()
    }

    pub async fn windows_for_doctor(&self, doctor_id: Uuid) -> Vec<AvailabilityWindow> {
        let t = self.inner.read().await;
        let mut list: Vec<AvailabilityWindow> =
            t.windows.values().filter(|w| w.doctor_id == doctor_id).cloned().collect();
        list.sort_by(|a, b| (b.date, a.start_time).cmp(&(a.date, b.start_time)));
        list
    }

    // ------------------------------------------------------------------
    // Slot ledger
    // ------------------------------------------------------------------

    /// Slot generation primitive: inserts unless a slot with the same
    /// (doctor, start, end) already exists for any clinic. Returns whether
    /// a row was created, making repeated generation idempotent.
    pub async fn insert_slot_if_absent(&self, slot: TimeSlot) -> bool {
        let mut t = self.inner.write().await;
        let exists = t
            .slots
            .values()
            .any(|s| s.doctor_id == slot.doctor_id && s.start == slot.start && s.end == slot.end);
        if exists {
            return false;
        }
        t.slots.insert(slot.id, slot);
        true
    }

    pub async fn get_slot(&self, id: Uuid) -> Result<TimeSlot, StoreError> {
        let t = self.inner.read().await;
        t.slots.get(&id).cloned().ok_or(StoreError::NotFound("slot"))
    }

    /// Removes the unbooked remainder of a day before it is regenerated.
    /// Booked slots survive: they are referenced by live appointments.
    pub async fn delete_unbooked_slots_for_day(
        &self,
        doctor_id: Uuid,
        clinic_id: Uuid,
        date: NaiveDate,
    ) -> usize {
        let mut t = self.inner.write().await;
        let ids: Vec<Uuid> = t
            .slots
            .values()
            .filter(|s| {
                s.doctor_id == doctor_id
                    && s.clinic_id == clinic_id
                    && s.start.date_naive() == date
                    && !s.is_booked
            })
            .map(|s| s.id)
            .collect();
        for id in &ids {
            t.slots.remove(id);
        }
        ids.len()
    }

    /// Doctor-requested deletion of a single slot. Booked slots refuse.
    pub async fn delete_slot(&self, doctor_id: Uuid, slot_id: Uuid) -> Result<(), StoreError> {
        let mut t = self.inner.write().await;
        let slot = t.slots.get(&slot_id).ok_or(StoreError::NotFound("slot"))?;
        if slot.doctor_id != doctor_id {
            return Err(StoreError::NotFound("slot"));
        }
        if slot.is_booked {
            return Err(StoreError::SlotBooked);
        }
        t.slots.remove(&slot_id);
        Ok(())
    }

    pub async fn free_slots_on(&self, doctor_id: Uuid, date: NaiveDate) -> Vec<TimeSlot> {
        let t = self.inner.read().await;
        let mut list: Vec<TimeSlot> = t
            .slots
            .values()
            .filter(|s| s.doctor_id == doctor_id && !s.is_booked && s.start.date_naive() == date)
            .cloned()
            .collect();
        list.sort_by_key(|s| s.start);
        list
    }

    pub async fn free_dates_from(&self, doctor_id: Uuid, from: NaiveDate) -> Vec<NaiveDate> {
        let t = self.inner.read().await;
        let mut dates: Vec<NaiveDate> = t
            .slots
            .values()
            .filter(|s| s.doctor_id == doctor_id && !s.is_booked && s.start.date_naive() >= from)
            .map(|s| s.start.date_naive())
            .collect();
        dates.sort();
        dates.dedup();
        dates
    }

    /// Releases a slot on cancellation. Missing slots are ignored: the slot
    /// may have been deleted after the appointment lost its reference.
    pub async fn release_slot(&self, slot_id: Uuid) {
        let mut t = self.inner.write().await;
        if let Some(slot) = t.slots.get_mut(&slot_id) {
            slot.is_booked = false;
        }
    }

    // ------------------------------------------------------------------
    // Booking
    // ------------------------------------------------------------------

    /// Per-doctor per-day sequence used to build booking tokens: the number
    /// of appointments whose slot starts on the given date, plus one.
    pub async fn next_token_sequence(&self, doctor_id: Uuid, date: NaiveDate) -> usize {
        let t = self.inner.read().await;
        let count = t
            .appointments
            .values()
            .filter(|a| {
                a.doctor_id == doctor_id
                    && a.slot_id
                        .and_then(|sid| t.slots.get(&sid))
                        .map(|s| s.start.date_naive() == date)
                        .unwrap_or(false)
            })
            .count();
        count + 1
    }

    /// Atomic booking: compare-and-set on `is_booked` plus the appointment
    /// insert in one critical section. A concurrent loser observes
    /// `SlotTaken`; a token collision leaves the slot untouched so the
    /// caller can retry with a new disambiguator.
    pub async fn book_slot(
        &self,
        slot_id: Uuid,
        appointment: Appointment,
    ) -> Result<Appointment, StoreError> {
        let mut t = self.inner.write().await;

        let slot = t.slots.get(&slot_id).ok_or(StoreError::NotFound("slot"))?;
        if slot.is_booked {
            return Err(StoreError::SlotTaken);
        }
        if t.appointments.values().any(|a| a.token == appointment.token) {
            return Err(StoreError::Duplicate("appointment_token"));
        }

        // Checks passed: apply both effects before the lock drops.
        if let Some(slot) = t.slots.get_mut(&slot_id) {
            slot.is_booked = true;
        }
        t.appointments.insert(appointment.id, appointment.clone());
        debug!("slot {} booked by appointment {}", slot_id, appointment.id);
        Ok(appointment)
    }

    /// Walk-in booking: the ad-hoc slot and its appointment are created
    /// together, the slot already marked booked.
    pub async fn insert_walk_in(
        &self,
        slot: TimeSlot,
        appointment: Appointment,
    ) -> Result<Appointment, StoreError> {
        let mut t = self.inner.write().await;
        if t.appointments.values().any(|a| a.token == appointment.token) {
            return Err(StoreError::Duplicate("appointment_token"));
        }
        t.slots.insert(slot.id, slot);
        t.appointments.insert(appointment.id, appointment.clone());
        Ok(appointment)
    }

    pub async fn get_appointment(&self, id: Uuid) -> Result<Appointment, StoreError> {
        let t = self.inner.read().await;
        t.appointments.get(&id).cloned().ok_or(StoreError::NotFound("appointment"))
    }

    pub async fn get_appointment_by_token(&self, token: &str) -> Result<Appointment, StoreError> {
        let t = self.inner.read().await;
        t.appointments
            .values()
            .find(|a| a.token == token)
            .cloned()
            .ok_or(StoreError::NotFound("appointment"))
    }

    pub async fn appointments_for_patient(&self, patient_id: Uuid) -> Vec<Appointment> {
        let t = self.inner.read().await;
        let mut list: Vec<Appointment> =
            t.appointments.values().filter(|a| a.patient_id == patient_id).cloned().collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        list
    }

    pub async fn appointments_for_doctor(&self, doctor_id: Uuid) -> Vec<Appointment> {
        let t = self.inner.read().await;
        let mut list: Vec<Appointment> =
            t.appointments.values().filter(|a| a.doctor_id == doctor_id).cloned().collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        list
    }

    pub async fn appointments_for_clinic(&self, clinic_id: Uuid) -> Vec<Appointment> {
        let t = self.inner.read().await;
        let mut list: Vec<Appointment> =
            t.appointments.values().filter(|a| a.clinic_id == clinic_id).cloned().collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        list
    }

    /// Cancels one appointment and frees its slot in the same critical
    /// section. Appending to notes rather than replacing preserves the
    /// booking history on the row.
    pub async fn cancel_appointment(
        &self,
        id: Uuid,
        note: Option<&str>,
    ) -> Result<Appointment, StoreError> {
        let mut t = self.inner.write().await;
        let slot_id = {
            let appointment =
                t.appointments.get_mut(&id).ok_or(StoreError::NotFound("appointment"))?;
            appointment.status = AppointmentStatus::Cancelled;
            if let Some(note) = note {
                if !appointment.notes.is_empty() {
                    appointment.notes.push(' ');
                }
                appointment.notes.push_str(note);
            }
            appointment.slot_id
        };
        if let Some(slot_id) = slot_id {
            if let Some(slot) = t.slots.get_mut(&slot_id) {
                slot.is_booked = false;
            }
        }
        Ok(t.appointments[&id].clone())
    }

    /// Leave cascade: every slot for (doctor, clinic, date) is force-blocked
    /// and every pending/confirmed appointment on those slots cancelled with
    /// the leave note, all inside one critical section. Returns the
    /// cancelled appointments (for notification) and the blocked slot count.
    pub async fn leave_cascade(
        &self,
        doctor_id: Uuid,
        clinic_id: Uuid,
        date: NaiveDate,
        note: &str,
    ) -> (Vec<Appointment>, usize) {
        let mut t = self.inner.write().await;

        let slot_ids: Vec<Uuid> = t
            .slots
            .values()
            .filter(|s| {
                s.doctor_id == doctor_id
                    && s.clinic_id == clinic_id
                    && s.start.date_naive() == date
            })
            .map(|s| s.id)
            .collect();

        let affected_ids: Vec<Uuid> = t
            .appointments
            .values()
            .filter(|a| {
                matches!(a.status, AppointmentStatus::Pending | AppointmentStatus::Confirmed)
                    && a.slot_id.map(|sid| slot_ids.contains(&sid)).unwrap_or(false)
            })
            .map(|a| a.id)
            .collect();

        let mut cancelled = Vec::with_capacity(affected_ids.len());
        for id in affected_ids {
            if let Some(appointment) = t.appointments.get_mut(&id) {
                appointment.status = AppointmentStatus::Cancelled;
                if !appointment.notes.is_empty() {
                    appointment.notes.push(' ');
                }
                appointment.notes.push_str(note);
                cancelled.push(appointment.clone());
            }
        }

        for id in &slot_ids {
            if let Some(slot) = t.slots.get_mut(id) {
                slot.is_booked = true;
            }
        }

        debug!(
            "leave cascade for doctor {} at clinic {} on {}: {} appointments, {} slots",
            doctor_id,
            clinic_id,
            date,
            cancelled.len(),
            slot_ids.len()
        );
        (cancelled, slot_ids.len())
    }

    // ------------------------------------------------------------------
    // Payments, fee policies, revenue
    // ------------------------------------------------------------------

    pub async fn insert_payment(&self, payment: Payment) -> Result<Payment, StoreError> {
        let mut t = self.inner.write().await;
        if t.payments.values().any(|p| p.order_reference == payment.order_reference) {
            return Err(StoreError::Duplicate("payment_order_reference"));
        }
        t.payments.insert(payment.id, payment.clone());
        Ok(payment)
    }

    pub async fn payment_by_order(&self, order_reference: &str) -> Result<Payment, StoreError> {
        let t = self.inner.read().await;
        t.payments
            .values()
            .find(|p| p.order_reference == order_reference)
            .cloned()
            .ok_or(StoreError::NotFound("payment"))
    }

    pub async fn complete_payment(
        &self,
        order_reference: &str,
        transaction_reference: &str,
    ) -> Result<Payment, StoreError> {
        let mut t = self.inner.write().await;
        let payment = t
            .payments
            .values_mut()
            .find(|p| p.order_reference == order_reference)
            .ok_or(StoreError::NotFound("payment"))?;
        payment.status = PaymentStatus::Completed;
        payment.transaction_reference = Some(transaction_reference.to_string());
        Ok(payment.clone())
    }

    /// Marks the appointment paid and confirmed once its payment completes.
    /// Cancelled is terminal: a late payment callback must not resurrect the
    /// appointment, so a cancelled row is returned untouched.
    pub async fn mark_appointment_paid(&self, id: Uuid) -> Result<Appointment, StoreError> {
        let mut t = self.inner.write().await;
        let appointment = t.appointments.get_mut(&id).ok_or(StoreError::NotFound("appointment"))?;
        if appointment.status != AppointmentStatus::Cancelled {
            appointment.paid = true;
            appointment.status = AppointmentStatus::Confirmed;
        }
        Ok(appointment.clone())
    }

    pub async fn upsert_fee_policy(&self, policy: FeePolicy) -> FeePolicy {
        let mut t = self.inner.write().await;
        if let Some(existing) = t
            .fee_policies
            .values_mut()
            .find(|p| p.doctor_id == policy.doctor_id && p.clinic_id == policy.clinic_id)
        {
            existing.consultation_fee = policy.consultation_fee;
            existing.clinic_share_percent = policy.clinic_share_percent;
            existing.clinic_fixed_fee = policy.clinic_fixed_fee;
            existing.updated_at = policy.updated_at;
            return existing.clone();
        }
        t.fee_policies.insert(policy.id, policy.clone());
        policy
    }

    pub async fn fee_policy_for(&self, doctor_id: Uuid, clinic_id: Uuid) -> Option<FeePolicy> {
        let t = self.inner.read().await;
        t.fee_policies
            .values()
            .find(|p| p.doctor_id == doctor_id && p.clinic_id == clinic_id)
            .cloned()
    }

    pub async fn fee_policies_for_doctor(&self, doctor_id: Uuid) -> Vec<FeePolicy> {
        let t = self.inner.read().await;
        let mut list: Vec<FeePolicy> =
            t.fee_policies.values().filter(|p| p.doctor_id == doctor_id).cloned().collect();
        list.sort_by_key(|p| p.updated_at);
        list
    }

    /// Revenue reconciliation: the existence check, the record insert, the
    /// slot flip, and the paid flag all land in one critical section.
    /// Returns false without mutating anything when a record for the
    /// appointment already exists.
    pub async fn apply_reconciliation(
        &self,
        record: RevenueRecord,
    ) -> Result<bool, StoreError> {
        let mut t = self.inner.write().await;

        if t.revenue.values().any(|r| r.appointment_id == record.appointment_id) {
            return Ok(false);
        }
        let slot_id = {
            let appointment = t
                .appointments
                .get_mut(&record.appointment_id)
                .ok_or(StoreError::NotFound("appointment"))?;
            appointment.paid = true;
            appointment.slot_id
        };
        if let Some(slot_id) = slot_id {
            if let Some(slot) = t.slots.get_mut(&slot_id) {
                slot.is_booked = true;
            }
        }
        t.revenue.insert(record.id, record);
        Ok(true)
    }

    pub async fn revenue_for_clinic(&self, clinic_id: Uuid) -> Vec<RevenueRecord> {
        let t = self.inner.read().await;
        let mut list: Vec<RevenueRecord> =
            t.revenue.values().filter(|r| r.clinic_id == clinic_id).cloned().collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        list
    }

    pub async fn revenue_for_doctor(&self, doctor_id: Uuid) -> Vec<RevenueRecord> {
        let t = self.inner.read().await;
        let mut list: Vec<RevenueRecord> =
            t.revenue.values().filter(|r| r.doctor_id == doctor_id).cloned().collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        list
    }

    pub async fn revenue_for_appointment(&self, appointment_id: Uuid) -> Option<RevenueRecord> {
        let t = self.inner.read().await;
        t.revenue.values().find(|r| r.appointment_id == appointment_id).cloned()
    }

    // ------------------------------------------------------------------
    // Notifications
    // ------------------------------------------------------------------

    pub async fn insert_notification(&self, notification: Notification) -> Notification {
        let mut t = self.inner.write().await;
        t.notifications.insert(notification.id, notification.clone());
        notification
    }

    pub async fn notifications_for_user(&self, user_id: Uuid) -> Vec<Notification> {
        let t = self.inner.read().await;
        let mut list: Vec<Notification> =
            t.notifications.values().filter(|n| n.user_id == user_id).cloned().collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        list
    }

    pub async fn mark_notification_read(&self, id: Uuid) -> Result<Notification, StoreError> {
        let mut t = self.inner.write().await;
        let notification =
            t.notifications.get_mut(&id).ok_or(StoreError::NotFound("notification"))?;
        notification.is_read = true;
        Ok(notification.clone())
    }
}
