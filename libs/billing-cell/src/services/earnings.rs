use chrono::{Datelike, Utc};
use serde::Serialize;
use uuid::Uuid;

use shared_models::auth::AuthUser;
use shared_models::records::RevenueRecord;
use shared_store::{AppState, ClinicStore};

use crate::models::BillingError;

#[derive(Debug, Serialize)]
pub struct DoctorEarnings {
    pub today: f64,
    pub this_month: f64,
    pub total: f64,
}

#[derive(Debug, Serialize)]
pub struct ClinicRevenue {
    pub total_collected: f64,
    pub clinic_share: f64,
    pub records: Vec<RevenueRecord>,
}

pub struct EarningsService {
    store: ClinicStore,
}

impl EarningsService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    pub async fn doctor_earnings(&self, user: &AuthUser) -> Result<DoctorEarnings, BillingError> {
        let doctor = self
            .store
            .doctor_for_user(user.id)
            .await
            .map_err(|_| BillingError::NotFound("Doctor profile not found".to_string()))?;
        let records = self.store.revenue_for_doctor(doctor.id).await;

        let now = Utc::now();
        let today = now.date_naive();
        let mut earnings = DoctorEarnings {
            today: 0.0,
            this_month: 0.0,
            total: 0.0,
        };
        for record in &records {
            earnings.total += record.doctor_earning;
            let date = record.created_at.date_naive();
            if date == today {
                earnings.today += record.doctor_earning;
            }
            if date.year() == today.year() && date.month() == today.month() {
                earnings.this_month += record.doctor_earning;
            }
        }
        Ok(earnings)
    }

    pub async fn clinic_revenue(
        &self,
        user: &AuthUser,
        clinic_id: Uuid,
    ) -> Result<ClinicRevenue, BillingError> {
        let clinic = self
            .store
            .get_clinic(clinic_id)
            .await
            .map_err(|_| BillingError::NotFound("Clinic not found".to_string()))?;
        if clinic.owner_id != user.id {
            return Err(BillingError::Forbidden(
                "Only the clinic owner can view clinic revenue".to_string(),
            ));
        }

        let records = self.store.revenue_for_clinic(clinic_id).await;
        let total_collected = records.iter().map(|r| r.total_fee).sum();
        let clinic_share = records.iter().map(|r| r.clinic_share).sum();
        Ok(ClinicRevenue {
            total_collected,
            clinic_share,
            records,
        })
    }
}
