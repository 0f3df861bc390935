//! Seed helpers shared by the cells' integration tests.

use chrono::Utc;
use uuid::Uuid;

use shared_models::auth::{AuthUser, Role};
use shared_models::records::{Affiliation, ApprovalStatus, Clinic, Doctor, Patient};
use shared_store::ClinicStore;

pub fn auth_user(role: Role, full_name: &str) -> AuthUser {
    AuthUser {
        id: Uuid::new_v4(),
        full_name: full_name.to_string(),
        role,
    }
}

pub struct SeededClinic {
    pub owner: AuthUser,
    pub clinic: Clinic,
    pub doctor_user: AuthUser,
    pub doctor: Doctor,
    pub patient_user: AuthUser,
    pub patient: Patient,
}

/// One clinic, one approved doctor, one registered patient. Covers the
/// preconditions most operations assume.
pub async fn seed_clinic(store: &ClinicStore) -> SeededClinic {
    let owner = auth_user(Role::ClinicOwner, "Meera Pillai");
    let clinic = store
        .insert_clinic(Clinic {
            id: Uuid::new_v4(),
            owner_id: owner.id,
            name: "Lakeside Family Clinic".to_string(),
            address: "14 Lake Road".to_string(),
        })
        .await;

    let doctor_user = auth_user(Role::Doctor, "Dr. Asha Rao");
    let doctor = store
        .insert_doctor(Doctor {
            id: Uuid::new_v4(),
            user_id: doctor_user.id,
            full_name: doctor_user.full_name.clone(),
            fee: 500.0,
            is_verified: true,
        })
        .await;

    let _ = store
        .insert_affiliation(Affiliation {
            id: Uuid::new_v4(),
            doctor_id: doctor.id,
            clinic_id: clinic.id,
            status: ApprovalStatus::Approved,
            created_at: Utc::now(),
        })
        .await;

    let patient_user = auth_user(Role::Patient, "Ravi Menon");
    let patient = store
        .insert_patient(Patient {
            id: patient_user.id,
            full_name: patient_user.full_name.clone(),
            email: "ravi@example.com".to_string(),
        })
        .await;

    SeededClinic {
        owner,
        clinic,
        doctor_user,
        doctor,
        patient_user,
        patient,
    }
}
