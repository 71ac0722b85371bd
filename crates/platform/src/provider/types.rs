//! Wire shapes for the Provider API.
//!
//! The Provider's schema is not contractually stable: deserialization is
//! deliberately lenient. Unknown fields are ignored, and optional fields the
//! Provider sometimes omits get defaults (`strain_type` -> `HYBRID`,
//! `price` -> 0) instead of failing the whole response.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use herba_core::{ClientId, Email, OrderId, OrderStatus, StrainId, StrainType};

/// A catalog entry (strain) from the Provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Strain {
    pub id: StrainId,
    pub name: String,
    #[serde(default)]
    pub strain_type: StrainType,
    /// Price per gram; the Provider omits it for unlisted items.
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub thc_percent: Option<Decimal>,
    #[serde(default)]
    pub cbd_percent: Option<Decimal>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A patient's cart as the Provider reports it.
///
/// There is no local cart row; this is the authoritative view, materialized
/// per call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub total: Decimal,
}

/// A single cart line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub strain_id: StrainId,
    #[serde(default)]
    pub name: String,
    pub quantity: u32,
    pub size_grams: u32,
    #[serde(default)]
    pub price: Decimal,
}

/// Patient registration payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPatient {
    pub personal: PersonalDetails,
    pub address: Address,
    pub medical_record: MedicalRecord,
}

/// Personal details for patient registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    /// ISO 8601 date (YYYY-MM-DD).
    pub date_of_birth: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Postal address for patient registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country_code: String,
}

/// Medical history submitted at onboarding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicalRecord {
    pub condition: String,
    #[serde(default)]
    pub previous_treatments: Option<String>,
    pub consent: bool,
}

/// Result of registering a patient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientRegistration {
    pub client_id: ClientId,
    /// Link the patient must visit to complete identity verification.
    pub kyc_link: String,
}

/// The Provider's authoritative view of an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteOrder {
    pub id: OrderId,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub items: Vec<CartItem>,
}

/// Structured error body the Provider attaches to non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderErrorBody {
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
