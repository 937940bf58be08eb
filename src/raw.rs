// 📥 Raw Records - each registry's native record shape
//
// Every registry names its fields differently (propertyId / landId /
// assetId / companyId ...) and older feeds use generic aliases (id,
// address, registrationNumber). Both spellings are kept as separate
// optional fields; the normalizer decides which one wins.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::record::Source;

// ============================================================================
// SHARED PIECES
// ============================================================================

/// Encumbrance entry as DORIS and DLR expose it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawEncumbrance {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub holder: Option<String>,
    pub amount: Option<String>,
    pub date: Option<String>,
}

/// Company director (MCA21)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Director {
    pub name: Option<String>,
    pub din: Option<String>,
    pub designation: Option<String>,
}

/// Property held by a company (MCA21)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertyAsset {
    pub property_id: Option<String>,
    pub property_address: Option<String>,
    pub property_type: Option<String>,
    pub area: Option<String>,
    pub acquisition_date: Option<String>,
    pub acquisition_value: Option<String>,
}

// ============================================================================
// DORIS - urban registration
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DorisRecord {
    pub property_id: Option<String>,
    pub id: Option<String>,
    pub owner_name: Option<String>,
    pub owner: Option<String>,
    pub property_address: Option<String>,
    pub address: Option<String>,
    pub property_area: Option<String>,
    pub area: Option<String>,
    pub market_value: Option<String>,
    pub value: Option<String>,
    pub reg_number: Option<String>,
    pub registration_number: Option<String>,
    pub reg_date: Option<String>,
    pub registration_date: Option<String>,
    pub reg_office: Option<String>,
    pub registration_office: Option<String>,
    pub property_type: Option<String>,
    pub encumbrances: Option<Vec<RawEncumbrance>>,
    pub property_tax: Option<String>,
    pub last_transaction_date: Option<String>,
    pub document_type: Option<String>,
    pub execution_date: Option<String>,
    pub property_description: Option<String>,
    pub description: Option<String>,
}

// ============================================================================
// DLR - rural land records
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DlrRecord {
    pub land_id: Option<String>,
    pub id: Option<String>,
    pub owner_name: Option<String>,
    pub khata_holder: Option<String>,
    pub land_address: Option<String>,
    pub address: Option<String>,
    pub land_area: Option<String>,
    pub area: Option<String>,
    pub land_value: Option<String>,
    pub value: Option<String>,
    pub khasra_number: Option<String>,
    pub survey_number: Option<String>,
    pub registration_number: Option<String>,
    pub registration_date: Option<String>,
    pub tehsil: Option<String>,
    pub registration_office: Option<String>,
    pub property_type: Option<String>,
    pub land_use: Option<String>,
    pub encumbrances: Option<Vec<RawEncumbrance>>,
    pub land_revenue: Option<String>,
    pub property_tax: Option<String>,
    pub last_mutation_date: Option<String>,
    pub last_transaction_date: Option<String>,
    pub document_type: Option<String>,
    pub execution_date: Option<String>,
    pub land_description: Option<String>,
    pub description: Option<String>,
}

// ============================================================================
// CERSAI - security-interest filings
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CersaiRecord {
    pub asset_id: Option<String>,
    pub id: Option<String>,
    pub borrower_name: Option<String>,
    pub owner_name: Option<String>,
    pub asset_address: Option<String>,
    pub address: Option<String>,
    pub asset_area: Option<String>,
    pub area: Option<String>,
    pub asset_value: Option<String>,
    pub value: Option<String>,
    pub security_interest_id: Option<String>,
    pub registration_number: Option<String>,
    pub registration_date: Option<String>,
    pub filing_office: Option<String>,
    pub registration_office: Option<String>,
    pub secured_creditor_name: Option<String>,
    pub loan_amount: Option<String>,
    pub filing_date: Option<String>,
    pub security_type: Option<String>,
    pub document_type: Option<String>,
    pub last_transaction_date: Option<String>,
    pub execution_date: Option<String>,
    pub asset_description: Option<String>,
    pub description: Option<String>,
    /// "agricultural", "residential", "commercial", ...
    pub asset_type: Option<String>,
}

// ============================================================================
// MCA21 - corporate-asset filings
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Mca21Record {
    pub company_id: Option<String>,
    pub id: Option<String>,
    pub company_name: Option<String>,
    pub owner_name: Option<String>,
    pub asset_address: Option<String>,
    pub registered_address: Option<String>,
    pub address: Option<String>,
    pub asset_area: Option<String>,
    pub area: Option<String>,
    pub asset_value: Option<String>,
    pub value: Option<String>,
    pub charge_number: Option<String>,
    pub cin: Option<String>,
    pub registration_number: Option<String>,
    pub charge_creation_date: Option<String>,
    pub registration_date: Option<String>,
    pub registrar_office: Option<String>,
    pub registration_office: Option<String>,
    pub charge_holder: Option<String>,
    pub charge_amount: Option<String>,
    pub charge_type: Option<String>,
    pub document_type: Option<String>,
    pub last_modification_date: Option<String>,
    pub last_transaction_date: Option<String>,
    pub execution_date: Option<String>,
    pub asset_description: Option<String>,
    pub description: Option<String>,
    pub asset_type: Option<String>,
    pub directors: Vec<Director>,
    pub property_assets: Vec<PropertyAsset>,
}

// ============================================================================
// RAW RECORD (tagged by registry)
// ============================================================================

/// RawRecord - a registry record tagged with the registry it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "UPPERCASE")]
pub enum RawRecord {
    Doris(DorisRecord),
    Dlr(DlrRecord),
    Cersai(CersaiRecord),
    Mca21(Mca21Record),
}

impl RawRecord {
    pub fn source(&self) -> Source {
        match self {
            RawRecord::Doris(_) => Source::Doris,
            RawRecord::Dlr(_) => Source::Dlr,
            RawRecord::Cersai(_) => Source::Cersai,
            RawRecord::Mca21(_) => Source::Mca21,
        }
    }

    /// Content hash (SHA-256, hex) of the record's JSON form.
    ///
    /// Identical records hash identically, so an id derived from it is
    /// stable across searches.
    pub fn fingerprint(&self) -> String {
        let bytes = serde_json::to_vec(self).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        format!("{:x}", hasher.finalize())
    }
}

impl From<DorisRecord> for RawRecord {
    fn from(record: DorisRecord) -> Self {
        RawRecord::Doris(record)
    }
}

impl From<DlrRecord> for RawRecord {
    fn from(record: DlrRecord) -> Self {
        RawRecord::Dlr(record)
    }
}

impl From<CersaiRecord> for RawRecord {
    fn from(record: CersaiRecord) -> Self {
        RawRecord::Cersai(record)
    }
}

impl From<Mca21Record> for RawRecord {
    fn from(record: Mca21Record) -> Self {
        RawRecord::Mca21(record)
    }
}

// ============================================================================
// TESTS
// ============================================================================
