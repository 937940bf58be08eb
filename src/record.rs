// 🏠 Canonical Record - the unified schema every registry maps into
// One fixed-field struct, merged by id, never partially populated

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::UnknownSource;

/// Placeholder written into every string or date field a registry did not provide
pub const NOT_AVAILABLE: &str = "Not available";

// ============================================================================
// SOURCE
// ============================================================================

/// Source - the registry a record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Source {
    Doris,
    Dlr,
    Cersai,
    Mca21,
}

impl Source {
    /// Every registry, in declaration order
    pub const ALL: [Source; 4] = [Source::Doris, Source::Dlr, Source::Cersai, Source::Mca21];

    /// Human-readable name for display
    pub fn name(&self) -> &str {
        match self {
            Source::Doris => "Digital Online Registration Information System",
            Source::Dlr => "Digital Land Records",
            Source::Cersai => "Central Registry of Securitisation Asset Reconstruction and Security Interest",
            Source::Mca21 => "Ministry of Corporate Affairs (MCA21)",
        }
    }

    /// Short code, also the id namespace and the serialized form
    pub fn code(&self) -> &str {
        match self {
            Source::Doris => "DORIS",
            Source::Dlr => "DLR",
            Source::Cersai => "CERSAI",
            Source::Mca21 => "MCA21",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Source {
    type Err = UnknownSource;

    /// Registry names are matched case-insensitively ("doris", "Doris", "DORIS")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Source::ALL
            .into_iter()
            .find(|source| source.code().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownSource(trimmed.to_string()))
    }
}

// ============================================================================
// PROPERTY TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Urban,
    Rural,
    #[default]
    Unknown,
}

impl PropertyType {
    pub fn as_str(&self) -> &str {
        match self {
            PropertyType::Urban => "urban",
            PropertyType::Rural => "rural",
            PropertyType::Unknown => "unknown",
        }
    }

    /// Parse a registry label; anything other than urban/rural is None
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.eq_ignore_ascii_case("urban") {
            Some(PropertyType::Urban)
        } else if label.eq_ignore_ascii_case("rural") {
            Some(PropertyType::Rural)
        } else {
            None
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// RECORD DATE
// ============================================================================

/// RecordDate - a calendar date, or the registry's original text when it
/// could not be parsed, or the placeholder when the registry had none.
///
/// Serialized as a plain string: `"2022-06-15"`, the original text, or
/// `"Not available"`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordDate {
    Iso(NaiveDate),
    Unparsed(String),
    #[default]
    NotAvailable,
}

impl RecordDate {
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            RecordDate::Iso(date) => Some(*date),
            _ => None,
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, RecordDate::NotAvailable)
    }
}

impl From<String> for RecordDate {
    fn from(value: String) -> Self {
        if value == NOT_AVAILABLE {
            return RecordDate::NotAvailable;
        }
        match NaiveDate::parse_from_str(&value, "%Y-%m-%d") {
            Ok(date) => RecordDate::Iso(date),
            Err(_) => RecordDate::Unparsed(value),
        }
    }
}

impl From<RecordDate> for String {
    fn from(value: RecordDate) -> Self {
        value.to_string()
    }
}

impl fmt::Display for RecordDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordDate::Iso(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            RecordDate::Unparsed(raw) => f.write_str(raw),
            RecordDate::NotAvailable => f.write_str(NOT_AVAILABLE),
        }
    }
}

// ============================================================================
// ENCUMBRANCE
// ============================================================================

/// A lien, mortgage, security interest or charge recorded against a property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encumbrance {
    #[serde(rename = "type")]
    pub kind: String,
    pub holder: String,
    pub amount: String,
    pub date: RecordDate,
}

// ============================================================================
// CANONICAL RECORD
// ============================================================================

/// CanonicalRecord - one property as seen by one registry, in unified form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalRecord {
    /// Source-namespaced identity, e.g. "DORIS-12345"
    pub id: String,
    pub source: Source,
    pub owner_name: String,
    pub address: String,
    pub property_type: PropertyType,
    pub area: String,
    pub market_value: String,
    pub registration_number: String,
    pub registration_date: RecordDate,
    pub registration_office: String,
    pub encumbrances: Vec<Encumbrance>,
    pub property_tax: String,
    pub last_transaction_date: RecordDate,
    pub document_type: String,
    pub execution_date: RecordDate,
    pub property_description: String,
}

impl CanonicalRecord {
    /// Overwrite every field with the incoming record's value.
    ///
    /// The destructuring is exhaustive on purpose: adding a field to the
    /// struct without deciding how it merges is a compile error.
    pub fn merge_from(&mut self, incoming: CanonicalRecord) {
        let CanonicalRecord {
            id: _,
            source,
            owner_name,
            address,
            property_type,
            area,
            market_value,
            registration_number,
            registration_date,
            registration_office,
            encumbrances,
            property_tax,
            last_transaction_date,
            document_type,
            execution_date,
            property_description,
        } = incoming;

        self.source = source;
        self.owner_name = owner_name;
        self.address = address;
        self.property_type = property_type;
        self.area = area;
        self.market_value = market_value;
        self.registration_number = registration_number;
        self.registration_date = registration_date;
        self.registration_office = registration_office;
        self.encumbrances = encumbrances;
        self.property_tax = property_tax;
        self.last_transaction_date = last_transaction_date;
        self.document_type = document_type;
        self.execution_date = execution_date;
        self.property_description = property_description;
    }

    /// String value of a scalar field by its serialized (camelCase) name.
    ///
    /// Returns None for unknown names and for `encumbrances`, which has no
    /// scalar form.
    pub fn field_value(&self, key: &str) -> Option<String> {
        let value = match key {
            "id" => self.id.clone(),
            "source" => self.source.code().to_string(),
            "ownerName" => self.owner_name.clone(),
            "address" => self.address.clone(),
            "propertyType" => self.property_type.as_str().to_string(),
            "area" => self.area.clone(),
            "marketValue" => self.market_value.clone(),
            "registrationNumber" => self.registration_number.clone(),
            "registrationDate" => self.registration_date.to_string(),
            "registrationOffice" => self.registration_office.clone(),
            "propertyTax" => self.property_tax.clone(),
            "lastTransactionDate" => self.last_transaction_date.to_string(),
            "documentType" => self.document_type.clone(),
            "executionDate" => self.execution_date.to_string(),
            "propertyDescription" => self.property_description.clone(),
            _ => return None,
        };
        Some(value)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record(id: &str, owner: &str) -> CanonicalRecord {
        CanonicalRecord {
            id: id.to_string(),
            source: Source::Doris,
            owner_name: owner.to_string(),
            address: "123 MG Road, Bangalore".to_string(),
            property_type: PropertyType::Urban,
            area: "1200 sq ft".to_string(),
            market_value: NOT_AVAILABLE.to_string(),
            registration_number: "REG123456".to_string(),
            registration_date: RecordDate::Iso(NaiveDate::from_ymd_opt(2022, 6, 1).unwrap()),
            registration_office: NOT_AVAILABLE.to_string(),
            encumbrances: vec![],
            property_tax: NOT_AVAILABLE.to_string(),
            last_transaction_date: RecordDate::NotAvailable,
            document_type: "Sale Deed".to_string(),
            execution_date: RecordDate::Unparsed("sometime in 2021".to_string()),
            property_description: NOT_AVAILABLE.to_string(),
        }
    }

    #[test]
    fn test_source_codes_and_parsing() {
        assert_eq!(Source::Doris.code(), "DORIS");
        assert_eq!(Source::Mca21.code(), "MCA21");
        assert_eq!("doris".parse::<Source>().unwrap(), Source::Doris);
        assert_eq!(" Cersai ".parse::<Source>().unwrap(), Source::Cersai);
        assert_eq!("mca21".parse::<Source>().unwrap(), Source::Mca21);
        assert!("land-registry".parse::<Source>().is_err());
    }

    #[test]
    fn test_source_serializes_as_code() {
        let json = serde_json::to_string(&Source::Mca21).unwrap();
        assert_eq!(json, "\"MCA21\"");
        let back: Source = serde_json::from_str("\"DLR\"").unwrap();
        assert_eq!(back, Source::Dlr);
    }

    #[test]
    fn test_property_type_labels() {
        assert_eq!(PropertyType::from_label("URBAN"), Some(PropertyType::Urban));
        assert_eq!(PropertyType::from_label("rural"), Some(PropertyType::Rural));
        assert_eq!(PropertyType::from_label("commercial"), None);
        assert_eq!(PropertyType::default(), PropertyType::Unknown);
    }

    #[test]
    fn test_record_date_string_forms() {
        let iso = RecordDate::from("2022-06-15".to_string());
        assert_eq!(iso.as_date(), NaiveDate::from_ymd_opt(2022, 6, 15));
        assert_eq!(iso.to_string(), "2022-06-15");

        let missing = RecordDate::from(NOT_AVAILABLE.to_string());
        assert_eq!(missing, RecordDate::NotAvailable);
        assert!(!missing.is_available());

        let raw = RecordDate::from("Q3 2021".to_string());
        assert_eq!(raw, RecordDate::Unparsed("Q3 2021".to_string()));
        assert_eq!(raw.to_string(), "Q3 2021");
    }

    #[test]
    fn test_canonical_record_json_uses_camel_case_keys() {
        let record = sample_record("DORIS-12345", "Rajesh Kumar");
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["ownerName"], "Rajesh Kumar");
        assert_eq!(json["propertyType"], "urban");
        assert_eq!(json["registrationDate"], "2022-06-01");
        assert_eq!(json["lastTransactionDate"], NOT_AVAILABLE);
        assert_eq!(json["executionDate"], "sometime in 2021");
        assert_eq!(json["source"], "DORIS");

        let back: CanonicalRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_merge_from_replaces_fields_but_keeps_id() {
        let mut stored = sample_record("DORIS-12345", "Rajesh Kumar");
        let mut incoming = sample_record("DORIS-12345", "Rajesh K. Kumar");
        incoming.encumbrances.push(Encumbrance {
            kind: "Mortgage".to_string(),
            holder: "HDFC Bank Ltd.".to_string(),
            amount: "₹ 50,00,000".to_string(),
            date: RecordDate::NotAvailable,
        });

        stored.merge_from(incoming.clone());

        assert_eq!(stored, incoming);
    }

    #[test]
    fn test_field_value_lookup() {
        let record = sample_record("DORIS-12345", "Rajesh Kumar");
        assert_eq!(record.field_value("source").as_deref(), Some("DORIS"));
        assert_eq!(record.field_value("propertyType").as_deref(), Some("urban"));
        assert_eq!(record.field_value("registrationDate").as_deref(), Some("2022-06-01"));
        assert_eq!(record.field_value("encumbrances"), None);
        assert_eq!(record.field_value("state"), None);
    }
}
