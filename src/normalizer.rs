// 🔄 Normalizer - registry-shaped records → CanonicalRecord
//
// One mapping function per registry picks the first populated alias for
// each canonical field. `fill_defaults` then writes the placeholder into
// whatever is still missing, so a canonical record never has a hole.

use chrono::{DateTime, NaiveDate};
use tracing::{debug, warn};

use crate::criteria::present;
use crate::raw::{CersaiRecord, DlrRecord, DorisRecord, Mca21Record, RawEncumbrance, RawRecord};
use crate::record::{CanonicalRecord, Encumbrance, PropertyType, RecordDate, Source, NOT_AVAILABLE};

/// Hex digits of the content hash used in fallback ids
const FALLBACK_ID_HEX_LEN: usize = 12;

// ============================================================================
// DATES
// ============================================================================

/// Calendar formats tried in order. Slash dates are always day-first.
const DATE_FORMATS: &[&str] = &[
    "%d/%m/%Y", // 15/06/2022
    "%Y-%m-%d", // 2022-06-15
    "%d-%m-%Y", // 15-06-2022
    "%Y/%m/%d", // 2022/06/15
    "%d %B %Y", // 15 Jun 2022, 15 June 2022
    "%B %d, %Y", // June 15, 2022
    "%B %d %Y", // June 15 2022
];

/// chrono's `%Y` takes one to four digits, so the year width is checked up
/// front: exactly one four-digit run not starting with zero, and no longer run.
fn has_four_digit_year(value: &str) -> bool {
    let runs: Vec<&str> = value
        .split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
        .collect();
    runs.iter().all(|run| run.len() <= 4)
        && runs.iter().filter(|run| run.len() == 4 && !run.starts_with('0')).count() == 1
}

fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    if !has_four_digit_year(value) {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

/// Parse a registry date.
///
/// Blank input is `NotAvailable`; text that matches no known format is kept
/// verbatim as `Unparsed` and logged.
pub fn parse_date(raw: &str) -> RecordDate {
    let value = raw.trim();
    if value.is_empty() || value == NOT_AVAILABLE {
        return RecordDate::NotAvailable;
    }

    match parse_calendar_date(value) {
        Some(date) => RecordDate::Iso(date),
        None => {
            warn!(value = %raw, "could not parse date; keeping original text");
            RecordDate::Unparsed(raw.to_string())
        }
    }
}

/// Normalize a date string to `YYYY-MM-DD`, or return it unchanged when it
/// cannot be parsed.
pub fn normalize_date(raw: &str) -> String {
    match parse_date(raw) {
        RecordDate::NotAvailable => raw.to_string(),
        date => date.to_string(),
    }
}

fn date_field(value: Option<String>) -> Option<RecordDate> {
    value.map(|v| parse_date(&v)).filter(RecordDate::is_available)
}

// ============================================================================
// PARTIAL RECORD
// ============================================================================

/// Output of a per-registry mapping: canonical fields, any of which may be missing
#[derive(Debug, Default)]
struct PartialRecord {
    id: Option<String>,
    owner_name: Option<String>,
    address: Option<String>,
    property_type: Option<PropertyType>,
    area: Option<String>,
    market_value: Option<String>,
    registration_number: Option<String>,
    registration_date: Option<RecordDate>,
    registration_office: Option<String>,
    encumbrances: Option<Vec<Encumbrance>>,
    property_tax: Option<String>,
    last_transaction_date: Option<RecordDate>,
    document_type: Option<String>,
    execution_date: Option<RecordDate>,
    property_description: Option<String>,
}

/// First populated alias wins
fn first(candidates: &[&Option<String>]) -> Option<String> {
    candidates
        .iter()
        .find_map(|candidate| present(candidate))
        .map(str::to_string)
}

fn text_or_placeholder(value: Option<String>) -> String {
    value.unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn shape_encumbrance(kind: Option<String>, holder: Option<String>, amount: Option<String>, date: Option<String>) -> Encumbrance {
    Encumbrance {
        kind: text_or_placeholder(kind),
        holder: text_or_placeholder(holder),
        amount: text_or_placeholder(amount),
        date: date_field(date).unwrap_or_default(),
    }
}

fn listed_encumbrances(list: &Option<Vec<RawEncumbrance>>) -> Vec<Encumbrance> {
    list.iter()
        .flatten()
        .map(|e| {
            shape_encumbrance(
                first(&[&e.kind]),
                first(&[&e.holder]),
                first(&[&e.amount]),
                first(&[&e.date]),
            )
        })
        .collect()
}

// ============================================================================
// PER-REGISTRY MAPPINGS
// ============================================================================

fn from_doris(r: &DorisRecord) -> PartialRecord {
    PartialRecord {
        id: first(&[&r.property_id, &r.id]),
        owner_name: first(&[&r.owner_name, &r.owner]),
        address: first(&[&r.property_address, &r.address]),
        property_type: Some(PropertyType::Urban),
        area: first(&[&r.property_area, &r.area]),
        market_value: first(&[&r.market_value, &r.value]),
        registration_number: first(&[&r.reg_number, &r.registration_number]),
        registration_date: date_field(first(&[&r.reg_date, &r.registration_date])),
        registration_office: first(&[&r.reg_office, &r.registration_office]),
        encumbrances: Some(listed_encumbrances(&r.encumbrances)),
        property_tax: first(&[&r.property_tax]),
        last_transaction_date: date_field(first(&[&r.last_transaction_date])),
        document_type: first(&[&r.document_type]),
        execution_date: date_field(first(&[&r.execution_date])),
        property_description: first(&[&r.property_description, &r.description]),
    }
}

fn from_dlr(r: &DlrRecord) -> PartialRecord {
    PartialRecord {
        id: first(&[&r.land_id, &r.id]),
        owner_name: first(&[&r.owner_name, &r.khata_holder]),
        address: first(&[&r.land_address, &r.address]),
        property_type: Some(PropertyType::Rural),
        area: first(&[&r.land_area, &r.area]),
        market_value: first(&[&r.land_value, &r.value]),
        registration_number: first(&[&r.khasra_number, &r.survey_number, &r.registration_number]),
        registration_date: date_field(first(&[&r.registration_date])),
        registration_office: first(&[&r.tehsil, &r.registration_office]),
        encumbrances: Some(listed_encumbrances(&r.encumbrances)),
        property_tax: first(&[&r.land_revenue, &r.property_tax]),
        last_transaction_date: date_field(first(&[&r.last_mutation_date, &r.last_transaction_date])),
        document_type: first(&[&r.document_type]),
        execution_date: date_field(first(&[&r.execution_date])),
        property_description: first(&[&r.land_description, &r.description]),
    }
}

fn from_cersai(r: &CersaiRecord) -> PartialRecord {
    let agricultural = present(&r.asset_type)
        .map(|kind| kind.eq_ignore_ascii_case("agricultural"))
        .unwrap_or(false);

    PartialRecord {
        id: first(&[&r.asset_id, &r.id]),
        owner_name: first(&[&r.borrower_name, &r.owner_name]),
        address: first(&[&r.asset_address, &r.address]),
        property_type: Some(if agricultural { PropertyType::Rural } else { PropertyType::Urban }),
        area: first(&[&r.asset_area, &r.area]),
        market_value: first(&[&r.asset_value, &r.value]),
        registration_number: first(&[&r.security_interest_id, &r.registration_number]),
        registration_date: date_field(first(&[&r.registration_date])),
        registration_office: first(&[&r.filing_office, &r.registration_office]),
        encumbrances: Some(vec![shape_encumbrance(
            Some("Security Interest".to_string()),
            first(&[&r.secured_creditor_name]),
            first(&[&r.loan_amount]),
            first(&[&r.filing_date]),
        )]),
        property_tax: None,
        last_transaction_date: date_field(first(&[&r.last_transaction_date])),
        document_type: first(&[&r.security_type, &r.document_type]),
        execution_date: date_field(first(&[&r.execution_date])),
        property_description: first(&[&r.asset_description, &r.description]),
    }
}

fn from_mca21(r: &Mca21Record) -> PartialRecord {
    // An asset type outside urban/rural is kept as unknown rather than guessed
    let property_type = match present(&r.asset_type) {
        Some(label) => PropertyType::from_label(label).unwrap_or(PropertyType::Unknown),
        None => PropertyType::Urban,
    };

    PartialRecord {
        id: first(&[&r.company_id, &r.id]),
        owner_name: first(&[&r.company_name, &r.owner_name]),
        address: first(&[&r.asset_address, &r.registered_address, &r.address]),
        property_type: Some(property_type),
        area: first(&[&r.asset_area, &r.area]),
        market_value: first(&[&r.asset_value, &r.value]),
        registration_number: first(&[&r.charge_number, &r.registration_number, &r.cin]),
        registration_date: date_field(first(&[&r.charge_creation_date, &r.registration_date])),
        registration_office: first(&[&r.registrar_office, &r.registration_office]),
        encumbrances: Some(vec![shape_encumbrance(
            Some("Charge".to_string()),
            first(&[&r.charge_holder]),
            first(&[&r.charge_amount]),
            first(&[&r.charge_creation_date]),
        )]),
        property_tax: None,
        last_transaction_date: date_field(first(&[&r.last_modification_date, &r.last_transaction_date])),
        document_type: first(&[&r.charge_type, &r.document_type]),
        execution_date: date_field(first(&[&r.execution_date])),
        property_description: first(&[&r.asset_description, &r.description]),
    }
}

// ============================================================================
// IDENTITY & DEFAULTS
// ============================================================================

/// Source-namespaced id: the registry's own id when it has one (prefixed
/// with the registry code if it is not already), otherwise a content hash.
fn canonical_id(source: Source, raw_id: Option<String>, raw: &RawRecord) -> String {
    let prefix = format!("{}-", source.code());
    match raw_id {
        Some(id) if id.starts_with(&prefix) => id,
        Some(id) => format!("{}{}", prefix, id),
        None => {
            let fingerprint = raw.fingerprint();
            let short = fingerprint.get(..FALLBACK_ID_HEX_LEN).unwrap_or(&fingerprint);
            debug!(%source, id = %short, "record has no identifier; using content hash");
            format!("{}{}", prefix, short)
        }
    }
}

fn text(missing: &mut Vec<&'static str>, field: &'static str, value: Option<String>) -> String {
    value.unwrap_or_else(|| {
        missing.push(field);
        NOT_AVAILABLE.to_string()
    })
}

fn date(missing: &mut Vec<&'static str>, field: &'static str, value: Option<RecordDate>) -> RecordDate {
    value.unwrap_or_else(|| {
        missing.push(field);
        RecordDate::NotAvailable
    })
}

/// Write the documented default into every missing field
fn fill_defaults(source: Source, id: String, partial: PartialRecord) -> CanonicalRecord {
    let mut missing = Vec::new();

    let record = CanonicalRecord {
        source,
        owner_name: text(&mut missing, "ownerName", partial.owner_name),
        address: text(&mut missing, "address", partial.address),
        property_type: partial.property_type.unwrap_or_default(),
        area: text(&mut missing, "area", partial.area),
        market_value: text(&mut missing, "marketValue", partial.market_value),
        registration_number: text(&mut missing, "registrationNumber", partial.registration_number),
        registration_date: date(&mut missing, "registrationDate", partial.registration_date),
        registration_office: text(&mut missing, "registrationOffice", partial.registration_office),
        encumbrances: partial.encumbrances.unwrap_or_default(),
        property_tax: text(&mut missing, "propertyTax", partial.property_tax),
        last_transaction_date: date(&mut missing, "lastTransactionDate", partial.last_transaction_date),
        document_type: text(&mut missing, "documentType", partial.document_type),
        execution_date: date(&mut missing, "executionDate", partial.execution_date),
        property_description: text(&mut missing, "propertyDescription", partial.property_description),
        id,
    };

    if !missing.is_empty() {
        debug!(id = %record.id, fields = ?missing, "filled missing fields with placeholder");
    }

    record
}

// ============================================================================
// ENTRY POINT
// ============================================================================

/// Map one raw registry record into the unified schema. Total: every input
/// produces a fully populated record.
pub fn normalize(raw: &RawRecord) -> CanonicalRecord {
    let source = raw.source();
    let mut partial = match raw {
        RawRecord::Doris(r) => from_doris(r),
        RawRecord::Dlr(r) => from_dlr(r),
        RawRecord::Cersai(r) => from_cersai(r),
        RawRecord::Mca21(r) => from_mca21(r),
    };

    let id = canonical_id(source, partial.id.take(), raw);
    fill_defaults(source, id, partial)
}

/// Normalize a batch, preserving order
pub fn normalize_all(raws: &[RawRecord]) -> Vec<CanonicalRecord> {
    raws.iter().map(normalize).collect()
}

// ============================================================================
// TESTS
// ============================================================================
