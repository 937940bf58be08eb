// 🗂️ Registry Fixtures - the simulated datasets behind each connector
//
// Connectors never reach a real registry. Each one is handed an immutable
// dataset at construction; the built-in set below mirrors what the
// registries return, and a JSON file can replace it wholesale.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::raw::{CersaiRecord, Director, DlrRecord, DorisRecord, Mca21Record, PropertyAsset, RawEncumbrance};

/// One dataset per registry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryFixtures {
    pub doris: Vec<DorisRecord>,
    pub dlr: Vec<DlrRecord>,
    pub cersai: Vec<CersaiRecord>,
    pub mca21: Vec<Mca21Record>,
}

fn s(value: &str) -> Option<String> {
    Some(value.to_string())
}

fn encumbrance(kind: &str, holder: &str, amount: &str, date: &str) -> RawEncumbrance {
    RawEncumbrance {
        kind: s(kind),
        holder: s(holder),
        amount: s(amount),
        date: s(date),
    }
}

fn director(name: &str, din: &str, designation: &str) -> Director {
    Director {
        name: s(name),
        din: s(din),
        designation: s(designation),
    }
}

impl RegistryFixtures {
    /// Load datasets from a JSON file shaped `{"doris": [...], "dlr": [...], ...}`.
    /// Registries missing from the file get an empty dataset.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixtures file: {}", path.display()))?;
        let fixtures: RegistryFixtures = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse fixtures JSON from {}", path.display()))?;
        Ok(fixtures)
    }

    /// Total number of records across all registries
    pub fn len(&self) -> usize {
        self.doris.len() + self.dlr.len() + self.cersai.len() + self.mca21.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Built-in datasets.
    ///
    /// Some records use each registry's native field names, others the
    /// generic aliases older feeds emit; both shapes occur in practice.
    pub fn builtin() -> Self {
        RegistryFixtures {
            doris: builtin_doris(),
            dlr: builtin_dlr(),
            cersai: builtin_cersai(),
            mca21: builtin_mca21(),
        }
    }
}

// ============================================================================
// DORIS
// ============================================================================

fn builtin_doris() -> Vec<DorisRecord> {
    vec![
        DorisRecord {
            property_id: s("DORIS-001"),
            owner_name: s("Rahul Sharma"),
            property_address: s("123 MG Road, Bangalore, Karnataka"),
            property_area: s("1200 sq ft"),
            market_value: s("₹85,00,000"),
            reg_number: s("BLR-REG-2022-12345"),
            reg_date: s("15/06/2022"),
            reg_office: s("Bangalore South Sub-Registrar Office"),
            encumbrances: Some(vec![encumbrance(
                "Mortgage",
                "State Bank of India",
                "₹50,00,000",
                "20/06/2022",
            )]),
            property_tax: s("₹15,000 per annum"),
            last_transaction_date: s("15/06/2022"),
            document_type: s("Sale Deed"),
            execution_date: s("10/06/2022"),
            property_description: s("Residential apartment on 3rd floor"),
            ..Default::default()
        },
        DorisRecord {
            property_id: s("DORIS-002"),
            owner_name: s("Priya Patel"),
            property_address: s("45 Nehru Place, Delhi"),
            property_area: s("1800 sq ft"),
            market_value: s("₹1,25,00,000"),
            reg_number: s("DEL-REG-2021-78901"),
            reg_date: s("03/11/2021"),
            reg_office: s("Delhi South Sub-Registrar Office"),
            encumbrances: Some(vec![]),
            property_tax: s("₹22,000 per annum"),
            last_transaction_date: s("03/11/2021"),
            document_type: s("Sale Deed"),
            execution_date: s("25/10/2021"),
            property_description: s("Commercial shop in market complex"),
            ..Default::default()
        },
        DorisRecord {
            id: s("DORIS-12345"),
            owner_name: s("Rajesh Kumar"),
            address: s("123 MG Road, Bangalore"),
            registration_number: s("REG123456"),
            registration_date: s("2022-06-01"),
            property_type: s("urban"),
            area: s("1200 sq ft"),
            market_value: s("₹ 75,00,000"),
            encumbrances: Some(vec![encumbrance(
                "Mortgage",
                "HDFC Bank Ltd.",
                "₹ 50,00,000",
                "2022-06-01",
            )]),
            property_tax: s("₹ 15,000 per annum"),
            last_transaction_date: s("2022-06-01"),
            ..Default::default()
        },
        DorisRecord {
            id: s("DORIS-67890"),
            owner_name: s("Priya Singh"),
            address: s("456 Church Street, Bangalore"),
            registration_number: s("REG789012"),
            registration_date: s("2021-12-10"),
            property_type: s("urban"),
            area: s("1800 sq ft"),
            market_value: s("₹ 1,20,00,000"),
            encumbrances: Some(vec![encumbrance(
                "Mortgage",
                "ICICI Bank Ltd.",
                "₹ 80,00,000",
                "2021-12-10",
            )]),
            property_tax: s("₹ 24,000 per annum"),
            last_transaction_date: s("2021-12-10"),
            ..Default::default()
        },
        DorisRecord {
            id: s("DORIS-24680"),
            owner_name: s("Suresh Patel"),
            address: s("Plot 45, Sector 12, Gandhinagar, Gujarat"),
            registration_number: s("REG345678"),
            registration_date: s("2022-03-20"),
            property_type: s("urban"),
            area: s("2500 sq ft"),
            market_value: s("₹ 1,25,00,000"),
            encumbrances: Some(vec![]),
            property_tax: s("₹ 25,000 per annum"),
            last_transaction_date: s("2022-03-20"),
            ..Default::default()
        },
    ]
}

// ============================================================================
// DLR
// ============================================================================

fn builtin_dlr() -> Vec<DlrRecord> {
    vec![
        DlrRecord {
            land_id: s("DLR-001"),
            khata_holder: s("Ramesh Kumar"),
            land_address: s("Survey No. 123, Village Hoskote, Bangalore Rural, Karnataka"),
            land_area: s("2 acres"),
            land_value: s("₹1,20,00,000"),
            khasra_number: s("KA-BLR-123-456-789"),
            registration_date: s("2021-08-15"),
            tehsil: s("Hoskote Tehsil Office"),
            encumbrances: Some(vec![encumbrance(
                "Agricultural Loan",
                "Karnataka Gramin Bank",
                "₹15,00,000",
                "2021-09-10",
            )]),
            land_revenue: s("₹5,000 per annum"),
            last_mutation_date: s("2021-08-20"),
            document_type: s("Inheritance"),
            land_description: s("Agricultural land with water source"),
            ..Default::default()
        },
        DlrRecord {
            land_id: s("DLR-002"),
            khata_holder: s("Suresh Singh"),
            land_address: s("Khasra No. 456, Village Manesar, Gurgaon, Haryana"),
            land_area: s("5 acres"),
            land_value: s("₹5,50,00,000"),
            khasra_number: s("HR-GGN-456-789-012"),
            registration_date: s("2020-05-22"),
            tehsil: s("Manesar Tehsil Office"),
            encumbrances: Some(vec![]),
            land_revenue: s("₹12,000 per annum"),
            last_mutation_date: s("2020-06-15"),
            document_type: s("Sale Deed"),
            land_description: s("Agricultural land converted for commercial use"),
            ..Default::default()
        },
        DlrRecord {
            id: s("DLR-12345"),
            owner_name: s("Rajesh Kumar"),
            address: s("Haripur Village, Dehradun, Uttarakhand"),
            survey_number: s("KH123"),
            land_area: s("2.5 hectares"),
            land_use: s("Agricultural"),
            value: s("₹ 85,00,000"),
            last_transaction_date: s("30/11/2021"),
            property_type: s("rural"),
            encumbrances: Some(vec![encumbrance(
                "Lien",
                "Agricultural Development Bank",
                "₹ 20,00,000",
                "2022-01-15",
            )]),
            description: s("Irrigated alluvial land, canal irrigation"),
            ..Default::default()
        },
        DlrRecord {
            id: s("DLR-24680"),
            owner_name: s("Meena Kumari"),
            address: s("Rampur Village, Jaipur, Rajasthan"),
            survey_number: s("KH789"),
            land_area: s("1.8 hectares"),
            land_use: s("Agricultural"),
            value: s("₹ 65,00,000"),
            last_transaction_date: s("20/05/2022"),
            property_type: s("rural"),
            encumbrances: Some(vec![encumbrance(
                "Mortgage",
                "Gramin Bank",
                "₹ 15,00,000",
                "2022-06-10",
            )]),
            description: s("Partially irrigated red soil, well water"),
            ..Default::default()
        },
    ]
}

// ============================================================================
// CERSAI
// ============================================================================

fn builtin_cersai() -> Vec<CersaiRecord> {
    vec![
        CersaiRecord {
            asset_id: s("CERSAI-001"),
            borrower_name: s("Aditya Waghmare"),
            asset_address: s("Flat 301, Sunshine Apartments, Baner Road, Pune, Maharashtra"),
            asset_area: s("1500 sq ft"),
            asset_value: s("₹95,00,000"),
            security_interest_id: s("SI-PUN-2022-56789"),
            registration_date: s("12/04/2022"),
            filing_office: s("Pune CERSAI Registry Office"),
            secured_creditor_name: s("HDFC Bank Ltd."),
            loan_amount: s("₹65,00,000"),
            filing_date: s("15/04/2022"),
            security_type: s("Mortgage"),
            execution_date: s("10/04/2022"),
            asset_description: s("Residential apartment on 3rd floor with parking"),
            asset_type: s("residential"),
            ..Default::default()
        },
        CersaiRecord {
            asset_id: s("CERSAI-002"),
            borrower_name: s("Sunrise Properties Pvt Ltd"),
            asset_address: s("Plot 78, Industrial Area Phase II, Chandigarh"),
            asset_area: s("5000 sq ft"),
            asset_value: s("₹2,50,00,000"),
            security_interest_id: s("SI-CHD-2021-34567"),
            registration_date: s("22/09/2021"),
            filing_office: s("Chandigarh CERSAI Registry Office"),
            secured_creditor_name: s("State Bank of India"),
            loan_amount: s("₹1,80,00,000"),
            filing_date: s("25/09/2021"),
            security_type: s("Hypothecation"),
            execution_date: s("20/09/2021"),
            asset_description: s("Commercial property with warehouse facilities"),
            asset_type: s("commercial"),
            ..Default::default()
        },
        CersaiRecord {
            asset_id: s("CERSAI-003"),
            borrower_name: s("Ramesh Agarwal"),
            asset_address: s("Survey No. 45, Hoskote Village, Bangalore Rural, Karnataka"),
            asset_area: s("3 acres"),
            asset_value: s("₹1,20,00,000"),
            security_interest_id: s("SI-BLR-2022-78901"),
            registration_date: s("05/02/2022"),
            filing_office: s("Bangalore Rural CERSAI Registry Office"),
            secured_creditor_name: s("Karnataka Bank Ltd."),
            loan_amount: s("₹75,00,000"),
            filing_date: s("08/02/2022"),
            security_type: s("Mortgage"),
            execution_date: s("01/02/2022"),
            asset_description: s("Agricultural land with borewells and farm house"),
            asset_type: s("agricultural"),
            ..Default::default()
        },
        CersaiRecord {
            id: s("CERSAI-24680"),
            owner_name: s("Suresh Patel"),
            address: s("Plot 45, Sector 12, Gandhinagar, Gujarat"),
            area: s("2500 sq ft"),
            value: s("₹ 1,25,00,000"),
            registration_number: s("SI-GNR-2022-24680"),
            registration_date: s("2022-03-20"),
            secured_creditor_name: s("State Bank of India"),
            loan_amount: s("₹ 90,00,000"),
            filing_date: s("2022-03-20"),
            document_type: s("Mortgage"),
            execution_date: s("Mar 2022"),
            asset_type: s("residential"),
            ..Default::default()
        },
    ]
}

// ============================================================================
// MCA21
// ============================================================================

fn builtin_mca21() -> Vec<Mca21Record> {
    vec![
        Mca21Record {
            company_id: s("MCA21-001"),
            company_name: s("TechSolutions Pvt Ltd"),
            registered_address: s("Plot 45, Tech Park, Electronic City, Bangalore, Karnataka"),
            cin: s("U72200KA2015PTC081234"),
            registration_date: s("12/08/2015"),
            registrar_office: s("Registrar of Companies, Bangalore"),
            directors: vec![
                director("Rahul Sharma", "01234567", "Managing Director"),
                director("Priya Patel", "07654321", "Director"),
            ],
            property_assets: vec![PropertyAsset {
                property_id: s("PROP-BLR-001"),
                property_address: s("Plot 45, Tech Park, Electronic City, Bangalore, Karnataka"),
                property_type: s("Commercial Office"),
                area: s("5000 sq ft"),
                acquisition_date: s("15/10/2016"),
                acquisition_value: s("₹3,50,00,000"),
            }],
            area: s("5000 sq ft"),
            asset_value: s("₹3,50,00,000"),
            description: s("Commercial office in technology park"),
            ..Default::default()
        },
        Mca21Record {
            company_id: s("MCA21-002"),
            company_name: s("GreenEnergy Solutions Ltd"),
            registered_address: s("Tower B, 5th Floor, Cyber City, Gurugram, Haryana"),
            cin: s("L40300HR2010PLC045678"),
            registration_date: s("05/03/2010"),
            registrar_office: s("Registrar of Companies, Delhi"),
            directors: vec![
                director("Vikram Singh", "02345678", "Chairman"),
                director("Neha Gupta", "08765432", "Managing Director"),
            ],
            property_assets: vec![
                PropertyAsset {
                    property_id: s("PROP-GGN-001"),
                    property_address: s("Tower B, 5th Floor, Cyber City, Gurugram, Haryana"),
                    property_type: s("Commercial Office"),
                    area: s("8000 sq ft"),
                    acquisition_date: s("20/06/2012"),
                    acquisition_value: s("₹6,75,00,000"),
                },
                PropertyAsset {
                    property_id: s("PROP-GGN-002"),
                    property_address: s("Plot 12, Sector 44, Gurugram, Haryana"),
                    property_type: s("Industrial Land"),
                    area: s("2 acres"),
                    acquisition_date: s("15/11/2015"),
                    acquisition_value: s("₹8,50,00,000"),
                },
            ],
            ..Default::default()
        },
        Mca21Record {
            id: s("MCA21-12345"),
            company_name: s("Sunrise Properties Pvt Ltd"),
            registered_address: s("123 MG Road, Bangalore, Karnataka"),
            cin: s("U70100KA2015PTC080123"),
            charge_number: s("CH12345"),
            charge_creation_date: s("2020-01-15"),
            charge_holder: s("HDFC Bank Ltd."),
            charge_amount: s("₹ 2,00,00,000"),
            charge_type: s("Charge on immovable property"),
            asset_type: s("urban"),
            area: s("5000 sq ft"),
            asset_value: s("₹ 3,50,00,000"),
            directors: vec![
                director("Rajesh Kumar", "01234567", "Managing Director"),
                director("Suresh Patel", "07654321", "Director"),
            ],
            property_assets: vec![PropertyAsset {
                property_id: s("DORIS-12345"),
                property_address: s("123 MG Road, Bangalore"),
                property_type: s("Commercial Office"),
                area: s("5000 sq ft"),
                acquisition_date: s("2018-06-15"),
                acquisition_value: s("₹ 3,50,00,000"),
            }],
            ..Default::default()
        },
    ]
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_covers_every_registry() {
        let fixtures = RegistryFixtures::builtin();
        assert_eq!(fixtures.doris.len(), 5);
        assert_eq!(fixtures.dlr.len(), 4);
        assert_eq!(fixtures.cersai.len(), 4);
        assert_eq!(fixtures.mca21.len(), 3);
        assert_eq!(fixtures.len(), 16);
    }

    #[test]
    fn test_from_json_file_replaces_datasets() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"doris": [{{"propertyId": "DORIS-900", "ownerName": "Test Owner"}}]}}"#
        )
        .unwrap();

        let fixtures = RegistryFixtures::from_json_file(file.path()).unwrap();
        assert_eq!(fixtures.doris.len(), 1);
        assert_eq!(fixtures.doris[0].owner_name.as_deref(), Some("Test Owner"));
        assert!(fixtures.dlr.is_empty());
        assert!(fixtures.mca21.is_empty());
    }

    #[test]
    fn test_from_json_file_missing_file_is_error() {
        let result = RegistryFixtures::from_json_file(Path::new("/nonexistent/fixtures.json"));
        assert!(result.is_err());
    }
}
