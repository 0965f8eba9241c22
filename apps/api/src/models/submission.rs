use std::fmt;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Sectors offered by the intake form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sector {
    #[serde(rename = "UK Leisure")]
    UkLeisure,
    Retail,
    Tech,
    Manufacturing,
}

impl Sector {
    pub fn label(&self) -> &'static str {
        match self {
            Sector::UkLeisure => "UK Leisure",
            Sector::Retail => "Retail",
            Sector::Tech => "Tech",
            Sector::Manufacturing => "Manufacturing",
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Countries offered by the intake form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Country {
    #[serde(rename = "United Kingdom")]
    UnitedKingdom,
    #[serde(rename = "United States")]
    UnitedStates,
    India,
}

impl Country {
    pub fn label(&self) -> &'static str {
        match self {
            Country::UnitedKingdom => "United Kingdom",
            Country::UnitedStates => "United States",
            Country::India => "India",
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One typed form field. The unit of `FormState::set_field`.
///
/// Serialized as `{"field": "<name>", "value": <value>}` so a client can set
/// any single field without going through a section payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum Field {
    FullName(String),
    Dob(NaiveDate),
    Age(i32),
    CompanyName(String),
    RegNumber(String),
    Jurisdiction(String),
    Country(Country),
    Address(String),
    Forecast(String),
    UploadedFiles(Vec<String>),
    Sector(Sector),
    KeyProducts(Vec<String>),
    Customers(Vec<String>),
    Suppliers(Vec<String>),
    Competitors(Vec<String>),
    ManagementBio(String),
    Shareholders(String),
    EmployeeCount(i64),
    Payroll(i64),
    ManagementPay(i64),
}

/// A seller's disclosure as accumulated by the form.
///
/// Every field is optional. `None` means the user never set it, and unset
/// fields are left out of the stored document entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmissionRecord {
    // Personal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dob: Option<NaiveDate>,
    /// Derived from `dob` on the day `dob` was set; never recomputed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,

    // Company
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reg_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jurisdiction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<Country>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    // Financial
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_files: Option<Vec<String>>,

    // Sector
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<Sector>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_products: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customers: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suppliers: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub competitors: Option<Vec<String>>,

    // Management & shareholders
    #[serde(skip_serializing_if = "Option::is_none")]
    pub management_bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shareholders: Option<String>,

    // Employees
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payroll: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub management_pay: Option<i64>,
}

impl SubmissionRecord {
    /// Inserts or overwrites a single field.
    pub fn set(&mut self, field: Field) {
        match field {
            Field::FullName(v) => self.full_name = Some(v),
            Field::Dob(v) => self.dob = Some(v),
            Field::Age(v) => self.age = Some(v),
            Field::CompanyName(v) => self.company_name = Some(v),
            Field::RegNumber(v) => self.reg_number = Some(v),
            Field::Jurisdiction(v) => self.jurisdiction = Some(v),
            Field::Country(v) => self.country = Some(v),
            Field::Address(v) => self.address = Some(v),
            Field::Forecast(v) => self.forecast = Some(v),
            Field::UploadedFiles(v) => self.uploaded_files = Some(v),
            Field::Sector(v) => self.sector = Some(v),
            Field::KeyProducts(v) => self.key_products = Some(v),
            Field::Customers(v) => self.customers = Some(v),
            Field::Suppliers(v) => self.suppliers = Some(v),
            Field::Competitors(v) => self.competitors = Some(v),
            Field::ManagementBio(v) => self.management_bio = Some(v),
            Field::Shareholders(v) => self.shareholders = Some(v),
            Field::EmployeeCount(v) => self.employee_count = Some(v),
            Field::Payroll(v) => self.payroll = Some(v),
            Field::ManagementPay(v) => self.management_pay = Some(v),
        }
    }

    /// Returns every populated field as `(document key, display text)`, in
    /// declaration order. Used to flatten a record into prompt context.
    pub fn display_entries(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        push(&mut out, "full_name", self.full_name.as_ref());
        push(&mut out, "dob", self.dob);
        push(&mut out, "age", self.age);
        push(&mut out, "company_name", self.company_name.as_ref());
        push(&mut out, "reg_number", self.reg_number.as_ref());
        push(&mut out, "jurisdiction", self.jurisdiction.as_ref());
        push(&mut out, "country", self.country);
        push(&mut out, "address", self.address.as_ref());
        push(&mut out, "forecast", self.forecast.as_ref());
        push(&mut out, "uploaded_files", self.uploaded_files.as_deref().map(ListDisplay));
        push(&mut out, "sector", self.sector);
        push(&mut out, "key_products", self.key_products.as_deref().map(ListDisplay));
        push(&mut out, "customers", self.customers.as_deref().map(ListDisplay));
        push(&mut out, "suppliers", self.suppliers.as_deref().map(ListDisplay));
        push(&mut out, "competitors", self.competitors.as_deref().map(ListDisplay));
        push(&mut out, "management_bio", self.management_bio.as_ref());
        push(&mut out, "shareholders", self.shareholders.as_ref());
        push(&mut out, "employee_count", self.employee_count);
        push(&mut out, "payroll", self.payroll);
        push(&mut out, "management_pay", self.management_pay);
        out
    }
}

fn push<T: fmt::Display>(out: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<T>) {
    if let Some(value) = value {
        out.push((key, value.to_string()));
    }
}

/// Renders a list as `[a, b, c]`.
struct ListDisplay<'a>(&'a [String]);

impl fmt::Display for ListDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

/// A submission as persisted: the user's fields plus the server-assigned
/// creation timestamp. Storage identifiers never appear here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    #[serde(flatten)]
    pub record: SubmissionRecord,
    pub timestamp: DateTime<Utc>,
}

impl StoredRecord {
    /// Display entries of the record followed by `timestamp`.
    pub fn display_entries(&self) -> Vec<(&'static str, String)> {
        let mut entries = self.record.display_entries();
        entries.push((
            "timestamp",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        ));
        entries
    }
}
