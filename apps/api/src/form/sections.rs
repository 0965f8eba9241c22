//! Section payloads. Each form section maps to a fixed set of fields; members
//! left out of a payload leave the draft untouched.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::form::fields::split_list;
use crate::models::submission::{Country, Field, Sector};

/// A form section that can be flattened into individual field writes.
pub trait Section {
    fn into_fields(self) -> Vec<Field>;
}

#[derive(Debug, Default, Deserialize)]
pub struct PersonalSection {
    pub full_name: Option<String>,
    pub dob: Option<NaiveDate>,
}

impl Section for PersonalSection {
    fn into_fields(self) -> Vec<Field> {
        let mut fields = Vec::new();
        fields.extend(self.full_name.map(Field::FullName));
        fields.extend(self.dob.map(Field::Dob));
        fields
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CompanySection {
    pub company_name: Option<String>,
    pub reg_number: Option<String>,
    pub jurisdiction: Option<String>,
    pub country: Option<Country>,
    pub address: Option<String>,
}

impl Section for CompanySection {
    fn into_fields(self) -> Vec<Field> {
        let mut fields = Vec::new();
        fields.extend(self.company_name.map(Field::CompanyName));
        fields.extend(self.reg_number.map(Field::RegNumber));
        fields.extend(self.jurisdiction.map(Field::Jurisdiction));
        fields.extend(self.country.map(Field::Country));
        fields.extend(self.address.map(Field::Address));
        fields
    }
}

/// Forecast text only. Uploaded file names arrive through the multipart route.
#[derive(Debug, Default, Deserialize)]
pub struct FinancialSection {
    pub forecast: Option<String>,
}

impl Section for FinancialSection {
    fn into_fields(self) -> Vec<Field> {
        self.forecast.map(Field::Forecast).into_iter().collect()
    }
}

/// List members are raw comma-separated text as typed by the user.
#[derive(Debug, Default, Deserialize)]
pub struct SectorSection {
    pub sector: Option<Sector>,
    pub key_products: Option<String>,
    pub customers: Option<String>,
    pub suppliers: Option<String>,
    pub competitors: Option<String>,
}

impl Section for SectorSection {
    fn into_fields(self) -> Vec<Field> {
        let mut fields = Vec::new();
        fields.extend(self.sector.map(Field::Sector));
        fields.extend(self.key_products.map(|s| Field::KeyProducts(split_list(&s))));
        fields.extend(self.customers.map(|s| Field::Customers(split_list(&s))));
        fields.extend(self.suppliers.map(|s| Field::Suppliers(split_list(&s))));
        fields.extend(self.competitors.map(|s| Field::Competitors(split_list(&s))));
        fields
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ManagementSection {
    pub management_bio: Option<String>,
    pub shareholders: Option<String>,
}

impl Section for ManagementSection {
    fn into_fields(self) -> Vec<Field> {
        let mut fields = Vec::new();
        fields.extend(self.management_bio.map(Field::ManagementBio));
        fields.extend(self.shareholders.map(Field::Shareholders));
        fields
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct EmployeeSection {
    pub employee_count: Option<i64>,
    pub payroll: Option<i64>,
    pub management_pay: Option<i64>,
}

impl Section for EmployeeSection {
    fn into_fields(self) -> Vec<Field> {
        let mut fields = Vec::new();
        fields.extend(self.employee_count.map(Field::EmployeeCount));
        fields.extend(self.payroll.map(Field::Payroll));
        fields.extend(self.management_pay.map(Field::ManagementPay));
        fields
    }
}
