use chrono::NaiveDate;
use tracing::debug;

use crate::form::fields::{compute_age, today};
use crate::form::sections::Section;
use crate::models::submission::{Field, SubmissionRecord};

/// The in-progress submission for one session.
///
/// No cross-field validation happens here; whatever the user entered last
/// wins. The draft outlives a submit, so the user can resubmit or keep editing.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    record: SubmissionRecord,
}

impl FormState {
    pub fn record(&self) -> &SubmissionRecord {
        &self.record
    }

    /// Inserts or overwrites one field. Setting `dob` also derives `age`
    /// against today's date.
    pub fn set_field(&mut self, field: Field) {
        self.set_field_on(field, today());
    }

    /// `set_field` with an explicit "today" for the age derivation.
    pub fn set_field_on(&mut self, field: Field, today: NaiveDate) {
        if let Field::Dob(dob) = &field {
            let age = compute_age(*dob, today);
            debug!("Derived age {age} from date of birth {dob}");
            self.record.set(Field::Age(age));
        }
        self.record.set(field);
    }

    /// Applies every field a section payload carries.
    pub fn apply_section<S: Section>(&mut self, section: S) {
        let today = today();
        for field in section.into_fields() {
            self.set_field_on(field, today);
        }
    }
}
