use serde::{Deserialize, Serialize};

/// Name fields shared by patients and caregivers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub first_name: String,
    pub surname: String,
}

impl Person {
    pub fn new(first_name: impl Into<String>, surname: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            surname: surname.into(),
        }
    }

    /// `surname, first name` as shown in selection lists.
    pub fn full_name(&self) -> String {
        format!("{}, {}", self.surname, self.first_name)
    }
}
