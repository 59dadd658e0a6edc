use serde::{Deserialize, Serialize};

use super::super::domain::{BusinessProfile, FieldValue};

/// Weighted profile fields that count toward completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProfileField {
    BusinessName,
    BusinessDescription,
    TypeOfIncorporation,
    Sector,
    Country,
    City,
    PostalCode,
    AverageAnnualTurnover,
    AverageMonthlyTurnover,
    YearOfRegistration,
    #[serde(rename = "street1")]
    Street1,
    PreviousLoans,
}

impl ProfileField {
    pub const ALL: [ProfileField; 12] = [
        ProfileField::BusinessName,
        ProfileField::BusinessDescription,
        ProfileField::TypeOfIncorporation,
        ProfileField::Sector,
        ProfileField::Country,
        ProfileField::City,
        ProfileField::PostalCode,
        ProfileField::AverageAnnualTurnover,
        ProfileField::AverageMonthlyTurnover,
        ProfileField::YearOfRegistration,
        ProfileField::Street1,
        ProfileField::PreviousLoans,
    ];

    pub const fn weight(self) -> u32 {
        match self {
            ProfileField::BusinessName
            | ProfileField::AverageAnnualTurnover
            | ProfileField::Street1 => 4,
            ProfileField::BusinessDescription
            | ProfileField::TypeOfIncorporation
            | ProfileField::Sector
            | ProfileField::AverageMonthlyTurnover => 3,
            ProfileField::Country
            | ProfileField::City
            | ProfileField::PostalCode
            | ProfileField::YearOfRegistration
            | ProfileField::PreviousLoans => 2,
        }
    }

    pub fn total_weight() -> u32 {
        Self::ALL.iter().map(|field| field.weight()).sum()
    }

    pub const fn key(self) -> &'static str {
        match self {
            ProfileField::BusinessName => "businessName",
            ProfileField::BusinessDescription => "businessDescription",
            ProfileField::TypeOfIncorporation => "typeOfIncorporation",
            ProfileField::Sector => "sector",
            ProfileField::Country => "country",
            ProfileField::City => "city",
            ProfileField::PostalCode => "postalCode",
            ProfileField::AverageAnnualTurnover => "averageAnnualTurnover",
            ProfileField::AverageMonthlyTurnover => "averageMonthlyTurnover",
            ProfileField::YearOfRegistration => "yearOfRegistration",
            ProfileField::Street1 => "street1",
            ProfileField::PreviousLoans => "previousLoans",
        }
    }

    /// Shortest trimmed text that counts as filled in.
    const fn min_text_len(self) -> usize {
        match self {
            ProfileField::PostalCode => 1,
            _ => 2,
        }
    }

    pub fn value(self, profile: &BusinessProfile) -> Option<&FieldValue> {
        let slot = match self {
            ProfileField::BusinessName => &profile.business_name,
            ProfileField::BusinessDescription => &profile.business_description,
            ProfileField::TypeOfIncorporation => &profile.type_of_incorporation,
            ProfileField::Sector => &profile.sector,
            ProfileField::Country => &profile.country,
            ProfileField::City => &profile.city,
            ProfileField::PostalCode => &profile.postal_code,
            ProfileField::AverageAnnualTurnover => &profile.average_annual_turnover,
            ProfileField::AverageMonthlyTurnover => &profile.average_monthly_turnover,
            ProfileField::YearOfRegistration => &profile.year_of_registration,
            ProfileField::Street1 => &profile.street1,
            ProfileField::PreviousLoans => &profile.previous_loans,
        };
        slot.as_ref()
    }

    pub fn is_complete(self, profile: &BusinessProfile) -> bool {
        self.value(profile)
            .is_some_and(|value| self.accepts(value))
    }

    /// Any boolean counts, including `false`. Text length is measured in UTF-16
    /// code units, matching what the dashboard reports for the same string.
    pub fn accepts(self, value: &FieldValue) -> bool {
        match value {
            FieldValue::Bool(_) => true,
            FieldValue::Number(number) => !number.is_nan(),
            FieldValue::Text(text) => text.trim().encode_utf16().count() >= self.min_text_len(),
            FieldValue::List(items) => !items.is_empty(),
            FieldValue::Other(_) => false,
        }
    }
}
