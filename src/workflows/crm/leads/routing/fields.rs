use super::super::domain::{ConditionField, Lead};

/// Resolved value of a lead attribute, before operator-specific coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
}

impl FieldValue {
    /// Stringified form used by the string operators.
    pub fn as_text(&self) -> String {
        match self {
            FieldValue::Text(value) => value.clone(),
            FieldValue::Number(value) => value.to_string(),
        }
    }

    /// Numeric form used by the comparison operators. Text that does not
    /// parse as a float yields `None`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(value) => Some(*value),
            FieldValue::Text(value) => value.trim().parse::<f64>().ok(),
        }
    }
}

fn first_non_empty<'a>(candidates: [&'a str; 3]) -> Option<&'a str> {
    candidates
        .into_iter()
        .find(|candidate| !candidate.trim().is_empty())
}

impl ConditionField {
    /// Pull this field's value off a lead. Exhaustive over the closed field
    /// enum; `Location` walks city, state, country and takes the first
    /// non-empty one.
    pub fn resolve(self, lead: &Lead) -> Option<FieldValue> {
        match self {
            ConditionField::Source => Some(FieldValue::Text(lead.source.clone())),
            ConditionField::Industry => Some(FieldValue::Text(lead.industry.clone())),
            ConditionField::Budget => Some(FieldValue::Number(lead.budget)),
            ConditionField::Score => Some(FieldValue::Number(f64::from(lead.score))),
            ConditionField::Company => Some(FieldValue::Text(lead.company.clone())),
            ConditionField::Location => first_non_empty([&lead.city, &lead.state, &lead.country])
                .map(|value| FieldValue::Text(value.to_string())),
        }
    }
}
