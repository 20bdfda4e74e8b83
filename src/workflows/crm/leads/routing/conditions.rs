use super::super::domain::{Condition, ConditionOperator, Lead};
use super::fields::FieldValue;

/// Evaluate one condition against a lead. Pure and total: an unresolved
/// field, an unparseable number, or an unrecognized operator all yield
/// `false`, never an error.
pub fn evaluate(lead: &Lead, condition: &Condition) -> bool {
    let Some(resolved) = condition.field.resolve(lead) else {
        return false;
    };

    match condition.operator {
        ConditionOperator::Equals => fold_case(&resolved.as_text()) == fold_case(&condition.value),
        ConditionOperator::Contains => {
            fold_case(&resolved.as_text()).contains(&fold_case(&condition.value))
        }
        ConditionOperator::StartsWith => {
            fold_case(&resolved.as_text()).starts_with(&fold_case(&condition.value))
        }
        ConditionOperator::EndsWith => {
            fold_case(&resolved.as_text()).ends_with(&fold_case(&condition.value))
        }
        ConditionOperator::GreaterThan => both_numeric(&resolved, &condition.value)
            .map(|(lhs, rhs)| lhs > rhs)
            .unwrap_or(false),
        ConditionOperator::LessThan => both_numeric(&resolved, &condition.value)
            .map(|(lhs, rhs)| lhs < rhs)
            .unwrap_or(false),
        ConditionOperator::Unknown => false,
    }
}

fn fold_case(value: &str) -> String {
    value.to_lowercase()
}

fn both_numeric(resolved: &FieldValue, raw: &str) -> Option<(f64, f64)> {
    let lhs = resolved.as_number()?;
    let rhs = raw.trim().parse::<f64>().ok()?;
    if lhs.is_nan() || rhs.is_nan() {
        return None;
    }
    Some((lhs, rhs))
}
