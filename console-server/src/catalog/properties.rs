//! Product property validation
//!
//! A cardinality check: the product must carry as many values as its
//! category resolves properties, and none of them empty. Keys and option
//! membership are not compared; the console form only offers valid choices.

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::Property;
use std::collections::BTreeMap;

pub fn validate_product_properties(
    resolved: &[Property],
    candidate: &BTreeMap<String, String>,
) -> AppResult<()> {
    if candidate.len() != resolved.len() || candidate.values().any(|v| v.trim().is_empty()) {
        return Err(AppError::new(ErrorCode::PropertyValuesMissing));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_one_value_per_property_passes() {
        let resolved = vec![Property::enumerated("Color", "Red,Blue")];
        assert!(validate_product_properties(&resolved, &values(&[("Color", "Red")])).is_ok());
    }

    #[test]
    fn test_missing_and_extra_keys_fail() {
        let resolved = vec![Property::enumerated("Color", "Red,Blue")];

        let err = validate_product_properties(&resolved, &values(&[])).unwrap_err();
        assert_eq!(err.message, "One or more property values missing");

        let err = validate_product_properties(&resolved, &values(&[("Color", "Red"), ("Size", "M")]))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PropertyValuesMissing);
    }

    #[test]
    fn test_count_check_does_not_compare_keys() {
        let resolved = vec![Property::enumerated("Color", "Red,Blue")];
        assert!(validate_product_properties(&resolved, &values(&[("Size", "M")])).is_ok());
    }

    #[test]
    fn test_custom_property_needs_text() {
        let resolved = vec![Property::custom("Engraving")];
        assert!(validate_product_properties(&resolved, &values(&[("Engraving", "For Sam")])).is_ok());
        assert!(validate_product_properties(&resolved, &values(&[("Engraving", "  ")])).is_err());
    }

    #[test]
    fn test_no_properties_accepts_empty_map() {
        assert!(validate_product_properties(&[], &BTreeMap::new()).is_ok());
    }
}
