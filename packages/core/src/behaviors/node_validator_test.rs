//! Tests for the single-node validator

#[cfg(test)]
mod tests {
    use crate::behaviors::{validate_node, validate_variation, NodeField};
    use crate::models::{DataType, NodeDescriptor, VariableSpec, Variation, VariationType};
    use serde_json::json;

    fn variable(data_type: DataType, value: &str) -> NodeDescriptor {
        NodeDescriptor::variable("Node", "ns=2;s=Node", VariableSpec::new(data_type, value))
    }

    // ========================================================================
    // Required Fields
    // ========================================================================

    #[test]
    fn test_valid_variable_passes() {
        assert!(validate_node(&variable(DataType::Double, "0.0")).is_ok());
    }

    #[test]
    fn test_all_missing_fields_reported_together() {
        let node = NodeDescriptor::variable("", "  ", VariableSpec::new(DataType::Double, ""));
        let errors = validate_node(&node).unwrap_err();

        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get(NodeField::Name), Some("Name is required"));
        assert_eq!(errors.get(NodeField::NodeId), Some("Node ID is required"));
        assert_eq!(errors.get(NodeField::Value), Some("Value is required"));
    }

    #[test]
    fn test_object_and_method_need_no_value() {
        assert!(validate_node(&NodeDescriptor::object("Folder", "ns=2;s=Folder")).is_ok());
        assert!(validate_node(&NodeDescriptor::method("Reset", "ns=2;s=Reset")).is_ok());
    }

    #[test]
    fn test_object_still_requires_name_and_id() {
        let errors = validate_node(&NodeDescriptor::object("", "")).unwrap_err();
        assert!(errors.get(NodeField::Name).is_some());
        assert!(errors.get(NodeField::NodeId).is_some());
        assert!(errors.get(NodeField::Value).is_none());
    }

    // ========================================================================
    // Value Ranges
    // ========================================================================

    #[test]
    fn test_int32_boundary() {
        assert!(validate_node(&variable(DataType::Int32, "2147483647")).is_ok());

        let errors = validate_node(&variable(DataType::Int32, "2147483648")).unwrap_err();
        let message = errors.get(NodeField::Value).unwrap();
        assert!(message.contains("out of range"), "{}", message);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_uint64_boundary_is_exact() {
        assert!(validate_node(&variable(DataType::UInt64, "18446744073709551615")).is_ok());
        assert!(validate_node(&variable(DataType::UInt64, "18446744073709551616")).is_err());
    }

    #[test]
    fn test_unparseable_numeric_value() {
        let errors = validate_node(&variable(DataType::Float, "warm")).unwrap_err();
        assert!(errors.get(NodeField::Value).unwrap().contains("not a valid float"));
    }

    #[test]
    fn test_non_numeric_types_accept_any_text() {
        for data_type in [DataType::String, DataType::Boolean, DataType::ByteString] {
            assert!(validate_node(&variable(data_type, "whatever")).is_ok());
        }
    }

    #[test]
    fn test_validation_is_pure() {
        let node = variable(DataType::UInt16, "70000");
        let first = validate_node(&node);
        let second = validate_node(&node);
        assert_eq!(first, second);
    }

    // ========================================================================
    // Variation Policies
    // ========================================================================

    #[test]
    fn test_random_requires_bounds() {
        let variation = Variation {
            kind: VariationType::Random,
            min: Some(0.0),
            ..Default::default()
        };
        assert!(validate_variation(&variation).is_err());
        assert!(validate_variation(&Variation::random(0.0, 1.0)).is_ok());
    }

    #[test]
    fn test_linear_requires_step() {
        let variation = Variation {
            kind: VariationType::Linear,
            min: Some(0.0),
            max: Some(10.0),
            ..Default::default()
        };
        assert!(validate_variation(&variation).is_err());
        assert!(validate_variation(&Variation::linear(0.0, 10.0, 1.0)).is_ok());
    }

    #[test]
    fn test_discrete_requires_values() {
        assert!(validate_variation(&Variation::discrete(vec![])).is_err());
        assert!(validate_variation(&Variation::discrete(vec![json!(1)])).is_ok());
    }

    #[test]
    fn test_cycle_accepts_values_or_range() {
        let mut variation = Variation {
            kind: VariationType::Cycle,
            ..Default::default()
        };
        assert!(validate_variation(&variation).is_err());

        variation.values = vec![json!("a"), json!("b")];
        assert!(validate_variation(&variation).is_ok());

        let variation = Variation {
            kind: VariationType::Cycle,
            min: Some(0.0),
            max: Some(5.0),
            step: Some(1.0),
            ..Default::default()
        };
        assert!(validate_variation(&variation).is_ok());
    }

    #[test]
    fn test_inverted_bounds_and_bad_step() {
        assert!(validate_variation(&Variation::random(5.0, 1.0)).is_err());
        assert!(validate_variation(&Variation::linear(0.0, 1.0, 0.0)).is_err());
        assert!(validate_variation(&Variation::linear(0.0, 1.0, -0.5)).is_err());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let variation = Variation::default().with_interval(0);
        assert!(validate_variation(&variation).is_err());
    }

    #[test]
    fn test_variation_error_reported_under_variation_field() {
        let node = NodeDescriptor::variable(
            "Node",
            "ns=2;s=Node",
            VariableSpec::new(DataType::Double, "1").with_variation(Variation::discrete(vec![])),
        );
        let errors = validate_node(&node).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.get(NodeField::Variation).is_some());
    }

    #[test]
    fn test_decimal_places_bounded() {
        let node = |places| {
            NodeDescriptor::variable(
                "Node",
                "ns=2;s=Node",
                VariableSpec::new(DataType::Double, "1.5").with_decimal_places(places),
            )
        };
        assert!(validate_node(&node(17)).is_ok());

        let errors = validate_node(&node(u32::MAX)).unwrap_err();
        assert_eq!(
            errors.get(NodeField::DecimalPlaces),
            Some("Decimal places must be at most 17, got 4294967295")
        );
    }

    #[test]
    fn test_field_errors_serialize_as_map() {
        let errors = validate_node(&NodeDescriptor::object("", "x")).unwrap_err();
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, json!({ "name": "Name is required" }));
    }
}
