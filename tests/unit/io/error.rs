//! Validates error message formatting and source chaining

#[cfg(test)]
mod tests {
    use std::error::Error;
    use voxelwave::GenerationError;
    use voxelwave::io::error::invalid_parameter;

    #[test]
    fn test_display_messages_name_the_offender() {
        let dims = GenerationError::InvalidDimensions {
            size_x: 0,
            size_y: 3,
            size_z: 8,
        };
        assert_eq!(dims.to_string(), "Invalid grid dimensions 0x3x8");

        let weight = GenerationError::NonPositiveWeight {
            prototype: "corner".to_string(),
            weight: -1.5,
        };
        assert!(weight.to_string().contains("corner"));
        assert!(weight.to_string().contains("-1.5"));

        let pin = GenerationError::PinOutOfBounds {
            coordinate: [9, 0, 0],
            dimensions: (4, 4, 4),
        };
        assert!(pin.to_string().contains("[9, 0, 0]"));
        assert!(pin.to_string().contains("4x4x4"));
    }

    #[test]
    fn test_budget_exhausted_carries_diagnostics() {
        let failure = GenerationError::BudgetExhausted {
            attempts: 10,
            backtracks: 42,
            iterations: 1234,
        };
        let message = failure.to_string();
        assert!(message.contains("10 attempts"));
        assert!(message.contains("42 backtracks"));
        assert!(message.contains("1234 collapse steps"));
    }

    #[test]
    fn test_invalid_parameter_helper() {
        let error = invalid_parameter("seed", &"abc", &"must be an integer");
        assert_eq!(
            error.to_string(),
            "Invalid parameter 'seed' = 'abc': must be an integer"
        );
    }

    // File system errors keep their underlying error reachable via source()
    #[test]
    fn test_source_chain() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error = GenerationError::FileSystem {
            path: "out/grid.png".into(),
            operation: "create file",
            source: io_err,
        };
        assert!(error.source().is_some());

        let plain = GenerationError::Cancelled;
        assert!(plain.source().is_none());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let error: GenerationError = io_err.into();
        assert!(matches!(error, GenerationError::FileSystem { .. }));
    }
}
