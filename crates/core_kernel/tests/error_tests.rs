//! Tests for core_kernel error types

use core_kernel::error::{CoreError, ErrorKind};

#[test]
fn test_core_error_configuration_is_internal() {
    let error = CoreError::configuration("AI_BATCH_SIZE must be at least 1");

    assert!(error.to_string().contains("Configuration error"));
    assert_eq!(error.kind(), ErrorKind::Internal);
}

#[test]
fn test_error_kind_codes() {
    assert_eq!(ErrorKind::Validation.code(), "VALIDATION_ERROR");
    assert_eq!(ErrorKind::NotFound.code(), "NOT_FOUND");
    assert_eq!(ErrorKind::Conflict.code(), "CONFLICT");
    assert_eq!(ErrorKind::InvalidState.code(), "INVALID_STATE");
    assert_eq!(ErrorKind::Internal.code(), "INTERNAL_ERROR");
}

#[test]
fn test_error_kind_serializes_as_wire_code() {
    let json = serde_json::to_string(&ErrorKind::InvalidState).unwrap();
    assert_eq!(json, "\"INVALID_STATE\"");
}
