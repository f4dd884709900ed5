use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        TrimError::mapping_overrun("x")
            .to_string()
            .contains("mapping overrun:")
    );
    assert!(
        TrimError::unmapped_write("x")
            .to_string()
            .contains("unmapped write:")
    );
    assert!(
        TrimError::invalid_trace("x")
            .to_string()
            .contains("invalid trace:")
    );
    assert!(TrimError::config("x").to_string().contains("config error:"));
    assert!(
        TrimError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
    assert!(
        TrimError::unsupported("x")
            .to_string()
            .contains("unsupported:")
    );
}

#[test]
fn only_write_tracking_errors_are_mapping_errors() {
    assert!(TrimError::mapping_overrun("x").is_mapping_error());
    assert!(TrimError::unmapped_write("x").is_mapping_error());
    assert!(!TrimError::config("x").is_mapping_error());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = TrimError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
