use super::*;

#[test]
fn logs_each_key_once_but_counts_every_occurrence() {
    let mut diag = Diagnostics::new();
    assert!(diag.report(DiagnosticKind::UnhandledCall, "glFoo", 1, "no handler for glFoo"));
    assert!(!diag.report(DiagnosticKind::UnhandledCall, "glFoo", 7, "no handler for glFoo"));
    assert!(diag.report(DiagnosticKind::UnhandledCall, "glBar", 9, "no handler for glBar"));
    assert!(diag.report(DiagnosticKind::MissingObject, "glFoo", 10, "missing"));

    assert_eq!(diag.count(DiagnosticKind::UnhandledCall), 3);
    assert_eq!(diag.count(DiagnosticKind::MissingObject), 1);
    assert_eq!(diag.count(DiagnosticKind::InvalidBinding), 0);
    assert_eq!(diag.total(), 4);
}

#[test]
fn kinds_serialize_as_snake_case() {
    let json = serde_json::to_string(&DiagnosticKind::NoCurrentContext).unwrap();
    assert_eq!(json, "\"no_current_context\"");
    assert_eq!(DiagnosticKind::ApproximatedName.to_string(), "approximated_name");
}
