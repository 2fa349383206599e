use formpath::{ErrorKind, ParseOptions};
use rstest::rstest;

fn strict() -> ParseOptions {
    ParseOptions::new().with_strict(true)
}

#[rstest]
#[case(&[("a[]", "x")], ErrorKind::Syntax, "a[]")]
#[case(&[("[a]", "x")], ErrorKind::Syntax, "[a]")]
#[case(&[("a[b]tail", "x")], ErrorKind::Syntax, "a[b]tail")]
#[case(&[("a[0]", "x"), ("a[k]", "y")], ErrorKind::Conflict, "a[k]")]
#[case(&[("a", "x"), ("a[k]", "y")], ErrorKind::Conflict, "a[k]")]
#[case(&[("a[k]", "x"), ("a", "y")], ErrorKind::Conflict, "a")]
#[case(&[("a[k]", "x"), ("a[k]", "y")], ErrorKind::Conflict, "a[k]")]
#[case(&[("a[70000]", "x")], ErrorKind::Limit, "a")]
#[case(&[("a[b][70000]", "x")], ErrorKind::Limit, "a[b]")]
#[case(&[("a[99999999999999999999999]", "x")], ErrorKind::Limit, "a[99999999999999999999999]")]
fn strict_mode_reports_repairs(
    #[case] entries: &[(&str, &str)],
    #[case] kind: ErrorKind,
    #[case] field: &str,
) {
    let err = formpath::try_parse_with_options(entries.iter().copied(), &strict())
        .expect_err("strict parse should fail");
    assert_eq!(err.kind, kind);
    assert_eq!(err.field.as_deref(), Some(field));

    let err = formpath::validate_entries(entries.iter().copied(), &ParseOptions::default())
        .expect_err("validation should fail");
    assert_eq!(err.kind, kind);
}

#[rstest]
fn lenient_mode_returns_the_repaired_map() {
    let entries = [("a[0]", "x"), ("a[k]", "y")];
    let fields = formpath::try_parse_with_options(entries, &ParseOptions::default()).unwrap();
    assert_eq!(
        formpath::to_value(&fields),
        serde_json::json!({"a": {"0": "x", "k": "y"}})
    );
}

#[rstest]
fn well_formed_input_passes_validation() {
    let entries = [
        ("user[name]", "Ada"),
        ("user[tags][0]", "x"),
        ("user[tags][1]", "y"),
        ("remember", "on"),
    ];
    assert!(formpath::validate_entries(entries, &ParseOptions::default()).is_ok());
    assert!(formpath::try_parse_with_options(entries, &strict()).is_ok());
}

#[rstest]
fn far_index_within_limit_is_not_a_repair() {
    let fields = formpath::try_parse_with_options([("a[5000]", "x")], &strict()).unwrap();
    assert_eq!(fields["a"].as_sequence().map(Vec::len), Some(5001));
}

#[rstest]
fn depth_limit_is_reported() {
    let options = strict().with_max_depth(1);
    let err = formpath::try_parse_with_options([("a[b][c]", "x")], &options).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Limit);
    assert!(err.to_string().contains("nesting depth 2 exceeds limit of 1"));
}

#[rstest]
fn diagnostics_are_collected_in_order() {
    let parsed = formpath::parse_with_diagnostics(
        [("a[]", "1"), ("b[0]", "x"), ("b[k]", "y")],
        &ParseOptions::default(),
    );
    let kinds: Vec<ErrorKind> = parsed.diagnostics.iter().map(|err| err.kind).collect();
    assert_eq!(kinds, vec![ErrorKind::Syntax, ErrorKind::Conflict]);
    assert_eq!(parsed.fields.len(), 2);
}
