//! Error-policy tests — fail-soft accumulates and keeps going, fail-fast
//! aborts, and malformed input never panics.

use inilink_core::{ErrorKind, ErrorPolicy, Loader, OptionSpec, Schema, SectionSpec, Value};

fn schema() -> Schema {
    Schema::new().with_section(
        SectionSpec::new("Net")
            .with_option(OptionSpec::string("host"))
            .with_option(OptionSpec::unsigned("port", 0, 65535)),
    )
}

#[test]
fn fail_soft_reports_all_errors_in_order() {
    let text = "\
[Net]
host = h
port = not-a-number
port = 1
[Ghost]
x = 1";
    let doc = Loader::new(&schema())
        .strict(true)
        .policy(ErrorPolicy::FailSoft)
        .load_str(text)
        .unwrap();
    let kinds: Vec<_> = doc.diagnostics().iter().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ErrorKind::ConversionError,
            ErrorKind::MultipleOptionDefinitions,
            ErrorKind::UnknownSection,
            ErrorKind::UnknownOption,
        ]
    );
    let lines: Vec<_> = doc.diagnostics().iter().map(|d| d.line).collect();
    assert_eq!(lines, vec![3, 4, 5, 6]);
}

#[test]
fn fail_fast_stops_at_first_error() {
    let text = "[Net]\nhost = h\nport = not-a-number\nport = 1";
    let err = Loader::new(&schema()).load_str(text).unwrap_err();
    assert_eq!(err.kind, ErrorKind::ConversionError);
    assert_eq!(
        format!("{err}"),
        "Line 3: Cannot convert not-a-number to unsigned integer."
    );
}

#[test]
fn fail_soft_keeps_error_free_parts() {
    let text = "[Net]\nhost = kept.example.com\nport = 99999";
    let doc = Loader::new(&schema())
        .policy(ErrorPolicy::FailSoft)
        .load_str(text)
        .unwrap();
    assert_eq!(doc.diagnostics().len(), 1);
    assert_eq!(doc.diagnostics()[0].kind, ErrorKind::ValueOutOfBounds);

    // The clean option is applied, and the out-of-range value is stored
    // alongside its error.
    assert_eq!(
        doc.materialize("Net", "host").unwrap(),
        vec![Value::String("kept.example.com".into())]
    );
    assert_eq!(
        doc.materialize("Net", "port").unwrap(),
        vec![Value::Unsigned(99999)]
    );
}

#[test]
fn missing_required_pieces_never_pass_silently() {
    // Missing option, fail-soft: present in the list.
    let doc = Loader::new(&schema())
        .policy(ErrorPolicy::FailSoft)
        .load_str("[Net]\nhost = h")
        .unwrap();
    assert!(doc
        .diagnostics()
        .iter()
        .any(|d| d.kind == ErrorKind::MissingOption));

    // Missing option, fail-fast: raised.
    let err = Loader::new(&schema()).load_str("[Net]\nhost = h").unwrap_err();
    assert_eq!(err.kind, ErrorKind::MissingOption);
    assert_eq!(err.message, "Required option port is missing.");

    // Missing section, both policies.
    let err = Loader::new(&schema()).load_str("; nothing here").unwrap_err();
    assert_eq!(err.kind, ErrorKind::MissingSection);
    let doc = Loader::new(&schema())
        .policy(ErrorPolicy::FailSoft)
        .load_str("; nothing here")
        .unwrap();
    assert!(doc
        .diagnostics()
        .iter()
        .any(|d| d.kind == ErrorKind::MissingSection));
}

#[test]
fn lenient_mode_accepts_unregistered_identifiers() {
    let text = "[Net]\nhost = h\nport = 1\nextra = v\n[Custom]\nanything = goes";
    let doc = Loader::new(&schema())
        .strict(false)
        .policy(ErrorPolicy::FailSoft)
        .load_str(text)
        .unwrap();
    assert!(!doc.has_errors());

    let extra = doc.section("Net").unwrap().option("extra").unwrap();
    assert!(!extra.known());
    let custom = doc.section("Custom").unwrap();
    assert!(!custom.known());
    assert_eq!(
        doc.materialize("Custom", "anything").unwrap(),
        vec![Value::String("goes".into())]
    );
}

#[test]
fn bad_tokens_do_not_poison_siblings() {
    let schema = Schema::new().with_section(
        SectionSpec::new("S").with_option(OptionSpec::unsigned("ids", 0, 100)),
    );
    let doc = Loader::new(&schema)
        .policy(ErrorPolicy::FailSoft)
        .load_str("[S]\nids = 1, oops, 3")
        .unwrap();
    assert_eq!(doc.diagnostics().len(), 1);
    assert_eq!(
        doc.materialize("S", "ids").unwrap(),
        vec![Value::Unsigned(1), Value::Unsigned(3)]
    );
}

#[test]
fn junk_input_never_panics() {
    let junk = [
        "",
        "\n\n\n",
        "[",
        "]",
        "[]",
        "[]\n=\n;",
        "[Net",
        "= value without identifier",
        "\\",
        "[Net]\n${#}\n= =",
        "[Net]\nhost = ${}\nport = ${#}",
        "]; [",
        "[Net]]]\nhost==h\nport=,",
    ];
    for text in junk {
        // Both policies must survive arbitrary garbage.
        let _ = Loader::new(&schema())
            .strict(true)
            .policy(ErrorPolicy::FailSoft)
            .load_str(text)
            .unwrap();
        let _ = Loader::new(&schema()).strict(true).load_str(text);
    }
}

#[test]
fn empty_link_addresses_are_invalid_links() {
    let doc = Loader::new(&schema())
        .policy(ErrorPolicy::FailSoft)
        .load_str("[Net]\nhost = ${}\nport = 1")
        .unwrap();
    assert_eq!(doc.diagnostics().len(), 1);
    assert_eq!(doc.diagnostics()[0].kind, ErrorKind::InvalidLink);
    assert_eq!(doc.diagnostics()[0].message, "${} is invalid link.");
}
