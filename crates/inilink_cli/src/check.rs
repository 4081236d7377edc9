//! `inilink check` and `inilink fmt` — validate and reformat documents.

use std::path::Path;

use inilink_core::{Document, ErrorPolicy, Loader, Schema};
use inilink_diagnostics::Diagnostic;

use crate::{CheckArgs, FmtArgs, GlobalArgs, ReportFormat};

/// Runs the `inilink check` command.
///
/// Loads the schema (or an empty one), validates the configuration file, and
/// renders every diagnostic. Returns exit code 0 if the document is clean,
/// 1 if there were any diagnostics.
pub fn run_check(args: &CheckArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let schema = load_schema_or_empty(args.schema.as_deref())?;
    let content = std::fs::read_to_string(&args.config)?;

    let policy = if args.fail_fast {
        ErrorPolicy::FailFast
    } else {
        ErrorPolicy::FailSoft
    };
    let loader = Loader::new(&schema).strict(args.strict).policy(policy);

    let diagnostics = match loader.load_str(&content) {
        Ok(doc) => doc.diagnostics().to_vec(),
        Err(diag) => vec![diag],
    };
    render(&diagnostics, args.format);

    if !global.quiet && args.format == ReportFormat::Text {
        eprintln!("   Result: {} error(s)", diagnostics.len());
    }

    Ok(if diagnostics.is_empty() { 0 } else { 1 })
}

/// Runs the `inilink fmt` command.
///
/// Parses the configuration file and prints its canonical serialization to
/// stdout. Diagnostics go to stderr; the document is printed either way,
/// reflecting whatever the fail-soft pass managed to apply. Returns exit
/// code 0 if the document was clean, 1 otherwise.
pub fn run_fmt(args: &FmtArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let schema = load_schema_or_empty(args.schema.as_deref())?;
    let content = std::fs::read_to_string(&args.config)?;

    let loader = Loader::new(&schema)
        .strict(args.strict)
        .policy(ErrorPolicy::FailSoft);
    let doc = loader.load_str(&content)?;

    for diag in doc.diagnostics() {
        eprintln!("error: {diag}");
    }
    print_document(&doc, args.defaults);

    if !global.quiet && doc.has_errors() {
        eprintln!("   Result: {} error(s)", doc.diagnostics().len());
    }

    Ok(if doc.has_errors() { 1 } else { 0 })
}

fn load_schema_or_empty(path: Option<&str>) -> Result<Schema, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(crate::schema_file::load_schema(Path::new(path))?),
        None => Ok(Schema::new()),
    }
}

fn render(diagnostics: &[Diagnostic], format: ReportFormat) {
    match format {
        ReportFormat::Text => {
            for diag in diagnostics {
                eprintln!("error: {diag}");
            }
        }
        ReportFormat::Json => {
            let json =
                serde_json::to_string_pretty(diagnostics).unwrap_or_else(|_| "[]".to_string());
            println!("{json}");
        }
    }
}

fn print_document(doc: &Document, use_defaults: bool) {
    for line in doc.serialize(use_defaults) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> String {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path.to_string_lossy().into_owned()
    }

    const SCHEMA: &str = r#"
[[sections]]
id = "Net"

[[sections.options]]
id = "host"
type = "string"

[[sections.options]]
id = "port"
type = "unsigned"
min = 0
max = 65535
"#;

    fn check_args(config: String, schema: String) -> CheckArgs {
        CheckArgs {
            config,
            schema: Some(schema),
            strict: true,
            fail_fast: false,
            format: ReportFormat::Text,
        }
    }

    #[test]
    fn check_clean_file_exits_zero() {
        let dir = tempfile::tempdir().unwrap();
        let schema = write_file(&dir, "schema.toml", SCHEMA);
        let config = write_file(&dir, "app.conf", "[Net]\nhost = h\nport = 80\n");
        let args = check_args(config, schema);
        let code = run_check(&args, &GlobalArgs { quiet: true }).unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn check_bad_file_exits_one() {
        let dir = tempfile::tempdir().unwrap();
        let schema = write_file(&dir, "schema.toml", SCHEMA);
        let config = write_file(&dir, "app.conf", "[Net]\nhost = h\nport = 99999\n");
        let args = check_args(config, schema);
        let code = run_check(&args, &GlobalArgs { quiet: true }).unwrap();
        assert_eq!(code, 1);
    }

    #[test]
    fn check_without_schema_is_lenient() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_file(&dir, "app.conf", "[Anything]\ngoes = here\n");
        let args = CheckArgs {
            config,
            schema: None,
            strict: false,
            fail_fast: false,
            format: ReportFormat::Text,
        };
        let code = run_check(&args, &GlobalArgs { quiet: true }).unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn check_missing_config_file_is_an_error() {
        let args = CheckArgs {
            config: "/nonexistent/app.conf".to_string(),
            schema: None,
            strict: false,
            fail_fast: false,
            format: ReportFormat::Text,
        };
        assert!(run_check(&args, &GlobalArgs { quiet: true }).is_err());
    }

    #[test]
    fn fmt_prints_and_reports() {
        let dir = tempfile::tempdir().unwrap();
        let schema = write_file(&dir, "schema.toml", SCHEMA);
        let config = write_file(&dir, "app.conf", "[Net]\nhost = h\nport = 80\n");
        let args = FmtArgs {
            config,
            schema: Some(schema),
            strict: true,
            defaults: false,
        };
        let code = run_fmt(&args, &GlobalArgs { quiet: true }).unwrap();
        assert_eq!(code, 0);
    }
}
