use std::error::Error;
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, ValueEnum};
use formpath::{FieldEntry, Flatten, FormMap, ParseOptions};
use serde::{Deserialize, Serialize};

#[derive(Parser, Debug)]
#[command(name = "formpath", version, about = "Bracket-notation form decoder")]
struct Args {
    /// Input file path (.json entry list or url-encoded body). Omit or use '-' to read from stdin.
    input: Option<PathBuf>,

    /// Output file path (prints to stdout if omitted).
    #[arg(short, long, value_name = "file")]
    output: Option<PathBuf>,

    /// Input format (default: auto-detect). Query strings are only grouped by key.
    #[arg(long, value_enum, value_name = "format", default_value_t = InputFormat::Auto)]
    from: InputFormat,

    /// Output format.
    #[arg(long, value_enum, value_name = "format", default_value_t = OutputFormat::Json)]
    to: OutputFormat,

    /// Serialize nested top-level values to JSON text.
    #[arg(long)]
    flatten: bool,

    /// Fail on malformed names and shape conflicts instead of repairing them.
    #[arg(long)]
    strict: bool,

    /// Keep leaf values as text instead of coercing canonical numbers.
    #[arg(long = "no-coerce", action = ArgAction::SetFalse, default_value_t = true)]
    coerce: bool,

    /// Deepest bracket chain followed.
    #[arg(long = "max-depth", value_name = "number")]
    max_depth: Option<usize>,

    /// Highest sequence index padded with nulls (capped at 1048576).
    #[arg(long = "max-index", value_name = "number")]
    max_index: Option<usize>,

    /// JSON indentation size, 0 for compact output (default: 2).
    #[arg(long, value_name = "number", default_value_t = 2)]
    indent: usize,
}

impl Args {
    /// Bracket-path flags given on the command line, which query input
    /// has no use for.
    fn path_flags(&self) -> Vec<&'static str> {
        let mut flags = Vec::new();
        if self.strict {
            flags.push("--strict");
        }
        if !self.coerce {
            flags.push("--no-coerce");
        }
        if self.max_depth.is_some() {
            flags.push("--max-depth");
        }
        if self.max_index.is_some() {
            flags.push("--max-index");
        }
        flags
    }

    fn parse_options(&self) -> ParseOptions {
        let mut options = ParseOptions::new()
            .with_flatten(Flatten::from(self.flatten))
            .with_strict(self.strict)
            .with_coerce_numbers(self.coerce);
        if let Some(max_depth) = self.max_depth {
            options = options.with_max_depth(max_depth);
        }
        if let Some(max_index) = self.max_index {
            options = options.with_max_index(max_index);
        }
        options
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum InputFormat {
    Auto,
    Json,
    Urlencoded,
    Query,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Urlencoded,
}

/// Entry shapes accepted in a JSON entry list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonEntry {
    Object(FieldEntry),
    Pair(String, String),
}

impl From<JsonEntry> for FieldEntry {
    fn from(entry: JsonEntry) -> Self {
        match entry {
            JsonEntry::Object(entry) => entry,
            JsonEntry::Pair(name, value) => FieldEntry::new(name, value),
        }
    }
}

/// Input text together with the file it came from, if any.
struct Input {
    path: Option<PathBuf>,
    text: String,
}

impl Input {
    fn read(path: Option<&Path>) -> io::Result<Self> {
        match path.filter(|path| *path != Path::new("-")) {
            Some(path) => Ok(Self {
                text: fs::read_to_string(path)?,
                path: Some(path.to_path_buf()),
            }),
            None => {
                let mut text = String::new();
                io::stdin().read_to_string(&mut text)?;
                Ok(Self { path: None, text })
            }
        }
    }

    fn label(&self) -> String {
        self.path
            .as_ref()
            .map_or_else(|| "stdin".to_string(), |path| path.display().to_string())
    }

    fn format(&self, requested: InputFormat) -> InputFormat {
        if requested != InputFormat::Auto {
            return requested;
        }
        let Some(path) = &self.path else {
            return if self.text.trim_start().starts_with('[') {
                InputFormat::Json
            } else {
                InputFormat::Urlencoded
            };
        };
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => InputFormat::Json,
            _ => InputFormat::Urlencoded,
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    if let Err(err) = run() {
        eprintln!("ERROR  {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let input = Input::read(args.input.as_deref())?;
    let format = input.format(args.from);
    log::debug!("reading {format:?} input from {}", input.label());

    let fields = match format {
        InputFormat::Query => {
            let ignored = args.path_flags();
            if !ignored.is_empty() {
                let flags = ignored.join(", ");
                return Err(format!("{flags} not supported with --from query").into());
            }
            let fields = formpath::group_query(input.text.trim());
            if args.flatten {
                formpath::flatten::flatten(fields)
            } else {
                fields
            }
        }
        InputFormat::Json => parse_fields(&args, read_json_entries(&input.text)?)?,
        InputFormat::Urlencoded | InputFormat::Auto => {
            let entries = formpath::entries_from_urlencoded(input.text.trim_end().as_bytes());
            parse_fields(&args, entries)?
        }
    };

    let rendered = match args.to {
        OutputFormat::Json => render_json(&fields, args.indent)?,
        OutputFormat::Urlencoded => formpath::to_urlencoded(&fields).into_bytes(),
    };

    let output = args.output.filter(|path| *path != Path::new("-"));
    let mut writer: Box<dyn Write> = match &output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };
    writer.write_all(&rendered)?;
    writer.flush()?;

    if let Some(path) = &output {
        println!("✔ Parsed {} → {}", input.label(), path.display());
    }
    Ok(())
}

fn parse_fields(args: &Args, entries: Vec<FieldEntry>) -> Result<FormMap, Box<dyn Error>> {
    let options = args.parse_options();
    let parsed = formpath::parse_with_diagnostics(&entries, &options);
    if options.strict {
        if let Some(error) = parsed.diagnostics.into_iter().next() {
            return Err(error.into());
        }
        return Ok(parsed.fields);
    }
    for diagnostic in &parsed.diagnostics {
        log::warn!("{diagnostic}");
    }
    Ok(parsed.fields)
}

fn read_json_entries(input: &str) -> Result<Vec<FieldEntry>, Box<dyn Error>> {
    let entries: Vec<JsonEntry> = serde_json::from_str(input)
        .map_err(|err| format!("invalid JSON entry list: {err}"))?;
    Ok(entries.into_iter().map(FieldEntry::from).collect())
}

fn render_json(fields: &FormMap, indent: usize) -> serde_json::Result<Vec<u8>> {
    if indent == 0 {
        return serde_json::to_vec(fields);
    }
    let indent = " ".repeat(indent);
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    fields.serialize(&mut serde_json::Serializer::with_formatter(&mut out, formatter))?;
    Ok(out)
}
