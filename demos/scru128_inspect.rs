//! Command that shows components of SCRU128 IDs read from stdin or a file
//!
//! Prints a human-readable JSON object for each valid line read and a warning to stderr for
//! each invalid line, without stopping at the first invalid one.

use std::{env, fs, io, io::BufRead, io::Write, process::ExitCode};

use chrono::{DateTime, SecondsFormat, Utc};
use scru128::Scru128Id;

fn main() -> io::Result<ExitCode> {
    let input: Box<dyn BufRead> = {
        let mut args = env::args();
        let program = args.next();
        match parse_args(args) {
            Ok(None) => Box::new(io::stdin().lock()),
            Ok(Some(path)) => match fs::File::open(&path) {
                Ok(file) => Box::new(io::BufReader::new(file)),
                Err(err) => {
                    eprintln!("Error: could not open '{}': {}", path, err);
                    return Ok(ExitCode::FAILURE);
                }
            },
            Err(message) => {
                eprintln!("Error: {}", message);
                eprintln!(
                    "Usage: {} [file]",
                    program.as_deref().unwrap_or("scru128-inspect")
                );
                return Ok(ExitCode::FAILURE);
            }
        }
    };

    let mut out = io::BufWriter::new(io::stdout().lock());
    inspect_lines(input, &mut out, io::stderr())?;
    out.flush()?;
    Ok(ExitCode::SUCCESS)
}

/// Writes an inspection of each identifier read from `input` to `out`, skipping blank lines and
/// warning on `err` about lines that are not valid identifiers. Returns the number of lines
/// skipped as invalid.
fn inspect_lines(
    input: impl BufRead,
    mut out: impl Write,
    mut err: impl Write,
) -> io::Result<usize> {
    let mut n_invalid = 0;
    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match line.parse::<Scru128Id>() {
            Ok(id) => writeln!(out, "{}", inspect(line, id))?,
            Err(_) => {
                n_invalid += 1;
                out.flush()?;
                writeln!(err, "warning: skipped invalid identifier: {}", line)?;
            }
        }
    }
    Ok(n_invalid)
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Option<String>, String> {
    let path = args.next().filter(|arg| arg != "-");
    if let Some(arg) = args.next() {
        return Err(format!("unrecognized argument '{}'", arg));
    }
    Ok(path)
}

fn inspect(input: &str, id: Scru128Id) -> String {
    let timestamp_iso = i64::try_from(id.timestamp())
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map_or_else(
            || "(out of range)".to_owned(),
            |dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true),
        );

    [
        "{".to_owned(),
        format!(r#"  "input":        "{}","#, input),
        format!(r#"  "canonical":    "{}","#, id),
        format!(r#"  "timestampIso": "{}","#, timestamp_iso),
        format!(r#"  "timestamp":    "{}","#, id.timestamp()),
        format!(r#"  "counterHi":    "{}","#, id.counter_hi()),
        format!(r#"  "counterLo":    "{}","#, id.counter_lo()),
        format!(r#"  "entropy":      "{}","#, id.entropy()),
        format!(
            r#"  "fieldsHex":    ["{:012x}", "{:06x}", "{:06x}", "{:08x}"]"#,
            id.timestamp(),
            id.counter_hi(),
            id.counter_lo(),
            id.entropy()
        ),
        "}".to_owned(),
    ]
    .join("\n")
}
