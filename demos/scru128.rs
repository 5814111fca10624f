//! Command that prints SCRU128 ID strings
//!
//! By default, IDs come from the process-wide generator, which resets itself upon a big clock
//! rollback. With `-a`, a local generator is used through `generate_or_abort` instead, and each
//! generation declined because of a rollback is reported on stderr.

use std::{env, io, io::Write, process::ExitCode};

use scru128::{Scru128Generator, Scru128Id};

#[derive(Clone, Eq, PartialEq, Debug)]
struct Options {
    count: usize,
    abort: bool,
}

fn main() -> io::Result<ExitCode> {
    let mut args = env::args();
    let program = args.next();
    let opts = match Options::parse(args) {
        Ok(opts) => opts,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!(
                "Usage: {} [-n count] [-a]",
                program.as_deref().unwrap_or("scru128")
            );
            return Ok(ExitCode::FAILURE);
        }
    };

    let mut out = io::BufWriter::new(io::stdout().lock());
    let n_aborted = if opts.abort {
        let mut g = Scru128Generator::new();
        write_ids(&mut out, io::stderr(), opts.count, || g.generate_or_abort())?
    } else {
        write_ids(&mut out, io::stderr(), opts.count, || Some(scru128::scru128()))?
    };
    out.flush()?;

    Ok(if n_aborted == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

impl Options {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, String> {
        let mut count = None;
        let mut abort = false;
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-a" if abort => return Err("option 'a' given more than once".to_owned()),
                "-a" => abort = true,
                "-n" if count.is_some() => {
                    return Err("option 'n' given more than once".to_owned())
                }
                "-n" => {
                    let n_arg = args.next().ok_or("argument to option 'n' missing")?;
                    let c = n_arg
                        .parse()
                        .map_err(|_| format!("invalid argument to option 'n': '{}'", n_arg))?;
                    count = Some(c);
                }
                _ => return Err(format!("unrecognized argument '{}'", arg)),
            }
        }
        Ok(Self {
            count: count.unwrap_or(1),
            abort,
        })
    }
}

/// Writes `count` IDs taken from `next` to `out`, one per line, and returns how many times
/// `next` declined to produce one.
fn write_ids(
    mut out: impl Write,
    mut err: impl Write,
    count: usize,
    mut next: impl FnMut() -> Option<Scru128Id>,
) -> io::Result<usize> {
    let mut n_aborted = 0;
    for _ in 0..count {
        match next() {
            Some(id) => writeln!(out, "{}", id)?,
            None => {
                n_aborted += 1;
                out.flush()?;
                writeln!(err, "warning: generation aborted upon clock rollback")?;
            }
        }
    }
    Ok(n_aborted)
}
