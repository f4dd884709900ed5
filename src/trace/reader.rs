use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{TrimError, TrimResult};
use crate::trace::call::TraceCall;

/// Lazily parse a JSON-lines trace. Blank lines and lines starting with `#` are skipped.
pub fn read_trace<R: BufRead>(reader: R) -> impl Iterator<Item = TrimResult<TraceCall>> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(line_idx, line)| match line {
            Err(e) => Some(Err(TrimError::Other(
                anyhow::Error::new(e).context(format!("read trace line {}", line_idx + 1)),
            ))),
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() || trimmed.starts_with('#') {
                    return None;
                }
                Some(serde_json::from_str::<TraceCall>(trimmed).map_err(|e| {
                    TrimError::serde(format!("trace line {}: {e}", line_idx + 1))
                }))
            }
        })
}

/// Open a JSON-lines trace file for lazy reading.
pub fn open_trace(
    path: &Path,
) -> TrimResult<impl Iterator<Item = TrimResult<TraceCall>> + use<>> {
    let file = File::open(path)
        .with_context(|| format!("open trace {}", path.display()))
        .map_err(TrimError::Other)?;
    Ok(read_trace(BufReader::new(file)))
}

/// Read a whole JSON-lines trace file into memory.
#[tracing::instrument]
pub fn load_trace(path: &Path) -> TrimResult<Vec<TraceCall>> {
    let calls = open_trace(path)?.collect::<TrimResult<Vec<_>>>()?;
    tracing::debug!(calls = calls.len(), "trace loaded");
    Ok(calls)
}

fn write_call<W: Write>(writer: &mut W, call: &TraceCall) -> TrimResult<()> {
    let line = serde_json::to_string(call)
        .map_err(|e| TrimError::serde(format!("call {}: {e}", call.no)))?;
    writeln!(writer, "{line}")
        .context("write trimmed trace")
        .map_err(TrimError::Other)
}

fn finish<W: Write>(mut writer: W) -> TrimResult<()> {
    writer
        .flush()
        .context("flush trimmed trace")
        .map_err(TrimError::Other)
}

/// Write the calls whose numbers are in `keep` as JSON lines, in input order.
///
/// Returns the number of calls written.
pub fn write_calls<'a, W: Write>(
    mut writer: W,
    calls: impl IntoIterator<Item = &'a TraceCall>,
    keep: &BTreeSet<u64>,
) -> TrimResult<usize> {
    let mut written = 0usize;
    for call in calls.into_iter().filter(|c| keep.contains(&c.no)) {
        write_call(&mut writer, call)?;
        written += 1;
    }
    finish(writer)?;
    Ok(written)
}

/// [`write_calls`] over a lazily read trace. Reading stops after the last kept call.
pub fn write_kept_calls<W: Write>(
    mut writer: W,
    calls: impl IntoIterator<Item = TrimResult<TraceCall>>,
    keep: &BTreeSet<u64>,
) -> TrimResult<usize> {
    let Some(&last) = keep.last() else {
        finish(writer)?;
        return Ok(0);
    };
    let mut written = 0usize;
    for call in calls {
        let call = call?;
        if keep.contains(&call.no) {
            write_call(&mut writer, &call)?;
            written += 1;
        }
        if call.no >= last {
            break;
        }
    }
    finish(writer)?;
    Ok(written)
}
