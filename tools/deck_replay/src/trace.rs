use std::{fs, path::Path};

use anyhow::{bail, Context, Result};

/// One line of a recorded deck session.
#[derive(Clone, Debug, PartialEq)]
pub enum TraceStep {
    Enqueue(Vec<String>),
    Pointer {
        ms: u64,
        touching: bool,
        x: f32,
        y: f32,
    },
    Frame(u64),
    Complete(u64),
    Abandon(u64),
}

impl TraceStep {
    pub fn ms(&self) -> Option<u64> {
        match self {
            Self::Enqueue(_) => None,
            Self::Pointer { ms, .. } | Self::Frame(ms) | Self::Complete(ms) | Self::Abandon(ms) => {
                Some(*ms)
            }
        }
    }
}

pub const OUTCOME_KINDS: [&str; 7] = [
    "like",
    "pass",
    "cancel",
    "notify",
    "advance",
    "exhausted",
    "abandoned",
];

pub fn parse_trace_file(path: &Path) -> Result<Vec<TraceStep>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    parse_trace(&raw).with_context(|| format!("invalid trace {}", path.display()))
}

pub fn parse_trace(raw: &str) -> Result<Vec<TraceStep>> {
    let mut steps = Vec::new();
    let mut last_ms = 0u64;
    for (line_no, line) in raw.lines().enumerate() {
        let line_no = line_no + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        let step = match parts.as_slice() {
            ["enqueue", ids @ ..] if !ids.is_empty() && ids.iter().all(|id| !id.is_empty()) => {
                TraceStep::Enqueue(ids.iter().map(|id| id.to_string()).collect())
            }
            ["enqueue", ..] => bail!("line {line_no}: enqueue needs at least one candidate id"),
            ["pointer", ms, touching, x, y] => TraceStep::Pointer {
                ms: parse_field(ms, line_no, "ms")?,
                touching: match *touching {
                    "1" => true,
                    "0" => false,
                    other => bail!("line {line_no}: touching must be 0 or 1, got '{other}'"),
                },
                x: parse_field(x, line_no, "x")?,
                y: parse_field(y, line_no, "y")?,
            },
            ["pointer", ..] => bail!("line {line_no}: expected pointer,<ms>,<0|1>,<x>,<y>"),
            ["frame", ms] => TraceStep::Frame(parse_field(ms, line_no, "ms")?),
            ["complete", ms] => TraceStep::Complete(parse_field(ms, line_no, "ms")?),
            ["abandon", ms] => TraceStep::Abandon(parse_field(ms, line_no, "ms")?),
            [kind, ..] => bail!("line {line_no}: unknown trace record '{kind}'"),
            [] => continue,
        };

        if let Some(ms) = step.ms() {
            if ms < last_ms {
                bail!("line {line_no}: timestamp {ms} goes backwards (previous {last_ms})");
            }
            last_ms = ms;
        }
        steps.push(step);
    }
    Ok(steps)
}

pub fn parse_expected_file(path: &Path) -> Result<Vec<String>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    parse_expected(&raw).with_context(|| format!("invalid expectations {}", path.display()))
}

/// One outcome kind per line, case-insensitive.
pub fn parse_expected(raw: &str) -> Result<Vec<String>> {
    let mut kinds = Vec::new();
    for (line_no, line) in raw.lines().enumerate() {
        let token = line.trim();
        if token.is_empty() || token.starts_with('#') {
            continue;
        }
        let normalized = token.to_ascii_lowercase();
        if !OUTCOME_KINDS.contains(&normalized.as_str()) {
            bail!("line {}: unknown outcome kind '{token}'", line_no + 1);
        }
        kinds.push(normalized);
    }
    Ok(kinds)
}

fn parse_field<T>(raw: &str, line_no: usize, field: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.parse::<T>()
        .with_context(|| format!("line {line_no}: invalid {field} '{raw}'"))
}
