use std::fmt;
use std::time::Duration;

/// Line written to the status log when the script cannot be started at all.
pub const SPAWN_FAILURE_DIAGNOSTIC: &str = "Failed to run all SOH process\n";

/// Why the supervision loop left the `Running` state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The script could not be spawned. This is the only path that mails the
    /// operator.
    SpawnFailed,
    /// SIGTERM / SIGINT (or an explicit request from the embedding code).
    ShutdownRequested,
    /// `--once` or `max_iterations` reached.
    IterationLimitReached,
}

impl StopReason {
    /// Whether this stop should produce an operator notification.
    pub fn notifies_operator(self) -> bool {
        matches!(self, StopReason::SpawnFailed)
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StopReason::SpawnFailed => "spawn-failed",
            StopReason::ShutdownRequested => "shutdown-requested",
            StopReason::IterationLimitReached => "iteration-limit-reached",
        };
        f.write_str(s)
    }
}

/// Supervision loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped(StopReason),
}

impl LoopState {
    pub fn is_running(self) -> bool {
        matches!(self, LoopState::Running)
    }
}

/// Parse a simple duration string like `"180s"`, `"250ms"`, `"3m"`, `"1h"`.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    // Find the boundary between digits and suffix.
    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| "duration missing unit suffix".to_string())?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;
    let unit = unit_part.trim().to_lowercase();

    let secs_per_unit = match unit.as_str() {
        "ms" => return Ok(Duration::from_millis(value)),
        "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        _ => {
            return Err(format!(
                "unsupported duration unit '{}'; expected ms, s, m, or h",
                unit
            ));
        }
    };

    value
        .checked_mul(secs_per_unit)
        .map(Duration::from_secs)
        .ok_or_else(|| format!("duration '{}' out of range", s))
}
