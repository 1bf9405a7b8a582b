// ── Plugin service states and threshold evaluation ──
//
// The monitoring-plugin contract: four service states with fixed exit
// codes, strict-greater threshold classification, and
// `label=value;warn;crit;min` performance data.

use std::fmt;

use crate::model::RouterStatus;

/// The four monitoring service states with their fixed exit codes.
///
/// Ordered by severity so `max` combines two verdicts into the worse one;
/// `Unknown` sorts last because a check without data outranks any
/// data-bearing verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ServiceState {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl ServiceState {
    /// The process exit code the monitoring system expects.
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Ok => 0,
            Self::Warning => 1,
            Self::Critical => 2,
            Self::Unknown => 3,
        }
    }
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ok => "OK",
            Self::Warning => "WARNING",
            Self::Critical => "CRITICAL",
            Self::Unknown => "UNKNOWN",
        })
    }
}

/// Client-count thresholds, compared with strict `>` so a count exactly at
/// a threshold still passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub warning: u32,
    pub critical: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            warning: 40,
            critical: 50,
        }
    }
}

impl Thresholds {
    pub fn classify(self, count: u32) -> ServiceState {
        if count > self.critical {
            ServiceState::Critical
        } else if count > self.warning {
            ServiceState::Warning
        } else {
            ServiceState::Ok
        }
    }
}

/// One `label=value;warn;crit;min` performance-data sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerfData {
    pub label: &'static str,
    pub value: u32,
    pub warning: u32,
    pub critical: u32,
    pub min: u32,
}

impl fmt::Display for PerfData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}={};{};{};{}",
            self.label, self.value, self.warning, self.critical, self.min
        )
    }
}

impl RouterStatus {
    /// Service state under the plugin decision rules: an offline router is
    /// CRITICAL regardless of thresholds; an online router is rated by its
    /// client count when the feed reports one.
    pub fn service_state(&self, thresholds: Thresholds) -> ServiceState {
        if !self.online {
            return ServiceState::Critical;
        }
        match self.clients {
            Some(count) => thresholds.classify(count),
            None => ServiceState::Ok,
        }
    }

    /// The `clients` sample for the perfdata section, with a minimum bound
    /// of 0. Absent whenever the router is offline or the feed omits the
    /// count.
    pub fn perfdata(&self, thresholds: Thresholds) -> Option<PerfData> {
        if !self.online {
            return None;
        }
        self.clients.map(|value| PerfData {
            label: "clients",
            value,
            warning: thresholds.warning,
            critical: thresholds.critical,
            min: 0,
        })
    }
}
