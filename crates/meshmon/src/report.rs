//! Rendering of the final plugin line.
//!
//! The monitoring system reads exactly one stdout line:
//! `MESHNODE <STATE> - <text>[ | <perfdata>]`, plus the matching exit
//! code. Everything in this module is pure string assembly so the format
//! stays under unit test.

use std::fmt;

use meshmon_core::{RouterStatus, ServiceState, Thresholds};

/// Service prefix on every output line.
pub const SERVICE: &str = "MESHNODE";

/// A fully rendered check result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub state: ServiceState,
    pub line: String,
}

impl CheckReport {
    /// Report for a router found in the document.
    pub fn for_router(router: &RouterStatus, thresholds: Thresholds) -> Self {
        let state = router.service_state(thresholds);
        let mut text = format!(
            "router '{}' ({}) is {}",
            router.name,
            router.id,
            router.state_text()
        );
        if let Some(clients) = router.clients {
            text.push_str(&format!(" - {clients} clients"));
        }
        let line = match router.perfdata(thresholds) {
            Some(sample) => format!("{SERVICE} {state} - {text} | {sample}"),
            None => format!("{SERVICE} {state} - {text}"),
        };
        Self { state, line }
    }

    /// Report for a router absent from the document.
    pub fn not_found(name: &str) -> Self {
        Self {
            state: ServiceState::Unknown,
            line: format!("{SERVICE} UNKNOWN - router '{name}' not found in status feed"),
        }
    }

    /// Report for a fatal failure anywhere in the check.
    pub fn failure(reason: &impl fmt::Display) -> Self {
        Self {
            state: ServiceState::Unknown,
            line: format!("{SERVICE} UNKNOWN - {reason}"),
        }
    }
}
