//! Hardware-facing boundary: wire pacing and single-run admission.
//!
//! The engine produces a [`History`]; getting it onto a physical turtle is
//! the caller's job. This module holds the caller-side pieces that are pure
//! logic: the pacing model that matches the actuator's known speed, a
//! [`Transport`] seam the Bluetooth/serial writers live behind, and the
//! single-permit [`RunGate`] that admits one program at a time.

use crate::error::LogoError;
use crate::history::{Command, History};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;
use tracing::debug;

/// A channel that can deliver one wire line to the actuator.
///
/// Implementations wrap an RFCOMM socket, a serial device file, or an
/// in-memory buffer in tests.
pub trait Transport {
    fn send(&mut self, line: &str) -> Result<(), LogoError>;
}

/// How long the actuator needs to execute `command`.
///
/// 100 motion steps take about 10 seconds and a 90° turn about 10 seconds;
/// pen commands get a fixed settling delay.
pub fn pace_for(command: &Command) -> Duration {
    match command {
        Command::Forward(units) | Command::Backward(units) => {
            Duration::from_secs_f32(units.abs() / 10.0)
        }
        Command::TurnLeft(degrees) | Command::TurnRight(degrees) => {
            Duration::from_secs_f32(degrees.abs() * 10.0 / 90.0)
        }
        Command::PenUp | Command::PenDown => Duration::from_secs(1),
    }
}

/// Drains a [`History`] onto a [`Transport`] in order, pacing each command
/// so the next one is not written while the actuator is still moving.
pub struct Dispatcher {
    paced: bool,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self { paced: true }
    }

    /// A dispatcher that skips the inter-command sleeps. For simulated
    /// transports and tests.
    pub fn unpaced() -> Self {
        Self { paced: false }
    }

    pub fn drain<T: Transport>(&self, history: &History, transport: &mut T) -> Result<(), LogoError> {
        for command in history {
            let line = command.wire_line();
            debug!(%line, "dispatching");
            transport.send(&line)?;
            if self.paced {
                thread::sleep(pace_for(command));
            }
        }
        Ok(())
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Single-permit admission gate for program runs.
///
/// The engine itself holds no locks; whoever drives it guarantees at most
/// one concurrent run per logical turtle. The gate makes that guarantee a
/// non-blocking try-acquire: [`try_acquire`](Self::try_acquire) hands out an
/// RAII [`RunPermit`] or fails with [`LogoError::Busy`] while one is held.
#[derive(Debug, Default)]
pub struct RunGate {
    running: AtomicBool,
}

impl RunGate {
    pub const fn new() -> Self {
        Self {
            running: AtomicBool::new(false),
        }
    }

    pub fn try_acquire(&self) -> Result<RunPermit<'_>, LogoError> {
        self.running
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .map_err(|_| LogoError::Busy)?;
        Ok(RunPermit { gate: self })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

/// Held for the duration of one run; dropping it reopens the gate.
#[must_use = "the gate reopens as soon as the permit is dropped"]
pub struct RunPermit<'a> {
    gate: &'a RunGate,
}

impl Drop for RunPermit<'_> {
    fn drop(&mut self) {
        self.gate.running.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RecordingTransport {
        lines: Vec<String>,
    }

    impl Transport for RecordingTransport {
        fn send(&mut self, line: &str) -> Result<(), LogoError> {
            self.lines.push(line.to_string());
            Ok(())
        }
    }

    #[test]
    fn drain_writes_wire_lines_in_history_order() {
        let mut history = History::new();
        history.push(Command::Forward(10.0));
        history.push(Command::TurnRight(90.0));
        history.push(Command::PenUp);

        let mut transport = RecordingTransport { lines: Vec::new() };
        Dispatcher::unpaced()
            .drain(&history, &mut transport)
            .unwrap();
        assert_eq!(transport.lines, ["fd 10", "rt 90", "pu"]);
    }

    #[test]
    fn drain_stops_at_the_first_transport_failure() {
        struct FailingTransport;
        impl Transport for FailingTransport {
            fn send(&mut self, _line: &str) -> Result<(), LogoError> {
                Err(LogoError::Transport("device gone".to_string()))
            }
        }

        let mut history = History::new();
        history.push(Command::PenDown);
        let result = Dispatcher::unpaced().drain(&history, &mut FailingTransport);
        assert!(matches!(result, Err(LogoError::Transport(_))));
    }

    #[test]
    fn pacing_follows_the_actuator_speed_model() {
        assert_eq!(pace_for(&Command::Forward(100.0)), Duration::from_secs(10));
        assert_eq!(pace_for(&Command::Backward(50.0)), Duration::from_secs(5));
        assert_eq!(pace_for(&Command::TurnRight(90.0)), Duration::from_secs(10));
        assert_eq!(pace_for(&Command::PenUp), Duration::from_secs(1));
        assert_eq!(pace_for(&Command::PenDown), Duration::from_secs(1));
    }

    #[test]
    fn gate_admits_one_run_at_a_time() {
        let gate = RunGate::new();
        let permit = gate.try_acquire().unwrap();
        assert!(gate.is_running());
        assert!(matches!(gate.try_acquire(), Err(LogoError::Busy)));
        drop(permit);
        assert!(!gate.is_running());
        let _again = gate.try_acquire().unwrap();
    }
}
