//! Per-tick telemetry
//!
//! Reporters only ever see read-only snapshots of the survey.

use crate::behaviors::{SurveyReport, SurveySnapshot};
use std::io::Write;

/// Consumer of survey telemetry
pub trait Reporter {
    /// Called after every tick
    fn report(&mut self, snapshot: &SurveySnapshot);

    /// Called once when the run ends
    fn finish(&mut self, _report: &SurveyReport) {}
}

/// Discards everything
#[derive(Debug, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&mut self, _snapshot: &SurveySnapshot) {}
}

/// One structured debug event per tick
#[derive(Debug, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&mut self, s: &SurveySnapshot) {
        tracing::debug!(
            tick = s.tick,
            phase = %s.phase,
            side = s.side_index,
            range_cm = ?s.range_cm,
            encoder_deg = ?s.encoder.map(|e| e.display_degrees()),
            battery = ?s.battery.map(|v| v.0),
            tally = s.tally,
            error_tally = s.error_tally,
            faults = s.faults.len(),
            "tick"
        );
    }

    fn finish(&mut self, report: &SurveyReport) {
        tracing::info!(
            phase = %report.phase,
            ticks = report.ticks,
            sides = report.sides.len(),
            "survey finished"
        );
    }
}

/// Boxed text block per tick, the console layout the robot has always printed
pub struct ConsoleReporter<W: Write> {
    out: W,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        ConsoleReporter { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn render(&mut self, s: &SurveySnapshot) -> std::io::Result<()> {
        let battery = match s.battery {
            Some(v) if s.battery_low => format!("{} LOW", v),
            Some(v) => v.to_string(),
            None => "--".to_string(),
        };
        let range = s.range_cm.map_or("--".to_string(), |r| r.to_string());
        let encoder = s
            .encoder
            .map_or("--".to_string(), |e| e.display_degrees().to_string());
        let sides = s
            .side_lengths
            .iter()
            .map(|l| format!("{:.1}", l))
            .collect::<Vec<_>>()
            .join(" ");

        writeln!(self.out, "______________________________")?;
        writeln!(self.out, "|___________{:<5}____________|", s.tick)?;
        writeln!(self.out, "|{:<16}: {:<10}|", "battery", battery)?;
        writeln!(self.out, "|{:<16}: {:<10}|", "range cm", range)?;
        writeln!(self.out, "|{:<16}: {:<10}|", "encoder deg", encoder)?;
        writeln!(
            self.out,
            "|{:<16}: {:<10}|",
            "phase",
            format!("{} #{}", s.phase, s.side_index)
        )?;
        writeln!(self.out, "|{:<16}: {:<10}|", "sides", sides)?;
        writeln!(self.out, "|{:<16}: {:<10}|", "tally", s.tally)?;
        writeln!(self.out, "|{:<16}: {:<10}|", "error tally", s.error_tally)?;
        for fault in &s.faults {
            writeln!(self.out, "| ! {}", fault)?;
        }
        Ok(())
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn report(&mut self, snapshot: &SurveySnapshot) {
        if let Err(e) = self.render(snapshot) {
            tracing::warn!("Failed to write telemetry: {}", e);
        }
    }

    fn finish(&mut self, report: &SurveyReport) {
        let written = match report.result {
            Some(result) => {
                let note = if result.degenerate {
                    "  (degenerate)"
                } else {
                    ""
                };
                writeln!(
                    self.out,
                    "perimeter {:.2}  area {:.2}{}",
                    result.perimeter, result.area, note
                )
            }
            None => writeln!(
                self.out,
                "survey ended in {} after {} ticks",
                report.phase, report.ticks
            ),
        };
        if let Err(e) = written {
            tracing::warn!("Failed to write telemetry: {}", e);
        }
    }
}
