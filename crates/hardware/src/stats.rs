//! Reorder buffer statistics collection and reporting.
//!
//! This module tracks what the core did across a run. It provides:
//! 1. **Throughput:** Cycles, dispatched and committed instructions, and derived IPC.
//! 2. **Occupancy:** Peak and average number of in-flight instructions.
//! 3. **Hazards:** Dispatch stalls (full buffer, unresolved branch) and forwarded operands.
//! 4. **Anomalies:** Stale completions, flushes, resets and protocol violations.

use std::time::Instant;

/// Counters accumulated by [`Rob::tick`](crate::core::Rob::tick).
#[derive(Clone, Debug)]
pub struct RobStats {
    start_time: Instant,
    /// Cycles stepped.
    pub cycles: u64,
    /// Instructions admitted into the buffer.
    pub dispatched: u64,
    /// Write-back reports merged into an occupied slot.
    pub completions: u64,
    /// Write-back reports dropped because their slot was not occupied.
    pub stale_completions: u64,
    /// Instructions retired from the head.
    pub committed: u64,
    /// Cycles with the flush input asserted.
    pub flushes: u64,
    /// Cycles with the reset input asserted.
    pub resets: u64,
    /// Cycles a valid candidate was held because only the slack slot remained.
    pub stalls_full: u64,
    /// Cycles a valid candidate was held behind an unresolved branch.
    pub stalls_branch: u64,
    /// Source operands satisfied by same-cycle forwarding.
    pub operands_forwarded: u64,
    /// Protocol violations reported.
    pub violations: u64,
    /// Highest occupancy observed at the start of a cycle.
    pub peak_occupancy: usize,
    /// Sum of start-of-cycle occupancy over all cycles.
    pub occupancy_sum: u64,
}

impl Default for RobStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            dispatched: 0,
            completions: 0,
            stale_completions: 0,
            committed: 0,
            flushes: 0,
            resets: 0,
            stalls_full: 0,
            stalls_branch: 0,
            operands_forwarded: 0,
            violations: 0,
            peak_occupancy: 0,
            occupancy_sum: 0,
        }
    }
}

/// Section names for selective stats output.
///
/// Valid section identifiers: `"summary"`, `"occupancy"`, `"hazards"`.
/// Pass an empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "occupancy", "hazards"];

impl RobStats {
    /// Committed instructions per cycle.
    pub fn ipc(&self) -> f64 {
        if self.cycles == 0 {
            0.0
        } else {
            self.committed as f64 / self.cycles as f64
        }
    }

    /// Mean start-of-cycle occupancy.
    pub fn average_occupancy(&self) -> f64 {
        if self.cycles == 0 {
            0.0
        } else {
            self.occupancy_sum as f64 / self.cycles as f64
        }
    }

    /// Prints only the requested statistics sections to stdout.
    ///
    /// Each element of `sections` should be one of [`STATS_SECTIONS`]. Pass an empty slice
    /// to print all sections (same as `print()`).
    pub fn print_sections(&self, sections: &[String]) {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let seconds = self.start_time.elapsed().as_secs_f64();
        let cyc = self.cycles.max(1) as f64;

        if want("summary") {
            let khz = if seconds > 0.0 {
                (self.cycles as f64 / seconds) / 1000.0
            } else {
                0.0
            };
            println!("\n==========================================================");
            println!("REORDER BUFFER STATISTICS");
            println!("==========================================================");
            println!("host_seconds             {seconds:.4} s");
            println!("sim_cycles               {}", self.cycles);
            println!("sim_freq                 {khz:.2} kHz");
            println!("rob.dispatched           {}", self.dispatched);
            println!("rob.committed            {}", self.committed);
            println!("rob.ipc                  {:.4}", self.ipc());
            println!("----------------------------------------------------------");
        }
        if want("occupancy") {
            println!("OCCUPANCY");
            println!("  occupancy.peak         {}", self.peak_occupancy);
            println!("  occupancy.avg          {:.2}", self.average_occupancy());
            println!("  flushes                {}", self.flushes);
            println!("  resets                 {}", self.resets);
            println!("----------------------------------------------------------");
        }
        if want("hazards") {
            println!("HAZARDS");
            println!(
                "  stalls.full            {} ({:.2}%)",
                self.stalls_full,
                (self.stalls_full as f64 / cyc) * 100.0
            );
            println!(
                "  stalls.branch          {} ({:.2}%)",
                self.stalls_branch,
                (self.stalls_branch as f64 / cyc) * 100.0
            );
            println!("  operands.forwarded     {}", self.operands_forwarded);
            println!("  completions            {}", self.completions);
            println!("  completions.stale      {}", self.stale_completions);
            println!("  protocol.violations    {}", self.violations);
        }
        println!("==========================================================");
    }

    /// Prints all statistics sections to stdout.
    ///
    /// Equivalent to `print_sections(&[])`.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}
