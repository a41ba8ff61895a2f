//! Host-level CPU and memory sampling via sysinfo.

use sysinfo::System;

/// Snapshot of host utilization taken at the top of a loop iteration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SystemUtilization {
    pub cpu_percent: f64,
    pub memory_percent: f64,
}

/// Stateful sampler; sysinfo needs successive refreshes to report CPU
/// deltas, so one instance lives for the whole process.
pub struct SystemSampler {
    system: System,
}

impl SystemSampler {
    pub fn new() -> Self {
        let mut system = System::new_all();
        system.refresh_all();
        Self { system }
    }

    /// Refresh and read current CPU and memory utilization in percent.
    pub fn sample(&mut self) -> SystemUtilization {
        self.system.refresh_cpu_usage();
        self.system.refresh_memory();

        let cpus = self.system.cpus();
        let cpu_percent = if cpus.is_empty() {
            0.0
        } else {
            cpus.iter().map(|c| c.cpu_usage() as f64).sum::<f64>() / cpus.len() as f64
        };

        let total_memory = self.system.total_memory() as f64;
        let memory_percent = if total_memory > 0.0 {
            self.system.used_memory() as f64 / total_memory * 100.0
        } else {
            0.0
        };

        SystemUtilization {
            cpu_percent,
            memory_percent,
        }
    }
}

impl Default for SystemSampler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_reports_plausible_percentages() {
        let mut sampler = SystemSampler::new();
        let utilization = sampler.sample();

        assert!(utilization.cpu_percent >= 0.0);
        assert!((0.0..=100.0).contains(&utilization.memory_percent));
    }
}
