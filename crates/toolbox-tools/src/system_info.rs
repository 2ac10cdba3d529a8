//! `system_info` tool.
//!
//! Memory and uptime come from `/proc` on Linux. Other platforms report
//! zero for those fields.

use std::fs;

use async_trait::async_trait;
use serde::Serialize;

use toolbox_protocol::mcp::tools::ToolsCallResult;
use toolbox_protocol::{InputSchema, ValidatedArgs};
use toolbox_registry::{ToolError, ToolHandler};

/// Snapshot of the host environment.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
    pub platform: String,
    pub release: String,
    pub arch: String,
    pub cpu_count: usize,
    pub total_memory: String,
    pub free_memory: String,
    pub uptime: String,
}

impl SystemInfo {
    /// Collects the current values.
    pub fn collect() -> Self {
        let meminfo = fs::read_to_string("/proc/meminfo").unwrap_or_default();
        let total = meminfo_bytes(&meminfo, "MemTotal").unwrap_or(0);
        let free = meminfo_bytes(&meminfo, "MemAvailable")
            .or_else(|| meminfo_bytes(&meminfo, "MemFree"))
            .unwrap_or(0);
        let uptime_secs = fs::read_to_string("/proc/uptime")
            .ok()
            .and_then(|s| parse_uptime(&s))
            .unwrap_or(0.0);

        Self {
            platform: std::env::consts::OS.to_string(),
            release: fs::read_to_string("/proc/sys/kernel/osrelease")
                .map(|s| s.trim().to_string())
                .unwrap_or_else(|_| "unknown".to_string()),
            arch: std::env::consts::ARCH.to_string(),
            cpu_count: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            total_memory: format_gb(total),
            free_memory: format_gb(free),
            uptime: format!("{:.2} hours", uptime_secs / 3600.0),
        }
    }
}

/// Reads a `Key:   1234 kB` line from `/proc/meminfo` as bytes.
fn meminfo_bytes(meminfo: &str, key: &str) -> Option<u64> {
    meminfo.lines().find_map(|line| {
        let rest = line.strip_prefix(key)?.strip_prefix(':')?;
        let kb: u64 = rest.split_whitespace().next()?.parse().ok()?;
        Some(kb * 1024)
    })
}

fn parse_uptime(contents: &str) -> Option<f64> {
    contents.split_whitespace().next()?.parse().ok()
}

fn format_gb(bytes: u64) -> String {
    format!("{:.2} GB", bytes as f64 / 1e9)
}

/// Reports platform, CPU, memory and uptime.
pub struct SystemInfoTool;

#[async_trait]
impl ToolHandler for SystemInfoTool {
    fn name(&self) -> &str {
        "system_info"
    }

    fn title(&self) -> &str {
        "System Info Tool"
    }

    fn description(&self) -> &str {
        "Provides information about the system environment."
    }

    fn input_schema(&self) -> InputSchema {
        InputSchema::empty()
    }

    async fn call(&self, _args: ValidatedArgs) -> Result<ToolsCallResult, ToolError> {
        let info = SystemInfo::collect();
        let text =
            serde_json::to_string_pretty(&info).map_err(|e| ToolError::invalid(e.to_string()))?;
        Ok(ToolsCallResult::text(text))
    }
}
