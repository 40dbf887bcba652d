//! Doctor command for system diagnostics
//!
//! Checks configuration, the knowledge base file, the completion
//! credential and the completion service.

use colored::*;
use std::time::Duration;

use crate::config::Config;
use crate::knowledge::load_knowledge_base;
use crate::models::GeminiClient;

/// Health check result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Pass,
    Warn(String),
    Fail(String),
}

/// Individual health check
#[derive(Debug)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
}

impl HealthCheck {
    fn new(name: &str, status: HealthStatus) -> Self {
        Self {
            name: name.to_string(),
            status,
        }
    }
}

/// Doctor diagnostics system
pub struct Doctor {
    config: Config,
}

impl Doctor {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run all health checks
    pub async fn run_diagnostics(&self) -> Vec<HealthCheck> {
        let mut checks = vec![
            self.check_config(),
            self.check_knowledge_base(),
            self.check_credential(),
        ];

        checks.push(self.check_completion_service().await);
        checks
    }

    /// Check 1: configuration values
    fn check_config(&self) -> HealthCheck {
        match self.config.validate() {
            Ok(()) => HealthCheck::new("Configuration", HealthStatus::Pass),
            Err(e) => HealthCheck::new("Configuration", HealthStatus::Fail(e.to_string())),
        }
    }

    /// Check 2: knowledge base file present and well-formed
    fn check_knowledge_base(&self) -> HealthCheck {
        let path = self.config.knowledge_base_path();
        if !path.is_file() {
            return HealthCheck::new(
                "Knowledge Base",
                HealthStatus::Warn(format!("{} not found; sessions start empty", path.display())),
            );
        }

        match load_knowledge_base(&path) {
            Ok(kb) if kb.is_empty() => {
                HealthCheck::new("Knowledge Base", HealthStatus::Warn("No surgeries defined".to_string()))
            }
            Ok(kb) => {
                tracing::debug!(
                    surgeries = kb.surgeries.len(),
                    complications = kb.complication_count(),
                    "Knowledge base check"
                );
                HealthCheck::new("Knowledge Base", HealthStatus::Pass)
            }
            Err(e) => HealthCheck::new("Knowledge Base", HealthStatus::Fail(e.to_string())),
        }
    }

    /// Check 3: API key resolvable
    fn check_credential(&self) -> HealthCheck {
        match self.config.api_key() {
            Ok(_) => HealthCheck::new("API Key", HealthStatus::Pass),
            Err(e) => HealthCheck::new("API Key", HealthStatus::Fail(e.to_string())),
        }
    }

    /// Check 4: completion service reachable with the configured model
    async fn check_completion_service(&self) -> HealthCheck {
        let Ok(api_key) = self.config.api_key() else {
            return HealthCheck::new(
                "Completion Service",
                HealthStatus::Warn("Skipped: no API key".to_string()),
            );
        };

        let client = match GeminiClient::with_config(
            &self.config.llm.base_url,
            &self.config.llm.model,
            api_key,
            self.config.llm.temperature,
            Duration::from_secs(5),
        ) {
            Ok(client) => client,
            Err(e) => return HealthCheck::new("Completion Service", HealthStatus::Fail(e.to_string())),
        };

        match client.health_check().await {
            Ok(true) => HealthCheck::new("Completion Service", HealthStatus::Pass),
            _ => HealthCheck::new(
                "Completion Service",
                HealthStatus::Fail(format!(
                    "Model '{}' not reachable at {}",
                    client.model(),
                    client.base_url()
                )),
            ),
        }
    }

    /// Display diagnostics results
    pub fn display_results(checks: &[HealthCheck]) {
        println!("\n{}\n", "surgassist System Diagnostics".bold().cyan());
        println!("{:<20} Status", "Check");
        println!("{}", "=".repeat(50));

        for check in checks {
            let message = match &check.status {
                HealthStatus::Pass => "PASS".green().to_string(),
                HealthStatus::Warn(msg) => format!("WARN: {}", msg).yellow().to_string(),
                HealthStatus::Fail(msg) => format!("FAIL: {}", msg).red().to_string(),
            };

            println!("{:<20} {}", check.name, message);
        }

        println!();
    }

    /// Get overall health status
    pub fn overall_status(checks: &[HealthCheck]) -> bool {
        !checks.iter().any(|c| matches!(c.status, HealthStatus::Fail(_)))
    }
}
