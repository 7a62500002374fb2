//! Centralized environment variable registry.
//!
//! Single source of truth for every environment variable deskreport reads.
//! It is consumed by:
//! - `Config::load` for the legacy credential variables
//! - the `env` subcommand, which prints this table
//!
//! Structured settings use the `DESKREPORT_` prefix with `__` separator for
//! nested config paths (e.g., `DESKREPORT_NOTES__PAGE_SIZE`). Credentials keep
//! the short names the reporting scripts have always used.

use std::fmt::Write as _;

pub const API_USERNAME: &str = "API_USERNAME";
pub const API_PASSWORD: &str = "API_PASSWORD";
pub const COMPANY_NAME: &str = "COMPANY_NAME";
pub const SERVER_URL: &str = "SERVER_URL";
pub const ASSET_API_TOKEN: &str = "ASSET_API_TOKEN";
pub const ASSET_SERVER_URL: &str = "ASSET_SERVER_URL";

/// An environment variable definition
#[derive(Debug, Clone)]
pub struct EnvVar {
    /// Environment variable name (e.g., "API_USERNAME")
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Category for grouping in output
    pub category: EnvVarCategory,
    /// Whether this variable is required by its pipeline
    pub required: bool,
    /// Default value if not set
    pub default: Option<&'static str>,
    /// Example value for documentation
    pub example: Option<&'static str>,
}

/// Categories for organizing environment variables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnvVarCategory {
    /// Helpdesk ticketing API (notes report)
    ServiceDesk,
    /// RMM asset inventory API (agent count)
    AssetInventory,
    /// Logging configuration
    Logging,
}

impl EnvVarCategory {
    /// Display name for this category
    pub fn display_name(&self) -> &'static str {
        match self {
            EnvVarCategory::ServiceDesk => "Service Desk",
            EnvVarCategory::AssetInventory => "Asset Inventory",
            EnvVarCategory::Logging => "Logging",
        }
    }

    /// All categories in display order
    pub fn all() -> &'static [EnvVarCategory] {
        &[
            EnvVarCategory::ServiceDesk,
            EnvVarCategory::AssetInventory,
            EnvVarCategory::Logging,
        ]
    }
}

/// Static registry of all documented environment variables
pub static ENV_VARS: &[EnvVar] = &[
    // === Service Desk ===
    EnvVar {
        name: API_USERNAME,
        description: "Username exchanged for a bearer token",
        category: EnvVarCategory::ServiceDesk,
        required: true,
        default: None,
        example: Some("jdoe"),
    },
    EnvVar {
        name: API_PASSWORD,
        description: "Password exchanged for a bearer token",
        category: EnvVarCategory::ServiceDesk,
        required: true,
        default: None,
        example: None,
    },
    EnvVar {
        name: COMPANY_NAME,
        description: "Tenant (company name) sent with the credentials",
        category: EnvVarCategory::ServiceDesk,
        required: true,
        default: None,
        example: Some("Acme"),
    },
    EnvVar {
        name: SERVER_URL,
        description: "Base URL of the helpdesk API",
        category: EnvVarCategory::ServiceDesk,
        required: true,
        default: None,
        example: Some("https://api.bms.kaseya.com"),
    },
    EnvVar {
        name: "DESKREPORT_NOTES__LOOKBACK_DAYS",
        description: "Days of recent activity included in the notes report",
        category: EnvVarCategory::ServiceDesk,
        required: false,
        default: Some("30"),
        example: Some("7"),
    },
    EnvVar {
        name: "DESKREPORT_NOTES__PAGE_SIZE",
        description: "Tickets requested per search page",
        category: EnvVarCategory::ServiceDesk,
        required: false,
        default: Some("100"),
        example: Some("50"),
    },
    EnvVar {
        name: "DESKREPORT_NOTES__OUTPUT",
        description: "CSV file the filtered notes are written to",
        category: EnvVarCategory::ServiceDesk,
        required: false,
        default: Some("filtered_notes.csv"),
        example: Some("/tmp/notes.csv"),
    },
    // === Asset Inventory ===
    EnvVar {
        name: ASSET_API_TOKEN,
        description: "Bearer token for the asset inventory API",
        category: EnvVarCategory::AssetInventory,
        required: true,
        default: None,
        example: None,
    },
    EnvVar {
        name: ASSET_SERVER_URL,
        description: "Base URL of the RMM server (port and API path are appended)",
        category: EnvVarCategory::AssetInventory,
        required: true,
        default: None,
        example: Some("https://saas44.kaseya.net"),
    },
    EnvVar {
        name: "DESKREPORT_AGENTS__PORT",
        description: "Port appended to the RMM server URL",
        category: EnvVarCategory::AssetInventory,
        required: false,
        default: Some("443"),
        example: Some("8443"),
    },
    EnvVar {
        name: "DESKREPORT_AGENTS__PAGE_SIZE",
        description: "Assets requested per page ($top)",
        category: EnvVarCategory::AssetInventory,
        required: false,
        default: Some("100"),
        example: Some("250"),
    },
    EnvVar {
        name: "DESKREPORT_AGENTS__OUTPUT",
        description: "JSON file the raw asset list is written to",
        category: EnvVarCategory::AssetInventory,
        required: false,
        default: Some("response.json"),
        example: Some("/tmp/assets.json"),
    },
    // === Logging ===
    EnvVar {
        name: "DESKREPORT_LOGGING__LEVEL",
        description: "Log level filter (trace, debug, info, warn, error)",
        category: EnvVarCategory::Logging,
        required: false,
        default: Some("info"),
        example: Some("debug"),
    },
    EnvVar {
        name: "RUST_LOG",
        description: "Full tracing filter directive; overrides the configured level",
        category: EnvVarCategory::Logging,
        required: false,
        default: None,
        example: Some("deskreport=debug,reqwest=info"),
    },
];

/// Get all environment variables for a given category
pub fn env_vars_for_category(category: EnvVarCategory) -> impl Iterator<Item = &'static EnvVar> {
    ENV_VARS.iter().filter(move |v| v.category == category)
}

/// Get environment variables grouped by category
pub fn env_vars_by_category() -> Vec<(EnvVarCategory, Vec<&'static EnvVar>)> {
    EnvVarCategory::all()
        .iter()
        .map(|cat| {
            let vars: Vec<&EnvVar> = env_vars_for_category(*cat).collect();
            (*cat, vars)
        })
        .filter(|(_, vars)| !vars.is_empty())
        .collect()
}

/// Render the registry as plain text for the `env` subcommand
pub fn render_table() -> String {
    let mut out = String::new();
    for (category, vars) in env_vars_by_category() {
        let _ = writeln!(out, "{}:", category.display_name());
        for var in vars {
            let marker = if var.required { " (required)" } else { "" };
            let _ = writeln!(out, "  {}{}", var.name, marker);
            let _ = writeln!(out, "      {}", var.description);
            if let Some(default) = var.default {
                let _ = writeln!(out, "      default: {default}");
            }
            if let Some(example) = var.example {
                let _ = writeln!(out, "      example: {example}");
            }
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_env_vars_have_descriptions() {
        for var in ENV_VARS {
            assert!(
                !var.description.is_empty(),
                "EnvVar {} has empty description",
                var.name
            );
        }
    }

    #[test]
    fn test_structured_vars_use_prefix() {
        for var in ENV_VARS.iter().filter(|v| v.name.contains("__")) {
            assert!(
                var.name.starts_with("DESKREPORT_"),
                "EnvVar {} does not have DESKREPORT_ prefix",
                var.name
            );
        }
    }

    #[test]
    fn test_required_vars_have_no_default() {
        for var in ENV_VARS.iter().filter(|v| v.required) {
            assert!(var.default.is_none(), "{} is required but has a default", var.name);
        }
    }

    #[test]
    fn test_env_vars_by_category() {
        let grouped = env_vars_by_category();
        assert_eq!(grouped.len(), 3);

        let desk = grouped
            .iter()
            .find(|(cat, _)| *cat == EnvVarCategory::ServiceDesk)
            .map(|(_, vars)| vars.iter().map(|v| v.name).collect::<Vec<_>>())
            .unwrap();
        assert!(desk.contains(&API_USERNAME));
        assert!(desk.contains(&SERVER_URL));
    }

    #[test]
    fn test_render_table_marks_required() {
        let table = render_table();
        assert!(table.contains("Service Desk:"));
        assert!(table.contains("API_PASSWORD (required)"));
        assert!(table.contains("default: response.json"));
    }
}
