//
//  bucket-cloner
//  output/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Output Module
//!
//! Human-readable text for the terminal, or JSON with `--json` for scripts.
//!
//! - [`OutputFormat`]: The available output formats
//! - [`OutputWriter`]: Entry point for writing records and status messages
//! - [`TextOutput`]: Trait for records that have a one-line text rendering
//!
//! Records go to stdout; warnings and errors go to stderr so that the
//! listing stays pipeable.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub struct OutputWriter {
    format: OutputFormat,
    color: bool,
}

impl OutputWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            color: console::colors_enabled(),
        }
    }

    /// Text or JSON depending on the `--json` flag.
    pub fn from_json_flag(json: bool) -> Self {
        Self::new(if json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        })
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    pub fn color_enabled(&self) -> bool {
        self.color
    }

    pub fn write_list<T: Serialize + TextOutput>(&self, values: &[T]) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(values)?);
            }
            OutputFormat::Text => {
                for value in values {
                    println!("{}", value.to_text(self.color));
                }
            }
        }
        Ok(())
    }

    /// Writes any serializable value as pretty JSON.
    pub fn write_json<T: Serialize + ?Sized>(&self, value: &T) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    pub fn write_error(&self, msg: &str) {
        use console::style;
        if self.color {
            eprintln!("{} {}", style("error:").red().bold(), msg);
        } else {
            eprintln!("error: {}", msg);
        }
    }

    pub fn write_warning(&self, msg: &str) {
        use console::style;
        if self.color {
            eprintln!("{} {}", style("warning:").yellow().bold(), msg);
        } else {
            eprintln!("warning: {}", msg);
        }
    }

    pub fn write_info(&self, msg: &str) {
        if !self.is_json() {
            println!("{}", msg);
        }
    }

    pub fn write_success(&self, msg: &str) {
        use console::style;
        if self.is_json() {
            return;
        }
        if self.color {
            println!("{} {}", style("✓").green().bold(), msg);
        } else {
            println!("✓ {}", msg);
        }
    }
}

/// One-line text rendering of a record.
pub trait TextOutput {
    fn to_text(&self, color: bool) -> String;
}

impl TextOutput for crate::api::cloud::Workspace {
    fn to_text(&self, color: bool) -> String {
        if !color {
            return self.to_string();
        }
        let mut line = format!(
            "{} ({})",
            console::style(&self.name).bold(),
            console::style(&self.slug).cyan()
        );
        if let Some(url) = &self.url {
            line.push_str(&format!(" - {}", console::style(url).dim()));
        }
        line
    }
}

impl TextOutput for crate::api::cloud::Project {
    fn to_text(&self, color: bool) -> String {
        if !color {
            return format!("  {}", self);
        }
        let mut line = format!("  {} ({})", self.name, console::style(&self.key).cyan());
        if let Some(url) = &self.url {
            line.push_str(&format!(" - {}", console::style(url).dim()));
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::cloud::{Project, Workspace};

    #[test]
    fn test_plain_workspace_line() {
        let ws = Workspace {
            slug: "acme".into(),
            name: "Acme".into(),
            url: Some("https://bitbucket.org/acme/".into()),
        };
        assert_eq!(ws.to_text(false), "Acme (acme) - https://bitbucket.org/acme/");
    }

    #[test]
    fn test_project_line_is_indented() {
        let project = Project {
            key: "CORE".into(),
            name: "Core".into(),
            url: None,
        };
        assert_eq!(project.to_text(false), "  Core (CORE)");
    }

    #[test]
    fn test_format_from_flag() {
        assert!(OutputWriter::from_json_flag(true).is_json());
        assert!(!OutputWriter::from_json_flag(false).is_json());
    }
}
