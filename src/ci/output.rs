use crate::cli::WorkflowResult;
use crate::error::{ReleaseError, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Environment variable naming the file step outputs are appended to
pub const OUTPUT_FILE_ENV: &str = "GITHUB_OUTPUT";

static DELIMITER_SEQ: AtomicUsize = AtomicUsize::new(0);

/// Named key/value outputs consumed by later workflow steps.
///
/// Outputs are appended to the `GITHUB_OUTPUT` file when one is configured,
/// otherwise printed as `name=value` lines on stdout.
#[derive(Debug, Clone, Default)]
pub struct ActionOutputs {
    path: Option<PathBuf>,
}

impl ActionOutputs {
    pub fn from_env() -> Self {
        ActionOutputs {
            path: std::env::var_os(OUTPUT_FILE_ENV)
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
        }
    }

    pub fn to_file(path: impl Into<PathBuf>) -> Self {
        ActionOutputs {
            path: Some(path.into()),
        }
    }

    pub fn stdout() -> Self {
        ActionOutputs { path: None }
    }

    pub fn set(&self, name: &str, value: &str) -> Result<()> {
        if name.is_empty() || name.contains(['=', '\n', '\r']) {
            return Err(ReleaseError::config(format!(
                "invalid output name '{}'",
                name
            )));
        }

        match &self.path {
            Some(path) => {
                let mut file = OpenOptions::new().create(true).append(true).open(path)?;
                file.write_all(format_output(name, value).as_bytes())?;
            }
            None => println!("{}={}", name, value.replace('\n', "%0A")),
        }
        Ok(())
    }

    /// Publish the outputs of a workflow run.
    ///
    /// `release_url` and `release_id` are only set when a release was
    /// created.
    pub fn write_result(&self, result: &WorkflowResult) -> Result<()> {
        let plan = &result.plan;
        self.set("version", &plan.draft.version)?;
        self.set(
            "previous_version",
            plan.previous_tag.as_ref().map_or("", |t| t.name.as_str()),
        )?;
        self.set("bump", plan.bump.as_str())?;
        self.set("release_body", &plan.draft.body)?;
        self.set(
            "published",
            if result.published.is_some() { "true" } else { "false" },
        )?;
        if let Some(record) = &result.published {
            self.set("release_url", &record.html_url)?;
            self.set("release_id", &record.id.to_string())?;
        }
        Ok(())
    }
}

/// Render one output entry in the file command format, using the
/// heredoc form for multi-line values.
pub fn format_output(name: &str, value: &str) -> String {
    if !value.contains('\n') && !value.contains('\r') {
        return format!("{}={}\n", name, value);
    }

    let mut delimiter;
    loop {
        delimiter = format!(
            "ghadelimiter_{}_{}",
            std::process::id(),
            DELIMITER_SEQ.fetch_add(1, Ordering::Relaxed)
        );
        if !value.contains(&delimiter) {
            break;
        }
    }
    format!("{}<<{}\n{}\n{}\n", name, delimiter, value, delimiter)
}
