// src/render.rs
use async_trait::async_trait;
use chrono::Local;
use std::{
    path::{Path, PathBuf},
    process::Stdio,
    time::Duration,
};
use tokio::{fs, process::Command};

use crate::{errors::RenderError, tree::FamilyGraph};

/// Turns a family graph into PNG bytes.
#[async_trait]
pub trait TreeRenderer: Send + Sync {
    async fn render_png(&self, graph: &FamilyGraph) -> Result<Vec<u8>, RenderError>;
}

/// Renders through the Graphviz `dot` binary inside a scratch directory.
pub struct GraphvizRenderer {
    dot_bin: String,
    timeout: Duration,
    scratch_root: PathBuf,
}

impl GraphvizRenderer {
    pub fn new(dot_bin: impl Into<String>, timeout: Duration) -> Self {
        Self {
            dot_bin: dot_bin.into(),
            timeout,
            scratch_root: std::env::temp_dir(),
        }
    }

    pub fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = root.into();
        self
    }

    async fn run_dot(&self, input: &Path, output: &Path) -> Result<(), RenderError> {
        let child = Command::new(&self.dot_bin)
            .arg("-Tpng")
            .arg("-o")
            .arg(output)
            .arg(input)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| RenderError::Spawn {
                bin: self.dot_bin.clone(),
                source,
            })?;

        let result = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| RenderError::Timeout(self.timeout.as_secs()))??;

        if !result.status.success() {
            return Err(RenderError::Failed {
                status: result.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl TreeRenderer for GraphvizRenderer {
    async fn render_png(&self, graph: &FamilyGraph) -> Result<Vec<u8>, RenderError> {
        // TempDir dihapus otomatis saat keluar scope, termasuk saat error
        let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        let scratch = tempfile::Builder::new()
            .prefix(&format!("family_tree_{}_", timestamp))
            .tempdir_in(&self.scratch_root)?;

        let base = scratch.path().join(format!("family_tree_{}", timestamp));
        let input = base.with_extension("dot");
        let output = base.with_extension("png");

        fs::write(&input, graph.to_dot()).await?;
        self.run_dot(&input, &output).await?;

        if !fs::try_exists(&output).await.unwrap_or(false) {
            return Err(RenderError::MissingOutput(output));
        }
        let bytes = fs::read(&output).await?;

        log::debug!(
            "family tree dirender: {} node, {} edge, {} byte",
            graph.nodes.len(),
            graph.edges.len(),
            bytes.len()
        );
        Ok(bytes)
    }
}
