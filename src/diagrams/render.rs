use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::process::Command;

use super::{graphviz, DiagramKind};
use crate::models::Network;

/// Rendered image files for one diagram variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramFiles {
    pub png: PathBuf,
    pub svg: PathBuf,
}

impl DiagramFiles {
    pub fn path(&self, format: ImageFormat) -> &Path {
        match format {
            ImageFormat::Png => &self.png,
            ImageFormat::Svg => &self.svg,
        }
    }

    /// Best-effort removal of the images and the DOT source next to them
    pub async fn remove(&self) {
        for path in [&self.png, &self.svg, &self.png.with_extension("dot")] {
            if let Err(e) = tokio::fs::remove_file(path).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!("Failed to remove {}: {}", path.display(), e);
                }
            }
        }
    }
}

/// Output image format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Svg,
}

impl ImageFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "png" => Some(ImageFormat::Png),
            "svg" => Some(ImageFormat::Svg),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Svg => "image/svg+xml",
        }
    }
}

/// Turns DOT source into image files
#[async_trait]
pub trait DiagramRenderer: Send + Sync {
    async fn render(&self, config_id: &str, kind: DiagramKind, dot: &str) -> Result<DiagramFiles>;
}

/// Renderer backed by the Graphviz `dot` executable
pub struct GraphvizRenderer {
    output_dir: PathBuf,
    dot_binary: String,
}

impl GraphvizRenderer {
    pub fn new(output_dir: impl Into<PathBuf>, dot_binary: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            dot_binary: dot_binary.into(),
        }
    }

    async fn run_dot(&self, format: ImageFormat, source: &Path, target: &Path) -> Result<()> {
        let output = Command::new(&self.dot_binary)
            .arg(format!("-T{}", format.as_str()))
            .arg("-o")
            .arg(target)
            .arg(source)
            .output()
            .await
            .with_context(|| format!("Failed to run {}", self.dot_binary))?;

        if !output.status.success() {
            bail!(
                "{} -T{} exited with {}: {}",
                self.dot_binary,
                format.as_str(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(())
    }
}

#[async_trait]
impl DiagramRenderer for GraphvizRenderer {
    async fn render(&self, config_id: &str, kind: DiagramKind, dot: &str) -> Result<DiagramFiles> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .with_context(|| format!("Failed to create {}", self.output_dir.display()))?;

        let stem = format!("{}_{}", config_id, kind);
        let source = self.output_dir.join(format!("{}.dot", stem));
        tokio::fs::write(&source, dot)
            .await
            .with_context(|| format!("Failed to write {}", source.display()))?;

        let files = DiagramFiles {
            png: self.output_dir.join(format!("{}.png", stem)),
            svg: self.output_dir.join(format!("{}.svg", stem)),
        };
        self.run_dot(ImageFormat::Png, &source, &files.png).await?;
        self.run_dot(ImageFormat::Svg, &source, &files.svg).await?;
        Ok(files)
    }
}

/// Render every diagram variant for a network. A variant that fails to render
/// is logged and left out of the result.
pub async fn render_all(
    renderer: &dyn DiagramRenderer,
    config_id: &str,
    network: &Network,
) -> BTreeMap<DiagramKind, DiagramFiles> {
    let mut rendered = BTreeMap::new();
    for kind in DiagramKind::ALL {
        let dot = graphviz::generate(kind, network);
        match renderer.render(config_id, kind, &dot).await {
            Ok(files) => {
                rendered.insert(kind, files);
            }
            Err(e) => {
                tracing::warn!("Failed to render {} diagram for {}: {:#}", kind, config_id, e);
            }
        }
    }
    rendered
}
