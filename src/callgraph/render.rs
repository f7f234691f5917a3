//! Hand-off of a DOT description to an external layout program.
//!
//! The layout engine turns the textual graph into PNG or SVG bytes. We only
//! pipe the description in and collect whatever it writes to stdout.

use crate::utils::config::DEFAULT_RENDERER;
use crate::utils::error::RenderError;
use log::{debug, info};
use std::io::Write;
use std::process::{Command, Stdio};

/// Raster/vector format requested from the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Svg,
}

impl ImageFormat {
    /// Format name understood by Graphviz's `-T` flag
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }
}

/// Something that can turn a DOT description into image bytes
pub trait GraphRenderer {
    fn render(&self, dot: &str, format: ImageFormat) -> Result<Vec<u8>, RenderError>;
}

/// Renders by running a Graphviz-compatible program (`dot -Tpng`)
#[derive(Debug, Clone)]
pub struct GraphvizRenderer {
    program: String,
}

impl Default for GraphvizRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_RENDERER)
    }
}

impl GraphvizRenderer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl GraphRenderer for GraphvizRenderer {
    fn render(&self, dot: &str, format: ImageFormat) -> Result<Vec<u8>, RenderError> {
        info!("Rendering {} with {}", format.as_str(), self.program);

        let mut child = Command::new(&self.program)
            .arg(format!("-T{}", format.as_str()))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| RenderError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        // Dropping stdin closes the pipe so the renderer sees EOF. A failed
        // write is reported only after the exit status, since a renderer that
        // quits early explains itself on stderr.
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(dot.as_bytes()),
            None => Ok(()),
        };

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(RenderError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        written?;

        debug!("Renderer produced {} bytes", output.stdout.len());
        Ok(output.stdout)
    }
}
