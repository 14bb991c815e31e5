use anyhow::{anyhow, Context};
use async_trait::async_trait;
use std::io::Cursor;
use std::path::Path;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use super::interface::OcrEngine;
use crate::config::OcrConfig;
use crate::error::ExtractionError;

/// OCR through the `tesseract` command line tool.
///
/// The upload is decoded with `image` first, so corrupt or unsupported files
/// fail before the engine is started, and handed over as PNG on stdin.
#[derive(Debug, Clone)]
pub struct TesseractCli {
    binary: String,
    page_seg_mode: u32,
}

impl TesseractCli {
    pub fn new(config: &OcrConfig) -> Self {
        Self {
            binary: config.binary.clone(),
            page_seg_mode: config.page_seg_mode,
        }
    }

    fn args(&self, language_hint: &str) -> Vec<String> {
        vec![
            "stdin".to_string(),
            "stdout".to_string(),
            "-l".to_string(),
            language_hint.to_string(),
            "--psm".to_string(),
            self.page_seg_mode.to_string(),
        ]
    }

    /// First line of `tesseract --version`; fails when the binary is missing
    pub async fn version(&self) -> anyhow::Result<String> {
        let output = Command::new(&self.binary)
            .arg("--version")
            .output()
            .await
            .with_context(|| format!("failed to run {} --version (is it installed?)", self.binary))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("{} --version failed: {}", self.binary, stderr.trim()));
        }
        // Older releases print the version on stderr
        let text = if output.stdout.is_empty() { &output.stderr } else { &output.stdout };
        Ok(String::from_utf8_lossy(text)
            .lines()
            .next()
            .unwrap_or_default()
            .trim()
            .to_string())
    }

    pub async fn list_languages(&self) -> anyhow::Result<Vec<String>> {
        let output = Command::new(&self.binary)
            .arg("--list-langs")
            .output()
            .await
            .with_context(|| format!("failed to run {} --list-langs", self.binary))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("{} --list-langs failed: {}", self.binary, stderr.trim()));
        }
        Ok(parse_language_list(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Skip the "List of available languages" header, keep one name per line
fn parse_language_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .skip(1)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn encode_png(path: &Path) -> Result<Vec<u8>, ExtractionError> {
    let bytes = std::fs::read(path)?;
    let image = image::load_from_memory(&bytes)?;
    let mut png = Cursor::new(Vec::new());
    image.write_to(&mut png, image::ImageFormat::Png)?;
    Ok(png.into_inner())
}

#[async_trait]
impl OcrEngine for TesseractCli {
    async fn recognize(&self, path: &Path, language_hint: &str) -> Result<String, ExtractionError> {
        let source = path.to_path_buf();
        let png = tokio::task::spawn_blocking(move || encode_png(&source)).await??;
        debug!(
            "Running {} on {} ({} bytes, lang={})",
            self.binary,
            path.display(),
            png.len(),
            language_hint
        );

        let mut child = Command::new(&self.binary)
            .args(self.args(language_hint))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| ExtractionError::Ocr("stdin of OCR process unavailable".to_string()))?;
        // Feed stdin while output is collected so neither pipe can fill up
        let writer = tokio::spawn(async move {
            stdin.write_all(&png).await?;
            stdin.shutdown().await
        });

        let output = child.wait_with_output().await?;
        let written = writer.await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractionError::Ocr(format!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                stderr.trim()
            )));
        }
        if let Err(e) = written {
            // The engine may finish without draining its input
            debug!("OCR process closed stdin early: {}", e);
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
