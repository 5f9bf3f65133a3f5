use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tracing::{debug, info};

use crate::config::{SlideConfig, ToolsConfig};
use crate::error::{Result, SlideError};
use crate::slides::SlideRenderer;
use crate::video::loader::list_sorted;

/// Renders a `.tex` slide with a DVI-producing compiler and a DVI rasterizer
/// (`latex` + `dvipng` by default)
#[derive(Debug, Clone)]
pub struct LatexRenderer {
    typesetter: String,
    rasterizer: String,
    dpi: u32,
}

impl LatexRenderer {
    pub fn new<S: Into<String>>(typesetter: S, rasterizer: S, dpi: u32) -> Self {
        Self {
            typesetter: typesetter.into(),
            rasterizer: rasterizer.into(),
            dpi,
        }
    }

    pub fn from_config(slides: &SlideConfig, tools: &ToolsConfig) -> Self {
        Self::new(tools.typesetter.clone(), tools.rasterizer.clone(), slides.dpi)
    }

    /// First `.tex` file of the folder in natural order
    pub fn find_source(source_dir: &Path) -> Result<PathBuf> {
        let sources = list_sorted(source_dir, |p| {
            p.extension().and_then(|e| e.to_str()).map(|e| e.eq_ignore_ascii_case("tex")).unwrap_or(false)
        })
        .map_err(|_| SlideError::NoSource { path: source_dir.display().to_string() })?;

        sources
            .into_iter()
            .next()
            .ok_or_else(|| SlideError::NoSource { path: source_dir.display().to_string() }.into())
    }

    fn typeset_args(&self, tex: &Path, out_dir: &Path) -> Vec<String> {
        vec![
            "-interaction=nonstopmode".to_string(),
            "-halt-on-error".to_string(),
            format!("-output-directory={}", out_dir.display()),
            tex.display().to_string(),
        ]
    }

    fn rasterize_args(&self, dvi: &Path, png: &Path) -> Vec<String> {
        vec![
            "-D".to_string(), self.dpi.to_string(),
            "-o".to_string(), png.display().to_string(),
            dvi.display().to_string(),
        ]
    }
}

/// Run an external tool to completion, mapping failures to [`SlideError`]
fn run_tool(program: &str, args: &[String], cwd: &Path, subject: &Path) -> Result<Output> {
    debug!("Running {} {} (in {:?})", program, args.join(" "), cwd);

    let output = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| SlideError::ToolMissing {
            tool: program.to_string(),
            reason: e.to_string(),
        })?;

    if !output.status.success() {
        // latex reports errors on stdout
        let mut log = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if log.is_empty() {
            log = String::from_utf8_lossy(&output.stdout).trim().to_string();
        }
        return Err(SlideError::ToolFailed {
            tool: program.to_string(),
            path: subject.display().to_string(),
            stderr: log,
        }
        .into());
    }

    Ok(output)
}

fn probe(program: &str) -> Result<()> {
    Command::new(program)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|_| ())
        .map_err(|e| SlideError::ToolMissing {
            tool: program.to_string(),
            reason: e.to_string(),
        }
        .into())
}

impl SlideRenderer for LatexRenderer {
    fn name(&self) -> &str {
        "latex"
    }

    fn render(&self, source_dir: &Path, out_dir: &Path) -> Result<PathBuf> {
        let tex = Self::find_source(source_dir)?;
        let tex = tex.canonicalize().unwrap_or(tex);
        let out_dir = out_dir.canonicalize()?;

        let stem = tex
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "slide".to_string());
        let dvi = out_dir.join(format!("{}.dvi", stem));
        let png = out_dir.join(format!("{}.png", stem));

        info!("Typesetting slide {:?}", tex);
        run_tool(&self.typesetter, &self.typeset_args(&tex, &out_dir), source_dir, &tex)?;

        run_tool(&self.rasterizer, &self.rasterize_args(&dvi, &png), &out_dir, &dvi)?;

        if !png.is_file() {
            return Err(SlideError::MissingOutput { path: png.display().to_string() }.into());
        }

        debug!("Slide rendered to {:?}", png);
        Ok(png)
    }

    fn check_tools(&self) -> Result<()> {
        probe(&self.typesetter)?;
        probe(&self.rasterizer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VideoMakerError;
    use tempfile::tempdir;

    #[test]
    fn test_find_source_picks_first_natural() {
        let dir = tempdir().unwrap();
        for name in ["slide10.tex", "slide2.tex", "notes.txt"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }

        let tex = LatexRenderer::find_source(dir.path()).unwrap();
        assert_eq!(tex.file_name().unwrap(), "slide2.tex");
    }

    #[test]
    fn test_find_source_missing() {
        let dir = tempdir().unwrap();
        let err = LatexRenderer::find_source(dir.path()).unwrap_err();
        assert!(matches!(err, VideoMakerError::Slide(SlideError::NoSource { .. })));

        let err = LatexRenderer::find_source(&dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, VideoMakerError::Slide(SlideError::NoSource { .. })));
    }

    #[test]
    fn test_tool_arguments() {
        let renderer = LatexRenderer::new("latex", "dvipng", 150);

        let args = renderer.typeset_args(Path::new("/src/intro.tex"), Path::new("/out"));
        assert!(args.contains(&"-output-directory=/out".to_string()));
        assert_eq!(args.last().unwrap(), "/src/intro.tex");

        let args = renderer.rasterize_args(Path::new("/out/intro.dvi"), Path::new("/out/intro.png"));
        assert_eq!(args, vec!["-D", "150", "-o", "/out/intro.png", "/out/intro.dvi"]);
    }

    #[test]
    fn test_missing_typesetter() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("intro.tex"), b"\\documentclass{article}").unwrap();
        let out = tempdir().unwrap();

        let renderer = LatexRenderer::new("videomaker-no-such-latex", "dvipng", 100);
        let err = renderer.render(dir.path(), out.path()).unwrap_err();
        assert!(matches!(err, VideoMakerError::Slide(SlideError::ToolMissing { .. })));
        assert!(renderer.check_tools().is_err());
    }
}
