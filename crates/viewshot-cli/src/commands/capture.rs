//! One-shot capture command
//!
//! Handles `viewshot capture`: captures a frame through the platform render
//! source (or the mock) and writes it as a PNG file or prints it as base64.

use crate::app::AppContext;
use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::Local;
use clap::Args;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use viewshot_core::command::resolve_target;
use viewshot_core::{CaptureService, EncodedImage, RenderSourcePort};

#[derive(Args, Debug)]
pub struct CaptureArgs {
    /// Capture target: "scene" (viewport) or "display"
    #[arg(long)]
    pub target: Option<String>,

    /// Output file path (default: timestamped name in the working directory)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Print base64 to stdout instead of writing a file
    #[arg(long)]
    pub base64: bool,

    /// Use the in-memory mock source instead of the platform backend
    #[arg(long)]
    pub mock: bool,
}

/// Execute a one-shot capture
pub fn run(ctx: &AppContext, args: CaptureArgs) -> Result<()> {
    let target = args
        .target
        .clone()
        .or_else(|| Some(ctx.config.capture.default_target.clone()));
    let source = resolve_target(target.as_deref());
    let compression = ctx.config.capture.compression;

    let image = if args.mock {
        use viewshot_adapters::MockRenderSource;
        let service = CaptureService::new(Arc::new(MockRenderSource::with_viewport(800.0, 600.0)))
            .with_compression(compression);
        capture_with(&service, source)?
    } else {
        #[cfg(target_os = "macos")]
        {
            use viewshot_adapters::ScreenCaptureKitSource;
            let service = CaptureService::new(Arc::new(ScreenCaptureKitSource::new()))
                .with_compression(compression);
            capture_with(&service, source)?
        }

        #[cfg(not(target_os = "macos"))]
        {
            anyhow::bail!(
                "No platform capture backend on this OS; use --mock or run on macOS"
            );
        }
    };

    if args.base64 {
        println!("{}", BASE64.encode(&image.bytes));
        return Ok(());
    }

    let path = args
        .output
        .unwrap_or_else(|| PathBuf::from(format!("{}.png", Local::now().format("%Y%m%d-%H%M%S"))));
    fs::write(&path, &image.bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Capture successful!");
    println!("  File: {}", path.display());
    println!("  Size: {}", format_file_size(image.bytes.len() as u64));
    println!(
        "  Image: {}x{} {}",
        image.width,
        image.height,
        EncodedImage::FORMAT
    );

    Ok(())
}

fn capture_with<R: RenderSourcePort>(
    service: &CaptureService<R>,
    source: viewshot_core::CaptureSource,
) -> Result<EncodedImage> {
    service.capture(source).context("Failed to capture frame")
}

/// Format file size in human-readable form
fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_file_size_bytes() {
        assert_eq!(format_file_size(500), "500 bytes");
        assert_eq!(format_file_size(1023), "1023 bytes");
    }

    #[test]
    fn test_format_file_size_kb() {
        assert_eq!(format_file_size(1024), "1.00 KB");
        assert_eq!(format_file_size(1536), "1.50 KB");
    }

    #[test]
    fn test_format_file_size_mb() {
        assert_eq!(format_file_size(1048576), "1.00 MB");
        assert_eq!(format_file_size(1572864), "1.50 MB");
    }
}
