//! Bridge request handler command
//!
//! Handles `viewshot handle`: parses a bridge-style JSON capture request
//! (`{"action": ..., "target": ...}`), runs it against the capture service,
//! and prints the JSON response envelope. A capture failure still exits 0;
//! the failure is reported inside the envelope, the way the host bridge
//! expects it.

use crate::app::AppContext;
use anyhow::{Context, Result};
use clap::Args;
use std::io::Read;
use std::sync::Arc;
use tracing::debug;
use viewshot_core::{handle_command, CaptureService, CommandRequest, CommandResponse};

#[derive(Args, Debug)]
pub struct HandleArgs {
    /// JSON request; read from stdin when omitted
    #[arg(long)]
    pub request: Option<String>,

    /// Use the in-memory mock source instead of the platform backend
    #[arg(long)]
    pub mock: bool,
}

/// Execute one bridge request and print the response envelope
pub fn run(ctx: &AppContext, args: HandleArgs) -> Result<()> {
    let raw = match args.request {
        Some(raw) => raw,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read request from stdin")?;
            buf
        }
    };

    let request: CommandRequest =
        serde_json::from_str(&raw).context("Failed to parse JSON request")?;
    debug!(?request, "Handling bridge request");

    let response = dispatch(ctx, &request, args.mock)?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn dispatch(ctx: &AppContext, request: &CommandRequest, mock: bool) -> Result<CommandResponse> {
    let compression = ctx.config.capture.compression;

    if mock {
        use viewshot_adapters::MockRenderSource;
        let service = CaptureService::new(Arc::new(MockRenderSource::with_viewport(800.0, 600.0)))
            .with_compression(compression);
        return Ok(handle_command(&service, request));
    }

    #[cfg(target_os = "macos")]
    {
        use viewshot_adapters::ScreenCaptureKitSource;
        let service = CaptureService::new(Arc::new(ScreenCaptureKitSource::new()))
            .with_compression(compression);
        Ok(handle_command(&service, request))
    }

    #[cfg(not(target_os = "macos"))]
    {
        anyhow::bail!("No platform capture backend on this OS; use --mock or run on macOS")
    }
}
