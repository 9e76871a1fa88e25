use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use client_core::{
    candidate_from_path, load_settings, suggested_file_name, HttpProcessTransport, StatusView,
    UploadController, UploadState, WidgetSurface, WidgetView,
};
use shared::domain::Sensitivity;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "unmark", about = "Remove repeated watermarks from a PDF via the processing service")]
struct Args {
    /// PDF to upload.
    file: PathBuf,
    #[arg(long)]
    server_url: Option<String>,
    /// Page-frequency threshold, 0.1 to 1.0.
    #[arg(long)]
    sensitivity: Option<f64>,
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Where to save the cleaned PDF. A directory gets the suggested file name.
    #[arg(long, short)]
    output: Option<PathBuf>,
}

/// Prints each visible change of the widget to the terminal.
#[derive(Default)]
struct TerminalSurface {
    last: Option<WidgetView>,
    alerts: usize,
}

impl WidgetSurface for TerminalSurface {
    fn render(&mut self, view: &WidgetView) {
        if self.last.as_ref() == Some(view) {
            return;
        }
        match &view.status {
            StatusView::Hidden if view.submit_enabled => {
                println!("Selected {} ({})", view.drop_zone.title, view.drop_zone.subtitle);
            }
            StatusView::Hidden => {}
            StatusView::Loading => println!("Processing {}...", view.drop_zone.title),
            StatusView::Success {
                download_url,
                removed_count,
                ..
            } => {
                match removed_count {
                    Some(count) => println!("Done, removed {count} watermark(s)."),
                    None => println!("Done."),
                }
                if !download_url.starts_with("data:") {
                    println!("Download: {download_url}");
                }
            }
            StatusView::Error { message } => println!("Error: {message}"),
        }
        self.last = Some(view.clone());
    }

    fn alert(&mut self, message: &str) {
        self.alerts += 1;
        eprintln!("{message}");
    }
}

/// Reads and selects the file at `path`. A rejection has already been shown
/// by the surface, so `None` needs no further reporting.
fn select_path(
    controller: &mut UploadController<TerminalSurface>,
    path: &Path,
) -> Option<String> {
    let candidate = match candidate_from_path(path) {
        Ok(candidate) => candidate,
        Err(err) => {
            controller.reject_selection(&err);
            return None;
        }
    };
    let name = candidate.name.clone();
    controller.select_file(candidate).ok()?;
    Some(name)
}

fn output_path(output: &Path, suggested_name: &str) -> PathBuf {
    if output.is_dir() {
        output.join(suggested_name)
    } else {
        output.to_path_buf()
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(v) = args.server_url {
        settings.server_url = v;
    }
    if let Some(v) = args.sensitivity {
        settings.sensitivity = Sensitivity::new(v);
    }
    if let Some(v) = args.timeout_secs {
        settings.request_timeout_secs = Some(v);
    }

    let transport = HttpProcessTransport::new(&settings.server_url, settings.request_timeout())
        .context("failed to set up the processing client")?;
    info!(endpoint = %transport.endpoint(), "using processing service");

    let mut controller = UploadController::new(TerminalSurface::default(), settings.sensitivity);
    let Some(original_name) = select_path(&mut controller, &args.file) else {
        return Ok(ExitCode::FAILURE);
    };
    controller.submit(&transport).await;

    match controller.state() {
        UploadState::Success {
            download_url,
            filename,
            ..
        } => {
            let Some(output) = args.output else {
                return Ok(ExitCode::SUCCESS);
            };
            let bytes = transport
                .download(download_url)
                .await
                .context("failed to fetch the processed document")?;
            let path = output_path(
                &output,
                &suggested_file_name(filename.as_deref(), &original_name),
            );
            tokio::fs::write(&path, &bytes)
                .await
                .with_context(|| format!("failed to write '{}'", path.display()))?;
            println!("Saved {}", path.display());
            Ok(ExitCode::SUCCESS)
        }
        UploadState::Error { failure } => {
            debug!(code = ?failure.code, "submission failed");
            Ok(ExitCode::FAILURE)
        }
        other => bail!("submission did not settle (state {other:?})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn directory_output_gets_suggested_name() {
        let dir = env::temp_dir();
        assert_eq!(output_path(&dir, "clean_a.pdf"), dir.join("clean_a.pdf"));
    }

    #[test]
    fn file_output_is_used_verbatim() {
        let path = env::temp_dir().join("unmark-output-that-does-not-exist.pdf");
        assert_eq!(output_path(&path, "clean_a.pdf"), path);
    }

    #[test]
    fn terminal_surface_skips_repeated_views() {
        let mut surface = TerminalSurface::default();
        let controller = UploadController::new(TerminalSurface::default(), Sensitivity::default());
        let view = controller.view();
        surface.render(&view);
        surface.render(&view);
        assert_eq!(surface.last, Some(view));
    }

    fn temp_file(name: &str, contents: &[u8]) -> PathBuf {
        let suffix = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let path = env::temp_dir().join(format!("unmark_cli_{suffix}_{name}"));
        std::fs::write(&path, contents).expect("write");
        path
    }

    #[test]
    fn non_pdf_path_is_alerted_exactly_once() {
        let path = temp_file("notes.txt", b"plain");
        let mut controller =
            UploadController::new(TerminalSurface::default(), Sensitivity::default());

        assert_eq!(select_path(&mut controller, &path), None);
        assert_eq!(controller.surface().alerts, 1);
        assert_eq!(controller.state(), &UploadState::Idle);

        std::fs::remove_file(&path).expect("cleanup");
    }

    #[test]
    fn missing_path_is_alerted_exactly_once() {
        let path = env::temp_dir().join("unmark-cli-missing-input.pdf");
        let mut controller =
            UploadController::new(TerminalSurface::default(), Sensitivity::default());

        assert_eq!(select_path(&mut controller, &path), None);
        assert_eq!(controller.surface().alerts, 1);
    }

    #[test]
    fn pdf_path_is_selected_without_alert() {
        let path = temp_file("scan.pdf", b"%PDF-1.7");
        let mut controller =
            UploadController::new(TerminalSurface::default(), Sensitivity::default());

        let name = select_path(&mut controller, &path).expect("selected");
        assert!(name.ends_with("scan.pdf"));
        assert_eq!(controller.surface().alerts, 0);
        assert_eq!(controller.state(), &UploadState::FileChosen);

        std::fs::remove_file(&path).expect("cleanup");
    }

    #[test]
    fn parses_cli_flags() {
        let args = Args::try_parse_from([
            "unmark",
            "scan.pdf",
            "--server-url",
            "http://svc.test",
            "--sensitivity",
            "0.7",
            "-o",
            "out.pdf",
        ])
        .expect("args");
        assert_eq!(args.file, PathBuf::from("scan.pdf"));
        assert_eq!(args.server_url.as_deref(), Some("http://svc.test"));
        assert_eq!(args.sensitivity, Some(0.7));
        assert_eq!(args.output, Some(PathBuf::from("out.pdf")));
    }
}
