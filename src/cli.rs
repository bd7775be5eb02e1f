// CLI layer: flag parsing with clap and the dispatch glue around the
// frame client. The flows are small and synchronous; network calls get an
// indicatif spinner so long exchanges (the timeout bound is 30s) show
// progress.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use indicatif::{ProgressBar, ProgressStyle};

use crate::api::{FrameClient, ImageBuffer};
use crate::envelope::{self, QueryFilter};

/// Command-line surface. Exactly one of `--post`, `--get`, `--download`
/// selects the operation; the remaining flags parameterise it.
#[derive(Debug, Parser)]
#[command(
    name = "camframe",
    version,
    about = "Upload, look up, and download surveillance frames",
    group(ArgGroup::new("mode").required(true).args(["post", "get", "download"]))
)]
pub struct Cli {
    /// Upload an image file as a new frame
    #[arg(long)]
    pub post: bool,

    /// Look up stored frame metadata by camera and time filters
    #[arg(long)]
    pub get: bool,

    /// Download a stored frame file by filename
    #[arg(long)]
    pub download: bool,

    /// Image file to upload (required with --post)
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Camera identifier (required with --post and --get)
    #[arg(long, value_name = "ID")]
    pub camera: Option<String>,

    /// Filter: four-digit year
    #[arg(long, value_name = "Y")]
    pub year: Option<i32>,

    /// Filter: month (1-12)
    #[arg(long, value_name = "M")]
    pub month: Option<i32>,

    /// Filter: day of month (1-31)
    #[arg(long, value_name = "D")]
    pub day: Option<i32>,

    /// Filter: hour (0-23); 0 queries midnight
    #[arg(long, value_name = "H")]
    pub hour: Option<i32>,

    /// Filter: minute (0-59)
    #[arg(long, value_name = "MIN")]
    pub minute: Option<i32>,

    /// Filter: second (0-59)
    #[arg(long, value_name = "S")]
    pub second: Option<i32>,

    /// Stored filename to download (required with --download)
    #[arg(long, value_name = "NAME")]
    pub filename: Option<String>,

    /// Destination path for --download (defaults to the filename)
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

fn spinner(message: &'static str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message);
    bar
}

/// Run the selected operation. Errors bubble up to `main`, which prints
/// them and exits nonzero.
pub fn run(args: Cli, client: FrameClient) -> Result<()> {
    if args.post {
        let file = args.file.context("--post requires --file <path>")?;
        let camera = args.camera.context("--post requires --camera <id>")?;

        let mut staging = ImageBuffer::new();
        let bar = spinner("Uploading frame...");
        let result = client.upload(&file, &camera, &mut staging);
        bar.finish_and_clear();

        let filename = result?;
        println!(
            "Uploaded {} ({} bytes) for camera {} as {}",
            file.display(),
            staging.len(),
            camera,
            filename
        );
    } else if args.get {
        let camera = args.camera.context("--get requires --camera <id>")?;
        // map absent flags onto the wire sentinels: 0 for date fields,
        // negative for time fields (hour 0 must stay queryable)
        let filter = QueryFilter {
            camera,
            year: args.year.unwrap_or(0),
            month: args.month.unwrap_or(0),
            day: args.day.unwrap_or(0),
            hour: args.hour.unwrap_or(-1),
            minute: args.minute.unwrap_or(-1),
            second: args.second.unwrap_or(-1),
        };
        println!(
            "Query: {}/api/frames?{}",
            client.base_url(),
            envelope::build_query_string(&filter)
        );

        let bar = spinner("Querying frames...");
        let result = client.query(&filter);
        bar.finish_and_clear();

        println!("Found frame file: {}", result?);
    } else {
        let filename = args.filename.context("--download requires --filename <name>")?;
        let output = args
            .output
            .unwrap_or_else(|| PathBuf::from(filename.clone()));

        let bar = spinner("Downloading frame...");
        let result = client.download(&filename, &output);
        bar.finish_and_clear();

        let written = result?;
        println!("Downloaded {} bytes to {}", written, output.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn argument_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn post_invocation_parses() {
        let args =
            Cli::parse_from(["camframe", "--post", "--file", "shot.bmp", "--camera", "CAM0"]);
        assert!(args.post && !args.get && !args.download);
        assert_eq!(args.file.unwrap(), PathBuf::from("shot.bmp"));
        assert_eq!(args.camera.as_deref(), Some("CAM0"));
    }

    #[test]
    fn get_invocation_keeps_explicit_zero_hour() {
        let args = Cli::parse_from([
            "camframe", "--get", "--camera", "CAM0", "--year", "2025", "--hour", "0",
        ]);
        assert!(args.get);
        assert_eq!(args.year, Some(2025));
        assert_eq!(args.hour, Some(0));
        assert_eq!(args.month, None);
    }

    #[test]
    fn download_invocation_parses_with_optional_output() {
        let args = Cli::parse_from([
            "camframe",
            "--download",
            "--filename",
            "251110123456_789.bmp",
        ]);
        assert!(args.download);
        assert_eq!(args.filename.as_deref(), Some("251110123456_789.bmp"));
        assert!(args.output.is_none());
    }

    #[test]
    fn an_operation_flag_is_required() {
        assert!(Cli::try_parse_from(["camframe", "--camera", "CAM0"]).is_err());
    }

    #[test]
    fn operation_flags_are_mutually_exclusive() {
        assert!(Cli::try_parse_from(["camframe", "--post", "--get"]).is_err());
    }
}
