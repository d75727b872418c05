use std::ffi::OsString;

use clap::error::ErrorKind;
use clap::Parser;

use crate::api;
use crate::config::Settings;
use crate::types::FetchReport;

#[derive(Parser)]
#[command(
    name = "tgfetch",
    version,
    about = "Fetch a Telegram channel and its recent posts as JSON"
)]
pub struct Cli {
    /// Channel username, with or without the leading '@'
    pub identifier: Option<String>,

    /// Extra positional arguments are accepted and ignored
    #[arg(hide = true)]
    pub extra: Vec<String>,
}

/// CLI contract: exactly one JSON document on stdout, exit status 0 even on
/// reported errors. The missing-argument case never touches the network.
pub fn run() {
    let report = match identifier_from_args(std::env::args_os()) {
        Ok(identifier) => {
            dotenvy::dotenv().ok();
            match Settings::from_env() {
                Ok(settings) => {
                    crate::runtime::block_on(api::fetch_channel(&settings, &identifier))
                }
                Err(e) => FetchReport::err(e.to_string()),
            }
        }
        Err(report) => report,
    };
    finish(report);
}

/// Argument handling, separated from the network path: every outcome here is
/// either an identifier to fetch or a failure document to print as-is.
fn identifier_from_args<I, T>(args: I) -> Result<String, FetchReport>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(Cli {
            identifier: Some(identifier),
            ..
        }) => Ok(identifier),
        Ok(Cli {
            identifier: None, ..
        }) => Err(FetchReport::err("Username required")),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
            _ => Err(FetchReport::err(err.to_string())),
        },
    }
}

fn finish(report: FetchReport) {
    // compact JSON, non-ASCII left as-is
    match serde_json::to_string(&report) {
        Ok(doc) => println!("{doc}"),
        Err(e) => println!(
            "{}",
            serde_json::json!({"success": false, "error": e.to_string()})
        ),
    }
}
