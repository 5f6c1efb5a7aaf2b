use clap::{Parser, Subcommand};
use hypercert_form::{codec, validate, DateValue};

#[derive(Parser)]
#[command(name = "hypercert-form", about = "Inspect hypercert form query strings")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode a query string and run every validation rule against it
    Validate {
        /// Query string as it appears in the page URL (leading '?' optional)
        query: String,
    },
    /// Decode a query string and print the form values as JSON
    Decode {
        query: String,
    },
    /// Re-encode a query string into its canonical form
    Encode {
        query: String,
    },
}

fn main() {
    let cli = Cli::parse();
    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            2
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> hypercert_form::Result<i32> {
    match cli.command {
        Command::Validate { query } => {
            let values = codec::query_string_to_form(&query)?;
            let report = validate::validate_form(&values);
            if report.is_valid() {
                println!("ok");
                Ok(0)
            } else {
                for (field, message) in report.iter() {
                    println!("{field}: {message}");
                }
                Ok(1)
            }
        }
        Command::Decode { query } => {
            let values = codec::query_string_to_form(&query)?;
            let json = serde_json::json!({
                "name": values.name,
                "description": values.description,
                "externalLink": values.external_link,
                "logoUrl": values.logo_url,
                "bannerUrl": values.banner_url,
                "impactScopes": values.impact_scopes,
                "impactTimeEnd": values.impact_time_end.map(|v| match v {
                    DateValue::Indefinite => hypercert_form::DATE_INDEFINITE.to_string(),
                    DateValue::On(d) => d.format("%Y-%m-%d").to_string(),
                }),
                "workScopes": values.work_scopes,
                "workTimeStart": values.work_time_start.map(|d| d.format("%Y-%m-%d").to_string()),
                "workTimeEnd": values.work_time_end.map(|d| d.format("%Y-%m-%d").to_string()),
                "rights": values.rights,
                "contributors": values.contributors,
                "allowlistUrl": values.allowlist_url,
            });
            println!("{json:#}");
            Ok(0)
        }
        Command::Encode { query } => {
            let values = codec::query_string_to_form(&query)?;
            println!("{}", codec::form_to_query_string(&values));
            Ok(0)
        }
    }
}
