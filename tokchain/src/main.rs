use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use tokchain::config::RuntimeConfig;
use tokchain::dump::{read_dump_file, DumpOptions};
use tokchain::logging::{self, codes};
use tokchain::{log_info, log_success, TokenList};

/// Token chain loader and pattern matcher
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Token dump in the rendered chain format
    dump_file: PathBuf,

    /// Print every position where this pattern matches
    #[arg(short, long)]
    pattern: Option<String>,

    /// Variable id used for %varid% elements
    #[arg(long = "varid", default_value_t = 0)]
    var_id: u32,

    /// Print the loaded chain
    #[arg(short, long)]
    render: bool,

    /// Omit @varid suffixes when rendering
    #[arg(long = "no-varid")]
    no_var_id: bool,

    /// Print match positions as JSON
    #[arg(long)]
    json: bool,

    /// Load preferences from a TOML file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// One match position
#[derive(Debug, Serialize)]
struct MatchRecord<'a> {
    file: u32,
    line: u32,
    text: &'a str,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => RuntimeConfig::from_toml_file(path).map_err(|e| {
            eprintln!("Error [{}]: {}", e.error_code(), e);
            e
        })?,
        None => RuntimeConfig::default(),
    };

    // Preferences must be in place before the logger reads them
    logging::config::init_runtime_preferences(config.logging.clone())
        .and_then(|_| logging::init_global_logging())
        .map_err(|e| {
            eprintln!("Error [{}]: {}", codes::system::INITIALIZATION_FAILURE, e);
            e
        })?;

    if let Some(path) = &args.config {
        log_success!(codes::success::CONFIG_LOADED, "Configuration loaded",
            "file" => path.display()
        );
    }

    let list = match read_dump_file(&args.dump_file, None, &DumpOptions::from(&config.dump)) {
        Ok(list) => list,
        Err(err) => {
            eprintln!("Error [{}]: {}", err.error_code(), err);
            std::process::exit(1);
        }
    };

    if let Some(pattern) = &args.pattern {
        report_matches(&list, pattern, args.var_id, args.json)?;
    }

    if args.render {
        let mut render = config.render.clone();
        if args.no_var_id {
            render.show_var_id = false;
        }
        log_info!("Rendering chain", "tokens" => list.len(), "var_ids" => render.show_var_id);
        print!("{}", list.render_with(&render, None));
    }

    Ok(())
}

fn report_matches(
    list: &TokenList,
    pattern: &str,
    var_id: u32,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut records = Vec::new();
    let mut current = list.front();
    while let Some(id) = list.find_match(current, pattern, None, var_id) {
        let token = &list[id];
        records.push(MatchRecord {
            file: token.file_index(),
            line: token.line_number(),
            text: token.text(),
        });
        current = list.next(id);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        for record in &records {
            println!("{}:{}: {}", record.file, record.line, record.text);
        }
        println!("{} match(es) for '{}'", records.len(), pattern);
    }

    log_success!(codes::success::MATCH_SCAN_COMPLETE, "Pattern scan complete",
        "pattern" => pattern,
        "matches" => records.len()
    );
    Ok(())
}
