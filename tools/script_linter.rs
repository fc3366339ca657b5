/// Script Linter — validates message scripts for format-tag correctness.
///
/// Usage: script_linter <script.ron>...
///
/// A script file is a RON map of message id → list of pages. Every page
/// must tokenize under the strict tag policy; an unterminated `<<` would
/// otherwise reject the whole message at display time.

use std::collections::HashMap;
use std::path::Path;
use std::process;

use textbox_engine::core::tag::{tokenize, TagPolicy};

type Script = HashMap<String, Vec<String>>;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: script_linter <script.ron>...");
        process::exit(0);
    }

    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut messages = 0usize;

    for path in &args[1..] {
        match load_script(Path::new(path)) {
            Ok(script) => {
                println!("Loaded {} message(s) from {}", script.len(), path);
                messages += script.len();
                lint_script(path, &script, &mut errors, &mut warnings);
            }
            Err(e) => {
                errors.push(format!("{}: failed to load: {}", path, e));
            }
        }
    }

    println!("\n=== Script Lint Report ===\n");

    if errors.is_empty() && warnings.is_empty() {
        println!("All checks passed! ({} messages)", messages);
    }

    for warning in &warnings {
        println!("WARNING: {}", warning);
    }

    for error in &errors {
        println!("ERROR: {}", error);
    }

    println!(
        "\nSummary: {} errors, {} warnings",
        errors.len(),
        warnings.len()
    );

    if errors.is_empty() {
        process::exit(0);
    } else {
        process::exit(1);
    }
}

fn load_script(path: &Path) -> Result<Script, Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(path)?;
    let script: Script = ron::from_str(&contents)?;
    Ok(script)
}

fn lint_script(path: &str, script: &Script, errors: &mut Vec<String>, warnings: &mut Vec<String>) {
    for (id, pages) in script {
        if pages.is_empty() {
            warnings.push(format!(
                "{}: message '{}' has no pages and would be rejected at display time",
                path, id
            ));
        }
        for (i, page) in pages.iter().enumerate() {
            if let Err(e) = tokenize(page, TagPolicy::Strict) {
                errors.push(format!("{}: message '{}' page {}: {}", path, id, i, e));
            }
            if page.is_empty() {
                warnings.push(format!(
                    "{}: message '{}' page {} is empty (shows a blank box for the pause)",
                    path, id, i
                ));
            }
        }
    }
}
