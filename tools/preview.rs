/// Preview — plays a textbox sequence to stdout in simulated ticks.
///
/// Usage: preview [--interval <s>] [--seed <n>] [--lenient] <page>...
///
/// Each argument after the flags is one page. Pages may embed `<<...>>`
/// formatting tags; the buffer is printed whenever it changes.

use std::process;

use textbox_engine::core::audio::AudioSink;
use textbox_engine::core::sequencer::{Textbox, DEFAULT_CHAR_INTERVAL};
use textbox_engine::core::tag::TagPolicy;

/// Prints each blip as it would play.
struct StdoutAudio;

impl AudioSink for StdoutAudio {
    fn play_blip(&mut self, pitch: f32, volume: f32) {
        println!("          [blip pitch={:.3} vol={:.2}]", pitch, volume);
    }
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return;
    }

    let mut interval = DEFAULT_CHAR_INTERVAL;
    let mut seed: u64 = 42;
    let mut policy = TagPolicy::Strict;
    let mut pages: Vec<String> = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--interval" if i + 1 < args.len() => {
                i += 1;
                interval = args[i].parse().unwrap_or(DEFAULT_CHAR_INTERVAL);
            }
            "--seed" if i + 1 < args.len() => {
                i += 1;
                seed = args[i].parse().unwrap_or(42);
            }
            "--lenient" => {
                policy = TagPolicy::Lenient;
            }
            arg if arg.starts_with("--") => {
                eprintln!("Unknown argument: {}", arg);
                print_usage();
                process::exit(1);
            }
            page => {
                pages.push(page.to_string());
            }
        }
        i += 1;
    }

    if pages.is_empty() {
        eprintln!("No pages given.");
        print_usage();
        process::exit(1);
    }

    let mut textbox = match Textbox::builder()
        .char_interval(interval)
        .seed(seed)
        .tag_policy(policy)
        .audio(StdoutAudio)
        .build()
    {
        Ok(tb) => tb,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = textbox.display_then(&pages, || println!("\nSequence complete.")) {
        eprintln!("ERROR: {}", e);
        process::exit(1);
    }

    println!("Playing {} page(s) at {}s per step:\n", pages.len(), interval);

    let mut clock = 0.0f32;
    let mut last = String::new();
    let mut ticks: u64 = 0;
    while textbox.is_active() {
        textbox.tick(interval);
        clock += interval;
        if textbox.visible_text() != last {
            last = textbox.visible_text().to_string();
            if last.is_empty() {
                println!("[{:7.2}s] (page cleared)", clock);
            } else {
                println!("[{:7.2}s] {}", clock, last);
            }
        }
        ticks += 1;
        if ticks > 10_000_000 {
            eprintln!("ERROR: sequence did not finish");
            process::exit(1);
        }
    }
}

fn print_usage() {
    println!("Preview — plays a textbox sequence to stdout in simulated ticks.");
    println!();
    println!("Usage: preview [--interval <s>] [--seed <n>] [--lenient] <page>...");
    println!();
    println!("  --interval <s>  Seconds per revealed step (default: {})", DEFAULT_CHAR_INTERVAL);
    println!("  --seed <n>      RNG seed for pitch jitter (default: 42)");
    println!("  --lenient       Reveal unterminated tags literally instead of rejecting");
}
