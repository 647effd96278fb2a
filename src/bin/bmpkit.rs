//! Interactive menu over a [`bmpkit::Session`].
//!
//! The log level is read from `BMPKIT_LOG` (error, warn, info, debug, trace)
//! and defaults to warn.

use std::io::{self, BufRead, Write};

use bmpkit::{BmpError, ErrorCategory, Image, Operation, Session};
use log::{Level, info};

fn setup_logger() {
    let level = std::env::var("BMPKIT_LOG")
        .ok()
        .and_then(|v| v.parse::<Level>().ok())
        .unwrap_or(Level::Warn);
    if let Err(e) = simple_logger::init_with_level(level) {
        eprintln!("could not initialize logger: {e}");
    }
    info!("Log level: {level}");
}

/// Print `prompt` and read one trimmed line. `None` on end of input.
fn prompt(input: &mut impl BufRead, label: &str) -> io::Result<Option<String>> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_owned()))
}

fn report(err: &BmpError) {
    let hint = match err.category() {
        ErrorCategory::Format => "the file is not a supported BMP",
        ErrorCategory::Io => "reading or writing the file failed",
        ErrorCategory::Allocation => "not enough memory for this image",
        ErrorCategory::Usage => "that request does not apply right now",
    };
    println!("Error: {err} ({hint})");
}

fn read_number(input: &mut impl BufRead, label: &str) -> io::Result<Option<i32>> {
    loop {
        let Some(line) = prompt(input, label)? else {
            return Ok(None);
        };
        match line.parse() {
            Ok(n) => return Ok(Some(n)),
            Err(_) => println!("Please enter a whole number."),
        }
    }
}

/// Show the filter submenu and pick an operation. `None` means back.
fn choose_filter(input: &mut impl BufRead, image: &Image) -> io::Result<Option<Operation>> {
    let third = match image {
        Image::Gray(_) => "Threshold",
        Image::Color(_) => "Grayscale",
    };
    println!();
    println!("Filters:");
    println!("  1. Negative");
    println!("  2. Brightness");
    println!("  3. {third}");
    println!("  4. Box blur");
    println!("  5. Gaussian blur");
    println!("  6. Sharpen");
    println!("  7. Outline");
    println!("  8. Emboss");
    println!("  9. Histogram equalization");
    println!("  0. Back");

    loop {
        let Some(choice) = prompt(input, "Filter: ")? else {
            return Ok(None);
        };
        let op = match choice.as_str() {
            "1" => Operation::Negative,
            "2" => match read_number(input, "Brightness delta (-255..255): ")? {
                Some(delta) => Operation::Brightness(delta),
                None => return Ok(None),
            },
            "3" => match image {
                Image::Gray(_) => match read_number(input, "Threshold level (0..255): ")? {
                    Some(level) => Operation::Threshold(level),
                    None => return Ok(None),
                },
                Image::Color(_) => Operation::Grayscale,
            },
            "4" => Operation::BoxBlur,
            "5" => Operation::GaussianBlur,
            "6" => Operation::Sharpen,
            "7" => Operation::Outline,
            "8" => Operation::Emboss,
            "9" => Operation::Equalize,
            "0" => return Ok(None),
            _ => {
                println!("Unknown choice.");
                continue;
            }
        };
        return Ok(Some(op));
    }
}

fn run(input: &mut impl BufRead) -> io::Result<()> {
    let mut session = Session::new();
    loop {
        println!();
        println!("bmpkit");
        println!("  1. Open image");
        println!("  2. Save image");
        println!("  3. Apply filter");
        println!("  4. Image information");
        println!("  0. Quit");

        let Some(choice) = prompt(input, "Choice: ")? else {
            return Ok(());
        };
        match choice.as_str() {
            "1" => {
                let Some(path) = prompt(input, "Path to open: ")? else {
                    return Ok(());
                };
                match session.open(&path) {
                    Ok(image) => println!(
                        "Loaded {path}: {}x{}, {}-bit",
                        image.width(),
                        image.height(),
                        image.layout().bit_depth()
                    ),
                    Err(e) => report(&e),
                }
            }
            "2" => {
                if let Err(e) = session.image() {
                    report(&e);
                    continue;
                }
                let Some(path) = prompt(input, "Path to save: ")? else {
                    return Ok(());
                };
                match session.save(&path) {
                    Ok(()) => println!("Saved {path}."),
                    Err(e) => report(&e),
                }
            }
            "3" => {
                let op = match session.image() {
                    Ok(image) => choose_filter(input, image)?,
                    Err(e) => {
                        report(&e);
                        continue;
                    }
                };
                if let Some(op) = op {
                    match session.apply(op) {
                        Ok(()) => println!("Applied {op}."),
                        Err(e) => report(&e),
                    }
                }
            }
            "4" => match session.info() {
                Ok(info) => println!("{info}"),
                Err(e) => report(&e),
            },
            "0" => return Ok(()),
            _ => println!("Unknown choice."),
        }
    }
}

fn main() -> io::Result<()> {
    setup_logger();
    run(&mut io::stdin().lock())
}
