//! Waffle command-line front end: run a source file, then drop into a
//! line-at-a-time REPL. The core never prints; all I/O lives here.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Usage, input, or decode error
//! - 3: Runtime fault while running the initial file

use std::env;
use std::fs;
use std::io::{self, BufRead, Write};
use std::process;

use waffle_common::Value;
use waffle_decoder::{decode, decode_line};
use waffle_vm::Machine;

fn main() {
    let mut trace = false;
    let mut file: Option<String> = None;

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--trace" => trace = true,
            "--help" | "-h" => {
                print_usage();
                return;
            }
            other if other.starts_with('-') => {
                eprintln!("error: unknown option '{other}'");
                print_usage();
                process::exit(1);
            }
            other => {
                if file.replace(other.to_string()).is_some() {
                    eprintln!("error: more than one file given");
                    print_usage();
                    process::exit(1);
                }
            }
        }
    }

    let mut machine = Machine::new();
    if trace {
        machine.set_observer(Box::new(|t| {
            eprintln!("{:>4}  {}", t.address, t.instruction);
        }));
    }

    if let Some(path) = &file {
        if let Err(code) = run_file(&mut machine, path) {
            process::exit(code);
        }
    }

    repl(&mut machine);
}

fn print_usage() {
    eprintln!("Usage: waffle [--trace] [file]");
    eprintln!();
    eprintln!("Runs the optional Waffle source file, then enters the REPL.");
    eprintln!("  --trace    print each executed instruction to stderr");
}

/// Decode and run a source file on the given machine, printing the
/// final stack. Returns the exit code on failure.
fn run_file(machine: &mut Machine, path: &str) -> Result<(), i32> {
    let source = fs::read_to_string(path).map_err(|e| {
        eprintln!("error: {path}: {e}");
        1
    })?;
    let program = decode(&source).map_err(|e| {
        eprintln!("error: {e}");
        1
    })?;
    machine.run(&program).map_err(|e| {
        eprintln!("error: {e}");
        3
    })?;
    show_stack(machine);
    Ok(())
}

fn repl(machine: &mut Machine) {
    println!("Waffle REPL");
    println!("Type instructions, or 'leave' to leave");

    let stdin = io::stdin();
    let mut line_num = 0;

    loop {
        print!("waffle> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        line_num += 1;

        if line.trim() == "leave" {
            break;
        }

        let instruction = match decode_line(&line, line_num) {
            Ok(Some(instruction)) => instruction,
            Ok(None) => continue,
            Err(e) => {
                println!("error: {e}");
                continue;
            }
        };

        // A faulted line is reported and dropped; the next line still runs.
        if let Err(fault) = machine.step(&instruction) {
            println!("error: {fault}");
            continue;
        }
        show_stack(machine);
    }
}

fn show_stack(machine: &Machine) {
    let rendered: Vec<String> = machine.data_stack().iter().map(format_value).collect();
    println!("stack: {}", rendered.join(" "));
}

/// Large floats render in scientific notation, everything else plainly.
fn format_value(value: &Value) -> String {
    match value {
        Value::Float(x) if x.abs() >= 1e6 => format!("{x:.2e}"),
        other => other.to_string(),
    }
}
