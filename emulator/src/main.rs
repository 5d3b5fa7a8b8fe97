mod session;

use std::env;
use std::io::{self, BufRead, Write};
use std::process;

use session::{Session, SessionConfig};

fn main() -> io::Result<()> {
    let config = parse_config().unwrap_or_else(|err| {
        eprintln!("{err}");
        eprintln!(
            "Usage: tacho-emulator [--slots <1-64>] [--min-duration-us <micros>] [--pin <n>]"
        );
        process::exit(2);
    });

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let stdout = io::stdout();
    let mut writer = stdout.lock();
    let mut session = Session::new(config).unwrap_or_else(|err| {
        eprintln!("tacho init failed: {err}");
        process::exit(1);
    });
    let mut line = String::new();

    writeln!(
        writer,
        "Tachometer emulator ready. Type `help` for commands or `exit` to quit."
    )?;

    loop {
        line.clear();
        write!(writer, "> ")?;
        writer.flush()?;

        let bytes_read = reader.read_line(&mut line)?;
        if bytes_read == 0 {
            writeln!(writer)?;
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if should_terminate(trimmed) {
            writeln!(writer, "Session closed.")?;
            break;
        }

        for response in session.handle_command(trimmed) {
            writeln!(writer, "{response}")?;
        }
    }

    Ok(())
}

fn should_terminate(input: &str) -> bool {
    input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit")
}

fn parse_config() -> Result<SessionConfig, String> {
    let mut config = SessionConfig::default();
    let mut args = env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--slots" => {
                let value = args.next().ok_or("Expected value after --slots")?;
                config.num_slots = parse_slots(&value)?;
            }
            "--min-duration-us" => {
                let value = args.next().ok_or("Expected value after --min-duration-us")?;
                config.min_duration_micros = value
                    .parse()
                    .map_err(|_| format!("Invalid duration `{value}`"))?;
            }
            "--pin" => {
                let value = args.next().ok_or("Expected value after --pin")?;
                config.pin = value.parse().map_err(|_| format!("Invalid pin `{value}`"))?;
            }
            other => {
                if let Some(value) = other.strip_prefix("--slots=") {
                    config.num_slots = parse_slots(value)?;
                } else if let Some(value) = other.strip_prefix("--min-duration-us=") {
                    config.min_duration_micros = value
                        .parse()
                        .map_err(|_| format!("Invalid duration `{value}`"))?;
                } else if let Some(value) = other.strip_prefix("--pin=") {
                    config.pin = value.parse().map_err(|_| format!("Invalid pin `{value}`"))?;
                } else {
                    return Err(format!("Unknown argument `{other}`"));
                }
            }
        }
    }

    Ok(config)
}

fn parse_slots(value: &str) -> Result<usize, String> {
    let slots: usize = value
        .parse()
        .map_err(|_| format!("Invalid slot count `{value}`"))?;
    if (1..=64).contains(&slots) {
        Ok(slots)
    } else {
        Err(format!("Slot count {slots} outside supported range 1-64"))
    }
}
