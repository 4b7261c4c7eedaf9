use posflag::prelude::*;
use std::error::Error;
use std::io::{self, Read, Write};

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("posflag=info")
        .with_writer(io::stderr)
        .init();

    let mut flags = FlagSet::from_env();
    flags
        .bool("n", false, "print what would be copied")?
        .buffer("log", "append a `line` to the summary")?;
    flags
        .positional()
        .input_file("src", "file to read, - for stdin")?
        .output_files("dst", "files to write, stdout if none")?
        .set_order("src [dst...]");
    flags.parse_env()?;

    let dry_run = flags.get_bool("n") == Some(true);
    let summary = flags.get_buffer("log").unwrap_or_default().to_vec();
    let positional = flags.positional();
    let mut outputs = positional.take_output_files("dst");
    if outputs.is_empty() {
        outputs.push(posflag::Output::create("-")?);
    }
    if let Some(mut src) = positional.take_input_file("src") {
        if dry_run {
            eprintln!("would copy to {} destination(s)", outputs.len());
        } else {
            let mut data = Vec::new();
            src.read_to_end(&mut data)?;
            for output in &mut outputs {
                output.write_all(&data)?;
            }
        }
    }
    io::stderr().write_all(&summary)?;
    Ok(())
}
