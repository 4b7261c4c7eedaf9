use posflag::prelude::*;
use std::error::Error;
use std::io::{self, Read, Write};

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("posflag=warn")
        .with_writer(io::stderr)
        .init();

    let mut flags = FlagSet::from_env();
    flags.writer("note", io::stderr(), "write `text` to stderr before copying")?;
    flags
        .positional()
        .output_files("files", "files to copy stdin into")?
        .set_order("[files...]");
    flags.parse_env()?;

    let mut input = Vec::new();
    io::stdin().read_to_end(&mut input)?;
    io::stdout().write_all(&input)?;
    for mut output in flags.positional().take_output_files("files") {
        output.write_all(&input)?;
        output.flush()?;
    }
    Ok(())
}
