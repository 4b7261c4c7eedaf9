use posflag::prelude::*;
use std::error::Error;
use std::io::{self, Read, Write};

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("posflag=warn")
        .with_writer(io::stderr)
        .init();

    let mut flags = FlagSet::from_env();
    flags
        .positional()
        .input_files("files", "files to concatenate, - for stdin")?
        .set_order("[files...]");
    flags.parse_env()?;

    let mut inputs = flags.positional().take_input_files("files");
    if inputs.is_empty() {
        inputs.push(posflag::Input::open("-")?);
    }
    let mut stdout = io::stdout().lock();
    for mut input in inputs {
        let mut buf = Vec::new();
        input.read_to_end(&mut buf)?;
        stdout.write_all(&buf)?;
    }
    Ok(())
}
