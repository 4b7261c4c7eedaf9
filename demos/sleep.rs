use posflag::prelude::*;
use posflag::ValueError;
use std::cell::Cell;
use std::error::Error;
use std::rc::Rc;
use std::thread;
use std::time::Duration;

struct DurationValue(Rc<Cell<Duration>>);

impl Value for DurationValue {
    fn set(&mut self, raw: &str) -> Result<(), ValueError> {
        let duration = parse_duration::parse(raw).map_err(|e| ValueError::custom(e.to_string()))?;
        self.0.set(duration);
        Ok(())
    }

    fn describe(&self) -> String {
        format!("{:?}", self.0.get())
    }

    fn hint(&self) -> &str {
        "duration"
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("posflag=debug")
        .init();

    let duration = Rc::new(Cell::new(Duration::ZERO));
    let mut flags = FlagSet::from_env();
    flags
        .positional()
        .custom("duration", DurationValue(duration.clone()), "how long to sleep, e.g. 1m30s")?;
    flags.parse_env()?;
    thread::sleep(duration.get());
    Ok(())
}
