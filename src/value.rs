//! Values that flags store into.
//!
//! Every registered flag owns one [`FlagValue`]. The built-in kinds cover
//! plain booleans and strings plus the accumulating kinds (buffers, repeated
//! strings, writers and file handles). Anything else can be plugged in with
//! [`FlagValue::Custom`] and an implementation of [`Value`].

use crate::error::ValueError;
use std::fmt;
use std::fs::File;
use std::io::{self, Read, Write};

/// Argument that selects stdin or stdout instead of a named file.
pub const STDIO_ARG: &str = "-";

pub type Result<T> = std::result::Result<T, ValueError>;

/// The capability a flag needs from its backing value.
pub trait Value {
    /// Store one raw occurrence of the flag's argument.
    fn set(&mut self, raw: &str) -> Result<()>;

    /// Render the current value for usage output.
    fn describe(&self) -> String;

    /// Boolean values are set by the bare flag and never consume the next token.
    fn is_bool(&self) -> bool {
        false
    }

    /// Placeholder shown after the flag name in usage output.
    fn hint(&self) -> &str {
        "value"
    }
}

/// A readable source opened from a flag argument.
pub enum Input {
    Stdin(io::Stdin),
    File(File),
}

impl Input {
    pub fn open(arg: &str) -> Result<Self> {
        if arg == STDIO_ARG {
            return Ok(Self::Stdin(io::stdin()));
        }
        File::open(arg)
            .map(Self::File)
            .map_err(|e| ValueError::io(arg, e))
    }
}

impl Read for Input {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Stdin(stdin) => stdin.read(buf),
            Self::File(file) => file.read(buf),
        }
    }
}

impl fmt::Debug for Input {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Stdin(_) => write!(f, "Input::Stdin"),
            Self::File(file) => write!(f, "Input::File({:?})", file),
        }
    }
}

/// A writable sink created from a flag argument.
pub enum Output {
    Stdout(io::Stdout),
    File(File),
}

impl Output {
    pub fn create(arg: &str) -> Result<Self> {
        if arg == STDIO_ARG {
            return Ok(Self::Stdout(io::stdout()));
        }
        File::create(arg)
            .map(Self::File)
            .map_err(|e| ValueError::io(arg, e))
    }
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Stdout(stdout) => stdout.write(buf),
            Self::File(file) => file.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Stdout(stdout) => stdout.flush(),
            Self::File(file) => file.flush(),
        }
    }
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Stdout(_) => write!(f, "Output::Stdout"),
            Self::File(file) => write!(f, "Output::File({:?})", file),
        }
    }
}

/// The closed set of value kinds a flag can be backed by.
pub enum FlagValue {
    Bool(bool),
    Str(String),
    /// Each occurrence is appended followed by a newline.
    Buffer(Vec<u8>),
    /// Each occurrence is appended to the list.
    Strings(Vec<String>),
    /// Each occurrence is written as raw bytes. `None` once the writer was taken.
    Writer(Option<Box<dyn Write>>),
    /// An unset input file reads as empty.
    InputFile(Option<Input>),
    InputFiles(Vec<Input>),
    OutputFiles(Vec<Output>),
    Custom(Box<dyn Value>),
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err(ValueError::InvalidBool(raw.to_string())),
    }
}

impl FlagValue {
    pub fn writer<W: Write + 'static>(writer: W) -> Self {
        Self::Writer(Some(Box::new(writer)))
    }

    pub fn custom<V: Value + 'static>(value: V) -> Self {
        Self::Custom(Box::new(value))
    }

    /// The text shown as `(default ...)` in usage output, if the value differs
    /// from its kind's zero value.
    pub fn default_text(&self) -> Option<String> {
        match self {
            Self::Bool(true) => Some("true".to_string()),
            Self::Str(s) if !s.is_empty() => Some(format!("{:?}", s)),
            Self::Strings(v) if !v.is_empty() => Some(self.describe()),
            Self::Custom(value) => Some(value.describe()).filter(|s| !s.is_empty()),
            _ => None,
        }
    }
}

impl Value for FlagValue {
    fn set(&mut self, raw: &str) -> Result<()> {
        match self {
            Self::Bool(b) => *b = parse_bool(raw)?,
            Self::Str(s) => *s = raw.to_string(),
            Self::Buffer(buf) => {
                buf.extend_from_slice(raw.as_bytes());
                buf.push(b'\n');
            }
            Self::Strings(v) => v.push(raw.to_string()),
            Self::Writer(Some(w)) => w.write_all(raw.as_bytes()).map_err(ValueError::Write)?,
            Self::Writer(None) => return Err(ValueError::custom("writer has been taken")),
            Self::InputFile(input) => *input = Some(Input::open(raw)?),
            Self::InputFiles(inputs) => inputs.push(Input::open(raw)?),
            Self::OutputFiles(outputs) => outputs.push(Output::create(raw)?),
            Self::Custom(value) => value.set(raw)?,
        }
        Ok(())
    }

    fn describe(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Str(s) => s.clone(),
            Self::Buffer(buf) => String::from_utf8_lossy(buf).into_owned(),
            Self::Strings(v) => format!("[{}]", v.join(" ")),
            Self::Writer(_) => "writer".to_string(),
            Self::InputFile(_) => "input file".to_string(),
            Self::InputFiles(_) => "input files".to_string(),
            Self::OutputFiles(_) => "output files".to_string(),
            Self::Custom(value) => value.describe(),
        }
    }

    fn is_bool(&self) -> bool {
        match self {
            Self::Bool(_) => true,
            Self::Custom(value) => value.is_bool(),
            _ => false,
        }
    }

    fn hint(&self) -> &str {
        match self {
            Self::Bool(_) => "",
            Self::Str(_) | Self::Buffer(_) | Self::Strings(_) | Self::Writer(_) => "string",
            Self::InputFile(_) | Self::InputFiles(_) | Self::OutputFiles(_) => "file",
            Self::Custom(value) => value.hint(),
        }
    }
}

impl fmt::Debug for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Self::Buffer(buf) => f.debug_tuple("Buffer").field(buf).finish(),
            Self::Strings(v) => f.debug_tuple("Strings").field(v).finish(),
            Self::Writer(w) => f.debug_tuple("Writer").field(&w.is_some()).finish(),
            Self::InputFile(input) => f.debug_tuple("InputFile").field(input).finish(),
            Self::InputFiles(inputs) => f.debug_tuple("InputFiles").field(inputs).finish(),
            Self::OutputFiles(outputs) => f.debug_tuple("OutputFiles").field(outputs).finish(),
            Self::Custom(value) => f.debug_tuple("Custom").field(&value.describe()).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::io::Read;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Shared(Rc<RefCell<Vec<u8>>>);

    impl Write for Shared {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().write(buf)
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_bool() -> Result<()> {
        let mut v = FlagValue::Bool(false);
        assert!(v.is_bool());
        v.set("true")?;
        assert_eq!(v.describe(), "true");
        v.set("F")?;
        assert_eq!(v.describe(), "false");
        assert!(matches!(v.set("yes"), Err(ValueError::InvalidBool(s)) if s == "yes"));
        Ok(())
    }

    #[test]
    fn test_buffer_appends_newline() -> Result<()> {
        let mut v = FlagValue::Buffer(Vec::new());
        v.set("")?;
        assert_eq!(v.describe(), "\n");
        v.set("foo")?;
        v.set("baz")?;
        assert_eq!(v.describe(), "\nfoo\nbaz\n");
        Ok(())
    }

    #[test]
    fn test_strings() -> Result<()> {
        let mut v = FlagValue::Strings(Vec::new());
        assert_eq!(v.describe(), "[]");
        assert_eq!(v.default_text(), None);
        v.set("foo")?;
        v.set("baz")?;
        assert_eq!(v.describe(), "[foo baz]");
        Ok(())
    }

    #[test]
    fn test_writer_has_no_newline() -> Result<()> {
        let sink = Shared::default();
        let mut v = FlagValue::writer(sink.clone());
        v.set("ab")?;
        v.set("cd")?;
        assert_eq!(&*sink.0.borrow(), b"abcd");
        assert_eq!(v.describe(), "writer");
        Ok(())
    }

    #[test]
    fn test_taken_writer_rejects() {
        let mut v = FlagValue::Writer(None);
        assert!(matches!(v.set("x"), Err(ValueError::Custom(_))));
    }

    #[test]
    fn test_input_file() -> Result<()> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.txt");
        std::fs::write(&path, "hello").unwrap();
        let mut v = FlagValue::InputFile(None);
        v.set(path.to_str().unwrap())?;
        match v {
            FlagValue::InputFile(Some(mut input)) => {
                let mut s = String::new();
                input.read_to_string(&mut s).unwrap();
                assert_eq!(s, "hello");
            }
            other => panic!("unexpected {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_input_files_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope");
        let mut v = FlagValue::InputFiles(Vec::new());
        match v.set(path.to_str().unwrap()) {
            Err(ValueError::Io { path: p, .. }) => assert!(p.ends_with("nope")),
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(v, FlagValue::InputFiles(ref inputs) if inputs.is_empty()));
    }

    #[test]
    fn test_stdio_dash() -> Result<()> {
        let mut inputs = FlagValue::InputFiles(Vec::new());
        inputs.set(STDIO_ARG)?;
        assert!(matches!(inputs, FlagValue::InputFiles(ref v) if matches!(v[0], Input::Stdin(_))));
        let mut outputs = FlagValue::OutputFiles(Vec::new());
        outputs.set(STDIO_ARG)?;
        assert!(matches!(
            outputs,
            FlagValue::OutputFiles(ref v) if matches!(v[0], Output::Stdout(_))
        ));
        Ok(())
    }

    #[test]
    fn test_output_files_create() -> Result<()> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let mut v = FlagValue::OutputFiles(Vec::new());
        v.set(path.to_str().unwrap())?;
        if let FlagValue::OutputFiles(outputs) = &mut v {
            outputs[0].write_all(b"data").unwrap();
            outputs[0].flush().unwrap();
        }
        drop(v);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "data");
        Ok(())
    }
}
