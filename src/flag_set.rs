use crate::error::{ParseError, SpecError};
use crate::help::Usage;
use crate::low_level::{Flag, LowLevelParser};
use crate::positional::Positional;
use crate::value::{FlagValue, Input, Output, Value};
use std::env;
use std::fmt;
use std::io::{self, Write};
use std::mem;
use std::process;
use tracing::{debug, warn};

/// What [`FlagSet::parse`] does after reporting an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorHandling {
    /// Return the error to the caller.
    #[default]
    ContinueOnError,
    /// Exit the process with status 2, or 0 if help was requested.
    ExitOnError,
    /// Panic with the error message.
    PanicOnError,
}

/// Registration and lookup shared by [`FlagSet`] and [`Positional`].
pub trait Flags {
    fn low_level(&self) -> &LowLevelParser;

    fn low_level_mut(&mut self) -> &mut LowLevelParser;

    fn var<N: AsRef<str>, U: AsRef<str>>(
        &mut self,
        name: N,
        usage: U,
        value: FlagValue,
    ) -> Result<&mut Self, SpecError> {
        self.low_level_mut()
            .register(name.as_ref(), usage.as_ref(), value)?;
        Ok(self)
    }

    fn bool<N: AsRef<str>, U: AsRef<str>>(
        &mut self,
        name: N,
        default: bool,
        usage: U,
    ) -> Result<&mut Self, SpecError> {
        self.var(name, usage, FlagValue::Bool(default))
    }

    fn string<N: AsRef<str>, D: AsRef<str>, U: AsRef<str>>(
        &mut self,
        name: N,
        default: D,
        usage: U,
    ) -> Result<&mut Self, SpecError> {
        let default = default.as_ref().to_string();
        self.var(name, usage, FlagValue::Str(default))
    }

    /// Each occurrence is appended to a byte buffer followed by a newline.
    fn buffer<N: AsRef<str>, U: AsRef<str>>(
        &mut self,
        name: N,
        usage: U,
    ) -> Result<&mut Self, SpecError> {
        self.var(name, usage, FlagValue::Buffer(Vec::new()))
    }

    fn strings<N: AsRef<str>, U: AsRef<str>>(
        &mut self,
        name: N,
        usage: U,
    ) -> Result<&mut Self, SpecError> {
        self.var(name, usage, FlagValue::Strings(Vec::new()))
    }

    /// Each occurrence is written verbatim to `writer`.
    fn writer<N: AsRef<str>, W: Write + 'static, U: AsRef<str>>(
        &mut self,
        name: N,
        writer: W,
        usage: U,
    ) -> Result<&mut Self, SpecError> {
        self.var(name, usage, FlagValue::writer(writer))
    }

    fn input_file<N: AsRef<str>, U: AsRef<str>>(
        &mut self,
        name: N,
        usage: U,
    ) -> Result<&mut Self, SpecError> {
        self.var(name, usage, FlagValue::InputFile(None))
    }

    fn input_files<N: AsRef<str>, U: AsRef<str>>(
        &mut self,
        name: N,
        usage: U,
    ) -> Result<&mut Self, SpecError> {
        self.var(name, usage, FlagValue::InputFiles(Vec::new()))
    }

    fn output_files<N: AsRef<str>, U: AsRef<str>>(
        &mut self,
        name: N,
        usage: U,
    ) -> Result<&mut Self, SpecError> {
        self.var(name, usage, FlagValue::OutputFiles(Vec::new()))
    }

    fn custom<N: AsRef<str>, V: Value + 'static, U: AsRef<str>>(
        &mut self,
        name: N,
        value: V,
        usage: U,
    ) -> Result<&mut Self, SpecError> {
        self.var(name, usage, FlagValue::custom(value))
    }

    fn lookup(&self, name: &str) -> Option<&Flag> {
        self.low_level().get(name)
    }

    fn value(&self, name: &str) -> Option<&FlagValue> {
        self.lookup(name).map(|flag| &flag.value)
    }

    fn value_mut(&mut self, name: &str) -> Option<&mut FlagValue> {
        self.low_level_mut().get_mut(name).map(|flag| &mut flag.value)
    }

    /// Whether `name` was assigned during the last parse.
    fn is_set(&self, name: &str) -> bool {
        self.low_level().is_visited(name)
    }

    /// Calls `f` for each flag assigned during the last parse.
    fn visit<F: FnMut(&Flag)>(&self, f: F) {
        self.low_level().visited().for_each(f)
    }

    /// Calls `f` for each registered flag in registration order.
    fn visit_all<F: FnMut(&Flag)>(&self, f: F) {
        self.low_level().flags().iter().for_each(f)
    }

    fn get_bool(&self, name: &str) -> Option<bool> {
        match self.value(name)? {
            FlagValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    fn get_str(&self, name: &str) -> Option<&str> {
        match self.value(name)? {
            FlagValue::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    fn get_buffer(&self, name: &str) -> Option<&[u8]> {
        match self.value(name)? {
            FlagValue::Buffer(buf) => Some(buf.as_slice()),
            _ => None,
        }
    }

    fn get_strings(&self, name: &str) -> Option<&[String]> {
        match self.value(name)? {
            FlagValue::Strings(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// Moves the writer out of a writer flag. Later occurrences of the flag fail.
    fn take_writer(&mut self, name: &str) -> Option<Box<dyn Write>> {
        match self.value_mut(name)? {
            FlagValue::Writer(w) => w.take(),
            _ => None,
        }
    }

    fn take_input_file(&mut self, name: &str) -> Option<Input> {
        match self.value_mut(name)? {
            FlagValue::InputFile(input) => input.take(),
            _ => None,
        }
    }

    fn take_input_files(&mut self, name: &str) -> Vec<Input> {
        match self.value_mut(name) {
            Some(FlagValue::InputFiles(inputs)) => mem::take(inputs),
            _ => Vec::new(),
        }
    }

    fn take_output_files(&mut self, name: &str) -> Vec<Output> {
        match self.value_mut(name) {
            Some(FlagValue::OutputFiles(outputs)) => mem::take(outputs),
            _ => Vec::new(),
        }
    }
}

pub type UsageFn = Box<dyn Fn(&FlagSet, &mut dyn Write) -> io::Result<()>>;

/// A set of named flags, optionally followed by named positional arguments.
pub struct FlagSet {
    name: String,
    low_level: LowLevelParser,
    positional: Option<Positional>,
    args: Vec<String>,
    parsed: bool,
    error_handling: ErrorHandling,
    output: Option<Box<dyn Write>>,
    usage: Option<UsageFn>,
}

impl FlagSet {
    pub fn new<S: AsRef<str>>(name: S, error_handling: ErrorHandling) -> Self {
        Self {
            name: name.as_ref().to_string(),
            low_level: LowLevelParser::default(),
            positional: None,
            args: Vec::new(),
            parsed: false,
            error_handling,
            output: None,
            usage: None,
        }
    }

    /// The flag set for the process command line, named after `argv[0]` and
    /// exiting on error.
    pub fn from_env() -> Self {
        let name = env::args().next().unwrap_or_default();
        Self::new(name, ErrorHandling::ExitOnError)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn error_handling(&self) -> ErrorHandling {
        self.error_handling
    }

    pub fn set_error_handling(&mut self, error_handling: ErrorHandling) -> &mut Self {
        self.error_handling = error_handling;
        self
    }

    /// Where error messages and usage are written. Defaults to stderr.
    pub fn set_output<W: Write + 'static>(&mut self, output: W) -> &mut Self {
        self.output = Some(Box::new(output));
        self
    }

    /// Replaces the default usage renderer.
    pub fn set_usage<F>(&mut self, usage: F) -> &mut Self
    where
        F: Fn(&FlagSet, &mut dyn Write) -> io::Result<()> + 'static,
    {
        self.usage = Some(Box::new(usage));
        self
    }

    /// The positional parser run over the arguments left after flags. It is
    /// created on first access.
    pub fn positional(&mut self) -> &mut Positional {
        self.positional.get_or_insert_with(Positional::new)
    }

    pub fn positional_ref(&self) -> Option<&Positional> {
        self.positional.as_ref()
    }

    pub fn parsed(&self) -> bool {
        self.parsed
    }

    /// Arguments left after the flags.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn parse<A: IntoIterator<Item = String>>(&mut self, args: A) -> Result<(), ParseError> {
        self.parsed = true;
        match self.parse_low_level(args) {
            Ok(()) => Ok(()),
            Err(e) => self.handle(e),
        }
    }

    pub fn parse_env(&mut self) -> Result<(), ParseError> {
        self.parse(env::args().skip(1))
    }

    fn parse_low_level<A: IntoIterator<Item = String>>(
        &mut self,
        args: A,
    ) -> Result<(), ParseError> {
        self.args.clear();
        self.args = self.low_level.parse(args)?;
        debug!(name = %self.name, args = ?self.args, "parsed flags");
        if let Some(positional) = self.positional.as_mut() {
            positional.parse(self.args.iter().cloned())?;
        }
        Ok(())
    }

    fn handle(&mut self, err: ParseError) -> Result<(), ParseError> {
        if !matches!(err, ParseError::Help) {
            self.write_output(format!("{}\n", err).as_bytes());
        }
        self.print_usage();
        match self.error_handling {
            ErrorHandling::ContinueOnError => Err(err),
            ErrorHandling::ExitOnError => match err {
                ParseError::Help => process::exit(0),
                _ => process::exit(2),
            },
            ErrorHandling::PanicOnError => panic!("{}", err),
        }
    }

    pub fn usage(&self) -> Usage {
        Usage::new(self)
    }

    /// Writes usage to the output, through the custom renderer if one is set.
    pub fn print_usage(&mut self) {
        let mut buf = Vec::new();
        let rendered = match &self.usage {
            Some(usage) => usage(self, &mut buf),
            None => write!(buf, "{}", self.usage()),
        };
        if rendered.is_ok() {
            self.write_output(&buf);
        }
    }

    fn write_output(&mut self, bytes: &[u8]) {
        let written = match self.output.as_mut() {
            Some(output) => output.write_all(bytes),
            None => io::stderr().write_all(bytes),
        };
        if let Err(e) = written {
            warn!(name = %self.name, error = %e, "failed to write to flag set output");
        }
    }
}

impl Flags for FlagSet {
    fn low_level(&self) -> &LowLevelParser {
        &self.low_level
    }

    fn low_level_mut(&mut self) -> &mut LowLevelParser {
        &mut self.low_level
    }
}

impl fmt::Debug for FlagSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("FlagSet")
            .field("name", &self.name)
            .field("low_level", &self.low_level)
            .field("positional", &self.positional)
            .field("args", &self.args)
            .field("parsed", &self.parsed)
            .field("error_handling", &self.error_handling)
            .finish()
    }
}
