use crate::flag_set::{FlagSet, Flags};
use crate::low_level::Flag;
use crate::value::{FlagValue, Value};
use std::fmt;

const DESCRIPTION_INDENT: &str = "    \t";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgHelp {
    pub name: String,
    pub hint: String,
    pub description: String,
    pub default: Option<String>,
}

impl ArgHelp {
    fn new(flag: &Flag) -> Self {
        let (hint, description) = unquote_usage(&flag.usage, &flag.value);
        Self {
            name: flag.name.clone(),
            hint,
            description,
            default: flag.default_text().map(|d| d.to_string()),
        }
    }
}

/// Extracts a back-quoted name from `usage` to use as the hint, falling back
/// to the value's own hint.
pub fn unquote_usage(usage: &str, value: &FlagValue) -> (String, String) {
    if let Some((before, rest)) = usage.split_once('`') {
        if let Some((name, after)) = rest.split_once('`') {
            return (name.to_string(), format!("{}{}{}", before, name, after));
        }
    }
    (value.hint().to_string(), usage.to_string())
}

/// Rendered usage of a [`FlagSet`] and its positional arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Usage {
    pub program_name: String,
    pub order: Option<String>,
    pub positional: Vec<ArgHelp>,
    pub named: Vec<ArgHelp>,
}

impl Usage {
    pub fn new(flag_set: &FlagSet) -> Self {
        let mut named = Vec::new();
        flag_set.visit_all(|flag| named.push(ArgHelp::new(flag)));
        let mut positional = Vec::new();
        let order = flag_set.positional_ref().map(|p| {
            p.visit_all(|flag| positional.push(ArgHelp::new(flag)));
            p.order_spec().to_string()
        });
        Self {
            program_name: flag_set.name().to_string(),
            order,
            positional,
            named,
        }
    }
}

fn write_arg(f: &mut fmt::Formatter, prefix: &str, arg: &ArgHelp) -> fmt::Result {
    let mut line = format!("  {}{}", prefix, arg.name);
    if !arg.hint.is_empty() {
        line.push(' ');
        line.push_str(&arg.hint);
    }
    // short single-character flags keep their description on the same line
    if line.len() <= 4 {
        line.push('\t');
    } else {
        line.push('\n');
        line.push_str(DESCRIPTION_INDENT);
    }
    line.push_str(&arg.description.replace('\n', &format!("\n{}", DESCRIPTION_INDENT)));
    if let Some(default) = &arg.default {
        line.push_str(&format!(" (default {})", default));
    }
    writeln!(f, "{}", line)
}

impl fmt::Display for Usage {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "Usage: {}", self.program_name)?;
        if !self.named.is_empty() {
            write!(f, " [options]")?;
        }
        if let Some(order) = self.order.as_ref().filter(|o| !o.is_empty()) {
            write!(f, " {}", order)?;
        }
        writeln!(f)?;
        for p in &self.positional {
            write_arg(f, "", p)?;
        }
        if !self.named.is_empty() {
            writeln!(f, "Options:")?;
            for n in &self.named {
                write_arg(f, "-", n)?;
            }
        }
        Ok(())
    }
}
