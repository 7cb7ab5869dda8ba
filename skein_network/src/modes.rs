//! Defines member privilege flags, and the decoding of mode strings

use skein_macros::mode_flags;
use std::collections::HashMap;
use thiserror::Error;

mode_flags!(
    Member {
        Owner   (0x10, 'q', '~'),
        Admin   (0x08, 'a', '&'),
        Op      (0x04, 'o', '@'),
        HalfOp  (0x02, 'h', '%'),
        Voice   (0x01, 'v', '+'),
    }
);

/// Whether a mode letter consumes a trailing argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArgPolicy {
    /// Never takes an argument
    Never,
    /// Takes an argument only when being set (`+l 10`, but `-l`)
    WhenSetting,
    /// Takes an argument in either direction
    Always,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Polarity {
    Plus,
    Minus,
}

impl Polarity {
    pub fn sign(self) -> char {
        match self {
            Polarity::Plus => '+',
            Polarity::Minus => '-',
        }
    }
}

/// One decoded mode change
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ModeEntry {
    pub flag: char,
    pub polarity: Polarity,
    pub argument: Option<String>,
}

impl ModeEntry {
    pub fn new(flag: char, polarity: Polarity, argument: Option<&str>) -> Self {
        Self {
            flag,
            polarity,
            argument: argument.map(str::to_owned),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModeError {
    #[error("Mode flag {0:?} appears before any '+' or '-'")]
    NoPolarity(char),
    #[error("Mode flag {0}{1} needs an argument but none remain")]
    MissingArgument(char, char),
}

/// Maps mode letters to their argument policy for one context (usually one
/// network's channel modes). Letters not in the table take no argument.
#[derive(Debug, Clone, Default)]
pub struct ModeTable {
    policies: HashMap<char, ModeArgPolicy>,
}

impl ModeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, flag: char, policy: ModeArgPolicy) -> Self {
        self.set(flag, policy);
        self
    }

    pub fn set(&mut self, flag: char, policy: ModeArgPolicy) {
        self.policies.insert(flag, policy);
    }

    pub fn policy(&self, flag: char) -> ModeArgPolicy {
        self.policies.get(&flag).copied().unwrap_or(ModeArgPolicy::Never)
    }

    /// The table most networks use before they tell us otherwise: the
    /// RFC 2811 list and key modes, the limit mode, and every member
    /// privilege letter.
    pub fn default_channel_modes() -> Self {
        let mut table = Self::new()
            .with('b', ModeArgPolicy::Always)
            .with('e', ModeArgPolicy::Always)
            .with('I', ModeArgPolicy::Always)
            .with('k', ModeArgPolicy::Always)
            .with('l', ModeArgPolicy::WhenSetting);
        for flag in MemberFlagSet::ALL {
            table.set(flag.mode_char(), ModeArgPolicy::Always);
        }
        table
    }

    /// Rebuild from an ISUPPORT `CHANMODES=A,B,C,D` value, keeping any
    /// member privilege letters already present.
    pub fn apply_chanmodes(&mut self, value: &str) {
        let groups = [
            ModeArgPolicy::Always,
            ModeArgPolicy::Always,
            ModeArgPolicy::WhenSetting,
            ModeArgPolicy::Never,
        ];
        self.policies.retain(|c, _| MemberFlag::from_mode_char(*c).is_some());
        for (letters, policy) in value.split(',').zip(groups) {
            for c in letters.chars() {
                self.set(c, policy);
            }
        }
    }

    /// Apply an ISUPPORT `PREFIX=(modes)sigils` value; every prefix mode
    /// takes an argument in both directions.
    pub fn apply_prefix(&mut self, value: &str) {
        let modes = value
            .strip_prefix('(')
            .and_then(|rest| rest.split_once(')'))
            .map(|(modes, _)| modes)
            .unwrap_or("");
        for c in modes.chars() {
            self.set(c, ModeArgPolicy::Always);
        }
    }
}

/// Decode a mode string and its trailing arguments.
///
/// Arguments are claimed strictly left to right by the flags that need one.
/// The decode is all-or-nothing: any error means no entries at all.
pub fn decode_modes<S: AsRef<str>>(
    flags: &str,
    args: &[S],
    table: &ModeTable,
) -> Result<Vec<ModeEntry>, ModeError> {
    let mut args = args.iter().map(AsRef::as_ref);
    let mut polarity = None;
    let mut entries = Vec::new();

    for c in flags.chars() {
        match c {
            '+' => polarity = Some(Polarity::Plus),
            '-' => polarity = Some(Polarity::Minus),
            _ => {
                let Some(current) = polarity else {
                    return Err(ModeError::NoPolarity(c));
                };
                let wants_arg = match table.policy(c) {
                    ModeArgPolicy::Never => false,
                    ModeArgPolicy::WhenSetting => current == Polarity::Plus,
                    ModeArgPolicy::Always => true,
                };
                let argument = if wants_arg {
                    Some(args.next().ok_or(ModeError::MissingArgument(current.sign(), c))?)
                } else {
                    None
                };
                entries.push(ModeEntry::new(c, current, argument));
            }
        }
    }

    Ok(entries)
}

/// Format decoded entries back into a mode string and argument list
pub fn format_modes(entries: &[ModeEntry]) -> (String, Vec<String>) {
    let mut changes = String::new();
    let mut params = Vec::new();
    let mut current = None;

    for entry in entries {
        if current != Some(entry.polarity) {
            changes.push(entry.polarity.sign());
            current = Some(entry.polarity);
        }
        changes.push(entry.flag);
        if let Some(arg) = &entry.argument {
            params.push(arg.clone());
        }
    }

    (changes, params)
}
