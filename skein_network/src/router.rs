//! Maps typed user input to the protocol lines it should send.
//!
//! Input beginning with `/` names a command word; anything else is a message
//! to the current target. Recognised words are looked up in a static table
//! which declares how many positional arguments each needs and whether it
//! takes trailing text. Unrecognised words are sent as they are, minus the
//! slash, so that the user can reach protocol commands we have no special
//! handling for.

use crate::protocol::{ctcp, outbound};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouterError {
    #[error("Nothing to send")]
    Empty,
    #[error("/{command} needs {expected} argument(s)")]
    MissingArgument { command: &'static str, expected: usize },
    #[error("No current target for {0}")]
    NoTarget(&'static str),
}

pub type RouterResult = Result<String, RouterError>;

/// The parts of one command invocation a route builds its line from
#[derive(Debug)]
pub struct Invocation<'a> {
    /// Window the input was typed into, if it has a target
    pub current: Option<&'a str>,
    /// Positional arguments, exactly as many as the route requires
    pub args: Vec<&'a str>,
    /// Whatever followed the positional arguments, leading space removed
    pub rest: &'a str,
}

impl<'a> Invocation<'a> {
    fn current(&self, command: &'static str) -> Result<&'a str, RouterError> {
        self.current.ok_or(RouterError::NoTarget(command))
    }
}

/// One entry in the command table
pub struct Route {
    pub word: &'static str,
    pub required: usize,
    /// Whether trailing text is meaningful to this command
    pub takes_rest: bool,
    build: fn(&Invocation) -> RouterResult,
}

pub const ROUTES: &[Route] = &[
    Route {
        word: "join",
        required: 1,
        takes_rest: false,
        build: |inv| Ok(outbound::join(inv.args[0])),
    },
    Route {
        word: "part",
        required: 0,
        takes_rest: true,
        build: |inv| {
            let channel = match inv.rest.split_whitespace().next() {
                Some(channel) => channel,
                None => inv.current("part")?,
            };
            Ok(outbound::part(channel))
        },
    },
    Route {
        word: "msg",
        required: 1,
        takes_rest: true,
        build: |inv| Ok(outbound::privmsg(inv.args[0], inv.rest)),
    },
    Route {
        word: "me",
        required: 0,
        takes_rest: true,
        build: |inv| {
            let target = inv.current("me")?;
            Ok(outbound::privmsg(target, &ctcp::format("ACTION", inv.rest)))
        },
    },
    Route {
        word: "nick",
        required: 1,
        takes_rest: false,
        build: |inv| Ok(outbound::nick(inv.args[0])),
    },
    Route {
        word: "topic",
        required: 0,
        takes_rest: true,
        build: |inv| Ok(outbound::topic(inv.current("topic")?, inv.rest)),
    },
    Route {
        word: "quit",
        required: 0,
        takes_rest: true,
        build: |inv| Ok(outbound::quit(inv.rest)),
    },
    Route {
        word: "raw",
        required: 0,
        takes_rest: true,
        build: |inv| {
            if inv.rest.is_empty() {
                Err(RouterError::MissingArgument {
                    command: "raw",
                    expected: 1,
                })
            } else {
                Ok(inv.rest.to_string())
            }
        },
    },
];

fn find_route(word: &str) -> Option<&'static Route> {
    ROUTES.iter().find(|r| r.word.eq_ignore_ascii_case(word))
}

/// Split off up to `count` whitespace-separated words, returning them and
/// what remains.
fn take_words(mut text: &str, count: usize) -> (Vec<&str>, &str) {
    let mut words = Vec::with_capacity(count);
    for _ in 0..count {
        text = text.trim_start();
        if text.is_empty() {
            break;
        }
        let (word, remainder) = text.split_once(' ').unwrap_or((text, ""));
        words.push(word);
        text = remainder;
    }
    (words, text)
}

/// Turn one line of user input into the protocol line it should send.
///
/// `current` is the channel or nick of the window the input came from.
pub fn route(input: &str, current: Option<&str>) -> RouterResult {
    if input.is_empty() {
        return Err(RouterError::Empty);
    }

    let command_text = match input.strip_prefix('/') {
        // A doubled slash sends the text with one slash as a message
        Some(rest) if rest.starts_with('/') => return say(rest, current),
        Some(rest) => rest,
        None => return say(input, current),
    };

    let (word, remainder) = command_text.split_once(' ').unwrap_or((command_text, ""));
    if word.is_empty() {
        return Err(RouterError::Empty);
    }

    let Some(route) = find_route(word) else {
        tracing::trace!(word, "Forwarding unrecognised command verbatim");
        return Ok(command_text.to_string());
    };

    let (args, rest) = take_words(remainder, route.required);
    if args.len() < route.required {
        return Err(RouterError::MissingArgument {
            command: route.word,
            expected: route.required,
        });
    }

    let rest = if route.takes_rest { rest.trim_start() } else { "" };
    (route.build)(&Invocation { current, args, rest })
}

fn say(text: &str, current: Option<&str>) -> RouterResult {
    let target = current.ok_or(RouterError::NoTarget("message"))?;
    Ok(outbound::privmsg(target, text))
}
