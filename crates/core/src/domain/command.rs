//! Command table and argument parsing
//!
//! Command names are matched exactly (ASCII case-insensitive) against a fixed table.
//! Arity is checked here, so malformed requests never reach the store.

use super::error::{DomainError, Result};
use super::keys::Variant;
use super::queue::{Direction, ListEnd, QueueName};
use serde::Serialize;

/// Argument shape of a command (excluding the command name itself)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "count", rename_all = "snake_case")]
pub enum Arity {
    Exact(usize),
    /// One or more (queue, interval) pairs
    Pairs,
}

impl Arity {
    fn accepts(&self, args: usize) -> bool {
        match self {
            Arity::Exact(n) => args == *n,
            Arity::Pairs => args >= 2 && args % 2 == 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CommandName {
    SetPopInterval,
    SetPushInterval,
    LPop,
    RPop,
    LPush,
    RPush,
    RPopLPush,
    LPopRPush,
}

const COMMAND_TABLE: [CommandName; 8] = [
    CommandName::SetPopInterval,
    CommandName::SetPushInterval,
    CommandName::LPop,
    CommandName::RPop,
    CommandName::LPush,
    CommandName::RPush,
    CommandName::RPopLPush,
    CommandName::LPopRPush,
];

impl CommandName {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandName::SetPopInterval => "RL.SETPOPINTERVAL",
            CommandName::SetPushInterval => "RL.SETPUSHINTERVAL",
            CommandName::LPop => "RL.LPOP",
            CommandName::RPop => "RL.RPOP",
            CommandName::LPush => "RL.LPUSH",
            CommandName::RPush => "RL.RPUSH",
            CommandName::RPopLPush => "RL.RPOPLPUSH",
            CommandName::LPopRPush => "RL.LPOPRPUSH",
        }
    }

    pub fn arity(&self) -> Arity {
        match self {
            CommandName::SetPopInterval | CommandName::SetPushInterval => Arity::Pairs,
            CommandName::LPop | CommandName::RPop => Arity::Exact(1),
            CommandName::LPush
            | CommandName::RPush
            | CommandName::RPopLPush
            | CommandName::LPopRPush => Arity::Exact(2),
        }
    }

    /// Whether the command is registered for a variant
    pub fn available_in(&self, variant: Variant) -> bool {
        match variant {
            Variant::Dual => true,
            Variant::Dequeue => matches!(
                self,
                CommandName::SetPopInterval
                    | CommandName::LPop
                    | CommandName::RPop
                    | CommandName::RPopLPush
            ),
        }
    }

    /// Exact lookup, ignoring ASCII case
    pub fn lookup(name: &[u8], variant: Variant) -> Option<Self> {
        COMMAND_TABLE
            .into_iter()
            .find(|c| c.as_str().as_bytes().eq_ignore_ascii_case(name))
            .filter(|c| c.available_in(variant))
    }

    /// Commands registered for a variant, in table order
    pub fn table(variant: Variant) -> Vec<CommandName> {
        COMMAND_TABLE
            .into_iter()
            .filter(|c| c.available_in(variant))
            .collect()
    }
}

/// A parsed, arity-checked request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Intervals stay raw here; they are validated against the store's key state first
    SetIntervals {
        direction: Direction,
        pairs: Vec<(QueueName, Vec<u8>)>,
    },
    Pop {
        queue: QueueName,
        end: ListEnd,
    },
    Push {
        queue: QueueName,
        end: ListEnd,
        element: Vec<u8>,
    },
    Move {
        source: QueueName,
        from: ListEnd,
        destination: QueueName,
        to: ListEnd,
    },
}

impl Command {
    /// Parse `argv` (command name first) against the table for `variant`
    pub fn parse(argv: &[Vec<u8>], variant: Variant) -> Result<(CommandName, Command)> {
        let (name, args) = argv
            .split_first()
            .ok_or_else(|| DomainError::UnknownCommand(String::new()))?;

        let command = CommandName::lookup(name, variant).ok_or_else(|| {
            DomainError::UnknownCommand(String::from_utf8_lossy(name).into_owned())
        })?;

        if !command.arity().accepts(args.len()) {
            return Err(DomainError::WrongArity(command.as_str().to_string()));
        }

        let queue = |i: usize| QueueName::new(args[i].clone());

        let parsed = match command {
            CommandName::SetPopInterval | CommandName::SetPushInterval => {
                let direction = if command == CommandName::SetPopInterval {
                    Direction::Pop
                } else {
                    Direction::Push
                };
                let pairs = args
                    .chunks_exact(2)
                    .map(|pair| (QueueName::new(pair[0].clone()), pair[1].clone()))
                    .collect();
                Command::SetIntervals { direction, pairs }
            }
            CommandName::LPop => Command::Pop {
                queue: queue(0),
                end: ListEnd::Head,
            },
            CommandName::RPop => Command::Pop {
                queue: queue(0),
                end: ListEnd::Tail,
            },
            CommandName::LPush => Command::Push {
                queue: queue(0),
                end: ListEnd::Head,
                element: args[1].clone(),
            },
            CommandName::RPush => Command::Push {
                queue: queue(0),
                end: ListEnd::Tail,
                element: args[1].clone(),
            },
            CommandName::RPopLPush => Command::Move {
                source: queue(0),
                from: ListEnd::Tail,
                destination: queue(1),
                to: ListEnd::Head,
            },
            CommandName::LPopRPush => Command::Move {
                source: queue(0),
                from: ListEnd::Head,
                destination: queue(1),
                to: ListEnd::Tail,
            },
        };

        Ok((command, parsed))
    }
}
