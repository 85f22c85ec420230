//! Parsing of REPL input lines into [`Command`]s.

use std::str::FromStr;

use derive_more::{Display, Error};
use service::{
    controller::{Event, Section},
    domain::{
        catalog::{DistrictId, PropertyTypeId},
        characteristic::{self, CategoryCode},
        listing::{FinishLevel, Transaction},
    },
    filter::{Layer, NumericField},
    presentation::Ordinal,
};

/// Help text listing all the recognized [`Command`]s.
pub const HELP: &str = "\
type <id|->                      pick or clear the property type
district <id>                    toggle a district
transaction <buy|rent|->         pick or clear the generic transaction
basic-transaction <buy|rent|->   pick or clear the basic transaction
set <field> [value]              enter a numeric field value
finish <level|->                 pick or clear the finish level
presence <category> <id>         toggle a presence characteristic
floor <category> <id> [value]    enter a numeric characteristic floor
clear all|generic|basic|advanced clear filters
clear category <category>        clear a category of the advanced layer
new                              start a new search
page <n> | next | prev           navigate pages
hover <n|-> | click <n>          highlight results
section <generic|basic|advanced> toggle a filter panel section
retry                            retry failed loads
state | facets | share | help | quit";

/// Single REPL input line.
#[derive(Debug)]
pub enum Command {
    /// [`Event`] to be handled by the search controller.
    Event(Event),

    /// Prints [`HELP`].
    Help,

    /// Prints the current filters.
    State,

    /// Prints the available facets of the loaded catalog.
    Facets,

    /// Prints the share link of the current search.
    Share,

    /// Ends the session.
    Quit,
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Err(ParseError::Empty);
        };
        let mut args = Args { name, words };

        let event = match name {
            "help" | "?" => return args.end(Self::Help),
            "state" => return args.end(Self::State),
            "facets" => return args.end(Self::Facets),
            "share" => return args.end(Self::Share),
            "quit" | "exit" => return args.end(Self::Quit),

            "type" => Event::PropertyType(args.optional::<PropertyTypeId>()?),
            "district" => Event::ToggleDistrict(args.required::<DistrictId>()?),
            "transaction" => {
                Event::GenericTransaction(args.optional::<Transaction>()?)
            }
            "basic-transaction" => {
                Event::BasicTransaction(args.optional::<Transaction>()?)
            }
            "finish" => Event::FinishLevel(args.optional::<FinishLevel>()?),
            "set" => Event::Input {
                field: args.required::<NumericField>()?,
                input: args.rest(),
            },
            "presence" => Event::TogglePresence {
                category: args.required::<CategoryCode>()?,
                characteristic: args.required::<characteristic::Id>()?,
            },
            "floor" => Event::Floor {
                category: args.required::<CategoryCode>()?,
                characteristic: args.required::<characteristic::Id>()?,
                input: args.rest(),
            },
            "clear" => match args.required::<String>()?.as_str() {
                "all" => Event::ClearAll,
                "category" => {
                    Event::ClearCategory(args.required::<CategoryCode>()?)
                }
                layer => Event::ClearLayer(
                    layer.parse::<Layer>().map_err(|_| {
                        ParseError::InvalidArgument {
                            command: name.to_owned(),
                            argument: layer.to_owned(),
                        }
                    })?,
                ),
            },
            "new" => Event::NewSearch,
            "page" => Event::Page(args.required::<usize>()?),
            "next" => Event::NextPage,
            "prev" => Event::PreviousPage,
            "hover" => Event::Hover(args.optional::<usize>()?.map(Ordinal::from)),
            "click" => Event::Click(Ordinal::from(args.required::<usize>()?)),
            "section" => Event::ToggleSection(args.required::<Section>()?),
            "retry" => Event::Retry,
            _ => return Err(ParseError::UnknownCommand(name.to_owned())),
        };
        args.end(Self::Event(event))
    }
}

/// Error of parsing a [`Command`].
#[derive(Clone, Debug, Display, Eq, Error, PartialEq)]
pub enum ParseError {
    /// Input line is blank.
    #[display("empty input")]
    Empty,

    /// Command is not recognized.
    #[display("unknown command `{_0}`, type `help` for the list")]
    UnknownCommand(#[error(not(source))] String),

    /// Command misses an argument.
    #[display("`{command}` misses an argument")]
    MissingArgument {
        /// Name of the command.
        #[error(not(source))]
        command: String,
    },

    /// Argument of a command cannot be parsed.
    #[display("`{argument}` is not a valid argument of `{command}`")]
    InvalidArgument {
        /// Name of the command.
        #[error(not(source))]
        command: String,

        /// Invalid argument.
        #[error(not(source))]
        argument: String,
    },

    /// Command has more arguments than it accepts.
    #[display("`{command}` has unexpected argument `{argument}`")]
    UnexpectedArgument {
        /// Name of the command.
        #[error(not(source))]
        command: String,

        /// Unexpected argument.
        #[error(not(source))]
        argument: String,
    },
}

/// Arguments of a command being parsed.
struct Args<'l, I> {
    /// Name of the command.
    name: &'l str,

    /// Remaining words of the line.
    words: I,
}

impl<'l, I: Iterator<Item = &'l str>> Args<'l, I> {
    /// Parses the next argument, failing if there is none.
    fn required<T: FromStr>(&mut self) -> Result<T, ParseError> {
        self.optional()?.ok_or_else(|| ParseError::MissingArgument {
            command: self.name.to_owned(),
        })
    }

    /// Parses the next argument, treating `-` or its absence as [`None`].
    fn optional<T: FromStr>(&mut self) -> Result<Option<T>, ParseError> {
        match self.words.next() {
            None | Some("-") => Ok(None),
            Some(word) => word.parse().map(Some).map_err(|_| {
                ParseError::InvalidArgument {
                    command: self.name.to_owned(),
                    argument: word.to_owned(),
                }
            }),
        }
    }

    /// Joins all the remaining words as a raw input.
    fn rest(&mut self) -> String {
        self.words.by_ref().collect::<Vec<_>>().join(" ")
    }

    /// Finishes parsing, failing if any words remain.
    fn end(mut self, command: Command) -> Result<Command, ParseError> {
        match self.words.next() {
            None => Ok(command),
            Some(word) => Err(ParseError::UnexpectedArgument {
                command: self.name.to_owned(),
                argument: word.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod spec {
    use service::{
        controller::{Event, Section},
        filter::{Layer, NumericField},
    };

    use super::{Command, ParseError};

    fn event(line: &str) -> Event {
        match line.parse::<Command>() {
            Ok(Command::Event(ev)) => ev,
            other => panic!("`{line}` is not an event: {other:?}"),
        }
    }

    #[test]
    fn parses_numeric_inputs_verbatim() {
        let Event::Input { field, input } = event("set target_area 1 200") else {
            panic!("not an input");
        };
        assert_eq!(field, NumericField::TargetArea);
        assert_eq!(input, "1 200");

        let Event::Input { input, .. } = event("set min_parking") else {
            panic!("not an input");
        };
        assert!(input.is_empty());
    }

    #[test]
    fn parses_optional_picks() {
        assert!(matches!(event("type -"), Event::PropertyType(None)));
        assert!(matches!(event("type 3"), Event::PropertyType(Some(_))));
        assert!(matches!(event("transaction"), Event::GenericTransaction(None)));
        assert!(matches!(
            event("basic-transaction rent"),
            Event::BasicTransaction(Some(_)),
        ));
    }

    #[test]
    fn parses_clears() {
        assert!(matches!(event("clear all"), Event::ClearAll));
        assert!(matches!(
            event("clear basic"),
            Event::ClearLayer(Layer::Basic),
        ));
        assert!(matches!(event("clear category amenities"), Event::ClearCategory(_)));
    }

    #[test]
    fn parses_navigation() {
        assert!(matches!(event("page 2"), Event::Page(2)));
        assert!(matches!(event("hover -"), Event::Hover(None)));
        assert!(matches!(event("hover 4"), Event::Hover(Some(o)) if usize::from(o) == 4));
        assert!(matches!(
            event("section advanced"),
            Event::ToggleSection(Section::Advanced),
        ));
    }

    #[test]
    fn parses_meta_commands() {
        assert!(matches!("help".parse::<Command>(), Ok(Command::Help)));
        assert!(matches!(" quit ".parse::<Command>(), Ok(Command::Quit)));
    }

    #[test]
    fn rejects_malformed_lines() {
        assert_eq!("   ".parse::<Command>().unwrap_err(), ParseError::Empty);
        assert!(matches!(
            "fly".parse::<Command>(),
            Err(ParseError::UnknownCommand(_)),
        ));
        assert!(matches!(
            "district".parse::<Command>(),
            Err(ParseError::MissingArgument { .. }),
        ));
        assert!(matches!(
            "page two".parse::<Command>(),
            Err(ParseError::InvalidArgument { .. }),
        ));
        assert!(matches!(
            "clear everything".parse::<Command>(),
            Err(ParseError::InvalidArgument { .. }),
        ));
        assert!(matches!(
            "next 2".parse::<Command>(),
            Err(ParseError::UnexpectedArgument { .. }),
        ));
    }
}
