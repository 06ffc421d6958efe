use std::path::PathBuf;

use order_core::form::FieldName;
use order_core::models::{KitCatalog, KitId};
use thiserror::Error;

pub const HELP: &str = "\
Commands:
  set <field> <value...>   edit a field (company, gst, mobile, email, date,
                           billing, shipping, or a kit id)
  inc <kit>                add one unit of a kit
  dec <kit>                remove one unit of a kit
  qty <kit> <n>            type a kit quantity directly
  attach <path>            attach the payment proof file
  detach                   remove the payment proof
  show                     print the form and summary
  submit                   validate and send the order
  reset [--yes]            clear the form (asks first without --yes)
  dismiss                  hide the current message
  log <level>              change the log filter (error, warn, info, debug, trace)
  help                     this text
  quit                     leave";

/// One line of console input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set { field: FieldName, value: String },
    Increment(KitId),
    Decrement(KitId),
    Quantity { kit: KitId, value: String },
    Attach(PathBuf),
    Detach,
    Show,
    Submit,
    Reset { confirmed: bool },
    Dismiss,
    Log(String),
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("type a command, or 'help'")]
    Empty,

    #[error("unknown command '{0}', try 'help'")]
    Unknown(String),

    #[error("'{command}' needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("unknown kit '{0}'")]
    UnknownKit(String),
}

impl Command {
    pub fn parse(
        line: &str,
        catalog: &KitCatalog,
    ) -> Result<Self, CommandError> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        match verb.to_ascii_lowercase().as_str() {
            "" => Err(CommandError::Empty),
            "set" => {
                let (name, value) = match rest.split_once(char::is_whitespace) {
                    Some((name, value)) => (name, value.trim()),
                    None => (rest, ""),
                };
                if name.is_empty() {
                    return Err(CommandError::MissingArgument {
                        command: "set",
                        argument: "a field name",
                    });
                }
                let field = FieldName::parse(name, catalog)
                    .ok_or_else(|| CommandError::UnknownField(name.to_string()))?;
                Ok(Self::Set {
                    field,
                    value: value.to_string(),
                })
            }
            "inc" | "+" => Ok(Self::Increment(kit_arg("inc", rest, catalog)?)),
            "dec" | "-" => Ok(Self::Decrement(kit_arg("dec", rest, catalog)?)),
            "qty" => {
                let (kit, value) = rest.split_once(char::is_whitespace).ok_or(
                    CommandError::MissingArgument {
                        command: "qty",
                        argument: "a kit and a quantity",
                    },
                )?;
                Ok(Self::Quantity {
                    kit: kit_arg("qty", kit, catalog)?,
                    value: value.trim().to_string(),
                })
            }
            "attach" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument {
                        command: "attach",
                        argument: "a file path",
                    });
                }
                Ok(Self::Attach(PathBuf::from(rest)))
            }
            "detach" => Ok(Self::Detach),
            "show" | "ls" => Ok(Self::Show),
            "submit" => Ok(Self::Submit),
            "reset" => Ok(Self::Reset {
                confirmed: matches!(rest, "--yes" | "-y"),
            }),
            "dismiss" => Ok(Self::Dismiss),
            "log" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument {
                        command: "log",
                        argument: "a level",
                    });
                }
                Ok(Self::Log(rest.to_string()))
            }
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn kit_arg(
    command: &'static str,
    arg: &str,
    catalog: &KitCatalog,
) -> Result<KitId, CommandError> {
    let arg = arg.trim();
    if arg.is_empty() {
        return Err(CommandError::MissingArgument {
            command,
            argument: "a kit id",
        });
    }
    catalog
        .resolve(arg)
        .cloned()
        .ok_or_else(|| CommandError::UnknownKit(arg.to_string()))
}
