use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trait {
    #[serde(rename = "action.devices.traits.OnOff")]
    OnOff,
}

/// A single entry of an EXECUTE `execution` list.
///
/// Commands this bridge does not know about deserialize into
/// [`Command::Unsupported`] so that they can be skipped instead of failing the
/// whole request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Execution")]
pub enum Command {
    OnOff { on: bool },
    Unsupported { command: String },
}

#[derive(Debug, Deserialize)]
struct Execution {
    command: String,
    #[serde(default)]
    params: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct OnOffParams {
    on: bool,
}

impl TryFrom<Execution> for Command {
    type Error = String;

    fn try_from(execution: Execution) -> Result<Self, Self::Error> {
        match execution.command.as_str() {
            "action.devices.commands.OnOff" => {
                let params = execution
                    .params
                    .ok_or_else(|| format!("Command '{}' is missing params", execution.command))?;
                let OnOffParams { on } =
                    serde_json::from_value(params).map_err(|err| err.to_string())?;

                Ok(Command::OnOff { on })
            }
            _ => Ok(Command::Unsupported {
                command: execution.command,
            }),
        }
    }
}
