//! Slash command definitions

use serenity::builder::{CreateCommand, CreateCommandOption};
use serenity::model::application::{CommandInteraction, CommandOptionType};

pub const CLEAN_COMMAND: &str = "clean";
pub const USERID_OPTION: &str = "userid";

/// The `/clean` command as registered in the configured guild.
pub fn clean_command() -> CreateCommand {
    CreateCommand::new(CLEAN_COMMAND)
        .description("Wipe plot data for a Roblox user")
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::Integer,
                USERID_OPTION,
                "Roblox UserId to clean",
            )
            .required(true),
        )
}

/// Whether an invoked command name is one this relay answers.
pub fn is_clean_command(name: &str) -> bool {
    name == CLEAN_COMMAND
}

/// Integer value of the `userid` option, if present.
pub fn userid_option(command: &CommandInteraction) -> Option<i64> {
    command
        .data
        .options
        .iter()
        .find(|opt| opt.name == USERID_OPTION)
        .and_then(|opt| opt.value.as_i64())
}
