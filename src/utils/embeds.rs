use crate::commands::help::Module;
use serenity::all::{Colour, CreateEmbed};

pub const SUCCESS_COLOUR: Colour = Colour::TEAL;
pub const ERROR_COLOUR: Colour = Colour::DARK_RED;

/// Title of a command response, e.g. `"🎲 Gambling - Coinflip"`.
pub fn module_title(module: Module, title: &str) -> String {
    format!("{} {} - {}", module.emoji(), module.name(), title)
}

/// Standard response embed of a command of `module`.
pub fn module_embed(
    module: Module,
    title: &str,
    content: impl Into<String>,
    is_error: bool,
) -> CreateEmbed {
    CreateEmbed::new()
        .title(module_title(module, title))
        .description(content)
        .colour(if is_error { ERROR_COLOUR } else { SUCCESS_COLOUR })
}
