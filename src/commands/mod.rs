//! This module aggregates all the command modules for the bot.

use crate::{Data, Error};

/// Games of chance (coinflip, random numbers).
pub mod gambling;
/// Interactive help message.
pub mod help;

/// Commands related to music playback (requires the `music` feature).
#[cfg(feature = "music")]
pub mod music;

/// Every command of the bot, in help order.
pub fn all() -> Vec<poise::Command<Data, Error>> {
    let mut commands = vec![gambling::coinflip(), gambling::random()];

    #[cfg(feature = "music")]
    {
        use music::{
            add::*, clear::*, leave::*, pause::*, play::*, queue::*, remove::*, search::*,
            skip::*,
        };

        commands.extend(vec![
            play(),
            add(),
            search(),
            pause(),
            resume(),
            skip(),
            clear(),
            queue(),
            remove(),
            disconnect(),
        ]);
    }

    commands.push(help::help());
    commands
}
