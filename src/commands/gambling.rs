//! Collection of gambling commands.

use crate::commands::help::Module;
use crate::utils::communication::send_reply;
use crate::utils::embeds::module_embed;
use crate::{CommandResult, Context};
use poise::CreateReply;
use rand::Rng;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GamblingError {
    #[error("The first number should be `inferior` to the second one !")]
    EmptyRange,
}

/// Side of a coin, as shown to the user.
pub fn flip_coin<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    if rng.random_bool(0.5) { "Head" } else { "Tail" }
}

/// Uniform integer in `[min, max]`. `min` must be strictly lower than `max`.
pub fn pick_number<R: Rng + ?Sized>(rng: &mut R, min: i64, max: i64) -> Result<i64, GamblingError> {
    if min >= max {
        return Err(GamblingError::EmptyRange);
    }
    Ok(rng.random_range(min..=max))
}

async fn respond(ctx: Context<'_>, title: &str, content: String, is_error: bool) -> CommandResult {
    send_reply(
        ctx,
        CreateReply::default().embed(module_embed(Module::Gambling, title, content, is_error)),
    )
    .await
}

/// Flip a coin and tell if it tails or heads.
#[poise::command(slash_command, prefix_command, category = "Gambling")]
pub async fn coinflip(ctx: Context<'_>) -> CommandResult {
    ctx.defer().await?;

    let side = flip_coin(&mut rand::rng());
    respond(
        ctx,
        "Coinflip",
        format!("Flipping a coin 🪙 ...\n\nIt's `{side}` !"),
        false,
    )
    .await
}

/// Give a random number between the two numbers given as parameters.
#[poise::command(slash_command, prefix_command, category = "Gambling")]
pub async fn random(
    ctx: Context<'_>,
    #[description = "Lowest number that can be picked"] min: i64,
    #[description = "Highest number that can be picked"] max: i64,
) -> CommandResult {
    ctx.defer().await?;

    let picked = pick_number(&mut rand::rng(), min, max);
    let (outcome, is_error) = match picked {
        Ok(number) => (format!("The picked number is `{number}` !"), false),
        Err(err) => (err.to_string(), true),
    };

    respond(
        ctx,
        "Random",
        format!("Picking a random number between `{min}` and `{max}` ...\n\n{outcome}"),
        is_error,
    )
    .await
}
