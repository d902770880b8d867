use super::button_controls::{CLEAR_BUTTON, PLAY_PAUSE_BUTTON, SKIP_BUTTON};
use super::embedded_messages;
use super::music_manager::{MusicError, MusicResult};
use super::session::PlaybackStatus;
use crate::commands::music::SongbirdMusic;
use serenity::all::{
    ComponentInteraction, Context, CreateEmbed, CreateInteractionResponseFollowup,
};
use tracing::{error, info};

type ButtonInteractionResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Handle a press on one of the player buttons
pub async fn handle_interaction(
    ctx: &Context,
    interaction: &ComponentInteraction,
    music: &SongbirdMusic,
) -> ButtonInteractionResult {
    let guild_id = interaction.guild_id.ok_or(MusicError::NotInGuild)?;
    let user = interaction.user.id;

    // Defer the interaction response immediately
    interaction.defer(&ctx.http).await?;

    let session = music.session(guild_id);
    info!(
        "Button {} pressed by {} in guild {}",
        interaction.data.custom_id, interaction.user.name, guild_id
    );

    let (title, outcome): (&str, MusicResult<String>) = match interaction.data.custom_id.as_str() {
        CLEAR_BUTTON => {
            let outcome = if session.status().voice.is_connected() {
                session
                    .clear()
                    .await
                    .map(|_| "`Cleared` the queue !".to_string())
            } else {
                Err(MusicError::NotConnected)
            };
            ("Clear", outcome)
        }
        PLAY_PAUSE_BUTTON => match session.status().playback {
            PlaybackStatus::Paused(_) => (
                "Resume",
                session.resume().await.map(|_| "`Resumed` the bot !".to_string()),
            ),
            _ => (
                "Pause",
                session.pause().await.map(|_| "`Paused` the bot !".to_string()),
            ),
        },
        SKIP_BUTTON => (
            "Skip",
            session.skip().await.map(|_| "`Skipped` the song !".to_string()),
        ),
        other => {
            error!("Unknown button ID: {}", other);
            return Ok(());
        }
    };

    match outcome {
        Ok(content) => {
            let embed = embedded_messages::response(user, title, &content);
            followup(ctx, interaction, embed, false).await
        }
        Err(err) => {
            let embed = embedded_messages::music_error(user, title, &err);
            followup(ctx, interaction, embed, true).await
        }
    }
}

async fn followup(
    ctx: &Context,
    interaction: &ComponentInteraction,
    embed: CreateEmbed,
    ephemeral: bool,
) -> ButtonInteractionResult {
    interaction
        .create_followup(
            &ctx.http,
            CreateInteractionResponseFollowup::new()
                .embed(embed)
                .ephemeral(ephemeral),
        )
        .await?;
    Ok(())
}
