use crate::commands::music::SongbirdMusic;
use crate::commands::music::utils::button_controls::PLAYER_BUTTONS;
use crate::commands::music::utils::component_handlers;
use crate::commands::music::utils::voice::PresenceChange;
use serenity::all::{ComponentInteraction, VoiceState};
use serenity::async_trait;
use serenity::model::application::Interaction;
use serenity::prelude::*;
use std::sync::Arc;
use tracing::{debug, error};

pub struct Handler {
    music: Arc<SongbirdMusic>,
}

impl Handler {
    pub fn new(music: Arc<SongbirdMusic>) -> Self {
        Self { music }
    }
}

#[async_trait]
impl serenity::prelude::EventHandler for Handler {
    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::Component(component) = interaction {
            if PLAYER_BUTTONS.contains(&component.data.custom_id.as_str()) {
                self.music_component_interaction(&ctx, &component).await;
            }
        }
    }

    async fn voice_state_update(&self, ctx: Context, old: Option<VoiceState>, new: VoiceState) {
        let Some(guild_id) = new.guild_id else {
            return;
        };
        let bot_id = ctx.cache.current_user().id;
        let before = old.and_then(|state| state.channel_id);

        if let Some(change) = PresenceChange::for_bot(bot_id, new.user_id, before, new.channel_id) {
            debug!("Bot voice presence in guild {}: {:?}", guild_id, change);
            self.music.handle_bot_voice_update(guild_id, change);
        }
    }
}

impl Handler {
    /// Handle presses on the player buttons attached to music responses
    async fn music_component_interaction(&self, ctx: &Context, component: &ComponentInteraction) {
        if let Err(e) = component_handlers::handle_interaction(ctx, component, &self.music).await {
            error!("Error handling component interaction: {}", e);
        }
    }
}
