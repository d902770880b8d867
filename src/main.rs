use ::serenity::all::ClientBuilder;
use discord_bot::commands::help::HelpRegistry;
use discord_bot::config::Config;
use discord_bot::{Data, Error, commands};
use dotenv::dotenv;
use poise::serenity_prelude as serenity;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize logging with debug level for our crate
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("discord_bot=debug,warn")),
        )
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .with_target(true)
        .with_ansi(true)
        .pretty()
        .init();

    dotenv().ok();

    let config = Config::from_env()?;
    info!(
        "Starting bot with prefix {:?} (music settings: {:?})",
        config.command_prefix, config.music
    );

    let intents = serenity::GatewayIntents::non_privileged()
        | serenity::GatewayIntents::MESSAGE_CONTENT
        | serenity::GatewayIntents::GUILD_VOICE_STATES;

    let token = config.discord_token.clone();
    let prefix = config.command_prefix.clone();

    #[cfg(feature = "music")]
    let (songbird, music) = music_stack(&config);

    let data = Data {
        help: HelpRegistry::new(),
        #[cfg(feature = "music")]
        music: music.clone(),
        config,
    };

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands::all(),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(prefix),
                ..Default::default()
            },
            on_error: |error| {
                Box::pin(async move {
                    if let Err(e) = poise::builtins::on_error(error).await {
                        error!("Error while handling error: {}", e);
                    }
                })
            },
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(data)
            })
        });

    let client_builder = ClientBuilder::new(token, intents).framework(framework.build());

    #[cfg(feature = "music")]
    let client_builder = {
        use songbird::SerenityInit;

        client_builder
            .event_handler(discord_bot::events::Handler::new(music))
            .register_songbird_with(songbird)
    };

    let mut client = client_builder.await?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl-C, shutting down");
            shard_manager.shutdown_all().await;
        }
    });

    client.start().await.map_err(Into::into)
}

/// Songbird instance and music manager sharing it.
#[cfg(feature = "music")]
fn music_stack(
    config: &Config,
) -> (
    std::sync::Arc<songbird::Songbird>,
    std::sync::Arc<commands::music::SongbirdMusic>,
) {
    use commands::music::SongbirdMusic;
    use commands::music::audio_sources::youtube::YtDlpResolver;
    use commands::music::utils::notifier::SerenityNotifier;
    use commands::music::utils::songbird_voice::SongbirdVoice;
    use std::sync::Arc;

    let songbird = songbird::Songbird::serenity();
    let http = Arc::new(serenity::Http::new(&config.discord_token));

    let music = SongbirdMusic::new(
        Arc::new(SongbirdVoice::new(songbird.clone(), config.music.volume)),
        Arc::new(YtDlpResolver::new(reqwest::Client::new())),
        Arc::new(SerenityNotifier::new(http, config.music.inactivity_timeout)),
        config.music.clone(),
    );

    (songbird, Arc::new(music))
}
