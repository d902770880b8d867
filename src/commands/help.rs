//! Interactive help: an overview embed with a module picker.

use crate::utils::communication::send_reply;
use crate::utils::embeds::SUCCESS_COLOUR;
use crate::{CommandResult, Context};
use poise::CreateReply;
use serenity::all::{
    ComponentInteractionCollector, ComponentInteractionDataKind, CreateActionRow, CreateButton,
    CreateEmbed, CreateEmbedFooter, CreateInteractionResponse, CreateInteractionResponseMessage,
    CreateSelectMenu, CreateSelectMenuKind, CreateSelectMenuOption, ReactionType,
};
use std::time::Duration;
use tracing::debug;

const GITHUB_URL: &str = "https://github.com/Leiyks/discord-bot";
const MODULE_SELECT_ID: &str = "help_module";
const MENU_TIMEOUT: Duration = Duration::from_secs(300);

/// Command modules, in the order they are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Module {
    Gambling,
    Music,
    Help,
}

impl Module {
    pub fn name(self) -> &'static str {
        match self {
            Self::Gambling => "Gambling",
            Self::Music => "Music",
            Self::Help => "Help",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Self::Gambling => "🎲",
            Self::Music => "🎶",
            Self::Help => "🫴",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Gambling => "Collection of gambling commands.",
            Self::Music => "Control the musics played by the bot.",
            Self::Help => "Display custom interactive help message.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandHelp {
    pub name: &'static str,
    pub help: &'static str,
}

const fn entry(name: &'static str, help: &'static str) -> CommandHelp {
    CommandHelp { name, help }
}

const GAMBLING: &[CommandHelp] = &[
    entry("coinflip", "Flip a coin and tell if it tails or heads."),
    entry(
        "random",
        "Give a random number between the two numbers given as parameters.",
    ),
];

#[cfg(feature = "music")]
const MUSIC: &[CommandHelp] = &[
    entry(
        "play",
        "Play a song or a playlist, can be used with keyword and URLs.",
    ),
    entry(
        "add",
        "Add a song or a playlist to the queue, can be used with keyword and URLs.",
    ),
    entry("search", "Search for a song and pick the results to queue."),
    entry("pause", "Put the current song in pause."),
    entry("resume", "Resume the current song."),
    entry("skip", "Skip the current song."),
    entry("clear", "Clear the music queue."),
    entry("queue", "Show the music queue and remove songs from it."),
    entry("remove", "Remove every queued song with the given title."),
    entry(
        "disconnect",
        "Disconnect the Bot from any discord channel of the server.",
    ),
];

const HELP: &[CommandHelp] = &[entry(
    "help",
    "Display main help message that can be interacted with.",
)];

/// Static description of every module and its commands.
#[derive(Debug, Clone)]
pub struct HelpRegistry {
    modules: Vec<(Module, &'static [CommandHelp])>,
}

impl Default for HelpRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl HelpRegistry {
    pub fn new() -> Self {
        let mut modules = vec![(Module::Gambling, GAMBLING)];
        #[cfg(feature = "music")]
        modules.push((Module::Music, MUSIC));
        modules.push((Module::Help, HELP));
        Self { modules }
    }

    pub fn modules(&self) -> impl Iterator<Item = Module> + '_ {
        self.modules.iter().map(|(module, _)| *module)
    }

    pub fn commands(&self, module: Module) -> &[CommandHelp] {
        self.modules
            .iter()
            .find(|(candidate, _)| *candidate == module)
            .map(|(_, commands)| *commands)
            .unwrap_or_default()
    }

    pub fn module_named(&self, name: &str) -> Option<Module> {
        self.modules().find(|module| module.name() == name)
    }

    pub fn module_of(&self, command: &str) -> Option<Module> {
        self.modules
            .iter()
            .find(|(_, commands)| commands.iter().any(|help| help.name == command))
            .map(|(module, _)| *module)
    }

    /// Main help message.
    pub fn overview(&self, prefix: &str, version: &str) -> CreateEmbed {
        let modules = self
            .modules()
            .map(|module| format!("{} {}", module.emoji(), module.name()))
            .collect::<Vec<_>>()
            .join("\n");

        CreateEmbed::new()
            .title("Help Section")
            .colour(SUCCESS_COLOUR)
            .field("Available Modules", modules, false)
            .field(
                "Notes",
                format!(
                    "- Every command can also be used with the {prefix} prefix. Example: `{prefix}help`."
                ),
                false,
            )
            .field(
                "About",
                "Please visit the `Github project page` below to submit ideas or bugs.",
                false,
            )
            .footer(CreateEmbedFooter::new(format!(
                "Bot running version: {version}"
            )))
    }

    /// Command list of one module.
    pub fn module_help(&self, module: Module) -> CreateEmbed {
        let description = self
            .commands(module)
            .iter()
            .map(|command| format!("`{}`: {}", command.name, command.help))
            .collect::<Vec<_>>()
            .join("\n");

        CreateEmbed::new()
            .title(format!("{} {} Commands", module.emoji(), module.name()))
            .colour(SUCCESS_COLOUR)
            .description(description)
    }

    fn components(&self, select_id: &str) -> Vec<CreateActionRow> {
        let options = self
            .modules()
            .map(|module| {
                CreateSelectMenuOption::new(module.name(), module.name())
                    .emoji(ReactionType::Unicode(module.emoji().to_string()))
                    .description(module.description())
            })
            .collect();

        let select = CreateSelectMenu::new(select_id, CreateSelectMenuKind::String { options })
            .placeholder("Pick a module !");
        let github = CreateButton::new_link(GITHUB_URL).label("Github");

        vec![
            CreateActionRow::SelectMenu(select),
            CreateActionRow::Buttons(vec![github]),
        ]
    }
}

/// Display main help message that can be interacted with.
#[poise::command(slash_command, prefix_command, category = "Help")]
pub async fn help(ctx: Context<'_>) -> CommandResult {
    let registry = &ctx.data().help;
    let select_id = format!("{}_{}", MODULE_SELECT_ID, ctx.id());

    let overview = registry.overview(&ctx.data().config.command_prefix, env!("CARGO_PKG_VERSION"));
    send_reply(
        ctx,
        CreateReply::default()
            .embed(overview)
            .components(registry.components(&select_id)),
    )
    .await?;

    loop {
        let id = select_id.clone();
        let Some(interaction) = ComponentInteractionCollector::new(ctx)
            .filter(move |interaction| interaction.data.custom_id == id)
            .timeout(MENU_TIMEOUT)
            .await
        else {
            break;
        };

        let picked = match &interaction.data.kind {
            ComponentInteractionDataKind::StringSelect { values } => values
                .first()
                .and_then(|value| registry.module_named(value)),
            _ => None,
        };
        let Some(module) = picked else {
            debug!("Ignoring unexpected help selection {:?}", interaction.data.kind);
            continue;
        };

        interaction
            .create_response(
                ctx.http(),
                CreateInteractionResponse::Message(
                    CreateInteractionResponseMessage::new()
                        .embed(registry.module_help(module))
                        .ephemeral(true),
                ),
            )
            .await?;
    }

    Ok(())
}
