//! Serenity event handler and client lifecycle.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use bridge_core::{BridgeClient, RelayConfig};
use serenity::all::GatewayIntents;
use serenity::builder::{CreateInteractionResponse, CreateInteractionResponseMessage};
use serenity::client::{Context, EventHandler};
use serenity::model::application::{CommandInteraction, Interaction};
use serenity::model::gateway::Ready;
use serenity::model::id::{GuildId, RoleId};

use crate::commands::{clean_command, is_clean_command, userid_option};
use crate::error::{RelayError, Result};
use crate::relay::{relay_clean, JobSubmitter};

pub struct RelayHandler {
    submitter: Arc<dyn JobSubmitter>,
    guild_id: GuildId,
    owner_role: RoleId,
}

impl RelayHandler {
    pub fn new(submitter: Arc<dyn JobSubmitter>, guild_id: u64, owner_role_id: u64) -> Self {
        Self {
            submitter,
            guild_id: GuildId::new(guild_id),
            owner_role: RoleId::new(owner_role_id),
        }
    }

    async fn handle_clean(&self, ctx: &Context, command: &CommandInteraction) -> Result<()> {
        let roles = command.member.as_ref().map(|m| m.roles.as_slice());
        let reply = relay_clean(
            self.submitter.as_ref(),
            self.owner_role,
            roles,
            userid_option(command),
        )
        .await;

        tracing::debug!(invoker = %command.user.id, ?reply, "answering /clean");

        command
            .create_response(
                &ctx.http,
                CreateInteractionResponse::Message(
                    CreateInteractionResponseMessage::new()
                        .content(reply.content())
                        .ephemeral(reply.ephemeral()),
                ),
            )
            .await
            .map_err(RelayError::Respond)
    }
}

#[async_trait]
impl EventHandler for RelayHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        tracing::info!(bot = %ready.user.name, "Discord bot ready");

        match self
            .guild_id
            .set_commands(&ctx.http, vec![clean_command()])
            .await
        {
            Ok(commands) => tracing::info!(
                guild_id = %self.guild_id,
                count = commands.len(),
                "registered slash commands"
            ),
            Err(e) => tracing::error!(
                guild_id = %self.guild_id,
                error = %e,
                "failed to register slash commands"
            ),
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };
        if !is_clean_command(&command.data.name) {
            tracing::debug!(command = %command.data.name, "ignoring unknown command");
            return;
        }

        if let Err(e) = self.handle_clean(&ctx, &command).await {
            tracing::error!(error = ?e, "failed to handle /clean");
        }
    }
}

/// Log in and relay `/clean` to the bridge at `bridge_url` until `shutdown` resolves.
pub async fn run_relay(
    config: &RelayConfig,
    bridge_url: &str,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let bridge = BridgeClient::new(bridge_url, config.secret.clone())?;
    tracing::info!(bridge_url = bridge.base_url(), "relaying /clean to bridge");

    let handler = RelayHandler::new(Arc::new(bridge), config.guild_id, config.owner_role_id);

    let mut client = serenity::Client::builder(&config.bot_token, GatewayIntents::GUILDS)
        .event_handler(handler)
        .await
        .map_err(RelayError::Client)?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        shutdown.await;
        tracing::info!("stopping Discord client");
        shard_manager.shutdown_all().await;
    });

    client.start().await.map_err(RelayError::Client)
}
