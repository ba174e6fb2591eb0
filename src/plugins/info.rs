//! Information commands

use async_trait::async_trait;

use crate::application::errors::CommandError;
use crate::domain::entities::{OptionValue, User};
use crate::domain::traits::{CommandHandler, Interaction, Reply};

/// Shows account details for the invoker or for the `member` option
pub struct UserInfo;

fn describe(user: &User) -> Vec<String> {
    let mut lines = vec![
        "## General User Information:".to_string(),
        format!("> **Username**: {}", user.username),
    ];
    if let Some(global) = &user.global_name {
        lines.push(format!("> **Display Name**: {}", global));
    }
    lines.push(format!("> **ID**: `{}`", user.id));
    lines.push(format!("> **Mention**: <@{}>", user.id));
    lines.push(format!("> **Bot**: {}", if user.is_bot { "Yes" } else { "No" }));
    lines
}

/// Only the id is known when the platform sent no user record
fn describe_unresolved(id: &str) -> Vec<String> {
    vec![
        "## General User Information:".to_string(),
        "> **Username**: Unknown User".to_string(),
        format!("> **ID**: `{}`", id),
        format!("> **Mention**: <@{}>", id),
    ]
}

#[async_trait]
impl CommandHandler for UserInfo {
    async fn execute(&self, interaction: &dyn Interaction) -> Result<(), CommandError> {
        let ephemeral = interaction
            .option("ephemeral")
            .and_then(OptionValue::as_bool)
            .unwrap_or(false);

        let lines = match interaction.option("member") {
            None => describe(interaction.user()),
            Some(OptionValue::User(id)) if *id == interaction.user().id => describe(interaction.user()),
            Some(OptionValue::User(id)) => match interaction.resolved_user(id) {
                Some(user) => describe(user),
                None => describe_unresolved(id),
            },
            Some(_) => return Err(CommandError::InvalidArgs("member must be a user".to_string())),
        };

        let content = lines.join("\n");
        let reply = if ephemeral { Reply::ephemeral(content) } else { Reply::public(content) };
        interaction
            .reply(reply)
            .await
            .map_err(|e| CommandError::Response(e.to_string()))
    }
}
