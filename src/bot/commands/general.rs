//! General Discord commands - ping and help.
//! Simple commands that don't require database operations.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**Le Yellowjack Back-Office Help**\n\
        Here is a summary of all available commands.\n\n\
        **Intake Commands**\n\
        • `/sale <amount> [description]` - Records a bar sale on the current week.\n\
        • `/cleaning <count>` - Logs completed cleaning units on the current week.\n\n\
        **Reporting Commands**\n\
        • `/revenue` - Shows live totals for the current week.\n\
        • `/week [number]` - Shows the report for a week (current week by default).\n\
        • `/weeks` - Lists recent weeks with their finalized totals.\n\n\
        **Utility Commands**\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.\n\n\
        Week finalization is not available from chat; ask a manager.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
