//! Intake commands - `sale` and `cleaning`.
//!
//! Both attach their record to whichever week is currently active. The
//! recorded identity is the employee's registered username when their Discord
//! account is linked, otherwise the raw Discord id.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::{auth, cleaning, sale},
        entities::cleaning_service::STATUS_COMPLETED,
        errors::{Error, Result},
    };

    async fn resolve_identity(ctx: &poise::Context<'_, BotData, Error>) -> Result<String> {
        let discord_id = ctx.author().id.to_string();
        let registered = auth::get_user_by_discord_id(&ctx.data().database, &discord_id).await?;
        Ok(registered.map_or(discord_id, |user| user.username))
    }

    /// Records a bar sale on the current week.
    #[poise::command(slash_command, prefix_command)]
    pub async fn sale(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Sale amount in dollars"] amount: f64,
        #[description = "Optional description of the sale"] description: Option<String>,
    ) -> Result<()> {
        if !amount.is_finite() || amount <= 0.0 {
            ctx.say("❌ Invalid amount: must be a positive number")
                .await?;
            return Ok(());
        }

        let recorded_by = resolve_identity(&ctx).await?;
        let db = &ctx.data().database;

        match sale::record_sale(db, amount, description.clone(), recorded_by).await {
            Ok(recorded) => {
                ctx.say(format!(
                    "✅ Recorded ${amount:.2} sale (Sale ID: {})",
                    recorded.id
                ))
                .await?;
            }
            Err(Error::NoActiveWeek) => {
                ctx.say("❌ No week is currently open; the sale was not recorded.")
                    .await?;
            }
            Err(other) => return Err(other),
        }

        Ok(())
    }

    /// Logs completed cleaning units on the current week.
    #[poise::command(slash_command, prefix_command)]
    pub async fn cleaning(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Number of cleaning units performed"] count: i64,
    ) -> Result<()> {
        if count <= 0 {
            ctx.say("❌ Invalid count: must be greater than zero")
                .await?;
            return Ok(());
        }

        let employee = resolve_identity(&ctx).await?;
        let db = &ctx.data().database;

        match cleaning::record_cleaning(db, employee, count, STATUS_COMPLETED).await {
            Ok(recorded) => {
                ctx.say(format!(
                    "✅ Logged {count} cleaning unit(s) (Record ID: {})",
                    recorded.id
                ))
                .await?;
            }
            Err(Error::NoActiveWeek) => {
                ctx.say("❌ No week is currently open; the cleaning was not logged.")
                    .await?;
            }
            Err(other) => return Err(other),
        }

        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
