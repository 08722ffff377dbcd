//! Read-only reporting commands - `week`, `weeks`, and `revenue`.
//!
//! These commands query the ledger through the core modules and format the
//! structured reports for chat. They never mutate the ledger.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::{report, week},
        errors::{Error, Result},
    };

    /// How many weeks the `/weeks` listing shows
    const WEEK_LIST_LIMIT: usize = 10;

    /// Shows the report for a week (the current week by default).
    #[poise::command(slash_command, prefix_command)]
    pub async fn week(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Week number (defaults to the current week)"] number: Option<i64>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let settings = &ctx.data().config.settings;

        let target = match number {
            Some(n) => week::get_week_by_number(db, n).await?,
            None => week::get_active_week(db).await?,
        };

        let Some(target) = target else {
            let label = number.map_or_else(|| "current".to_string(), |n| format!("#{n}"));
            ctx.say(format!("❌ Week {label} not found.")).await?;
            return Ok(());
        };

        let week_report = report::generate_week_report(db, settings, target).await?;
        ctx.say(report::format_week_report(&week_report)).await?;
        Ok(())
    }

    /// Lists recent weeks with their finalized totals.
    #[poise::command(slash_command, prefix_command)]
    pub async fn weeks(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;

        let all_weeks = week::list_weeks(db).await?;
        if all_weeks.is_empty() {
            ctx.say("The ledger has no weeks yet.").await?;
            return Ok(());
        }

        let lines: Vec<String> = all_weeks
            .iter()
            .take(WEEK_LIST_LIMIT)
            .map(report::format_week_line)
            .collect();
        ctx.say(format!("**Ledger weeks**\n{}", lines.join("\n")))
            .await?;
        Ok(())
    }

    /// Shows live totals for the current week.
    #[poise::command(slash_command, prefix_command)]
    pub async fn revenue(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;
        let settings = &ctx.data().config.settings;

        let Some(active) = week::get_active_week(db).await? else {
            ctx.say("❌ No week is currently open.").await?;
            return Ok(());
        };

        let week_report = report::generate_week_report(db, settings, active).await?;
        ctx.say(report::format_week_report(&week_report)).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
