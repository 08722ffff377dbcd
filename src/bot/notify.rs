//! Finalization notices - fire-and-forget messages to the notify channel.
//!
//! Sending happens strictly after the finalization transaction has committed;
//! a delivery failure is logged and dropped, never propagated back into the
//! ledger workflow.

use crate::core::finalize::FinalizeOutcome;
use poise::serenity_prelude as serenity;
use tracing::warn;

/// Formats the channel message for a committed finalization.
#[must_use]
pub fn format_finalization_notice(outcome: &FinalizeOutcome) -> String {
    let closed = &outcome.closed;
    let opened = &outcome.opened;

    format!(
        "📒 **Week #{} finalized** ({} to {})\n\
         Sales: {} for ${:.2}\n\
         Cleaning: {} units for ${:.2}\n\
         Total revenue: ${:.2}\n\
         Tax owed: ${:.2} ({:.1}%)\n\
         Week #{} is now open ({} to {}).",
        closed.week_number,
        closed.period_start.format("%Y-%m-%d"),
        closed.period_end.format("%Y-%m-%d"),
        closed.total_sales_count,
        closed.total_revenue - closed.total_cleaning_revenue,
        closed.total_cleaning_count,
        closed.total_cleaning_revenue,
        closed.total_revenue,
        closed.tax_amount,
        closed.effective_tax_rate * 100.0,
        opened.week_number,
        opened.period_start.format("%Y-%m-%d"),
        opened.period_end.format("%Y-%m-%d"),
    )
}

/// Posts the finalization notice, swallowing delivery failures.
pub async fn send_finalization_notice(
    http: &serenity::Http,
    channel: serenity::ChannelId,
    outcome: &FinalizeOutcome,
) {
    let message = format_finalization_notice(outcome);
    if let Err(err) = channel.say(http, message).await {
        warn!(
            channel = channel.get(),
            error = %err,
            "failed to deliver finalization notice"
        );
    }
}
